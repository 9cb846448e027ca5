//! REM agent.
use super::{
    checkpoint::Checkpoint,
    config::RemConfig,
    ensemble::{head_mean, EnsembleCombiner},
    explorer::{argmax, EpsilonGreedy},
    model::{LearnerInput, RemModel},
};
use anyhow::Result;
use log::{debug, info};
use ndarray::{Array1, Array3, Array4, Axis};
use rem_core::{
    error::RemError,
    record::{Record, RecordValue},
    Agent, Env, Policy, ReplayBufferBase, TransitionBatch,
};
use std::{
    convert::TryInto,
    marker::PhantomData,
    path::{Path, PathBuf},
};

/// Random ensemble mixture agent.
///
/// The online network `qnet` is trained on TD targets of the target network
/// `qnet_tgt`, with both networks combined under the same random convex weights
/// drawn at every optimization step. Actions are chosen epsilon-greedily on the
/// mean over heads.
pub struct Rem<E, M, R>
where
    E: Env,
    M: RemModel,
    R: ReplayBufferBase,
{
    pub(in crate::rem) qnet: M,
    pub(in crate::rem) qnet_tgt: M,
    pub(in crate::rem) combiner: EnsembleCombiner,
    pub(in crate::rem) explorer: EpsilonGreedy,
    pub(in crate::rem) rng: fastrand::Rng,
    pub(in crate::rem) batch_size: usize,
    pub(in crate::rem) discount_factor: f32,
    pub(in crate::rem) max_grad_norm: f64,
    pub(in crate::rem) env_steps: usize,
    pub(in crate::rem) n_opts: usize,
    pub(in crate::rem) train: bool,
    pub(in crate::rem) phantom: PhantomData<(E, R)>,
}

impl<E, M, R> Rem<E, M, R>
where
    E: Env,
    M: RemModel,
    R: ReplayBufferBase,
{
    /// Constructs REM agent.
    ///
    /// The target network starts as a copy of the online network.
    pub fn build(config: RemConfig<M::Config>) -> Result<Self> {
        // Fails early on an unknown strategy name.
        let _ = config
            .transform_strategy
            .parse::<super::ensemble::TransformStrategy>()?;
        if config.batch_size == 0 {
            return Err(RemError::InvalidConfig("batch_size must be positive".to_string()).into());
        }

        let qnet = M::build(&config.model_config)?;
        let mut qnet_tgt = M::build(&config.model_config)?;
        qnet_tgt.load_params(&qnet.params())?;
        let combiner = EnsembleCombiner::new(
            config.model_config.n_heads,
            config.transform_strategy.clone(),
            config.seed,
        );

        Ok(Rem {
            qnet,
            qnet_tgt,
            combiner,
            explorer: config.explorer,
            rng: fastrand::Rng::with_seed(config.seed),
            batch_size: config.batch_size,
            discount_factor: config.discount_factor as f32,
            max_grad_norm: config.max_grad_norm,
            env_steps: 0,
            n_opts: 0,
            train: config.train,
            phantom: PhantomData,
        })
    }

    /// The online network.
    pub fn qnet(&self) -> &M {
        &self.qnet
    }

    /// The target network.
    pub fn qnet_tgt(&self) -> &M {
        &self.qnet_tgt
    }

    /// The number of optimization steps done.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Current epsilon of the explorer.
    pub fn epsilon(&self) -> f64 {
        self.explorer.epsilon(self.env_steps)
    }
}

impl<E, M, R> Rem<E, M, R>
where
    E: Env,
    M: RemModel,
    R: ReplayBufferBase,
    <R::Batch as TransitionBatch>::ObsBatch: TryInto<Array4<u8>, Error = anyhow::Error>,
    <R::Batch as TransitionBatch>::ActBatch: Into<Vec<u8>>,
{
    fn opt_(&mut self, buffer: &mut R) -> Result<Record> {
        let weights = self.combiner.new_weights();
        let batch = buffer.batch(self.batch_size)?;
        let (obs, act, next_obs, reward, is_terminated, _, _) = batch.unpack();
        let obs: Array4<u8> = obs.try_into()?;
        let next_obs: Array4<u8> = next_obs.try_into()?;
        let act: Vec<u8> = act.into();

        let td_target = {
            let q = self.qnet_tgt.forward(next_obs.view())?;
            let q = self.combiner.combine(&q, &weights)?.q_values()?;
            let max_q = q.map_axis(Axis(1), |row| {
                row.fold(f32::NEG_INFINITY, |m, &v| m.max(v))
            });
            if max_q.len() != reward.len() {
                return Err(RemError::ShapeMismatch {
                    expected: vec![reward.len()],
                    actual: vec![max_q.len()],
                }
                .into());
            }
            let gamma = self.discount_factor;
            Array1::from_shape_fn(reward.len(), |i| {
                let not_done = (1 - is_terminated[i]) as f32;
                reward[i] + gamma * max_q[i] * not_done
            })
        };

        let input = LearnerInput {
            obs: obs.view(),
            act: &act,
            td_target: td_target.view(),
            weights: weights.view(),
            strategy: self.combiner.strategy(),
        };
        let out = self.qnet.learn(&input, self.max_grad_norm)?;
        self.n_opts += 1;
        debug!("opt {}: td_loss = {}", self.n_opts, out.loss);

        Ok(Record::from_slice(&[
            ("td_loss", RecordValue::Scalar(out.loss)),
            ("average_q", RecordValue::Scalar(out.average_q)),
            ("epsilon", RecordValue::Scalar(self.epsilon() as f32)),
        ]))
    }
}

impl<E, M, R> Policy<E> for Rem<E, M, R>
where
    E: Env,
    M: RemModel,
    R: ReplayBufferBase,
    E::Obs: TryInto<Array3<u8>, Error = anyhow::Error>,
    E::Act: From<u8>,
{
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let obs: Array3<u8> = obs.clone().try_into()?;
        let obs = obs.insert_axis(Axis(0));
        let q = head_mean(&self.qnet.forward(obs.view())?)?;
        let q = q.index_axis(Axis(0), 0);
        let a = if self.train {
            self.explorer.action(q, self.env_steps, &self.rng)
        } else {
            argmax(q)
        };
        Ok((a as u8).into())
    }
}

impl<E, M, R> Agent<E, R> for Rem<E, M, R>
where
    E: Env,
    M: RemModel,
    R: ReplayBufferBase,
    E::Obs: TryInto<Array3<u8>, Error = anyhow::Error>,
    E::Act: From<u8>,
    <R::Batch as TransitionBatch>::ObsBatch: TryInto<Array4<u8>, Error = anyhow::Error>,
    <R::Batch as TransitionBatch>::ActBatch: Into<Vec<u8>>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn env_steps(&self) -> usize {
        self.env_steps
    }

    fn set_env_steps(&mut self, env_steps: usize) {
        self.env_steps = env_steps;
    }

    fn opt_with_record(&mut self, buffer: &mut R) -> Result<Record> {
        self.opt_(buffer)
    }

    fn sync_target(&mut self) -> Result<()> {
        self.qnet_tgt.load_params(&self.qnet.params())?;
        debug!("Synchronized the target network at opt {}", self.n_opts);
        Ok(())
    }

    fn save_params(&self, path: &Path) -> Result<PathBuf> {
        let checkpoint = Checkpoint {
            global_step: self.env_steps,
            q_network: self.qnet.params(),
            target_network: self.qnet_tgt.params(),
            optimizer: self.qnet.optimizer_state(),
        };
        checkpoint.save(path)
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let checkpoint = Checkpoint::load(path)?;
        self.qnet.load_params(&checkpoint.q_network)?;
        self.qnet_tgt.load_params(&checkpoint.target_network)?;
        self.qnet.load_optimizer_state(&checkpoint.optimizer)?;
        self.env_steps = checkpoint.global_step;
        info!(
            "Loaded the agent from {:?}, resuming at step {}",
            path, self.env_steps
        );
        Ok(())
    }
}
