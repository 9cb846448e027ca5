//! Train [`Agent`].
mod config;
mod sampler;
use crate::{
    record::{Record, RecordValue::Scalar, Recorder},
    Agent, Env, ExperienceBufferBase, ReplayBufferBase, StepProcessor,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::{debug, info};
pub use sampler::Sampler;
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// Raises the stop flag of a running [`Trainer`] from another thread.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<Mutex<bool>>);

impl StopHandle {
    /// Requests the training loop to stop after the current step.
    pub fn stop(&self) {
        if let Ok(mut flag) = self.0.lock() {
            *flag = true;
        }
    }

    /// Returns `true` if a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.0.lock().map(|flag| *flag).unwrap_or(true)
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages training loop and related objects.
///
/// # Training loop
///
/// A single counter `env_steps` runs up to `max_steps`. It starts from
/// [`Agent::env_steps`], which is 0 for a fresh agent and the saved step for an
/// agent restored from a checkpoint. The agent is moved to every value with
/// [`Agent::set_env_steps`], and at every value:
///
/// 1. If `model_dir` is set and `env_steps % save_interval == 0`, the agent is
///    saved in `model_dir`.
/// 2. [`Sampler`] takes an action from the agent, steps the environment (resetting
///    it when the episode ends) and pushes the transition into the replay buffer.
/// 3. If `env_steps >= warmup_period` and `env_steps % opt_interval == 0`, an
///    optimization step is performed. Inside it, if `env_steps % sync_interval == 0`,
///    the target model is synchronized with the online model.
/// 4. Records of the environment are stored at every step; records of the agent
///    are stored when `env_steps % record_interval == 0`.
/// 5. If the stop flag is raised, the loop ends.
///
/// When the loop ends the agent is saved once more.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C[StepProcessor]
///     C -->|ExperienceBufferBase::Item|D[ReplayBufferBase]
///     D -->|TransitionBatch|A
/// ```
pub struct Trainer<E, P, R>
where
    E: Env,
    P: StepProcessor<E>,
    R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
{
    /// Configuration of the environment for training.
    env_config: E::Config,

    /// Configuration of the transition producer.
    step_proc_config: P::Config,

    /// Configuration of the replay buffer.
    replay_buffer_config: R::Config,

    config: TrainerConfig,

    /// Optimization steps for computing optimization steps per second.
    opt_steps_for_ops: usize,

    /// Timer for computing for optimization steps per second.
    timer_for_ops: Duration,

    stop: Arc<Mutex<bool>>,
}

impl<E, P, R> Trainer<E, P, R>
where
    E: Env,
    P: StepProcessor<E>,
    R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
{
    /// Constructs a trainer.
    pub fn build(
        config: TrainerConfig,
        env_config: E::Config,
        step_proc_config: P::Config,
        replay_buffer_config: R::Config,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            env_config,
            step_proc_config,
            replay_buffer_config,
            config,
            opt_steps_for_ops: 0,
            timer_for_ops: Duration::new(0, 0),
            stop: Arc::new(Mutex::new(false)),
        })
    }

    /// Returns a handle to stop the training loop.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.stop.clone())
    }

    /// Shares the stop flag of `handle`, which may be created before the trainer.
    pub fn with_stop_handle(mut self, handle: &StopHandle) -> Self {
        self.stop = handle.0.clone();
        self
    }

    fn is_stop_requested(&self) -> bool {
        self.stop.lock().map(|flag| *flag).unwrap_or(true)
    }

    fn save<A: Agent<E, R>>(&self, agent: &A, env_steps: usize) -> Result<Option<PathBuf>> {
        match &self.config.model_dir {
            None => Ok(None),
            Some(model_dir) => {
                let path = agent.save_params(Path::new(model_dir))?;
                info!("Saved the agent in {:?} at step {}", &path, env_steps);
                Ok(Some(path))
            }
        }
    }

    /// Returns optimization steps per second, then reset the internal counter.
    fn opt_steps_per_sec(&mut self) -> f32 {
        let millis = self.timer_for_ops.as_millis().max(1) as f32;
        let osps = 1000. * self.opt_steps_for_ops as f32 / millis;
        self.opt_steps_for_ops = 0;
        self.timer_for_ops = Duration::new(0, 0);
        osps
    }

    /// Performs a training step.
    ///
    /// First, it performes an environment step once and pushes a transition
    /// into the given buffer with [`Sampler`]. Then, if `env_steps` is past the
    /// warmup period and on the optimization interval, performes an optimization
    /// step and, on the synchronization interval, synchronizes the target model.
    ///
    /// Returns the record of the environment and, if an optimization step was done,
    /// the record of the agent.
    pub fn train_step<A: Agent<E, R>>(
        &mut self,
        agent: &mut A,
        buffer: &mut R,
        sampler: &mut Sampler<E, P>,
        env_steps: usize,
    ) -> Result<(Record, Option<Record>)> {
        let record = sampler.sample_and_push(agent, buffer)?;

        if env_steps < self.config.warmup_period || env_steps % self.config.opt_interval != 0 {
            return Ok((record, None));
        }

        let timer = Instant::now();
        let record_agent = agent.opt_with_record(buffer)?;
        if env_steps % self.config.sync_interval == 0 {
            agent.sync_target()?;
            debug!("Synchronized the target model at step {}", env_steps);
        }
        self.timer_for_ops += timer.elapsed();
        self.opt_steps_for_ops += 1;

        Ok((record, Some(record_agent)))
    }

    /// Train the agent.
    ///
    /// Returns the path of the last saved checkpoint, if any.
    pub fn train<A, D>(&mut self, agent: &mut A, recorder: &mut D) -> Result<Option<PathBuf>>
    where
        A: Agent<E, R>,
        D: Recorder + ?Sized,
    {
        let env = E::build(&self.env_config, self.config.seed)?;
        let producer = P::build(&self.step_proc_config);
        let mut buffer = R::build(&self.replay_buffer_config);
        let mut sampler = Sampler::new(env, producer);
        let mut checkpoint = None;
        let mut env_steps = agent.env_steps();
        agent.train();
        if env_steps > 0 {
            info!("Resuming training at env_steps = {}", env_steps);
        }

        while env_steps < self.config.max_steps {
            agent.set_env_steps(env_steps);
            if env_steps % self.config.save_interval == 0 {
                checkpoint = self.save(agent, env_steps)?.or(checkpoint);
            }

            let (mut record, record_agent) =
                self.train_step(agent, &mut buffer, &mut sampler, env_steps)?;

            if let Some(record_agent) = record_agent {
                if env_steps % self.config.record_interval == 0 {
                    record.merge_inplace(record_agent);
                    record.insert("opt_steps_per_sec", Scalar(self.opt_steps_per_sec()));
                    info!("Learning step at env_steps = {}", env_steps);
                }
            }

            if !record.is_empty() {
                record.insert("env_steps", Scalar(env_steps as f32));
                recorder.write(record);
            }

            env_steps += 1;

            if self.is_stop_requested() {
                info!("Stop requested at env_steps = {}", env_steps);
                break;
            }
        }

        agent.set_env_steps(env_steps);
        checkpoint = self.save(agent, env_steps)?.or(checkpoint);
        recorder.flush();
        info!(
            "Finished training: {} steps, {} episodes",
            env_steps,
            sampler.n_episodes()
        );

        Ok(checkpoint)
    }
}
