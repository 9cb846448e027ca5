//! Samples transitions from the environment and pushes them into a replay buffer.
use crate::{
    error::RemError, record::Record, Agent, Env, ExperienceBufferBase, ReplayBufferBase,
    StepProcessor,
};
use anyhow::Result;

/// Manages the interaction between the agent and the environment.
///
/// The environment is reset lazily on the first call of
/// [`Sampler::sample_and_push`] and, after that, whenever an episode ends.
pub struct Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    env: E,
    prev_obs: Option<E::Obs>,
    step_processor: P,
    n_episodes: usize,
}

impl<E, P> Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    /// Creates a sampler.
    pub fn new(env: E, step_processor: P) -> Self {
        Self {
            env,
            prev_obs: None,
            step_processor,
            n_episodes: 0,
        }
    }

    /// The number of episodes finished so far.
    pub fn n_episodes(&self) -> usize {
        self.n_episodes
    }

    /// Performs an environment step with an action of the agent and pushes the
    /// resulting transition into `buffer`.
    ///
    /// Returns the record emitted by the environment.
    pub fn sample_and_push<A, R>(&mut self, agent: &mut A, buffer: &mut R) -> Result<Record>
    where
        A: Agent<E, R>,
        R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
    {
        let obs = match self.prev_obs.take() {
            Some(obs) => obs,
            None => {
                let obs = self.env.reset()?;
                self.step_processor.reset(obs.clone());
                obs
            }
        };

        let act = agent.sample(&obs)?;
        let (step, record) = self.env.step_with_reset(&act)?;
        let is_done = step.is_done();

        self.prev_obs = Some(match is_done {
            true => step.init_obs.clone().ok_or(RemError::ResetRequired)?,
            false => step.obs.clone(),
        });

        let transition = self.step_processor.process(step)?;
        buffer.push(transition)?;

        if is_done {
            self.n_episodes += 1;
        }

        Ok(record)
    }
}
