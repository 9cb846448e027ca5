//! Agent.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Represents a trainable policy on an environment.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// The environment step the agent acts at.
    ///
    /// It is restored by [`Agent::load_params`], so a training loop resumes from it.
    fn env_steps(&self) -> usize;

    /// Moves the agent to environment step `env_steps`.
    ///
    /// The training loop owns the step counter and calls this before every
    /// action and every save.
    fn set_env_steps(&mut self, env_steps: usize);

    /// Performs an optimization step on transitions taken from `buffer` and
    /// returns some information.
    fn opt_with_record(&mut self, buffer: &mut R) -> Result<Record>;

    /// Copies the parameters of the online model into the target model.
    fn sync_target(&mut self) -> Result<()>;

    /// Saves the agent in the given directory and returns the path of the written checkpoint.
    fn save_params(&self, path: &Path) -> Result<PathBuf>;

    /// Loads the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
