//! Configuration of a training run.
use anyhow::Result;
use rem_agent::rem::EpsilonGreedy;
use rem_core::{error::RemError, replay_buffer::SimpleReplayBufferConfig, TrainerConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Hyperparameters of a training run.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RunConfig {
    /// Name of the experiment, a part of the run name.
    pub exp_name: String,

    /// Name of the game.
    pub env_id: String,

    /// Seed of the environment, the replay buffer and the agent.
    pub seed: i64,

    /// Learning rate of the optimizer.
    pub learning_rate: f64,

    /// Capacity of the replay buffer.
    pub buffer_size: usize,

    /// Environment steps of the run.
    pub total_timesteps: usize,

    /// Learning starts at this step.
    pub learning_start: usize,

    /// Discount factor.
    pub gamma: f64,

    /// Interval of target network synchronization.
    pub target_network_frequency: usize,

    /// Gradients are clipped to this norm.
    pub max_grad_norm: f64,

    /// Batch size of learning steps.
    pub batch_size: usize,

    /// Interval of learning steps.
    pub train_frequency: usize,

    /// Interval of checkpoints.
    pub save_frequency: usize,

    /// The number of heads of the Q network.
    pub num_heads: usize,

    /// Epsilon at the start.
    pub start_e: f64,

    /// Final epsilon.
    pub end_e: f64,

    /// Fraction of `total_timesteps` over which epsilon decays.
    pub exploration_fraction: f64,

    /// `"STOCHASTIC"` or `"IDENTITY"`.
    pub transform_strategy: String,

    /// Interval of learning records.
    pub record_interval: usize,

    /// Parent directory of run directories.
    pub run_dir: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            exp_name: "online_rem".to_string(),
            env_id: "BreakoutNoFrameskip-v4".to_string(),
            seed: 2,
            learning_rate: 1e-4,
            buffer_size: 1_000_000,
            total_timesteps: 5_000_000,
            learning_start: 20_000,
            gamma: 0.99,
            target_network_frequency: 8_000,
            max_grad_norm: 0.5,
            batch_size: 256,
            train_frequency: 4,
            save_frequency: 100_000,
            num_heads: 200,
            start_e: 1.0,
            end_e: 0.01,
            exploration_fraction: 0.2,
            transform_strategy: "STOCHASTIC".to_string(),
            record_interval: 1_000,
            run_dir: "runs".to_string(),
        }
    }
}

impl RunConfig {
    /// Sets the name of the experiment.
    pub fn exp_name(mut self, v: impl Into<String>) -> Self {
        self.exp_name = v.into();
        self
    }

    /// Sets the name of the game.
    pub fn env_id(mut self, v: impl Into<String>) -> Self {
        self.env_id = v.into();
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the capacity of the replay buffer.
    pub fn buffer_size(mut self, v: usize) -> Self {
        self.buffer_size = v;
        self
    }

    /// Sets the length of the run.
    pub fn total_timesteps(mut self, v: usize) -> Self {
        self.total_timesteps = v;
        self
    }

    /// Sets the step at which learning starts.
    pub fn learning_start(mut self, v: usize) -> Self {
        self.learning_start = v;
        self
    }

    /// Sets the interval of target synchronization.
    pub fn target_network_frequency(mut self, v: usize) -> Self {
        self.target_network_frequency = v;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the interval of learning steps.
    pub fn train_frequency(mut self, v: usize) -> Self {
        self.train_frequency = v;
        self
    }

    /// Sets the interval of checkpoints.
    pub fn save_frequency(mut self, v: usize) -> Self {
        self.save_frequency = v;
        self
    }

    /// Sets the number of heads.
    pub fn num_heads(mut self, v: usize) -> Self {
        self.num_heads = v;
        self
    }

    /// Sets the transform strategy.
    pub fn transform_strategy(mut self, v: impl Into<String>) -> Self {
        self.transform_strategy = v.into();
        self
    }

    /// Sets the interval of learning records.
    pub fn record_interval(mut self, v: usize) -> Self {
        self.record_interval = v;
        self
    }

    /// Sets the parent directory of run directories.
    pub fn run_dir(mut self, v: impl Into<String>) -> Self {
        self.run_dir = v.into();
        self
    }

    /// Checks the values that the components do not check themselves.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.exploration_fraction) {
            return Err(RemError::InvalidConfig(format!(
                "exploration_fraction must be in [0, 1], got {}",
                self.exploration_fraction
            ))
            .into());
        }
        if self.buffer_size == 0 {
            return Err(RemError::InvalidConfig("buffer_size must be positive".to_string()).into());
        }
        Ok(())
    }

    /// Name of the run, `{env_id}__{exp_name}__{seed}__{timestamp}`.
    pub fn run_name(&self, timestamp: i64) -> String {
        format!(
            "{}__{}__{}__{}",
            self.env_id, self.exp_name, self.seed, timestamp
        )
    }

    /// Epsilon schedule of the run.
    pub fn explorer(&self) -> EpsilonGreedy {
        EpsilonGreedy::with_fraction(
            self.start_e,
            self.end_e,
            self.exploration_fraction,
            self.total_timesteps,
        )
    }

    /// Configuration of the decision loop, saving checkpoints in `model_dir`.
    pub fn trainer_config(&self, model_dir: Option<String>) -> TrainerConfig {
        let config = TrainerConfig::default()
            .max_steps(self.total_timesteps)
            .opt_interval(self.train_frequency)
            .warmup_period(self.learning_start)
            .sync_interval(self.target_network_frequency)
            .save_interval(self.save_frequency)
            .record_interval(self.record_interval)
            .seed(self.seed);
        match model_dir {
            Some(dir) => config.model_dir(dir),
            None => config,
        }
    }

    /// Configuration of the replay buffer.
    pub fn replay_buffer_config(&self) -> SimpleReplayBufferConfig {
        SimpleReplayBufferConfig::default()
            .capacity(self.buffer_size)
            .seed(self.seed as u64)
    }

    /// Loads [`RunConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RunConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
