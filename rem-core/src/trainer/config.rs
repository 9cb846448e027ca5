//! Configuration of [`Trainer`](super::Trainer).
use crate::error::RemError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
///
/// All intervals are counted in environment steps, which is the only step
/// counter of the training loop.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of environment steps of the run.
    pub max_steps: usize,

    /// Interval of optimization in environment steps.
    pub opt_interval: usize,

    /// Environment steps before the first optimization step.
    pub warmup_period: usize,

    /// Interval of target network synchronization in environment steps.
    pub sync_interval: usize,

    /// Interval of saving the agent in environment steps.
    pub save_interval: usize,

    /// Interval of recording learning statistics in environment steps.
    pub record_interval: usize,

    /// Random seed given to the environment.
    pub seed: i64,

    /// Where to save the agent. Nothing is saved if `None`.
    pub model_dir: Option<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_steps: 0,
            opt_interval: 1,
            warmup_period: 0,
            sync_interval: 1,
            save_interval: usize::MAX,
            record_interval: 1000,
            seed: 0,
            model_dir: None,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of environment steps.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the interval of optimization in environment steps.
    pub fn opt_interval(mut self, opt_interval: usize) -> Self {
        self.opt_interval = opt_interval;
        self
    }

    /// Sets warmup period in environment steps.
    pub fn warmup_period(mut self, warmup_period: usize) -> Self {
        self.warmup_period = warmup_period;
        self
    }

    /// Sets the interval of target network synchronization in environment steps.
    pub fn sync_interval(mut self, sync_interval: usize) -> Self {
        self.sync_interval = sync_interval;
        self
    }

    /// Sets the interval of saving in environment steps.
    pub fn save_interval(mut self, save_interval: usize) -> Self {
        self.save_interval = save_interval;
        self
    }

    /// Sets the interval of recording learning statistics.
    pub fn record_interval(mut self, record_interval: usize) -> Self {
        self.record_interval = record_interval;
        self
    }

    /// Sets the random seed of the environment.
    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the directory the agent is saved in.
    pub fn model_dir<T: Into<String>>(mut self, model_dir: T) -> Self {
        self.model_dir = Some(model_dir.into());
        self
    }

    /// Checks that every interval is positive.
    pub fn validate(&self) -> Result<()> {
        let intervals = [
            ("opt_interval", self.opt_interval),
            ("sync_interval", self.sync_interval),
            ("save_interval", self.save_interval),
            ("record_interval", self.record_interval),
        ];
        for (name, v) in intervals.iter() {
            if *v == 0 {
                return Err(RemError::InvalidConfig(format!("{} must be positive", name)).into());
            }
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_trainer_config() -> Result<()> {
        let config = TrainerConfig::default()
            .max_steps(100)
            .opt_interval(4)
            .warmup_period(20)
            .model_dir("some/directory");

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer_config.yaml");
        config.save(&path)?;
        let config_ = TrainerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        assert!(TrainerConfig::default().validate().is_ok());
        assert!(TrainerConfig::default().opt_interval(0).validate().is_err());
        assert!(TrainerConfig::default().sync_interval(0).validate().is_err());
    }
}
