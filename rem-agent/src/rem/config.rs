//! Configuration of REM agent.
use super::{explorer::EpsilonGreedy, model::RemModelConfig};
use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Rem`](super::Rem).
///
/// `C` is the implementation-specific part of the model configuration.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RemConfig<C> {
    /// Configuration of the online and the target networks.
    pub model_config: RemModelConfig<C>,

    /// Batch size of learning steps.
    pub batch_size: usize,

    /// Discount factor.
    pub discount_factor: f64,

    /// Gradients are clipped to this norm.
    pub max_grad_norm: f64,

    /// Name of the transform strategy, `"STOCHASTIC"` or `"IDENTITY"`.
    pub transform_strategy: String,

    /// Exploration schedule.
    pub explorer: EpsilonGreedy,

    /// Random seed of ensemble weights and exploration.
    pub seed: u64,

    /// Training mode.
    pub train: bool,
}

impl<C: Default> Default for RemConfig<C> {
    fn default() -> Self {
        Self {
            model_config: Default::default(),
            batch_size: 256,
            discount_factor: 0.99,
            max_grad_norm: 0.5,
            transform_strategy: "STOCHASTIC".to_string(),
            explorer: EpsilonGreedy::default(),
            seed: 2,
            train: true,
        }
    }
}

impl<C> RemConfig<C> {
    /// Constructs a configuration with default values around a model configuration.
    pub fn new(model_config: RemModelConfig<C>) -> Self {
        Self {
            model_config,
            batch_size: 256,
            discount_factor: 0.99,
            max_grad_norm: 0.5,
            transform_strategy: "STOCHASTIC".to_string(),
            explorer: EpsilonGreedy::default(),
            seed: 2,
            train: true,
        }
    }

    /// Batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Gradient clipping norm.
    pub fn max_grad_norm(mut self, v: f64) -> Self {
        self.max_grad_norm = v;
        self
    }

    /// Transform strategy.
    pub fn transform_strategy(mut self, v: impl Into<String>) -> Self {
        self.transform_strategy = v.into();
        self
    }

    /// Explorer.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the configuration of the model.
    pub fn model_config(mut self, v: RemModelConfig<C>) -> Self {
        self.model_config = v;
        self
    }
}

impl<C: Serialize + DeserializeOwned> RemConfig<C> {
    /// Loads [`RemConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RemConfig`] as YAML file.
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
    fn test_serde_rem_config() -> Result<()> {
        let config = RemConfig::new(RemModelConfig::<()>::default().n_heads(8))
            .batch_size(32)
            .transform_strategy("IDENTITY")
            .explorer(EpsilonGreedy::new(1.0, 0.05, 1000));

        let dir = TempDir::new("rem_config")?;
        let path = dir.path().join("rem_config.yaml");
        config.save(&path)?;
        let config_ = RemConfig::<()>::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
