//! Checkpoint of a [`Rem`](super::Rem) agent.
use super::model::NamedParams;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

/// File name of checkpoints in a model directory.
pub const CHECKPOINT_FILE: &str = "checkpoint.bin";

/// Everything needed to resume training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Checkpoint {
    /// Environment steps done.
    pub global_step: usize,

    /// Parameters of the online network.
    pub q_network: NamedParams,

    /// Parameters of the target network.
    pub target_network: NamedParams,

    /// State of the optimizer.
    pub optimizer: NamedParams,
}

impl Checkpoint {
    /// Writes the checkpoint to `dir`, replacing the previous one.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(CHECKPOINT_FILE);
        let file = BufWriter::new(File::create(&path)?);
        bincode::serialize_into(file, self)?;
        Ok(path)
    }

    /// Reads the checkpoint in `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let file = BufReader::new(File::open(dir.join(CHECKPOINT_FILE))?);
        Ok(bincode::deserialize_from(file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_save_replaces_previous_checkpoint() -> Result<()> {
        let dir = TempDir::new("checkpoint")?;
        let mut params = NamedParams::new();
        params.insert("head.weight".to_string(), vec![0.5, -1.0]);
        let mut checkpoint = Checkpoint {
            global_step: 0,
            q_network: params.clone(),
            target_network: params,
            optimizer: NamedParams::new(),
        };
        checkpoint.save(dir.path())?;
        checkpoint.global_step = 100;
        let path = checkpoint.save(dir.path())?;

        assert_eq!(path, dir.path().join(CHECKPOINT_FILE));
        assert_eq!(Checkpoint::load(dir.path())?, checkpoint);
        Ok(())
    }
}
