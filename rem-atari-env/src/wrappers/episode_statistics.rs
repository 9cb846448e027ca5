use crate::{AtariAction, Layer, LayerStep};
use anyhow::Result;
use ndarray::Array3;

/// Accumulates the return and the length of a game.
///
/// When the game ends, `episode_return` and `episode_length` are added to the info.
/// Rewards are the unclipped rewards of the layer below. Resets of the layers above
/// that do not reset the game keep the counters.
pub struct EpisodeStatistics {
    inner: Box<dyn Layer>,
    episode_return: f32,
    episode_length: usize,
}

impl EpisodeStatistics {
    /// Wraps a layer.
    pub fn new(inner: Box<dyn Layer>) -> Self {
        Self {
            inner,
            episode_return: 0.0,
            episode_length: 0,
        }
    }
}

impl Layer for EpisodeStatistics {
    fn reset(&mut self) -> Result<Array3<u8>> {
        self.episode_return = 0.0;
        self.episode_length = 0;
        self.inner.reset()
    }

    fn step(&mut self, action: usize) -> Result<LayerStep> {
        let mut step = self.inner.step(action)?;
        self.episode_return += step.reward;
        self.episode_length += 1;

        if step.done {
            step.info.insert("episode_return", self.episode_return);
            step.info
                .insert("episode_length", self.episode_length as f32);
        }
        Ok(step)
    }

    fn lives(&self) -> usize {
        self.inner.lives()
    }

    fn action_meanings(&self) -> Vec<AtariAction> {
        self.inner.action_meanings()
    }
}
