use crate::{AtariAction, Layer, LayerStep};
use anyhow::Result;
use ndarray::Array3;

/// Replaces rewards with their sign.
pub struct ClipReward {
    inner: Box<dyn Layer>,
}

impl ClipReward {
    /// Wraps a layer.
    pub fn new(inner: Box<dyn Layer>) -> Self {
        Self { inner }
    }
}

/// Sign of a reward in `{-1, 0, 1}`.
pub(crate) fn clip(reward: f32) -> f32 {
    if reward > 0.0 {
        1.0
    } else if reward < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl Layer for ClipReward {
    fn reset(&mut self) -> Result<Array3<u8>> {
        self.inner.reset()
    }

    fn step(&mut self, action: usize) -> Result<LayerStep> {
        let mut step = self.inner.step(action)?;
        step.reward = clip(step.reward);
        Ok(step)
    }

    fn lives(&self) -> usize {
        self.inner.lives()
    }

    fn action_meanings(&self) -> Vec<AtariAction> {
        self.inner.action_meanings()
    }
}
