use crate::{AtariAction, Layer, LayerStep};
use anyhow::Result;
use ndarray::Array3;

/// Converts frames from `(H, W, C)` to `(C, H, W)`.
pub struct ChannelFirst {
    inner: Box<dyn Layer>,
}

impl ChannelFirst {
    /// Wraps a layer.
    pub fn new(inner: Box<dyn Layer>) -> Self {
        Self { inner }
    }
}

fn to_chw(frame: Array3<u8>) -> Array3<u8> {
    frame
        .permuted_axes([2, 0, 1])
        .as_standard_layout()
        .into_owned()
}

impl Layer for ChannelFirst {
    fn reset(&mut self) -> Result<Array3<u8>> {
        Ok(to_chw(self.inner.reset()?))
    }

    fn step(&mut self, action: usize) -> Result<LayerStep> {
        let mut step = self.inner.step(action)?;
        step.obs = to_chw(step.obs);
        Ok(step)
    }

    fn lives(&self) -> usize {
        self.inner.lives()
    }

    fn action_meanings(&self) -> Vec<AtariAction> {
        self.inner.action_meanings()
    }
}
