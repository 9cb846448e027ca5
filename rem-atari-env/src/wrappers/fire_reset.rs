use crate::{AtariAction, Layer, LayerStep};
use anyhow::Result;
use ndarray::Array3;
use rem_core::error::RemError;

/// Presses FIRE after reset, for games that do not start until it is pressed.
pub struct FireReset {
    inner: Box<dyn Layer>,
}

impl FireReset {
    /// Wraps a layer. Fails if action 1 is not FIRE or there are less than 3 actions.
    pub fn new(inner: Box<dyn Layer>) -> Result<Self> {
        let meanings = inner.action_meanings();
        if meanings.get(1) != Some(&AtariAction::Fire) {
            return Err(RemError::InvalidActionSet("action 1 must be FIRE".to_string()).into());
        }
        if meanings.len() < 3 {
            return Err(RemError::InvalidActionSet(format!(
                "at least 3 actions are required, got {}",
                meanings.len()
            ))
            .into());
        }
        Ok(Self { inner })
    }
}

impl Layer for FireReset {
    fn reset(&mut self) -> Result<Array3<u8>> {
        self.inner.reset()?;
        if self.inner.step(1)?.done {
            self.inner.reset()?;
        }
        let step = self.inner.step(2)?;
        match step.done {
            true => self.inner.reset(),
            false => Ok(step.obs),
        }
    }

    fn step(&mut self, action: usize) -> Result<LayerStep> {
        self.inner.step(action)
    }

    fn lives(&self) -> usize {
        self.inner.lives()
    }

    fn action_meanings(&self) -> Vec<AtariAction> {
        self.inner.action_meanings()
    }
}
