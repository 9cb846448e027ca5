use crate::{AtariAction, Layer, LayerStep};
use anyhow::Result;
use log::trace;
use ndarray::Array3;

const NOOP: usize = 0;

/// Makes a loss of life the end of an episode.
///
/// The game itself goes on: reset takes a single no-op step unless the game
/// was really over.
pub struct EpisodicLife {
    inner: Box<dyn Layer>,
    lives: usize,
    was_real_done: bool,
}

impl EpisodicLife {
    /// Wraps a layer.
    pub fn new(inner: Box<dyn Layer>) -> Self {
        Self {
            inner,
            lives: 0,
            was_real_done: true,
        }
    }

    /// Whether the game was over at the last step.
    pub fn was_real_done(&self) -> bool {
        self.was_real_done
    }
}

impl Layer for EpisodicLife {
    fn reset(&mut self) -> Result<Array3<u8>> {
        let obs = match self.was_real_done {
            true => self.inner.reset()?,
            false => {
                trace!("Life lost, continue the game with a no-op step");
                self.inner.step(NOOP)?.obs
            }
        };
        self.lives = self.inner.lives();
        Ok(obs)
    }

    fn step(&mut self, action: usize) -> Result<LayerStep> {
        let mut step = self.inner.step(action)?;
        self.was_real_done = step.done;
        let lives = self.inner.lives();
        if lives < self.lives && lives > 0 {
            step.done = true;
        }
        self.lives = lives;
        Ok(step)
    }

    fn lives(&self) -> usize {
        self.inner.lives()
    }

    fn action_meanings(&self) -> Vec<AtariAction> {
        self.inner.action_meanings()
    }
}
