use crate::{AtariAction, AtariInfo, Layer, LayerStep};
use anyhow::Result;
use ndarray::{Array3, Zip};
use rem_core::error::RemError;

/// Repeats an action `skip` times and max-pools the frames of the last two ticks.
///
/// Rewards of the ticks are summed. The repetition stops early when the game ends,
/// in which case the frames buffered most recently stand in for the missing ones.
pub struct MaxAndSkip {
    inner: Box<dyn Layer>,
    skip: usize,
    buffer: Vec<Array3<u8>>,
}

impl MaxAndSkip {
    /// Wraps a layer.
    pub fn new(inner: Box<dyn Layer>, skip: usize) -> Result<Self> {
        if skip == 0 {
            return Err(RemError::InvalidConfig("skip must be positive".to_string()).into());
        }
        Ok(Self {
            inner,
            skip,
            buffer: vec![],
        })
    }
}

impl Layer for MaxAndSkip {
    fn reset(&mut self) -> Result<Array3<u8>> {
        let obs = self.inner.reset()?;
        self.buffer = vec![obs.clone(), obs.clone()];
        Ok(obs)
    }

    fn step(&mut self, action: usize) -> Result<LayerStep> {
        if self.buffer.len() != 2 {
            return Err(RemError::ResetRequired.into());
        }

        let mut total_reward = 0f32;
        let mut done = false;
        let mut info = AtariInfo::default();

        for i in 0..self.skip {
            let step = self.inner.step(action)?;
            total_reward += step.reward;
            done = step.done;
            info = step.info;
            if i + 2 == self.skip {
                self.buffer[0] = step.obs;
            } else if i + 1 == self.skip {
                self.buffer[1] = step.obs;
            }
            if done {
                break;
            }
        }

        let obs = match self.skip {
            1 => self.buffer[1].clone(),
            _ => {
                let mut obs = self.buffer[0].clone();
                Zip::from(&mut obs)
                    .and(&self.buffer[1])
                    .for_each(|a, &b| *a = (*a).max(b));
                obs
            }
        };

        Ok(LayerStep {
            obs,
            reward: total_reward,
            done,
            info,
        })
    }

    fn lives(&self) -> usize {
        self.inner.lives()
    }

    fn action_meanings(&self) -> Vec<AtariAction> {
        self.inner.action_meanings()
    }
}
