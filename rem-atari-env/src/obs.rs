//! Observations.
use crate::lazy_frames::{stack_frames, Frame};
use anyhow::Result;
use ndarray::{stack, Array3, Array4, ArrayView3, Axis};
use rem_core::{replay_buffer::BatchBase, Obs};
use std::{convert::TryFrom, sync::Arc};

/// Observation of [`AtariEnv`](crate::AtariEnv).
///
/// It holds the `(C, H, W)` frames of the window, the oldest first. The frames
/// are shared with the neighbouring observations, and the `(C * k, H, W)` array
/// is built only by [`AtariObs::to_array3`].
#[derive(Debug, Clone, PartialEq)]
pub struct AtariObs {
    /// Frames of the window.
    pub frames: Vec<Frame>,
}

impl AtariObs {
    /// Creates an observation from frames, the oldest first.
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// Shape of the stacked observation.
    pub fn shape(&self) -> Vec<usize> {
        match self.frames.first() {
            Some(frame) => {
                let (c, h, w) = frame.dim();
                vec![c * self.frames.len(), h, w]
            }
            None => vec![],
        }
    }

    /// Concatenates the frames along the channel axis.
    pub fn to_array3(&self) -> Result<Array3<u8>> {
        stack_frames(&self.frames)
    }
}

impl From<Array3<u8>> for AtariObs {
    fn from(frame: Array3<u8>) -> Self {
        Self {
            frames: vec![Arc::new(frame)],
        }
    }
}

impl TryFrom<AtariObs> for Array3<u8> {
    type Error = anyhow::Error;

    fn try_from(obs: AtariObs) -> Result<Self> {
        obs.to_array3()
    }
}

impl Obs for AtariObs {}

/// Observations in a replay buffer or in a sampled batch.
///
/// Observations keep their shared frames, so a frame is stored once however
/// many transitions refer to it.
#[derive(Debug, Clone, Default)]
pub struct AtariObsBatch {
    /// One observation per transition.
    pub obs: Vec<AtariObs>,
}

impl AtariObsBatch {
    /// Stacks the observations into a `(B, C * k, H, W)` array.
    pub fn to_array4(&self) -> Result<Array4<u8>> {
        let arrays = self
            .obs
            .iter()
            .map(|o| o.to_array3())
            .collect::<Result<Vec<_>>>()?;
        let views: Vec<ArrayView3<u8>> = arrays.iter().map(|a| a.view()).collect();
        Ok(stack(Axis(0), &views)?)
    }
}

impl BatchBase for AtariObsBatch {
    fn new(capacity: usize) -> Self {
        Self {
            obs: Vec::with_capacity(capacity.min(1024)),
        }
    }

    fn push(&mut self, ix: usize, data: Self) {
        BatchBase::push(&mut self.obs, ix, data.obs);
    }

    fn sample(&self, ixs: &[usize]) -> Self {
        Self {
            obs: self.obs.sample(ixs),
        }
    }

    fn len(&self) -> usize {
        self.obs.len()
    }
}

impl From<AtariObs> for AtariObsBatch {
    fn from(obs: AtariObs) -> Self {
        Self { obs: vec![obs] }
    }
}

impl TryFrom<AtariObsBatch> for Array4<u8> {
    type Error = anyhow::Error;

    fn try_from(batch: AtariObsBatch) -> Result<Self> {
        batch.to_array4()
    }
}
