//! A window of the latest frames.
use anyhow::Result;
use ndarray::{concatenate, Array3, ArrayView3, Axis};
use rem_core::error::RemError;
use std::sync::Arc;

/// A `(C, H, W)` frame shared between windows.
pub type Frame = Arc<Array3<u8>>;

/// The last `k` frames.
///
/// Frames are stored once in a ring addressed by index. [`LazyFrames::frames`]
/// hands out the window as handles to the frames of the ring, so consecutive
/// windows share `k - 1` frames and nothing is copied. The concatenation along
/// the channel axis, `(C * k, H, W)`, is computed only by [`stack_frames`].
#[derive(Debug, Clone)]
pub struct LazyFrames {
    k: usize,
    ring: Vec<Frame>,
    /// Index of the oldest frame.
    head: usize,
}

impl LazyFrames {
    /// Creates an empty window of `k` frames.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(RemError::InvalidConfig("frame stack size must be positive".to_string()).into());
        }
        Ok(Self {
            k,
            ring: Vec::with_capacity(k),
            head: 0,
        })
    }

    /// Fills the window with `frame`, held `k` times.
    pub fn fill(&mut self, frame: Array3<u8>) {
        self.ring = vec![Arc::new(frame); self.k];
        self.head = 0;
    }

    /// Replaces the oldest frame with `frame`.
    pub fn push(&mut self, frame: Array3<u8>) -> Result<()> {
        self.check_filled()?;
        self.ring[self.head] = Arc::new(frame);
        self.head = (self.head + 1) % self.k;
        Ok(())
    }

    /// The number of frames, `k` once filled.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns `true` before the first [`LazyFrames::fill`].
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// The `i`-th frame, the oldest being 0.
    pub fn frame(&self, i: usize) -> Option<ArrayView3<u8>> {
        if i >= self.ring.len() {
            return None;
        }
        Some(self.ring[(self.head + i) % self.k].view())
    }

    /// Handles to the frames of the window, the oldest first.
    pub fn frames(&self) -> Result<Vec<Frame>> {
        self.check_filled()?;
        Ok((0..self.k)
            .map(|i| self.ring[(self.head + i) % self.k].clone())
            .collect())
    }

    fn check_filled(&self) -> Result<()> {
        if self.ring.len() < self.k {
            return Err(RemError::WindowNotFilled(self.ring.len(), self.k).into());
        }
        Ok(())
    }
}

/// Concatenates frames along the channel axis.
pub fn stack_frames(frames: &[Frame]) -> Result<Array3<u8>> {
    let views = frames.iter().map(|f| f.view()).collect::<Vec<_>>();
    Ok(concatenate(Axis(0), &views)?)
}
