use crate::{AtariAction, Layer, LayerStep};
use anyhow::Result;
use log::trace;
use ndarray::Array3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rem_core::error::RemError;

const NOOP: usize = 0;

/// Takes a random number of no-op actions after reset.
///
/// The number is drawn from `1..=noop_max` unless overridden. The game is reset
/// again if it ends during the no-ops.
pub struct NoopReset {
    inner: Box<dyn Layer>,
    noop_max: usize,
    override_num_noops: Option<usize>,
    rng: StdRng,
}

impl NoopReset {
    /// Wraps a layer. Fails if action 0 is not NOOP.
    pub fn new(
        inner: Box<dyn Layer>,
        noop_max: usize,
        override_num_noops: Option<usize>,
        seed: u64,
    ) -> Result<Self> {
        if inner.action_meanings().first() != Some(&AtariAction::Noop) {
            return Err(RemError::InvalidActionSet("action 0 must be NOOP".to_string()).into());
        }
        if noop_max == 0 && override_num_noops.is_none() {
            return Err(RemError::InvalidConfig("noop_max must be positive".to_string()).into());
        }
        if override_num_noops == Some(0) {
            return Err(
                RemError::InvalidConfig("override_num_noops must be positive".to_string()).into(),
            );
        }
        Ok(Self {
            inner,
            noop_max,
            override_num_noops,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

impl Layer for NoopReset {
    fn reset(&mut self) -> Result<Array3<u8>> {
        let mut obs = self.inner.reset()?;
        let noops = match self.override_num_noops {
            Some(n) => n,
            None => self.rng.gen_range(1..=self.noop_max),
        };
        trace!("{} no-op steps after reset", noops);

        for _ in 0..noops {
            let step = self.inner.step(NOOP)?;
            obs = match step.done {
                true => self.inner.reset()?,
                false => step.obs,
            };
        }
        Ok(obs)
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
