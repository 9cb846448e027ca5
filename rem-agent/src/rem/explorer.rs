//! Epsilon-greedy exploration.
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Linear interpolation from `start_e` at `t = 0` to `end_e` at `t = duration`,
/// constant afterwards.
pub fn linear_schedule(start_e: f64, end_e: f64, duration: f64, t: f64) -> f64 {
    if duration <= 0.0 {
        return end_e;
    }
    let slope = (end_e - start_e) / duration;
    (slope * t + start_e).max(end_e)
}

/// Index of the largest value, the first one on ties.
pub fn argmax(xs: ArrayView1<f32>) -> usize {
    let mut best = 0;
    for (i, x) in xs.iter().enumerate() {
        if *x > xs[best] {
            best = i;
        }
    }
    best
}

/// Epsilon-greedy explorer with a linearly decaying epsilon.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// Epsilon at step 0.
    pub eps_start: f64,

    /// Epsilon after `duration` steps.
    pub eps_final: f64,

    /// The number of steps over which epsilon decays.
    pub duration: usize,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self {
            eps_start: 1.0,
            eps_final: 0.01,
            duration: 1_000_000,
        }
    }
}

impl EpsilonGreedy {
    /// Constructs an explorer.
    pub fn new(eps_start: f64, eps_final: f64, duration: usize) -> Self {
        Self {
            eps_start,
            eps_final,
            duration,
        }
    }

    /// Decays over `exploration_fraction` of `total_timesteps`.
    pub fn with_fraction(
        eps_start: f64,
        eps_final: f64,
        exploration_fraction: f64,
        total_timesteps: usize,
    ) -> Self {
        let duration = (exploration_fraction * total_timesteps as f64) as usize;
        Self::new(eps_start, eps_final, duration)
    }

    /// Epsilon at `step`.
    pub fn epsilon(&self, step: usize) -> f64 {
        linear_schedule(
            self.eps_start,
            self.eps_final,
            self.duration as f64,
            step as f64,
        )
    }

    /// Takes a uniformly random action with probability epsilon, the greedy one otherwise.
    pub fn action(&self, q: ArrayView1<f32>, step: usize, rng: &fastrand::Rng) -> usize {
        if rng.f64() < self.epsilon(step) {
            rng.usize(..q.len())
        } else {
            argmax(q)
        }
    }
}
