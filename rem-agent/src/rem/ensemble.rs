//! Random convex combination of Q-value heads.
use anyhow::Result;
use ndarray::{s, Array1, Array2, Array3, Axis};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rem_core::error::RemError;
use std::{fmt, str::FromStr};

/// How the heads are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformStrategy {
    /// Weighted sum of the heads with random convex weights.
    Stochastic,

    /// Heads are kept as they are.
    Identity,
}

impl FromStr for TransformStrategy {
    type Err = RemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STOCHASTIC" => Ok(Self::Stochastic),
            "IDENTITY" => Ok(Self::Identity),
            _ => Err(RemError::InvalidStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for TransformStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stochastic => write!(f, "STOCHASTIC"),
            Self::Identity => write!(f, "IDENTITY"),
        }
    }
}

/// Draws `dim` uniform values in `[0, 1)` and normalizes them by their sum.
pub fn random_stochastic_matrix<R: Rng>(dim: usize, rng: &mut R) -> Array1<f32> {
    let w: Array1<f32> = (0..dim).map(|_| rng.gen::<f32>()).collect();
    let norm = w.sum();
    if norm > 0.0 {
        w / norm
    } else {
        Array1::from_elem(dim, 1.0 / dim as f32)
    }
}

/// Output of [`combine_q_functions`].
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedQ {
    /// `[B, A, 1]` for the stochastic strategy, `[B, A, H]` for the identity strategy.
    pub projected: Array3<f32>,

    /// Mean over heads, `[B, A]`.
    pub mean: Array2<f32>,
}

impl CombinedQ {
    /// Drops the trailing combination axis of [`CombinedQ::projected`].
    ///
    /// Fails unless the axis has length 1. The batch axis is kept even when `B = 1`.
    pub fn q_values(&self) -> Result<Array2<f32>> {
        let (b, a, n) = self.projected.dim();
        if n != 1 {
            return Err(RemError::ShapeMismatch {
                expected: vec![b, a, 1],
                actual: vec![b, a, n],
            }
            .into());
        }
        Ok(self.projected.index_axis(Axis(2), 0).to_owned())
    }
}

/// Mean over the heads of `[B, A, H]` values.
pub fn head_mean(q: &Array3<f32>) -> Result<Array2<f32>> {
    q.mean_axis(Axis(2)).ok_or_else(|| {
        RemError::ShapeMismatch {
            expected: vec![q.shape()[0], q.shape()[1], 1],
            actual: q.shape().to_vec(),
        }
        .into()
    })
}

/// Combines `[B, A, H]` head values.
///
/// The strategy is parsed here, so an unknown name is reported when values are
/// first combined.
pub fn combine_q_functions(
    q: &Array3<f32>,
    strategy: &str,
    weights: &Array1<f32>,
) -> Result<CombinedQ> {
    let strategy: TransformStrategy = strategy.parse()?;
    let mean = head_mean(q)?;
    let projected = match strategy {
        TransformStrategy::Identity => q.clone(),
        TransformStrategy::Stochastic => {
            let (b, a, h) = q.dim();
            if weights.len() != h {
                return Err(RemError::ShapeMismatch {
                    expected: vec![h],
                    actual: vec![weights.len()],
                }
                .into());
            }
            Array3::from_shape_fn((b, a, 1), |(i, j, _)| {
                q.slice(s![i, j, ..]).dot(weights)
            })
        }
    };
    Ok(CombinedQ { projected, mean })
}

/// Draws ensemble weights and combines heads with them.
pub struct EnsembleCombiner {
    n_heads: usize,
    strategy: String,
    rng: StdRng,
}

impl EnsembleCombiner {
    /// Creates a combiner of `n_heads` heads.
    pub fn new(n_heads: usize, strategy: impl Into<String>, seed: u64) -> Self {
        Self {
            n_heads,
            strategy: strategy.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The name of the strategy.
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// Draws new weights.
    pub fn new_weights(&mut self) -> Array1<f32> {
        random_stochastic_matrix(self.n_heads, &mut self.rng)
    }

    /// Combines `[B, A, H]` head values with `weights`.
    pub fn combine(&self, q: &Array3<f32>, weights: &Array1<f32>) -> Result<CombinedQ> {
        combine_q_functions(q, &self.strategy, weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn heads() -> Array3<f32> {
        // B = 2, A = 2, H = 3
        array![
            [[1.0, 2.0, 3.0], [0.0, 0.0, 6.0]],
            [[-1.0, 1.0, 0.0], [4.0, 4.0, 4.0]]
        ]
    }

    #[test]
    fn test_weights_are_on_the_simplex() {
        let mut rng = StdRng::seed_from_u64(0);
        for dim in [1, 5, 200].iter() {
            let w = random_stochastic_matrix(*dim, &mut rng);
            assert_eq!(w.len(), *dim);
            assert!(w.iter().all(|v| *v >= 0.0));
            assert!((w.sum() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_identity_keeps_heads() -> Result<()> {
        let q = heads();
        let combined = combine_q_functions(&q, "IDENTITY", &array![1.0, 0.0, 0.0])?;
        assert_eq!(combined.projected, q);
        assert_eq!(combined.mean, array![[2.0, 2.0], [0.0, 4.0]]);
        assert!(combined.q_values().is_err());
        Ok(())
    }

    #[test]
    fn test_stochastic_projects_heads() -> Result<()> {
        let q = heads();
        let combined = combine_q_functions(&q, "STOCHASTIC", &array![0.5, 0.5, 0.0])?;
        assert_eq!(combined.projected.shape(), &[2, 2, 1]);
        assert_eq!(combined.q_values()?, array![[1.5, 0.0], [0.0, 4.0]]);
        assert_eq!(combined.mean, array![[2.0, 2.0], [0.0, 4.0]]);
        Ok(())
    }

    #[test]
    fn test_single_sample_keeps_batch_axis() -> Result<()> {
        let q = heads().slice(ndarray::s![0..1, .., ..]).to_owned();
        let combined = combine_q_functions(&q, "STOCHASTIC", &array![0.0, 0.0, 1.0])?;
        let q_values = combined.q_values()?;
        assert_eq!(q_values.shape(), &[1, 2]);
        assert_eq!(q_values, array![[3.0, 6.0]]);
        Ok(())
    }

    #[test]
    fn test_unknown_strategy() {
        let err = combine_q_functions(&heads(), "RANDOM", &array![1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RemError>(),
            Some(RemError::InvalidStrategy(s)) if s == "RANDOM"
        ));
        assert_eq!(err.to_string(), "RANDOM is not a valid transform strategy");
    }

    #[test]
    fn test_combiner_draws_fresh_weights() {
        let mut combiner = EnsembleCombiner::new(4, "STOCHASTIC", 42);
        let w1 = combiner.new_weights();
        let w2 = combiner.new_weights();
        assert_eq!(w1.len(), 4);
        assert_ne!(w1, w2);
    }
}
