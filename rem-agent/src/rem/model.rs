//! Interface of the multi-head Q network.
use anyhow::Result;
use ndarray::{Array3, ArrayView1, ArrayView4};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters or optimizer state, flattened per named tensor.
pub type NamedParams = BTreeMap<String, Vec<f32>>;

/// Configuration of [`RemModel`].
///
/// `C` holds the settings specific to an implementation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemModelConfig<C> {
    /// Channels of observations.
    pub in_channels: usize,

    /// The number of actions.
    pub n_actions: usize,

    /// The number of heads.
    pub n_heads: usize,

    /// Learning rate of the optimizer.
    pub learning_rate: f64,

    /// Settings of the implementation.
    pub model: C,
}

impl<C: Default> Default for RemModelConfig<C> {
    fn default() -> Self {
        Self {
            in_channels: 4,
            n_actions: 4,
            n_heads: 200,
            learning_rate: 1e-4,
            model: C::default(),
        }
    }
}

impl<C> RemModelConfig<C> {
    /// Sets the channels of observations.
    pub fn in_channels(mut self, v: usize) -> Self {
        self.in_channels = v;
        self
    }

    /// Sets the number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the number of heads.
    pub fn n_heads(mut self, v: usize) -> Self {
        self.n_heads = v;
        self
    }

    /// Sets the learning rate.
    pub fn learning_rate(mut self, v: f64) -> Self {
        self.learning_rate = v;
        self
    }
}

/// Input of [`RemModel::learn`].
pub struct LearnerInput<'a> {
    /// Observations, `[B, C, H, W]`.
    pub obs: ArrayView4<'a, u8>,

    /// Taken actions, `[B]`.
    pub act: &'a [u8],

    /// TD targets, `[B]`.
    pub td_target: ArrayView1<'a, f32>,

    /// Ensemble weights, `[H]`.
    pub weights: ArrayView1<'a, f32>,

    /// Name of the transform strategy.
    pub strategy: &'a str,
}

/// Output of [`RemModel::learn`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearnerOutput {
    /// The loss before the update.
    pub loss: f32,

    /// Mean of the predicted values of the taken actions.
    pub average_q: f32,
}

/// A Q network with `H` heads.
///
/// The network architecture, its gradients and the optimizer live behind this trait.
pub trait RemModel {
    /// Settings specific to the implementation.
    type Config: Clone;

    /// Builds the network and its optimizer.
    fn build(config: &RemModelConfig<Self::Config>) -> Result<Self>
    where
        Self: Sized;

    /// Head values `[B, A, H]` of `[B, C, H, W]` observations.
    fn forward(&self, obs: ArrayView4<u8>) -> Result<Array3<f32>>;

    /// Performs an optimizer step.
    ///
    /// The prediction is the combination of the heads under `input.weights` at the
    /// taken action. The loss is the smooth L1 loss against `input.td_target`, and
    /// gradients are clipped to `max_grad_norm` before the update.
    fn learn(&mut self, input: &LearnerInput, max_grad_norm: f64) -> Result<LearnerOutput>;

    /// Copies the parameters.
    fn params(&self) -> NamedParams;

    /// Overwrites the parameters.
    fn load_params(&mut self, params: &NamedParams) -> Result<()>;

    /// Copies the state of the optimizer.
    fn optimizer_state(&self) -> NamedParams;

    /// Overwrites the state of the optimizer.
    fn load_optimizer_state(&mut self, state: &NamedParams) -> Result<()>;
}
