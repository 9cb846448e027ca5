//! Interfaces of the emulator and of the preprocessing layers.
use crate::AtariAction;
use anyhow::Result;
use ndarray::Array3;
use rem_core::Info;
use std::collections::HashMap;

/// Additional information of a step, keyed by name.
///
/// Values set by the emulator travel unchanged through the layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtariInfo(HashMap<String, f32>);

impl AtariInfo {
    /// Inserts a value.
    pub fn insert(&mut self, k: impl Into<String>, v: f32) {
        self.0.insert(k.into(), v);
    }

    /// Gets a value.
    pub fn get(&self, k: &str) -> Option<f32> {
        self.0.get(k).copied()
    }

    /// Returns an iterator over the key-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &f32)> {
        self.0.iter()
    }
}

impl Info for AtariInfo {}

/// Output of [`Layer::step`].
#[derive(Debug, Clone)]
pub struct LayerStep {
    /// Frame after the step.
    pub obs: Array3<u8>,

    /// Reward of the step.
    pub reward: f32,

    /// Whether the episode ended.
    pub done: bool,

    /// Additional information.
    pub info: AtariInfo,
}

/// A stage of the preprocessing pipeline.
///
/// Each layer owns the layer below it and delegates to it.
pub trait Layer {
    /// Resets the layer and returns the first frame.
    fn reset(&mut self) -> Result<Array3<u8>>;

    /// Applies the action at index `action` of the action set.
    fn step(&mut self, action: usize) -> Result<LayerStep>;

    /// Remaining lives of the underlying game.
    fn lives(&self) -> usize;

    /// Meanings of the actions, indexed like the actions given to [`Layer::step`].
    fn action_meanings(&self) -> Vec<AtariAction>;
}

/// A raw emulator at the bottom of the pipeline.
///
/// Frames are `(H, W, 3)` RGB arrays.
pub trait Emulator: Layer + Sized + 'static {
    /// Configuration of the emulator.
    type Config: Clone;

    /// Constructs the emulator.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>;
}
