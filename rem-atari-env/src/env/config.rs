//! Configuration of [`AtariEnv`](super::AtariEnv).
use crate::ResizeFilter;
use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`AtariEnv`](super::AtariEnv).
///
/// `C` is the configuration of the emulator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AtariEnvConfig<C> {
    /// Name of the game, used to name runs.
    pub env_id: String,

    /// Configuration of the emulator.
    pub emulator_config: C,

    /// Upper bound of no-op steps after reset.
    pub noop_max: usize,

    /// Fixed number of no-op steps after reset, if given.
    pub override_num_noops: Option<usize>,

    /// The number of ticks an action is repeated.
    pub skip: usize,

    /// A loss of life ends an episode.
    pub episode_life: bool,

    /// Rewards are replaced with their sign.
    pub clip_rewards: bool,

    /// The number of stacked frames, no stacking if `None`.
    pub frame_stack: Option<usize>,

    /// Frames are converted to grayscale.
    pub grayscale: bool,

    /// Height of frames after resizing.
    pub height: usize,

    /// Width of frames after resizing.
    pub width: usize,

    /// Interpolation of resizing.
    pub resize_filter: ResizeFilter,
}

impl<C> AtariEnvConfig<C> {
    /// Creates a configuration with the standard preprocessing.
    pub fn new(emulator_config: C) -> Self {
        Self {
            env_id: "BreakoutNoFrameskip-v4".to_string(),
            emulator_config,
            noop_max: 30,
            override_num_noops: None,
            skip: 4,
            episode_life: true,
            clip_rewards: true,
            frame_stack: Some(4),
            grayscale: true,
            height: 84,
            width: 84,
            resize_filter: ResizeFilter::Area,
        }
    }

    /// Sets the name of the game.
    pub fn env_id(mut self, v: impl Into<String>) -> Self {
        self.env_id = v.into();
        self
    }

    /// Sets the upper bound of no-op steps.
    pub fn noop_max(mut self, v: usize) -> Self {
        self.noop_max = v;
        self
    }

    /// Fixes the number of no-op steps.
    pub fn override_num_noops(mut self, v: usize) -> Self {
        self.override_num_noops = Some(v);
        self
    }

    /// Sets the number of repeated ticks.
    pub fn skip(mut self, v: usize) -> Self {
        self.skip = v;
        self
    }

    /// Sets if a loss of life ends an episode.
    pub fn episode_life(mut self, v: bool) -> Self {
        self.episode_life = v;
        self
    }

    /// Sets if rewards are clipped.
    pub fn clip_rewards(mut self, v: bool) -> Self {
        self.clip_rewards = v;
        self
    }

    /// Sets the number of stacked frames.
    pub fn frame_stack(mut self, v: Option<usize>) -> Self {
        self.frame_stack = v;
        self
    }

    /// Sets if frames are converted to grayscale.
    pub fn grayscale(mut self, v: bool) -> Self {
        self.grayscale = v;
        self
    }

    /// Sets the frame size after resizing.
    pub fn frame_size(mut self, height: usize, width: usize) -> Self {
        self.height = height;
        self.width = width;
        self
    }

    /// Sets the interpolation of resizing.
    pub fn resize_filter(mut self, v: ResizeFilter) -> Self {
        self.resize_filter = v;
        self
    }

    /// The number of channels of observations.
    pub fn obs_channels(&self) -> usize {
        let c = if self.grayscale { 1 } else { 3 };
        c * self.frame_stack.unwrap_or(1)
    }
}

impl<C: Default> Default for AtariEnvConfig<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<C: Serialize + DeserializeOwned> AtariEnvConfig<C> {
    /// Loads [`AtariEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`AtariEnvConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
