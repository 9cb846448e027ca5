//! Utilities for test.
//!
//! [`ScriptedEmulator`] replays rewards, lives and frames given in its configuration,
//! which makes the behavior of the pipeline deterministic.
use crate::{AtariAction, AtariInfo, Emulator, Layer, LayerStep};
use anyhow::{bail, Result};
use ndarray::Array3;
use std::sync::{Arc, Mutex};

/// A call made to [`ScriptedEmulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmulatorEvent {
    /// [`Layer::reset`].
    Reset,

    /// [`Layer::step`] with the action index.
    Step(usize),
}

/// Shared log of the calls made to a [`ScriptedEmulator`].
///
/// Clones share the same log, so a test keeps a clone while the emulator is
/// buried in the pipeline.
#[derive(Debug, Clone, Default)]
pub struct EmulatorLog(Arc<Mutex<Vec<EmulatorEvent>>>);

impl EmulatorLog {
    fn record(&self, event: EmulatorEvent) {
        if let Ok(mut events) = self.0.lock() {
            events.push(event);
        }
    }

    /// Returns the events recorded so far.
    pub fn events(&self) -> Vec<EmulatorEvent> {
        self.0.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of resets.
    pub fn n_resets(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| **e == EmulatorEvent::Reset)
            .count()
    }

    /// Number of steps.
    pub fn n_steps(&self) -> usize {
        self.events().len() - self.n_resets()
    }

    /// Forgets the events recorded so far.
    pub fn clear(&self) {
        if let Ok(mut events) = self.0.lock() {
            events.clear();
        }
    }
}

/// Configuration of [`ScriptedEmulator`].
#[derive(Debug, Clone)]
pub struct ScriptedEmulatorConfig {
    /// Height of frames.
    pub height: usize,

    /// Width of frames.
    pub width: usize,

    /// The action set.
    pub action_meanings: Vec<AtariAction>,

    /// Rewards of the ticks of an episode, cycled.
    pub rewards: Vec<f32>,

    /// Lives after the `t`-th tick of an episode, `t = 0` being the reset.
    /// The last value is kept for later ticks.
    pub lives: Vec<usize>,

    /// The number of ticks after which the game is over.
    pub episode_len: usize,

    /// Marker values of frames, indexed by the number of frames emitted since
    /// construction and cycled. If empty, the marker is that number modulo 256.
    pub frame_values: Vec<u8>,

    /// Log of calls.
    pub log: EmulatorLog,
}

impl Default for ScriptedEmulatorConfig {
    fn default() -> Self {
        Self {
            height: 210,
            width: 160,
            action_meanings: vec![
                AtariAction::Noop,
                AtariAction::Fire,
                AtariAction::Right,
                AtariAction::Left,
            ],
            rewards: vec![0.0],
            lives: vec![1],
            episode_len: 100,
            frame_values: vec![],
            log: EmulatorLog::default(),
        }
    }
}

impl ScriptedEmulatorConfig {
    /// Sets the frame size.
    pub fn frame_size(mut self, height: usize, width: usize) -> Self {
        self.height = height;
        self.width = width;
        self
    }

    /// Sets the action set.
    pub fn action_meanings(mut self, v: Vec<AtariAction>) -> Self {
        self.action_meanings = v;
        self
    }

    /// Sets the rewards.
    pub fn rewards(mut self, v: Vec<f32>) -> Self {
        self.rewards = v;
        self
    }

    /// Sets the lives.
    pub fn lives(mut self, v: Vec<usize>) -> Self {
        self.lives = v;
        self
    }

    /// Sets the episode length in ticks.
    pub fn episode_len(mut self, v: usize) -> Self {
        self.episode_len = v;
        self
    }

    /// Sets the frame markers.
    pub fn frame_values(mut self, v: Vec<u8>) -> Self {
        self.frame_values = v;
        self
    }
}

/// Builds the frame with marker `v`.
///
/// Channels hold `v`, `255 - v` and `v / 2`, so that the elementwise maximum of
/// two frames differs from both of them.
pub fn marker_frame(height: usize, width: usize, v: u8) -> Array3<u8> {
    Array3::from_shape_fn((height, width, 3), |(_, _, c)| match c {
        0 => v,
        1 => 255 - v,
        _ => v / 2,
    })
}

/// A deterministic emulator.
pub struct ScriptedEmulator {
    config: ScriptedEmulatorConfig,
    tick: usize,
    n_frames: usize,
}

impl ScriptedEmulator {
    fn next_frame(&mut self) -> Array3<u8> {
        let v = match self.config.frame_values.len() {
            0 => (self.n_frames % 256) as u8,
            n => self.config.frame_values[self.n_frames % n],
        };
        self.n_frames += 1;
        marker_frame(self.config.height, self.config.width, v)
    }
}

impl Layer for ScriptedEmulator {
    fn reset(&mut self) -> Result<Array3<u8>> {
        self.config.log.record(EmulatorEvent::Reset);
        self.tick = 0;
        Ok(self.next_frame())
    }

    fn step(&mut self, action: usize) -> Result<LayerStep> {
        if action >= self.config.action_meanings.len() {
            bail!("Action {} is out of the action set", action);
        }
        self.config.log.record(EmulatorEvent::Step(action));
        let reward = match self.config.rewards.len() {
            0 => 0.0,
            n => self.config.rewards[self.tick % n],
        };
        self.tick += 1;
        let mut info = AtariInfo::default();
        info.insert("tick", self.tick as f32);

        Ok(LayerStep {
            obs: self.next_frame(),
            reward,
            done: self.tick >= self.config.episode_len,
            info,
        })
    }

    fn lives(&self) -> usize {
        let lives = &self.config.lives;
        match lives.len() {
            0 => 0,
            n => lives[self.tick.min(n - 1)],
        }
    }

    fn action_meanings(&self) -> Vec<AtariAction> {
        self.config.action_meanings.clone()
    }
}

impl Emulator for ScriptedEmulator {
    type Config = ScriptedEmulatorConfig;

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            tick: 0,
            n_frames: 0,
        })
    }
}
