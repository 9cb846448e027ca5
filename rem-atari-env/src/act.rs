//! Actions.
use rem_core::{replay_buffer::BatchBase, Act};
use serde::{Deserialize, Serialize};

/// Meanings of the actions of the Atari 2600 joystick.
///
/// The string forms match the action meanings reported by the Arcade Learning
/// Environment, e.g. `"NOOP"` or `"UPRIGHTFIRE"`.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    num_derive::FromPrimitive,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "UPPERCASE")]
#[repr(u8)]
pub enum AtariAction {
    Noop = 0,
    Fire = 1,
    Up = 2,
    Right = 3,
    Left = 4,
    Down = 5,
    UpRight = 6,
    UpLeft = 7,
    DownRight = 8,
    DownLeft = 9,
    UpFire = 10,
    RightFire = 11,
    LeftFire = 12,
    DownFire = 13,
    UpRightFire = 14,
    UpLeftFire = 15,
    DownRightFire = 16,
    DownLeftFire = 17,
}

impl AtariAction {
    /// The full action set in ALE order.
    pub fn full_action_set() -> Vec<AtariAction> {
        (0..18u8)
            .filter_map(num_traits::FromPrimitive::from_u8)
            .collect()
    }
}

/// Action of [`AtariEnv`](crate::AtariEnv), an index into the action set of the emulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtariAct {
    /// Index of the action.
    pub act: u8,
}

impl AtariAct {
    /// Constructs an action.
    pub fn new(act: u8) -> Self {
        Self { act }
    }
}

impl Act for AtariAct {}

impl From<u8> for AtariAct {
    fn from(act: u8) -> Self {
        Self { act }
    }
}

/// Actions in a replay buffer or in a sampled batch.
#[derive(Debug, Clone, Default)]
pub struct AtariActBatch {
    /// Action indices.
    pub acts: Vec<u8>,
}

impl BatchBase for AtariActBatch {
    fn new(capacity: usize) -> Self {
        Self {
            acts: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, ix: usize, data: Self) {
        BatchBase::push(&mut self.acts, ix, data.acts);
    }

    fn sample(&self, ixs: &[usize]) -> Self {
        Self {
            acts: self.acts.sample(ixs),
        }
    }

    fn len(&self) -> usize {
        self.acts.len()
    }
}

impl From<AtariAct> for AtariActBatch {
    fn from(act: AtariAct) -> Self {
        Self {
            acts: vec![act.act],
        }
    }
}

impl From<AtariActBatch> for Vec<u8> {
    fn from(batch: AtariActBatch) -> Self {
        batch.acts
    }
}
