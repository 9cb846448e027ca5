#![warn(missing_docs)]
//! Core abstractions for training REM agents on Atari-like environments.
//!
//! This crate provides the pieces shared by environments and agents:
//!
//! * [`Env`], [`Step`], [`Policy`] and [`Agent`], the interaction interfaces,
//! * [`replay_buffer::SimpleReplayBuffer`], a fixed-capacity ring buffer of transitions,
//! * [`Trainer`], the single-threaded decision loop tying them together,
//! * [`record`], key-value records consumed by metric sinks.
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{
    Act, Agent, Env, ExperienceBufferBase, Info, Obs, Policy, ReplayBufferBase, Step,
    StepProcessor, TransitionBatch,
};

mod trainer;
pub use trainer::{Sampler, StopHandle, Trainer, TrainerConfig};
