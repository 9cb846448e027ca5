//! Online REM training on Atari-like environments.
//!
//! The workspace consists of the following crates:
//!
//! * `rem-core` provides the traits of environments and agents, the replay buffer
//!   and the [`Trainer`](rem_core::Trainer) driving the decision loop.
//! * `rem-atari-env` wraps an emulator in the standard Atari preprocessing.
//! * `rem-agent` implements the random ensemble mixture agent over an abstract
//!   multi-head Q network.
//! * `rem-tensorboard` writes records to TensorBoard.
//!
//! This crate wires them together. [`RunContext`] owns the run-wide state and
//! [`run`] trains an agent from a [`RunConfig`].
mod config;
mod context;
mod run;
pub use config::RunConfig;
pub use context::RunContext;
pub use run::{run, ReplayBuffer, StepProc};
