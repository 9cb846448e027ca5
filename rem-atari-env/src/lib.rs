//! Atari preprocessing pipeline.
//!
//! An [`Emulator`] produces raw `(H, W, 3)` frames. [`AtariEnv`] wraps it in a fixed
//! chain of [`Layer`]s, the preprocessing of
//! [`atari_wrappers.py`](https://github.com/openai/baselines/blob/master/baselines/common/atari_wrappers.py),
//! listed from the innermost to the outermost:
//!
//! 1. [`NoopReset`](wrappers::NoopReset): a random number of no-op ticks after reset.
//! 2. [`MaxAndSkip`](wrappers::MaxAndSkip): action repeat with max pooling of the last two frames.
//! 3. [`EpisodeStatistics`](wrappers::EpisodeStatistics): return and length of finished games.
//! 4. [`EpisodicLife`](wrappers::EpisodicLife): a life loss ends the episode (optional).
//! 5. [`FireReset`](wrappers::FireReset): presses FIRE after reset, if the game has it.
//! 6. [`WarpFrame`](wrappers::WarpFrame): grayscale and resize to 84x84.
//! 7. [`ClipReward`](wrappers::ClipReward): reward to its sign (optional).
//! 8. [`ChannelFirst`](wrappers::ChannelFirst): `(H, W, C)` to `(C, H, W)`.
//!
//! Finally the last `k` frames are stacked along the channel axis (optional). The
//! frames live in [`LazyFrames`](lazy_frames::LazyFrames) and are shared between
//! consecutive observations until a flat array is requested.
//!
//! ```no_run
//! use anyhow::Result;
//! use rem_atari_env::{
//!     util::test::{ScriptedEmulator, ScriptedEmulatorConfig},
//!     AtariAct, AtariEnv, AtariEnvConfig,
//! };
//! use rem_core::Env as _;
//!
//! fn main() -> Result<()> {
//!     let config = AtariEnvConfig::new(ScriptedEmulatorConfig::default());
//!     let mut env = AtariEnv::<ScriptedEmulator>::build(&config, 42)?;
//!     let obs = env.reset()?;
//!     assert_eq!(obs.shape(), &[4, 84, 84]);
//!     let (step, _) = env.step(&AtariAct::new(0))?;
//!     println!("reward = {}", step.reward);
//!     Ok(())
//! }
//! ```
mod act;
mod emulator;
mod env;
pub mod lazy_frames;
mod obs;
pub mod util;
pub mod wrappers;
pub use act::{AtariAct, AtariActBatch, AtariAction};
pub use emulator::{AtariInfo, Emulator, Layer, LayerStep};
pub use env::{AtariEnv, AtariEnvConfig};
pub use wrappers::ResizeFilter;
pub use obs::{AtariObs, AtariObsBatch};
