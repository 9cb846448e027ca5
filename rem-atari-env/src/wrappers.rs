//! Preprocessing layers.
//!
//! Every layer owns the layer below it as a `Box<dyn Layer>`.
mod channel_first;
mod clip_reward;
mod episode_statistics;
mod episodic_life;
mod fire_reset;
mod max_and_skip;
mod noop_reset;
mod warp_frame;
pub use channel_first::ChannelFirst;
pub use clip_reward::ClipReward;
pub use episode_statistics::EpisodeStatistics;
pub use episodic_life::EpisodicLife;
pub use fire_reset::FireReset;
pub use max_and_skip::MaxAndSkip;
pub use noop_reset::NoopReset;
pub use warp_frame::{area_resize, ResizeFilter, WarpFrame};
