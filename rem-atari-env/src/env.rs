mod config;
use crate::{
    wrappers::{
        ChannelFirst, ClipReward, EpisodeStatistics, EpisodicLife, FireReset, MaxAndSkip,
        NoopReset, WarpFrame,
    },
    lazy_frames::LazyFrames,
    AtariAct, AtariAction, AtariInfo, AtariObs, Emulator, Layer,
};
use anyhow::{bail, Result};
pub use config::AtariEnvConfig;
use log::info;
use ndarray::Array3;
use rem_core::{
    record::{Record, RecordValue},
    Env, Step,
};
use std::marker::PhantomData;

/// An Atari environment with the standard preprocessing.
///
/// See the crate documentation for the layers. When frames are stacked, the
/// last `k` frames of the pipeline are kept in [`LazyFrames`] and observations
/// share them.
pub struct AtariEnv<M: Emulator> {
    pipeline: Box<dyn Layer>,
    window: Option<LazyFrames>,
    n_actions: usize,
    phantom: PhantomData<M>,
}

impl<M: Emulator> AtariEnv<M> {
    /// The number of actions.
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// Meanings of the actions.
    pub fn action_meanings(&self) -> Vec<AtariAction> {
        self.pipeline.action_meanings()
    }

    /// Remaining lives of the game.
    pub fn lives(&self) -> usize {
        self.pipeline.lives()
    }

    fn build_pipeline(config: &AtariEnvConfig<M::Config>, seed: i64) -> Result<Box<dyn Layer>> {
        let emulator = M::build(&config.emulator_config, seed)?;
        let has_fire = emulator.action_meanings().contains(&AtariAction::Fire);

        let mut layer: Box<dyn Layer> = Box::new(emulator);
        layer = Box::new(NoopReset::new(
            layer,
            config.noop_max,
            config.override_num_noops,
            seed as u64,
        )?);
        layer = Box::new(MaxAndSkip::new(layer, config.skip)?);
        layer = Box::new(EpisodeStatistics::new(layer));
        if config.episode_life {
            layer = Box::new(EpisodicLife::new(layer));
        }
        if has_fire {
            layer = Box::new(FireReset::new(layer)?);
        }
        layer = Box::new(WarpFrame::new(
            layer,
            config.height,
            config.width,
            config.grayscale,
            config.resize_filter,
        )?);
        if config.clip_rewards {
            layer = Box::new(ClipReward::new(layer));
        }
        layer = Box::new(ChannelFirst::new(layer));
        Ok(layer)
    }

    fn observe(&mut self, frame: Array3<u8>) -> Result<AtariObs> {
        match self.window.as_mut() {
            Some(window) => {
                window.push(frame)?;
                Ok(AtariObs::new(window.frames()?))
            }
            None => Ok(frame.into()),
        }
    }
}

/// Turns the statistics of a finished game into a record.
fn episode_record(info: &AtariInfo) -> Record {
    let mut record = Record::empty();
    for key in ["episode_return", "episode_length"].iter() {
        if let Some(v) = info.get(key) {
            record.insert(*key, RecordValue::Scalar(v));
        }
    }
    record
}

impl<M: Emulator> Env for AtariEnv<M> {
    type Config = AtariEnvConfig<M::Config>;
    type Obs = AtariObs;
    type Act = AtariAct;
    type Info = AtariInfo;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let pipeline = Self::build_pipeline(config, seed)?;
        let window = config.frame_stack.map(LazyFrames::new).transpose()?;
        let n_actions = pipeline.action_meanings().len();
        info!(
            "Built {} with {} actions, seed = {}",
            config.env_id, n_actions, seed
        );

        Ok(Self {
            pipeline,
            window,
            n_actions,
            phantom: PhantomData,
        })
    }

    fn reset(&mut self) -> Result<AtariObs> {
        let frame = self.pipeline.reset()?;
        match self.window.as_mut() {
            Some(window) => {
                window.fill(frame);
                Ok(AtariObs::new(window.frames()?))
            }
            None => Ok(frame.into()),
        }
    }

    fn step(&mut self, a: &AtariAct) -> Result<(Step<Self>, Record)> {
        if a.act as usize >= self.n_actions {
            bail!(
                "Action {} is out of the action set of size {}",
                a.act,
                self.n_actions
            );
        }
        let step = self.pipeline.step(a.act as usize)?;
        let record = episode_record(&step.info);
        let obs = self.observe(step.obs)?;
        let step = Step::new(
            obs,
            *a,
            step.reward,
            step.done as i8,
            0,
            step.info,
            None,
        );
        Ok((step, record))
    }
}
