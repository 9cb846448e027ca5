//! Training entry point.
use crate::{RunConfig, RunContext};
use anyhow::{anyhow, Result};
use log::info;
use rem_agent::rem::{Rem, RemConfig, RemModel, RemModelConfig};
use rem_atari_env::{AtariActBatch, AtariEnv, AtariEnvConfig, AtariObsBatch, Emulator};
use rem_core::{
    replay_buffer::{SimpleReplayBuffer, SimpleStepProcessor, SimpleStepProcessorConfig},
    Env as _, Trainer,
};
use std::path::PathBuf;

/// Replay buffer of a run.
pub type ReplayBuffer = SimpleReplayBuffer<AtariObsBatch, AtariActBatch>;

/// Step processor of a run on emulator `M`.
pub type StepProc<M> = SimpleStepProcessor<AtariEnv<M>, AtariObsBatch, AtariActBatch>;

/// Trains a REM agent with Q network `N` on emulator `M`.
///
/// The number of actions and the channels of observations are taken from the
/// preprocessing pipeline built from `env_config`. Checkpoints are written to
/// [`RunContext::model_dir`] and records to the recorder of `context`.
///
/// Returns the path of the last checkpoint.
pub fn run<M, N>(
    config: &RunConfig,
    env_config: AtariEnvConfig<M::Config>,
    model: N::Config,
    context: &mut RunContext,
) -> Result<PathBuf>
where
    M: Emulator,
    N: RemModel,
{
    config.validate()?;
    let env_config = env_config.env_id(config.env_id.clone());
    let n_actions = AtariEnv::<M>::build(&env_config, config.seed)?.n_actions();
    info!(
        "{}: {} actions, {} heads, strategy {}",
        config.env_id, n_actions, config.num_heads, config.transform_strategy
    );

    let model_config = RemModelConfig {
        in_channels: env_config.obs_channels(),
        n_actions,
        n_heads: config.num_heads,
        learning_rate: config.learning_rate,
        model,
    };
    let agent_config = RemConfig::new(model_config)
        .batch_size(config.batch_size)
        .discount_factor(config.gamma)
        .max_grad_norm(config.max_grad_norm)
        .transform_strategy(config.transform_strategy.clone())
        .explorer(config.explorer())
        .seed(config.seed as u64);
    let mut agent = Rem::<AtariEnv<M>, N, ReplayBuffer>::build(agent_config)?;

    let model_dir = context.model_dir().to_string_lossy().into_owned();
    let mut trainer = Trainer::<AtariEnv<M>, StepProc<M>, ReplayBuffer>::build(
        config.trainer_config(Some(model_dir)),
        env_config,
        SimpleStepProcessorConfig::default(),
        config.replay_buffer_config(),
    )?
    .with_stop_handle(&context.stop_handle());

    let checkpoint = trainer.train(&mut agent, context.recorder())?;
    info!("Finished {} after {} learning steps", context.run_name(), agent.n_opts());
    checkpoint.ok_or_else(|| anyhow!("No checkpoint was written"))
}
