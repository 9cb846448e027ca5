use anyhow::Result;
use rem_atari_env::{
    util::test::{EmulatorEvent, ScriptedEmulator, ScriptedEmulatorConfig},
    AtariAct, AtariAction, AtariEnv, AtariEnvConfig,
};
use rem_core::Env as _;
use std::sync::Arc;

type Env = AtariEnv<ScriptedEmulator>;

fn no_fire() -> Vec<AtariAction> {
    vec![AtariAction::Noop, AtariAction::Right, AtariAction::Left]
}

#[test]
fn test_observation_shapes() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = AtariEnvConfig::new(ScriptedEmulatorConfig::default().rewards(vec![-3.0, 0.0, 5.0]));
    let mut env = Env::build(&config, 42)?;
    assert_eq!(env.n_actions(), 4);

    let obs = env.reset()?;
    assert_eq!(obs.shape(), &[4, 84, 84]);
    for _ in 0..10 {
        let (step, _) = env.step(&AtariAct::new(2))?;
        assert_eq!(step.obs.shape(), &[4, 84, 84]);
        assert!([-1.0, 0.0, 1.0].contains(&step.reward));
        assert!(step.info.get("tick").is_some());
    }

    let config = config.frame_stack(None).grayscale(false).frame_size(42, 42);
    let mut env = Env::build(&config, 42)?;
    assert_eq!(env.reset()?.shape(), &[3, 42, 42]);
    Ok(())
}

#[test]
fn test_episode_statistics_are_recorded_at_game_end() -> Result<()> {
    let emulator_config = ScriptedEmulatorConfig::default()
        .action_meanings(no_fire())
        .rewards(vec![2.0])
        .episode_len(12);
    let config = AtariEnvConfig::new(emulator_config).override_num_noops(1);
    let mut env = Env::build(&config, 0)?;
    env.reset()?;

    // One of the 12 ticks is taken by the no-op after reset.
    for _ in 0..2 {
        let (step, record) = env.step_with_reset(&AtariAct::new(1))?;
        assert_eq!(step.reward, 1.0);
        assert!(!step.is_done());
        assert!(record.is_empty());
    }
    let (step, record) = env.step_with_reset(&AtariAct::new(1))?;
    assert!(step.is_done());
    assert!(step.init_obs.is_some());
    assert_eq!(record.get_scalar("episode_return")?, 22.0);
    assert_eq!(record.get_scalar("episode_length")?, 3.0);
    Ok(())
}

#[test]
fn test_life_loss_ends_episode_but_not_game() -> Result<()> {
    let emulator_config = ScriptedEmulatorConfig::default()
        .action_meanings(no_fire())
        .lives(vec![3, 3, 3, 2])
        .episode_len(10);
    let log = emulator_config.log.clone();
    let config = AtariEnvConfig::new(emulator_config)
        .override_num_noops(1)
        .skip(1);
    let mut env = Env::build(&config, 0)?;
    env.reset()?;

    let (step, _) = env.step(&AtariAct::new(1))?;
    assert_eq!(step.is_terminated, 0);
    let (step, record) = env.step(&AtariAct::new(1))?;
    assert_eq!(step.is_terminated, 1);
    assert!(record.is_empty());
    assert_eq!(env.lives(), 2);

    log.clear();
    env.reset()?;
    assert_eq!(log.events(), vec![EmulatorEvent::Step(0)]);
    Ok(())
}

#[test]
fn test_fire_reset_is_installed_for_games_with_fire() -> Result<()> {
    let emulator_config = ScriptedEmulatorConfig::default();
    let log = emulator_config.log.clone();
    let config = AtariEnvConfig::new(emulator_config)
        .override_num_noops(1)
        .skip(1);
    let mut env = Env::build(&config, 0)?;
    env.reset()?;
    assert_eq!(
        log.events(),
        vec![
            EmulatorEvent::Reset,
            EmulatorEvent::Step(0),
            EmulatorEvent::Step(1),
            EmulatorEvent::Step(2)
        ]
    );
    Ok(())
}

#[test]
fn test_invalid_action_is_rejected() -> Result<()> {
    let config = AtariEnvConfig::new(ScriptedEmulatorConfig::default().action_meanings(no_fire()));
    let mut env = Env::build(&config, 0)?;
    env.reset()?;
    assert!(env.step(&AtariAct::new(3)).is_err());
    Ok(())
}

#[test]
fn test_stacked_observations_share_frames() -> Result<()> {
    let emulator_config = ScriptedEmulatorConfig::default()
        .action_meanings(no_fire())
        .frame_size(8, 8);
    let config = AtariEnvConfig::new(emulator_config)
        .override_num_noops(1)
        .skip(1)
        .frame_size(4, 4);
    let mut env = Env::build(&config, 0)?;

    let obs = env.reset()?;
    assert_eq!(obs.frames.len(), 4);
    assert!(obs.frames.iter().all(|f| Arc::ptr_eq(f, &obs.frames[0])));

    let (step, _) = env.step(&AtariAct::new(0))?;
    let next = step.obs;
    for i in 0..3 {
        assert!(Arc::ptr_eq(&obs.frames[i + 1], &next.frames[i]));
    }
    assert!(!Arc::ptr_eq(&next.frames[2], &next.frames[3]));

    // The flat array is the frames along the channel axis, the newest last.
    let arr = next.to_array3()?;
    assert_eq!(arr.shape(), &[4, 4, 4]);
    assert_eq!(arr.slice(ndarray::s![3.., .., ..]), *next.frames[3]);
    Ok(())
}

#[test]
fn test_step_before_reset_fails_with_frame_stack() -> Result<()> {
    let config = AtariEnvConfig::new(ScriptedEmulatorConfig::default().action_meanings(no_fire()))
        .override_num_noops(1);
    let mut env = Env::build(&config, 0)?;
    assert!(env.step(&AtariAct::new(0)).is_err());
    Ok(())
}
