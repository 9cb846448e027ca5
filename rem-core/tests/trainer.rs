use anyhow::Result;
use rem_core::{
    record::{BufferedRecorder, Record, RecordValue},
    replay_buffer::{
        SimpleReplayBuffer, SimpleReplayBufferConfig, SimpleStepProcessor,
        SimpleStepProcessorConfig,
    },
    Act, Agent, Env, Obs, Policy, ReplayBufferBase, Sampler, Step, StepProcessor, Trainer,
    TrainerConfig,
};
use std::path::{Path, PathBuf};
use tempdir::TempDir;

const EPISODE_LEN: i32 = 7;

#[derive(Clone, Debug)]
struct CountObs(i32);

impl Obs for CountObs {}

impl From<CountObs> for Vec<i32> {
    fn from(obs: CountObs) -> Self {
        vec![obs.0]
    }
}

#[derive(Clone, Debug)]
struct CountAct(i32);

impl Act for CountAct {}

impl From<CountAct> for Vec<i32> {
    fn from(act: CountAct) -> Self {
        vec![act.0]
    }
}

/// Counts up and ends an episode every `EPISODE_LEN` steps.
struct CountEnv {
    t: i32,
}

impl Env for CountEnv {
    type Config = ();
    type Obs = CountObs;
    type Act = CountAct;
    type Info = ();

    fn build(_config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self { t: 0 })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        self.t += 1;
        let is_terminated = (self.t == EPISODE_LEN) as i8;
        let record = match is_terminated {
            1 => Record::from_scalar("episode_length", self.t as f32),
            _ => Record::empty(),
        };
        let step = Step::new(CountObs(self.t), a.clone(), 1.0, is_terminated, 0, (), None);
        Ok((step, record))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.t = 0;
        Ok(CountObs(0))
    }
}

type Buffer = SimpleReplayBuffer<Vec<i32>, Vec<i32>>;

#[derive(Default)]
struct CountingAgent {
    env_steps: usize,
    n_samples: usize,
    opt_steps: Vec<usize>,
    n_syncs: usize,
    n_saves: usize,
    train: bool,
}

impl Policy<CountEnv> for CountingAgent {
    fn sample(&mut self, _obs: &CountObs) -> Result<CountAct> {
        self.n_samples += 1;
        Ok(CountAct(0))
    }
}

impl Agent<CountEnv, Buffer> for CountingAgent {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn env_steps(&self) -> usize {
        self.env_steps
    }

    fn set_env_steps(&mut self, env_steps: usize) {
        self.env_steps = env_steps;
    }

    fn opt_with_record(&mut self, buffer: &mut Buffer) -> Result<Record> {
        let batch = buffer.batch(4)?;
        assert!(batch.ix_sample.iter().all(|ix| *ix < self.n_samples));
        self.opt_steps.push(self.env_steps);
        Ok(Record::from_scalar("td_loss", 0.5))
    }

    fn sync_target(&mut self) -> Result<()> {
        self.n_syncs += 1;
        Ok(())
    }

    fn save_params(&self, path: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(path)?;
        let path = path.join("checkpoint.txt");
        std::fs::write(&path, format!("{}", self.env_steps))?;
        Ok(path)
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let step = std::fs::read_to_string(path.join("checkpoint.txt"))?;
        self.env_steps = step.trim().parse()?;
        Ok(())
    }
}

type CountTrainer = Trainer<CountEnv, SimpleStepProcessor<CountEnv, Vec<i32>, Vec<i32>>, Buffer>;

fn trainer(config: TrainerConfig) -> Result<CountTrainer> {
    Trainer::build(
        config,
        (),
        SimpleStepProcessorConfig::default(),
        SimpleReplayBufferConfig::default().capacity(1000),
    )
}

#[test]
fn test_learning_and_sync_schedule() -> Result<()> {
    let config = TrainerConfig::default()
        .max_steps(50)
        .warmup_period(10)
        .opt_interval(5)
        .sync_interval(10)
        .record_interval(10);
    let mut trainer = trainer(config)?;
    let mut agent = CountingAgent::default();
    let mut recorder = BufferedRecorder::new();

    let checkpoint = trainer.train(&mut agent, &mut recorder)?;

    assert!(checkpoint.is_none());
    assert!(agent.is_train());
    assert_eq!(agent.n_samples, 50);
    assert_eq!(agent.opt_steps, vec![10, 15, 20, 25, 30, 35, 40, 45]);
    assert_eq!(agent.n_syncs, 4);

    let losses = recorder
        .iter()
        .filter(|r| r.get("td_loss").is_some())
        .map(|r| r.get_scalar("env_steps"))
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(losses, vec![10.0, 20.0, 30.0, 40.0]);

    let episodes = recorder
        .iter()
        .filter(|r| r.get("episode_length").is_some())
        .count();
    assert_eq!(episodes, 50 / EPISODE_LEN as usize);
    Ok(())
}

#[test]
fn test_saves_on_interval_and_at_the_end() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let model_dir = dir.path().join("model");
    let config = TrainerConfig::default()
        .max_steps(30)
        .warmup_period(100)
        .save_interval(20)
        .model_dir(model_dir.to_string_lossy());
    let mut trainer = trainer(config)?;
    let mut agent = CountingAgent::default();
    let mut recorder = BufferedRecorder::new();

    let checkpoint = trainer.train(&mut agent, &mut recorder)?;

    let checkpoint = checkpoint.ok_or_else(|| anyhow::anyhow!("no checkpoint"))?;
    assert_eq!(checkpoint, model_dir.join("checkpoint.txt"));
    assert_eq!(std::fs::read_to_string(&checkpoint)?, "30");
    assert!(agent.opt_steps.is_empty());
    Ok(())
}

#[test]
fn test_stop_flag_ends_loop_after_current_step() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let config = TrainerConfig::default()
        .max_steps(1000)
        .model_dir(dir.path().to_string_lossy());
    let mut trainer = trainer(config)?;
    let handle = trainer.stop_handle();
    handle.stop();
    assert!(handle.is_stopped());

    let mut agent = CountingAgent::default();
    let mut recorder = BufferedRecorder::new();
    let checkpoint = trainer.train(&mut agent, &mut recorder)?;

    assert_eq!(agent.n_samples, 1);
    assert!(checkpoint.is_some());
    Ok(())
}

#[test]
fn test_record_values_are_scalars() -> Result<()> {
    let mut trainer = trainer(TrainerConfig::default().max_steps(EPISODE_LEN as usize))?;
    let mut agent = CountingAgent::default();
    let mut recorder = BufferedRecorder::new();
    trainer.train(&mut agent, &mut recorder)?;

    let record = recorder
        .iter()
        .find(|r| r.get("episode_length").is_some())
        .ok_or_else(|| anyhow::anyhow!("no episode record"))?;
    assert!(matches!(
        record.get("episode_length"),
        Some(RecordValue::Scalar(v)) if *v == EPISODE_LEN as f32
    ));
    Ok(())
}

#[test]
fn test_resumes_from_restored_step() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let model_dir = dir.path().join("model");
    let config = TrainerConfig::default()
        .max_steps(20)
        .warmup_period(10)
        .opt_interval(5)
        .sync_interval(10)
        .record_interval(10)
        .model_dir(model_dir.to_string_lossy());
    let mut agent = CountingAgent::default();
    trainer(config.clone())?.train(&mut agent, &mut BufferedRecorder::new())?;
    assert_eq!(std::fs::read_to_string(model_dir.join("checkpoint.txt"))?, "20");

    let mut resumed = CountingAgent::default();
    resumed.load_params(&model_dir)?;
    assert_eq!(resumed.env_steps(), 20);

    let mut recorder = BufferedRecorder::new();
    let checkpoint = trainer(config.max_steps(50))?.train(&mut resumed, &mut recorder)?;

    // Only the remaining steps are taken and the schedule continues from step 20.
    assert_eq!(resumed.n_samples, 30);
    assert_eq!(resumed.opt_steps, vec![20, 25, 30, 35, 40, 45]);
    assert_eq!(resumed.n_syncs, 3);
    assert_eq!(resumed.env_steps(), 50);
    let checkpoint = checkpoint.ok_or_else(|| anyhow::anyhow!("no checkpoint"))?;
    assert_eq!(std::fs::read_to_string(&checkpoint)?, "50");

    let losses = recorder
        .iter()
        .filter(|r| r.get("td_loss").is_some())
        .map(|r| r.get_scalar("env_steps"))
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(losses, vec![20.0, 30.0, 40.0]);
    Ok(())
}

#[test]
fn test_transition_after_episode_end_starts_from_reset_observation() -> Result<()> {
    let env = CountEnv::build(&(), 0)?;
    let step_proc = SimpleStepProcessor::<CountEnv, Vec<i32>, Vec<i32>>::build(
        &SimpleStepProcessorConfig::default(),
    );
    let mut sampler = Sampler::new(env, step_proc);
    let mut buffer = Buffer::build(&SimpleReplayBufferConfig::default().capacity(100));
    let mut agent = CountingAgent::default();
    for _ in 0..(EPISODE_LEN + 2) {
        sampler.sample_and_push(&mut agent, &mut buffer)?;
    }
    assert_eq!(sampler.n_episodes(), 1);

    let last = EPISODE_LEN as usize - 1;
    let batch = buffer.batch_at(&[last, last + 1])?;
    assert_eq!(batch.obs, vec![EPISODE_LEN - 1, 0]);
    assert_eq!(batch.next_obs, vec![EPISODE_LEN, 1]);
    assert_eq!(batch.is_terminated, vec![1, 0]);
    Ok(())
}
