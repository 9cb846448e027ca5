//! Run-wide state.
use crate::RunConfig;
use anyhow::Result;
use chrono::Local;
use log::info;
use rem_core::{record::Recorder, StopHandle};
use rem_tensorboard::TensorboardRecorder;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Holds the seed, the run directory, the recorder and the stop flag of a run.
///
/// It is created at the start of a run and closed at the end, which flushes the
/// recorder.
pub struct RunContext {
    seed: i64,
    run_name: String,
    run_dir: PathBuf,
    recorder: Box<dyn Recorder>,
    stop: StopHandle,
}

impl RunContext {
    /// Creates `{config.run_dir}/{run_name}`, dumps `config.yaml` in it and opens a
    /// [`TensorboardRecorder`] there.
    pub fn new(config: &RunConfig) -> Result<Self> {
        let run_name = config.run_name(Local::now().timestamp());
        let run_dir = Path::new(&config.run_dir).join(&run_name);
        fs::create_dir_all(&run_dir)?;
        let recorder = Box::new(TensorboardRecorder::new(&run_dir));
        Self::with_recorder(config, run_name, run_dir, recorder)
    }

    /// Creates a context writing records to `recorder`.
    pub fn with_recorder(
        config: &RunConfig,
        run_name: impl Into<String>,
        run_dir: impl Into<PathBuf>,
        recorder: Box<dyn Recorder>,
    ) -> Result<Self> {
        let run_dir = run_dir.into();
        fs::create_dir_all(&run_dir)?;
        config.save(run_dir.join("config.yaml"))?;
        let run_name = run_name.into();
        info!("Run {} in {:?}", run_name, run_dir);

        Ok(Self {
            seed: config.seed,
            run_name,
            run_dir,
            recorder,
            stop: StopHandle::default(),
        })
    }

    /// Seed of the run.
    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Name of the run.
    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    /// Directory of the run.
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Directory of checkpoints.
    pub fn model_dir(&self) -> PathBuf {
        self.run_dir.join("model")
    }

    /// The recorder of the run.
    pub fn recorder(&mut self) -> &mut dyn Recorder {
        self.recorder.as_mut()
    }

    /// A handle raising the stop flag of the run, e.g. from a signal handler.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Flushes the recorder and ends the run.
    pub fn close(mut self) {
        self.recorder.flush();
        info!("Closed run {}", self.run_name);
    }
}
