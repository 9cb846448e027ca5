//! TensorBoard backend of [`Recorder`].
use log::warn;
use rem_core::record::{Record, RecordValue, Recorder};
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

const STEP_KEY: &str = "env_steps";

/// Writes scalars of records to TFRecord event files.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
}

impl TensorboardRecorder {
    /// Constructs a [`TensorboardRecorder`].
    ///
    /// Event files will be stored in `logdir`. The step of a record is read from its
    /// `env_steps` value.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Writes [`RecordValue::Scalar`] values of `record` under their keys.
    ///
    /// Other variants are ignored, as well as records without the step key.
    fn write(&mut self, record: Record) {
        let step = match record.get(STEP_KEY) {
            Some(RecordValue::Scalar(v)) => *v as usize,
            _ => {
                warn!("Record without scalar {:?} is discarded", STEP_KEY);
                return;
            }
        };

        for (k, v) in record.iter() {
            if k == STEP_KEY {
                continue;
            }
            if let RecordValue::Scalar(v) = v {
                self.writer.add_scalar(k, *v, step);
            }
        }
    }

    fn flush(&mut self) {
        self.writer.flush();
    }
}
