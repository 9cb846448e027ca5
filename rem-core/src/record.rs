//! Types and traits for recording training metrics.
//!
//! A [`Record`] is a set of named values produced by environments, agents and
//! the [`Trainer`](crate::Trainer). Records are handed to a [`Recorder`], the
//! metrics sink of a run, which may write them to a file, a TensorBoard log or
//! simply keep them in memory.
//!
//! ```rust
//! use rem_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("env_steps", RecordValue::Scalar(100.0));
//! record.insert("epsilon", RecordValue::Scalar(0.5));
//! assert_eq!(record.get_scalar("epsilon").unwrap(), 0.5);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
