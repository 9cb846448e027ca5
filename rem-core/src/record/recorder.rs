use super::Record;

/// Writes a record to an output destination with [`Recorder::write`].
///
/// This is the metrics sink of a run. Writing is fire-and-forget: a recorder
/// never reports failure to the caller.
pub trait Recorder {
    /// Write a record to the [`Recorder`].
    fn write(&mut self, record: Record);

    /// Flushes buffered records, if any. Called once when a run finishes.
    fn flush(&mut self) {}
}

impl<R: Recorder + ?Sized> Recorder for Box<R> {
    fn write(&mut self, record: Record) {
        (**self).write(record)
    }

    fn flush(&mut self) {
        (**self).flush()
    }
}
