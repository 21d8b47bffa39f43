//! Progress delivery for extraction runs.

/// Observer-facing sink for run progress percentages.
///
/// Implemented for any `Fn(u8)` closure, so callers can pass `&|percent| ...`
/// directly.
pub trait ProgressSink: Send + Sync {
    /// Deliver a progress percentage in `0..=100`.
    fn publish(&self, percent: u8);
}

impl<F> ProgressSink for F
where
    F: Fn(u8) + Send + Sync,
{
    fn publish(&self, percent: u8) {
        self(percent)
    }
}

/// A sink that discards every update.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn publish(&self, _percent: u8) {}
}

/// Enforces the delivery contract on top of a raw sink.
///
/// Published percentages are monotonically non-decreasing, duplicates are
/// suppressed, and the terminal 100 is delivered exactly once per completed
/// run. An aborted run simply stops reporting at its last published value.
pub struct ProgressTracker<'a> {
    sink: &'a dyn ProgressSink,
    last: Option<u8>,
}

impl<'a> ProgressTracker<'a> {
    /// Wrap `sink` for one run.
    pub fn new(sink: &'a dyn ProgressSink) -> Self {
        Self { sink, last: None }
    }

    /// Report `completed` of `total` candidates done.
    pub fn completed(&mut self, completed: usize, total: usize) {
        let percent = if total == 0 {
            100
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };
        self.advance(percent);
    }

    /// Publish the terminal 100 for an empty or finished run.
    pub fn finish(&mut self) {
        self.advance(100);
    }

    fn advance(&mut self, percent: u8) {
        let percent = percent.min(100);
        if self.last.is_none_or(|last| percent > last) {
            self.sink.publish(percent);
            self.last = Some(percent);
        }
    }
}
