//! Non-fatal warning channel.
//!
//! Recoverable data-shape problems (unsupported curve basis, mismatched crease
//! sharpness, unknown attribute types, ...) never abort a read or write. They
//! are always logged through `tracing`. The most recent ones are also recorded
//! here so callers can inspect them; older entries are dropped and counted.

use std::collections::VecDeque;

use parking_lot::Mutex;

/// Default number of warnings kept by a collector.
pub const DEFAULT_WARNING_CAPACITY: usize = 256;

/// A single recoverable problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    /// Where the warning came from, e.g. `"Sets"` or `"Mesh"`.
    pub context: String,
    /// Human readable description.
    pub message: String,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.message)
    }
}

#[derive(Debug, Default)]
struct Record {
    warnings: VecDeque<Warning>,
    dropped: usize,
}

/// Bounded collector of warnings for one session.
#[derive(Debug)]
pub struct Diagnostics {
    capacity: usize,
    record: Mutex<Record>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_WARNING_CAPACITY)
    }
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collector keeping at most `capacity` warnings. Zero disables recording.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            record: Mutex::new(Record::default()),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Log a warning and record it, evicting the oldest one when full.
    pub fn warn(&self, context: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(target: "scene_stage", "{}: {}", context, message);

        let mut record = self.record.lock();
        if self.capacity == 0 {
            record.dropped += 1;
            return;
        }
        if record.warnings.len() == self.capacity {
            record.warnings.pop_front();
            record.dropped += 1;
        }
        record.warnings.push_back(Warning {
            context: context.to_string(),
            message,
        });
    }

    /// Number of recorded warnings.
    pub fn len(&self) -> usize {
        self.record.lock().warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Warnings evicted or never recorded since the last [`Diagnostics::take`].
    pub fn dropped(&self) -> usize {
        self.record.lock().dropped
    }

    /// Copy of the recorded warnings, oldest first.
    pub fn warnings(&self) -> Vec<Warning> {
        self.record.lock().warnings.iter().cloned().collect()
    }

    /// Drain the recorded warnings and reset the dropped count.
    pub fn take(&self) -> Vec<Warning> {
        let mut record = self.record.lock();
        record.dropped = 0;
        record.warnings.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_and_take() {
        let d = Diagnostics::new();
        assert!(d.is_empty());
        d.warn("Curves", "Unsupported wrap \"pinned\"");
        d.warn("Mesh", "Ignoring creases with varying sharpness");
        assert_eq!(d.len(), 2);

        let taken = d.take();
        assert_eq!(taken[0].context, "Curves");
        assert_eq!(taken[1].to_string(), "Mesh: Ignoring creases with varying sharpness");
        assert!(d.is_empty());
    }

    #[test]
    fn test_record_is_bounded() {
        let d = Diagnostics::with_capacity(3);
        for i in 0..10 {
            d.warn("Mesh", format!("warning {}", i));
        }
        assert_eq!(d.len(), 3);
        assert_eq!(d.dropped(), 7);

        let messages: Vec<_> = d.warnings().into_iter().map(|w| w.message).collect();
        assert_eq!(messages, vec!["warning 7", "warning 8", "warning 9"]);

        assert_eq!(d.take().len(), 3);
        assert_eq!(d.dropped(), 0);
    }

    #[test]
    fn test_default_capacity_holds_under_repeated_reads() {
        let d = Diagnostics::new();
        for _ in 0..DEFAULT_WARNING_CAPACITY * 4 {
            d.warn("Mesh", "Ignoring creases with varying sharpness");
        }
        assert_eq!(d.len(), DEFAULT_WARNING_CAPACITY);
        assert_eq!(d.dropped(), DEFAULT_WARNING_CAPACITY * 3);
    }

    #[test]
    fn test_zero_capacity_only_counts() {
        let d = Diagnostics::with_capacity(0);
        d.warn("Sets", "Unable to add path '/' to set 's' at location '/A'");
        assert!(d.is_empty());
        assert_eq!(d.dropped(), 1);
    }
}
