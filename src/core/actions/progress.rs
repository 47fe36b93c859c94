use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::trace;

/// Receives whole-percent progress updates, in `0..=100`.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, percent: u8);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    #[inline]
    fn report(&self, _percent: u8) {}
}

impl<F> ProgressReporter for F
where
    F: Fn(u8) + Send + Sync,
{
    #[inline]
    fn report(&self, percent: u8) {
        self(percent)
    }
}

/// Shared work counter that forwards a report only when the integer
/// percentage advances, so a reporter sees at most 101 strictly increasing
/// values per render.
pub struct ProgressTracker<'a, P: ProgressReporter + ?Sized> {
    total_units: u64,
    completed_units: AtomicU64,
    last_percent: AtomicU8,
    report_lock: Mutex<Option<u8>>,
    reporter: &'a P,
}

impl<'a, P: ProgressReporter + ?Sized> ProgressTracker<'a, P> {
    pub fn new(total_units: u64, reporter: &'a P) -> Self {
        Self {
            total_units: total_units.max(1),
            completed_units: AtomicU64::new(0),
            last_percent: AtomicU8::new(0),
            report_lock: Mutex::new(None),
            reporter,
        }
    }

    pub fn advance(&self, units: u64) {
        let completed = self.completed_units.fetch_add(units, Ordering::AcqRel) + units;
        let percent = (u128::from(completed.min(self.total_units)) * 100
            / u128::from(self.total_units)) as u8;

        if percent < self.last_percent.load(Ordering::Relaxed) {
            return;
        }

        // Reports are issued under the lock so the reporter observes them in order.
        let mut last_reported = self.report_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if last_reported.is_some_and(|last| percent <= last) {
            return;
        }

        *last_reported = Some(percent);
        self.last_percent.store(percent, Ordering::Relaxed);
        trace!(percent, completed, total = self.total_units, "render progress");
        self.reporter.report(percent);
    }
}
