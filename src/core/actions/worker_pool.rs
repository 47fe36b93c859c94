use crate::core::actions::cancellation::Cancelled;
use crate::core::fractals::errors::KernelError;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleError {
    Cancelled(Cancelled),
    Kernel(KernelError),
    WorkerPanicked(String),
    ThreadPool(String),
}

impl ScheduleError {
    /// Failures outrank cancellation when several workers stop at once.
    pub(crate) fn is_failure(&self) -> bool {
        !matches!(self, Self::Cancelled(_))
    }
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled(c) => write!(f, "{}", c),
            Self::Kernel(err) => write!(f, "kernel error: {}", err),
            Self::WorkerPanicked(message) => write!(f, "render worker panicked: {}", message),
            Self::ThreadPool(message) => write!(f, "could not start worker pool: {}", message),
        }
    }
}

impl Error for ScheduleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Cancelled(c) => Some(c),
            Self::Kernel(err) => Some(err),
            Self::WorkerPanicked(_) | Self::ThreadPool(_) => None,
        }
    }
}

impl From<Cancelled> for ScheduleError {
    fn from(cancelled: Cancelled) -> Self {
        Self::Cancelled(cancelled)
    }
}

impl From<KernelError> for ScheduleError {
    fn from(err: KernelError) -> Self {
        Self::Kernel(err)
    }
}

pub(crate) fn build_worker_pool(thread_count: usize) -> Result<ThreadPool, ScheduleError> {
    ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .thread_name(|index| format!("render-worker-{}", index))
        .build()
        .map_err(|err| ScheduleError::ThreadPool(err.to_string()))
}

pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Picks the outcome to report once every worker has returned: the first
/// failure if any, otherwise cancellation if any worker observed it.
pub(crate) fn first_stop<T>(results: Vec<Result<T, ScheduleError>>) -> Result<Vec<T>, ScheduleError> {
    let mut values = Vec::with_capacity(results.len());
    let mut cancelled = None;

    for result in results {
        match result {
            Ok(value) => values.push(value),
            Err(err) if err.is_failure() => return Err(err),
            Err(err) => cancelled = Some(err),
        }
    }

    match cancelled {
        Some(err) => Err(err),
        None => Ok(values),
    }
}
