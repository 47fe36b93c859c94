use crate::core::actions::worker_pool::ScheduleError;
use crate::core::data::render_parameters::ParameterError;
use crate::core::fractals::errors::KernelError;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    InvalidParameter(ParameterError),
    Kernel(KernelError),
    WorkerPanicked(String),
    ThreadPool(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(err) => write!(f, "invalid render parameters: {}", err),
            Self::Kernel(err) => write!(f, "kernel error: {}", err),
            Self::WorkerPanicked(message) => write!(f, "render worker panicked: {}", message),
            Self::ThreadPool(message) => write!(f, "could not start worker pool: {}", message),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidParameter(err) => Some(err),
            Self::Kernel(err) => Some(err),
            Self::WorkerPanicked(_) | Self::ThreadPool(_) => None,
        }
    }
}

impl From<ParameterError> for RenderError {
    fn from(err: ParameterError) -> Self {
        Self::InvalidParameter(err)
    }
}

/// Terminal result of one render call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// Every pixel of the buffer was written.
    Completed,
    /// Stopped early on request; the buffer is partially written.
    Cancelled,
    Failed(RenderError),
}

impl RenderOutcome {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<Result<(), ScheduleError>> for RenderOutcome {
    fn from(result: Result<(), ScheduleError>) -> Self {
        match result {
            Ok(()) => Self::Completed,
            Err(ScheduleError::Cancelled(_)) => Self::Cancelled,
            Err(ScheduleError::Kernel(err)) => Self::Failed(RenderError::Kernel(err)),
            Err(ScheduleError::WorkerPanicked(message)) => Self::Failed(RenderError::WorkerPanicked(message)),
            Err(ScheduleError::ThreadPool(message)) => Self::Failed(RenderError::ThreadPool(message)),
        }
    }
}

impl fmt::Display for RenderOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}
