use std::error::Error;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum KernelError {
    NonFinitePoint { re: f64, im: f64 },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinitePoint { re, im } => {
                write!(f, "cannot sample non-finite point ({}, {})", re, im)
            }
        }
    }
}

impl Error for KernelError {}

pub(crate) fn ensure_finite(re: f64, im: f64) -> Result<(), KernelError> {
    if re.is_finite() && im.is_finite() {
        Ok(())
    } else {
        Err(KernelError::NonFinitePoint { re, im })
    }
}
