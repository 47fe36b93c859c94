use crate::core::data::sample_result::SampleResult;
use crate::core::fractals::errors::KernelError;
use num_complex::Complex64;

/// Classifies a single point of the complex plane.
///
/// Implementations hold only immutable per-render state, so one instance is
/// shared by reference across every worker.
pub trait PointKernel: Send + Sync {
    fn sample(&self, point: Complex64) -> Result<SampleResult, KernelError>;
}
