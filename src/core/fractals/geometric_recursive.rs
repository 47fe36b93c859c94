use crate::core::actions::ports::point_kernel::PointKernel;
use crate::core::data::render_parameters::GeometricShape;
use crate::core::data::sample_result::SampleResult;
use crate::core::fractals::errors::{KernelError, ensure_finite};
use num_complex::Complex64;

const HALF_SQRT_3: f64 = 0.866_025_403_784_438_6;

/// Point classification against a recursively subdivided seed polygon.
///
/// Carpet: the square `[-1, 1]²` split 3×3 with the centre cell removed.
/// Triangle: the equilateral triangle with base `(-1, -√3/2)`..`(1, -√3/2)`
/// and apex `(0, √3/2)`, split into four with the middle one removed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GeometricRecursiveKernel {
    shape: GeometricShape,
    depth: u32,
}

impl GeometricRecursiveKernel {
    #[must_use]
    pub fn new(shape: GeometricShape, depth: u32) -> Self {
        Self { shape, depth }
    }

    fn removed_at(level: u32) -> SampleResult {
        SampleResult::Escaped {
            iterations: level,
            smooth: f64::from(level),
        }
    }

    fn classify_carpet(&self, point: Complex64) -> SampleResult {
        if point.re.abs() > 1.0 || point.im.abs() > 1.0 {
            return Self::removed_at(0);
        }

        // Unit-square coordinates; the far edges fold into the last cell.
        let mut u = ((point.re + 1.0) / 2.0).min(1.0 - f64::EPSILON);
        let mut v = ((point.im + 1.0) / 2.0).min(1.0 - f64::EPSILON);

        for level in 1..=self.depth {
            u *= 3.0;
            v *= 3.0;
            let (column, row) = (u.floor(), v.floor());

            if column == 1.0 && row == 1.0 {
                return Self::removed_at(level);
            }

            u -= column;
            v -= row;
        }

        SampleResult::Interior { iterations: self.depth }
    }

    fn classify_triangle(&self, point: Complex64) -> SampleResult {
        // Affine coordinates: point = A + s·(B - A) + t·(C - A).
        let mut t = (point.im + HALF_SQRT_3) / (2.0 * HALF_SQRT_3);
        let mut s = (point.re + 1.0 - t) / 2.0;

        if s < 0.0 || t < 0.0 || s + t > 1.0 {
            return Self::removed_at(0);
        }

        for level in 1..=self.depth {
            s *= 2.0;
            t *= 2.0;

            if s >= 1.0 {
                s -= 1.0;
            } else if t >= 1.0 {
                t -= 1.0;
            } else if s + t > 1.0 {
                return Self::removed_at(level);
            }
        }

        SampleResult::Interior { iterations: self.depth }
    }
}

impl PointKernel for GeometricRecursiveKernel {
    fn sample(&self, point: Complex64) -> Result<SampleResult, KernelError> {
        ensure_finite(point.re, point.im)?;

        Ok(match self.shape {
            GeometricShape::SierpinskiCarpet => self.classify_carpet(point),
            GeometricShape::SierpinskiTriangle => self.classify_triangle(point),
        })
    }
}
