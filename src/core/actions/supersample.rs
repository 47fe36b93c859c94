use crate::core::actions::ports::colour_map::ColourMap;
use crate::core::actions::ports::point_kernel::PointKernel;
use crate::core::data::colour::Colour;
use crate::core::fractals::errors::KernelError;
use crate::core::util::coordinate_mapper::ViewTransform;

/// Per-channel running sum of sample colours.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ColourAccumulator {
    r: u32,
    g: u32,
    b: u32,
    a: u32,
    count: u32,
}

impl ColourAccumulator {
    pub fn add(&mut self, colour: Colour) {
        self.r += u32::from(colour.r);
        self.g += u32::from(colour.g);
        self.b += u32::from(colour.b);
        self.a += u32::from(colour.a);
        self.count += 1;
    }

    /// Integer mean per channel, rounded to nearest.
    #[must_use]
    pub fn mean(&self) -> Colour {
        if self.count == 0 {
            return Colour::BLACK;
        }

        let average = |sum: u32| ((sum + self.count / 2) / self.count) as u8;

        Colour {
            r: average(self.r),
            g: average(self.g),
            b: average(self.b),
            a: average(self.a),
        }
    }
}

/// Colours output pixel `(x, y)` from `factor²` evenly spaced sub-samples.
///
/// A factor of 1 samples the pixel centre and returns its colour unchanged.
pub fn supersample_pixel<K, M>(
    kernel: &K,
    colour_map: &M,
    transform: &ViewTransform,
    x: usize,
    y: usize,
    factor: usize,
) -> Result<Colour, KernelError>
where
    K: PointKernel + ?Sized,
    M: ColourMap + ?Sized,
{
    if factor <= 1 {
        let sample = kernel.sample(transform.pixel_center(x, y))?;
        return Ok(colour_map.map(sample));
    }

    let step = 1.0 / factor as f64;
    let mut accumulator = ColourAccumulator::default();

    for j in 0..factor {
        let py = y as f64 + (j as f64 + 0.5) * step;

        for i in 0..factor {
            let px = x as f64 + (i as f64 + 0.5) * step;
            let sample = kernel.sample(transform.to_plane(px, py))?;
            accumulator.add(colour_map.map(sample));
        }
    }

    Ok(accumulator.mean())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::sample_result::SampleResult;
    use num_complex::Complex64;

    /// Escapes left of the imaginary axis, interior elsewhere.
    struct HalfPlaneKernel;

    impl PointKernel for HalfPlaneKernel {
        fn sample(&self, point: Complex64) -> Result<SampleResult, KernelError> {
            if point.re < 0.0 {
                Ok(SampleResult::Escaped { iterations: 1, smooth: 1.0 })
            } else {
                Ok(SampleResult::Interior { iterations: 1 })
            }
        }
    }

    struct FailingKernel;

    impl PointKernel for FailingKernel {
        fn sample(&self, point: Complex64) -> Result<SampleResult, KernelError> {
            Err(KernelError::NonFinitePoint {
                re: point.re,
                im: point.im,
            })
        }
    }

    struct BlackWhiteMap;

    impl ColourMap for BlackWhiteMap {
        fn map(&self, sample: SampleResult) -> Colour {
            match sample {
                SampleResult::Escaped { .. } => Colour::WHITE,
                _ => Colour::BLACK,
            }
        }
    }

    fn transform() -> ViewTransform {
        // Two pixels wide: the imaginary axis runs along the shared edge.
        ViewTransform::new(2, 2, 1.0, Complex64::new(0.0, 0.0))
    }

    #[test]
    fn test_accumulator_rounds_to_nearest() {
        let mut accumulator = ColourAccumulator::default();
        accumulator.add(Colour::rgb(0, 0, 0));
        accumulator.add(Colour::rgb(1, 255, 3));

        assert_eq!(accumulator.mean(), Colour::rgb(1, 128, 2));
    }

    #[test]
    fn test_factor_one_samples_pixel_centre() {
        let left = supersample_pixel(&HalfPlaneKernel, &BlackWhiteMap, &transform(), 0, 0, 1);
        let right = supersample_pixel(&HalfPlaneKernel, &BlackWhiteMap, &transform(), 1, 0, 1);

        assert_eq!(left, Ok(Colour::WHITE));
        assert_eq!(right, Ok(Colour::BLACK));
    }

    #[test]
    fn test_uniform_pixel_unchanged_by_supersampling() {
        for factor in [2, 4] {
            let colour = supersample_pixel(&HalfPlaneKernel, &BlackWhiteMap, &transform(), 0, 1, factor);

            assert_eq!(colour, Ok(Colour::WHITE));
        }
    }

    #[test]
    fn test_edge_pixel_is_averaged() {
        // Shift the view so the axis splits pixel 0 down the middle.
        let shifted = ViewTransform::new(2, 2, 1.0, Complex64::new(0.75, 0.0));
        let colour = supersample_pixel(&HalfPlaneKernel, &BlackWhiteMap, &shifted, 0, 0, 2);

        assert_eq!(colour, Ok(Colour::rgb(128, 128, 128)));
    }

    #[test]
    fn test_kernel_error_propagates() {
        let result = supersample_pixel(&FailingKernel, &BlackWhiteMap, &transform(), 0, 0, 2);

        assert!(matches!(result, Err(KernelError::NonFinitePoint { .. })));
    }
}
