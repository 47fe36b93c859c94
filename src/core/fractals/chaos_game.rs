use crate::core::actions::cancellation::{CHAOS_CANCEL_CHECK_STEPS, CancelToken, Cancelled};
use crate::core::data::density_grid::DensityGrid;
use crate::core::util::coordinate_mapper::ViewTransform;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Steps discarded before plotting, so the orbit has settled onto the attractor.
pub const CHAOS_WARMUP_STEPS: u32 = 20;

/// Random iteration towards the vertices of a regular polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct ChaosGameKernel {
    vertices: Vec<Complex64>,
    ratio: f64,
}

impl ChaosGameKernel {
    /// Polygon of circumradius 1 centred on the origin, first vertex on top.
    #[must_use]
    pub fn new(vertex_count: u32, ratio: f64) -> Self {
        let vertices = (0..vertex_count)
            .map(|k| Complex64::from_polar(1.0, FRAC_PI_2 + TAU * f64::from(k) / f64::from(vertex_count)))
            .collect();

        Self { vertices, ratio }
    }

    #[must_use]
    pub fn vertices(&self) -> &[Complex64] {
        &self.vertices
    }

    /// Runs `steps` plotted iterations seeded with `seed`, accumulating hits
    /// into `grid` through `transform`. `on_progress` receives the number of
    /// steps completed since its previous call.
    pub fn simulate<C, F>(
        &self,
        steps: u64,
        seed: u64,
        transform: &ViewTransform,
        grid: &mut DensityGrid,
        cancel: &C,
        mut on_progress: F,
    ) -> Result<(), Cancelled>
    where
        C: CancelToken + ?Sized,
        F: FnMut(u64),
    {
        if self.vertices.is_empty() {
            return Ok(());
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut point = self.vertices[rng.gen_range(0..self.vertices.len())];

        for _ in 0..CHAOS_WARMUP_STEPS {
            point = self.step(point, &mut rng);
        }

        let mut remaining = steps;
        while remaining > 0 {
            if cancel.is_cancelled() {
                return Err(Cancelled);
            }

            let chunk = remaining.min(CHAOS_CANCEL_CHECK_STEPS);
            for _ in 0..chunk {
                point = self.step(point, &mut rng);
                let (x, y) = transform.to_screen(point);
                grid.plot(x, y);
            }

            remaining -= chunk;
            on_progress(chunk);
        }

        Ok(())
    }

    fn step(&self, point: Complex64, rng: &mut StdRng) -> Complex64 {
        let target = self.vertices[rng.gen_range(0..self.vertices.len())];
        point + (target - point) * self.ratio
    }
}
