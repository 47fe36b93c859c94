use crate::core::actions::cancellation::{CANCEL_CHECK_INTERVAL_ROWS, CancelToken, Cancelled};
use crate::core::actions::ports::colour_map::ColourMap;
use crate::core::actions::progress::{ProgressReporter, ProgressTracker};
use crate::core::actions::render_row_bands::carve_bands;
use crate::core::actions::supersample::ColourAccumulator;
use crate::core::actions::worker_pool::{ScheduleError, build_worker_pool, first_stop, panic_message};
use crate::core::data::colour::Colour;
use crate::core::data::density_grid::DensityGrid;
use crate::core::data::pixel_buffer::{BYTES_PER_PIXEL, PixelBuffer};
use crate::core::data::sample_result::SampleResult;
use crate::core::fractals::chaos_game::ChaosGameKernel;
use crate::core::util::coordinate_mapper::ViewTransform;
use crate::core::util::plan_row_bands::plan_row_bands;
use rayon::prelude::*;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChaosJob {
    pub transform: ViewTransform,
    pub supersample: usize,
    pub thread_count: usize,
    pub steps: u64,
    pub rng_seed: u64,
}

/// Splits `steps` over `workers`, leftovers going to the leading workers.
#[must_use]
pub fn split_step_budget(steps: u64, workers: usize) -> Vec<u64> {
    let workers = workers.max(1) as u64;
    let share = steps / workers;
    let remainder = steps % workers;

    (0..workers).map(|index| share + u64::from(index < remainder)).collect()
}

/// Budgets for the workers that actually simulate. Workers left without
/// steps are dropped so they never allocate a grid.
fn simulation_budgets(steps: u64, thread_count: usize) -> Vec<u64> {
    split_step_budget(steps, thread_count)
        .into_iter()
        .take_while(|&budget| budget > 0)
        .collect()
}

/// Renders a chaos game into `buffer`.
///
/// Each worker runs its own simulation into a private grid at supersampled
/// resolution. The grids are summed after every worker has stopped, then the
/// merged grid is coloured and averaged down to the output in row bands.
pub fn render_chaos_game<M, P, C>(
    kernel: &ChaosGameKernel,
    colour_map: &M,
    job: ChaosJob,
    buffer: &mut PixelBuffer,
    progress: &P,
    cancel: &C,
) -> Result<(), ScheduleError>
where
    M: ColourMap + ?Sized,
    P: ProgressReporter + ?Sized,
    C: CancelToken + ?Sized,
{
    let factor = job.supersample.max(1);
    let width = buffer.width();
    let height = buffer.height();
    let stride = buffer.stride();
    let sampling = ViewTransform {
        width: width * factor,
        height: height * factor,
        ..job.transform
    };
    let budgets = simulation_budgets(job.steps, job.thread_count);

    debug!(
        workers = budgets.len(),
        steps = job.steps,
        grid_width = sampling.width,
        grid_height = sampling.height,
        "planned chaos game budget"
    );

    let pool = build_worker_pool(job.thread_count)?;
    let tracker = ProgressTracker::new(job.steps + height as u64, progress);

    let grids: Vec<Result<DensityGrid, ScheduleError>> = pool.install(|| {
        budgets
            .par_iter()
            .enumerate()
            .map(|(worker_index, &budget)| {
                catch_unwind(AssertUnwindSafe(|| -> Result<DensityGrid, ScheduleError> {
                    let mut grid = DensityGrid::new(sampling.width, sampling.height);
                    let seed = job.rng_seed.wrapping_add(worker_index as u64);
                    kernel.simulate(budget, seed, &sampling, &mut grid, cancel, |steps| tracker.advance(steps))?;
                    Ok(grid)
                }))
                .unwrap_or_else(|payload| Err(ScheduleError::WorkerPanicked(panic_message(payload))))
            })
            .collect()
    });

    let mut grids = first_stop(grids)?.into_iter();
    let Some(mut merged) = grids.next() else {
        return Ok(());
    };
    for grid in grids {
        merged.merge(&grid);
    }

    let peak = merged.peak();
    let bands = plan_row_bands(height, job.thread_count);
    let tasks = carve_bands(buffer.data_mut(), &bands, stride);
    let merged = &merged;

    let results: Vec<Result<(), ScheduleError>> = pool.install(|| {
        tasks
            .into_par_iter()
            .map(|(band, bytes)| {
                catch_unwind(AssertUnwindSafe(|| -> Result<(), ScheduleError> {
                    for (row_offset, y) in band.rows().enumerate() {
                        if row_offset % CANCEL_CHECK_INTERVAL_ROWS == 0 && cancel.is_cancelled() {
                            return Err(ScheduleError::Cancelled(Cancelled));
                        }

                        let row_start = row_offset * stride;
                        let row = &mut bytes[row_start..row_start + width * BYTES_PER_PIXEL];

                        for (x, pixel) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                            let colour = downsample_cell(merged, colour_map, x, y, factor, peak);
                            pixel.copy_from_slice(&colour.to_bytes());
                        }

                        tracker.advance(1);
                    }

                    Ok(())
                }))
                .unwrap_or_else(|payload| Err(ScheduleError::WorkerPanicked(panic_message(payload))))
            })
            .collect()
    });

    first_stop(results).map(|_| ())
}

fn downsample_cell<M: ColourMap + ?Sized>(
    grid: &DensityGrid,
    colour_map: &M,
    x: usize,
    y: usize,
    factor: usize,
    peak: u32,
) -> Colour {
    let colour_at = |gx: usize, gy: usize| {
        colour_map.map(SampleResult::Density {
            hits: grid.hits(gx, gy),
            peak,
        })
    };

    if factor == 1 {
        return colour_at(x, y);
    }

    let mut accumulator = ColourAccumulator::default();
    for j in 0..factor {
        for i in 0..factor {
            accumulator.add(colour_at(x * factor + i, y * factor + j));
        }
    }

    accumulator.mean()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::cancellation::NeverCancel;
    use crate::core::actions::progress::NoProgress;
    use num_complex::Complex64;
    use std::sync::Mutex;

    /// White wherever the cell was visited at all.
    struct HitMap;

    impl ColourMap for HitMap {
        fn map(&self, sample: SampleResult) -> Colour {
            match sample {
                SampleResult::Density { hits, .. } if hits > 0 => Colour::WHITE,
                _ => Colour::BLACK,
            }
        }
    }

    fn job(size: usize, steps: u64, thread_count: usize, supersample: usize) -> ChaosJob {
        ChaosJob {
            transform: ViewTransform::new(size, size, 1.0, Complex64::new(0.0, 0.0)),
            supersample,
            thread_count,
            steps,
            rng_seed: 42,
        }
    }

    fn lit_pixels(buffer: &PixelBuffer) -> usize {
        buffer
            .rows()
            .flat_map(|row| row.chunks(BYTES_PER_PIXEL))
            .filter(|px| px[0] > 0)
            .count()
    }

    #[test]
    fn test_budget_split_gives_remainder_to_leading_workers() {
        assert_eq!(split_step_budget(10, 4), vec![3, 3, 2, 2]);
        assert_eq!(split_step_budget(2, 4), vec![1, 1, 0, 0]);
        assert_eq!(split_step_budget(9, 3).iter().sum::<u64>(), 9);
    }

    #[test]
    fn test_idle_workers_get_no_simulation() {
        assert_eq!(simulation_budgets(3, 8), vec![1, 1, 1]);
        assert_eq!(simulation_budgets(10, 4), vec![3, 3, 2, 2]);
        assert!(simulation_budgets(0, 4).is_empty());
    }

    #[test]
    fn test_more_threads_than_steps_still_renders() {
        let kernel = ChaosGameKernel::new(3, 0.5);
        let mut buffer = PixelBuffer::new(16, 16).unwrap();

        render_chaos_game(&kernel, &HitMap, job(16, 3, 8, 4), &mut buffer, &NoProgress, &NeverCancel).unwrap();

        let lit = lit_pixels(&buffer);
        assert!((1..=3).contains(&lit));
    }

    #[test]
    fn test_single_worker_is_reproducible() {
        let kernel = ChaosGameKernel::new(3, 0.5);
        let mut a = PixelBuffer::new(40, 40).unwrap();
        let mut b = PixelBuffer::new(40, 40).unwrap();

        render_chaos_game(&kernel, &HitMap, job(40, 20_000, 1, 1), &mut a, &NoProgress, &NeverCancel).unwrap();
        render_chaos_game(&kernel, &HitMap, job(40, 20_000, 1, 1), &mut b, &NoProgress, &NeverCancel).unwrap();

        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_coverage_converges_with_budget() {
        let kernel = ChaosGameKernel::new(3, 0.5);
        let coverage = |steps: u64| {
            let mut buffer = PixelBuffer::new(48, 48).unwrap();
            render_chaos_game(&kernel, &HitMap, job(48, steps, 4, 1), &mut buffer, &NoProgress, &NeverCancel)
                .unwrap();
            lit_pixels(&buffer)
        };

        let small = coverage(2_000);
        let medium = coverage(200_000);
        let large = coverage(800_000);

        assert!(small <= medium);
        assert!(medium <= large);
        assert!(large > 0);
        assert!(large - medium <= large / 20);
    }

    #[test]
    fn test_supersampled_grid_downsamples_to_output() {
        let kernel = ChaosGameKernel::new(3, 0.5);
        let mut buffer = PixelBuffer::new(24, 24).unwrap();
        let result = render_chaos_game(&kernel, &HitMap, job(24, 100_000, 2, 2), &mut buffer, &NoProgress, &NeverCancel);

        assert!(result.is_ok());
        assert!(lit_pixels(&buffer) > 0);
        assert!(buffer.rows().all(|row| row.chunks(4).all(|px| px[3] == 255)));
    }

    #[test]
    fn test_cancelled_before_merge_leaves_buffer_untouched() {
        let kernel = ChaosGameKernel::new(3, 0.5);
        let mut buffer = PixelBuffer::new(16, 16).unwrap();
        let cancel = || true;
        let result = render_chaos_game(&kernel, &HitMap, job(16, 1_000_000, 2, 1), &mut buffer, &NoProgress, &cancel);

        assert_eq!(result, Err(ScheduleError::Cancelled(Cancelled)));
        assert!(buffer.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_progress_reaches_100() {
        let kernel = ChaosGameKernel::new(5, 0.38);
        let mut buffer = PixelBuffer::new(16, 16).unwrap();
        let seen = Mutex::new(Vec::new());
        let progress = |percent: u8| seen.lock().unwrap().push(percent);

        render_chaos_game(&kernel, &HitMap, job(16, 50_000, 3, 1), &mut buffer, &progress, &NeverCancel).unwrap();

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
