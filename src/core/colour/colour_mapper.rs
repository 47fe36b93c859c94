use crate::core::actions::ports::colour_map::ColourMap;
use crate::core::data::colour::Colour;
use crate::core::data::palette::Palette;
use crate::core::data::render_parameters::ColourMode;
use crate::core::data::sample_result::SampleResult;

const CONVERGED_MAX_DARKENING: f64 = 0.75;

/// Palette lookup for every kind of sample.
///
/// The palette's gradient is resampled once at construction, so mapping a
/// sample is a table lookup plus at most one blend.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteColourMapper {
    entries: Vec<Colour>,
    interior: Colour,
    mode: ColourMode,
    max_iterations: u32,
    root_count: usize,
}

impl PaletteColourMapper {
    #[must_use]
    pub fn new(palette: &Palette, mode: ColourMode, max_iterations: u32, root_count: usize) -> Self {
        Self {
            entries: palette.entries(),
            interior: palette.interior(),
            mode,
            max_iterations,
            root_count,
        }
    }

    fn entry(&self, index: usize) -> Colour {
        self.entries[index % self.entries.len()]
    }

    /// Colour at a continuous palette index, honouring the colour mode.
    fn at_index(&self, index: f64) -> Colour {
        let index = if index.is_finite() { index.max(0.0) } else { 0.0 };
        let base = index.floor() as usize;

        match self.mode {
            ColourMode::Discrete => self.entry(base),
            ColourMode::Smooth => self.entry(base).lerp(self.entry(base + 1), index.fract()),
        }
    }

    fn converged(&self, root: usize, iterations: u32) -> Colour {
        if self.root_count == 0 {
            return self.interior;
        }

        let hue = root as f64 / self.root_count as f64 * 360.0;
        let speed = f64::from(iterations) / f64::from(self.max_iterations.max(1));

        Colour::from_hue(hue).darken(1.0 - CONVERGED_MAX_DARKENING * speed.min(1.0))
    }

    fn density(&self, hits: u32, peak: u32) -> Colour {
        if hits == 0 || peak == 0 {
            return self.interior;
        }

        let t = (1.0 + f64::from(hits)).ln() / (1.0 + f64::from(peak)).ln();
        let last = (self.entries.len() - 1) as f64;

        self.at_index(t.min(1.0) * last)
    }
}

impl ColourMap for PaletteColourMapper {
    fn map(&self, sample: SampleResult) -> Colour {
        match sample {
            SampleResult::Escaped { iterations, smooth } => match self.mode {
                ColourMode::Discrete => self.entry(iterations as usize),
                ColourMode::Smooth => self.at_index(smooth),
            },
            SampleResult::Interior { .. } | SampleResult::NoRoot => self.interior,
            SampleResult::Converged { root, iterations } => self.converged(root, iterations),
            SampleResult::Density { hits, peak } => self.density(hits, peak),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Colour = Colour::rgb(255, 0, 0);
    const GREEN: Colour = Colour::rgb(0, 255, 0);
    const BLUE: Colour = Colour::rgb(0, 0, 255);
    const INTERIOR: Colour = Colour::rgb(1, 2, 3);

    fn mapper(mode: ColourMode) -> PaletteColourMapper {
        let palette = Palette::new(vec![RED, GREEN, BLUE], INTERIOR, 3).unwrap();
        PaletteColourMapper::new(&palette, mode, 100, 3)
    }

    #[test]
    fn test_discrete_wraps_around_cycle() {
        let mapper = mapper(ColourMode::Discrete);

        assert_eq!(mapper.map(SampleResult::Escaped { iterations: 1, smooth: 1.0 }), GREEN);
        assert_eq!(mapper.map(SampleResult::Escaped { iterations: 5, smooth: 5.0 }), BLUE);
    }

    #[test]
    fn test_smooth_blends_neighbouring_entries() {
        let mapper = mapper(ColourMode::Smooth);

        assert_eq!(
            mapper.map(SampleResult::Escaped { iterations: 2, smooth: 0.5 }),
            RED.lerp(GREEN, 0.5)
        );
        // Index 2 blends back into index 0.
        assert_eq!(
            mapper.map(SampleResult::Escaped { iterations: 3, smooth: 2.25 }),
            BLUE.lerp(RED, 0.25)
        );
    }

    #[test]
    fn test_smooth_at_whole_index_equals_discrete() {
        let smooth = mapper(ColourMode::Smooth);
        let discrete = mapper(ColourMode::Discrete);
        let sample = SampleResult::Escaped { iterations: 4, smooth: 4.0 };

        assert_eq!(smooth.map(sample), discrete.map(sample));
    }

    #[test]
    fn test_non_escaping_samples_use_interior_colour() {
        let mapper = mapper(ColourMode::Smooth);

        assert_eq!(mapper.map(SampleResult::Interior { iterations: 100 }), INTERIOR);
        assert_eq!(mapper.map(SampleResult::NoRoot), INTERIOR);
        assert_eq!(mapper.map(SampleResult::Density { hits: 0, peak: 10 }), INTERIOR);
    }

    #[test]
    fn test_converged_hue_per_root() {
        let mapper = mapper(ColourMode::Smooth);

        assert_eq!(
            mapper.map(SampleResult::Converged { root: 0, iterations: 0 }),
            Colour::rgb(255, 0, 0)
        );
        assert_eq!(
            mapper.map(SampleResult::Converged { root: 1, iterations: 0 }),
            Colour::rgb(0, 255, 0)
        );
    }

    #[test]
    fn test_slow_convergence_is_darker() {
        let mapper = mapper(ColourMode::Smooth);
        let slow = mapper.map(SampleResult::Converged { root: 0, iterations: 100 });

        assert_eq!(slow, Colour::rgb(64, 0, 0));
    }

    #[test]
    fn test_density_peak_maps_to_last_entry() {
        let mapper = mapper(ColourMode::Discrete);

        assert_eq!(mapper.map(SampleResult::Density { hits: 10, peak: 10 }), BLUE);
        assert_eq!(mapper.map(SampleResult::Density { hits: 1, peak: 1000 }), RED);
    }
}
