use crate::core::data::colour::Colour;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

pub const DEFAULT_CYCLE_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    NoStops,
    ZeroCycleLength,
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStops => write!(f, "palette must contain at least one colour stop"),
            Self::ZeroCycleLength => write!(f, "palette cycle length must be greater than zero"),
        }
    }
}

impl Error for PaletteError {}

/// Cyclic colour gradient plus the colour used for interior points.
///
/// The stops are spread evenly around the cycle and the last stop blends back
/// into the first, so iteration counts wrap without a seam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    stops: Vec<Colour>,
    interior: Colour,
    cycle_length: usize,
}

impl Palette {
    pub fn new(stops: Vec<Colour>, interior: Colour, cycle_length: usize) -> Result<Self, PaletteError> {
        let palette = Self {
            stops,
            interior,
            cycle_length,
        };
        palette.validate()?;

        Ok(palette)
    }

    /// Re-checks invariants; needed for palettes that came through serde.
    pub fn validate(&self) -> Result<(), PaletteError> {
        if self.stops.is_empty() {
            return Err(PaletteError::NoStops);
        }

        if self.cycle_length == 0 {
            return Err(PaletteError::ZeroCycleLength);
        }

        Ok(())
    }

    #[must_use]
    pub fn stops(&self) -> &[Colour] {
        &self.stops
    }

    #[must_use]
    pub fn interior(&self) -> Colour {
        self.interior
    }

    #[must_use]
    pub fn cycle_length(&self) -> usize {
        self.cycle_length
    }

    /// Resamples the gradient into `cycle_length` lookup entries.
    #[must_use]
    pub fn entries(&self) -> Vec<Colour> {
        let stop_count = self.stops.len();

        (0..self.cycle_length)
            .map(|i| {
                let position = (i * stop_count) as f64 / self.cycle_length as f64;
                let index = position.floor() as usize % stop_count;
                let next = (index + 1) % stop_count;
                self.stops[index].lerp(self.stops[next], position.fract())
            })
            .collect()
    }

    #[must_use]
    pub fn fire() -> Self {
        Self {
            stops: vec![
                Colour::rgb(0, 0, 0),
                Colour::rgb(255, 0, 0),
                Colour::rgb(255, 165, 0),
                Colour::rgb(255, 255, 0),
                Colour::rgb(255, 255, 255),
            ],
            interior: Colour::BLACK,
            cycle_length: DEFAULT_CYCLE_LENGTH,
        }
    }

    #[must_use]
    pub fn ocean() -> Self {
        Self {
            stops: vec![
                Colour::rgb(0, 7, 100),
                Colour::rgb(32, 107, 203),
                Colour::rgb(237, 255, 255),
                Colour::rgb(255, 170, 0),
                Colour::rgb(0, 2, 0),
            ],
            interior: Colour::BLACK,
            cycle_length: DEFAULT_CYCLE_LENGTH,
        }
    }

    #[must_use]
    pub fn rainbow() -> Self {
        Self {
            stops: vec![
                Colour::rgb(255, 0, 0),
                Colour::rgb(255, 165, 0),
                Colour::rgb(255, 255, 0),
                Colour::rgb(0, 255, 0),
                Colour::rgb(0, 255, 255),
                Colour::rgb(0, 0, 255),
                Colour::rgb(180, 0, 255),
            ],
            interior: Colour::BLACK,
            cycle_length: DEFAULT_CYCLE_LENGTH,
        }
    }

    #[must_use]
    pub fn grayscale() -> Self {
        Self {
            stops: vec![Colour::rgb(32, 32, 32), Colour::rgb(255, 255, 255)],
            interior: Colour::BLACK,
            cycle_length: DEFAULT_CYCLE_LENGTH,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::fire()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_palette_rejected() {
        let result = Palette::new(vec![], Colour::BLACK, 8);

        assert_eq!(result, Err(PaletteError::NoStops));
    }

    #[test]
    fn test_zero_cycle_length_rejected() {
        let result = Palette::new(vec![Colour::WHITE], Colour::BLACK, 0);

        assert_eq!(result, Err(PaletteError::ZeroCycleLength));
    }

    #[test]
    fn test_accessors_return_construction_values() {
        let stops = vec![Colour::rgb(10, 0, 0), Colour::rgb(0, 10, 0)];
        let palette = Palette::new(stops.clone(), Colour::rgb(1, 1, 1), 12).unwrap();

        assert_eq!(palette.stops(), stops.as_slice());
        assert_eq!(palette.interior(), Colour::rgb(1, 1, 1));
        assert_eq!(palette.cycle_length(), 12);
        assert_eq!(palette.entries().len(), palette.cycle_length());
    }

    #[test]
    fn test_entries_equal_stops_when_cycle_matches() {
        let stops = vec![Colour::rgb(255, 0, 0), Colour::rgb(0, 255, 0), Colour::rgb(0, 0, 255)];
        let palette = Palette::new(stops.clone(), Colour::BLACK, 3).unwrap();

        assert_eq!(palette.entries(), stops);
    }

    #[test]
    fn test_entries_blend_between_stops_and_wrap() {
        let palette = Palette::new(vec![Colour::BLACK, Colour::WHITE], Colour::BLACK, 4).unwrap();
        let entries = palette.entries();

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0], Colour::BLACK);
        assert_eq!(entries[1], Colour::rgb(128, 128, 128));
        assert_eq!(entries[2], Colour::WHITE);
        // Last entry blends white back toward black.
        assert_eq!(entries[3], Colour::rgb(128, 128, 128));
    }

    #[test]
    fn test_presets_are_valid() {
        for palette in [Palette::fire(), Palette::ocean(), Palette::rainbow(), Palette::grayscale()] {
            assert!(palette.validate().is_ok());
            assert_eq!(palette.entries().len(), DEFAULT_CYCLE_LENGTH);
        }
    }
}
