use crate::core::data::palette::{Palette, PaletteError};
use crate::core::data::render_parameters::{FractalKind, ParameterError, RenderParameters};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotError {
    KindMismatch { stored: FractalKind, actual: FractalKind },
    Parameters(ParameterError),
    Palette(PaletteError),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindMismatch { stored, actual } => write!(
                f,
                "snapshot is tagged {} but its parameters describe {}",
                stored, actual
            ),
            Self::Parameters(err) => write!(f, "invalid snapshot parameters: {}", err),
            Self::Palette(err) => write!(f, "invalid snapshot palette: {}", err),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::KindMismatch { .. } => None,
            Self::Parameters(err) => Some(err),
            Self::Palette(err) => Some(err),
        }
    }
}

impl From<ParameterError> for SnapshotError {
    fn from(err: ParameterError) -> Self {
        Self::Parameters(err)
    }
}

impl From<PaletteError> for SnapshotError {
    fn from(err: PaletteError) -> Self {
        Self::Palette(err)
    }
}

/// Logical shape of a saved session. The storage format is up to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub kind: FractalKind,
    pub parameters: RenderParameters,
    pub palette: Palette,
    pub thumbnail: RenderParameters,
}

impl SessionSnapshot {
    #[must_use]
    pub fn capture(parameters: &RenderParameters, palette: &Palette) -> Self {
        Self {
            kind: parameters.kind(),
            parameters: parameters.clone(),
            palette: palette.clone(),
            thumbnail: parameters.thumbnail(),
        }
    }

    /// Re-validates the stored values and hands back the parameters and palette.
    pub fn restore(self) -> Result<(RenderParameters, Palette), SnapshotError> {
        let actual = self.parameters.kind();
        if self.kind != actual {
            return Err(SnapshotError::KindMismatch {
                stored: self.kind,
                actual,
            });
        }

        self.parameters.validate()?;
        self.palette.validate()?;

        Ok((self.parameters, self.palette))
    }
}
