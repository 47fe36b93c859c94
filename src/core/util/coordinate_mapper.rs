use crate::core::data::render_parameters::RenderParameters;
use num_complex::Complex64;
use std::error::Error;
use std::fmt;

/// Height of the visible plane region at zoom 1.
pub const BASE_SCALE: f64 = 3.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ViewTransformError {
    InvalidZoomFactor(f64),
}

impl fmt::Display for ViewTransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidZoomFactor(factor) => {
                write!(f, "zoom factor must be positive and finite, got {}", factor)
            }
        }
    }
}

impl Error for ViewTransformError {}

/// Maps continuous screen coordinates onto the complex plane and back.
///
/// Screen `y` grows downwards, the imaginary axis grows upwards. Pixel
/// `(x, y)` covers `[x, x + 1) × [y, y + 1)`, so its centre is at
/// `(x + 0.5, y + 0.5)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewTransform {
    pub width: usize,
    pub height: usize,
    pub zoom: f64,
    pub center: Complex64,
}

impl ViewTransform {
    #[must_use]
    pub fn new(width: usize, height: usize, zoom: f64, center: Complex64) -> Self {
        Self {
            width,
            height,
            zoom,
            center,
        }
    }

    #[must_use]
    pub fn from_parameters(params: &RenderParameters) -> Self {
        Self::new(
            params.canvas_width,
            params.canvas_height,
            params.zoom,
            Complex64::new(params.center_x, params.center_y),
        )
    }

    #[must_use]
    pub fn view_height(&self) -> f64 {
        BASE_SCALE / self.zoom
    }

    #[must_use]
    pub fn view_width(&self) -> f64 {
        self.view_height() * (self.width as f64 / self.height as f64)
    }

    #[must_use]
    pub fn to_plane(&self, px: f64, py: f64) -> Complex64 {
        let view_width = self.view_width();
        let view_height = self.view_height();
        let min_real = self.center.re - view_width / 2.0;
        let max_imag = self.center.im + view_height / 2.0;

        Complex64::new(
            min_real + (px / self.width as f64) * view_width,
            max_imag - (py / self.height as f64) * view_height,
        )
    }

    #[must_use]
    pub fn to_screen(&self, point: Complex64) -> (f64, f64) {
        let view_width = self.view_width();
        let view_height = self.view_height();
        let min_real = self.center.re - view_width / 2.0;
        let max_imag = self.center.im + view_height / 2.0;

        (
            (point.re - min_real) / view_width * self.width as f64,
            (max_imag - point.im) / view_height * self.height as f64,
        )
    }

    /// Plane coordinate of the centre of pixel `(x, y)`.
    #[must_use]
    pub fn pixel_center(&self, x: usize, y: usize) -> Complex64 {
        self.to_plane(x as f64 + 0.5, y as f64 + 0.5)
    }

    /// Multiplies the zoom by `factor`, keeping the plane point under the
    /// cursor at the same screen position.
    pub fn zoom_at_cursor(&self, px: f64, py: f64, factor: f64) -> Result<Self, ViewTransformError> {
        if !(factor > 0.0 && factor.is_finite()) {
            return Err(ViewTransformError::InvalidZoomFactor(factor));
        }

        let anchor = self.to_plane(px, py);
        let zoomed = Self {
            zoom: self.zoom * factor,
            ..*self
        };

        // Shift the centre by however far the anchor drifted under the new zoom.
        let drifted = zoomed.to_plane(px, py);

        Ok(Self {
            center: zoomed.center + (anchor - drifted),
            ..zoomed
        })
    }

    /// Moves the view so content follows a drag of `(dx, dy)` pixels.
    #[must_use]
    pub fn pan_by_pixels(&self, dx: f64, dy: f64) -> Self {
        let re_per_pixel = self.view_width() / self.width as f64;
        let im_per_pixel = self.view_height() / self.height as f64;

        Self {
            center: Complex64::new(
                self.center.re - dx * re_per_pixel,
                self.center.im + dy * im_per_pixel,
            ),
            ..*self
        }
    }
}
