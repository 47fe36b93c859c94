use crate::core::data::colour::Colour;
use std::error::Error;
use std::fmt;

pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelBufferError {
    ZeroSize {
        width: usize,
        height: usize,
    },
    StrideTooSmall {
        stride: usize,
        min_stride: usize,
    },
    BoundsMismatch {
        required_size: usize,
        buffer_size: usize,
    },
    PixelOutsideBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for PixelBufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSize { width, height } => {
                write!(f, "pixel buffer size must be positive: {}x{}", width, height)
            }
            Self::StrideTooSmall { stride, min_stride } => {
                write!(f, "stride {} is smaller than one row of {} bytes", stride, min_stride)
            }
            Self::BoundsMismatch {
                required_size,
                buffer_size,
            } => {
                write!(
                    f,
                    "buffer of {} bytes is too small, {} bytes required",
                    buffer_size, required_size
                )
            }
            Self::PixelOutsideBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(
                    f,
                    "pixel at x:{}, y:{} outside of buffer bounds {}x{}",
                    x, y, width, height
                )
            }
        }
    }
}

impl Error for PixelBufferError {}

pub type PixelBufferData = Vec<u8>;

/// Row-major RGBA storage owned by the caller.
///
/// Rows are `stride` bytes apart; bytes between `width * 4` and `stride` are
/// padding and never written by the renderer.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    stride: usize,
    data: PixelBufferData,
}

impl PixelBuffer {
    /// Allocates a zeroed, tightly packed buffer.
    pub fn new(width: usize, height: usize) -> Result<Self, PixelBufferError> {
        let stride = width * BYTES_PER_PIXEL;
        Self::from_data(width, height, stride, vec![0; stride * height])
    }

    /// Wraps caller-provided storage with an explicit stride.
    pub fn from_data(
        width: usize,
        height: usize,
        stride: usize,
        data: PixelBufferData,
    ) -> Result<Self, PixelBufferError> {
        if width == 0 || height == 0 {
            return Err(PixelBufferError::ZeroSize { width, height });
        }

        let min_stride = width * BYTES_PER_PIXEL;
        if stride < min_stride {
            return Err(PixelBufferError::StrideTooSmall { stride, min_stride });
        }

        let required_size = stride * (height - 1) + min_stride;
        if data.len() < required_size {
            return Err(PixelBufferError::BoundsMismatch {
                required_size,
                buffer_size: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[must_use]
    pub fn into_data(self) -> PixelBufferData {
        self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Result<Colour, PixelBufferError> {
        let index = self.index_of(x, y)?;
        let px = &self.data[index..index + BYTES_PER_PIXEL];

        Ok(Colour {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, colour: Colour) -> Result<(), PixelBufferError> {
        let index = self.index_of(x, y)?;
        self.data[index..index + BYTES_PER_PIXEL].copy_from_slice(&colour.to_bytes());

        Ok(())
    }

    /// Iterates over the visible pixel bytes of each row, padding excluded.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        let row_bytes = self.width * BYTES_PER_PIXEL;
        (0..self.height).map(move |y| &self.data[y * self.stride..y * self.stride + row_bytes])
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, PixelBufferError> {
        if x >= self.width || y >= self.height {
            return Err(PixelBufferError::PixelOutsideBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok(y * self.stride + x * BYTES_PER_PIXEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_zeroed_buffer() {
        let buffer = PixelBuffer::new(10, 10).unwrap();

        assert_eq!(buffer.stride(), 40);
        assert_eq!(buffer.data().len(), 400); // 10 * 10 * 4
        assert!(buffer.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(
            PixelBuffer::new(0, 5).unwrap_err(),
            PixelBufferError::ZeroSize { width: 0, height: 5 }
        );
    }

    #[test]
    fn test_stride_too_small_rejected() {
        let result = PixelBuffer::from_data(4, 2, 12, vec![0; 32]);

        assert_eq!(
            result.unwrap_err(),
            PixelBufferError::StrideTooSmall {
                stride: 12,
                min_stride: 16
            }
        );
    }

    #[test]
    fn test_padded_stride_accepts_short_last_row() {
        // Last row does not need trailing padding.
        let buffer = PixelBuffer::from_data(2, 2, 12, vec![0; 20]);

        assert!(buffer.is_ok());
    }

    #[test]
    fn test_buffer_too_small_rejected() {
        let result = PixelBuffer::from_data(2, 2, 8, vec![0; 12]);

        assert_eq!(
            result.unwrap_err(),
            PixelBufferError::BoundsMismatch {
                required_size: 16,
                buffer_size: 12
            }
        );
    }

    #[test]
    fn test_set_pixel_respects_stride() {
        let mut buffer = PixelBuffer::from_data(2, 2, 12, vec![0; 24]).unwrap();
        buffer.set_pixel(1, 1, Colour::rgb(1, 2, 3)).unwrap();

        assert_eq!(&buffer.data()[16..20], &[1, 2, 3, 255]);
        assert_eq!(buffer.pixel(1, 1).unwrap(), Colour::rgb(1, 2, 3));
    }

    #[test]
    fn test_set_pixel_outside_bounds() {
        let mut buffer = PixelBuffer::new(3, 3).unwrap();
        let result = buffer.set_pixel(3, 0, Colour::WHITE);

        assert_eq!(
            result,
            Err(PixelBufferError::PixelOutsideBounds {
                x: 3,
                y: 0,
                width: 3,
                height: 3
            })
        );
    }

    #[test]
    fn test_rows_skip_padding() {
        let mut data = vec![0; 24];
        data[8..12].copy_from_slice(&[9, 9, 9, 9]); // padding of row 0
        let buffer = PixelBuffer::from_data(2, 2, 12, data).unwrap();
        let rows: Vec<&[u8]> = buffer.rows().collect();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.len() == 8 && row.iter().all(|&b| b == 0)));
    }
}
