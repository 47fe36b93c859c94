use crate::core::data::pixel_buffer::{BYTES_PER_PIXEL, PixelBuffer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Binary PPM (P6) encoding of a finished buffer. Alpha and row padding are dropped.
pub fn encode_ppm(buffer: &PixelBuffer, out: &mut impl Write) -> std::io::Result<()> {
    // PPM header: P6 means binary RGB, then width, height and max_colour
    writeln!(out, "P6")?;
    writeln!(out, "{} {}", buffer.width(), buffer.height())?;
    writeln!(out, "255")?;

    for row in buffer.rows() {
        for pixel in row.chunks_exact(BYTES_PER_PIXEL) {
            out.write_all(&pixel[..3])?;
        }
    }

    Ok(())
}

pub fn write_ppm(buffer: &PixelBuffer, filepath: impl AsRef<Path>) -> std::io::Result<()> {
    if let Some(parent) = filepath.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = BufWriter::new(File::create(filepath)?);
    encode_ppm(buffer, &mut file)?;
    file.flush()
}
