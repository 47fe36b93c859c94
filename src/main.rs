use fractal_engine::{NeverCancel, Palette, PixelBuffer, RenderOutcome, RenderParameters, RenderSession, write_ppm};
use tracing::info;
use tracing_subscriber::EnvFilter;

const OUTPUT_PATH: &str = "output/mandelbrot.ppm";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let params = RenderParameters::default();
    let palette = Palette::default();
    let mut buffer = PixelBuffer::new(params.canvas_width, params.canvas_height)?;
    let session = RenderSession::new();

    info!(
        kind = %params.kind(),
        stops = palette.stops().len(),
        cycle_length = palette.cycle_length(),
        "rendering default view"
    );

    let progress = |percent: u8| {
        if percent % 25 == 0 {
            info!(percent, "rendering");
        }
    };

    match session.render(&params, &palette, &mut buffer, &progress, &NeverCancel) {
        RenderOutcome::Completed => {
            write_ppm(&buffer, OUTPUT_PATH)?;
            info!(path = OUTPUT_PATH, "wrote image");
            Ok(())
        }
        RenderOutcome::Cancelled => Err("render was cancelled".into()),
        RenderOutcome::Failed(err) => Err(err.into()),
    }
}
