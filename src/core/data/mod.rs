pub mod colour;
pub mod density_grid;
pub mod palette;
pub mod pixel_buffer;
pub mod render_parameters;
pub mod sample_result;
pub mod session_snapshot;
