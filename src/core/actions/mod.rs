pub mod cancellation;
pub mod ports;
pub mod progress;
pub mod render_chaos_game;
pub mod render_row_bands;
pub mod supersample;
pub mod worker_pool;
