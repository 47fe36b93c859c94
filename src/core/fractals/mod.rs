pub mod chaos_game;
pub mod errors;
pub mod escape_time;
pub mod geometric_recursive;
pub mod kernel;
pub mod root_convergence;
