pub mod colour_map;
pub mod point_kernel;
