pub mod coordinate_mapper;
pub mod plan_row_bands;
