pub mod colour_mapper;
