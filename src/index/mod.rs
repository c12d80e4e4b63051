pub mod bucket;
pub mod field_index;
