pub mod attribute;
pub mod dataset;
