pub mod exporter;
pub mod json;
pub mod model;
pub mod reporter;
