pub mod capability;
pub mod context;
pub mod engine;
pub mod profile;
