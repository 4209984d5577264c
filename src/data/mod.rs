pub mod blob;
pub mod datetime;
pub mod loader;
