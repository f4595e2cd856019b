pub mod error;
pub mod frame_cache;
pub mod loader;
