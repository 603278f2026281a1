pub mod perifusion;

// Expose the main loading functions
pub use perifusion::{from_reader as load_perifusion_reader, read_perifusion};
