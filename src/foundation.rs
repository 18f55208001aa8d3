/// Pixel buffers and placement geometry.
pub mod core;
/// Error taxonomy.
pub mod error;
