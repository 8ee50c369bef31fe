//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the renderer needs:
//! identify (oriented dimensions) and resize. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend); tests use a recording
//! mock so render logic can be exercised without encoding pixels.

use super::params::ResizeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation, after EXIF orientation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` so one backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Get display dimensions (width/height swapped for rotated photos).
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Auto-orient, resize to exactly `width`x`height`, and write `output`.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}
