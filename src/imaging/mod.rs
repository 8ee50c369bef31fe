//! Responsive image derivation.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image` decoder dimensions + EXIF orientation |
//! | **Resize** | Lanczos3 via `image::DynamicImage::resize_exact` |
//! | **Auto-orient** | `image::DynamicImage::apply_orientation` |
//! | **Encode** | same format as the source (JPEG, PNG, GIF, WebP) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Variant naming and the per-image variant chain

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::fit_width;
pub use operations::{DerivedVariant, derive_variants, variant_file_name};
pub use params::{Quality, ResizeParams};
pub use rust_backend::{RustBackend, is_supported_image};
