//! High-level image operations.
//!
//! These functions combine calculations with backend execution: they take the
//! responsive image settings, compute parameters, and call the backend.
//!
//! ## Variant Naming
//!
//! The responsive image label is inserted between the file stem and the extension:
//!
//! ```text
//! photo.jpg    + small  → photo_small.jpg
//! IMG_1668.JPG + large  → IMG_1668_large.JPG
//! ```

use super::backend::{BackendError, ImageBackend};
use super::calculations::fit_width;
use super::params::{Quality, ResizeParams};
use crate::config::ResponsiveImageSpec;
use std::path::{Path, PathBuf};

/// File name of the `label` variant of `image_name`.
pub fn variant_file_name(image_name: &str, label: &str) -> String {
    let path = Path::new(image_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, label, ext.to_string_lossy()),
        None => format!("{}_{}", stem, label),
    }
}

/// Outcome of producing one variant.
#[derive(Debug)]
pub struct DerivedVariant {
    pub label: String,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub result: Result<(), BackendError>,
}

/// Produce one resized copy of `source` in `output_dir` per responsive entry.
///
/// Variants are generated one after another so a single image never has more
/// than one resize in flight; callers parallelize across images instead. A
/// failed variant is recorded and the chain moves on to the next entry. If the
/// source cannot be identified, every variant is reported with that error.
pub fn derive_variants(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    specs: &[ResponsiveImageSpec],
    quality: Quality,
) -> Vec<DerivedVariant> {
    let image_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let dims = match backend.identify(source) {
        Ok(dims) => (dims.width, dims.height),
        Err(e) => {
            let reason = e.to_string();
            return specs
                .iter()
                .map(|spec| DerivedVariant {
                    label: spec.label.clone(),
                    output: output_dir.join(variant_file_name(&image_name, &spec.label)),
                    width: 0,
                    height: 0,
                    result: Err(BackendError::ProcessingFailed(reason.clone())),
                })
                .collect();
        }
    };

    specs
        .iter()
        .map(|spec| {
            let output = output_dir.join(variant_file_name(&image_name, &spec.label));
            let (width, height) = fit_width(dims, spec.width);
            let result = backend.resize(&ResizeParams {
                source: source.to_path_buf(),
                output: output.clone(),
                width,
                height,
                quality,
            });
            if let Err(e) = &result {
                log::warn!("resize {} failed: {}", output.display(), e);
            }
            DerivedVariant {
                label: spec.label.clone(),
                output,
                width,
                height,
                result,
            }
        })
        .collect()
}
