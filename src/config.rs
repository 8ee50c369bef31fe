//! Site configuration module.
//!
//! Handles loading and validating the project's `config.toml`. The file is
//! optional and sparse: stock defaults are laid down first and user values
//! are merged on top, so a config only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! ```text
//! my-blog/
//! ├── config.toml    # Site config (optional)
//! ├── content/       # Post directories
//! ├── theme/         # index.tera, post.tera, *.css, *.js, *.svg
//! └── public/        # Generated output
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_dir = "content"
//! public_dir = "public"
//! theme_dir = "theme"
//! site_name = "Quill Blog"
//! root_url = "http://localhost/blog"
//! author = ""
//!
//! [[responsive_images]]
//! label = "small"
//! breakpoint = 0
//! width = 400
//!
//! [[responsive_images]]
//! label = "medium"
//! breakpoint = 480
//! width = 600
//!
//! [[responsive_images]]
//! label = "large"
//! breakpoint = 860
//! width = 1000
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Relative directory paths are resolved against the project root when the
//! config is loaded, so every component downstream sees absolute paths.
//! Unknown keys are rejected to catch typos early.
//!
//! The loaded [`SiteConfig`] is constructed once by the entry point and passed
//! by reference into every component. Nothing reads configuration ambiently.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file inside the project root.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding one subdirectory per post.
    pub content_dir: PathBuf,
    /// Output root for the generated site.
    pub public_dir: PathBuf,
    /// Directory holding the templates and static assets.
    pub theme_dir: PathBuf,
    pub site_name: String,
    /// Public base URL, without trailing slash.
    pub root_url: String,
    /// Author written into the frontmatter of new posts.
    pub author: String,
    /// One resized variant is produced per entry for every post image.
    pub responsive_images: Vec<ResponsiveImageSpec>,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            public_dir: PathBuf::from("public"),
            theme_dir: PathBuf::from("theme"),
            site_name: "Quill Blog".to_string(),
            root_url: "http://localhost/blog".to_string(),
            author: String::new(),
            responsive_images: vec![
                ResponsiveImageSpec::new("small", 0, 400),
                ResponsiveImageSpec::new("medium", 480, 600),
                ResponsiveImageSpec::new("large", 860, 1000),
            ],
            processing: ProcessingConfig::default(),
        }
    }
}

/// One resized variant of a source image and the viewport condition under
/// which the browser should pick it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponsiveImageSpec {
    /// Inserted into the variant filename: `photo.jpg` → `photo_<label>.jpg`.
    pub label: String,
    /// Minimum viewport width in CSS pixels.
    pub breakpoint: u32,
    /// Maximum output width in pixels.
    pub width: u32,
}

impl ResponsiveImageSpec {
    pub fn new(label: &str, breakpoint: u32, width: u32) -> Self {
        Self {
            label: label.to_string(),
            breakpoint,
            width,
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.responsive_images.is_empty() {
            return Err(ConfigError::Validation(
                "responsive_images must not be empty".into(),
            ));
        }
        let mut labels = HashSet::new();
        let mut breakpoints = HashSet::new();
        for spec in &self.responsive_images {
            if spec.label.is_empty()
                || !spec
                    .label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(ConfigError::Validation(format!(
                    "responsive_images label {:?} must be non-empty and use only [A-Za-z0-9_-]",
                    spec.label
                )));
            }
            if spec.width == 0 {
                return Err(ConfigError::Validation(format!(
                    "responsive_images.{}: width must be non-zero",
                    spec.label
                )));
            }
            if !labels.insert(spec.label.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate responsive_images label: {}",
                    spec.label
                )));
            }
            if !breakpoints.insert(spec.breakpoint) {
                return Err(ConfigError::Validation(format!(
                    "duplicate responsive_images breakpoint: {}",
                    spec.breakpoint
                )));
            }
        }
        Ok(())
    }

    /// Resolve relative directories against `root`.
    pub fn resolve_paths(mut self, root: &Path) -> Self {
        for dir in [
            &mut self.content_dir,
            &mut self.public_dir,
            &mut self.theme_dir,
        ] {
            if dir.is_relative() {
                *dir = root.join(&*dir);
            }
        }
        self.root_url = self.root_url.trim_end_matches('/').to_string();
        self
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so a user
///   `[[responsive_images]]` list replaces the stock list as a whole.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load the project config rooted at `root`.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// validates, and resolves directories to absolute paths.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    let root = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };
    Ok(config.resolve_paths(&root))
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Quill Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Directory with one subdirectory per post (frontmatter.json, main.md, images/).
content_dir = "content"

# Output root. Wiped and rebuilt by `quill generate --all`.
public_dir = "public"

# Templates (index.tera, post.tera) and static assets (*.css, *.js, *.svg).
theme_dir = "theme"

site_name = "Quill Blog"
root_url = "http://localhost/blog"

# Written into the frontmatter of posts created with `quill new`.
author = ""

# ---------------------------------------------------------------------------
# Responsive images
# ---------------------------------------------------------------------------
# Every image in a post's images/ directory is resized once per entry.
# photo.jpg with label "small" becomes images/photo_small.jpg.
# The entry with the smallest breakpoint is the <img> fallback; the others
# become <source media="(min-width: Npx)"> tags, widest first.
# Defining this list replaces the defaults entirely.

[[responsive_images]]
label = "small"
breakpoint = 0
width = 400

[[responsive_images]]
label = "medium"
breakpoint = 480
width = 600

[[responsive_images]]
label = "large"
breakpoint = 860
width = 1000

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers. Omit for auto (= number of CPU cores).
# Values above the core count are clamped down.
# max_processes = 4
"##
}
