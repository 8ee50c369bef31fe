//! Content repository: the on-disk layout of posts.
//!
//! ```text
//! content/
//! ├── 2016_06_13_this_post_is_for_testing/
//! │   ├── frontmatter.json     # Metadata (see frontmatter module)
//! │   ├── main.md              # Markdown body
//! │   └── images/              # Source images, resized at render time
//! │       ├── photo.jpg
//! │       └── diagram.png
//! ├── 2016_06_20_another_post/
//! │   └── ...
//! └── .drafts/                 # Hidden = ignored
//! ```
//!
//! Every read failure is reported with the offending path; the compile stage
//! treats all of them as fatal.

use crate::frontmatter::{self, Frontmatter};
use crate::imaging;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const FRONTMATTER_FILE: &str = "frontmatter.json";
pub const BODY_FILE: &str = "main.md";
pub const IMAGES_DIR: &str = "images";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid frontmatter in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

impl ContentError {
    fn read(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    fn write(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Immediate, non-hidden subdirectories of the content root.
///
/// Returned in filesystem enumeration order; the compile stage sorts posts
/// once their frontmatter is known.
pub fn list_post_dirs(content_dir: &Path) -> Result<Vec<PathBuf>, ContentError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(content_dir).map_err(ContentError::read(content_dir))? {
        let entry = entry.map_err(ContentError::read(content_dir))?;
        let name = entry.file_name();
        if is_hidden(&name.to_string_lossy()) {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    Ok(dirs)
}

pub fn read_frontmatter(post_dir: &Path) -> Result<Frontmatter, ContentError> {
    let path = post_dir.join(FRONTMATTER_FILE);
    let json = fs::read_to_string(&path).map_err(ContentError::read(&path))?;
    frontmatter::from_json(&json).map_err(|source| ContentError::Parse { path, source })
}

/// Overwrite the post's `frontmatter.json`.
pub fn write_frontmatter(post_dir: &Path, frontmatter: &Frontmatter) -> Result<(), ContentError> {
    let path = post_dir.join(FRONTMATTER_FILE);
    let json = frontmatter::to_json(frontmatter).map_err(|e| ContentError::Write {
        path: path.clone(),
        source: io::Error::other(e),
    })?;
    fs::write(&path, json).map_err(ContentError::write(&path))
}

pub fn read_body(post_dir: &Path) -> Result<String, ContentError> {
    let path = post_dir.join(BODY_FILE);
    fs::read_to_string(&path).map_err(ContentError::read(&path))
}

pub fn write_body(post_dir: &Path, markdown: &str) -> Result<(), ContentError> {
    let path = post_dir.join(BODY_FILE);
    fs::write(&path, markdown).map_err(ContentError::write(&path))
}

/// File names of the post's source images, sorted by name.
///
/// Hidden files and files without a supported image extension are skipped.
pub fn list_images(post_dir: &Path) -> Result<Vec<String>, ContentError> {
    let dir = post_dir.join(IMAGES_DIR);
    let mut images = Vec::new();
    for entry in fs::read_dir(&dir).map_err(ContentError::read(&dir))? {
        let entry = entry.map_err(ContentError::read(&dir))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) || !entry.path().is_file() {
            continue;
        }
        if imaging::is_supported_image(&name) {
            images.push(name);
        } else {
            log::debug!("skipping non-image file {}", entry.path().display());
        }
    }
    images.sort();
    Ok(images)
}
