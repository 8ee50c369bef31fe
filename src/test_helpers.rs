//! Shared test utilities for the quill test suite.
//!
//! Provides a throwaway project fixture, frontmatter/post builders, and
//! lookup helpers that panic with a useful message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let project = TestProject::new();
//! let dir = project.add_post(
//!     "2016_06_13_hello",
//!     &fixture_frontmatter("id-1", "Hello", "2016-06-13T00:00:00Z", true),
//!     "Body",
//! );
//! project.add_image(&dir, "photo.jpg");
//!
//! let site = compile(&project.config).unwrap();
//! assert_eq!(find_post(&site, "hello").images, vec!["photo.jpg"]);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::compile::{Post, Site};
use crate::config::{self, SiteConfig};
use crate::content;
use crate::frontmatter::Frontmatter;
use crate::slug;

pub const STOCK_INDEX_TEMPLATE: &str = include_str!("../theme/index.tera");
pub const STOCK_POST_TEMPLATE: &str = include_str!("../theme/post.tera");
pub const STOCK_STYLESHEET: &str = include_str!("../theme/style.css");

// =========================================================================
// Fixture setup
// =========================================================================

/// A project rooted in a temp directory with the stock theme and an empty
/// content root. The output root is not created.
pub struct TestProject {
    pub root: TempDir,
    pub config: SiteConfig,
}

impl TestProject {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let config = config::load_config(root.path()).unwrap();
        fs::create_dir_all(&config.content_dir).unwrap();
        fs::create_dir_all(&config.theme_dir).unwrap();
        fs::write(config.theme_dir.join("index.tera"), STOCK_INDEX_TEMPLATE).unwrap();
        fs::write(config.theme_dir.join("post.tera"), STOCK_POST_TEMPLATE).unwrap();
        fs::write(config.theme_dir.join("style.css"), STOCK_STYLESHEET).unwrap();
        Self { root, config }
    }

    /// Write a post directory with frontmatter, body and an empty `images/`.
    pub fn add_post(&self, dir_name: &str, frontmatter: &Frontmatter, body: &str) -> PathBuf {
        let dir = self.config.content_dir.join(dir_name);
        fs::create_dir_all(dir.join(content::IMAGES_DIR)).unwrap();
        content::write_frontmatter(&dir, frontmatter).unwrap();
        content::write_body(&dir, body).unwrap();
        dir
    }

    /// Write a small real JPEG into the post's `images/`.
    pub fn add_image(&self, post_dir: &Path, name: &str) -> PathBuf {
        let path = post_dir.join(content::IMAGES_DIR).join(name);
        image::RgbImage::from_pixel(64, 48, image::Rgb([200, 120, 40]))
            .save_with_format(&path, image::ImageFormat::Jpeg)
            .unwrap();
        path
    }

    pub fn read_frontmatter(&self, post_dir: &Path) -> Frontmatter {
        content::read_frontmatter(post_dir).unwrap()
    }
}

/// Frontmatter with the slug derived from `title`.
pub fn fixture_frontmatter(id: &str, title: &str, created: &str, update: bool) -> Frontmatter {
    let created = created.parse().unwrap();
    Frontmatter {
        id: id.to_string(),
        title: title.to_string(),
        author: "Ada".to_string(),
        slug: slug::slug_for(title, id),
        created,
        modified: created,
        keywords: Vec::new(),
        update,
    }
}

/// In-memory post that never touched the filesystem.
pub fn fixture_post(slug: &str, update: bool) -> Post {
    let mut frontmatter =
        fixture_frontmatter(&format!("id-{slug}"), slug, "2016-06-13T00:00:00Z", update);
    frontmatter.slug = slug.to_string();
    Post {
        source: PathBuf::from("/content").join(slug),
        frontmatter,
        target: PathBuf::from("/public").join(slug),
        permalink: format!("http://localhost/blog/{slug}/"),
        body_html: String::new(),
        images: Vec::new(),
    }
}

// =========================================================================
// Site lookups
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(site: &'a Site<'_>, slug: &str) -> &'a Post {
    site.posts
        .iter()
        .find(|p| p.frontmatter.slug == slug)
        .unwrap_or_else(|| {
            let slugs = post_slugs(site);
            panic!("post '{slug}' not found. Available: {slugs:?}")
        })
}

/// All post slugs in site order.
pub fn post_slugs<'a>(site: &'a Site<'_>) -> Vec<&'a str> {
    site.posts
        .iter()
        .map(|p| p.frontmatter.slug.as_str())
        .collect()
}
