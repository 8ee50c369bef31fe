//! Site rendering: site model → files under the output root.
//!
//! ## Output Structure
//!
//! ```text
//! public/
//! ├── index.html                  # index.tera with { posts, config }
//! ├── style.css                   # copied from the theme root
//! ├── hey_a_post/
//! │   ├── index.html              # post.tera with { post, config }
//! │   └── images/
//! │       ├── photo_small.jpg     # one file per responsive_images entry
//! │       ├── photo_medium.jpg
//! │       └── photo_large.jpg
//! └── another_post/
//!     └── ...
//! ```
//!
//! ## Ordering
//!
//! 1. Templates are loaded (a broken theme stops the run before any write).
//! 2. The output root and every selected post's `target/images/` exist.
//! 3. The index page is written once, from every post in the site.
//! 4. Selected posts render in parallel. Within a post its images fan out in
//!    parallel, while the variants of one image are produced sequentially.
//! 5. Theme assets are copied.
//!
//! ## Failures
//!
//! Steps 1, 2, 3 and 5 fail the run. Step 4 is isolated per post: a failed
//! page or variant is logged and recorded in that post's [`PostOutcome`],
//! and every other page and variant is still attempted.

use crate::compile::{Post, Site};
use crate::config::SiteConfig;
use crate::content::IMAGES_DIR;
use crate::imaging::{self, BackendError, ImageBackend, Quality};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;
use walkdir::WalkDir;

pub const INDEX_TEMPLATE: &str = "index.tera";
pub const POST_TEMPLATE: &str = "post.tera";
pub const PAGE_FILE: &str = "index.html";

/// Theme files copied verbatim to the output root.
pub const ASSET_EXTENSIONS: &[&str] = &["css", "js", "svg"];

const INDEX_NAME: &str = "index.html";
const POST_NAME: &str = "post.html";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl RenderError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One thing that went wrong while rendering a post.
#[derive(Debug)]
pub enum PostFailure {
    Page(RenderError),
    Variant {
        image: String,
        label: String,
        error: BackendError,
    },
}

impl fmt::Display for PostFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostFailure::Page(e) => write!(f, "page: {e}"),
            PostFailure::Variant {
                image,
                label,
                error,
            } => write!(f, "{image} ({label}): {error}"),
        }
    }
}

/// What happened to one rendered post.
#[derive(Debug)]
pub struct PostOutcome {
    pub slug: String,
    pub title: String,
    pub target: PathBuf,
    pub page_written: bool,
    pub images: usize,
    pub variants_written: usize,
    pub failures: Vec<PostFailure>,
}

impl PostOutcome {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of a render pass.
///
/// `posts` lines up with the posts passed to [`render_site`].
#[derive(Debug)]
pub struct RenderReport {
    pub index: PathBuf,
    pub posts: Vec<PostOutcome>,
    pub assets: Vec<PathBuf>,
}

impl RenderReport {
    pub fn failed(&self) -> impl Iterator<Item = &PostOutcome> {
        self.posts.iter().filter(|o| !o.is_ok())
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    pub fn pages_written(&self) -> usize {
        self.posts.iter().filter(|o| o.page_written).count()
    }

    pub fn variants_written(&self) -> usize {
        self.posts.iter().map(|o| o.variants_written).sum()
    }

    pub fn images(&self) -> usize {
        self.posts.iter().map(|o| o.images).sum()
    }
}

/// Load `index.tera` and `post.tera` from the theme root.
pub fn load_templates(theme_dir: &Path) -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    // Tera picks escaping from the file path, not the registered name
    tera.autoescape_on(vec![".tera", ".html"]);
    tera.add_template_files(vec![
        (theme_dir.join(INDEX_TEMPLATE), Some(INDEX_NAME)),
        (theme_dir.join(POST_TEMPLATE), Some(POST_NAME)),
    ])?;
    Ok(tera)
}

fn create_dir(path: &Path) -> Result<(), RenderError> {
    fs::create_dir_all(path).map_err(RenderError::io(path))
}

/// Create the output root and every post's `target/images/`.
fn prepare_dirs(public_dir: &Path, posts: &[&Post]) -> Result<(), RenderError> {
    create_dir(public_dir)?;
    for post in posts {
        create_dir(&post.target.join(IMAGES_DIR))?;
    }
    Ok(())
}

pub fn render_index(tera: &Tera, site: &Site<'_>) -> Result<String, RenderError> {
    let mut context = Context::new();
    context.insert("posts", &site.posts);
    context.insert("config", site.config);
    Ok(tera.render(INDEX_NAME, &context)?)
}

pub fn render_post_page(
    tera: &Tera,
    post: &Post,
    config: &SiteConfig,
) -> Result<String, RenderError> {
    let mut context = Context::new();
    context.insert("post", post);
    context.insert("config", config);
    Ok(tera.render(POST_NAME, &context)?)
}

fn write_page(path: &Path, html: &str) -> Result<(), RenderError> {
    fs::write(path, html).map_err(RenderError::io(path))
}

fn render_post(
    tera: &Tera,
    post: &Post,
    config: &SiteConfig,
    backend: &impl ImageBackend,
    quality: Quality,
) -> PostOutcome {
    let slug = &post.frontmatter.slug;
    let mut failures = Vec::new();

    let page = post.target.join(PAGE_FILE);
    let page_written = match render_post_page(tera, post, config)
        .and_then(|html| write_page(&page, &html))
    {
        Ok(()) => true,
        Err(e) => {
            log::error!("{slug}: {e}");
            failures.push(PostFailure::Page(e));
            false
        }
    };

    let source_dir = post.source.join(IMAGES_DIR);
    let output_dir = post.target.join(IMAGES_DIR);
    let derived: Vec<(String, Vec<imaging::DerivedVariant>)> = post
        .images
        .par_iter()
        .map(|image| {
            let variants = imaging::derive_variants(
                backend,
                &source_dir.join(image),
                &output_dir,
                &config.responsive_images,
                quality,
            );
            (image.clone(), variants)
        })
        .collect();

    let mut variants_written = 0;
    for (image, variants) in derived {
        for variant in variants {
            match variant.result {
                Ok(()) => variants_written += 1,
                Err(error) => {
                    log::error!("{slug}: {image} ({}): {error}", variant.label);
                    failures.push(PostFailure::Variant {
                        image: image.clone(),
                        label: variant.label,
                        error,
                    });
                }
            }
        }
    }

    log::info!(
        "{slug}: page {}, {variants_written} variants",
        if page_written { "written" } else { "failed" }
    );

    PostOutcome {
        slug: slug.clone(),
        title: post.frontmatter.title.clone(),
        target: post.target.clone(),
        page_written,
        images: post.images.len(),
        variants_written,
        failures,
    }
}

/// Copy stylesheets, scripts and SVGs from the theme root (not recursive).
pub fn copy_assets(theme_dir: &Path, public_dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
    let mut copied = Vec::new();
    for entry in WalkDir::new(theme_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| RenderError::Io {
            path: theme_dir.to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_asset = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| ASSET_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if !is_asset {
            continue;
        }
        let dest = public_dir.join(entry.file_name());
        fs::copy(entry.path(), &dest).map_err(RenderError::io(entry.path()))?;
        log::debug!("copied {}", dest.display());
        copied.push(dest);
    }
    Ok(copied)
}

/// Render `posts` (a subset of `site.posts`) plus the index and assets.
pub fn render_site(
    site: &Site<'_>,
    posts: &[&Post],
    backend: &impl ImageBackend,
) -> Result<RenderReport, RenderError> {
    let config = site.config;
    let tera = load_templates(&config.theme_dir)?;

    prepare_dirs(&config.public_dir, posts)?;

    let index = config.public_dir.join(PAGE_FILE);
    write_page(&index, &render_index(&tera, site)?)?;
    log::info!("wrote {} ({} posts)", index.display(), site.posts.len());

    let quality = Quality::default();
    let outcomes = posts
        .par_iter()
        .map(|post| render_post(&tera, post, config, backend, quality))
        .collect();

    let assets = copy_assets(&config.theme_dir, &config.public_dir)?;

    Ok(RenderReport {
        index,
        posts: outcomes,
        assets,
    })
}
