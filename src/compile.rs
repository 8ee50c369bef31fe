//! Site compilation: content directories → in-memory site model.
//!
//! Each post directory goes through the same fixed sequence of stages. Every
//! stage consumes the previous stage's value and returns a new one, so a
//! stage can only read fields an earlier stage has attached:
//!
//! ```text
//! PathBuf ──load──▶ Loaded ──reslug──▶ Loaded ──place──▶ Placed ──render──▶ Rendered ──with_images──▶ Post
//!          frontmatter.json   title→slug      public/<slug>      main.md→HTML           images/*
//! ```
//!
//! Posts are compiled in parallel and then sorted newest first. Any read or
//! parse failure aborts the whole compile: rendering never sees a partial
//! site. Two posts claiming the same slug (or id) abort it too, since their
//! output would land in the same directory, and so does a slug that is empty
//! or not a single path component.
//!
//! The content directory name is a stable storage key. It encodes the slug
//! the post had when it was created and is never renamed; only `slug`,
//! `target` and `permalink` follow later title edits.

use crate::config::SiteConfig;
use crate::content::{self, ContentError};
use crate::frontmatter::Frontmatter;
use crate::markdown;
use crate::slug;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("slug {slug:?} is used by both {} and {}", .first.display(), .second.display())]
    SlugCollision {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("{}: slug {slug:?} is not a single safe path component", .post.display())]
    UnsafeSlug { slug: String, post: PathBuf },
    #[error("post id {id:?} is used by both {} and {}", .first.display(), .second.display())]
    DuplicateId {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// A fully compiled post, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Content directory the post was read from.
    pub source: PathBuf,
    pub frontmatter: Frontmatter,
    /// Output directory: `public_dir/<slug>`.
    pub target: PathBuf,
    /// Public URL of the post page: `<root_url>/<slug>/`.
    pub permalink: String,
    pub body_html: String,
    /// Source image file names, sorted.
    pub images: Vec<String>,
}

/// Configuration plus every compiled post, newest first.
#[derive(Debug, Serialize)]
pub struct Site<'a> {
    pub config: &'a SiteConfig,
    pub posts: Vec<Post>,
}

struct Loaded {
    source: PathBuf,
    frontmatter: Frontmatter,
}

struct Placed {
    loaded: Loaded,
    target: PathBuf,
    permalink: String,
}

struct Rendered {
    placed: Placed,
    body_html: String,
}

/// Read and parse the frontmatter, stamping `modified`.
fn load(dir: &Path, now: DateTime<Utc>) -> Result<Loaded, ContentError> {
    let frontmatter = content::read_frontmatter(dir)?.touched(now);
    Ok(Loaded {
        source: dir.to_path_buf(),
        frontmatter,
    })
}

/// Recompute the slug from the current title.
fn reslug(loaded: Loaded) -> Loaded {
    let Loaded {
        source,
        mut frontmatter,
    } = loaded;
    let slug = slug::slug_for(&frontmatter.title, &frontmatter.id);
    if slug != frontmatter.slug {
        log::info!(
            "{}: slug {:?} -> {:?}",
            source.display(),
            frontmatter.slug,
            slug
        );
    }
    frontmatter.slug = slug;
    Loaded {
        source,
        frontmatter,
    }
}

fn place(loaded: Loaded, config: &SiteConfig) -> Placed {
    let slug = &loaded.frontmatter.slug;
    let target = config.public_dir.join(slug);
    let permalink = format!("{}/{}/", config.root_url, slug);
    Placed {
        loaded,
        target,
        permalink,
    }
}

fn render(placed: Placed, config: &SiteConfig) -> Result<Rendered, ContentError> {
    let body = content::read_body(&placed.loaded.source)?;
    let body_html = markdown::render_markdown(&body, &config.responsive_images);
    Ok(Rendered { placed, body_html })
}

fn with_images(rendered: Rendered) -> Result<Post, ContentError> {
    let images = content::list_images(&rendered.placed.loaded.source)?;
    let Rendered {
        placed:
            Placed {
                loaded: Loaded {
                    source,
                    frontmatter,
                },
                target,
                permalink,
            },
        body_html,
    } = rendered;
    Ok(Post {
        source,
        frontmatter,
        target,
        permalink,
        body_html,
        images,
    })
}

/// Run every stage for one post directory.
pub fn compile_post(
    dir: &Path,
    config: &SiteConfig,
    now: DateTime<Utc>,
) -> Result<Post, ContentError> {
    let loaded = reslug(load(dir, now)?);
    let placed = place(loaded, config);
    with_images(render(placed, config)?)
}

/// Newest first; equal timestamps fall back to id so the order is total.
fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.frontmatter
            .created
            .cmp(&a.frontmatter.created)
            .then_with(|| a.frontmatter.id.cmp(&b.frontmatter.id))
    });
}

fn check_slugs(posts: &[Post]) -> Result<(), CompileError> {
    let mut slugs: HashMap<&str, &Path> = HashMap::new();
    let mut ids: HashMap<&str, &Path> = HashMap::new();
    for post in posts {
        if !slug::is_safe_slug(&post.frontmatter.slug) {
            return Err(CompileError::UnsafeSlug {
                slug: post.frontmatter.slug.clone(),
                post: post.source.clone(),
            });
        }
        if let Some(first) = ids.insert(&post.frontmatter.id, &post.source) {
            return Err(CompileError::DuplicateId {
                id: post.frontmatter.id.clone(),
                first: first.to_path_buf(),
                second: post.source.clone(),
            });
        }
        if let Some(first) = slugs.insert(&post.frontmatter.slug, &post.source) {
            return Err(CompileError::SlugCollision {
                slug: post.frontmatter.slug.clone(),
                first: first.to_path_buf(),
                second: post.source.clone(),
            });
        }
    }
    Ok(())
}

/// Compile every post under `config.content_dir`.
pub fn compile(config: &SiteConfig) -> Result<Site<'_>, CompileError> {
    compile_at(config, Utc::now())
}

/// [`compile`] with an explicit clock.
pub fn compile_at(config: &SiteConfig, now: DateTime<Utc>) -> Result<Site<'_>, CompileError> {
    let dirs = content::list_post_dirs(&config.content_dir)?;
    log::debug!(
        "compiling {} post directories in {}",
        dirs.len(),
        config.content_dir.display()
    );

    let mut posts = dirs
        .par_iter()
        .map(|dir| compile_post(dir, config, now))
        .collect::<Result<Vec<_>, _>>()?;

    sort_posts(&mut posts);
    check_slugs(&posts)?;

    Ok(Site { config, posts })
}
