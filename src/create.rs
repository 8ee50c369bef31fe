//! Scaffolding for new posts.
//!
//! ```text
//! content/2016_06_13_my_title/
//! ├── frontmatter.json   # fresh id, created = modified = now, update = true
//! ├── main.md            # placeholder comment
//! └── images/
//! ```

use crate::compile::Post;
use crate::config::SiteConfig;
use crate::content::{self, ContentError, IMAGES_DIR};
use crate::frontmatter::Frontmatter;
use crate::slug;
use chrono::{DateTime, SubsecRound, Utc};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Body written into every new `main.md`.
pub const PLACEHOLDER_BODY: &str = "<!-- Write your post here! -->";

#[derive(Error, Debug)]
pub enum CreateError {
    #[error("post directory {} already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("cannot create {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Frontmatter for a post created at `now`.
pub fn default_frontmatter(
    title: Option<&str>,
    author: &str,
    id: String,
    now: DateTime<Utc>,
) -> Frontmatter {
    let title = title.unwrap_or_default().trim().to_string();
    Frontmatter {
        slug: slug::slug_for(&title, &id),
        id,
        title,
        author: author.to_string(),
        created: now,
        modified: now,
        keywords: Vec::new(),
        update: true,
    }
}

/// Create a new post directory under `config.content_dir`.
pub fn create_post(config: &SiteConfig, title: Option<&str>) -> Result<Post, CreateError> {
    let now = Utc::now().trunc_subsecs(3);
    let frontmatter = default_frontmatter(
        title,
        &config.author,
        Uuid::new_v4().to_string(),
        now,
    );
    create_post_with(config, frontmatter)
}

/// Write `frontmatter` into a new directory named after its creation date
/// and slug. Fails rather than overwrite an existing directory.
pub fn create_post_with(
    config: &SiteConfig,
    frontmatter: Frontmatter,
) -> Result<Post, CreateError> {
    let name = slug::content_dir_name(&frontmatter.created, &frontmatter.slug);
    let dir = config.content_dir.join(&name);

    fs::create_dir_all(&config.content_dir).map_err(|source| CreateError::Io {
        path: config.content_dir.clone(),
        source,
    })?;
    match fs::create_dir(&dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(CreateError::AlreadyExists(dir));
        }
        Err(source) => return Err(CreateError::Io { path: dir, source }),
    }
    let images = dir.join(IMAGES_DIR);
    fs::create_dir(&images).map_err(|source| CreateError::Io {
        path: images,
        source,
    })?;

    content::write_frontmatter(&dir, &frontmatter)?;
    content::write_body(&dir, PLACEHOLDER_BODY)?;
    log::info!("created {}", dir.display());

    let slug = frontmatter.slug.clone();
    Ok(Post {
        target: config.public_dir.join(&slug),
        permalink: format!("{}/{}/", config.root_url, slug),
        source: dir,
        frontmatter,
        body_html: String::new(),
        images: Vec::new(),
    })
}
