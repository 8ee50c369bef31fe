//! # Quill
//!
//! A small static blog generator. Every post is a directory of plain files;
//! the generator turns them into static HTML pages with responsive images and
//! remembers, per post, whether it still needs rendering.
//!
//! # Architecture: Compile, Select, Render
//!
//! ```text
//! 1. Compile   content/  →  Site           (frontmatter, slug, target, HTML body, images)
//! 2. Select    Site      →  [&Post]        (everything, or only posts flagged `update`)
//! 3. Render    [&Post]   →  public/        (pages, image variants, index, theme assets)
//! 4. Clear     rendered  →  frontmatter    (`update = false` for posts that rendered cleanly)
//! ```
//!
//! Compilation is all-or-nothing: a missing or malformed file anywhere aborts
//! the run before any output is touched. Rendering isolates failures per post
//! and reports them; a post that failed keeps its `update` flag and is
//! retried by the next incremental run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, stock defaults, validation |
//! | [`content`] | On-disk post layout: list posts, read/write frontmatter and body, list images |
//! | [`frontmatter`] | The per-post metadata record and the update-flag writer |
//! | [`slug`] | Title → slug, content directory naming |
//! | [`markdown`] | Markdown → HTML with `<picture>` rewriting of image references |
//! | [`imaging`] | Image backend trait, pure-Rust backend, responsive variant derivation |
//! | [`compile`] | Stage 1: builds the [`compile::Site`] model |
//! | [`stale`] | Stage 2: picks the posts a run renders |
//! | [`render`] | Stage 3: writes pages, variants, index and assets |
//! | [`generate`] | Full and incremental runs, wiring stages 1-4 together |
//! | [`create`] | Scaffolds new post directories |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Stable Content Directories
//!
//! A post's content directory is named from its creation date and the slug it
//! had at creation (`2016_06_13_hey_a_post`). The slug itself is recomputed
//! from the title on every run, so retitling a post moves its public URL but
//! never renames the directory. The directory is the storage key; the slug is
//! the public path.
//!
//! ## Runtime Templates
//!
//! Pages are rendered with [Tera](https://keats.github.io/tera/) templates
//! read from the theme directory, so a blog can restyle itself without
//! rebuilding the binary. The `<picture>` markup inside post bodies is built
//! with Maud while the markdown is rendered, so attribute values are escaped
//! at the source.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module decodes, orients and resizes with the `image` crate
//! (Lanczos3 resampling). No ImageMagick, no system libraries: the binary is
//! self-contained.

pub mod compile;
pub mod config;
pub mod content;
pub mod create;
pub mod frontmatter;
pub mod generate;
pub mod imaging;
pub mod markdown;
pub mod output;
pub mod render;
pub mod slug;
pub mod stale;

#[cfg(test)]
pub(crate) mod test_helpers;
