//! Post metadata and the update-flag writer.
//!
//! Every post directory holds a `frontmatter.json`:
//!
//! ```json
//! {
//! 	"id": "0b6f4d1e-2c1a-4a57-9a53-0d1f1b0b9f11",
//! 	"title": "Hey, A Post!",
//! 	"author": "Ada",
//! 	"slug": "hey_a_post",
//! 	"created": "2016-06-13T21:04:05Z",
//! 	"modified": "2016-06-13T21:04:05Z",
//! 	"keywords": [],
//! 	"update": true
//! }
//! ```
//!
//! The `update` flag is the only durable state separating "already rendered"
//! from "needs rendering": new posts start with `true`, authors flip it back
//! on after editing, and [`clear_update_flags`] drives it to `false` once a
//! post has rendered cleanly.

use crate::compile::Post;
use crate::content::{self, ContentError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured metadata for one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Generated once at creation; never changes.
    pub id: String,
    pub title: String,
    pub author: String,
    /// Recomputed from `title` on every compile pass.
    pub slug: String,
    /// Set once at creation; never changes.
    pub created: DateTime<Utc>,
    /// Bumped every time the frontmatter is read by a compile pass.
    pub modified: DateTime<Utc>,
    pub keywords: Vec<String>,
    /// `true` means the post needs (re)generation.
    pub update: bool,
}

impl Frontmatter {
    /// Mark the record as read at `now`, keeping `created <= modified`.
    pub fn touched(self, now: DateTime<Utc>) -> Self {
        let modified = now.max(self.created);
        Self { modified, ..self }
    }

    /// Copy of the record with the update flag cleared.
    pub fn rendered(&self) -> Self {
        Self {
            update: false,
            ..self.clone()
        }
    }
}

/// Encode as tab-indented JSON, the on-disk format of `frontmatter.json`.
pub fn to_json(frontmatter: &Frontmatter) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    frontmatter.serialize(&mut ser)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn from_json(json: &str) -> Result<Frontmatter, serde_json::Error> {
    serde_json::from_str(json)
}

/// Persist `update = false` for every post in the batch.
///
/// Callers pass only posts whose render succeeded; posts outside the batch
/// keep whatever flag is on disk. Stops at the first failed write.
pub fn clear_update_flags<'a>(
    posts: impl IntoIterator<Item = &'a Post>,
) -> Result<usize, ContentError> {
    let mut cleared = 0;
    for post in posts {
        content::write_frontmatter(&post.source, &post.frontmatter.rendered())?;
        log::debug!("cleared update flag for {}", post.frontmatter.slug);
        cleared += 1;
    }
    Ok(cleared)
}
