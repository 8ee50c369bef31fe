//! Which posts a run regenerates.

use crate::compile::Post;
use std::fmt;

/// How much of the site a `generate` run rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateMode {
    /// Wipe the output root and render every post.
    Full,
    /// Keep the output root and render only posts flagged for update.
    Incremental,
}

impl fmt::Display for GenerateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateMode::Full => write!(f, "full"),
            GenerateMode::Incremental => write!(f, "incremental"),
        }
    }
}

/// Posts whose `update` flag is set, in their original order.
pub fn select_stale(posts: &[Post]) -> Vec<&Post> {
    posts.iter().filter(|p| p.frontmatter.update).collect()
}

/// Posts a run in `mode` should render.
pub fn select_for(mode: GenerateMode, posts: &[Post]) -> Vec<&Post> {
    match mode {
        GenerateMode::Full => posts.iter().collect(),
        GenerateMode::Incremental => select_stale(posts),
    }
}
