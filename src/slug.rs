//! Slug derivation and content-directory naming.
//!
//! A slug is the URL- and filesystem-safe identifier of a post. It is derived
//! from the title on every compile pass, so editing a title moves the post's
//! public URL without touching its content directory.
//!
//! ## Rules
//!
//! - Non-ASCII letters are transliterated (`Café` → `Cafe`)
//! - Punctuation is dropped
//! - Words are lower-cased and joined with a single `_`
//!
//! ```text
//! "Hey, A Post!"          → hey_a_post
//! "  spaced    out  "     → spaced_out
//! "snake_case already"    → snake_case_already
//! "Café Crème"            → cafe_creme
//! "HeyThere 2day"         → heythere_2day
//! ```
//!
//! Only whitespace and `_` separate words. Case changes and letter/digit
//! boundaries inside a word do not, so camelCase titles collapse into one
//! lower-case word.
//!
//! A post whose title yields no slug falls back to its id. Whatever the
//! source, the final slug must pass [`is_safe_slug`]: it becomes a single
//! directory under the output root.
//!
//! ## Directory Names
//!
//! Content directories are named `YYYY_MM_DD_<slug>` from the creation date
//! and the slug at creation time. They are stable storage keys and are never
//! renamed when the slug later changes.

use chrono::{DateTime, Utc};

/// Word separator in slugs and directory names.
pub const SEPARATOR: char = '_';

/// Derive a slug from arbitrary text. May return an empty string when the
/// text has no letters or digits; see [`slug_for`].
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let stripped: String = ascii
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == SEPARATOR || c.is_whitespace())
        .collect();

    stripped
        .split(|c: char| c.is_whitespace() || c == SEPARATOR)
        .filter(|word| !word.is_empty())
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

/// The slug for a post: the slugified title, or the post id when the title
/// is empty or has nothing slug-worthy in it. Never empty for a non-empty id.
pub fn slug_for(title: &str, id: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() { id.to_string() } else { slug }
}

/// True when `slug` is non-empty and made only of ASCII letters, digits,
/// `_` and `-`, so it names exactly one directory below the output root.
pub fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == SEPARATOR || c == '-')
}

/// Content directory name for a post created at `created` with `slug`.
pub fn content_dir_name(created: &DateTime<Utc>, slug: &str) -> String {
    format!("{}{}{}", created.format("%Y_%m_%d"), SEPARATOR, slug)
}
