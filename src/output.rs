//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every post is shown by its positional index and title, with filesystem
//! paths as indented context lines. Untitled posts fall back to their slug in
//! parentheses, since the slug is then their only identity.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Posts
//! 001 Hey, A Post! [stale]
//!     Source: 2016_06_13_hey_a_post/
//!     Target: hey_a_post/
//!     Images: photo.jpg, diagram.png
//! 002 (3f2a9c)
//!     Source: 2016_06_10_3f2a9c/
//!     Target: 3f2a9c/
//!
//! 2 posts, 1 stale
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! 001 Hey, A Post! → hey_a_post/index.html
//!     5 variants from 2 images
//!     FAILED photo.jpg (large): Processing failed: ...
//! Assets: style.css
//!
//! Generated 1 page, 5 variants from 2 images (incremental run, 2 posts)
//! Cleared 0 update flags
//! 1 post failed; it stays flagged for the next run
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::compile::{Post, Site};
use crate::generate::RunSummary;
use crate::render::PostOutcome;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Titled posts show the title, untitled ones show the slug in parens.
fn post_header(index: usize, title: &str, slug: &str) -> String {
    if title.is_empty() {
        format!("{} ({})", format_index(index), slug)
    } else {
        format!("{} {}", format_index(index), title)
    }
}

/// `path` relative to `root`, with a trailing slash for directories.
fn display_dir(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    format!("{}/", rel.display())
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the content inventory shown by `check`.
pub fn format_check_output(site: &Site<'_>) -> Vec<String> {
    let config = site.config;
    let mut lines = vec!["Posts".to_string()];

    for (i, post) in site.posts.iter().enumerate() {
        let fm = &post.frontmatter;
        let mut header = post_header(i + 1, &fm.title, &fm.slug);
        if fm.update {
            header.push_str(" [stale]");
        }
        lines.push(header);
        lines.push(format!(
            "{}Source: {}",
            indent(1),
            display_dir(&post.source, &config.content_dir)
        ));
        lines.push(format!(
            "{}Target: {}",
            indent(1),
            display_dir(&post.target, &config.public_dir)
        ));
        if !post.images.is_empty() {
            lines.push(format!("{}Images: {}", indent(1), post.images.join(", ")));
        }
    }

    let stale = site.posts.iter().filter(|p| p.frontmatter.update).count();
    lines.push(String::new());
    lines.push(format!("{}, {} stale", plural(site.posts.len(), "post"), stale));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(site: &Site<'_>) {
    for line in format_check_output(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

fn format_outcome(index: usize, outcome: &PostOutcome, public_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let page = display_dir(&outcome.target, public_dir);
    lines.push(format!(
        "{} \u{2192} {}index.html",
        post_header(index, &outcome.title, &outcome.slug),
        page
    ));
    if outcome.images > 0 {
        lines.push(format!(
            "{}{} from {}",
            indent(1),
            plural(outcome.variants_written, "variant"),
            plural(outcome.images, "image")
        ));
    }
    for failure in &outcome.failures {
        lines.push(format!("{}FAILED {}", indent(1), failure));
    }
    lines
}

/// Format the result of a `generate` run.
pub fn format_generate_output(summary: &RunSummary, public_dir: &Path) -> Vec<String> {
    let report = &summary.report;
    let mut lines = vec!["Home \u{2192} index.html".to_string()];

    for (i, outcome) in report.posts.iter().enumerate() {
        lines.extend(format_outcome(i + 1, outcome, public_dir));
    }

    if !report.assets.is_empty() {
        let names: Vec<String> = report
            .assets
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        lines.push(format!("Assets: {}", names.join(", ")));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {} from {} ({} run, {})",
        plural(report.pages_written(), "page"),
        plural(report.variants_written(), "variant"),
        plural(report.images(), "image"),
        summary.mode,
        plural(summary.total_posts, "post")
    ));
    lines.push(format!(
        "Cleared {}",
        plural(summary.flags_cleared, "update flag")
    ));

    let failed = report.failed().count();
    if failed > 0 {
        let noun = if failed == 1 { "it stays" } else { "they stay" };
        lines.push(format!(
            "{} failed; {} flagged for the next run",
            plural(failed, "post"),
            noun
        ));
    }
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(summary: &RunSummary, public_dir: &Path) {
    for line in format_generate_output(summary, public_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// New
// ============================================================================

/// Format the result of `new`.
pub fn format_new_output(post: &Post) -> Vec<String> {
    let fm = &post.frontmatter;
    vec![
        format!("Created {}", post.source.display()),
        format!("{}Slug: {}", indent(1), fm.slug),
        format!("{}Id: {}", indent(1), fm.id),
        format!("{}Permalink: {}", indent(1), post.permalink),
    ]
}

/// Print new-post output to stdout.
pub fn print_new_output(post: &Post) {
    for line in format_new_output(post) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::imaging::BackendError;
    use crate::render::{PostFailure, RenderReport};
    use crate::stale::GenerateMode;
    use crate::test_helpers::fixture_post;
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn post_header_titled_and_untitled() {
        assert_eq!(post_header(1, "Hello", "hello"), "001 Hello");
        assert_eq!(post_header(2, "", "3f2a9c"), "002 (3f2a9c)");
    }

    #[test]
    fn display_dir_is_relative_to_root() {
        assert_eq!(
            display_dir(Path::new("/content/2016_06_13_a"), Path::new("/content")),
            "2016_06_13_a/"
        );
    }

    #[test]
    fn plural_words() {
        assert_eq!(plural(1, "post"), "1 post");
        assert_eq!(plural(0, "post"), "0 posts");
        assert_eq!(plural(3, "image"), "3 images");
    }

    // =========================================================================
    // Check
    // =========================================================================

    fn site_config() -> SiteConfig {
        SiteConfig {
            content_dir: PathBuf::from("/content"),
            public_dir: PathBuf::from("/public"),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn check_lists_posts_with_staleness() {
        let config = site_config();
        let mut first = fixture_post("hey_a_post", true);
        first.frontmatter.title = "Hey, A Post!".to_string();
        first.images = vec!["photo.jpg".to_string(), "diagram.png".to_string()];
        let mut second = fixture_post("3f2a9c", false);
        second.frontmatter.title = String::new();
        let site = Site {
            config: &config,
            posts: vec![first, second],
        };

        let lines = format_check_output(&site);

        assert_eq!(
            lines,
            vec![
                "Posts",
                "001 Hey, A Post! [stale]",
                "    Source: hey_a_post/",
                "    Target: hey_a_post/",
                "    Images: photo.jpg, diagram.png",
                "002 (3f2a9c)",
                "    Source: 3f2a9c/",
                "    Target: 3f2a9c/",
                "",
                "2 posts, 1 stale",
            ]
        );
    }

    #[test]
    fn check_empty_site() {
        let config = site_config();
        let site = Site {
            config: &config,
            posts: vec![],
        };
        assert_eq!(format_check_output(&site), vec!["Posts", "", "0 posts, 0 stale"]);
    }

    // =========================================================================
    // Generate
    // =========================================================================

    fn outcome(
        slug: &str,
        title: &str,
        images: usize,
        written: usize,
        failures: Vec<PostFailure>,
    ) -> PostOutcome {
        PostOutcome {
            slug: slug.to_string(),
            title: title.to_string(),
            target: PathBuf::from("/public").join(slug),
            page_written: true,
            images,
            variants_written: written,
            failures,
        }
    }

    #[test]
    fn generate_summary_lines() {
        let summary = RunSummary {
            mode: GenerateMode::Full,
            total_posts: 1,
            report: RenderReport {
                index: PathBuf::from("/public/index.html"),
                posts: vec![outcome("hey_a_post", "Hey, A Post!", 1, 3, vec![])],
                assets: vec![PathBuf::from("/public/style.css")],
            },
            flags_cleared: 1,
        };

        let lines = format_generate_output(&summary, Path::new("/public"));

        assert_eq!(
            lines,
            vec![
                "Home \u{2192} index.html",
                "001 Hey, A Post! \u{2192} hey_a_post/index.html",
                "    3 variants from 1 image",
                "Assets: style.css",
                "",
                "Generated 1 page, 3 variants from 1 image (full run, 1 post)",
                "Cleared 1 update flag",
            ]
        );
    }

    #[test]
    fn generate_reports_failures() {
        let failure = PostFailure::Variant {
            image: "photo.jpg".to_string(),
            label: "large".to_string(),
            error: BackendError::ProcessingFailed("boom".to_string()),
        };
        let summary = RunSummary {
            mode: GenerateMode::Incremental,
            total_posts: 3,
            report: RenderReport {
                index: PathBuf::from("/public/index.html"),
                posts: vec![outcome("beta", "Beta", 1, 2, vec![failure])],
                assets: vec![],
            },
            flags_cleared: 0,
        };

        let lines = format_generate_output(&summary, Path::new("/public"));

        assert!(lines.contains(&"    FAILED photo.jpg (large): Processing failed: boom".to_string()));
        assert!(lines.contains(
            &"Generated 1 page, 2 variants from 1 image (incremental run, 3 posts)".to_string()
        ));
        assert_eq!(
            lines.last().unwrap(),
            "1 post failed; it stays flagged for the next run"
        );
    }

    #[test]
    fn new_output_shows_identity() {
        let post = fixture_post("my_title", true);
        let lines = format_new_output(&post);
        assert_eq!(lines[0], "Created /content/my_title");
        assert_eq!(lines[1], "    Slug: my_title");
        assert_eq!(lines[2], "    Id: id-my_title");
        assert_eq!(lines[3], "    Permalink: http://localhost/blog/my_title/");
    }
}
