//! Regeneration runs.
//!
//! Wires the pipeline together for one `generate` invocation:
//!
//! ```text
//! compile ──▶ (full: wipe output root) ──▶ select ──▶ render ──▶ clear update flags
//! ```
//!
//! Compilation happens before anything is deleted, so a broken post leaves
//! the previous output in place. Only posts whose render finished without a
//! single failure have their `update` flag cleared; everything else stays
//! flagged and is picked up again by the next incremental run.

use crate::compile::{self, CompileError};
use crate::config::SiteConfig;
use crate::content::ContentError;
use crate::frontmatter;
use crate::imaging::ImageBackend;
use crate::render::{self, RenderError, RenderReport};
use crate::stale::{self, GenerateMode};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to persist update flags: {0}")]
    Flags(#[from] ContentError),
    #[error("cannot clear output directory {}: {source}", .path.display())]
    Clean { path: PathBuf, source: io::Error },
    #[error("output directory {} contains {}; refusing to wipe it", .public.display(), .inner.display())]
    UnsafeOutput { public: PathBuf, inner: PathBuf },
}

/// Everything a finished run did.
#[derive(Debug)]
pub struct RunSummary {
    pub mode: GenerateMode,
    /// Posts in the site, rendered or not.
    pub total_posts: usize,
    pub report: RenderReport,
    pub flags_cleared: usize,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.report.has_failures()
    }
}

/// Refuse to wipe an output root that holds the sources.
fn check_output_root(config: &SiteConfig) -> Result<(), GenerateError> {
    for inner in [&config.content_dir, &config.theme_dir] {
        if inner.starts_with(&config.public_dir) {
            return Err(GenerateError::UnsafeOutput {
                public: config.public_dir.clone(),
                inner: inner.clone(),
            });
        }
    }
    Ok(())
}

fn clean_output(config: &SiteConfig) -> Result<(), GenerateError> {
    check_output_root(config)?;
    let public = &config.public_dir;
    match fs::remove_dir_all(public) {
        Ok(()) => {
            log::info!("removed {}", public.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(GenerateError::Clean {
            path: public.clone(),
            source,
        }),
    }
}

/// Run one regeneration in `mode`.
pub fn generate(
    config: &SiteConfig,
    mode: GenerateMode,
    backend: &impl ImageBackend,
) -> Result<RunSummary, GenerateError> {
    let site = compile::compile(config)?;

    if mode == GenerateMode::Full {
        clean_output(config)?;
    }

    let selected = stale::select_for(mode, &site.posts);
    log::info!(
        "{mode} run: rendering {} of {} posts",
        selected.len(),
        site.posts.len()
    );

    let report = render::render_site(&site, &selected, backend)?;

    let rendered = selected
        .iter()
        .zip(&report.posts)
        .filter(|(_, outcome)| outcome.is_ok())
        .map(|(post, _)| *post);
    let flags_cleared = frontmatter::clear_update_flags(rendered)?;

    Ok(RunSummary {
        mode,
        total_posts: site.posts.len(),
        report,
        flags_cleared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::*;

    fn three_posts(project: &TestProject, stale: [bool; 3]) -> Vec<PathBuf> {
        ["Alpha", "Beta", "Gamma"]
            .iter()
            .zip(stale)
            .enumerate()
            .map(|(i, (title, update))| {
                let fm = fixture_frontmatter(
                    &format!("id-{i}"),
                    title,
                    &format!("2016-06-1{i}T00:00:00Z"),
                    update,
                );
                let dir = project.add_post(&title.to_lowercase(), &fm, "Body");
                project.add_image(&dir, "photo.jpg");
                dir
            })
            .collect()
    }

    #[test]
    fn full_run_renders_everything_and_clears_all_flags() {
        let project = TestProject::new();
        let dirs = three_posts(&project, [false, true, false]);

        let summary = generate(&project.config, GenerateMode::Full, &MockBackend::new()).unwrap();

        assert_eq!(summary.total_posts, 3);
        assert_eq!(summary.report.pages_written(), 3);
        assert_eq!(summary.flags_cleared, 3);
        for dir in &dirs {
            assert!(!project.read_frontmatter(dir).update);
        }
        for slug in ["alpha", "beta", "gamma"] {
            assert!(project.config.public_dir.join(slug).join("index.html").exists());
        }
    }

    #[test]
    fn full_run_wipes_previous_output() {
        let project = TestProject::new();
        three_posts(&project, [true, true, true]);
        let leftover = project.config.public_dir.join("old_post");
        fs::create_dir_all(&leftover).unwrap();

        generate(&project.config, GenerateMode::Full, &MockBackend::new()).unwrap();

        assert!(!leftover.exists());
    }

    #[test]
    fn incremental_run_only_touches_stale_posts() {
        let project = TestProject::new();
        let dirs = three_posts(&project, [false, true, false]);
        let backend = MockBackend::new();

        let summary = generate(&project.config, GenerateMode::Incremental, &backend).unwrap();

        assert_eq!(summary.report.posts.len(), 1);
        assert_eq!(summary.flags_cleared, 1);
        let public = &project.config.public_dir;
        assert!(public.join("beta/index.html").exists());
        assert!(!public.join("alpha").exists());
        assert!(!public.join("gamma").exists());
        assert!(public.join("index.html").exists());
        assert!(public.join("style.css").exists());

        assert!(!project.read_frontmatter(&dirs[1]).update);
        // Untouched posts keep their flags as they were on disk
        assert!(!project.read_frontmatter(&dirs[0]).update);
        assert!(backend.resized_outputs().iter().all(|o| o.contains("beta")));
    }

    #[test]
    fn incremental_run_keeps_other_output() {
        let project = TestProject::new();
        three_posts(&project, [true, true, true]);
        generate(&project.config, GenerateMode::Full, &MockBackend::new()).unwrap();
        let alpha_page = project.config.public_dir.join("alpha/index.html");
        fs::write(&alpha_page, "hand edited").unwrap();

        let summary =
            generate(&project.config, GenerateMode::Incremental, &MockBackend::new()).unwrap();

        assert!(summary.report.posts.is_empty());
        assert_eq!(fs::read_to_string(&alpha_page).unwrap(), "hand edited");
    }

    #[test]
    fn failed_post_keeps_its_flag() {
        let project = TestProject::new();
        let dirs = three_posts(&project, [true, true, true]);
        let backend = MockBackend::failing_on("beta/images/photo_large");

        let summary = generate(&project.config, GenerateMode::Incremental, &backend).unwrap();

        assert!(summary.has_failures());
        assert_eq!(summary.flags_cleared, 2);
        assert!(!project.read_frontmatter(&dirs[0]).update);
        assert!(project.read_frontmatter(&dirs[1]).update);
        assert!(!project.read_frontmatter(&dirs[2]).update);
    }

    #[test]
    fn compile_error_leaves_output_alone() {
        let project = TestProject::new();
        let dirs = three_posts(&project, [true, true, true]);
        generate(&project.config, GenerateMode::Full, &MockBackend::new()).unwrap();
        fs::write(dirs[0].join("frontmatter.json"), "{").unwrap();

        let err = generate(&project.config, GenerateMode::Full, &MockBackend::new()).unwrap_err();

        assert!(matches!(err, GenerateError::Compile(_)));
        assert!(project.config.public_dir.join("index.html").exists());
    }

    #[test]
    fn blank_post_cannot_replace_the_index() {
        let project = TestProject::new();
        three_posts(&project, [true, true, true]);
        generate(&project.config, GenerateMode::Full, &MockBackend::new()).unwrap();
        let index = project.config.public_dir.join("index.html");
        let before = fs::read_to_string(&index).unwrap();

        project.add_post(
            "blank",
            &fixture_frontmatter("", "", "2016-02-01T00:00:00Z", true),
            "blank body",
        );
        let err = generate(&project.config, GenerateMode::Full, &MockBackend::new()).unwrap_err();

        assert!(matches!(
            err,
            GenerateError::Compile(CompileError::UnsafeSlug { .. })
        ));
        assert_eq!(fs::read_to_string(&index).unwrap(), before);
    }

    #[test]
    fn refuses_to_wipe_output_root_containing_content() {
        let project = TestProject::new();
        let config = SiteConfig {
            public_dir: project.root.path().to_path_buf(),
            ..project.config.clone()
        };
        let err = generate(&config, GenerateMode::Full, &MockBackend::new()).unwrap_err();
        assert!(matches!(err, GenerateError::UnsafeOutput { .. }));
        assert!(config.content_dir.exists());
    }

    #[test]
    fn cleared_flags_persist_stamped_modified() {
        let project = TestProject::new();
        let dirs = three_posts(&project, [true, false, false]);
        let before = project.read_frontmatter(&dirs[0]);

        generate(&project.config, GenerateMode::Incremental, &MockBackend::new()).unwrap();

        let after = project.read_frontmatter(&dirs[0]);
        assert!(after.modified > before.modified);
        assert_eq!(after.created, before.created);
        assert_eq!(after.id, before.id);
    }
}
