use clap::{ArgGroup, Parser, Subcommand};
use quill::imaging::RustBackend;
use quill::stale::GenerateMode;
use quill::{compile, config, create, generate, output};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Static blog generator with responsive images")]
#[command(long_about = "\
Static blog generator with responsive images

Every post is a directory of plain files. Quill renders them into static HTML,
resizes every post image once per configured width, and remembers which posts
still need rendering through the `update` flag in each frontmatter.json.

Project structure:

  my-blog/
  ├── config.toml                      # Site config (optional)
  ├── content/
  │   └── 2016_06_13_hey_a_post/       # Created by `quill new`
  │       ├── frontmatter.json         # id, title, slug, dates, keywords, update
  │       ├── main.md                  # Markdown body
  │       └── images/                  # Referenced as ![Alt](photo.jpg)
  ├── theme/
  │   ├── index.tera                   # Rendered with { posts, config }
  │   ├── post.tera                    # Rendered with { post, config }
  │   └── style.css                    # *.css, *.js, *.svg copied to public/
  └── public/                          # Generated output

Set `\"update\": true` in a post's frontmatter.json after editing it, then run
`quill generate --updated` to re-render only the flagged posts.

Run 'quill gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Project root holding config.toml, content/ and theme/
    #[arg(long, default_value = ".", global = true)]
    project: PathBuf,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
#[command(group(ArgGroup::new("mode").required(true).args(["all", "updated"])))]
struct GenerateArgs {
    /// Wipe the output directory and render every post
    #[arg(long)]
    all: bool,
    /// Render only posts whose frontmatter has `update: true`
    #[arg(long)]
    updated: bool,
}

impl GenerateArgs {
    fn mode(&self) -> GenerateMode {
        if self.all {
            GenerateMode::Full
        } else {
            GenerateMode::Incremental
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Render the site (full or incremental)
    Generate(GenerateArgs),
    /// Create a new post directory
    New {
        /// Post title; the slug is derived from it
        #[arg(long)]
        title: Option<String>,
    },
    /// Validate content and list posts without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate(args) => {
            let site_config = config::load_config(&cli.project)?;
            init_thread_pool(&site_config.processing);
            let summary = generate::generate(&site_config, args.mode(), &RustBackend::new())?;
            output::print_generate_output(&summary, &site_config.public_dir);
            if summary.has_failures() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::New { title } => {
            let site_config = config::load_config(&cli.project)?;
            let post = create::create_post(&site_config, title.as_deref())?;
            output::print_new_output(&post);
        }
        Command::Check => {
            let site_config = config::load_config(&cli.project)?;
            init_thread_pool(&site_config.processing);
            println!("==> Checking {}", site_config.content_dir.display());
            let site = compile::compile(&site_config)?;
            output::print_check_output(&site);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Initialize env_logger: `warn` by default, raised by `-v`, overridden by RUST_LOG.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
