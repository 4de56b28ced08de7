use clap::{Parser, Subcommand};
use sheetfolio::{config, content, generate, output, probe, sheet};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("SHEETFOLIO_ON_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("SHEETFOLIO_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "sheetfolio")]
#[command(about = "Static site generator for design portfolios")]
#[command(long_about = "\
Static site generator for design portfolios

Projects are listed in projects.json. Each project sheet lays out its
gallery in rows, driven by asset filenames:

  {sequence}_{width}_{order}.ext     e.g. 3_60_A.jpg, 3_40_B.jpg

Assets sharing a sequence sit side by side in one row; the width is the
asset's share of the row in percent and the order letter sorts them.

Content structure:

  content/
  ├── projects.json                # Project list (required)
  ├── about.md                     # About section on the index (optional)
  ├── config.toml                  # Site config (optional)
  └── public/                      # Media, copied verbatim to the output root
      └── projects/harbour/
          ├── hero.jpg             # No layout name: full-width row
          ├── 3_60_A.jpg           # Row 3, 60%, first
          └── 3_40_B.jpg           # Row 3, 40%, second

Run 'sheetfolio enrich' to record aspect ratios in projects.json and
'sheetfolio gen-config' to print a documented config.toml.

Set RUST_LOG=sheetfolio=debug for diagnostics.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the content directory and list its projects
    Check,
    /// Show how a project's sheet is split into rows
    Rows {
        /// Project id
        id: String,
        /// Print the rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Probe media files and record aspect ratios in projects.json
    Enrich,
    /// Produce the final HTML site
    Build,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site = content::load_site(&cli.source)?;
            output::print_check_output(&site);
            println!("==> Content is valid");
        }
        Command::Rows { id, json } => {
            let site = content::load_site(&cli.source)?;
            let Some(project) = content::find_project(&site.projects, &id) else {
                return Err(format!("no project with id '{id}'").into());
            };
            let assets = project.decorated_sheet_assets();
            let rows = sheet::build_sheet_rows(&assets);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                output::print_rows_output(project, &rows);
            }
        }
        Command::Enrich => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            let projects_json = cli.source.join("projects.json");
            let public_root = cli.source.join("public");
            let report = probe::enrich_file(&projects_json, &public_root)?;
            output::print_enrich_output(&report);
        }
        Command::Build => {
            println!("==> Loading {}", cli.source.display());
            let site = content::load_site(&cli.source)?;
            output::print_check_output(&site);

            println!("==> Generating HTML → {}", cli.output.display());
            let summary = generate::generate(&site, &cli.source, &cli.output)?;
            output::print_generate_output(&summary);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sheetfolio=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
