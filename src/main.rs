//! `rehost` command-line front end
//!
//! Renders one archived route through the rehosting pipeline and prints the result, which
//! is handy for checking rewrites without running the web shell.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rehost::env::{logging::LogLevel, logging::NoColor, generate_env_docs, EnvVar};
use rehost::{Rehoster, SiteConfig};

/// Exit status for routes that resolve to the not-found page
const EXIT_NOT_FOUND: i32 = 2;

/// Render an archived page under the new brand
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Route segments, e.g. `blog post` or `blog/post`; empty for the home page
    segments: Vec<String>,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Directory holding the archived site trees
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    archive_root: Option<PathBuf>,

    /// Directory holding the `legacy/` and `remote/` asset mirrors
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    public_root: Option<PathBuf>,

    /// Print the full page descriptor as JSON instead of the HTML body
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write the default configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    init_config: Option<PathBuf>,

    /// List the supported environment variables and exit
    #[arg(long)]
    env_docs: bool,
}

impl Cli {
    /// Route segments with slash-separated arguments split apart
    fn route_segments(&self) -> Vec<String> {
        self.segments
            .iter()
            .flat_map(|segment| segment.split('/'))
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn init_logging(verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let level = match verbose {
        0 => LogLevel::get()?,
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let filter = EnvFilter::try_new(format!("rehost={}", level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(!NoColor::get_or_default(false))
        .with_target(false)
        .init();
    Ok(())
}

fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    if cli.env_docs {
        print!("{}", generate_env_docs());
        return Ok(0);
    }
    if let Some(path) = &cli.init_config {
        SiteConfig::generate_example_config(path)?;
        eprintln!("Wrote default configuration to {}", path.display());
        return Ok(0);
    }

    let mut config = SiteConfig::load(cli.config.as_deref())?;
    if let Some(archive_root) = &cli.archive_root {
        config.archive_root = archive_root.clone();
    }
    if let Some(public_root) = &cli.public_root {
        config.public_root = public_root.clone();
    }
    config.validate()?;

    let rehoster = Rehoster::new(config);
    let page = rehoster.get_page(&cli.route_segments())?;

    let mut stdout = io::stdout().lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut stdout, page.as_ref())?;
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "{}", page.html)?;
    }

    if page.is_not_found() {
        tracing::warn!("no archived page for {:?}", cli.segments);
        return Ok(EXIT_NOT_FOUND);
    }
    Ok(0)
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    }
}
