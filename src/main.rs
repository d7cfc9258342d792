//! # Passerelle CLI
//!
//! ## Usage
//!
//! ```bash
//! passerelle --config ./config/passerelle.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `passerelle run [INPUT]` | Fill the markers of an article and write its header |
//! | `passerelle examples` | Summarise the few-shot dataset |
//! | `passerelle version` | Print the version and content fingerprint |
//! | `passerelle completions <shell>` | Print shell completions |
//!
//! ## Examples
//!
//! ```bash
//! # Fill an article read from a file
//! passerelle run article.txt
//!
//! # Read from stdin, reproducible choices, JSON report
//! cat article.txt | passerelle run --seed 42 --json
//! ```

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Read;
use std::path::{Path, PathBuf};

use passerelle::config::{self, Config};
use passerelle::display::{render_notice, render_text};
use passerelle::endpoint::HttpEndpoint;
use passerelle::logging::{self, LogFormat};
use passerelle::pipeline::{self, RunError};
use passerelle::{examples, version};
use passerelle_core::models::Notice;

/// Passerelle: five-word connectives and headlines for French articles.
///
/// The endpoint URL and token are read from the secrets file, a `.env`
/// file, or the `API_URL` / `API_TOKEN` environment variables.
#[derive(Parser)]
#[command(name = "passerelle", version)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/passerelle.toml`. A missing file means
    /// built-in defaults.
    #[arg(long, global = true, default_value = "./config/passerelle.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log line format on stderr.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill every marker of an article and generate its title and blurb.
    ///
    /// Reads INPUT, or stdin when INPUT is `-` or omitted.
    Run {
        /// Article file.
        input: Option<PathBuf>,

        /// Print the run report as JSON.
        #[arg(long)]
        json: bool,

        /// Seed the random choices (example selection, fillers).
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Load the example dataset and print a summary.
    Examples,

    /// Print the version and content fingerprint.
    Version,

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format);

    // Commands that don't require config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "passerelle", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Run { input, json, seed } => {
            run_command(&cfg, &cli.config, input.as_deref(), json, seed).await?;
        }
        Commands::Examples => {
            examples::run_examples(&cfg.examples.path)?;
        }
        Commands::Version => {
            let fp = fingerprint(&cli.config, &cfg);
            println!("passerelle {} ({})", env!("CARGO_PKG_VERSION"), fp);
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

async fn run_command(
    cfg: &Config,
    config_path: &Path,
    input: Option<&Path>,
    json: bool,
    seed: Option<u64>,
) -> Result<()> {
    let credentials = config::resolve_credentials(&cfg.endpoint)?;
    let text = read_input(input)?;
    let pairs = examples::load_examples(&cfg.examples.path)?;
    let fp = fingerprint(config_path, cfg);
    let endpoint = HttpEndpoint::new(&credentials)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut report = match pipeline::run(&endpoint, cfg, &pairs, &mut rng, &text).await {
        Ok(report) => report,
        Err(e @ RunError::MissingMarker { .. }) => {
            eprintln!("{}", render_notice(&Notice::warning(e.to_string())));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{}", render_notice(&Notice::error(e.to_string())));
            std::process::exit(1);
        }
    };
    report.version = Some(fp);

    for notice in &report.notices {
        eprintln!("{}", render_notice(notice));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read article: {}", path.display())),
        _ => {
            if atty::is(atty::Stream::Stdin) {
                bail!("No article given: pass a file or pipe the text on stdin.");
            }
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read article from stdin")?;
            Ok(text)
        }
    }
}

fn fingerprint(config_path: &Path, cfg: &Config) -> String {
    let mut paths = vec![config_path.to_path_buf(), cfg.examples.path.clone()];
    if let Ok(exe) = std::env::current_exe() {
        paths.insert(0, exe);
    }
    version::fingerprint(&paths)
}
