use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use folio_core::{AppConfig, StartPage};

mod commands;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "A 3D portfolio scene in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to ~/.config/folio/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the terminal scene
    Run {
        /// Open straight into the explore carousel
        #[arg(short = 'e', long)]
        explore: bool,
    },
    /// Drive the scene headlessly and print one JSON line per frame
    Simulate {
        /// Number of frames to render
        #[arg(short = 'n', long, default_value_t = 300)]
        frames: u64,
        /// Frames per simulated second
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// TOML script of timed events (`[[events]]`)
        #[arg(short = 's', long, conflicts_with = "demo")]
        script: Option<PathBuf>,
        /// Use the built-in demo script
        #[arg(long)]
        demo: bool,
        /// Start in the explore carousel
        #[arg(short = 'e', long)]
        explore: bool,
    },
    /// Print the effective configuration
    Config,
    /// List portfolio works, padded with placeholders
    Works,
}

fn start_page(explore: bool) -> StartPage {
    if explore {
        StartPage::Explore
    } else {
        StartPage::Home
    }
}

/// Log to stderr, or to a file while the terminal UI owns the screen.
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::load().context("Failed to load config")?,
    };
    let config = Arc::new(config);

    let tui = matches!(cli.command, Some(Commands::Run { .. }) | None);
    init_logging(&config, tui)?;

    // Handle commands
    match cli.command {
        Some(Commands::Run { explore }) => commands::run::run(config, start_page(explore)).await,
        None => commands::run::run(config, StartPage::Home).await,
        Some(Commands::Simulate {
            frames,
            fps,
            script,
            demo,
            explore,
        }) => commands::simulate::run(
            &config,
            frames,
            fps,
            script.as_deref(),
            demo,
            start_page(explore),
        ),
        Some(Commands::Config) => commands::config::run(&config),
        Some(Commands::Works) => commands::works::run(&config),
    }
}
