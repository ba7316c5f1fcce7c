//! Folio CLI - portfolio site generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio site generator with a live server and static export")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to folio.toml config file
    #[arg(short, long, default_value = "folio.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a portfolio in the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Serve the portfolio live from its sources
    Dev {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Export the portfolio as a static site
    Bake {
        /// Output directory (defaults to config or "bake_output")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Preview a baked site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to config or "bake_output")
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Dev { port, no_open } => {
            let config = config::SiteConfig::load(&cli.config)?;
            commands::dev::run(&config, port, !no_open).await?;
        }
        Commands::Bake { output, no_minify } => {
            let config = config::SiteConfig::load(&cli.config)?;
            let minify = if no_minify { Some(false) } else { None };
            commands::bake::run(&config, output, minify).await?;
        }
        Commands::Serve { port, dir } => {
            let config = config::SiteConfig::load(&cli.config)?;
            let dir = dir.unwrap_or_else(|| config.paths.output.clone());
            commands::serve::run(port, dir).await?;
        }
    }

    Ok(())
}
