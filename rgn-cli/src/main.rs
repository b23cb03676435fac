//! Point d'entrée CLI pour rgn

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rgn::Order;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;
mod config;
mod report;

use cli::Commands;
use config::Config;

/// Inspecter et valider le réseau géodésique national (RGN)
#[derive(Parser)]
#[command(name = "rgn")]
#[command(author, version)]
#[command(about = "Inspect and validate a geodesic reference network (RGN XML)")]
#[command(long_about = "Loads an RGN XML file, groups the geodesic vertices by order and answers validation, radius and altitude queries.\n\nThe orders listed in --orders (default: all) are shown before the query runs.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Sortie JSON
    #[arg(long, global = true)]
    json: bool,

    /// Fichier RGN XML (défaut : env RGN_FILE / resources/rgn.xml)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Fichier de configuration JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ordres visibles, séparés par des virgules (défaut : env RGN_ORDERS / 1,2,3,4)
    #[arg(long, global = true, value_delimiter = ',')]
    orders: Option<Vec<Order>>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    let config = Config::resolve(cli.config.as_deref(), cli.file, cli.orders)?;
    info!(file = %config.file.display(), orders = ?config.orders, "Configuration");

    cli::check_file(&config.file)?;
    cli::run(&cli.command, &config, cli.json)
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
