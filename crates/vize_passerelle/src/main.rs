//! # passerelle
//!
//! Command-line front end for the Vue SFC loader hooks.
//!
//! - `passerelle transform Hello.vue` prints the compiled module
//! - `passerelle resolve ./Hello.vue --parent file:///app/main.js` prints the URL
//! - `passerelle serve` answers hook requests from a JavaScript loader shim

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vize_passerelle::config::{load_config, load_config_file};
use vize_passerelle::PasserelleConfig;

#[derive(Parser)]
#[command(name = "passerelle")]
#[command(about = "Import Vue single-file components as ES modules", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to passerelle.config.json (default: ./passerelle.config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Compiler worker command (overrides config and PASSERELLE_COMPILER)
    #[arg(long, global = true)]
    compiler: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile one SFC and print the module source
    Transform(commands::transform::TransformArgs),

    /// Resolve a specifier the way the loader would
    Resolve(commands::resolve::ResolveArgs),

    /// Serve loader hooks as line-delimited JSON on stdin/stdout
    Serve(commands::serve::ServeArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_env("PASSERELLE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config, cli.compiler);

    match cli.command {
        Commands::Transform(args) => commands::transform::run(args, config),
        Commands::Resolve(args) => commands::resolve::run(args, config),
        Commands::Serve(args) => commands::serve::run(args, config),
    }
}

/// Config file, then environment, then command line.
fn resolve_config(path: Option<PathBuf>, compiler: Option<String>) -> PasserelleConfig {
    let mut config = match path {
        Some(path) => load_config_file(&path),
        None => load_config(None),
    };
    config.apply_env();
    config.override_compiler(compiler);
    config
}
