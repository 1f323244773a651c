//! Serve command - hook server for a JavaScript loader shim

use clap::Args;
use vize_passerelle::{server, PasserelleConfig};

#[derive(Args)]
pub struct ServeArgs {
    /// Start the compiler worker before the first request
    #[arg(long)]
    pub eager: bool,
}

pub fn run(args: ServeArgs, config: PasserelleConfig) {
    let loader = super::build_loader(&config, config.loader_options());
    if args.eager {
        if let Err(e) = loader.compiler().start() {
            eprintln!("passerelle: {}", e);
            std::process::exit(1);
        }
    }

    tracing::info!(
        compiler = %config.compiler.command,
        extension = %config.extension,
        "hook server started (stdio mode)"
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(e) = server::run(&loader, stdin.lock(), stdout.lock()) {
        eprintln!("passerelle: server error: {}", e);
        std::process::exit(1);
    }
}
