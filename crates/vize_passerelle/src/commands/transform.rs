//! Transform command - compile one SFC file

use std::path::PathBuf;

use clap::Args;
use vize_passerelle::{PasserelleConfig, RenderMode};

#[derive(Args)]
pub struct TransformArgs {
    /// SFC file to compile
    pub file: PathBuf,

    /// Compile the template to `ssrRender`
    #[arg(long)]
    pub ssr: bool,
}

pub fn run(args: TransformArgs, config: PasserelleConfig) {
    let mut options = config.loader_options();
    if args.ssr {
        options.render_mode = RenderMode::Server;
    }
    let loader = super::build_loader(&config, options);

    match loader.transform_file(&args.file) {
        Ok(source) => println!("{}", source),
        Err(e) => {
            eprintln!("passerelle: {}", e);
            std::process::exit(1);
        }
    }

    let failures = loader.error_store().take();
    if !failures.is_empty() {
        for failure in &failures {
            eprintln!(
                "passerelle: {} template error(s) in {}",
                failure.diagnostics.len(),
                failure.filename
            );
        }
        std::process::exit(2);
    }
}
