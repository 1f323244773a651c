//! CLI commands

pub mod resolve;
pub mod serve;
pub mod transform;

use vize_passerelle::{LoaderOptions, PasserelleConfig, SfcLoader, WorkerCompiler};

/// Build a loader whose worker starts on first use.
pub fn build_loader(
    config: &PasserelleConfig,
    options: LoaderOptions,
) -> SfcLoader<WorkerCompiler> {
    let compiler = WorkerCompiler::lazy(&config.compiler.command, &config.compiler.args);
    match SfcLoader::new(compiler, options) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("passerelle: {}", e);
            std::process::exit(1);
        }
    }
}
