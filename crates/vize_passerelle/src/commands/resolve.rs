//! Resolve command - print the URL a specifier resolves to

use clap::Args;
use vize_passerelle::{LoaderHooks, PasserelleConfig, ResolveContext, ResolveOutput};

#[derive(Args)]
pub struct ResolveArgs {
    /// Import specifier, e.g. `./Hello.vue`
    pub specifier: String,

    /// URL of the importing module (default: the working directory)
    #[arg(long)]
    pub parent: Option<String>,
}

pub fn run(args: ResolveArgs, config: PasserelleConfig) {
    let loader = super::build_loader(&config, config.loader_options());
    let context = ResolveContext {
        parent_url: args.parent,
        conditions: Vec::new(),
    };

    let mut delegated = false;
    let result = loader.resolve(&args.specifier, &context, |specifier, _| {
        delegated = true;
        Ok(ResolveOutput {
            url: specifier.to_string(),
        })
    });

    match result {
        Ok(_) if delegated => println!("delegate"),
        Ok(output) => println!("{}", output.url),
        Err(e) => {
            eprintln!("passerelle: {}", e);
            std::process::exit(1);
        }
    }
}
