//! # vize_passerelle
//!
//! Passerelle - Module loader hooks that import Vue SFCs as ES modules.
//!
//! ## Name Origin
//!
//! A **passerelle** is a footbridge. This crate is the small bridge between a
//! test runner's module system and a Vue SFC compiler: `.vue` files walk in as
//! raw source and walk out as plain, evaluable ES modules.
//!
//! ## Pipeline
//!
//! - [`matcher`] - Extension predicate shared by every hook
//! - [`hooks`] - The three loader hooks (`resolve`, `get_format`, `transform_source`)
//! - [`compiler`] - The black-box SFC compiler seam
//! - [`script`] - Script compilation and default export rewriting
//! - [`template`] - Template compilation and render function renaming
//! - [`worker`] - An [`SfcCompiler`] backed by an external compiler process
//! - [`server`] - Line-delimited JSON hook server for JS loader shims
//!
//! # Example
//!
//! ```ignore
//! use vize_passerelle::{LoaderHooks, LoaderOptions, SfcLoader, TransformContext, WorkerCompiler};
//!
//! let compiler = WorkerCompiler::spawn("node", &["sfc-worker.mjs".into()])?;
//! let loader = SfcLoader::new(compiler, LoaderOptions::default())?;
//!
//! let context = TransformContext::new("file:///app/Hello.vue");
//! let output = loader.transform_source(source, &context, |_, _| unreachable!())?;
//! println!("{}", output.source);
//! ```

pub mod compiler;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod hooks;
pub mod matcher;
pub mod rewrite_default;
pub mod script;
pub mod server;
pub mod store;
pub mod template;
pub mod worker;

mod loader;

pub use compiler::{
    CompilerDiagnostic, InlineTemplateOptions, ParseOptions, ParseOutput, ScriptCompileOptions,
    ScriptOutput, SfcCompiler, TemplateCompileOptions, TemplateCompilerOptions, TemplateOutput,
};
pub use config::{load_config, CompilerCommand, PasserelleConfig};
pub use descriptor::{
    BindingMetadata, BindingType, SfcBlock, SfcDescriptor, SfcScriptBlock, SfcStyleBlock,
};
pub use error::{LoaderError, Result};
pub use hooks::{
    FormatContext, FormatOutput, LoaderHooks, ModuleFormat, ResolveContext, ResolveOutput,
    TransformContext, TransformOutput,
};
pub use loader::{LoaderOptions, RenderMode, SfcLoader, TemplateErrorPolicy};
pub use matcher::ExtensionMatcher;
pub use store::{TemplateErrorStore, TemplateFailure};
pub use worker::WorkerCompiler;

/// Identifier the compiled component is bound to before it is exported.
///
/// Both compilation adapters write to it and the final
/// `export default` statement reads from it.
pub const COMPONENT_IDENTIFIER: &str = "__sfc__";
