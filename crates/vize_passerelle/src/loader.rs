//! The SFC loader: hook implementations and transform orchestration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::compiler::{CompilerDiagnostic, ParseOptions, SfcCompiler};
use crate::error::{LoaderError, Result};
use crate::hooks::{
    FormatContext, FormatOutput, LoaderHooks, ModuleFormat, ResolveContext, ResolveOutput,
    TransformContext, TransformOutput,
};
use crate::matcher::{ExtensionMatcher, DEFAULT_EXTENSION};
use crate::script::compile_script_section;
use crate::store::TemplateErrorStore;
use crate::template::{compile_template_section, TemplateOutcome};
use crate::COMPONENT_IDENTIFIER;

/// Which render function the template compiler should produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Client-side `render`
    #[default]
    Client,
    /// Server-side `ssrRender`
    Server,
}

impl RenderMode {
    /// Whether templates are compiled for server rendering.
    pub fn is_ssr(self) -> bool {
        self == RenderMode::Server
    }

    /// Name the render function is bound to.
    pub fn render_fn_name(self) -> &'static str {
        match self {
            RenderMode::Client => "render",
            RenderMode::Server => "ssrRender",
        }
    }
}

/// What to do when the template compiler reports errors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateErrorPolicy {
    /// Record the errors and load the component without a render function
    #[default]
    Degrade,
    /// Record the errors and fail the module load
    Fail,
}

/// Loader options
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Extension of files handled by the loader (default: `.vue`)
    pub extension: Option<String>,

    /// Render function flavour
    pub render_mode: RenderMode,

    /// Template error handling
    pub template_errors: TemplateErrorPolicy,

    /// Base URL for entry-point specifiers (default: the working directory)
    pub base_url: Option<Url>,
}

/// Loader that compiles single-file components on import.
pub struct SfcLoader<C> {
    compiler: C,
    matcher: ExtensionMatcher,
    base_url: Url,
    render_mode: RenderMode,
    template_errors: TemplateErrorPolicy,
    error_store: TemplateErrorStore,
}

impl<C: SfcCompiler> SfcLoader<C> {
    /// Create a loader around `compiler`.
    ///
    /// The base URL for specifiers without a parent is fixed here, once.
    pub fn new(compiler: C, options: LoaderOptions) -> Result<Self> {
        let base_url = match options.base_url {
            Some(url) => url,
            None => process_base_url()?,
        };
        let matcher =
            ExtensionMatcher::new(options.extension.as_deref().unwrap_or(DEFAULT_EXTENSION));

        Ok(Self {
            compiler,
            matcher,
            base_url,
            render_mode: options.render_mode,
            template_errors: options.template_errors,
            error_store: TemplateErrorStore::new(),
        })
    }

    /// Share an existing error store instead of the loader's own.
    pub fn with_error_store(mut self, store: TemplateErrorStore) -> Self {
        self.error_store = store;
        self
    }

    /// Template failures recorded by this loader.
    pub fn error_store(&self) -> &TemplateErrorStore {
        &self.error_store
    }

    /// The extension predicate used by every hook.
    pub fn matcher(&self) -> &ExtensionMatcher {
        &self.matcher
    }

    /// Base URL used when a resolve context has no parent.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying compiler.
    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    /// Compile a file on disk, returning the module text.
    ///
    /// Files the loader does not handle are returned unchanged.
    pub fn transform_file(&self, path: &Path) -> Result<String> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let url = Url::from_file_path(&absolute)
            .map_err(|_| LoaderError::NotAFileUrl(absolute.display().to_string()))?;
        let source = std::fs::read_to_string(&absolute)?;

        let context = TransformContext {
            url: url.to_string(),
            format: Some(ModuleFormat::Module),
        };
        let output = self.transform_source(&source, &context, |source, _| {
            Ok(TransformOutput {
                source: source.to_string(),
            })
        })?;
        Ok(output.source)
    }

    fn on_template_failure(
        &self,
        filename: &str,
        diagnostics: Vec<CompilerDiagnostic>,
    ) -> Result<()> {
        self.error_store.record(filename, diagnostics.clone());

        match self.template_errors {
            TemplateErrorPolicy::Degrade => {
                for diagnostic in &diagnostics {
                    tracing::warn!(filename, "template error: {}", diagnostic);
                }
                tracing::warn!(filename, "loading component without a render function");
                Ok(())
            }
            TemplateErrorPolicy::Fail => Err(LoaderError::Template {
                filename: filename.to_string(),
                diagnostics,
            }),
        }
    }
}

impl<C: SfcCompiler> LoaderHooks for SfcLoader<C> {
    fn resolve<F>(
        &self,
        specifier: &str,
        context: &ResolveContext,
        next: F,
    ) -> Result<ResolveOutput>
    where
        F: FnOnce(&str, &ResolveContext) -> Result<ResolveOutput>,
    {
        if !self.matcher.matches(specifier) {
            return next(specifier, context);
        }

        let parsed_parent;
        let base = match &context.parent_url {
            Some(parent) => {
                parsed_parent = Url::parse(parent).map_err(|source| LoaderError::InvalidUrl {
                    specifier: specifier.to_string(),
                    base: parent.clone(),
                    source,
                })?;
                &parsed_parent
            }
            None => &self.base_url,
        };

        let url = base
            .join(specifier)
            .map_err(|source| LoaderError::InvalidUrl {
                specifier: specifier.to_string(),
                base: base.to_string(),
                source,
            })?;
        tracing::debug!(specifier, url = %url, "resolved SFC");

        Ok(ResolveOutput {
            url: url.into(),
        })
    }

    fn get_format<F>(&self, url: &str, context: &FormatContext, next: F) -> Result<FormatOutput>
    where
        F: FnOnce(&str, &FormatContext) -> Result<FormatOutput>,
    {
        if !self.matcher.matches(url) {
            return next(url, context);
        }

        Ok(FormatOutput {
            format: ModuleFormat::Module,
        })
    }

    fn transform_source<F>(
        &self,
        source: &str,
        context: &TransformContext,
        next: F,
    ) -> Result<TransformOutput>
    where
        F: FnOnce(&str, &TransformContext) -> Result<TransformOutput>,
    {
        if !self.matcher.matches(&context.url) {
            return next(source, context);
        }

        let filename = url_to_filename(&context.url)?;
        tracing::debug!(filename = %filename, "compiling SFC");

        let parsed = self.compiler.parse(
            source,
            &ParseOptions {
                filename: filename.clone(),
            },
        )?;
        for error in &parsed.errors {
            tracing::error!(filename = %filename, "{}", error);
        }
        let descriptor = parsed.descriptor;

        // The compiler id doubles as the filename.
        let id = filename.as_str();

        let script = compile_script_section(&self.compiler, &descriptor, id, self.render_mode)?;
        let mut code = script.code;

        // With <script setup> the render function is already inlined in the script.
        if descriptor.script_setup.is_none() {
            match compile_template_section(
                &self.compiler,
                &descriptor,
                id,
                script.bindings.as_ref(),
                self.render_mode,
            )? {
                Some(TemplateOutcome::Compiled(fragment)) => code.push_str(&fragment),
                Some(TemplateOutcome::Failed(diagnostics)) => {
                    self.on_template_failure(&filename, diagnostics)?
                }
                None => {}
            }
        }

        code.push_str("\nexport default ");
        code.push_str(COMPONENT_IDENTIFIER);

        Ok(TransformOutput { source: code })
    }
}

/// `file://` URL of the working directory, with a trailing slash.
fn process_base_url() -> Result<Url> {
    let cwd = std::env::current_dir()?;
    Url::from_directory_path(&cwd).map_err(|_| LoaderError::NotAFileUrl(cwd.display().to_string()))
}

/// Filename handed to the compiler for a module URL.
///
/// Windows keeps the URL verbatim; elsewhere it becomes a decoded native path.
fn url_to_filename(url: &str) -> Result<String> {
    if cfg!(windows) {
        return Ok(url.to_string());
    }

    let parsed = Url::parse(url).map_err(|_| LoaderError::NotAFileUrl(url.to_string()))?;
    if parsed.scheme() != "file" {
        return Err(LoaderError::NotAFileUrl(url.to_string()));
    }
    let path = parsed
        .to_file_path()
        .map_err(|_| LoaderError::NotAFileUrl(url.to_string()))?;
    Ok(path.to_string_lossy().into_owned())
}
