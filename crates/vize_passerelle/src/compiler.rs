//! The SFC compiler seam.
//!
//! Parsing, script compilation and template compilation are delegated to an
//! external compiler. The loader only depends on [`SfcCompiler`], so the real
//! compiler (see [`crate::worker`]) and test doubles are interchangeable.
//!
//! Option and result types serialize to the camelCase shape the reference
//! JavaScript compiler expects, which is also the worker wire format.

use serde::{Deserialize, Serialize};

use crate::descriptor::{BindingMetadata, SfcDescriptor};
use crate::error::Result;

/// A single-file component compiler.
///
/// Methods return `Err` only for failures that must abort the module load
/// (malformed script syntax, a crashed worker). Recoverable problems are
/// reported inside the outputs as [`CompilerDiagnostic`]s.
pub trait SfcCompiler {
    /// Split raw SFC source into a descriptor.
    fn parse(&self, source: &str, options: &ParseOptions) -> Result<ParseOutput>;

    /// Compile `<script>` / `<script setup>` of a descriptor.
    fn compile_script(
        &self,
        descriptor: &SfcDescriptor,
        options: &ScriptCompileOptions,
    ) -> Result<ScriptOutput>;

    /// Compile a template into a module exporting a render function.
    fn compile_template(&self, options: &TemplateCompileOptions) -> Result<TemplateOutput>;
}

impl<C: SfcCompiler + ?Sized> SfcCompiler for &C {
    fn parse(&self, source: &str, options: &ParseOptions) -> Result<ParseOutput> {
        (**self).parse(source, options)
    }

    fn compile_script(
        &self,
        descriptor: &SfcDescriptor,
        options: &ScriptCompileOptions,
    ) -> Result<ScriptOutput> {
        (**self).compile_script(descriptor, options)
    }

    fn compile_template(&self, options: &TemplateCompileOptions) -> Result<TemplateOutput> {
        (**self).compile_template(options)
    }
}

impl<C: SfcCompiler + ?Sized> SfcCompiler for Box<C> {
    fn parse(&self, source: &str, options: &ParseOptions) -> Result<ParseOutput> {
        (**self).parse(source, options)
    }

    fn compile_script(
        &self,
        descriptor: &SfcDescriptor,
        options: &ScriptCompileOptions,
    ) -> Result<ScriptOutput> {
        (**self).compile_script(descriptor, options)
    }

    fn compile_template(&self, options: &TemplateCompileOptions) -> Result<TemplateOutput> {
        (**self).compile_template(options)
    }
}

/// Parse options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptions {
    /// Filename recorded on the descriptor
    pub filename: String,
}

/// Parse result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutput {
    /// Parsed descriptor, possibly partial when `errors` is not empty
    pub descriptor: SfcDescriptor,

    /// Syntax errors found while splitting blocks
    #[serde(default)]
    pub errors: Vec<CompilerDiagnostic>,
}

/// Script compile options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptCompileOptions {
    /// ID for scoped CSS and component identification
    pub id: String,

    /// Enable the ref sugar syntax in `<script setup>`
    pub ref_sugar: bool,

    /// Compile the template into setup() when `<script setup>` is used
    pub inline_template: bool,

    /// Options used for the inlined template
    pub template_options: InlineTemplateOptions,
}

/// Template options nested in script compilation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineTemplateOptions {
    /// Whether SSR mode
    pub ssr: bool,

    /// CSS variables to inject in SSR mode
    pub ssr_css_vars: Vec<String>,
}

/// Script compile result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptOutput {
    /// Compiled script, still carrying its own `export default`
    pub content: String,

    /// Binding metadata
    #[serde(default)]
    pub bindings: Option<BindingMetadata>,
}

/// Template compile options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCompileOptions {
    /// Template source
    pub source: String,

    /// Filename of the owning SFC
    pub filename: String,

    /// ID for scoped CSS
    pub id: String,

    /// Whether any style block is scoped
    pub scoped: bool,

    /// Whether `:slotted()` is used
    pub slotted: bool,

    /// Whether SSR mode
    pub ssr: bool,

    /// CSS variables to inject in SSR mode
    pub ssr_css_vars: Vec<String>,

    /// Is prod mode
    pub is_prod: bool,

    /// Options forwarded to the template compiler core
    pub compiler_options: TemplateCompilerOptions,
}

/// Options forwarded to the template compiler core
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCompilerOptions {
    /// Bindings from script compilation, used as optimization hints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_metadata: Option<BindingMetadata>,
}

/// Template compile result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOutput {
    /// Generated module code exporting `render` (or `ssrRender`)
    pub code: String,

    /// Compilation errors
    #[serde(default)]
    pub errors: Vec<CompilerDiagnostic>,
}

/// Error or warning reported by the compiler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerDiagnostic {
    /// Error message
    pub message: String,

    /// Error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Byte offset in the SFC source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl CompilerDiagnostic {
    /// Create a diagnostic with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            offset: None,
        }
    }
}

impl std::fmt::Display for CompilerDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{}] {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_options_wire_shape() {
        let options = TemplateCompileOptions {
            source: "<div/>".into(),
            filename: "/app/A.vue".into(),
            id: "/app/A.vue".into(),
            ssr_css_vars: vec!["color".into()],
            ..Default::default()
        };
        let value = serde_json::to_value(&options).unwrap();

        assert_eq!(value["ssrCssVars"][0], "color");
        assert_eq!(value["isProd"], false);
        assert!(value["compilerOptions"].get("bindingMetadata").is_none());
    }

    #[test]
    fn test_diagnostic_display() {
        let mut diagnostic = CompilerDiagnostic::new("Invalid end tag.");
        assert_eq!(diagnostic.to_string(), "Invalid end tag.");

        diagnostic.code = Some("X_INVALID_END_TAG".into());
        assert_eq!(diagnostic.to_string(), "[X_INVALID_END_TAG] Invalid end tag.");
    }
}
