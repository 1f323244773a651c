//! Template compilation for the loader.
//!
//! Only used when the SFC has no `<script setup>`; otherwise the script
//! compiler has already inlined the render function.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::compiler::{
    CompilerDiagnostic, SfcCompiler, TemplateCompileOptions, TemplateCompilerOptions,
};
use crate::descriptor::{BindingMetadata, SfcDescriptor};
use crate::error::Result;
use crate::loader::RenderMode;
use crate::COMPONENT_IDENTIFIER;

/// The render function export emitted by the template compiler.
static RENDER_EXPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\nexport (function|const) (render|ssrRender)").unwrap());

/// Outcome of compiling a template block
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateOutcome {
    /// Module code defining the render function and attaching it to `__sfc__`
    Compiled(String),
    /// The compiler reported errors; no code was produced
    Failed(Vec<CompilerDiagnostic>),
}

/// Compile the template of `descriptor`.
///
/// Returns `Ok(None)` when the descriptor has no template. Compiler
/// diagnostics come back as [`TemplateOutcome::Failed`] so the caller decides
/// whether they are fatal.
pub fn compile_template_section<C: SfcCompiler + ?Sized>(
    compiler: &C,
    descriptor: &SfcDescriptor,
    id: &str,
    bindings: Option<&BindingMetadata>,
    mode: RenderMode,
) -> Result<Option<TemplateOutcome>> {
    let Some(template) = &descriptor.template else {
        return Ok(None);
    };

    let options = TemplateCompileOptions {
        source: template.content.clone(),
        filename: descriptor.filename.clone(),
        id: id.to_string(),
        scoped: descriptor.has_scoped_style(),
        slotted: descriptor.slotted,
        ssr: mode.is_ssr(),
        ssr_css_vars: descriptor.css_vars.clone(),
        is_prod: false,
        compiler_options: TemplateCompilerOptions {
            binding_metadata: bindings.cloned(),
        },
    };
    let result = compiler.compile_template(&options)?;

    if !result.errors.is_empty() {
        return Ok(Some(TemplateOutcome::Failed(result.errors)));
    }

    Ok(Some(TemplateOutcome::Compiled(attach_render(
        &result.code,
        mode,
    ))))
}

/// Turn the compiler's exported render function into a local one named for
/// `mode`, then attach it to the component.
pub fn attach_render(code: &str, mode: RenderMode) -> String {
    let fn_name = mode.render_fn_name();
    let replacement = format!("\n$1 {}", fn_name);
    let renamed = RENDER_EXPORT_RE.replace(code, replacement.as_str());

    let mut out = String::with_capacity(renamed.len() + 2 * fn_name.len() + 16);
    out.push('\n');
    out.push_str(&renamed);
    out.push('\n');
    out.push_str(COMPONENT_IDENTIFIER);
    out.push('.');
    out.push_str(fn_name);
    out.push_str(" = ");
    out.push_str(fn_name);
    out
}
