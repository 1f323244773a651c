//! Script compilation for the loader.
//!
//! Runs the compiler over `<script>` / `<script setup>` and rebinds the
//! resulting default export to [`COMPONENT_IDENTIFIER`] so later fragments can
//! attach to it.

use crate::compiler::{InlineTemplateOptions, ScriptCompileOptions, SfcCompiler};
use crate::descriptor::{BindingMetadata, SfcDescriptor};
use crate::error::{LoaderError, Result};
use crate::loader::RenderMode;
use crate::rewrite_default::rewrite_default;
use crate::COMPONENT_IDENTIFIER;

/// Script fragment of a compiled module
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptSection {
    /// Module code declaring `__sfc__`
    pub code: String,

    /// Bindings to hand to template compilation
    pub bindings: Option<BindingMetadata>,
}

/// Compile the script blocks of `descriptor`.
///
/// Compiler errors are returned unchanged: a component whose script does not
/// compile must not load.
pub fn compile_script_section<C: SfcCompiler + ?Sized>(
    compiler: &C,
    descriptor: &SfcDescriptor,
    id: &str,
    mode: RenderMode,
) -> Result<ScriptSection> {
    if !descriptor.has_script() {
        let mut code = String::with_capacity(COMPONENT_IDENTIFIER.len() + 12);
        code.push_str("\nconst ");
        code.push_str(COMPONENT_IDENTIFIER);
        code.push_str(" = {}");
        return Ok(ScriptSection {
            code,
            bindings: None,
        });
    }

    let options = ScriptCompileOptions {
        id: id.to_string(),
        ref_sugar: true,
        inline_template: true,
        template_options: InlineTemplateOptions {
            ssr: mode.is_ssr(),
            ssr_css_vars: descriptor.css_vars.clone(),
        },
    };
    let compiled = compiler.compile_script(descriptor, &options)?;

    let rewritten =
        rewrite_default(&compiled.content, COMPONENT_IDENTIFIER, descriptor.script_lang())
            .map_err(|message| LoaderError::Rewrite {
                filename: descriptor.filename.clone(),
                message,
            })?;
    if !rewritten.had_default {
        tracing::debug!(
            filename = %descriptor.filename,
            "compiled script has no default export, using an empty component"
        );
    }

    let mut code = String::new();
    if let Some(bindings) = &compiled.bindings {
        code.push_str("\n/* Analyzed bindings: ");
        code.push_str(&serde_json::to_string_pretty(bindings)?);
        code.push_str(" */");
    }
    code.push('\n');
    code.push_str(&rewritten.code);

    Ok(ScriptSection {
        code,
        bindings: compiled.bindings,
    })
}
