//! Loader hook protocol.
//!
//! A host module system calls three hooks per module: `resolve`,
//! `get_format` and `transform_source`. Each takes its input, a context and
//! `next`, the host's default behaviour. A hook either returns
//! `next(input, context)` untouched or produces the whole answer itself.
//!
//! Contexts serialize with the field names Node.js uses (`parentURL`, `url`)
//! so they can be forwarded from a JavaScript loader shim as-is.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Module loader hooks.
pub trait LoaderHooks {
    /// Resolve a specifier to a module URL.
    fn resolve<F>(
        &self,
        specifier: &str,
        context: &ResolveContext,
        next: F,
    ) -> Result<ResolveOutput>
    where
        F: FnOnce(&str, &ResolveContext) -> Result<ResolveOutput>;

    /// Decide how the host should evaluate a resolved URL.
    fn get_format<F>(&self, url: &str, context: &FormatContext, next: F) -> Result<FormatOutput>
    where
        F: FnOnce(&str, &FormatContext) -> Result<FormatOutput>;

    /// Turn loaded source into evaluable module source.
    fn transform_source<F>(
        &self,
        source: &str,
        context: &TransformContext,
        next: F,
    ) -> Result<TransformOutput>
    where
        F: FnOnce(&str, &TransformContext) -> Result<TransformOutput>;
}

/// Context for [`LoaderHooks::resolve`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveContext {
    /// URL of the importing module, absent for entry points
    #[serde(rename = "parentURL", default, skip_serializing_if = "Option::is_none")]
    pub parent_url: Option<String>,

    /// Export conditions requested by the host
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
}

impl ResolveContext {
    /// Context for an import made from `parent_url`.
    pub fn from_parent(parent_url: impl Into<String>) -> Self {
        Self {
            parent_url: Some(parent_url.into()),
            conditions: Vec::new(),
        }
    }
}

/// Result of [`LoaderHooks::resolve`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOutput {
    /// Absolute module URL
    pub url: String,
}

/// Context for [`LoaderHooks::get_format`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatContext {}

/// Module formats a host knows how to evaluate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    /// Host built-in module
    Builtin,
    /// CommonJS module
    Commonjs,
    /// JSON document
    Json,
    /// ECMAScript module
    Module,
    /// WebAssembly module
    Wasm,
}

/// Result of [`LoaderHooks::get_format`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOutput {
    /// Format to evaluate the module as
    pub format: ModuleFormat,
}

/// Context for [`LoaderHooks::transform_source`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformContext {
    /// Resolved module URL the source was loaded from
    pub url: String,

    /// Format chosen by `get_format`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ModuleFormat>,
}

impl TransformContext {
    /// Context for source loaded from `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: None,
        }
    }
}

/// Result of [`LoaderHooks::transform_source`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOutput {
    /// Module source handed back to the host
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts_use_host_field_names() {
        let context: ResolveContext =
            serde_json::from_str(r#"{ "parentURL": "file:///app/main.js" }"#).unwrap();
        assert_eq!(context.parent_url.as_deref(), Some("file:///app/main.js"));

        let entry: ResolveContext = serde_json::from_str("{}").unwrap();
        assert!(entry.parent_url.is_none());

        let transform: TransformContext =
            serde_json::from_str(r#"{ "url": "file:///app/A.vue", "format": "module" }"#).unwrap();
        assert_eq!(transform.format, Some(ModuleFormat::Module));
    }

    #[test]
    fn test_format_names() {
        let output = FormatOutput {
            format: ModuleFormat::Commonjs,
        };
        assert_eq!(
            serde_json::to_string(&output).unwrap(),
            r#"{"format":"commonjs"}"#
        );
    }
}
