//! Configuration file loading for passerelle.
//!
//! Reads `passerelle.config.json` from the current working directory.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::loader::{LoaderOptions, RenderMode, TemplateErrorPolicy};
use crate::matcher::DEFAULT_EXTENSION;

/// Name of the configuration file looked up in a directory.
pub const CONFIG_FILE_NAME: &str = "passerelle.config.json";

/// Environment variable overriding `compiler.command`.
pub const COMPILER_ENV: &str = "PASSERELLE_COMPILER";

/// Top-level passerelle configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasserelleConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Extension of files compiled by the loader.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Compile templates to `ssrRender` instead of `render`.
    #[serde(default)]
    pub ssr: bool,

    /// `"degrade"` keeps loading on template errors, `"fail"` aborts the import.
    #[serde(default)]
    pub template_errors: TemplateErrorPolicy,

    /// Worker process running the SFC compiler.
    #[serde(default)]
    pub compiler: CompilerCommand,
}

/// Command line of the compiler worker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompilerCommand {
    /// Executable to run.
    pub command: String,

    /// Arguments passed to `command`.
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for PasserelleConfig {
    fn default() -> Self {
        Self {
            schema: None,
            extension: default_extension(),
            ssr: false,
            template_errors: TemplateErrorPolicy::default(),
            compiler: CompilerCommand::default(),
        }
    }
}

impl Default for CompilerCommand {
    fn default() -> Self {
        Self {
            command: "node".to_string(),
            args: vec!["sfc-worker.mjs".to_string()],
        }
    }
}

impl PasserelleConfig {
    /// In-process loader options for this configuration.
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            extension: Some(self.extension.clone()),
            render_mode: if self.ssr {
                RenderMode::Server
            } else {
                RenderMode::Client
            },
            template_errors: self.template_errors,
            base_url: None,
        }
    }

    /// Replace the compiler command with `command`, when given.
    pub fn override_compiler(&mut self, command: Option<String>) {
        if let Some(command) = command.filter(|c| !c.is_empty()) {
            tracing::debug!(command = %command, "compiler command overridden");
            self.compiler.command = command;
        }
    }

    /// Apply `PASSERELLE_COMPILER` from the environment.
    pub fn apply_env(&mut self) {
        self.override_compiler(std::env::var(COMPILER_ENV).ok());
    }
}

/// Load `passerelle.config.json` from the given directory (or CWD if None).
pub fn load_config(dir: Option<&Path>) -> PasserelleConfig {
    let base = dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    let config_path = base.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        return PasserelleConfig::default();
    }
    load_config_file(&config_path)
}

/// Load a configuration file at an explicit path.
///
/// Unreadable or invalid files fall back to defaults with a warning.
pub fn load_config_file(path: &Path) -> PasserelleConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to parse config: {}", e);
                PasserelleConfig::default()
            }
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), "failed to read config: {}", e);
            PasserelleConfig::default()
        }
    }
}
