//! SFC descriptor and binding metadata types.
//!
//! These mirror what an SFC compiler hands back from `parse` and
//! `compileScript`. Everything is owned: a descriptor lives for exactly one
//! transform call and is sent across the worker boundary as JSON.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// SFC Descriptor - parsed result of a .vue file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcDescriptor {
    /// Filename the source was parsed with
    pub filename: String,

    /// Template block
    #[serde(default)]
    pub template: Option<SfcBlock>,

    /// Script block (options API or <script> without setup)
    #[serde(default)]
    pub script: Option<SfcScriptBlock>,

    /// Script setup block
    #[serde(default)]
    pub script_setup: Option<SfcScriptBlock>,

    /// Style blocks, in source order
    #[serde(default)]
    pub styles: Vec<SfcStyleBlock>,

    /// CSS variables from <style> v-bind
    #[serde(default)]
    pub css_vars: Vec<String>,

    /// Whether any scoped style uses `:slotted()`
    #[serde(default)]
    pub slotted: bool,
}

impl SfcDescriptor {
    /// Whether any style block is scoped.
    pub fn has_scoped_style(&self) -> bool {
        self.styles.iter().any(|s| s.scoped)
    }

    /// Whether the descriptor carries any script at all.
    pub fn has_script(&self) -> bool {
        self.script.is_some() || self.script_setup.is_some()
    }

    /// Language of the script that will be compiled (`<script setup>` wins).
    pub fn script_lang(&self) -> Option<&str> {
        self.script_setup
            .as_ref()
            .or(self.script.as_ref())
            .and_then(|s| s.lang.as_deref())
    }
}

/// Template (or any plain) block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcBlock {
    /// Block content
    pub content: String,

    /// Block language
    #[serde(default)]
    pub lang: Option<String>,
}

/// Script block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcScriptBlock {
    /// Block content
    pub content: String,

    /// Script language (js/ts/jsx/tsx)
    #[serde(default)]
    pub lang: Option<String>,

    /// Whether this is script setup
    #[serde(default)]
    pub setup: bool,
}

/// Style block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcStyleBlock {
    /// Block content
    pub content: String,

    /// Style language (css/scss/less/etc)
    #[serde(default)]
    pub lang: Option<String>,

    /// Whether the style is scoped
    #[serde(default)]
    pub scoped: bool,
}

/// Static classification of a binding exposed to the template.
///
/// Names the loader does not know are kept as [`BindingType::Other`] and
/// written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindingType {
    /// Returned from data()
    Data,
    /// Declared as a prop
    Props,
    /// A local alias of a destructured prop
    PropsAliased,
    /// `let` binding in script setup
    SetupLet,
    /// `const` binding that is never a ref
    SetupConst,
    /// `const` binding holding a reactive object
    SetupReactiveConst,
    /// `const` binding that may be a ref
    SetupMaybeRef,
    /// `const` binding that is known to be a ref
    SetupRef,
    /// Declared by other options (computed, methods, inject)
    Options,
    /// Literal constant hoisted out of setup
    LiteralConst,
    /// A classification from a newer or older compiler
    Other(String),
}

impl BindingType {
    /// The name the compiler uses for this binding type.
    pub fn as_str(&self) -> &str {
        match self {
            BindingType::Data => "data",
            BindingType::Props => "props",
            BindingType::PropsAliased => "props-aliased",
            BindingType::SetupLet => "setup-let",
            BindingType::SetupConst => "setup-const",
            BindingType::SetupReactiveConst => "setup-reactive-const",
            BindingType::SetupMaybeRef => "setup-maybe-ref",
            BindingType::SetupRef => "setup-ref",
            BindingType::Options => "options",
            BindingType::LiteralConst => "literal-const",
            BindingType::Other(name) => name,
        }
    }

    /// Classify a compiler binding name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "data" => BindingType::Data,
            "props" => BindingType::Props,
            "props-aliased" => BindingType::PropsAliased,
            "setup-let" => BindingType::SetupLet,
            "setup-const" => BindingType::SetupConst,
            "setup-reactive-const" => BindingType::SetupReactiveConst,
            "setup-maybe-ref" => BindingType::SetupMaybeRef,
            "setup-ref" => BindingType::SetupRef,
            "options" => BindingType::Options,
            "literal-const" => BindingType::LiteralConst,
            other => BindingType::Other(other.to_string()),
        }
    }
}

impl Serialize for BindingType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BindingType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(BindingType::from_name(&name))
    }
}

/// Bindings reported by script compilation.
///
/// On the wire this is a flat JSON object, `{ "msg": "setup-const", ... }`,
/// with the `__isScriptSetup` and `__propsAliases` keys folded into their own
/// fields here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingMetadata {
    /// Identifier name to binding type, in the order the compiler reported them
    pub bindings: IndexMap<String, BindingType>,

    /// Props aliases (local name -> prop key)
    pub props_aliases: IndexMap<String, String>,

    /// Whether these bindings are from script setup
    pub is_script_setup: bool,
}

const IS_SCRIPT_SETUP_KEY: &str = "__isScriptSetup";
const PROPS_ALIASES_KEY: &str = "__propsAliases";

impl BindingMetadata {
    /// Look up the binding type of an identifier.
    pub fn get(&self, name: &str) -> Option<&BindingType> {
        self.bindings.get(name)
    }
}

impl Serialize for BindingMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut len = self.bindings.len();
        if self.is_script_setup {
            len += 1;
        }
        if !self.props_aliases.is_empty() {
            len += 1;
        }

        let mut map = serializer.serialize_map(Some(len))?;
        for (name, binding_type) in &self.bindings {
            map.serialize_entry(name, binding_type)?;
        }
        if self.is_script_setup {
            map.serialize_entry(IS_SCRIPT_SETUP_KEY, &true)?;
        }
        if !self.props_aliases.is_empty() {
            map.serialize_entry(PROPS_ALIASES_KEY, &self.props_aliases)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BindingMetadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut metadata = BindingMetadata::default();

        for (key, value) in raw {
            match key.as_str() {
                IS_SCRIPT_SETUP_KEY => {
                    metadata.is_script_setup = value.as_bool().unwrap_or(false);
                }
                PROPS_ALIASES_KEY => {
                    metadata.props_aliases =
                        serde_json::from_value(value).map_err(serde::de::Error::custom)?;
                }
                _ => {
                    let binding_type =
                        serde_json::from_value(value).map_err(serde::de::Error::custom)?;
                    metadata.bindings.insert(key, binding_type);
                }
            }
        }

        Ok(metadata)
    }
}
