//! Shared helpers for loader integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use vize_passerelle::{
    BindingMetadata, BindingType, CompilerDiagnostic, LoaderError, LoaderOptions, ParseOptions,
    ParseOutput, Result, ScriptCompileOptions, ScriptOutput, SfcBlock, SfcCompiler, SfcDescriptor,
    SfcLoader, SfcScriptBlock, SfcStyleBlock, TemplateCompileOptions, TemplateOutput,
};

/// Marker that makes the mock script compiler fail.
pub const SCRIPT_SYNTAX_ERROR: &str = "@@syntax-error";

/// Marker that makes the mock template compiler report an error.
pub const TEMPLATE_ERROR: &str = "<broken";

/// Marker that makes the mock parser report a (non-fatal) error.
pub const PARSE_ERROR: &str = "<!-- parse-error -->";

/// A small stand-in for the Vue SFC compiler.
///
/// Blocks are found by plain text search. Script setup compiles to an
/// object with `setup()` returning an inlined `render`, and templates
/// compile to an exported `render` / `ssrRender` function.
#[derive(Default)]
pub struct MockCompiler {
    pub parse_calls: Cell<usize>,
    pub script_calls: Cell<usize>,
    pub template_calls: Cell<usize>,
    pub script_options: RefCell<Vec<ScriptCompileOptions>>,
    pub template_options: RefCell<Vec<TemplateCompileOptions>>,
}

impl MockCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_calls(&self) -> usize {
        self.parse_calls.get() + self.script_calls.get() + self.template_calls.get()
    }
}

impl SfcCompiler for MockCompiler {
    fn parse(&self, source: &str, options: &ParseOptions) -> Result<ParseOutput> {
        self.parse_calls.set(self.parse_calls.get() + 1);

        let mut descriptor = SfcDescriptor {
            filename: options.filename.clone(),
            ..Default::default()
        };
        let mut errors = Vec::new();
        if source.contains(PARSE_ERROR) {
            errors.push(CompilerDiagnostic::new("Unexpected comment."));
        }

        for block in blocks(source) {
            match block.tag {
                "template" => {
                    descriptor.slotted = block.content.contains(":slotted(");
                    descriptor.template = Some(SfcBlock {
                        content: block.content,
                        lang: block.lang,
                    });
                }
                "script" => {
                    let script = SfcScriptBlock {
                        content: block.content,
                        lang: block.lang,
                        setup: block.setup,
                    };
                    if block.setup {
                        descriptor.script_setup = Some(script);
                    } else {
                        descriptor.script = Some(script);
                    }
                }
                "style" => {
                    descriptor.slotted |= block.content.contains(":slotted(");
                    descriptor.styles.push(SfcStyleBlock {
                        content: block.content,
                        lang: block.lang,
                        scoped: block.scoped,
                    });
                }
                _ => {}
            }
        }

        Ok(ParseOutput { descriptor, errors })
    }

    fn compile_script(
        &self,
        descriptor: &SfcDescriptor,
        options: &ScriptCompileOptions,
    ) -> Result<ScriptOutput> {
        self.script_calls.set(self.script_calls.get() + 1);
        self.script_options.borrow_mut().push(options.clone());

        let plain = descriptor.script.as_ref().map(|s| s.content.as_str());
        let setup = descriptor.script_setup.as_ref().map(|s| s.content.as_str());
        if plain.unwrap_or("").contains(SCRIPT_SYNTAX_ERROR)
            || setup.unwrap_or("").contains(SCRIPT_SYNTAX_ERROR)
        {
            return Err(LoaderError::Compile {
                filename: descriptor.filename.clone(),
                message: "Unexpected token (1:1)".to_string(),
            });
        }

        let Some(setup) = setup else {
            return Ok(ScriptOutput {
                content: plain.unwrap_or("").trim().to_string(),
                bindings: None,
            });
        };

        let mut bindings = BindingMetadata {
            is_script_setup: true,
            ..Default::default()
        };
        let mut body = String::new();
        for line in setup.trim().lines() {
            if let Some(name) = line
                .strip_prefix("const ")
                .and_then(|rest| rest.split([' ', '=']).next())
            {
                bindings
                    .bindings
                    .insert(name.to_string(), BindingType::SetupConst);
            }
            body.push_str("    ");
            body.push_str(line);
            body.push('\n');
        }

        let mut content = String::from("export default {\n  setup(__props) {\n");
        content.push_str(&body);
        if let Some(template) = &descriptor.template {
            if options.inline_template {
                let names: Vec<_> = bindings.bindings.keys().cloned().collect();
                content.push_str(&format!(
                    concat!(
                        "    return function render(_ctx, _cache) {{\n",
                        "      return {{ tag: 'template', html: {}, scope: {{ {} }} }}\n",
                        "    }}\n",
                    ),
                    json_string(template.content.trim()),
                    names.join(", ")
                ));
            }
        }
        content.push_str("  }\n}");

        Ok(ScriptOutput {
            content,
            bindings: Some(bindings),
        })
    }

    fn compile_template(&self, options: &TemplateCompileOptions) -> Result<TemplateOutput> {
        self.template_calls.set(self.template_calls.get() + 1);
        self.template_options.borrow_mut().push(options.clone());

        if options.source.contains(TEMPLATE_ERROR) {
            return Ok(TemplateOutput {
                code: String::new(),
                errors: vec![CompilerDiagnostic {
                    message: "Element is missing end tag.".to_string(),
                    code: Some("24".to_string()),
                    offset: Some(0),
                }],
            });
        }

        let html = json_string(options.source.trim());
        let code = if options.ssr {
            format!(
                concat!(
                    "import {{ ssrRenderAttrs as _ssrRenderAttrs }}",
                    " from \"vue/server-renderer\"\n\n",
                    "export function ssrRender(_ctx, _push, _parent, _attrs) {{\n",
                    "  _push({})\n}}",
                ),
                html
            )
        } else {
            format!(
                concat!(
                    "import {{ openBlock as _openBlock, ",
                    "createElementBlock as _createElementBlock }}",
                    " from \"vue\"\n\nexport function render(_ctx, _cache) {{\n",
                    "  return (_openBlock(), _createElementBlock(\"template\", null, {}))\n}}",
                ),
                html
            )
        };

        Ok(TemplateOutput {
            code,
            errors: Vec::new(),
        })
    }
}

struct Block {
    tag: &'static str,
    content: String,
    lang: Option<String>,
    setup: bool,
    scoped: bool,
}

/// Top-level blocks of an SFC, in source order.
fn blocks(source: &str) -> Vec<Block> {
    let mut found = Vec::new();
    let mut rest = source;

    loop {
        let next = ["template", "script", "style"]
            .into_iter()
            .filter_map(|tag| rest.find(&format!("<{}", tag)).map(|at| (at, tag)))
            .min();
        let Some((start, tag)) = next else {
            break;
        };

        let after_open = &rest[start..];
        let Some(open_end) = after_open.find('>') else {
            break;
        };
        let attrs = &after_open[1 + tag.len()..open_end];
        let body = &after_open[open_end + 1..];

        // Templates may nest <template> tags, so close on the last one.
        let close = format!("</{}>", tag);
        let close_at = if tag == "template" {
            body.rfind(&close)
        } else {
            body.find(&close)
        };
        let Some(close_at) = close_at else {
            break;
        };

        found.push(Block {
            tag,
            content: body[..close_at].to_string(),
            lang: attribute(attrs, "lang"),
            setup: has_flag(attrs, "setup"),
            scoped: has_flag(attrs, "scoped"),
        });
        rest = &body[close_at + close.len()..];
    }

    found
}

fn attribute(attrs: &str, name: &str) -> Option<String> {
    let key = format!("{}=\"", name);
    let start = attrs.find(&key)? + key.len();
    let end = attrs[start..].find('"')?;
    Some(attrs[start..start + end].to_string())
}

fn has_flag(attrs: &str, name: &str) -> bool {
    attrs.split_whitespace().any(|attr| attr == name)
}

fn json_string(value: &str) -> String {
    serde_json::to_string(value).unwrap()
}

/// A loader over `compiler` rooted at `file:///app/`.
pub fn loader(compiler: &MockCompiler) -> SfcLoader<&MockCompiler> {
    loader_with(compiler, LoaderOptions::default())
}

pub fn loader_with(
    compiler: &MockCompiler,
    mut options: LoaderOptions,
) -> SfcLoader<&MockCompiler> {
    if options.base_url.is_none() {
        options.base_url = Some(url::Url::parse("file:///app/").unwrap());
    }
    SfcLoader::new(compiler, options).unwrap()
}
