//! Rewrite a default export into a variable declaration.
//!
//! Compiled scripts end with some form of `export default`. Binding that value
//! to a known identifier instead lets the loader attach a render function
//! before exporting it.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ExportDefaultDeclaration, ExportDefaultDeclarationKind, ExportNamedDeclaration,
    ExportSpecifier, Statement,
};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};

/// Local name used when the default export is re-exported from another module.
const REEXPORTED_DEFAULT: &str = "__VUE_DEFAULT__";

/// Result of [`rewrite_default`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenScript {
    /// Script with the default export bound to the requested name
    pub code: String,

    /// Whether the input had a default export
    pub had_default: bool,
}

/// Rewrite `export default` to `const <as_name> = ...`.
///
/// `lang` is the script block language and picks the parser dialect
/// (`ts`, `tsx`, `jsx`, anything else is plain JavaScript).
///
/// Without a default export, `const <as_name> = {}` is appended so the name is
/// always defined. Source that does not parse is an error: the caller treats it
/// as a broken component.
pub fn rewrite_default(
    input: &str,
    as_name: &str,
    lang: Option<&str>,
) -> Result<RewrittenScript, String> {
    let source_type = source_type_for(lang);

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, input, source_type).parse();

    if let Some(error) = ret.errors.first() {
        return Err(error.to_string());
    }

    let mut output = String::with_capacity(input.len() + as_name.len() + 16);
    let mut last_end = 0;
    let mut had_default = false;

    for stmt in ret.program.body.iter() {
        match stmt {
            Statement::ExportDefaultDeclaration(decl) => {
                output.push_str(&input[last_end..decl.span.start as usize]);
                write_default_declaration(&mut output, input, decl, as_name);
                last_end = decl.span.end as usize;
                had_default = true;
            }
            Statement::ExportNamedDeclaration(decl) if has_default_specifier(decl) => {
                output.push_str(&input[last_end..decl.span.start as usize]);
                write_default_specifier(&mut output, decl, as_name);
                last_end = decl.span.end as usize;
                had_default = true;
            }
            _ => {}
        }
    }

    output.push_str(&input[last_end..]);

    if !had_default {
        output.push_str("\nconst ");
        output.push_str(as_name);
        output.push_str(" = {}");
    }

    Ok(RewrittenScript {
        code: output,
        had_default,
    })
}

fn source_type_for(lang: Option<&str>) -> SourceType {
    match lang {
        Some("ts") => SourceType::ts(),
        Some("tsx") => SourceType::tsx(),
        Some("jsx") => SourceType::jsx(),
        _ => SourceType::mjs(),
    }
}

/// `export default <decl>`
fn write_default_declaration(
    output: &mut String,
    input: &str,
    decl: &ExportDefaultDeclaration,
    as_name: &str,
) {
    let end = decl.span.end as usize;

    // Named functions and classes keep their declaration so they stay hoisted
    // and referenceable by name.
    let named = match &decl.declaration {
        ExportDefaultDeclarationKind::FunctionDeclaration(func) => func
            .id
            .as_ref()
            .map(|id| (func.span.start as usize, id.name.as_str())),
        ExportDefaultDeclarationKind::ClassDeclaration(class) => class
            .id
            .as_ref()
            .map(|id| (class.span.start as usize, id.name.as_str())),
        _ => None,
    };

    match named {
        Some((start, name)) => {
            output.push_str(&input[start..end]);
            output.push_str("\nconst ");
            output.push_str(as_name);
            output.push_str(" = ");
            output.push_str(name);
        }
        None => {
            let start = decl.declaration.span().start as usize;
            output.push_str("const ");
            output.push_str(as_name);
            output.push_str(" = ");
            output.push_str(&input[start..end]);
        }
    }
}

/// `export { foo as default }` and `export { foo as default } from './foo'`
fn write_default_specifier(output: &mut String, decl: &ExportNamedDeclaration, as_name: &str) {
    let Some(default_spec) = decl.specifiers.iter().find(|s| is_default_specifier(s)) else {
        return;
    };
    let local = default_spec.local.name();

    let others: Vec<_> = decl
        .specifiers
        .iter()
        .filter(|s| !is_default_specifier(s))
        .collect();

    match &decl.source {
        Some(source) => {
            let specifier = quote_specifier(source.value.as_str());
            output.push_str("import { ");
            output.push_str(local.as_str());
            output.push_str(" as ");
            output.push_str(REEXPORTED_DEFAULT);
            output.push_str(" } from ");
            output.push_str(&specifier);
            output.push('\n');
            if !others.is_empty() {
                write_export_list(output, &others);
                output.push_str(" from ");
                output.push_str(&specifier);
                output.push('\n');
            }
            output.push_str("const ");
            output.push_str(as_name);
            output.push_str(" = ");
            output.push_str(REEXPORTED_DEFAULT);
        }
        None => {
            if !others.is_empty() {
                write_export_list(output, &others);
                output.push('\n');
            }
            output.push_str("const ");
            output.push_str(as_name);
            output.push_str(" = ");
            output.push_str(local.as_str());
        }
    }
}

fn write_export_list(output: &mut String, specifiers: &[&ExportSpecifier]) {
    output.push_str("export { ");
    for (i, spec) in specifiers.iter().enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        let local = spec.local.name();
        let exported = spec.exported.name();
        output.push_str(local.as_str());
        if local != exported {
            output.push_str(" as ");
            output.push_str(exported.as_str());
        }
    }
    output.push_str(" }");
}

/// Module specifier as a JavaScript string literal.
///
/// Plain specifiers keep single quotes; anything needing escapes goes through
/// JSON string syntax, which is valid JavaScript.
fn quote_specifier(value: &str) -> String {
    if value.contains(['\'', '\\']) || value.chars().any(char::is_control) {
        return serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value));
    }
    format!("'{}'", value)
}

fn has_default_specifier(decl: &ExportNamedDeclaration) -> bool {
    decl.specifiers.iter().any(is_default_specifier)
}

fn is_default_specifier(spec: &ExportSpecifier) -> bool {
    spec.exported.name() == "default"
}
