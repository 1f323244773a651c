//! Hook server - line-delimited JSON front end for a JavaScript loader shim.
//!
//! The host module system only talks to JavaScript loaders, so a thin shim
//! forwards each hook call here and acts on the answer.
//!
//! ## Protocol
//!
//! Request format:
//! ```json
//! {"id": 1, "hook": "transformSource", "input": "<template>...",
//!  "context": {"url": "file:///app/A.vue"}}
//! ```
//!
//! Response format:
//! ```json
//! {"id": 1, "result": {"source": "..."}}
//! {"id": 1, "delegate": true}
//! {"id": 1, "error": "..."}
//! ```
//!
//! `delegate` tells the shim to call its own `next` with the arguments it
//! already holds. A `transformSource` response also carries `templateErrors`
//! when template compilation failed during that request; the loader's error
//! store is drained after every transform.

use std::cell::Cell;
use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compiler::SfcCompiler;
use crate::error::Result;
use crate::hooks::{
    FormatContext, FormatOutput, LoaderHooks, ModuleFormat, ResolveContext, ResolveOutput,
    TransformContext, TransformOutput,
};
use crate::loader::SfcLoader;
use crate::store::TemplateFailure;

/// Hook request
#[derive(Debug, Deserialize)]
pub struct HookRequest {
    pub id: Option<u64>,
    pub hook: String,
    /// Specifier, URL or module source depending on `hook`
    pub input: String,
    #[serde(default)]
    pub context: Value,
}

/// Hook response
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct HookResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub delegate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Template failures recorded while handling a `transformSource` request
    #[serde(rename = "templateErrors", skip_serializing_if = "Vec::is_empty")]
    pub template_errors: Vec<TemplateFailure>,
}

impl HookResponse {
    fn ok(id: Option<u64>, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            ..Default::default()
        }
    }

    fn delegated(id: Option<u64>) -> Self {
        Self {
            id,
            delegate: true,
            ..Default::default()
        }
    }

    fn failed(id: Option<u64>, message: impl Into<String>) -> Self {
        Self {
            id,
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Serve hook requests from `reader`, writing one response line per request.
pub fn run<C, R, W>(loader: &SfcLoader<C>, reader: R, mut writer: W) -> std::io::Result<()>
where
    C: SfcCompiler,
    R: BufRead,
    W: Write,
{
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_request(loader, &line);
        let response_json = serde_json::to_string(&response)
            .unwrap_or_else(|_| r#"{"error":"Internal error"}"#.to_string());

        writeln!(writer, "{}", response_json)?;
        writer.flush()?;
    }

    Ok(())
}

/// Handle a single request line.
pub fn handle_request<C: SfcCompiler>(loader: &SfcLoader<C>, input: &str) -> HookResponse {
    let request: HookRequest = match serde_json::from_str(input) {
        Ok(r) => r,
        Err(e) => return HookResponse::failed(None, format!("Parse error: {}", e)),
    };
    let id = request.id;

    let outcome = match request.hook.as_str() {
        "resolve" => dispatch(request.context, |context: ResolveContext, delegated| {
            loader.resolve(&request.input, &context, |_, _| {
                delegated.set(true);
                Ok(ResolveOutput { url: String::new() })
            })
        }),
        "getFormat" => dispatch(request.context, |context: FormatContext, delegated| {
            loader.get_format(&request.input, &context, |_, _| {
                delegated.set(true);
                Ok(FormatOutput {
                    format: ModuleFormat::Module,
                })
            })
        }),
        "transformSource" => dispatch(request.context, |context: TransformContext, delegated| {
            loader.transform_source(&request.input, &context, |_, _| {
                delegated.set(true);
                Ok(TransformOutput {
                    source: String::new(),
                })
            })
        }),
        other => {
            return HookResponse::failed(id, format!("Unknown hook: {}", other));
        }
    };

    let mut response = match outcome {
        Ok(Some(result)) => HookResponse::ok(id, result),
        Ok(None) => HookResponse::delegated(id),
        Err(e) => {
            tracing::debug!(hook = %request.hook, "hook failed: {}", e);
            HookResponse::failed(id, e.to_string())
        }
    };
    if request.hook == "transformSource" {
        response.template_errors = loader.error_store().take();
    }
    response
}

/// Decode the context, run the hook, and report `None` if it fell through to `next`.
fn dispatch<Ctx, Out, F>(context: Value, hook: F) -> Result<Option<Value>>
where
    Ctx: for<'de> Deserialize<'de> + Default,
    Out: Serialize,
    F: FnOnce(Ctx, &Cell<bool>) -> Result<Out>,
{
    let context = if context.is_null() {
        Ctx::default()
    } else {
        serde_json::from_value(context)?
    };

    let delegated = Cell::new(false);
    let output = hook(context, &delegated)?;
    if delegated.get() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_value(output)?))
}
