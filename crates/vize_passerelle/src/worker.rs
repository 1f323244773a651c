//! SFC compiler running in a worker process.
//!
//! The reference Vue compiler is JavaScript, so it usually runs beside the
//! loader rather than inside it. The worker is started once and speaks one JSON
//! object per line over stdin/stdout:
//!
//! ```json
//! {"id": 1, "method": "parse", "params": {"source": "...", "options": {"filename": "/app/A.vue"}}}
//! {"id": 1, "result": {"descriptor": {...}, "errors": []}}
//! ```
//!
//! Methods are `parse`, `compileScript` (`{descriptor, options}`) and
//! `compileTemplate` (`{options}`). A failed call answers with
//! `{"id": n, "error": {"message": "..."}}`.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::compiler::{
    ParseOptions, ParseOutput, ScriptCompileOptions, ScriptOutput, SfcCompiler,
    TemplateCompileOptions, TemplateOutput,
};
use crate::descriptor::SfcDescriptor;
use crate::error::{LoaderError, Result};

/// Compiler backed by a long-running worker process.
pub struct WorkerCompiler {
    command: String,
    args: Vec<String>,
    inner: Mutex<Option<WorkerProcess>>,
}

struct WorkerProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    next_id: u64,
}

#[derive(Debug, Deserialize)]
struct WorkerResponse {
    id: Option<u64>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<WorkerError>,
}

#[derive(Debug, Deserialize)]
struct WorkerError {
    message: String,
}

impl WorkerCompiler {
    /// Start `command` with `args` as the compiler worker.
    pub fn spawn(command: &str, args: &[String]) -> Result<Self> {
        let compiler = Self::lazy(command, args);
        compiler.start()?;
        Ok(compiler)
    }

    /// Configure a worker that is started on the first compiler call.
    ///
    /// Hosts that only resolve specifiers never pay for the process.
    pub fn lazy(command: &str, args: &[String]) -> Self {
        Self {
            command: command.to_string(),
            args: args.to_vec(),
            inner: Mutex::new(None),
        }
    }

    /// Start the worker now if it is not running yet.
    pub fn start(&self) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.is_none() {
            *inner = Some(WorkerProcess::start(&self.command, &self.args)?);
        }
        Ok(())
    }

    /// Whether the worker process is running.
    pub fn is_started(&self) -> bool {
        self.lock().map(|inner| inner.is_some()).unwrap_or(false)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<WorkerProcess>>> {
        self.inner
            .lock()
            .map_err(|_| LoaderError::Worker("worker lock poisoned".to_string()))
    }

    fn call<T: DeserializeOwned>(&self, method: &str, params: Value, filename: &str) -> Result<T> {
        let mut inner = self.lock()?;
        let worker = match &mut *inner {
            Some(worker) => worker,
            slot => slot.insert(WorkerProcess::start(&self.command, &self.args)?),
        };

        let value = worker.request(method, params)?.map_err(|message| LoaderError::Compile {
            filename: filename.to_string(),
            message,
        })?;
        Ok(serde_json::from_value(value)?)
    }
}

impl WorkerProcess {
    fn start(command: &str, args: &[String]) -> Result<Self> {
        tracing::debug!(command, ?args, "starting compiler worker");

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| LoaderError::Worker(format!("Failed to start '{}': {}", command, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| LoaderError::Worker("Failed to get stdin of worker".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| LoaderError::Worker("Failed to get stdout of worker".to_string()))?;

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            next_id: 1,
        })
    }

    /// Send one request and wait for its response.
    ///
    /// The outer `Result` is transport failure, the inner one a compiler error.
    fn request(
        &mut self,
        method: &str,
        params: Value,
    ) -> Result<std::result::Result<Value, String>> {
        let id = self.next_id;
        self.next_id += 1;

        let request = serde_json::json!({
            "id": id,
            "method": method,
            "params": params,
        });
        let mut line = serde_json::to_string(&request)?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.flush()?;

        loop {
            let mut buf = String::new();
            if self.stdout.read_line(&mut buf)? == 0 {
                return Err(LoaderError::Worker(format!(
                    "worker exited while handling '{}'",
                    method
                )));
            }
            if buf.trim().is_empty() {
                continue;
            }

            let response: WorkerResponse = serde_json::from_str(&buf)?;
            if response.id != Some(id) {
                tracing::debug!(expected = id, got = ?response.id, "skipping stray worker message");
                continue;
            }

            return Ok(match response.error {
                Some(error) => Err(error.message),
                None => Ok(response.result.unwrap_or(Value::Null)),
            });
        }
    }
}

impl Drop for WorkerProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl SfcCompiler for WorkerCompiler {
    fn parse(&self, source: &str, options: &ParseOptions) -> Result<ParseOutput> {
        let params = serde_json::json!({ "source": source, "options": options });
        self.call("parse", params, &options.filename)
    }

    fn compile_script(
        &self,
        descriptor: &SfcDescriptor,
        options: &ScriptCompileOptions,
    ) -> Result<ScriptOutput> {
        let params = serde_json::json!({ "descriptor": descriptor, "options": options });
        self.call("compileScript", params, &descriptor.filename)
    }

    fn compile_template(&self, options: &TemplateCompileOptions) -> Result<TemplateOutput> {
        let params = serde_json::json!({ "options": options });
        self.call("compileTemplate", params, &options.filename)
    }
}
