use std::io::Read;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::scanner::Scanner;

/// Named values made visible to a script while it runs.
pub type Bindings = Map<String, Value>;

/// An interpreter that can run a transpiled script.
///
/// scriptlet ships no implementation: interpreters, their lifecycle and any
/// pooling live with the caller.
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Run `script` with `bindings` in scope and return its result value.
    async fn execute(&self, script: &str, bindings: &Bindings) -> Result<Value>;
}

/// Transpiles templates and hands the resulting scripts to an executor.
pub struct TemplateEngine<E> {
    scanner: Scanner,
    executor: E,
}

impl<E: ScriptExecutor> TemplateEngine<E> {
    pub fn new(scanner: Scanner, executor: E) -> Self {
        Self { scanner, executor }
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Transpile a template without running it.
    pub fn preprocess<R: Read>(&self, reader: R) -> Result<String> {
        self.scanner.transpile(reader)
    }

    /// Transpile a template and run it. The executor is not called if the
    /// template is malformed or unreadable.
    pub async fn eval<R: Read>(&self, reader: R, bindings: &Bindings) -> Result<Value> {
        let script = self.preprocess(reader)?;
        tracing::debug!(
            executor = self.executor.name(),
            script_len = script.len(),
            "executing transpiled template"
        );
        self.executor.execute(&script, bindings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delimiters::DelimiterConfig;
    use crate::error::ScriptletError;
    use std::sync::Mutex;

    /// Records every script it is asked to run and echoes it back.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ScriptExecutor for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        async fn execute(&self, script: &str, bindings: &Bindings) -> Result<Value> {
            self.seen.lock().unwrap().push(script.to_string());
            Ok(serde_json::json!({
                "script": script,
                "bindings": bindings.len(),
            }))
        }
    }

    struct Failing;

    #[async_trait]
    impl ScriptExecutor for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn execute(&self, _script: &str, _bindings: &Bindings) -> Result<Value> {
            Err(ScriptletError::Execution("ReferenceError: x is not defined".into()))
        }
    }

    fn engine<E: ScriptExecutor>(executor: E) -> TemplateEngine<E> {
        let scanner = Scanner::new(DelimiterConfig::new("w(\"", "\");", "w(", ");"));
        TemplateEngine::new(scanner, executor)
    }

    #[tokio::test]
    async fn test_eval_passes_transpiled_script() {
        let engine = engine(Recorder::default());
        let mut bindings = Bindings::new();
        bindings.insert("name".into(), Value::from("taylor"));

        let result = engine
            .eval("Hi <%= name %>".as_bytes(), &bindings)
            .await
            .unwrap();

        assert_eq!(result["script"], "w(\"Hi \");w( name );w(\"\");");
        assert_eq!(result["bindings"], 1);
        assert_eq!(engine.executor().seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_template_skips_executor() {
        let engine = engine(Recorder::default());
        let err = engine
            .eval("<% if (x) {".as_bytes(), &Bindings::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ScriptletError::MalformedTemplate { .. }));
        assert!(engine.executor().seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_executor_errors_propagate() {
        let err = engine(Failing)
            .eval("<%= x %>".as_bytes(), &Bindings::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptletError::Execution(_)));
    }

    #[test]
    fn test_preprocess_matches_scanner() {
        let engine = engine(Recorder::default());
        let script = engine.preprocess("a\nb".as_bytes()).unwrap();
        assert_eq!(script, engine.scanner().transpile_str("a\nb").unwrap());
    }
}
