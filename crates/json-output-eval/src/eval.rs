//! Chunk evaluation: one isolate per call, default export out.

use std::rc::Rc;
use std::thread;

use deno_core::{v8, JsRuntime, ModuleSpecifier, PollEventLoopOptions, RuntimeOptions};

use crate::error::EvalError;
use crate::loader::ChunkModuleLoader;

/// Bare isolates have no web globals. A silent `console` keeps modules that
/// log during evaluation from dying on a ReferenceError.
const CONSOLE_SHIM: &str = r#"
globalThis.console = {
    log() {}, info() {}, warn() {}, error() {}, debug() {}, trace() {},
};
"#;

/// Evaluate compiled chunk text as an ES module and return its default
/// export as a JSON value.
///
/// The chunk runs in a fresh engine instance that can only see itself:
/// its text is served from memory under a synthetic `bundle:` specifier and
/// every other import fails to resolve. The event loop is driven to
/// completion, so top-level await works. Conversion to JSON uses the
/// engine's stringifier, which gives JavaScript-exact behavior for `toJSON`,
/// `Date`, and cyclic structures; the resulting text is re-parsed into a
/// [`serde_json::Value`] with object key order preserved.
///
/// This call blocks until evaluation finishes. The isolate is not `Send`,
/// so it lives and dies on a dedicated thread spawned per call.
pub fn evaluate_default_export(file_name: &str, code: &str) -> Result<serde_json::Value, EvalError> {
    let file_name = file_name.to_string();
    let code = code.to_string();

    let handle = thread::Builder::new()
        .name("json-output-eval".to_string())
        .spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .expect("build evaluation runtime");
            runtime.block_on(eval_chunk(&file_name, code))
        })
        .expect("spawn evaluation thread");

    handle.join().expect("evaluation thread panicked")
}

async fn eval_chunk(file_name: &str, code: String) -> Result<serde_json::Value, EvalError> {
    let specifier = chunk_specifier(file_name)?;
    tracing::trace!("evaluating chunk `{file_name}` as `{specifier}`");

    let loader = Rc::new(ChunkModuleLoader::new(specifier.clone(), code));
    let mut runtime = JsRuntime::new(RuntimeOptions {
        module_loader: Some(loader),
        ..Default::default()
    });

    runtime
        .execute_script("json-output:bootstrap", CONSOLE_SHIM)
        .map_err(|err| import_error(file_name, err))?;

    let module_id = runtime
        .load_main_es_module(&specifier)
        .await
        .map_err(|err| import_error(file_name, err))?;
    let evaluated = runtime.mod_evaluate(module_id);
    runtime
        .run_event_loop(PollEventLoopOptions::default())
        .await
        .map_err(|err| import_error(file_name, err))?;
    evaluated.await.map_err(|err| import_error(file_name, err))?;

    let namespace = runtime
        .get_module_namespace(module_id)
        .map_err(|err| import_error(file_name, err))?;

    let scope = &mut runtime.handle_scope();
    let namespace = v8::Local::new(scope, namespace);
    let key = v8::String::new(scope, "default").expect("allocate key string");
    let export = namespace
        .get(scope, key.into())
        .filter(|value| !value.is_undefined())
        .ok_or_else(|| EvalError::MissingDefaultExport {
            file_name: file_name.to_string(),
        })?;

    to_json_value(scope, export, file_name)
}

/// Convert a module-namespace value to JSON with the engine's stringifier.
fn to_json_value(
    scope: &mut v8::HandleScope,
    value: v8::Local<v8::Value>,
    file_name: &str,
) -> Result<serde_json::Value, EvalError> {
    if value.is_function() || value.is_symbol() {
        return Err(serialize_error(file_name, "value has no JSON representation"));
    }

    let tc_scope = &mut v8::TryCatch::new(scope);
    let Some(text) = v8::json::stringify(tc_scope, value) else {
        let message = tc_scope
            .exception()
            .map(|exception| exception.to_rust_string_lossy(tc_scope))
            .unwrap_or_else(|| "unknown serialization error".to_string());
        return Err(serialize_error(file_name, &message));
    };

    let text = text.to_rust_string_lossy(tc_scope);
    if text == "undefined" {
        return Err(serialize_error(file_name, "value has no JSON representation"));
    }

    serde_json::from_str(&text).map_err(|err| serialize_error(file_name, &err.to_string()))
}

fn chunk_specifier(file_name: &str) -> Result<ModuleSpecifier, EvalError> {
    ModuleSpecifier::parse(&format!("bundle:///{file_name}"))
        .map_err(|err| import_error(file_name, err))
}

fn import_error(file_name: &str, err: impl std::fmt::Display) -> EvalError {
    EvalError::Import {
        file_name: file_name.to_string(),
        message: err.to_string(),
    }
}

fn serialize_error(file_name: &str, message: &str) -> EvalError {
    EvalError::Serialize {
        file_name: file_name.to_string(),
        message: message.to_string(),
    }
}
