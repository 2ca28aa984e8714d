//! # json-output-eval
//!
//! Isolated evaluation of compiled JavaScript chunks.
//!
//! The bundler hands this crate the generated text of an entry chunk. The
//! crate evaluates it as an ES module inside a fresh embedded engine
//! instance, reads the module's `default` export, and converts it to a
//! [`serde_json::Value`] using the engine's own JSON semantics (so `toJSON`,
//! `Date`, and cyclic-structure errors behave exactly as they would in
//! JavaScript).
//!
//! Every call gets its own isolate. Nothing leaks between evaluations and
//! nothing from the host process is visible to the evaluated module.
//!
//! ## Quick Start
//!
//! ```no_run
//! use json_output_eval::evaluate_default_export;
//!
//! let value = evaluate_default_export(
//!     "config.js",
//!     "export default { name: \"app\", port: 8080 };",
//! )?;
//! assert_eq!(value["port"], 8080);
//! # Ok::<(), json_output_eval::EvalError>(())
//! ```

mod error;
mod eval;
mod loader;

pub use error::EvalError;
pub use eval::evaluate_default_export;
