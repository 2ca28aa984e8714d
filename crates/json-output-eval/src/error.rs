use thiserror::Error;

/// Failures raised while turning an entry chunk into a JSON value.
///
/// Every variant carries the chunk's output file name so that build
/// diagnostics point at the module that needs fixing. All three kinds are
/// build-fatal: the plugin aborts the generate phase on the first one.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The compiled chunk could not be evaluated as an ES module. Covers
    /// syntax errors, top-level throws, rejected top-level awaits, and
    /// imports the isolated module context cannot resolve.
    #[error("Failed to import `{file_name}`: {message}")]
    Import {
        /// Output file name of the failing chunk.
        file_name: String,
        /// Engine-reported failure detail.
        message: String,
    },

    /// Evaluation succeeded but the module namespace has no `default`
    /// binding, or the binding's value is `undefined`.
    #[error("Module `{file_name}` has no default export.")]
    MissingDefaultExport {
        /// Output file name of the failing chunk.
        file_name: String,
    },

    /// The default export has no JSON representation (a function or symbol)
    /// or stringification threw (cyclic structures, throwing `toJSON`).
    #[error("Failed to serialize default export of `{file_name}` to JSON: {message}")]
    Serialize {
        /// Output file name of the failing chunk.
        file_name: String,
        /// Engine-reported failure detail.
        message: String,
    },
}
