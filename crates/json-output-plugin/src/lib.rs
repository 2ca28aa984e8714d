//! Rolldown plugin that replaces entry chunks with serialized JSON.
//!
//! After the bundle is generated, the plugin evaluates every entry chunk's
//! compiled JavaScript in an isolated module context, extracts the module's
//! `default` export, serializes it to JSON text, and swaps the chunk for a
//! `.json` asset in place. Shared chunks, dynamic-import chunks, and
//! existing assets are left untouched.
//!
//! # Architecture
//!
//! ```text
//! entry chunk → generate_bundle() hook → isolated eval → default export
//!             → value transform → JSON text → .json asset (in-place swap)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use json_output_plugin::{JsonOutputOptions, JsonOutputPlugin};
//! use std::sync::Arc;
//!
//! let plugin = Arc::new(JsonOutputPlugin::with_options(JsonOutputOptions::new()));
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use rolldown_common::{Output, OutputAsset};
use rolldown_plugin::{HookGenerateBundleArgs, HookNoopReturn, HookUsage, Plugin, PluginContext};

use json_output_eval::evaluate_default_export;

mod config;
mod render;

pub use config::{Indent, JsonOutputOptions, TransformFn, ValueTransform};

/// Rolldown plugin that evaluates entry chunks and replaces each one with a
/// JSON asset holding the chunk's serialized default export.
///
/// Any evaluation or serialization failure aborts the bundle build with a
/// message naming the offending chunk.
#[derive(Debug, Clone)]
pub struct JsonOutputPlugin {
    /// Configuration options for JSON emission.
    options: JsonOutputOptions,
    /// The host build's resolved minify intent, sampled when the plugin is
    /// wired up. Rolldown does not hand normalized output options to
    /// generate-phase hooks.
    global_minify: bool,
}

impl JsonOutputPlugin {
    /// Create a new plugin with default options.
    pub fn new() -> Self {
        Self::with_options(JsonOutputOptions::default())
    }

    /// Create a new plugin with custom options.
    ///
    /// # Example
    ///
    /// ```rust
    /// use json_output_plugin::{Indent, JsonOutputOptions, JsonOutputPlugin};
    ///
    /// let options = JsonOutputOptions::new().with_indent(Indent::Spaces(2));
    /// let plugin = JsonOutputPlugin::with_options(options);
    /// ```
    pub fn with_options(options: JsonOutputOptions) -> Self {
        Self {
            options,
            global_minify: false,
        }
    }

    /// Create a plugin and sample the host's minify intent from the bundler
    /// options it will run under.
    pub fn from_bundler_options(
        options: JsonOutputOptions,
        bundler_options: &rolldown::BundlerOptions,
    ) -> Self {
        Self::with_options(options).with_global_minify(bundler_options.minify.is_some())
    }

    /// Record whether the host build asked for minified output overall.
    pub fn with_global_minify(mut self, minify: bool) -> Self {
        self.global_minify = minify;
        self
    }

    /// Per-level indent text for the emitted JSON, `None` for compact.
    fn effective_indent(&self) -> Option<String> {
        if self.options.respect_global_minify && self.global_minify {
            return None;
        }
        self.options.indent.as_text()
    }
}

impl Default for JsonOutputPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for JsonOutputPlugin {
    fn name(&self) -> Cow<'static, str> {
        "json-output".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::GenerateBundle
    }

    /// Generate-bundle hook: swap every entry chunk for a JSON asset.
    ///
    /// 1. Collect the position, file name, and compiled code of every entry
    ///    chunk. Non-entry chunks and existing assets are skipped.
    /// 2. Evaluate each chunk in an isolated module context and read its
    ///    default export.
    /// 3. Apply the value transform, render JSON with the effective
    ///    indentation, and replace the chunk with a `.json` asset in the
    ///    same slot of the artifact set.
    fn generate_bundle(
        &self,
        _ctx: &PluginContext,
        args: &mut HookGenerateBundleArgs<'_>,
    ) -> impl std::future::Future<Output = HookNoopReturn> + Send {
        let options = self.options.clone();
        let indent = self.effective_indent();

        async move {
            let mut entries = Vec::new();
            for (index, output) in args.bundle.iter().enumerate() {
                if let Output::Chunk(chunk) = output {
                    if chunk.is_entry {
                        entries.push((index, chunk.filename.to_string(), chunk.code.clone()));
                    }
                }
            }

            for (index, file_name, code) in entries {
                let eval_name = file_name.clone();
                // The evaluation blocks on a dedicated engine thread; keep it
                // off the async workers.
                let value = tokio::task::spawn_blocking(move || {
                    evaluate_default_export(&eval_name, &code)
                })
                .await
                .map_err(|err| anyhow!("evaluation of `{file_name}` panicked: {err}"))??;

                let value = match &options.value_transform {
                    Some(transform) => render::transformed(&value, transform).with_context(|| {
                        format!("Failed to serialize default export of `{file_name}` to JSON")
                    })?,
                    None => value,
                };
                let json = render::render_json(&value, indent.as_deref()).with_context(|| {
                    format!("Failed to serialize default export of `{file_name}` to JSON")
                })?;

                let asset_name = json_file_name(&file_name);
                tracing::debug!("replacing entry chunk `{file_name}` with asset `{asset_name}`");

                let asset = OutputAsset {
                    names: vec![],
                    original_file_names: vec![file_name],
                    filename: asset_name.into(),
                    source: json.into(),
                };
                args.bundle[index] = Output::Asset(Arc::new(asset));
            }

            Ok(())
        }
    }
}

/// Rewrite a chunk file name's trailing `.js`, `.mjs`, or `.cjs` segment to
/// `.json`. Names without a recognized suffix are kept unchanged; the chunk
/// still becomes a JSON asset under its old name.
fn json_file_name(file_name: &str) -> String {
    for suffix in [".js", ".mjs", ".cjs"] {
        if let Some(stem) = file_name.strip_suffix(suffix) {
            return format!("{stem}.json");
        }
    }
    file_name.to_string()
}
