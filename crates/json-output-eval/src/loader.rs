use deno_core::{
    resolve_import, ModuleLoadOptions, ModuleLoadReferrer, ModuleLoadResponse, ModuleLoader,
    ModuleSource, ModuleSourceCode, ModuleSpecifier, ModuleType, ResolutionKind,
};
use deno_error::JsErrorBox;

/// Serves a single in-memory chunk as an ES module.
///
/// The compiled text of an entry chunk never touches disk during the
/// generate phase, so the loader answers the synthetic `bundle:` specifier
/// from memory. Anything else the evaluated code tries to import is
/// unresolvable: evaluation is isolated from the host module graph.
pub(crate) struct ChunkModuleLoader {
    specifier: ModuleSpecifier,
    code: String,
}

impl ChunkModuleLoader {
    pub(crate) fn new(specifier: ModuleSpecifier, code: String) -> Self {
        Self { specifier, code }
    }
}

impl ModuleLoader for ChunkModuleLoader {
    fn resolve(
        &self,
        specifier: &str,
        referrer: &str,
        _kind: ResolutionKind,
    ) -> Result<ModuleSpecifier, JsErrorBox> {
        resolve_import(specifier, referrer).map_err(|err| JsErrorBox::generic(err.to_string()))
    }

    fn load(
        &self,
        module_specifier: &ModuleSpecifier,
        _maybe_referrer: Option<&ModuleLoadReferrer>,
        _options: ModuleLoadOptions,
    ) -> ModuleLoadResponse {
        if module_specifier != &self.specifier {
            return ModuleLoadResponse::Sync(Err(JsErrorBox::generic(format!(
                "module `{module_specifier}` is not available in the isolated chunk context"
            ))));
        }

        ModuleLoadResponse::Sync(Ok(ModuleSource::new(
            ModuleType::JavaScript,
            ModuleSourceCode::String(self.code.clone().into()),
            module_specifier,
            None,
        )))
    }
}
