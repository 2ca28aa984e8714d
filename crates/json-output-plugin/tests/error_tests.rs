//! Failure-path tests: every evaluation or serialization problem must abort
//! the bundle build with a message naming the offending chunk.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rolldown::{BundlerBuilder, BundlerOptions, InputItem, IsExternal};
use rolldown_plugin::__inner::SharedPluginable;
use tempfile::TempDir;

use json_output_plugin::JsonOutputPlugin;

async fn generate_error(options: BundlerOptions, plugin: JsonOutputPlugin) -> String {
    let plugins: Vec<SharedPluginable> = vec![Arc::new(plugin)];
    let mut bundler = BundlerBuilder::default()
        .with_options(options)
        .with_plugins(plugins)
        .build()
        .unwrap_or_else(|err| panic!("build bundler: {err:?}"));

    match bundler.generate().await {
        Ok(_) => panic!("expected the build to fail"),
        Err(err) => format!("{err:?}"),
    }
}

fn entry_options(project: &Path, entry: &str) -> BundlerOptions {
    BundlerOptions {
        input: Some(vec![InputItem {
            name: None,
            import: project.join(entry).to_string_lossy().into_owned(),
        }]),
        cwd: Some(project.to_path_buf()),
        ..Default::default()
    }
}

fn write_fixture(project: &TempDir, name: &str, source: &str) {
    fs::write(project.path().join(name), source).expect("write fixture");
}

#[tokio::test]
async fn top_level_throw_fails_the_build() {
    let project = TempDir::new().expect("temp dir");
    write_fixture(
        &project,
        "broken.js",
        r#"
throw new Error("boom");
export default { never: true };
"#,
    );

    let message = generate_error(
        entry_options(project.path(), "broken.js"),
        JsonOutputPlugin::new(),
    )
    .await;

    assert!(message.contains("Failed to import `broken.js`"), "{message}");
    assert!(message.contains("boom"), "{message}");
}

#[tokio::test]
async fn unresolvable_external_import_fails_the_build() {
    let project = TempDir::new().expect("temp dir");
    write_fixture(
        &project,
        "uses-fs.js",
        r#"
import fs from "node:fs";
export default { cwd: fs.realpathSync(".") };
"#,
    );

    // Keep the import external so it survives bundling and hits the
    // isolated evaluation context, which cannot provide it.
    let mut options = entry_options(project.path(), "uses-fs.js");
    options.external = Some(IsExternal::from(vec!["node:fs".to_string()]));

    let message = generate_error(options, JsonOutputPlugin::new()).await;

    assert!(message.contains("Failed to import `uses-fs.js`"), "{message}");
}

#[tokio::test]
async fn missing_default_export_fails_the_build() {
    let project = TempDir::new().expect("temp dir");
    write_fixture(&project, "named.js", r#"export const name = "only named";"#);

    let message = generate_error(
        entry_options(project.path(), "named.js"),
        JsonOutputPlugin::new(),
    )
    .await;

    assert!(
        message.contains("Module `named.js` has no default export."),
        "{message}"
    );
}

#[tokio::test]
async fn cyclic_default_export_fails_the_build() {
    let project = TempDir::new().expect("temp dir");
    write_fixture(
        &project,
        "cycle.js",
        r#"
const value = { name: "cycle" };
value.self = value;
export default value;
"#,
    );

    let message = generate_error(
        entry_options(project.path(), "cycle.js"),
        JsonOutputPlugin::new(),
    )
    .await;

    assert!(
        message.contains("Failed to serialize default export of `cycle.js` to JSON"),
        "{message}"
    );
}

#[tokio::test]
async fn function_default_export_fails_the_build() {
    let project = TempDir::new().expect("temp dir");
    write_fixture(&project, "fn.js", "export default function make() {}");

    let message = generate_error(
        entry_options(project.path(), "fn.js"),
        JsonOutputPlugin::new(),
    )
    .await;

    assert!(
        message.contains("Failed to serialize default export of `fn.js`"),
        "{message}"
    );
}
