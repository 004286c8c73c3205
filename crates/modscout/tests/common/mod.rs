//! Shared fixtures for modscout integration tests.

#![allow(dead_code)] // each test binary uses a subset

use std::fs;
use std::path::Path;
use std::sync::Arc;

use modscout::{ToolServer, build_registry};
use modscout_core::{EngineSettings, ResultCache};
use serde_json::{Value, json};

const PACKAGE_JSON: &str = r#"{
  "name": "storefront",
  "dependencies": { "express": "^4.18.2", "zod": "^3.22.0" },
  "devDependencies": { "vitest": "^1.0.0" }
}"#;

const EXPRESS_INDEX: &str = r"
exports = module.exports = createApplication;
function createApplication() {}
exports.Router = function Router(options) {};
exports.json = function json(options) {};
";

const CARGO_TOML: &str = r#"[package]
name = "storefront"
version = "0.1.0"
edition = "2021"

[dependencies]
serde = { version = "1.0", features = ["derive"] }
tokio = "1"
"#;

const GO_MOD: &str = "module example.com/storefront

go 1.22

require github.com/gin-gonic/gin v1.9.1
";

const POM_XML: &str = r"<project>
  <groupId>com.example</groupId>
  <artifactId>storefront</artifactId>
  <version>1.0.0</version>
  <dependencies>
    <dependency>
      <groupId>com.google.guava</groupId>
      <artifactId>guava</artifactId>
      <version>33.0.0-jre</version>
    </dependency>
  </dependencies>
</project>
";

/// A project carrying one manifest per ecosystem, with `express`
/// installed under `node_modules`.
pub(crate) fn polyglot_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("package.json"), PACKAGE_JSON).unwrap();
    fs::write(root.join("requirements.txt"), "requests>=2.31\nnumpy\n").unwrap();
    fs::write(root.join("Cargo.toml"), CARGO_TOML).unwrap();
    fs::write(root.join("go.mod"), GO_MOD).unwrap();
    fs::write(root.join("pom.xml"), POM_XML).unwrap();
    install_express(root);
    dir
}

fn install_express(root: &Path) {
    let express = root.join("node_modules/express");
    fs::create_dir_all(&express).unwrap();
    fs::write(
        express.join("package.json"),
        r#"{"name":"express","description":"Fast, unopinionated, minimalist web framework",
            "main":"index.js","dependencies":{"body-parser":"1.20.1"}}"#,
    )
    .unwrap();
    fs::write(express.join("index.js"), EXPRESS_INDEX).unwrap();
}

/// In-process server over all five engines rooted at `root`.
pub(crate) fn server_for(root: &Path) -> (ToolServer, Arc<ResultCache>) {
    let cache = Arc::new(ResultCache::default());
    let registry = build_registry(&cache, &EngineSettings::new(root));
    (ToolServer::new(Arc::new(registry)), cache)
}

/// Sends one `tools/call` and returns the raw JSON-RPC response.
pub(crate) async fn rpc_call(server: &ToolServer, id: u64, tool: &str, arguments: Value) -> Value {
    let request = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": tool, "arguments": arguments }
    });
    let response = server
        .handle_line(&request.to_string())
        .await
        .expect("requests with an id get a response");
    serde_json::from_str(&response).unwrap()
}

/// Sends one `tools/call` and decodes the JSON payload of a successful result.
pub(crate) async fn tool_payload(server: &ToolServer, tool: &str, arguments: Value) -> Value {
    let response = rpc_call(server, 1, tool, arguments).await;
    let result = &response["result"];
    assert_eq!(result["isError"], json!(false), "tool failed: {response}");
    let text = result["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}
