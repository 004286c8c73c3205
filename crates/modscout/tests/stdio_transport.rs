//! Drives the modscout binary over its stdio transport.

mod common;

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdout, Command, Stdio};

use common::polyglot_project;
use serde_json::{Value, json};

struct ServerProcess {
    child: Child,
    reader: BufReader<ChildStdout>,
}

impl ServerProcess {
    fn spawn(project_root: &std::path::Path) -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_modscout"))
            .env("MODSCOUT_PROJECT_ROOT", project_root)
            .env_remove("MODSCOUT_CONFIG")
            .env("RUST_LOG", "off")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn modscout binary");
        let stdout = child.stdout.take().expect("Failed to capture stdout");
        Self {
            child,
            reader: BufReader::new(stdout),
        }
    }

    fn send_line(&mut self, line: &str) {
        let stdin = self.child.stdin.as_mut().expect("stdin not captured");
        stdin.write_all(line.as_bytes()).unwrap();
        stdin.write_all(b"\n").unwrap();
        stdin.flush().unwrap();
    }

    fn send(&mut self, message: &Value) {
        self.send_line(&message.to_string());
    }

    fn read_response(&mut self) -> Value {
        let mut line = String::new();
        self.reader.read_line(&mut line).unwrap();
        serde_json::from_str(&line).unwrap_or_else(|e| panic!("bad response {line:?}: {e}"))
    }

    fn request(&mut self, id: u64, method: &str, params: Value) -> Value {
        self.send(&json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }));
        let response = self.read_response();
        assert_eq!(response["id"], json!(id));
        response
    }

    fn close(mut self) -> std::process::ExitStatus {
        drop(self.child.stdin.take());
        self.child.wait().unwrap()
    }
}

#[test]
fn test_session_over_stdio() {
    let dir = polyglot_project();
    let mut server = ServerProcess::spawn(dir.path());

    let init = server.request(1, "initialize", json!({ "protocolVersion": "2024-11-05" }));
    assert_eq!(init["result"]["serverInfo"]["name"], json!("modscout"));
    server.send(&json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }));

    let tools = server.request(2, "tools/list", json!({}));
    assert_eq!(tools["result"]["tools"].as_array().unwrap().len(), 4);

    let call = server.request(
        3,
        "tools/call",
        json!({
            "name": "validate_import",
            "arguments": { "ecosystem": "python", "importStatement": "import requests" }
        }),
    );
    assert_eq!(call["result"]["isError"], json!(false));
    let text = call["result"]["content"][0]["text"].as_str().unwrap();
    let outcome: Value = serde_json::from_str(text).unwrap();
    assert_eq!(outcome["valid"], json!(true));
    assert_eq!(outcome["packageName"], json!("requests"));

    assert!(server.close().success());
}

#[test]
fn test_malformed_line_does_not_end_session() {
    let dir = polyglot_project();
    let mut server = ServerProcess::spawn(dir.path());

    server.send_line("{\"jsonrpc\": \"2.0\", \"id\": ");
    let error = server.read_response();
    assert_eq!(error["error"]["code"], json!(-32700));
    assert_eq!(error["id"], Value::Null);

    let unknown = server.request(2, "resources/read", json!({}));
    assert_eq!(unknown["error"]["code"], json!(-32601));

    let pong = server.request(3, "ping", json!({}));
    assert_eq!(pong["result"], json!({}));

    assert!(server.close().success());
}
