//! Node.js built-in modules.

use modscout_core::{Category, StandardLibrary, StdlibEntry};
use once_cell::sync::Lazy;

static NODE_BUILTINS: &[StdlibEntry] = &[
    StdlibEntry::new("assert", "Assertion functions for verifying invariants", Category::Testing),
    StdlibEntry::new("assert/strict", "Strict assertion mode", Category::Testing),
    StdlibEntry::new("async_hooks", "Tracking of asynchronous resources", Category::Utility),
    StdlibEntry::new("buffer", "Binary data handling with Buffer", Category::Data),
    StdlibEntry::new("child_process", "Spawning subprocesses", Category::Utility),
    StdlibEntry::new("cluster", "Multi-process server clustering", Category::Network),
    StdlibEntry::new("console", "Debugging console", Category::Utility),
    StdlibEntry::new("constants", "Operating system constants", Category::Utility),
    StdlibEntry::new("crypto", "Cryptographic functionality", Category::Utility),
    StdlibEntry::new("dgram", "UDP datagram sockets", Category::Network),
    StdlibEntry::new("diagnostics_channel", "Named channels for diagnostic messages", Category::Utility),
    StdlibEntry::new("dns", "Name resolution", Category::Network),
    StdlibEntry::new("domain", "Deprecated error handling domains", Category::Utility),
    StdlibEntry::new("events", "Event emitter", Category::Utility),
    StdlibEntry::new("fs", "File system access", Category::Utility),
    StdlibEntry::new("fs/promises", "Promise-based file system access", Category::Utility),
    StdlibEntry::new("http", "HTTP server and client", Category::Network),
    StdlibEntry::new("http2", "HTTP/2 server and client", Category::Network),
    StdlibEntry::new("https", "HTTPS server and client over TLS", Category::Network),
    StdlibEntry::new("inspector", "V8 inspector protocol", Category::Utility),
    StdlibEntry::new("module", "Module loader internals", Category::Build),
    StdlibEntry::new("net", "Stream-based TCP and IPC sockets", Category::Network),
    StdlibEntry::new("os", "Operating system information", Category::Utility),
    StdlibEntry::new("path", "File path manipulation", Category::Utility),
    StdlibEntry::new("path/posix", "POSIX path manipulation", Category::Utility),
    StdlibEntry::new("path/win32", "Windows path manipulation", Category::Utility),
    StdlibEntry::new("perf_hooks", "Performance measurement APIs", Category::Utility),
    StdlibEntry::new("process", "Current process information and control", Category::Utility),
    StdlibEntry::new("punycode", "Deprecated Punycode encoding", Category::Data),
    StdlibEntry::new("querystring", "URL query string parsing", Category::Network),
    StdlibEntry::new("readline", "Line-by-line reading of streams", Category::Utility),
    StdlibEntry::new("readline/promises", "Promise-based readline", Category::Utility),
    StdlibEntry::new("repl", "Read-eval-print loop", Category::Utility),
    StdlibEntry::new("stream", "Streaming data interfaces", Category::Data),
    StdlibEntry::new("stream/promises", "Promise-based stream utilities", Category::Data),
    StdlibEntry::new("stream/web", "WHATWG web streams", Category::Data),
    StdlibEntry::new("string_decoder", "Decoding buffers into strings", Category::Data),
    StdlibEntry::new("test", "Built-in test runner", Category::Testing),
    StdlibEntry::new("timers", "Scheduling functions", Category::Utility),
    StdlibEntry::new("timers/promises", "Promise-based timers", Category::Utility),
    StdlibEntry::new("tls", "TLS and SSL sockets", Category::Network),
    StdlibEntry::new("trace_events", "Trace event collection", Category::Utility),
    StdlibEntry::new("tty", "Terminal text interfaces", Category::Ui),
    StdlibEntry::new("url", "URL resolution and parsing", Category::Network),
    StdlibEntry::new("util", "Utility functions", Category::Utility),
    StdlibEntry::new("util/types", "Type checks for built-in objects", Category::Utility),
    StdlibEntry::new("v8", "V8 engine APIs", Category::Utility),
    StdlibEntry::new("vm", "Compiling and running code in V8 contexts", Category::Build),
    StdlibEntry::new("wasi", "WebAssembly System Interface", Category::Build),
    StdlibEntry::new("worker_threads", "Threads running JavaScript in parallel", Category::Utility),
    StdlibEntry::new("zlib", "Gzip, deflate and brotli compression", Category::Data),
];

/// Node.js built-ins, also accepted with the `node:` prefix.
pub static NODE_STDLIB: Lazy<StandardLibrary> = Lazy::new(|| {
    StandardLibrary::new(NODE_BUILTINS)
        .with_alias_prefix("node:")
        .with_separator("/")
});
