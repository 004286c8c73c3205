//! End-to-end tool call benchmarks.
//!
//! Measures a `validate_import` call through the dispatcher with a cold
//! cache (manifest read and parsed every time) against a warm one.
//!
//! Targets:
//! - Cached call: < 50μs
//! - Uncached call with a small manifest: < 2ms

use criterion::{Criterion, criterion_group, criterion_main};
use modscout::{ToolServer, build_registry};
use modscout_core::{EngineSettings, ResultCache};
use std::hint::black_box;
use std::sync::Arc;
use tokio::runtime::Runtime;

const PACKAGE_JSON: &str = r#"{
  "dependencies": { "express": "^4.18.2", "zod": "^3.22.0", "react": "^18.2.0" },
  "devDependencies": { "vitest": "^1.0.0" }
}"#;

fn request(id: u64) -> String {
    format!(
        r#"{{"jsonrpc":"2.0","id":{id},"method":"tools/call","params":{{"name":"validate_import","arguments":{{"ecosystem":"javascript","importStatement":"import {{ z }} from 'zod'"}}}}}}"#
    )
}

fn bench_validate(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("package.json"), PACKAGE_JSON).unwrap();

    let mut group = c.benchmark_group("validate_import");

    let cached = ToolServer::new(Arc::new(build_registry(
        &Arc::new(ResultCache::default()),
        &EngineSettings::new(dir.path()),
    )));
    group.bench_function("cached", |b| {
        b.iter(|| runtime.block_on(cached.handle_line(black_box(&request(1)))));
    });

    let mut settings = EngineSettings::new(dir.path());
    settings.cache_enabled = false;
    let uncached = ToolServer::new(Arc::new(build_registry(
        &Arc::new(ResultCache::default()),
        &settings,
    )));
    group.bench_function("uncached", |b| {
        b.iter(|| runtime.block_on(uncached.handle_line(black_box(&request(1)))));
    });

    group.finish();
}

criterion_group!(benches, bench_validate);
criterion_main!(benches);
