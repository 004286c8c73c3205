//! Rust ecosystem support for modscout.
//!
//! This crate provides Cargo.toml parsing (all dependency sections, target
//! tables, workspace dependencies and renames), `use`-path extraction, the
//! toolchain crate registry, crate-source lookup and `src/lib.rs` export
//! introspection.

pub mod ecosystem;
pub mod error;
pub mod introspect;
pub mod metadata;
pub mod parser;
pub mod resolver;
pub mod sources;
pub mod statement;
pub mod stdlib;
pub mod types;

pub use ecosystem::CargoEcosystem;
pub use error::{CargoError, Result};
pub use parser::{PackageMeta, parse_cargo_toml};
pub use resolver::CargoResolver;
pub use statement::extract_root;
pub use stdlib::RUST_STDLIB;
pub use types::{DeclaredCrate, DependencySection, DependencySource};
