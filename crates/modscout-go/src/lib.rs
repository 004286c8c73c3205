//! Go ecosystem support for modscout.
//!
//! This crate provides go.mod parsing (requirements and replacements),
//! import-path extraction, the Go standard-library registry, module cache
//! lookup and package export introspection.

pub mod ecosystem;
pub mod error;
pub mod introspect;
pub mod modcache;
pub mod parser;
pub mod resolver;
pub mod statement;
pub mod stdlib;

pub use ecosystem::GoEcosystem;
pub use error::{GoError, Result};
pub use modcache::{GoModCache, escape_module_path};
pub use parser::{GoMod, GoReplace, GoRequire, parse_go_mod};
pub use resolver::GoResolver;
pub use statement::extract_root;
pub use stdlib::GO_STDLIB;
