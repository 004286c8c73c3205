//! JavaScript/TypeScript ecosystem support for modscout.
//!
//! This crate provides package.json parsing, ES module and CommonJS import
//! extraction, the Node.js built-in registry and tree-sitter based export
//! introspection for Node.js projects.

pub mod ecosystem;
pub mod error;
pub mod introspect;
pub mod parser;
pub mod resolver;
pub mod statement;
pub mod stdlib;

pub use ecosystem::NpmEcosystem;
pub use error::{NpmError, Result};
pub use parser::{PackageMeta, parse_package_json};
pub use resolver::NpmResolver;
pub use statement::extract_root;
pub use stdlib::NODE_STDLIB;
