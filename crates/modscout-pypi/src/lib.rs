//! Python ecosystem support for modscout.
//!
//! This crate provides pyproject.toml and requirements.txt parsing, import
//! extraction, the CPython standard-library registry, virtual-environment
//! lookup and `__init__.py` export introspection.

pub mod ecosystem;
pub mod error;
pub mod introspect;
pub mod names;
pub mod parser;
pub mod resolver;
pub mod site;
pub mod statement;
pub mod stdlib;

pub use ecosystem::PypiEcosystem;
pub use error::{PypiError, Result};
pub use parser::{parse_pyproject, parse_requirements};
pub use resolver::PypiResolver;
pub use statement::extract_root;
pub use stdlib::PYTHON_STDLIB;
