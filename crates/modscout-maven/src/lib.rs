//! Java ecosystem support for modscout.
//!
//! This crate provides pom.xml parsing with property substitution, Java
//! import extraction, the Java SE package registry, local Maven repository
//! lookup and jar class listing.

pub mod ecosystem;
pub mod error;
pub mod jar;
pub mod parser;
pub mod repository;
pub mod resolver;
pub mod statement;
pub mod stdlib;
pub mod xml;

pub use ecosystem::MavenEcosystem;
pub use error::{MavenError, Result};
pub use jar::JarIndex;
pub use parser::{Pom, PomDependency, parse_pom};
pub use repository::{ArtifactFiles, MavenRepository};
pub use resolver::MavenResolver;
pub use statement::extract_root;
pub use stdlib::JAVA_STDLIB;
