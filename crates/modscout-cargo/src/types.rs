//! Types describing crates declared in a Cargo.toml.

/// Section of Cargo.toml a dependency was declared in.
///
/// Target-specific tables (`[target.'cfg(unix)'.dependencies]`) map to the
/// section of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencySection {
    /// Runtime dependencies (`[dependencies]`)
    Dependencies,
    /// Development dependencies (`[dev-dependencies]`)
    DevDependencies,
    /// Build script dependencies (`[build-dependencies]`)
    BuildDependencies,
    /// Workspace-wide dependency definitions (`[workspace.dependencies]`)
    WorkspaceDependencies,
}

impl DependencySection {
    /// Table key of the section.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Dependencies => "dependencies",
            Self::DevDependencies => "dev-dependencies",
            Self::BuildDependencies => "build-dependencies",
            Self::WorkspaceDependencies => "workspace.dependencies",
        }
    }

    /// Only `[dev-dependencies]` are reported as dev dependencies.
    pub const fn is_dev(self) -> bool {
        matches!(self, Self::DevDependencies)
    }
}

/// Where a declared crate comes from.
///
/// # Examples
///
/// ```
/// use modscout_cargo::types::DependencySource;
///
/// let local = DependencySource::Path { path: "../shared".into() };
/// assert!(matches!(local, DependencySource::Path { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySource {
    /// crates.io or another registry
    Registry,
    /// Git repository
    Git { url: String },
    /// Local filesystem path, relative to the declaring manifest
    Path { path: String },
}

/// One crate declared in a Cargo.toml.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredCrate {
    /// Table key; this is the name used in `use` paths (with `-` as `_`).
    pub key: String,
    /// Registry name of the crate, differing from `key` for
    /// `{ package = "..." }` renames.
    pub package: String,
    /// Version requirement, or `"latest"` when none is given.
    pub version: String,
    pub source: DependencySource,
    pub workspace_inherited: bool,
    pub section: DependencySection,
}

impl DeclaredCrate {
    pub fn is_renamed(&self) -> bool {
        self.key != self.package
    }
}
