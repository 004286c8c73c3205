//! Cargo.toml parser.
//!
//! Collects every declared crate from:
//! - `[dependencies]`, `[build-dependencies]`, `[dev-dependencies]`
//! - target-specific tables (`[target.'cfg(unix)'.dependencies]`)
//! - `[workspace.dependencies]` of a workspace root
//!
//! Dependencies can be written as a version string, an inline table or a
//! full `[dependencies.name]` table; all three are handled the same way.
//!
//! # Examples
//!
//! ```
//! use modscout_cargo::parse_cargo_toml;
//!
//! let toml = r#"
//! [dependencies]
//! serde = "1.0"
//! rand_core2 = { package = "rand_core", version = "0.6" }
//! "#;
//!
//! let crates = parse_cargo_toml(toml).unwrap();
//! assert_eq!(crates.len(), 2);
//! assert_eq!(crates[1].key, "rand_core2");
//! assert_eq!(crates[1].package, "rand_core");
//! ```

use std::path::Path;

use modscout_core::ManifestDependencies;
use modscout_core::manifest::version_or_latest;
use toml_edit::{DocumentMut, Item, TableLike};

use crate::error::{CargoError, Result};
use crate::types::{DeclaredCrate, DependencySection, DependencySource};

const PLAIN_SECTIONS: [DependencySection; 3] = [
    DependencySection::Dependencies,
    DependencySection::DevDependencies,
    DependencySection::BuildDependencies,
];

/// Parses Cargo.toml content into the crates it declares, in file order.
///
/// # Errors
///
/// Returns an error if the TOML syntax is invalid.
pub fn parse_cargo_toml(content: &str) -> Result<Vec<DeclaredCrate>> {
    let doc = content
        .parse::<DocumentMut>()
        .map_err(|e| CargoError::TomlParseError { source: e })?;

    let mut crates = Vec::new();

    for section in PLAIN_SECTIONS {
        if let Some(table) = doc.get(section.key()).and_then(Item::as_table_like) {
            parse_dependencies_section(table, section, &mut crates);
        }
    }

    if let Some(targets) = doc.get("target").and_then(Item::as_table_like) {
        for (_, target) in targets.iter() {
            let Some(target) = target.as_table_like() else {
                continue;
            };
            for section in PLAIN_SECTIONS {
                if let Some(table) = target.get(section.key()).and_then(Item::as_table_like) {
                    parse_dependencies_section(table, section, &mut crates);
                }
            }
        }
    }

    if let Some(workspace) = doc.get("workspace").and_then(Item::as_table_like)
        && let Some(table) = workspace.get("dependencies").and_then(Item::as_table_like)
    {
        parse_dependencies_section(table, DependencySection::WorkspaceDependencies, &mut crates);
    }

    Ok(crates)
}

fn parse_dependencies_section(
    table: &dyn TableLike,
    section: DependencySection,
    crates: &mut Vec<DeclaredCrate>,
) {
    for (key, value) in table.iter() {
        let mut krate = DeclaredCrate {
            key: key.to_string(),
            package: key.to_string(),
            version: version_or_latest(value.as_str()),
            source: DependencySource::Registry,
            workspace_inherited: false,
            section,
        };

        if let Some(fields) = value.as_table_like() {
            apply_table_fields(&mut krate, fields);
        } else if value.as_str().is_none() {
            tracing::debug!("skipping malformed dependency '{}' in {}", key, section.key());
            continue;
        }

        crates.push(krate);
    }
}

/// Fields of `{ version = "...", package = "...", path = "..." }`.
fn apply_table_fields(krate: &mut DeclaredCrate, fields: &dyn TableLike) {
    let field = |name: &str| fields.get(name).and_then(Item::as_str);

    krate.version = version_or_latest(field("version"));
    if let Some(package) = field("package") {
        krate.package = package.to_string();
    }
    if let Some(path) = field("path") {
        krate.source = DependencySource::Path {
            path: path.to_string(),
        };
    } else if let Some(url) = field("git") {
        krate.source = DependencySource::Git {
            url: url.to_string(),
        };
    }
    krate.workspace_inherited = fields
        .get("workspace")
        .and_then(Item::as_bool)
        .unwrap_or(false);
}

/// Flattens declared crates into dependency maps keyed by import name.
///
/// A crate declared in several sections keeps its non-dev entry.
pub fn to_dependencies(crates: &[DeclaredCrate]) -> ManifestDependencies {
    let mut deps = ManifestDependencies::default();
    for krate in crates {
        let target = if krate.section.is_dev() {
            &mut deps.dev_dependencies
        } else {
            &mut deps.dependencies
        };
        target.insert(krate.key.clone(), krate.version.clone());
    }
    deps.dev_dependencies
        .retain(|name, _| !deps.dependencies.contains_key(name));
    deps
}

/// Reads and parses a Cargo.toml, logging and returning nothing on failure.
pub fn load_declared(path: &Path) -> Vec<DeclaredCrate> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("cannot read {}: {}", path.display(), e);
            return Vec::new();
        }
    };
    match parse_cargo_toml(&content) {
        Ok(crates) => crates,
        Err(e) => {
            tracing::warn!("ignoring malformed {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

pub fn load_dependencies(path: &Path) -> ManifestDependencies {
    to_dependencies(&load_declared(path))
}

/// `[package]` metadata of a crate's own Cargo.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMeta {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    /// `[lib] path`, relative to the crate root
    pub lib_path: Option<String>,
}

impl PackageMeta {
    pub fn parse(content: &str) -> Result<Self> {
        let doc = content
            .parse::<DocumentMut>()
            .map_err(|e| CargoError::TomlParseError { source: e })?;

        let package = doc.get("package").and_then(Item::as_table_like);
        let string = |name: &str| {
            package
                .and_then(|p| p.get(name))
                .and_then(Item::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Ok(Self {
            name: string("name"),
            version: string("version"),
            description: string("description"),
            lib_path: doc
                .get("lib")
                .and_then(Item::as_table_like)
                .and_then(|lib| lib.get("path"))
                .and_then(Item::as_str)
                .map(str::to_string),
        })
    }

    /// Reads `<crate_dir>/Cargo.toml`.
    pub fn load(crate_dir: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(crate_dir.join("Cargo.toml")).ok()?;
        Self::parse(&content)
            .inspect_err(|e| tracing::debug!("{}: {}", crate_dir.display(), e))
            .ok()
    }

    /// Library root source file of the crate.
    pub fn lib_entry(&self, crate_dir: &Path) -> Option<std::path::PathBuf> {
        let relative = self.lib_path.as_deref().unwrap_or("src/lib.rs");
        let entry = crate_dir.join(relative);
        entry.is_file().then_some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_all_forms() {
        let toml = r#"
[package]
name = "app"

[dependencies]
serde = "1.0"
tokio = { version = "1.48", features = ["full"] }
local = { path = "../local" }
gitdep = { git = "https://github.com/org/gitdep" }

[dependencies.reqwest]
version = "0.12"
default-features = false
"#;
        let crates = parse_cargo_toml(toml).unwrap();
        let keys: Vec<&str> = crates.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["serde", "tokio", "local", "gitdep", "reqwest"]);
        assert_eq!(crates[1].version, "1.48");
        assert_eq!(crates[2].version, "latest");
        assert_eq!(
            crates[2].source,
            DependencySource::Path {
                path: "../local".into()
            }
        );
        assert!(matches!(crates[3].source, DependencySource::Git { .. }));
        assert_eq!(crates[4].version, "0.12");
    }

    #[test]
    fn test_sections_and_targets() {
        let toml = r#"
[dependencies]
anyhow = "1"

[dev-dependencies]
tempfile = "3"

[build-dependencies]
cc = "1.0"

[target.'cfg(unix)'.dependencies]
nix = "0.29"

[target.'cfg(windows)'.dev-dependencies]
windows-sys = "0.59"
"#;
        let deps = to_dependencies(&parse_cargo_toml(toml).unwrap());
        assert_eq!(
            deps.dependencies.keys().collect::<Vec<_>>(),
            vec!["anyhow", "cc", "nix"]
        );
        assert_eq!(
            deps.dev_dependencies.keys().collect::<Vec<_>>(),
            vec!["tempfile", "windows-sys"]
        );
    }

    #[test]
    fn test_workspace_dependencies_and_inheritance() {
        let toml = r#"
[workspace]
members = ["crates/*"]

[workspace.dependencies]
serde = { version = "1.0", features = ["derive"] }

[dependencies]
serde = { workspace = true }
"#;
        let crates = parse_cargo_toml(toml).unwrap();
        let inherited = crates.iter().find(|c| c.workspace_inherited).unwrap();
        assert_eq!(inherited.section, DependencySection::Dependencies);
        assert_eq!(inherited.version, "latest");

        let deps = to_dependencies(&crates);
        assert_eq!(deps.dependencies["serde"], "1.0");
    }

    #[test]
    fn test_renamed_package() {
        let toml = r#"
[dependencies]
futures01 = { package = "futures", version = "0.1" }
"#;
        let crates = parse_cargo_toml(toml).unwrap();
        assert!(crates[0].is_renamed());
        let deps = to_dependencies(&crates);
        assert!(deps.contains("futures01"));
        assert!(!deps.contains("futures"));
    }

    #[test]
    fn test_dev_duplicate_of_runtime_dependency() {
        let toml = r#"
[dependencies]
tokio = "1"

[dev-dependencies]
tokio = { version = "1", features = ["test-util"] }
"#;
        let deps = to_dependencies(&parse_cargo_toml(toml).unwrap());
        assert!(deps.dependencies.contains_key("tokio"));
        assert!(deps.dev_dependencies.is_empty());
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let toml = r#"
[dependencies]
good = "1"
bad = 42
"#;
        let crates = parse_cargo_toml(toml).unwrap();
        assert_eq!(crates.len(), 1);
    }

    #[test]
    fn test_invalid_and_empty() {
        assert!(parse_cargo_toml("[dependencies\nserde = ").is_err());
        assert!(parse_cargo_toml("").unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_or_malformed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_dependencies(&dir.path().join("Cargo.toml")).is_empty());

        let path = dir.path().join("Cargo.toml");
        fs::write(&path, "[[[").unwrap();
        assert!(load_dependencies(&path).is_empty());
    }

    #[test]
    fn test_package_meta() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/core.rs"), "").unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            r#"
[package]
name = "widget"
version = "0.3.1"
description = "Widgets for everyone"

[lib]
path = "lib/core.rs"
"#,
        )
        .unwrap();

        let meta = PackageMeta::load(dir.path()).unwrap();
        assert_eq!(meta.name.as_deref(), Some("widget"));
        assert_eq!(meta.description.as_deref(), Some("Widgets for everyone"));
        assert_eq!(meta.lib_entry(dir.path()), Some(dir.path().join("lib/core.rs")));
    }

    #[test]
    fn test_package_meta_default_entry_missing() {
        let dir = tempfile::tempdir().unwrap();
        let meta = PackageMeta::parse("[package]\nname = \"x\"\n").unwrap();
        assert_eq!(meta.lib_entry(dir.path()), None);
    }
}
