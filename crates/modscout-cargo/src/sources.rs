//! Locating unpacked crate sources on disk.
//!
//! Crates are looked up in the project's `vendor/` directory (as written by
//! `cargo vendor`) and in every registry under `$CARGO_HOME/registry/src`.
//! Registry directories are named `<crate>-<version>`; vendored ones are named
//! `<crate>` or, for duplicates, `<crate>-<version>`.

use std::path::{Path, PathBuf};

use semver::{Version, VersionReq};

use crate::parser::PackageMeta;

/// Directories that hold unpacked crate sources, searched in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateSources {
    roots: Vec<PathBuf>,
}

impl CrateSources {
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// `vendor/` of the project, then each registry source directory.
    pub fn for_project(project_dir: &Path) -> Self {
        let mut roots = Vec::new();
        let vendor = project_dir.join("vendor");
        if vendor.is_dir() {
            roots.push(vendor);
        }
        if let Some(home) = cargo_home() {
            roots.extend(registry_source_dirs(&home));
        }
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Unpacked copy of `package` from the first root that holds one.
    ///
    /// Within that root the highest version satisfying `requirement` wins
    /// (when it is a valid semver requirement), else the highest version.
    pub fn find(&self, package: &str, requirement: Option<&str>) -> Option<PathBuf> {
        let requirement = requirement.and_then(|req| VersionReq::parse(req).ok());
        let satisfies = |version: &Option<Version>| match (&requirement, version) {
            (Some(req), Some(v)) => req.matches(v),
            (Some(_), None) => false,
            (None, _) => true,
        };

        self.roots
            .iter()
            .map(|root| candidates_in(root, package))
            .find(|candidates| !candidates.is_empty())
            .and_then(|candidates| {
                highest(candidates.iter().filter(|(v, _)| satisfies(v)))
                    .or_else(|| highest(candidates.iter()))
            })
    }
}

fn highest<'a>(pool: impl Iterator<Item = &'a (Option<Version>, PathBuf)>) -> Option<PathBuf> {
    pool.max_by(|a, b| a.0.cmp(&b.0)).map(|(_, path)| path.clone())
}

fn candidates_in(root: &Path, package: &str) -> Vec<(Option<Version>, PathBuf)> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };
    let prefix = format!("{package}-");

    entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.join("Cargo.toml").is_file())
        .filter_map(|path| {
            let dir_name = path.file_name()?.to_str()?;
            if dir_name == package {
                let version = PackageMeta::load(&path)
                    .and_then(|meta| meta.version)
                    .and_then(|v| Version::parse(&v).ok());
                return Some((version, path));
            }
            let version = Version::parse(dir_name.strip_prefix(&prefix)?).ok()?;
            Some((Some(version), path))
        })
        .collect()
}

fn cargo_home() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("CARGO_HOME") {
        return Some(PathBuf::from(home));
    }
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".cargo"))
}

/// `registry/src/<index>` directories, sorted for stable lookup order.
fn registry_source_dirs(cargo_home: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(cargo_home.join("registry").join("src")) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}
