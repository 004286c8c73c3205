//! Installed-package lookup in virtual environments.
//!
//! Looks for `site-packages` under the project's `.venv`, `venv` or `env`
//! directory (POSIX `lib/python3.*/site-packages` and Windows
//! `Lib/site-packages` layouts) and reads `*.dist-info` metadata.

use std::path::{Path, PathBuf};

use crate::names::{candidate_distributions, import_name_of, normalize};
use crate::parser::parse_requirement;

const VENV_DIRS: &[&str] = &[".venv", "venv", "env"];

/// A virtual environment found next to the project manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEnv {
    pub root: PathBuf,
    pub site_packages: Vec<PathBuf>,
}

impl VirtualEnv {
    /// First virtual environment directly inside `project_dir`.
    pub fn discover(project_dir: &Path) -> Option<Self> {
        VENV_DIRS
            .iter()
            .map(|name| project_dir.join(name))
            .filter(|root| root.is_dir())
            .find_map(|root| {
                let site_packages = site_packages_dirs(&root);
                (!site_packages.is_empty()).then_some(Self { root, site_packages })
            })
    }

    /// Interpreter inside the environment, if present.
    pub fn python(&self) -> Option<PathBuf> {
        ["bin/python3", "bin/python", "Scripts/python.exe"]
            .iter()
            .map(|rel| self.root.join(rel))
            .find(|p| p.is_file())
    }

    /// Package directory or module file importable as `name`.
    ///
    /// `name` may be an import name (`yaml`) or a distribution name
    /// (`PyYAML`); `top_level.txt` of the matching dist-info is consulted for
    /// the latter.
    pub fn find_module(&self, name: &str) -> Option<InstalledPackage> {
        for site in &self.site_packages {
            let dist_info = find_dist_info(site, name);
            let mut import_names = vec![name.to_string(), name.replace('-', "_"), import_name_of(name)];
            if let Some(top_level) = dist_info.as_deref().and_then(read_top_level) {
                import_names.insert(0, top_level);
            }

            for import_name in import_names {
                let relative: PathBuf = import_name.split('.').collect();
                let package = site.join(&relative);
                let module = site.join(relative.with_extension("py"));
                let location = if package.is_dir() {
                    package
                } else if module.is_file() {
                    module
                } else {
                    continue;
                };

                let dist_info = dist_info.clone().or_else(|| find_dist_info(site, &import_name));
                return Some(InstalledPackage {
                    location,
                    dist_info,
                });
            }
        }
        None
    }
}

/// An importable package plus its distribution metadata directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub location: PathBuf,
    pub dist_info: Option<PathBuf>,
}

impl InstalledPackage {
    /// `Summary:` header of the dist-info METADATA.
    pub fn summary(&self) -> Option<String> {
        metadata_headers(self.dist_info.as_deref()?, "Summary")
            .into_iter()
            .next()
    }

    /// Distribution names from `Requires-Dist:` headers, extras-only ones excluded.
    pub fn requirements(&self) -> Vec<String> {
        let Some(dist_info) = self.dist_info.as_deref() else {
            return Vec::new();
        };
        metadata_headers(dist_info, "Requires-Dist")
            .into_iter()
            .filter(|req| !req.contains("extra =="))
            .filter_map(|req| parse_requirement(&req).ok().map(|(name, _)| name))
            .collect()
    }
}

fn site_packages_dirs(venv: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(entries) = std::fs::read_dir(venv.join("lib")) {
        let mut pythons: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("python"))
            })
            .map(|p| p.join("site-packages"))
            .filter(|p| p.is_dir())
            .collect();
        pythons.sort();
        dirs.extend(pythons);
    }

    let windows = venv.join("Lib").join("site-packages");
    if windows.is_dir() && !dirs.contains(&windows) {
        dirs.push(windows);
    }
    dirs
}

/// `<dist>-<version>.dist-info` whose distribution matches `name`.
pub fn find_dist_info(site: &Path, name: &str) -> Option<PathBuf> {
    let wanted = candidate_distributions(name);
    let entries = std::fs::read_dir(site).ok()?;
    entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .find(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix(".dist-info"))
                .and_then(|stem| stem.rsplit_once('-'))
                .is_some_and(|(dist, _)| wanted.contains(&normalize(dist)))
        })
}

fn read_top_level(dist_info: &Path) -> Option<String> {
    let content = std::fs::read_to_string(dist_info.join("top_level.txt")).ok()?;
    content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('_'))
        .map(str::to_string)
}

/// Values of `header` in the RFC 822 header block of METADATA.
fn metadata_headers(dist_info: &Path, header: &str) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(dist_info.join("METADATA")) else {
        return Vec::new();
    };
    let prefix = format!("{header}:");
    content
        .lines()
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.strip_prefix(&prefix))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}
