//! Python manifest parsing.
//!
//! Supports pyproject.toml in several layouts:
//! - PEP 621: `[project.dependencies]`, `[project.optional-dependencies]`
//! - PEP 735: `[dependency-groups]`
//! - Poetry: `[tool.poetry.dependencies]`, `[tool.poetry.group.*.dependencies]`
//!
//! and line-oriented requirements.txt files.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use modscout_core::ManifestDependencies;
use modscout_core::manifest::version_or_latest;
use once_cell::sync::Lazy;
use pep508_rs::{Requirement, VersionOrUrl};
use regex::Regex;
use toml_edit::{DocumentMut, Item, Table, TableLike};

use crate::error::{PypiError, Result};

/// Name and remaining specifier of a requirement line pep508 rejects.
static LOOSE_REQUIREMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9_\-\.]*)\s*(?:\[[^\]]*\])?\s*([^;#]*)")
        .expect("valid requirement regex")
});

/// Parses pyproject.toml content.
///
/// Runtime requirements (`project.dependencies`, Poetry dependencies) become
/// regular dependencies; optional-dependency extras, PEP 735 groups and
/// Poetry groups become dev dependencies. Poetry's `python` entry is skipped.
///
/// # Examples
///
/// ```
/// use modscout_pypi::parser::parse_pyproject;
///
/// let toml = r#"
/// [project]
/// dependencies = ["requests>=2.28", "flask"]
///
/// [project.optional-dependencies]
/// test = ["pytest>=7"]
/// "#;
///
/// let deps = parse_pyproject(toml).unwrap();
/// assert_eq!(deps.dependencies["requests"], ">=2.28");
/// assert_eq!(deps.dependencies["flask"], "latest");
/// assert_eq!(deps.dev_dependencies["pytest"], ">=7");
/// ```
pub fn parse_pyproject(content: &str) -> Result<ManifestDependencies> {
    let doc = content
        .parse::<DocumentMut>()
        .map_err(|e| PypiError::TomlParseError { source: e })?;

    let mut deps = ManifestDependencies::default();

    if let Some(project) = doc.get("project").and_then(Item::as_table) {
        if let Some(array) = project.get("dependencies").and_then(Item::as_array) {
            collect_pep508(array.iter().filter_map(|v| v.as_str()), &mut deps.dependencies);
        }
        if let Some(extras) = project
            .get("optional-dependencies")
            .and_then(Item::as_table_like)
        {
            collect_groups(extras, &mut deps.dev_dependencies);
        }
    }

    if let Some(groups) = doc.get("dependency-groups").and_then(Item::as_table_like) {
        collect_groups(groups, &mut deps.dev_dependencies);
    }

    if let Some(tool) = doc.get("tool").and_then(Item::as_table)
        && let Some(poetry) = tool.get("poetry").and_then(Item::as_table)
    {
        collect_poetry(poetry, &mut deps);
    }

    Ok(deps)
}

/// Arrays of PEP 508 strings keyed by group name. Non-string entries such as
/// PEP 735 `{include-group = "..."}` tables are skipped.
fn collect_groups(groups: &dyn TableLike, target: &mut BTreeMap<String, String>) {
    for (_, group) in groups.iter() {
        if let Some(array) = group.as_array() {
            collect_pep508(array.iter().filter_map(|v| v.as_str()), target);
        }
    }
}

fn collect_pep508<'a>(
    requirements: impl Iterator<Item = &'a str>,
    target: &mut BTreeMap<String, String>,
) {
    for requirement in requirements {
        match parse_requirement(requirement) {
            Ok((name, version)) => {
                target.insert(name, version);
            }
            Err(e) => tracing::warn!("Failed to parse dependency '{}': {}", requirement, e),
        }
    }
}

fn collect_poetry(poetry: &Table, deps: &mut ManifestDependencies) {
    if let Some(table) = poetry.get("dependencies").and_then(Item::as_table_like) {
        collect_poetry_table(table, &mut deps.dependencies);
    }

    // pre-1.2 layout
    if let Some(table) = poetry.get("dev-dependencies").and_then(Item::as_table_like) {
        collect_poetry_table(table, &mut deps.dev_dependencies);
    }

    if let Some(groups) = poetry.get("group").and_then(Item::as_table_like) {
        for (_, group) in groups.iter() {
            if let Some(table) = group
                .as_table_like()
                .and_then(|g| g.get("dependencies"))
                .and_then(Item::as_table_like)
            {
                collect_poetry_table(table, &mut deps.dev_dependencies);
            }
        }
    }
}

/// `name = "^1.0"` or `name = { version = "^1.0", extras = [...] }`
fn collect_poetry_table(table: &dyn TableLike, target: &mut BTreeMap<String, String>) {
    for (name, value) in table.iter() {
        if name == "python" {
            continue;
        }
        let version = value.as_str().or_else(|| {
            value
                .as_table_like()
                .and_then(|t| t.get("version"))
                .and_then(Item::as_str)
        });
        target.insert(name.to_string(), version_or_latest(version));
    }
}

/// Parses one PEP 508 requirement into `(name, version specifier)`.
///
/// URL requirements and bare names get `"latest"`. The name keeps the
/// spelling written in the requirement; pep508 only validates it.
pub fn parse_requirement(requirement: &str) -> Result<(String, String)> {
    let requirement = requirement.trim();
    let parsed: Requirement = Requirement::from_str(requirement)?;
    let version = match parsed.version_or_url {
        Some(VersionOrUrl::VersionSpecifier(specs)) => Some(specs.to_string()),
        Some(VersionOrUrl::Url(_)) | None => None,
    };
    let name = declared_name(requirement).unwrap_or_else(|| parsed.name.to_string());
    Ok((name, version_or_latest(version.as_deref())))
}

/// Leading distribution name of a requirement, as written.
fn declared_name(requirement: &str) -> Option<String> {
    let end = requirement
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        .unwrap_or(requirement.len());
    let name = requirement[..end].trim_end_matches(['.', '_', '-']);
    (!name.is_empty()).then(|| name.to_string())
}

/// Parses requirements.txt content.
///
/// One requirement per line; comments, blank lines, options (`-r`, `-e`,
/// `--index-url`, ...) and bare URLs are skipped. Lines pep508 rejects fall
/// back to a loose `name specifier` match.
pub fn parse_requirements(content: &str) -> ManifestDependencies {
    let mut deps = ManifestDependencies::default();

    for raw in content.lines() {
        let line = strip_comment(raw).trim();
        let bare_url = line.contains("://") && !line.contains('@');
        if line.is_empty() || line.starts_with('-') || bare_url {
            continue;
        }

        match parse_requirement(line) {
            Ok((name, version)) => {
                deps.dependencies.insert(name, version);
            }
            Err(_) => {
                if let Some(caps) = LOOSE_REQUIREMENT.captures(line) {
                    let name = caps[1].to_string();
                    let spec = caps.get(2).map(|m| m.as_str().trim());
                    deps.dependencies
                        .insert(name, version_or_latest(spec.filter(|s| !s.is_empty())));
                } else {
                    tracing::debug!("skipping requirement line '{}'", line);
                }
            }
        }
    }

    deps
}

/// Drops a trailing `# comment`; `#` inside a URL fragment is kept.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    match line.find(" #") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Reads and parses a Python manifest by file name, logging and returning
/// empty maps on failure.
pub fn load_dependencies(path: &Path) -> ManifestDependencies {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("cannot read {}: {}", path.display(), e);
            return ManifestDependencies::default();
        }
    };

    let is_pyproject = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".toml"));

    if !is_pyproject {
        return parse_requirements(&content);
    }

    match parse_pyproject(&content) {
        Ok(deps) => deps,
        Err(e) => {
            tracing::warn!("ignoring malformed {}: {}", path.display(), e);
            ManifestDependencies::default()
        }
    }
}
