//! package.json parsing.
//!
//! Two views of the same file: the dependency sections of a project manifest,
//! and the module metadata (entry points, `exports` map, description) of an
//! installed package.

use crate::error::{NpmError, Result};
use modscout_core::ManifestDependencies;
use modscout_core::manifest::version_or_latest;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Sections whose entries become regular dependencies.
const RUNTIME_SECTIONS: &[&str] = &["dependencies", "peerDependencies", "optionalDependencies"];

/// Sections whose entries become dev dependencies.
const DEV_SECTIONS: &[&str] = &["devDependencies"];

/// Extensions tried, in order, when a package entry omits one.
const ENTRY_EXTENSIONS: &[&str] = &[".d.ts", ".ts", ".js", ".mjs", ".cjs", ".mts", ".cts"];

/// Parses the dependency sections of a package.json file.
///
/// Handles all dependency sections:
/// - `dependencies`, `peerDependencies`, `optionalDependencies` (regular)
/// - `devDependencies` (dev)
///
/// Non-string version values are normalized through their nested `version`
/// field, or `"latest"`.
///
/// # Errors
///
/// Returns an error if the content is not JSON or not a JSON object.
///
/// # Examples
///
/// ```
/// use modscout_npm::parser::parse_package_json;
///
/// let json = r#"{
///   "dependencies": { "express": "^4.18.2" },
///   "devDependencies": { "vitest": "^1.0.0" }
/// }"#;
///
/// let deps = parse_package_json(json).unwrap();
/// assert_eq!(deps.dependencies["express"], "^4.18.2");
/// assert_eq!(deps.dev_dependencies["vitest"], "^1.0.0");
/// ```
pub fn parse_package_json(content: &str) -> Result<ManifestDependencies> {
    let mut deps = ManifestDependencies::default();
    if content.trim().is_empty() {
        return Ok(deps);
    }

    let root: Value =
        serde_json::from_str(content).map_err(|e| NpmError::JsonParseError { source: e })?;
    let Value::Object(root) = root else {
        return Err(NpmError::invalid_structure("root is not an object"));
    };

    for section in RUNTIME_SECTIONS {
        collect_section(root.get(*section), &mut deps.dependencies);
    }
    for section in DEV_SECTIONS {
        collect_section(root.get(*section), &mut deps.dev_dependencies);
    }

    Ok(deps)
}

fn collect_section(
    section: Option<&Value>,
    target: &mut std::collections::BTreeMap<String, String>,
) {
    let Some(Value::Object(entries)) = section else {
        return;
    };

    for (name, value) in entries {
        if name.is_empty() {
            continue;
        }
        let version = match value {
            Value::String(s) => Some(s.as_str()),
            Value::Object(table) => table.get("version").and_then(Value::as_str),
            _ => None,
        };
        target.insert(name.clone(), version_or_latest(version));
    }
}

/// Reads and parses a package.json, logging and returning empty maps on failure.
pub fn load_dependencies(path: &Path) -> ManifestDependencies {
    let result = std::fs::read_to_string(path)
        .map_err(NpmError::from)
        .and_then(|content| parse_package_json(&content));

    match result {
        Ok(deps) => deps,
        Err(e) => {
            tracing::warn!("ignoring malformed {}: {}", path.display(), e);
            ManifestDependencies::default()
        }
    }
}

/// Metadata of an installed package, read from its own package.json.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageMeta {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub types: Option<String>,
    pub module: Option<String>,
    pub main: Option<String>,
    pub exports: Option<Value>,
    pub dependencies: Vec<String>,
}

impl PackageMeta {
    /// # Errors
    ///
    /// Returns an error if the content is not a JSON object.
    pub fn parse(content: &str) -> Result<Self> {
        let root: Value =
            serde_json::from_str(content).map_err(|e| NpmError::JsonParseError { source: e })?;
        let Value::Object(root) = root else {
            return Err(NpmError::invalid_structure("root is not an object"));
        };

        let string = |key: &str| {
            root.get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .filter(|s| !s.is_empty())
        };

        let dependencies = RUNTIME_SECTIONS
            .iter()
            .filter_map(|section| root.get(*section).and_then(Value::as_object))
            .flat_map(|entries| entries.keys().cloned())
            .collect();

        Ok(Self {
            name: string("name"),
            version: string("version"),
            description: string("description"),
            types: string("types").or_else(|| string("typings")),
            module: string("module"),
            main: string("main"),
            exports: root.get("exports").cloned(),
            dependencies,
        })
    }

    /// Reads `<dir>/package.json`. Returns `None` when absent or malformed.
    pub fn load(dir: &Path) -> Option<Self> {
        let path = dir.join("package.json");
        let content = std::fs::read_to_string(&path).ok()?;
        match Self::parse(&content) {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::debug!("unreadable {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Resolves the entry file used for structural introspection.
    ///
    /// Order: `types`/`typings`, `module`, `main`, the `"."` export, then
    /// `index.*` in the package root.
    pub fn entry_file(&self, package_dir: &Path) -> Option<PathBuf> {
        let declared = [
            self.types.as_deref(),
            self.module.as_deref(),
            self.main.as_deref(),
        ];
        let from_exports = self.exports.as_ref().and_then(root_export_target);

        declared
            .into_iter()
            .flatten()
            .chain(from_exports.as_deref())
            .find_map(|relative| resolve_relative_file(package_dir, relative))
            .or_else(|| resolve_relative_file(package_dir, "index"))
    }

    /// Subpaths declared in the `exports` map.
    pub fn export_subpaths(&self) -> Vec<String> {
        self.exports.as_ref().map(export_subpaths).unwrap_or_default()
    }
}

/// Subpaths declared by an `exports` value.
///
/// A string, array or conditions-only object exports just `"."`.
pub fn export_subpaths(exports: &Value) -> Vec<String> {
    match exports {
        Value::Object(map) if map.keys().any(|k| k.starts_with('.')) => map
            .keys()
            .filter(|k| k.starts_with('.'))
            .cloned()
            .collect(),
        Value::Null => Vec::new(),
        _ => vec![".".to_string()],
    }
}

/// File target of the `"."` export, preferring type declarations.
fn root_export_target(exports: &Value) -> Option<String> {
    match exports {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(root_export_target),
        Value::Object(map) => {
            if let Some(root) = map.get(".") {
                return root_export_target(root);
            }
            ["types", "import", "module", "default", "require", "node"]
                .iter()
                .find_map(|condition| map.get(*condition).and_then(root_export_target))
        }
        _ => None,
    }
}

/// Resolves `relative` against `dir` the way Node's loader probes files.
pub fn resolve_relative_file(dir: &Path, relative: &str) -> Option<PathBuf> {
    let base = dir.join(relative.trim_start_matches("./"));
    if base.is_file() {
        return Some(base);
    }

    let with_extension = ENTRY_EXTENSIONS.iter().find_map(|ext| {
        let mut candidate = base.clone().into_os_string();
        candidate.push(ext);
        let candidate = PathBuf::from(candidate);
        candidate.is_file().then_some(candidate)
    });
    if with_extension.is_some() {
        return with_extension;
    }

    if base.is_dir() {
        return ENTRY_EXTENSIONS
            .iter()
            .map(|ext| base.join(format!("index{ext}")))
            .find(|candidate| candidate.is_file());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_all_sections() {
        let json = r#"{
            "dependencies": {"react": "^18.2.0"},
            "peerDependencies": {"react-dom": "^18.0.0"},
            "optionalDependencies": {"fsevents": "^2.3.0"},
            "devDependencies": {"typescript": "^5.3.0"}
        }"#;

        let deps = parse_package_json(json).unwrap();
        assert_eq!(deps.dependencies.len(), 3);
        assert_eq!(deps.dev_dependencies.len(), 1);
        assert!(deps.dependencies.contains_key("fsevents"));
    }

    #[test]
    fn test_parse_empty_content() {
        assert!(parse_package_json("").unwrap().is_empty());
        assert!(parse_package_json("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_package_json("{invalid json}").is_err());
        assert!(parse_package_json("[1, 2]").is_err());
    }

    #[test]
    fn test_structured_versions() {
        let json = r#"{"dependencies": {
            "a": {"version": "1.2.3"},
            "b": {"path": "../b"},
            "c": 42
        }}"#;
        let deps = parse_package_json(json).unwrap();
        assert_eq!(deps.dependencies["a"], "1.2.3");
        assert_eq!(deps.dependencies["b"], "latest");
        assert_eq!(deps.dependencies["c"], "latest");
    }

    #[test]
    fn test_non_object_section_ignored() {
        let deps = parse_package_json(r#"{"dependencies": ["react"]}"#).unwrap();
        assert!(deps.is_empty());
    }

    #[test]
    fn test_load_dependencies_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_dependencies(&path).is_empty());
    }

    #[test]
    fn test_export_subpaths() {
        let exports: Value = serde_json::json!({
            ".": {"import": "./index.mjs", "require": "./index.cjs"},
            "./server": "./server.js",
            "./package.json": "./package.json"
        });
        assert_eq!(export_subpaths(&exports), vec![".", "./package.json", "./server"]);

        let conditions: Value = serde_json::json!({"import": "./a.mjs", "default": "./a.js"});
        assert_eq!(export_subpaths(&conditions), vec!["."]);
        assert_eq!(export_subpaths(&Value::String("./x.js".into())), vec!["."]);
    }

    #[test]
    fn test_entry_prefers_types() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.js"), "").unwrap();
        fs::create_dir_all(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist/index.d.ts"), "").unwrap();

        let meta = PackageMeta::parse(
            r#"{"name":"pkg","main":"./index.js","types":"./dist/index.d.ts"}"#,
        )
        .unwrap();
        assert_eq!(meta.entry_file(dir.path()).unwrap(), dir.path().join("dist/index.d.ts"));
    }

    #[test]
    fn test_entry_from_exports_and_extensionless() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/main.mjs"), "").unwrap();

        let meta = PackageMeta::parse(r#"{"exports": {".": {"import": "./lib/main"}}}"#).unwrap();
        assert_eq!(meta.entry_file(dir.path()).unwrap(), dir.path().join("lib/main.mjs"));
    }

    #[test]
    fn test_entry_falls_back_to_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.js"), "").unwrap();
        let meta = PackageMeta::default();
        assert_eq!(meta.entry_file(dir.path()).unwrap(), dir.path().join("index.js"));
    }

    #[test]
    fn test_meta_fields() {
        let meta = PackageMeta::parse(
            r#"{"name":"axios","version":"1.6.0","description":"Promise based HTTP client",
                "typings":"index.d.ts","dependencies":{"follow-redirects":"^1.15.0"}}"#,
        )
        .unwrap();
        assert_eq!(meta.description.as_deref(), Some("Promise based HTTP client"));
        assert_eq!(meta.types.as_deref(), Some("index.d.ts"));
        assert_eq!(meta.dependencies, vec!["follow-redirects"]);
    }
}
