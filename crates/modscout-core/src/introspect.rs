//! Building blocks shared by the per-ecosystem export introspectors.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::{ExportDescriptor, ExportKind};

/// Maximum number of sibling source files reported as submodules.
pub const MAX_SUBMODULES: usize = 10;

/// An installed module located on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Name as requested by the caller.
    pub name: String,
    /// Package or module root directory (or archive).
    pub root: PathBuf,
    /// Entry source file parsed by the structural tier, if one exists.
    pub entry: Option<PathBuf>,
    /// Summary taken from the installed package's own metadata.
    pub description: Option<String>,
}

impl ResolvedModule {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            entry: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_entry(mut self, entry: impl Into<PathBuf>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }

    /// Path reported as `resolvedPath`: the entry when known, else the root.
    pub fn display_path(&self) -> String {
        self.entry
            .as_deref()
            .unwrap_or(&self.root)
            .to_string_lossy()
            .into_owned()
    }
}

/// Output of the structural tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuralScan {
    pub exports: Vec<ExportDescriptor>,
    /// Import, require and re-export targets, deduplicated in source order.
    pub imports: Vec<String>,
}

impl StructuralScan {
    pub fn push_export(&mut self, export: ExportDescriptor) {
        if !self.exports.iter().any(|e| e.name == export.name) {
            self.exports.push(export);
        }
    }

    pub fn push_import(&mut self, target: impl Into<String>) {
        let target = target.into();
        if !target.is_empty() && !self.imports.contains(&target) {
            self.imports.push(target);
        }
    }

    /// Folds another scan in, keeping first-seen order.
    pub fn merge(&mut self, other: Self) {
        for export in other.exports {
            self.push_export(export);
        }
        for import in other.imports {
            self.push_import(import);
        }
    }
}

/// Shape of a binding observed by loading a module in its runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeShape {
    Callable,
    Class,
    /// A plain object, dict-like value or nested module.
    Object,
    #[serde(other)]
    Other,
}

impl RuntimeShape {
    /// Conservative mapping to an export kind; anything ambiguous is a constant.
    pub const fn export_kind(self) -> ExportKind {
        match self {
            Self::Callable => ExportKind::Function,
            Self::Class => ExportKind::Class,
            Self::Object => ExportKind::Namespace,
            Self::Other => ExportKind::Constant,
        }
    }
}

/// One binding reported by a runtime probe script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuntimeBinding {
    pub name: String,
    pub shape: RuntimeShape,
    #[serde(default)]
    pub signature: Option<String>,
}

impl RuntimeBinding {
    pub fn into_export(self) -> ExportDescriptor {
        let mut export = ExportDescriptor::new(self.name, self.shape.export_kind());
        export.signature = self.signature.filter(|s| !s.is_empty());
        export
    }
}

/// Parses a probe's JSON stdout (`[{"name","shape"}]`), tolerating garbage.
pub fn parse_runtime_bindings(stdout: &str) -> Vec<RuntimeBinding> {
    match serde_json::from_str::<Vec<RuntimeBinding>>(stdout) {
        Ok(bindings) => bindings,
        Err(e) => {
            tracing::debug!("unreadable runtime probe output: {e}");
            Vec::new()
        }
    }
}

/// Synthetic export describing a standard-library unit.
pub fn stdlib_export(name: &str, description: &str) -> ExportDescriptor {
    ExportDescriptor::new(name, ExportKind::Namespace).with_description(description)
}

/// Drops private exports unless asked to keep them.
pub fn retain_visible(
    exports: &mut Vec<ExportDescriptor>,
    include_private: bool,
    is_private: impl Fn(&str) -> bool,
) {
    if !include_private {
        exports.retain(|e| !is_private(&e.name));
    }
}

/// Underscore-prefixed names are private in most ecosystems.
pub fn underscore_private(name: &str) -> bool {
    name.starts_with('_')
}

/// Up to [`MAX_SUBMODULES`] source files next to `entry`, excluding it.
///
/// Returned as file stems, sorted for stable output.
pub fn sibling_sources(dir: &Path, entry: Option<&Path>, extensions: &[&str]) -> Vec<String> {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = read_dir
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| entry != Some(p.as_path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| extensions.iter().any(|ext| n.ends_with(ext)))
        })
        .filter_map(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| strip_extension(n, extensions).to_string())
        })
        .collect();

    names.sort();
    names.dedup();
    names.truncate(MAX_SUBMODULES);
    names
}

fn strip_extension<'a>(file_name: &'a str, extensions: &[&str]) -> &'a str {
    extensions
        .iter()
        .filter(|ext| file_name.ends_with(*ext))
        .max_by_key(|ext| ext.len())
        .map_or(file_name, |ext| &file_name[..file_name.len() - ext.len()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_runtime_shape_mapping() {
        assert_eq!(RuntimeShape::Callable.export_kind(), ExportKind::Function);
        assert_eq!(RuntimeShape::Class.export_kind(), ExportKind::Class);
        assert_eq!(RuntimeShape::Object.export_kind(), ExportKind::Namespace);
        assert_eq!(RuntimeShape::Other.export_kind(), ExportKind::Constant);
    }

    #[test]
    fn test_parse_runtime_bindings() {
        let out = r#"[{"name":"get","shape":"callable"},{"name":"VERSION","shape":"string"}]"#;
        let bindings = parse_runtime_bindings(out);
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[1].shape, RuntimeShape::Other);
        assert!(parse_runtime_bindings("Traceback (most recent call last)").is_empty());
    }

    #[test]
    fn test_structural_scan_dedup() {
        let mut scan = StructuralScan::default();
        scan.push_import("react");
        scan.push_import("react");
        scan.push_export(ExportDescriptor::new("a", ExportKind::Constant));
        scan.push_export(ExportDescriptor::new("a", ExportKind::Function));
        assert_eq!(scan.imports, vec!["react"]);
        assert_eq!(scan.exports.len(), 1);
        assert_eq!(scan.exports[0].kind, ExportKind::Constant);
    }

    #[test]
    fn test_retain_visible() {
        let mut exports = vec![
            ExportDescriptor::new("public", ExportKind::Function),
            ExportDescriptor::new("_hidden", ExportKind::Function),
        ];
        retain_visible(&mut exports, true, underscore_private);
        assert_eq!(exports.len(), 2);
        retain_visible(&mut exports, false, underscore_private);
        assert_eq!(exports.len(), 1);
    }

    #[test]
    fn test_sibling_sources() {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("index.js");
        fs::write(&entry, "").unwrap();
        fs::write(dir.path().join("utils.js"), "").unwrap();
        fs::write(dir.path().join("types.d.ts"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();

        let found = sibling_sources(dir.path(), Some(&entry), &[".js", ".ts", ".d.ts"]);
        assert_eq!(found, vec!["types", "utils"]);
    }

    #[test]
    fn test_sibling_sources_capped() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..15 {
            fs::write(dir.path().join(format!("m{i:02}.py")), "").unwrap();
        }
        assert_eq!(sibling_sources(dir.path(), None, &[".py"]).len(), MAX_SUBMODULES);
    }
}
