//! Data model shared by every ecosystem engine.
//!
//! All entities are built fresh per request and serialized with camelCase
//! field names. Once a value has been stored in the result cache it is never
//! mutated; cache hits hand out clones of the stored snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ScoutError};

/// Version sentinel used for standard-library records.
pub const STDLIB_VERSION: &str = "stdlib";

/// Version sentinel for dependencies whose version cannot be determined.
pub const LATEST_VERSION: &str = "latest";

/// Package name sentinel for statements that could not be parsed.
pub const UNKNOWN_PACKAGE: &str = "unknown";

/// The five supported target ecosystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EcosystemKind {
    JavaScript,
    Python,
    Rust,
    Go,
    Java,
}

impl EcosystemKind {
    pub const ALL: [Self; 5] = [
        Self::JavaScript,
        Self::Python,
        Self::Rust,
        Self::Go,
        Self::Java,
    ];

    /// Canonical identifier used for registry lookups and cache keys.
    pub const fn id(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Java => "java",
        }
    }

    /// Alternative identifiers accepted from callers.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::JavaScript => &["typescript", "js", "ts", "npm", "node"],
            Self::Python => &["py", "pypi"],
            Self::Rust => &["cargo", "rs"],
            Self::Go => &["golang"],
            Self::Java => &["maven", "jvm"],
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript/TypeScript",
            Self::Python => "Python",
            Self::Rust => "Rust",
            Self::Go => "Go",
            Self::Java => "Java",
        }
    }
}

impl fmt::Display for EcosystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EcosystemKind {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == needle || kind.aliases().contains(&needle.as_str()))
            .ok_or_else(|| ScoutError::UnsupportedEcosystem(s.to_string()))
    }
}

/// Functional category assigned to packages by the relevance scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ui,
    Data,
    Network,
    Testing,
    Build,
    Utility,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Ui,
        Self::Data,
        Self::Network,
        Self::Testing,
        Self::Build,
        Self::Utility,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ui => "ui",
            Self::Data => "data",
            Self::Network => "network",
            Self::Testing => "testing",
            Self::Build => "build",
            Self::Utility => "utility",
        }
    }

    /// Parses a category filter where `"all"` (or an empty string) means no filter.
    pub fn parse_filter(s: &str) -> Result<Option<Self>> {
        let needle = s.trim().to_ascii_lowercase();
        if needle.is_empty() || needle == "all" {
            return Ok(None);
        }
        needle.parse().map(Some)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| ScoutError::InvalidRequest(format!("unknown category: {s}")))
    }
}

/// One declared dependency or one standard-library unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    pub name: String,
    /// Declared version requirement, or [`STDLIB_VERSION`].
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub installed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl PackageRecord {
    pub fn declared(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
            installed: false,
            declared_path: None,
            category: None,
            score: None,
        }
    }

    pub fn stdlib(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: STDLIB_VERSION.to_string(),
            description: Some(description.into()),
            installed: true,
            declared_path: None,
            category: None,
            score: None,
        }
    }

    pub fn is_stdlib(&self) -> bool {
        self.version == STDLIB_VERSION
    }
}

/// Result of validating one import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub valid: bool,
    pub package_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl ValidationOutcome {
    /// Outcome for a statement no extraction pattern recognised.
    pub fn unparseable() -> Self {
        Self {
            valid: false,
            package_name: UNKNOWN_PACKAGE.to_string(),
            resolved_path: None,
            reason: Some("could not parse import statement".to_string()),
            suggestions: None,
        }
    }

    /// A valid outcome. `reason` must be informational only.
    pub fn resolved(
        package_name: impl Into<String>,
        resolved_path: Option<String>,
        reason: Option<String>,
    ) -> Self {
        Self {
            valid: true,
            package_name: package_name.into(),
            resolved_path,
            reason,
            suggestions: None,
        }
    }

    pub fn unresolved(
        package_name: impl Into<String>,
        reason: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            valid: false,
            package_name: package_name.into(),
            resolved_path: None,
            reason: Some(reason.into()),
            suggestions: Some(suggestions),
        }
    }
}

/// Kind of an introspected surface member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Function,
    Class,
    Constant,
    Type,
    Interface,
    Namespace,
}

/// One parameter of a reconstructed call signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub optional: bool,
}

impl ParameterInfo {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, optional: bool) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            optional,
        }
    }
}

/// One member of a module's public surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDescriptor {
    pub name: String,
    pub kind: ExportKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ParameterInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExportDescriptor {
    pub fn new(name: impl Into<String>, kind: ExportKind) -> Self {
        Self {
            name: name.into(),
            kind,
            signature: None,
            parameters: None,
            return_type: None,
            description: None,
        }
    }

    /// A function export with a reconstructed signature.
    pub fn function(
        name: impl Into<String>,
        parameters: Vec<ParameterInfo>,
        return_type: Option<String>,
    ) -> Self {
        let name = name.into();
        let signature = render_signature(&name, &parameters, return_type.as_deref());
        Self {
            name,
            kind: ExportKind::Function,
            signature: Some(signature),
            parameters: Some(parameters),
            return_type,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }
}

/// Renders `name(a: T, b?: U): R` from parsed parts.
pub fn render_signature(name: &str, parameters: &[ParameterInfo], return_type: Option<&str>) -> String {
    let params = parameters
        .iter()
        .map(|p| {
            let marker = if p.optional { "?" } else { "" };
            if p.type_name.is_empty() {
                format!("{}{}", p.name, marker)
            } else {
                format!("{}{}: {}", p.name, marker, p.type_name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    match return_type {
        Some(ret) if !ret.is_empty() => format!("{name}({params}): {ret}"),
        _ => format!("{name}({params})"),
    }
}

/// Introspected description of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    pub name: String,
    /// Empty when the module could not be resolved.
    pub resolved_path: String,
    pub exports: Vec<ExportDescriptor>,
    pub submodules: Vec<String>,
    pub dependencies: Vec<String>,
}

impl ModuleDescriptor {
    /// Descriptor for a module that could not be located. Never partially populated.
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolved_path: String::new(),
            exports: Vec::new(),
            submodules: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.resolved_path.is_empty()
    }
}

/// A batch of discovered packages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryBatch {
    pub packages: Vec<PackageRecord>,
    pub total_found: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    pub ecosystem: EcosystemKind,
    pub produced_at: DateTime<Utc>,
}

/// Input of `discover_packages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverRequest {
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub include_dev_dependencies: bool,
    #[serde(default = "default_discover_max")]
    pub max_results: usize,
}

impl Default for DiscoverRequest {
    fn default() -> Self {
        Self {
            search_term: None,
            include_dev_dependencies: false,
            max_results: default_discover_max(),
        }
    }
}

/// Input of `validate_import`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub import_statement: String,
    #[serde(default)]
    pub project_path: Option<String>,
}

impl ValidateRequest {
    pub fn new(import_statement: impl Into<String>) -> Self {
        Self {
            import_statement: import_statement.into(),
            project_path: None,
        }
    }
}

/// Input of `introspect_module`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectRequest {
    pub module_name: String,
    #[serde(default)]
    pub include_private: bool,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl IntrospectRequest {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            include_private: false,
            max_depth: default_max_depth(),
        }
    }
}

/// Input of `search_affordances`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default = "default_search_max")]
    pub max_results: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: None,
            max_results: default_search_max(),
        }
    }
}

/// Upper bound for `discover_packages.maxResults`.
pub const MAX_DISCOVER_RESULTS: usize = 100;
/// Upper bound for `search_affordances.maxResults`.
pub const MAX_SEARCH_RESULTS: usize = 50;
/// Upper bound for `introspect_module.maxDepth`.
pub const MAX_INTROSPECT_DEPTH: usize = 5;

const fn default_discover_max() -> usize {
    50
}

const fn default_search_max() -> usize {
    10
}

const fn default_max_depth() -> usize {
    2
}
