//! pom.xml parsing.
//!
//! Dependencies are read from `<dependencies>` and
//! `<dependencyManagement><dependencies>`. `${property}` references are
//! resolved from `<properties>` and the project's own coordinates.

use std::collections::BTreeMap;
use std::path::Path;

use modscout_core::ManifestDependencies;
use modscout_core::manifest::version_or_latest;

use crate::error::Result;
use crate::xml::{Node, is_path, walk};

const TEST_SCOPE: &str = "test";

/// One `<dependency>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
}

impl PomDependency {
    /// `groupId:artifactId`, or the bare artifactId when no group is given.
    pub fn coordinate(&self) -> String {
        if self.group_id.is_empty() {
            self.artifact_id.clone()
        } else {
            format!("{}:{}", self.group_id, self.artifact_id)
        }
    }

    pub fn is_test(&self) -> bool {
        self.scope.as_deref() == Some(TEST_SCOPE)
    }
}

/// Parsed contents of a pom.xml.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pom {
    /// Own groupId, inherited from `<parent>` when absent
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    /// Own version, inherited from `<parent>` when absent
    pub version: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    /// Entries of `<dependencyManagement>`
    pub managed: Vec<PomDependency>,
}

impl Pom {
    /// Declared dependencies; test-scoped ones are dev dependencies.
    ///
    /// Managed entries are listed too. A `<dependencies>` entry without a
    /// version takes the managed version of the same coordinate.
    pub fn to_dependencies(&self) -> ManifestDependencies {
        let mut deps = ManifestDependencies::default();

        for dep in &self.managed {
            let target = if dep.is_test() {
                &mut deps.dev_dependencies
            } else {
                &mut deps.dependencies
            };
            target.insert(dep.coordinate(), version_or_latest(dep.version.as_deref()));
        }

        for dep in &self.dependencies {
            let coordinate = dep.coordinate();
            let version = dep.version.as_deref().or_else(|| self.managed_version(&coordinate));
            let version = version_or_latest(version);
            if dep.is_test() {
                deps.dependencies.remove(&coordinate);
                deps.dev_dependencies.insert(coordinate, version);
            } else {
                deps.dev_dependencies.remove(&coordinate);
                deps.dependencies.insert(coordinate, version);
            }
        }
        deps
    }

    fn managed_version(&self, coordinate: &str) -> Option<&str> {
        self.managed
            .iter()
            .find(|m| m.coordinate() == coordinate)
            .and_then(|m| m.version.as_deref())
    }

    /// Coordinates of non-test, non-optional dependencies.
    pub fn runtime_coordinates(&self) -> Vec<String> {
        self.dependencies
            .iter()
            .filter(|d| !d.is_test() && !d.optional)
            .map(PomDependency::coordinate)
            .collect()
    }

    /// Expands `${name}` references. Unknown properties are left as written.
    pub fn resolve(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let Some(len) = rest[start + 2..].find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };
            let key = &rest[start + 2..start + 2 + len];
            match self.property(key) {
                Some(resolved) => out.push_str(resolved),
                None => out.push_str(&rest[start..start + 3 + len]),
            }
            rest = &rest[start + 3 + len..];
        }
        out.push_str(rest);
        out
    }

    fn property(&self, key: &str) -> Option<&str> {
        match key {
            "project.version" | "pom.version" | "version" => self.version.as_deref(),
            "project.groupId" | "pom.groupId" => self.group_id.as_deref(),
            "project.artifactId" | "pom.artifactId" => self.artifact_id.as_deref(),
            _ => self.properties.get(key).map(String::as_str),
        }
    }
}

const DEPENDENCY: &[&str] = &["project", "dependencies", "dependency"];
const MANAGED_DEPENDENCY: &[&str] = &[
    "project",
    "dependencyManagement",
    "dependencies",
    "dependency",
];

/// Parses pom.xml content.
///
/// # Examples
///
/// ```
/// use modscout_maven::parser::parse_pom;
///
/// let pom = parse_pom(r#"
/// <project>
///   <properties><guava.version>33.0.0-jre</guava.version></properties>
///   <dependencies>
///     <dependency>
///       <groupId>com.google.guava</groupId>
///       <artifactId>guava</artifactId>
///       <version>${guava.version}</version>
///     </dependency>
///   </dependencies>
/// </project>
/// "#).unwrap();
/// assert_eq!(pom.to_dependencies().dependencies["com.google.guava:guava"], "33.0.0-jre");
/// ```
pub fn parse_pom(content: &str) -> Result<Pom> {
    let mut pom = Pom::default();
    let mut parent_group = None;
    let mut parent_version = None;
    let mut current = PomDependency::default();

    walk(content, |node| match node {
        Node::Text { path, text } => {
            let depth = path.len();
            if is_dependency_field(path) {
                set_dependency_field(&mut current, &path[depth - 1], text);
                return;
            }
            let segments: Vec<&str> = path.iter().map(String::as_str).collect();
            match segments.as_slice() {
                ["project", "groupId"] => pom.group_id = Some(text),
                ["project", "artifactId"] => pom.artifact_id = Some(text),
                ["project", "version"] => pom.version = Some(text),
                ["project", "name"] => pom.name = Some(text),
                ["project", "description"] => pom.description = Some(text),
                ["project", "parent", "groupId"] => parent_group = Some(text),
                ["project", "parent", "version"] => parent_version = Some(text),
                ["project", "properties", key] => {
                    pom.properties.insert((*key).to_string(), text);
                }
                _ => {}
            }
        }
        Node::Close { path } => {
            if is_path(path, DEPENDENCY) {
                let dep = std::mem::take(&mut current);
                if !dep.artifact_id.is_empty() {
                    pom.dependencies.push(dep);
                }
            } else if is_path(path, MANAGED_DEPENDENCY) {
                let dep = std::mem::take(&mut current);
                if !dep.artifact_id.is_empty() {
                    pom.managed.push(dep);
                }
            }
        }
    })?;

    if pom.group_id.is_none() {
        pom.group_id = parent_group;
    }
    if pom.version.is_none() {
        pom.version = parent_version;
    }
    resolve_properties(&mut pom);

    tracing::debug!(
        dependencies = pom.dependencies.len(),
        managed = pom.managed.len(),
        "parsed pom.xml"
    );
    Ok(pom)
}

fn is_dependency_field(path: &[String]) -> bool {
    path.split_last().is_some_and(|(_, parent)| {
        is_path(parent, DEPENDENCY) || is_path(parent, MANAGED_DEPENDENCY)
    })
}

fn set_dependency_field(dep: &mut PomDependency, field: &str, text: String) {
    match field {
        "groupId" => dep.group_id = text,
        "artifactId" => dep.artifact_id = text,
        "version" => dep.version = Some(text),
        "scope" => dep.scope = Some(text),
        "optional" => dep.optional = text == "true",
        _ => {}
    }
}

fn resolve_properties(pom: &mut Pom) {
    let resolved: Vec<(String, String)> = pom
        .properties
        .iter()
        .map(|(key, value)| (key.clone(), pom.resolve(value)))
        .collect();
    pom.properties.extend(resolved);

    let snapshot = pom.clone();
    for dep in pom.dependencies.iter_mut().chain(pom.managed.iter_mut()) {
        dep.group_id = snapshot.resolve(&dep.group_id);
        if let Some(version) = dep.version.as_mut() {
            *version = snapshot.resolve(version);
        }
    }
}

/// Reads and parses a pom.xml, logging and returning `None` on failure.
pub fn load_pom(path: &Path) -> Option<Pom> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("cannot read {}: {}", path.display(), e);
            return None;
        }
    };
    match parse_pom(&content) {
        Ok(pom) => Some(pom),
        Err(e) => {
            tracing::warn!("ignoring malformed {}: {}", path.display(), e);
            None
        }
    }
}

pub fn load_dependencies(path: &Path) -> ManifestDependencies {
    load_pom(path)
        .map(|pom| pom.to_dependencies())
        .unwrap_or_default()
}
