//! go.mod parser.
//!
//! Line-oriented parsing of the `module`, `go`, `require` and `replace`
//! directives, each either single-line or as a parenthesised block.
//! `// indirect` requirements are kept.

use std::path::Path;

use modscout_core::ManifestDependencies;
use once_cell::sync::Lazy;
use regex::Regex;

static MODULE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^module\s+(\S+)").expect("valid module regex"));
static GO_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^go\s+(\S+)").expect("valid go regex"));
static BLOCK_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(require|replace|exclude|retract)\s*\($").expect("valid block regex"));
static SINGLE_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(require|replace|exclude|retract)\s+(.+)$").expect("valid directive regex")
});

/// One `require` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoRequire {
    pub module_path: String,
    pub version: String,
    pub indirect: bool,
}

/// One `replace` entry: `old [v] => new [v]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoReplace {
    pub module_path: String,
    pub version: Option<String>,
    pub replacement: String,
    pub replacement_version: Option<String>,
}

impl GoReplace {
    /// Local directory replacements start with `./`, `../` or `/`.
    pub fn is_local(&self) -> bool {
        self.replacement.starts_with("./")
            || self.replacement.starts_with("../")
            || self.replacement.starts_with('/')
    }
}

/// Parsed contents of a go.mod file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoMod {
    /// Module path declared by the `module` directive
    pub module_path: Option<String>,
    /// Minimum Go version from the `go` directive
    pub go_version: Option<String>,
    pub requires: Vec<GoRequire>,
    pub replaces: Vec<GoReplace>,
}

impl GoMod {
    /// Requirements as dependency maps. Go has no dev dependencies.
    pub fn to_dependencies(&self) -> ManifestDependencies {
        let mut deps = ManifestDependencies::default();
        for require in &self.requires {
            deps.dependencies
                .insert(require.module_path.clone(), require.version.clone());
        }
        deps
    }

    /// Replacement for `module_path`, preferring a version-specific one.
    pub fn replacement_for(&self, module_path: &str, version: Option<&str>) -> Option<&GoReplace> {
        let candidates = self.replaces.iter().filter(|r| r.module_path == module_path);
        let mut fallback = None;
        for replace in candidates {
            match replace.version.as_deref() {
                Some(v) if Some(v) == version => return Some(replace),
                None => fallback = Some(replace),
                Some(_) => {}
            }
        }
        fallback
    }

    /// Declared module owning import path `path`: the longest module path
    /// equal to `path` or a `/`-prefix of it.
    pub fn owning_require(&self, path: &str) -> Option<&GoRequire> {
        self.requires
            .iter()
            .filter(|r| is_path_prefix(&r.module_path, path))
            .max_by_key(|r| r.module_path.len())
    }
}

/// `prefix` equals `path` or is followed by `/` in it.
pub fn is_path_prefix(prefix: &str, path: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Parses go.mod content. Unknown directives and malformed lines are skipped.
///
/// # Examples
///
/// ```
/// use modscout_go::parser::parse_go_mod;
///
/// let gomod = parse_go_mod(r#"
/// module example.com/app
///
/// go 1.22
///
/// require (
///     github.com/gin-gonic/gin v1.9.1
///     golang.org/x/sync v0.7.0 // indirect
/// )
/// "#);
/// assert_eq!(gomod.module_path.as_deref(), Some("example.com/app"));
/// assert_eq!(gomod.requires.len(), 2);
/// assert!(gomod.requires[1].indirect);
/// ```
pub fn parse_go_mod(content: &str) -> GoMod {
    let mut gomod = GoMod::default();
    let mut block: Option<String> = None;

    for line in content.lines() {
        let indirect = line.contains("// indirect");
        let trimmed = strip_line_comment(line).trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(directive) = &block {
            if trimmed == ")" {
                block = None;
            } else {
                apply_directive(&mut gomod, directive, trimmed, indirect);
            }
            continue;
        }

        if let Some(caps) = BLOCK_START.captures(trimmed) {
            block = Some(caps[1].to_string());
        } else if let Some(caps) = MODULE_PATTERN.captures(trimmed) {
            gomod.module_path = Some(unquote(&caps[1]).to_string());
        } else if let Some(caps) = GO_PATTERN.captures(trimmed) {
            gomod.go_version = Some(caps[1].to_string());
        } else if let Some(caps) = SINGLE_DIRECTIVE.captures(trimmed) {
            apply_directive(&mut gomod, &caps[1], caps[2].trim(), indirect);
        }
    }

    tracing::debug!(
        requires = gomod.requires.len(),
        module = ?gomod.module_path,
        "parsed go.mod"
    );
    gomod
}

fn apply_directive(gomod: &mut GoMod, directive: &str, body: &str, indirect: bool) {
    match directive {
        "require" => {
            let mut parts = body.split_whitespace();
            if let (Some(path), Some(version)) = (parts.next(), parts.next()) {
                gomod.requires.push(GoRequire {
                    module_path: unquote(path).to_string(),
                    version: version.to_string(),
                    indirect,
                });
            }
        }
        "replace" => {
            let Some((old, new)) = body.split_once("=>") else {
                return;
            };
            let mut old = old.split_whitespace();
            let mut new = new.split_whitespace();
            if let (Some(path), Some(replacement)) = (old.next(), new.next()) {
                gomod.replaces.push(GoReplace {
                    module_path: unquote(path).to_string(),
                    version: old.next().map(str::to_string),
                    replacement: unquote(replacement).to_string(),
                    replacement_version: new.next().map(str::to_string),
                });
            }
        }
        _ => {}
    }
}

fn unquote(s: &str) -> &str {
    s.trim_matches('"')
}

/// Strips a `//` comment, leaving `://` in URLs alone.
fn strip_line_comment(line: &str) -> &str {
    let mut in_url = false;
    for (i, c) in line.char_indices() {
        if c == ':' && line[i..].starts_with("://") {
            in_url = true;
            continue;
        }
        if in_url && c.is_whitespace() {
            in_url = false;
        }
        if !in_url && line[i..].starts_with("//") {
            return &line[..i];
        }
    }
    line
}

/// Reads and parses a go.mod file; unreadable files yield an empty module.
pub fn load_go_mod(path: &Path) -> GoMod {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_go_mod(&content),
        Err(e) => {
            tracing::warn!("cannot read {}: {}", path.display(), e);
            GoMod::default()
        }
    }
}

pub fn load_dependencies(path: &Path) -> ManifestDependencies {
    load_go_mod(path).to_dependencies()
}
