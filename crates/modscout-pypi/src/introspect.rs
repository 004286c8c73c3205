//! Structural export extraction for Python packages.
//!
//! Reads the package `__init__.py` (or a single-module `.py` file) and lists
//! top-level `def`, `async def`, `class` and assignments. Names imported from
//! sibling modules (`from .core import Session`) are re-exports whose kinds
//! are looked up in that module, up to a depth limit. When `__all__` is
//! declared it defines the public surface and its order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use modscout_core::{ExportDescriptor, ExportKind, ParameterInfo, StructuralScan};
use once_cell::sync::Lazy;
use regex::Regex;

static DEF_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:async\s+)?def\s+([A-Za-z_]\w*)\s*\(").expect("valid def regex")
});

static CLASS_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^class\s+([A-Za-z_]\w*)\s*(\([^)]*\))?\s*:").expect("valid class regex")
});

static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([A-Za-z_]\w*)[ \t]*(?::[ \t]*([^=\n]+?))?[ \t]*=[^=]")
        .expect("valid assignment regex")
});

static ALL_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ms)^__all__\s*(?::[^=]*)?\+?=\s*[\[(](.*?)[\])]").expect("valid __all__ regex")
});

static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]([A-Za-z_]\w*)['"]"#).expect("valid quoted-name regex"));

/// `from .x import a, b as c` and `from x import (a, b)`, possibly multi-line.
static FROM_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^from\s+(\.*[\w.]*)\s+import\s+(\([^)]*\)|[^\n#]+)")
        .expect("valid from-import regex")
});

static PLAIN_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^import\s+([^\n#]+)").expect("valid import regex")
});

static RETURN_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:->\s*([^:]+?))?\s*:").expect("valid return annotation regex")
});

/// Source file holding the package body: `<dir>/__init__.py` or `<path>.py`.
pub fn module_source(path: &Path) -> Option<PathBuf> {
    if path.is_dir() {
        let init = path.join("__init__.py");
        return init.is_file().then_some(init);
    }
    path.is_file().then(|| path.to_path_buf())
}

/// Scans `entry`, following relative re-exports up to `max_depth` levels.
pub fn scan_module(entry: &Path, max_depth: usize) -> StructuralScan {
    let mut visited = HashSet::new();
    scan_recursive(entry, max_depth, &mut visited)
}

fn scan_recursive(path: &Path, depth: usize, visited: &mut HashSet<PathBuf>) -> StructuralScan {
    if !visited.insert(path.to_path_buf()) {
        return StructuralScan::default();
    }
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            tracing::debug!("cannot read {}: {}", path.display(), e);
            return StructuralScan::default();
        }
    };

    let mut scan = scan_source(&source);
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    for import in relative_imports(&source) {
        let resolved = if depth == 0 {
            None
        } else {
            resolve_relative(dir, &import.module).and_then(|target| module_source(&target))
        };
        let nested = resolved.map(|file| scan_recursive(&file, depth - 1, visited));

        for (name, alias) in import.names {
            let found = nested
                .as_ref()
                .and_then(|n| n.exports.iter().find(|e| e.name == name))
                .cloned();
            let mut descriptor =
                found.unwrap_or_else(|| ExportDescriptor::new(&name, ExportKind::Constant));
            descriptor.name = alias.unwrap_or(name);
            scan.push_export(descriptor);
        }
    }

    if let Some(all) = declared_all(&source) {
        scan.exports = all
            .into_iter()
            .map(|name| {
                scan.exports
                    .iter()
                    .find(|e| e.name == name)
                    .cloned()
                    .unwrap_or_else(|| ExportDescriptor::new(name, ExportKind::Constant))
            })
            .collect();
    }

    scan
}

/// Top-level definitions and absolute import targets of one source text.
pub fn scan_source(source: &str) -> StructuralScan {
    let mut scan = StructuralScan::default();

    let mut found: Vec<(usize, ExportDescriptor)> = Vec::new();
    for caps in DEF_HEADER.captures_iter(source) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        found.push((whole.start(), function_descriptor(name.as_str(), &source[whole.end()..])));
    }
    for caps in CLASS_HEADER.captures_iter(source) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let bases = caps.get(2).map_or("", |m| m.as_str());
        let descriptor = ExportDescriptor::new(name.as_str(), ExportKind::Class)
            .with_signature(format!("class {}{}", name.as_str(), bases));
        found.push((whole.start(), descriptor));
    }
    for caps in ASSIGNMENT.captures_iter(source) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = name.as_str();
        if name == "__all__" {
            continue;
        }
        let descriptor = ExportDescriptor::new(name, ExportKind::Constant);
        let descriptor = match caps.get(2) {
            Some(annotation) => {
                descriptor.with_signature(format!("{}: {}", name, annotation.as_str().trim()))
            }
            None => descriptor,
        };
        found.push((whole.start(), descriptor));
    }

    found.sort_by_key(|(offset, _)| *offset);
    for (_, descriptor) in found {
        scan.push_export(descriptor);
    }

    for target in absolute_imports(source) {
        scan.push_import(target);
    }
    scan
}

/// Builds a function descriptor from the text following `def name(`.
fn function_descriptor(name: &str, after_paren: &str) -> ExportDescriptor {
    let Some(close) = matching_paren(after_paren) else {
        return ExportDescriptor::new(name, ExportKind::Function);
    };
    let parameters = split_top_level(&after_paren[..close])
        .into_iter()
        .filter_map(|raw| parse_parameter(&raw))
        .collect();
    let return_type = RETURN_ANNOTATION
        .captures(&after_paren[close + 1..])
        .and_then(|caps| caps.get(1))
        .map(|m| collapse_whitespace(m.as_str()));
    ExportDescriptor::function(name, parameters, return_type)
}

/// Byte offset of the `)` closing an already-open parenthesis.
fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(' | '[' | '{') => depth += 1,
            (None, ')' | ']' | '}') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on commas outside brackets and string literals.
fn split_top_level(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in text.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(' | '[' | '{') => depth += 1,
            (None, ')' | ']' | '}') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    parts.push(current);
    parts
}

fn parse_parameter(raw: &str) -> Option<ParameterInfo> {
    let code: Vec<&str> = raw.lines().map(strip_line_comment).collect();
    let raw = collapse_whitespace(&code.join(" "));
    if raw.is_empty() || raw == "/" || raw == "*" || raw == "self" || raw == "cls" {
        return None;
    }

    let (head, default) = match split_default(&raw) {
        Some((head, _)) => (head, true),
        None => (raw.as_str(), false),
    };
    let (name, annotation) = match head.split_once(':') {
        Some((name, annotation)) => (name.trim(), annotation.trim()),
        None => (head.trim(), ""),
    };
    if name == "self" || name == "cls" {
        return None;
    }
    let variadic = name.starts_with('*');
    Some(ParameterInfo::new(name, annotation, default || variadic))
}

/// Splits `name: T = default` at the first `=` outside brackets.
fn split_default(param: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in param.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '=' if depth == 0 => return Some((&param[..i], &param[i + 1..])),
            _ => {}
        }
    }
    None
}

fn strip_line_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(code, _)| code)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Names listed in `__all__`, in declaration order.
pub fn declared_all(source: &str) -> Option<Vec<String>> {
    let caps = ALL_DECLARATION.captures(source)?;
    let body = caps.get(1)?.as_str();
    let mut names: Vec<String> = Vec::new();
    for m in QUOTED.captures_iter(body) {
        let name = m[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Some(names)
}

struct RelativeImport {
    module: String,
    names: Vec<(String, Option<String>)>,
}

fn relative_imports(source: &str) -> Vec<RelativeImport> {
    FROM_IMPORT
        .captures_iter(source)
        .filter(|caps| caps[1].starts_with('.'))
        .map(|caps| RelativeImport {
            module: caps[1].to_string(),
            names: imported_names(&caps[2]),
        })
        .collect()
}

/// `a, b as c` → `[(a, None), (b, Some(c))]`; `*` is skipped.
fn imported_names(list: &str) -> Vec<(String, Option<String>)> {
    list.trim_matches(|c| c == '(' || c == ')')
        .split(',')
        .map(|item| collapse_whitespace(strip_line_comment(item.trim())))
        .filter(|item| !item.is_empty() && item != "*")
        .filter_map(|item| {
            let mut parts = item.split(" as ");
            let name = parts.next()?.trim().to_string();
            let alias = parts.next().map(|a| a.trim().to_string());
            Some((name, alias))
        })
        .collect()
}

/// Absolute modules imported by the source.
fn absolute_imports(source: &str) -> Vec<String> {
    let mut targets = Vec::new();
    for caps in FROM_IMPORT.captures_iter(source) {
        let module = &caps[1];
        if !module.is_empty() && !module.starts_with('.') {
            targets.push(module.to_string());
        }
    }
    for caps in PLAIN_IMPORT.captures_iter(source) {
        for item in caps[1].split(',') {
            if let Some(module) = item.split_whitespace().next() {
                targets.push(module.to_string());
            }
        }
    }
    targets
}

/// `.core` relative to `dir` → `dir/core` (package) or `dir/core.py`.
fn resolve_relative(dir: &Path, module: &str) -> Option<PathBuf> {
    let dots = module.chars().take_while(|c| *c == '.').count();
    let mut base = dir.to_path_buf();
    for _ in 1..dots {
        base = base.parent()?.to_path_buf();
    }
    let rest = &module[dots..];
    if rest.is_empty() {
        return None;
    }
    let relative: PathBuf = rest.split('.').collect();
    let package = base.join(&relative);
    if package.is_dir() {
        return Some(package);
    }
    let file = base.join(relative.with_extension("py"));
    file.is_file().then_some(file)
}
