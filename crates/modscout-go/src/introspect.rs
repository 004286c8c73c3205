//! Structural export extraction for Go packages.
//!
//! A Go package is every non-test `.go` file of one directory. Top-level
//! `func`, `type`, `const` and `var` declarations are collected, including
//! parenthesised groups; methods are skipped. A `// Name ...` comment right
//! above a declaration becomes its description.

use std::path::{Path, PathBuf};

use modscout_core::{ExportDescriptor, ExportKind, ParameterInfo, StructuralScan};

use crate::statement::extract_root;

const TEST_SUFFIX: &str = "_test.go";

/// Non-test Go sources of `dir`, sorted by file name.
pub fn package_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".go") && !n.ends_with(TEST_SUFFIX))
        })
        .collect();
    files.sort();
    files
}

/// Exports and imports of every source file in the package directory.
pub fn scan_package(dir: &Path) -> StructuralScan {
    let mut scan = StructuralScan::default();
    for file in package_files(dir) {
        match std::fs::read_to_string(&file) {
            Ok(source) => scan.merge(scan_source(&source)),
            Err(e) => tracing::debug!("cannot read {}: {}", file.display(), e),
        }
    }
    scan
}

/// Package documentation: the first sentence of a `// Package name ...`
/// comment, looked up in `doc.go` first.
pub fn package_doc(dir: &Path) -> Option<String> {
    let mut files = package_files(dir);
    if let Some(pos) = files
        .iter()
        .position(|f| f.file_name().is_some_and(|n| n == "doc.go"))
    {
        let doc = files.remove(pos);
        files.insert(0, doc);
    }
    files
        .iter()
        .filter_map(|f| std::fs::read_to_string(f).ok())
        .find_map(|source| doc_comment(&source))
}

fn doc_comment(source: &str) -> Option<String> {
    let mut lines = source
        .lines()
        .map(str::trim)
        .skip_while(|l| !l.starts_with("// Package "));
    let first = lines.next()?.trim_start_matches("//").trim();
    let mut text = first.to_string();
    for line in lines {
        let Some(rest) = line.strip_prefix("//") else {
            break;
        };
        let rest = rest.trim();
        if rest.is_empty() {
            break;
        }
        text.push(' ');
        text.push_str(rest);
    }
    Some(first_sentence(&text).to_string())
}

fn first_sentence(text: &str) -> &str {
    text.find(". ").map_or(text, |idx| &text[..=idx])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Const,
    Var,
    Type,
    Import,
}

/// Scans a single Go source file.
pub fn scan_source(source: &str) -> StructuralScan {
    let mut scan = StructuralScan::default();
    let mut depth = 0i32;
    let mut group: Option<Group> = None;
    let mut in_block_comment = false;
    let mut doc: Vec<&str> = Vec::new();
    let mut offset = 0usize;

    for raw in source.split_inclusive('\n') {
        let line_start = offset;
        offset += raw.len();
        let line = raw.trim_end();
        let trimmed = line.trim();

        if in_block_comment {
            in_block_comment = !trimmed.contains("*/");
            continue;
        }
        if trimmed.starts_with("/*") {
            in_block_comment = !trimmed.contains("*/");
            continue;
        }
        if let Some(comment) = trimmed.strip_prefix("//") {
            if depth == 0 {
                doc.push(comment.trim());
            }
            continue;
        }

        let code = strip_literals(line);
        if depth == 0 {
            let description = (!doc.is_empty()).then(|| first_sentence(&doc.join(" ")).to_string());
            doc.clear();
            match group {
                Some(_) if trimmed.starts_with(')') => group = None,
                Some(kind) => group_member(&mut scan, kind, trimmed, description),
                None => top_level(&mut scan, source, line_start, trimmed, description, &mut group),
            }
        }
        depth += brace_delta(&code);
        if depth < 0 {
            depth = 0;
        }
    }
    scan
}

fn top_level(
    scan: &mut StructuralScan,
    source: &str,
    line_start: usize,
    line: &str,
    description: Option<String>,
    group: &mut Option<Group>,
) {
    let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();

    let opens_group = rest.starts_with('(');
    let kind = match keyword {
        "func" => {
            let Some(name) = leading_identifier(rest) else {
                // method: `func (r *T) Name(...)`
                return;
            };
            // signatures may span lines, so parse from the full source
            let after_keyword = source[line_start..]
                .find("func")
                .map_or("", |idx| source[line_start + idx + "func".len()..].trim_start());
            let after_name = after_keyword.get(name.len()..).unwrap_or("");
            push(scan, function_descriptor(name, after_name), description);
            return;
        }
        "import" if opens_group => Group::Import,
        "import" => {
            if let Some(path) = extract_root(line) {
                scan.push_import(path);
            }
            return;
        }
        "const" => Group::Const,
        "var" => Group::Var,
        "type" => Group::Type,
        _ => return,
    };

    if opens_group {
        // `const ( A = 1 )` on a single line is rare enough to skip
        if !rest.trim_end().ends_with(')') {
            *group = Some(kind);
        }
        return;
    }
    group_member(scan, kind, rest, description);
}

/// One declaration: a group member, or the text after the keyword of a
/// single declaration.
fn group_member(
    scan: &mut StructuralScan,
    group: Group,
    line: &str,
    description: Option<String>,
) {
    match group {
        Group::Import => {
            if let Some(path) = extract_root(line) {
                scan.push_import(path);
            }
        }
        Group::Type => {
            let Some(name) = leading_identifier(line) else {
                return;
            };
            let after = skip_type_parameters(line[name.len()..].trim_start());
            let kind = match after.split_whitespace().next() {
                Some(word) if word.starts_with("struct") => ExportKind::Class,
                Some(word) if word.starts_with("interface") => ExportKind::Interface,
                _ => ExportKind::Type,
            };
            let header = line
                .find('{')
                .map_or(line, |idx| &line[..idx])
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            let descriptor =
                ExportDescriptor::new(name, kind).with_signature(format!("type {header}"));
            push(scan, descriptor, description);
        }
        Group::Const | Group::Var => {
            let names = line.split('=').next().unwrap_or(line);
            let mut names = names.split(',').map(str::trim).peekable();
            while let Some(part) = names.next() {
                // the last name may carry the type: `a, b int`
                let Some(name) = leading_identifier(part) else {
                    break;
                };
                if name == "_" {
                    continue;
                }
                push(scan, ExportDescriptor::new(name, ExportKind::Constant), description.clone());
                if names.peek().is_none() {
                    break;
                }
            }
        }
    }
}

fn push(scan: &mut StructuralScan, descriptor: ExportDescriptor, description: Option<String>) {
    match description {
        Some(text) if !text.is_empty() => scan.push_export(descriptor.with_description(text)),
        _ => scan.push_export(descriptor),
    }
}

/// Identifier at the start of `text`.
fn leading_identifier(text: &str) -> Option<&str> {
    let end = text
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map_or(text.len(), |(i, _)| i);
    let ident = &text[..end];
    ident
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        .then_some(ident)
}

/// Removes the contents of string, rune and raw string literals on one line.
fn strip_literals(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in line.chars() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' && q != '`' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                    out.push(c);
                }
            }
            None => {
                if matches!(c, '"' | '\'' | '`') {
                    quote = Some(c);
                }
                out.push(c);
            }
        }
    }
    match out.find("//") {
        Some(idx) => out[..idx].to_string(),
        None => out,
    }
}

fn brace_delta(code: &str) -> i32 {
    code.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

/// Skips a leading `[T any, U comparable]` type parameter list.
fn skip_type_parameters(text: &str) -> &str {
    if !text.starts_with('[') {
        return text;
    }
    // `[]T` and `[N]T` are array types, not parameter lists
    if text.starts_with("[]") {
        return text;
    }
    match matching_close(&text[1..], '[', ']') {
        Some(idx) if text[1..=idx].contains(' ') => text[idx + 2..].trim_start(),
        _ => text,
    }
}

/// Byte offset of the bracket closing an already-opened `open`.
fn matching_close(text: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in text.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Builds a function descriptor from the source following `func Name`.
fn function_descriptor(name: &str, rest: &str) -> ExportDescriptor {
    let rest = skip_type_parameters(rest.trim_start());
    let Some(body) = rest.strip_prefix('(') else {
        return ExportDescriptor::new(name, ExportKind::Function);
    };
    let Some(close) = matching_close(body, '(', ')') else {
        return ExportDescriptor::new(name, ExportKind::Function);
    };
    let parameters = parse_parameters(&body[..close]);
    let return_type = return_type(&body[close + 1..]);
    ExportDescriptor::function(name, parameters, return_type)
}

/// Parameters of a Go parameter list.
///
/// Either every parameter is named or none is; in named lists a bare name
/// shares the type of the next typed parameter (`a, b int`). A variadic
/// `...T` parameter is optional.
fn parse_parameters(list: &str) -> Vec<ParameterInfo> {
    let parts = split_top_level(list);
    let named = parts.iter().any(|part| {
        part.split_once(char::is_whitespace)
            .is_some_and(|(first, _)| leading_identifier(first) == Some(first))
    });

    if !named {
        return parts
            .iter()
            .enumerate()
            .map(|(i, ty)| parameter(format!("arg{i}"), ty))
            .collect();
    }

    let mut parameters: Vec<ParameterInfo> = Vec::with_capacity(parts.len());
    let mut pending: Vec<&str> = Vec::new();
    for part in parts {
        match part.split_once(char::is_whitespace) {
            Some((name, ty)) => {
                let ty = ty.trim();
                for waiting in pending.drain(..) {
                    parameters.push(parameter(waiting.to_string(), ty));
                }
                parameters.push(parameter(name.to_string(), ty));
            }
            None => pending.push(part),
        }
    }
    // trailing bare names without a type
    parameters.extend(pending.into_iter().map(|name| ParameterInfo::new(name, "", false)));
    parameters
}

fn parameter(name: String, ty: &str) -> ParameterInfo {
    let variadic = ty.starts_with("...");
    ParameterInfo::new(name, ty, variadic)
}

/// Splits on commas outside any bracket pair.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Result list after the parameters, up to the body's opening brace.
fn return_type(rest: &str) -> Option<String> {
    let line = rest.split('\n').next().unwrap_or(rest);
    let mut end = line.len();
    for (i, c) in line.char_indices() {
        if c != '{' {
            continue;
        }
        let before = line[..i].trim_end();
        if before.ends_with("interface") || before.ends_with("struct") {
            continue;
        }
        end = i;
        break;
    }
    let ret = line[..end].trim();
    let ret = ret.split("//").next().unwrap_or(ret).trim();
    (!ret.is_empty()).then(|| ret.split_whitespace().collect::<Vec<_>>().join(" "))
}
