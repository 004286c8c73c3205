//! Structural export extraction for Rust library crates.
//!
//! Only top-level items of a file are considered (items written at column
//! zero with a plain `pub`). `pub use module::*` glob re-exports of child
//! modules are followed up to a depth limit.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use modscout_core::{ExportDescriptor, ExportKind, ParameterInfo, StructuralScan};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::statement::is_local_root;

/// `pub [const] [async] [unsafe] [extern "C"] <kind> <name>`
static PUB_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^pub[ \t]+(?:(?:const|async|unsafe|extern(?:[ \t]+"[^"]*")?)[ \t]+)*(fn|struct|enum|trait|type|const|static|mod|union)[ \t]+(?:mut[ \t]+)?([A-Za-z_]\w*)"#,
    )
    .expect("valid pub item regex")
});

/// `pub use path::Name;`, `pub use path::Name as Alias;`
static NAMED_REEXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^pub[ \t]+use[ \t]+(?:::)?[\w:]*?([A-Za-z_]\w*)(?:[ \t]+as[ \t]+([A-Za-z_]\w*))?[ \t]*;")
        .expect("valid named re-export regex")
});

/// `pub use path::{A, B as C};`
static GROUP_REEXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^pub[ \t]+use[ \t]+(?:::)?(?:[\w:]*::)?\{([^}]*)\}[ \t]*;")
        .expect("valid grouped re-export regex")
});

/// `pub use module::*;`, `pub use self::module::*;`
static GLOB_REEXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^pub[ \t]+use[ \t]+(?:self::|crate::)?([A-Za-z_]\w*)::\*[ \t]*;")
        .expect("valid glob re-export regex")
});

/// Root crate of every `use` and `extern crate`, at any indentation.
static USE_ROOT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?(?:use[ \t]+(?:::)?\{?[ \t]*|extern[ \t]+crate[ \t]+)([A-Za-z_]\w*)")
        .expect("valid use root regex")
});

/// `mod name;` and `mod name { ... }` declarations, at any visibility.
static MOD_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?mod[ \t]+([A-Za-z_]\w*)")
        .expect("valid mod declaration regex")
});

/// Exports and imports of a single source file.
#[derive(Debug, Default)]
pub struct FileScan {
    pub scan: StructuralScan,
    /// Child modules re-exported with `pub use module::*`.
    pub glob_reexports: Vec<String>,
}

/// Scans `entry` and follows glob re-exports up to `max_depth` levels.
pub fn scan_module(entry: &Path, max_depth: usize) -> StructuralScan {
    let mut visited = HashSet::new();
    scan_recursive(entry, max_depth, &mut visited)
}

fn scan_recursive(path: &Path, depth: usize, visited: &mut HashSet<PathBuf>) -> StructuralScan {
    if !visited.insert(path.to_path_buf()) {
        return StructuralScan::default();
    }

    let file = match scan_file(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!("structural scan of {} failed: {e}", path.display());
            return StructuralScan::default();
        }
    };

    let mut scan = file.scan;
    if depth == 0 {
        return scan;
    }

    for module in file.glob_reexports {
        let Some(target) = module_file(path, &module) else {
            tracing::debug!("unresolved module '{}' in {}", module, path.display());
            continue;
        };
        let nested = scan_recursive(&target, depth - 1, visited);
        scan.merge(StructuralScan {
            exports: nested.exports,
            imports: Vec::new(),
        });
    }
    scan
}

/// Source file of child module `name` declared in `parent`.
///
/// `lib.rs`, `main.rs` and `mod.rs` own their directory; any other file
/// `foo.rs` keeps its children in `foo/`.
pub fn module_file(parent: &Path, name: &str) -> Option<PathBuf> {
    let dir = parent.parent()?;
    let owns_dir = matches!(
        parent.file_name().and_then(|n| n.to_str()),
        Some("lib.rs" | "main.rs" | "mod.rs")
    );
    let dir = if owns_dir {
        dir.to_path_buf()
    } else {
        dir.join(parent.file_stem()?)
    };

    [dir.join(format!("{name}.rs")), dir.join(name).join("mod.rs")]
        .into_iter()
        .find(|p| p.is_file())
}

pub fn scan_file(path: &Path) -> Result<FileScan> {
    let source = std::fs::read_to_string(path)?;
    Ok(scan_source(&source))
}

pub fn scan_source(source: &str) -> FileScan {
    let mut found: Vec<(usize, ExportDescriptor)> = Vec::new();

    for caps in PUB_ITEM.captures_iter(source) {
        let (Some(whole), Some(kind), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let descriptor = if kind.as_str() == "fn" {
            function_descriptor(name.as_str(), &source[name.end()..])
        } else {
            ExportDescriptor::new(name.as_str(), item_kind(kind.as_str()))
                .with_signature(item_header(&source[whole.start()..]))
        };
        found.push((whole.start(), descriptor));
    }

    for caps in NAMED_REEXPORT.captures_iter(source) {
        let (Some(whole), Some(last)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.as_str().contains('*') {
            continue;
        }
        let name = caps.get(2).unwrap_or(last).as_str();
        if name != "self" {
            found.push((whole.start(), ExportDescriptor::new(name, kind_from_case(name))));
        }
    }

    for caps in GROUP_REEXPORT.captures_iter(source) {
        let (Some(whole), Some(list)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        for name in list.as_str().split(',').filter_map(group_member_name) {
            found.push((whole.start(), ExportDescriptor::new(name, kind_from_case(name))));
        }
    }

    found.sort_by_key(|(offset, _)| *offset);

    let mut scan = StructuralScan::default();
    for (_, descriptor) in found {
        scan.push_export(descriptor);
    }

    let local_modules: HashSet<&str> = MOD_DECLARATION
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();
    for caps in USE_ROOT.captures_iter(source) {
        if let Some(root) = caps.get(1).map(|m| m.as_str())
            && !is_local_root(root)
            && !local_modules.contains(root)
        {
            scan.push_import(root);
        }
    }

    let glob_reexports = GLOB_REEXPORT
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|m| !is_local_root(m))
        .collect();

    FileScan {
        scan,
        glob_reexports,
    }
}

fn item_kind(keyword: &str) -> ExportKind {
    match keyword {
        "fn" => ExportKind::Function,
        "struct" | "enum" | "union" => ExportKind::Class,
        "trait" => ExportKind::Interface,
        "type" => ExportKind::Type,
        "mod" => ExportKind::Namespace,
        _ => ExportKind::Constant,
    }
}

/// Kind guessed from naming conventions: `CamelCase` types, `SCREAMING_CASE`
/// constants, `snake_case` functions.
fn kind_from_case(name: &str) -> ExportKind {
    let first_upper = name.chars().next().is_some_and(char::is_uppercase);
    if !first_upper {
        ExportKind::Function
    } else if name.chars().any(char::is_lowercase) {
        ExportKind::Type
    } else {
        ExportKind::Constant
    }
}

/// `Name`, `path::Name` or `Name as Alias` inside a `{...}` group.
fn group_member_name(member: &str) -> Option<&str> {
    let member = member.trim();
    let name = match member.split_once(" as ") {
        Some((_, alias)) => alias.trim(),
        None => member.rsplit("::").next().unwrap_or(member).trim(),
    };
    let valid = !name.is_empty()
        && name != "self"
        && name != "*"
        && name.chars().all(|c| c.is_alphanumeric() || c == '_');
    valid.then_some(name)
}

/// Item text up to its body, without `pub`: `struct Config<T>`, `const MAX: usize`.
fn item_header(item: &str) -> String {
    let end = item
        .find(['{', ';', '(', '='])
        .unwrap_or(item.len());
    let header = &item[..end];
    let header = header.split(" where").next().unwrap_or(header);
    let header = header.strip_prefix("pub").unwrap_or(header);
    header.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Builds a function descriptor from the text following `fn name`.
fn function_descriptor(name: &str, rest: &str) -> ExportDescriptor {
    let rest = skip_generics(rest.trim_start());
    let Some(body) = rest.strip_prefix('(') else {
        return ExportDescriptor::new(name, ExportKind::Function);
    };
    let Some(close) = matching_paren(body) else {
        return ExportDescriptor::new(name, ExportKind::Function);
    };

    let parameters = split_top_level(&body[..close])
        .into_iter()
        .filter_map(parse_parameter)
        .collect();
    let return_type = return_type(&body[close + 1..]);
    ExportDescriptor::function(name, parameters, return_type)
}

/// Skips a leading balanced `<...>` generic parameter list.
fn skip_generics(text: &str) -> &str {
    if !text.starts_with('<') {
        return text;
    }
    let mut depth = 0usize;
    let mut previous = ' ';
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if previous != '-' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return text[i + 1..].trim_start();
                }
            }
            _ => {}
        }
        previous = c;
    }
    text
}

/// Byte offset of the `)` closing an already-opened parenthesis.
fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
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

/// Splits on commas outside any bracket pair.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut previous = ' ';
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '>' if previous != '-' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        previous = c;
    }
    parts.push(&text[start..]);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// `name: Type`; receivers (`self`, `&mut self`, `self: Box<Self>`) are skipped.
fn parse_parameter(param: &str) -> Option<ParameterInfo> {
    let param = strip_attributes(param);
    let (pattern, type_name) = match param.split_once(':') {
        Some((pattern, ty)) if !ty.starts_with(':') => (pattern.trim(), ty.trim()),
        _ => (param.trim(), ""),
    };
    let pattern = pattern.trim_start_matches('&').trim_start();
    let pattern = pattern
        .strip_prefix('\'')
        .and_then(|p| p.split_once(char::is_whitespace).map(|(_, rest)| rest.trim_start()))
        .unwrap_or(pattern);
    let name = pattern.strip_prefix("mut ").unwrap_or(pattern).trim();

    if name == "self" || name.is_empty() {
        return None;
    }
    Some(ParameterInfo::new(
        name,
        type_name.split_whitespace().collect::<Vec<_>>().join(" "),
        false,
    ))
}

/// Drops leading `#[...]` parameter attributes.
fn strip_attributes(param: &str) -> &str {
    let mut param = param.trim_start();
    while let Some(rest) = param.strip_prefix("#[") {
        match rest.find(']') {
            Some(end) => param = rest[end + 1..].trim_start(),
            None => break,
        }
    }
    param
}

/// `-> T` after the parameter list, up to the body, `;` or `where` clause.
fn return_type(after_params: &str) -> Option<String> {
    let rest = after_params.trim_start().strip_prefix("->")?;
    let end = rest.find(['{', ';']).unwrap_or(rest.len());
    let ty = &rest[..end];
    let ty = ty.split(" where").next().unwrap_or(ty);
    let ty = ty.split("\nwhere").next().unwrap_or(ty);
    let ty = ty.split_whitespace().collect::<Vec<_>>().join(" ");
    (!ty.is_empty()).then_some(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(scan: &StructuralScan) -> Vec<&str> {
        scan.exports.iter().map(|e| e.name.as_str()).collect()
    }

    const LIB: &str = r#"//! A small crate.

use std::fmt;
use serde::Serialize;
pub use crate::inner::Helper;

pub mod codec;
mod private;

pub const MAX_LEN: usize = 64;
pub static mut COUNTER: u32 = 0;

/// A point.
#[derive(Debug)]
pub struct Point<T> where T: Copy {
    pub x: T,
}

pub enum Shape { Circle, Square }

pub trait Render {
    fn render(&self) -> String;
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn hidden() {}

fn also_hidden() {}

pub async fn fetch(url: &str, retries: u8) -> Result<Vec<u8>> {
    todo!()
}

pub const fn double<F: Fn(u8) -> u8>(f: F, mut value: u8) -> u8 where F: Copy {
    f(value) * 2
}

impl Point<i32> {
    pub fn origin() -> Self { Self { x: 0 } }
}
"#;

    #[test]
    fn test_top_level_items_in_order() {
        let file = scan_source(LIB);
        assert_eq!(
            names(&file.scan),
            vec![
                "Helper", "codec", "MAX_LEN", "COUNTER", "Point", "Shape", "Render", "Result",
                "fetch", "double"
            ]
        );
    }

    #[test]
    fn test_item_kinds_and_headers() {
        let file = scan_source(LIB);
        let find = |n: &str| file.scan.exports.iter().find(|e| e.name == n).unwrap();

        assert_eq!(find("Helper").kind, ExportKind::Type);
        assert_eq!(find("codec").kind, ExportKind::Namespace);
        assert_eq!(find("MAX_LEN").kind, ExportKind::Constant);
        assert_eq!(find("MAX_LEN").signature.as_deref(), Some("const MAX_LEN: usize"));
        assert_eq!(find("Point").kind, ExportKind::Class);
        assert_eq!(find("Point").signature.as_deref(), Some("struct Point<T>"));
        assert_eq!(find("Render").kind, ExportKind::Interface);
        assert_eq!(find("Result").kind, ExportKind::Type);
        assert_eq!(find("Result").signature.as_deref(), Some("type Result<T>"));
    }

    #[test]
    fn test_function_signatures() {
        let file = scan_source(LIB);
        let find = |n: &str| file.scan.exports.iter().find(|e| e.name == n).unwrap();

        let fetch = find("fetch");
        assert_eq!(fetch.kind, ExportKind::Function);
        assert_eq!(
            fetch.signature.as_deref(),
            Some("fetch(url: &str, retries: u8): Result<Vec<u8>>")
        );

        let double = find("double");
        assert_eq!(double.signature.as_deref(), Some("double(f: F, value: u8): u8"));
        assert_eq!(double.return_type.as_deref(), Some("u8"));
    }

    #[test]
    fn test_receivers_and_attributes_skipped() {
        let params: Vec<_> = split_top_level("&mut self, #[allow(unused)] key: &'a str, map: HashMap<K, V>")
            .into_iter()
            .filter_map(parse_parameter)
            .collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "key");
        assert_eq!(params[0].type_name, "&'a str");
        assert_eq!(params[1].type_name, "HashMap<K, V>");

        assert!(parse_parameter("self: Box<Self>").is_none());
        assert!(parse_parameter("&'a self").is_none());
    }

    #[test]
    fn test_grouped_reexports() {
        let file = scan_source("pub use crate::codec::{Decoder, encode as to_bytes, self};\n");
        assert_eq!(names(&file.scan), vec!["Decoder", "to_bytes"]);
        assert_eq!(file.scan.exports[1].kind, ExportKind::Function);
    }

    #[test]
    fn test_imports_collected() {
        let file = scan_source(LIB);
        assert_eq!(file.scan.imports, vec!["std", "serde"]);

        let file = scan_source("extern crate libc;\nfn f() {\n    use ::rand::Rng;\n}\n");
        assert_eq!(file.scan.imports, vec!["libc", "rand"]);
    }

    #[test]
    fn test_glob_reexports_followed() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("types")).unwrap();
        fs::write(
            src.join("lib.rs"),
            "mod error;\nmod types;\npub use error::*;\npub use self::types::*;\npub fn run() {}\n",
        )
        .unwrap();
        fs::write(src.join("error.rs"), "pub struct Error;\npub use crate::types::*;\n").unwrap();
        fs::write(
            src.join("types/mod.rs"),
            "mod id;\npub use id::*;\npub struct Config;\n",
        )
        .unwrap();
        fs::write(src.join("types/id.rs"), "pub struct Id(u64);\n").unwrap();

        let lib = src.join("lib.rs");
        assert_eq!(names(&scan_module(&lib, 0)), vec!["run"]);
        assert!(scan_module(&lib, 0).imports.is_empty());
        assert_eq!(names(&scan_module(&lib, 1)), vec!["run", "Error", "Config"]);
        assert_eq!(
            names(&scan_module(&lib, 2)),
            vec!["run", "Error", "Config", "Id"]
        );
    }

    #[test]
    fn test_module_file_layouts() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("net")).unwrap();
        fs::write(src.join("lib.rs"), "").unwrap();
        fs::write(src.join("net.rs"), "").unwrap();
        fs::write(src.join("net/tcp.rs"), "").unwrap();

        assert_eq!(module_file(&src.join("lib.rs"), "net"), Some(src.join("net.rs")));
        assert_eq!(module_file(&src.join("net.rs"), "tcp"), Some(src.join("net/tcp.rs")));
        assert_eq!(module_file(&src.join("lib.rs"), "missing"), None);
    }

    #[test]
    fn test_missing_file() {
        let scan = scan_module(Path::new("/nonexistent/src/lib.rs"), 2);
        assert!(scan.exports.is_empty());
    }
}
