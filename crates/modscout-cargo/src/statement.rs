//! Root-crate extraction for Rust `use` statements and paths.

use modscout_core::statement::first_capture;
use once_cell::sync::Lazy;
use regex::Regex;

/// Path roots that refer to the current crate rather than a dependency.
pub const LOCAL_ROOTS: &[&str] = &["crate", "self", "super"];

/// `use x::y`, `pub use ::x::y`, `pub(crate) use x`
static USE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:pub(?:\([^)]*\))?\s+)?use\s+(?:::)?([A-Za-z_]\w*)").expect("valid use regex")
});

/// `use {serde, tokio};` (first crate wins)
static USE_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:pub(?:\([^)]*\))?\s+)?use\s+(?:::)?\{\s*(?:::)?([A-Za-z_]\w*)")
        .expect("valid grouped use regex")
});

/// `extern crate x;`, `extern crate x as y;`
static EXTERN_CRATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:pub\s+)?extern\s+crate\s+([A-Za-z_]\w*)").expect("valid extern crate regex")
});

/// First `x::` path segment in an expression such as `serde_json::to_string(&v)`
static PATH_EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\w:])(?:::)?([A-Za-z_]\w*)::").expect("valid path expression regex")
});

/// Extracts the crate a statement refers to.
///
/// # Examples
///
/// ```
/// use modscout_cargo::statement::extract_root;
///
/// assert_eq!(extract_root("use serde::Deserialize;").as_deref(), Some("serde"));
/// assert_eq!(extract_root("use ::std::fmt;").as_deref(), Some("std"));
/// assert_eq!(extract_root("extern crate libc;").as_deref(), Some("libc"));
/// assert_eq!(extract_root("let s = serde_json::to_string(&v)?;").as_deref(), Some("serde_json"));
/// assert_eq!(extract_root("let x = 1;"), None);
/// ```
pub fn extract_root(statement: &str) -> Option<String> {
    first_capture(&[&USE_GROUP, &USE, &EXTERN_CRATE, &PATH_EXPRESSION], statement)
}

/// `crate::`, `self::` and `super::` paths stay inside the current crate.
pub fn is_local_root(root: &str) -> bool {
    LOCAL_ROOTS.contains(&root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_statements() {
        assert_eq!(extract_root("use tokio::sync::RwLock;").as_deref(), Some("tokio"));
        assert_eq!(extract_root("pub use regex::Regex;").as_deref(), Some("regex"));
        assert_eq!(
            extract_root("pub(crate) use tracing::{debug, warn};").as_deref(),
            Some("tracing")
        );
        assert_eq!(extract_root("use anyhow;").as_deref(), Some("anyhow"));
        assert_eq!(extract_root("  use std::collections::HashMap;  ").as_deref(), Some("std"));
    }

    #[test]
    fn test_leading_colons_stripped() {
        assert_eq!(extract_root("use ::log::info;").as_deref(), Some("log"));
        assert_eq!(extract_root("::core::mem::swap(&mut a, &mut b);").as_deref(), Some("core"));
    }

    #[test]
    fn test_grouped_use() {
        assert_eq!(extract_root("use {serde, serde_json};").as_deref(), Some("serde"));
        assert_eq!(extract_root("use {log::info, tracing};").as_deref(), Some("log"));
    }

    #[test]
    fn test_extern_crate() {
        assert_eq!(extract_root("extern crate proc_macro;").as_deref(), Some("proc_macro"));
        assert_eq!(extract_root("extern crate rand as r;").as_deref(), Some("rand"));
    }

    #[test]
    fn test_path_expressions() {
        assert_eq!(
            extract_root("let now = chrono::Utc::now();").as_deref(),
            Some("chrono")
        );
        assert_eq!(
            extract_root("#[derive(serde::Serialize)]").as_deref(),
            Some("serde")
        );
    }

    #[test]
    fn test_local_roots() {
        assert_eq!(extract_root("use crate::error::Result;").as_deref(), Some("crate"));
        assert_eq!(extract_root("use super::*;").as_deref(), Some("super"));
        assert!(is_local_root("self"));
        assert!(!is_local_root("serde"));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(extract_root(""), None);
        assert_eq!(extract_root("fn main() {}"), None);
        assert_eq!(extract_root("mod parser;"), None);
    }
}
