//! Root-module extraction for Python import statements.

use modscout_core::statement::{first_capture, leading_segment};
use once_cell::sync::Lazy;
use regex::Regex;

/// Root reported for relative imports (`from . import x`, `from ..pkg import y`).
pub const RELATIVE_ROOT: &str = ".";

/// `from x.y import z`, `from . import z`, `from ..pkg import z`
static FROM_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^from\s+(\.+[\w.]*|[A-Za-z_][\w.]*)\s+import\b").expect("valid from-import regex")
});

/// `import x`, `import x.y as z`, `import x, y` (first module wins)
static PLAIN_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^import\s+([A-Za-z_][\w.]*)").expect("valid import regex")
});

/// Extracts the top-level module a statement imports.
///
/// # Examples
///
/// ```
/// use modscout_pypi::statement::extract_root;
///
/// assert_eq!(extract_root("from django.db import models").as_deref(), Some("django"));
/// assert_eq!(extract_root("import numpy as np").as_deref(), Some("numpy"));
/// assert_eq!(extract_root("from . import views").as_deref(), Some("."));
/// assert_eq!(extract_root("print('hi')"), None);
/// ```
pub fn extract_root(statement: &str) -> Option<String> {
    let path = dotted_path(statement)?;
    if path.starts_with('.') {
        return Some(RELATIVE_ROOT.to_string());
    }
    Some(leading_segment(&path, ".").to_string())
}

/// Full dotted module path of the statement (`os.path` for `import os.path`).
pub fn dotted_path(statement: &str) -> Option<String> {
    first_capture(&[&FROM_IMPORT, &PLAIN_IMPORT], statement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_imports() {
        assert_eq!(extract_root("from os.path import join").as_deref(), Some("os"));
        assert_eq!(
            extract_root("from sklearn.model_selection import train_test_split").as_deref(),
            Some("sklearn")
        );
        assert_eq!(
            extract_root("from typing import (\n    Any,\n    Dict,\n)").as_deref(),
            Some("typing")
        );
    }

    #[test]
    fn test_plain_imports() {
        assert_eq!(extract_root("import requests").as_deref(), Some("requests"));
        assert_eq!(extract_root("import xml.etree.ElementTree as ET").as_deref(), Some("xml"));
        assert_eq!(extract_root("import json, sys").as_deref(), Some("json"));
        assert_eq!(extract_root("   import asyncio").as_deref(), Some("asyncio"));
    }

    #[test]
    fn test_relative_imports() {
        assert_eq!(extract_root("from . import models").as_deref(), Some("."));
        assert_eq!(extract_root("from ..utils import helper").as_deref(), Some("."));
        assert_eq!(extract_root("from .models import User").as_deref(), Some("."));
    }

    #[test]
    fn test_dotted_path() {
        assert_eq!(dotted_path("import os.path").as_deref(), Some("os.path"));
        assert_eq!(dotted_path("from .a.b import c").as_deref(), Some(".a.b"));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(extract_root(""), None);
        assert_eq!(extract_root("x = 1"), None);
        assert_eq!(extract_root("from import x"), None);
        assert_eq!(extract_root("important = True"), None);
    }
}
