//! Root-specifier extraction for JavaScript/TypeScript import statements.

use modscout_core::statement::first_capture;
use once_cell::sync::Lazy;
use regex::Regex;

/// `import x from 'm'`, `import type { T } from "m"`, `export * from 'm'`
static FROM_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:import|export)\b[\s\S]*?\bfrom\s*['"]([^'"]+)['"]"#)
        .expect("valid from-clause regex")
});

/// Side-effect import: `import 'm'`
static BARE_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^import\s*['"]([^'"]+)['"]"#).expect("valid bare import regex")
});

/// `require('m')`, anywhere in the statement
static REQUIRE_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("valid require regex")
});

/// Dynamic `import('m')`
static DYNAMIC_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("valid dynamic import regex")
});

/// Extracts the package a statement imports from.
///
/// Scoped packages keep their scope (`@scope/name`); other specifiers are
/// cut at the first `/`. Relative specifiers are returned unchanged and a
/// `node:` prefix is preserved for standard-library lookup.
///
/// # Examples
///
/// ```
/// use modscout_npm::statement::extract_root;
///
/// assert_eq!(extract_root("import { describe } from 'vitest'").as_deref(), Some("vitest"));
/// assert_eq!(extract_root("import x from '@tanstack/react-query/devtools'").as_deref(), Some("@tanstack/react-query"));
/// assert_eq!(extract_root("const fs = require('node:fs/promises')").as_deref(), Some("node:fs"));
/// assert_eq!(extract_root("let x = 1"), None);
/// ```
pub fn extract_root(statement: &str) -> Option<String> {
    let patterns: [&Regex; 4] = [&FROM_CLAUSE, &BARE_IMPORT, &REQUIRE_CALL, &DYNAMIC_IMPORT];
    let specifier = first_capture(&patterns, statement)?;
    Some(package_root(&specifier))
}

/// Package portion of a module specifier.
pub fn package_root(specifier: &str) -> String {
    if is_relative(specifier) {
        return specifier.to_string();
    }

    let mut segments = specifier.split('/');
    match segments.next() {
        Some(scope) if scope.starts_with('@') => match segments.next() {
            Some(name) if !name.is_empty() => format!("{scope}/{name}"),
            _ => scope.to_string(),
        },
        Some(first) => first.to_string(),
        None => specifier.to_string(),
    }
}

/// Relative or absolute filesystem specifier.
pub fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_es_imports() {
        assert_eq!(extract_root("import React from 'react'").as_deref(), Some("react"));
        assert_eq!(
            extract_root(r#"import { useState, useEffect } from "react";"#).as_deref(),
            Some("react")
        );
        assert_eq!(
            extract_root("import * as path from 'path'").as_deref(),
            Some("path")
        );
        assert_eq!(
            extract_root("import type { Config } from 'vite'").as_deref(),
            Some("vite")
        );
    }

    #[test]
    fn test_multiline_import() {
        let stmt = "import {\n  a,\n  b,\n} from 'lodash-es/fp'";
        assert_eq!(extract_root(stmt).as_deref(), Some("lodash-es"));
    }

    #[test]
    fn test_reexport() {
        assert_eq!(extract_root("export * from 'zod'").as_deref(), Some("zod"));
        assert_eq!(
            extract_root("export { default } from './Button'").as_deref(),
            Some("./Button")
        );
    }

    #[test]
    fn test_side_effect_import() {
        assert_eq!(
            extract_root("import 'reflect-metadata';").as_deref(),
            Some("reflect-metadata")
        );
    }

    #[test]
    fn test_require_and_dynamic() {
        assert_eq!(
            extract_root("const express = require('express');").as_deref(),
            Some("express")
        );
        assert_eq!(
            extract_root("const { join } = require(\"path\")").as_deref(),
            Some("path")
        );
        assert_eq!(
            extract_root("const mod = await import('chalk')").as_deref(),
            Some("chalk")
        );
    }

    #[test]
    fn test_scoped_packages() {
        assert_eq!(package_root("@types/node"), "@types/node");
        assert_eq!(package_root("@babel/core/lib/index"), "@babel/core");
        assert_eq!(package_root("@scope"), "@scope");
    }

    #[test]
    fn test_relative_kept() {
        assert_eq!(package_root("./utils/strings"), "./utils/strings");
        assert_eq!(package_root("../shared"), "../shared");
        assert!(is_relative("/abs/path"));
        assert!(!is_relative("react"));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(extract_root(""), None);
        assert_eq!(extract_root("console.log('hi')"), None);
        assert_eq!(extract_root("import from"), None);
    }
}
