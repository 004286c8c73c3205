//! Shared helpers for import-statement extraction.
//!
//! Each ecosystem keeps its own ordered list of patterns; the first pattern
//! whose first capture group matches wins.

use regex::Regex;

/// Returns the first capture group of the first matching pattern.
///
/// # Examples
///
/// ```
/// use modscout_core::statement::first_capture;
/// use regex::Regex;
///
/// let patterns = [
///     Regex::new(r#"from\s+['"]([^'"]+)['"]"#).unwrap(),
///     Regex::new(r#"require\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap(),
/// ];
/// let refs: Vec<&Regex> = patterns.iter().collect();
/// assert_eq!(first_capture(&refs, "const x = require('zod')").as_deref(), Some("zod"));
/// assert_eq!(first_capture(&refs, "let y = 1"), None);
/// ```
pub fn first_capture(patterns: &[&Regex], statement: &str) -> Option<String> {
    let statement = statement.trim();
    if statement.is_empty() {
        return None;
    }

    patterns.iter().find_map(|pattern| {
        pattern
            .captures(statement)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Leading segment of `path` split on `separator`.
pub fn leading_segment<'a>(path: &'a str, separator: &str) -> &'a str {
    path.split(separator).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pattern_wins() {
        let a = Regex::new(r"^use\s+([a-z_]+)").unwrap();
        let b = Regex::new(r"([a-z_]+)::").unwrap();
        let found = first_capture(&[&a, &b], "use serde::Deserialize;");
        assert_eq!(found.as_deref(), Some("serde"));
    }

    #[test]
    fn test_blank_statement() {
        let a = Regex::new(r"(.*)").unwrap();
        assert_eq!(first_capture(&[&a], "   "), None);
    }

    #[test]
    fn test_leading_segment() {
        assert_eq!(leading_segment("os.path", "."), "os");
        assert_eq!(leading_segment("tokio::sync", "::"), "tokio");
        assert_eq!(leading_segment("lodash", "/"), "lodash");
    }
}
