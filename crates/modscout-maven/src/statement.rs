//! Package extraction for Java import declarations.

use once_cell::sync::Lazy;
use regex::Regex;

/// `import a.b.C;`, `import static a.b.C.m;`, `import a.b.*;`
static IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*import\s+(?:static\s+)?([A-Za-z_$][\w$]*(?:\s*\.\s*[A-Za-z_$][\w$]*)*)(?:\s*\.\s*\*)?\s*;?")
        .expect("valid java import regex")
});

/// Extracts the package of an import: the dotted segments before the first
/// capitalised one (the class).
///
/// # Examples
///
/// ```
/// use modscout_maven::statement::extract_root;
///
/// assert_eq!(extract_root("import java.util.List;").as_deref(), Some("java.util"));
/// assert_eq!(
///     extract_root("import static org.junit.jupiter.api.Assertions.assertEquals;").as_deref(),
///     Some("org.junit.jupiter.api")
/// );
/// assert_eq!(
///     extract_root("import com.google.common.collect.*;").as_deref(),
///     Some("com.google.common.collect")
/// );
/// assert_eq!(extract_root("List<String> xs;"), None);
/// ```
pub fn extract_root(statement: &str) -> Option<String> {
    let caps = IMPORT.captures(statement)?;
    let path: String = caps[1].chars().filter(|c| !c.is_whitespace()).collect();
    Some(package_of(&path))
}

/// Package portion of a dotted name. A name starting with a capitalised
/// segment (default package) is returned whole.
pub fn package_of(path: &str) -> String {
    let segments: Vec<&str> = path.split('.').collect();
    let class_at = segments
        .iter()
        .position(|s| s.chars().next().is_some_and(char::is_uppercase));
    match class_at {
        Some(0) | None => path.to_string(),
        Some(idx) => segments[..idx].join("."),
    }
}
