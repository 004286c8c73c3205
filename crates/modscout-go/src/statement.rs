//! Import-path extraction for Go import declarations.
//!
//! Go imports name whole package paths, so the full path is the root; module
//! ownership is decided later by prefix matching against go.mod.

use modscout_core::statement::first_capture;
use once_cell::sync::Lazy;
use regex::Regex;

/// `import "fmt"`, `import f "fmt"`, `import _ "embed"`, `import . "math"`
static SINGLE_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^import\s+(?:[\w.]+\s+)?"([^"]+)""#).expect("valid import regex")
});

/// `import ( "fmt" ... )` written on one line; the first path wins
static BLOCK_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^import\s*\(\s*(?:[\w.]+\s+)?"([^"]+)""#).expect("valid import block regex")
});

/// A line of an import block: `"net/http"` or `chi "github.com/go-chi/chi/v5"`
static BARE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:[\w.]+\s+)?"([^"\s]+)"\s*(?://.*)?$"#).expect("valid bare path regex")
});

/// Extracts the imported package path.
///
/// # Examples
///
/// ```
/// use modscout_go::statement::extract_root;
///
/// assert_eq!(extract_root(r#"import "net/http""#).as_deref(), Some("net/http"));
/// assert_eq!(
///     extract_root(r#"import chi "github.com/go-chi/chi/v5""#).as_deref(),
///     Some("github.com/go-chi/chi/v5")
/// );
/// assert_eq!(extract_root(r#""github.com/google/uuid""#).as_deref(), Some("github.com/google/uuid"));
/// assert_eq!(extract_root("x := 1"), None);
/// ```
pub fn extract_root(statement: &str) -> Option<String> {
    first_capture(&[&SINGLE_IMPORT, &BLOCK_IMPORT, &BARE_PATH], statement)
}

/// Legacy relative imports (`./util`) point into the working tree.
pub fn is_relative(path: &str) -> bool {
    path.starts_with("./") || path.starts_with("../")
}
