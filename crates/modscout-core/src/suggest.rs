/// Maximum number of suggestions attached to an unresolved import.
pub const MAX_SUGGESTIONS: usize = 5;

/// Proposes near-matches for an unresolved identifier.
///
/// A candidate matches when either string contains the other (case-sensitive).
/// Declared dependencies are listed before standard-library identifiers; within
/// each source the discovery order is kept. Duplicates are dropped and the
/// result is capped at [`MAX_SUGGESTIONS`].
///
/// # Examples
///
/// ```
/// use modscout_core::suggest::suggest;
///
/// let declared = ["lodash", "lodash-es", "react"];
/// let stdlib = ["assert", "fs"];
/// let found = suggest("lodash.merge", declared, stdlib);
/// assert_eq!(found, vec!["lodash"]);
/// ```
pub fn suggest<'a, 'b: 'a, D, S>(target: &str, declared: D, stdlib: S) -> Vec<String>
where
    D: IntoIterator<Item = &'a str>,
    S: IntoIterator<Item = &'b str>,
{
    if target.is_empty() {
        return Vec::new();
    }

    let mut suggestions: Vec<String> = Vec::with_capacity(MAX_SUGGESTIONS);

    let stdlib = stdlib.into_iter().map(|name| -> &'a str { name });
    for candidate in declared.into_iter().chain(stdlib) {
        if suggestions.len() >= MAX_SUGGESTIONS {
            break;
        }
        if candidate.is_empty() || candidate == target {
            continue;
        }
        let related = candidate.contains(target) || target.contains(candidate);
        if related && !suggestions.iter().any(|s| s == candidate) {
            suggestions.push(candidate.to_string());
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bidirectional_containment() {
        let found = suggest("react-dom-extra", ["react", "react-dom", "vue"], []);
        assert_eq!(found, vec!["react", "react-dom"]);

        let found = suggest("dom", ["react", "react-dom", "vue"], []);
        assert_eq!(found, vec!["react-dom"]);
    }

    #[test]
    fn test_declared_before_stdlib() {
        let found = suggest("path", ["path-browserify"], ["path"]);
        assert_eq!(found, vec!["path-browserify"]);

        let found = suggest("pathlib2", ["pathlib2-compat"], ["pathlib"]);
        assert_eq!(found, vec!["pathlib2-compat", "pathlib"]);
    }

    #[test]
    fn test_case_sensitive() {
        let found = suggest("Lodash", ["lodash"], []);
        assert!(found.is_empty());
    }

    #[test]
    fn test_capped_at_five() {
        let declared = ["ab1", "ab2", "ab3", "ab4", "ab5", "ab6", "ab7"];
        let found = suggest("ab", declared, ["ab8"]);
        assert_eq!(found.len(), MAX_SUGGESTIONS);
        assert_eq!(found[0], "ab1");
    }

    #[test]
    fn test_deduplicates() {
        let found = suggest("http", ["http-client"], ["http-client", "http2"]);
        assert_eq!(found, vec!["http-client", "http2"]);
    }

    #[test]
    fn test_borrowed_declared_with_static_stdlib() {
        static STDLIB: [&str; 2] = ["json", "jsonschema_stub"];
        let declared: Vec<String> = vec!["orjson".to_string(), "ujson".to_string()];
        let found = suggest("json", declared.iter().map(String::as_str), STDLIB.iter().copied());
        assert_eq!(found, vec!["orjson", "ujson", "jsonschema_stub"]);
    }

    #[test]
    fn test_no_match() {
        let found = suggest("totally-fake-pkg-9", ["react", "vue"], ["fs", "path"]);
        assert!(found.is_empty());
    }
}
