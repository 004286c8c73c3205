//! Static standard-library tables.
//!
//! Each ecosystem crate declares its curated table as a `&'static` slice and
//! wraps it in a [`StandardLibrary`] built once in a `Lazy` static.

use std::collections::HashMap;

use crate::types::Category;

/// One curated standard-library unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdlibEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
}

impl StdlibEntry {
    pub const fn new(name: &'static str, description: &'static str, category: Category) -> Self {
        Self {
            name,
            description,
            category,
        }
    }
}

/// Description returned by [`StandardLibrary::describe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdlibInfo {
    pub description: &'static str,
    pub category: Category,
}

/// Immutable lookup over a curated standard-library table.
///
/// Besides exact membership, an identifier is accepted when:
/// - it carries the ecosystem's alias prefix (e.g. `node:fs`), or
/// - one of its path prefixes, split on the ecosystem's separator, is a
///   member (e.g. `os.path` → `os`, `net/http/httptest` → `net/http`).
///
/// # Examples
///
/// ```
/// use modscout_core::stdlib::{StandardLibrary, StdlibEntry};
/// use modscout_core::Category;
///
/// static ENTRIES: &[StdlibEntry] = &[
///     StdlibEntry::new("fs", "File system access", Category::Utility),
/// ];
///
/// let stdlib = StandardLibrary::new(ENTRIES)
///     .with_alias_prefix("node:")
///     .with_separator("/");
///
/// assert!(stdlib.is_standard_library("fs"));
/// assert!(stdlib.is_standard_library("node:fs"));
/// assert!(stdlib.is_standard_library("fs/promises"));
/// assert!(!stdlib.is_standard_library("fsevents"));
/// ```
#[derive(Debug)]
pub struct StandardLibrary {
    entries: &'static [StdlibEntry],
    index: HashMap<&'static str, usize>,
    alias_prefix: Option<&'static str>,
    separator: Option<&'static str>,
}

impl StandardLibrary {
    pub fn new(entries: &'static [StdlibEntry]) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.name, i))
            .collect();

        Self {
            entries,
            index,
            alias_prefix: None,
            separator: None,
        }
    }

    #[must_use]
    pub fn with_alias_prefix(mut self, prefix: &'static str) -> Self {
        self.alias_prefix = Some(prefix);
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: &'static str) -> Self {
        self.separator = Some(separator);
        self
    }

    pub fn entries(&self) -> &'static [StdlibEntry] {
        self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_standard_library(&self, identifier: &str) -> bool {
        self.lookup(identifier).is_some()
    }

    pub fn describe(&self, identifier: &str) -> Option<StdlibInfo> {
        self.lookup(identifier).map(|entry| StdlibInfo {
            description: entry.description,
            category: entry.category,
        })
    }

    /// Finds the most specific entry covering `identifier`.
    pub fn lookup(&self, identifier: &str) -> Option<&'static StdlibEntry> {
        let identifier = identifier.trim();
        let stripped = self
            .alias_prefix
            .and_then(|prefix| identifier.strip_prefix(prefix))
            .unwrap_or(identifier);

        if stripped.is_empty() {
            return None;
        }

        if let Some(&i) = self.index.get(stripped) {
            return Some(&self.entries[i]);
        }

        let separator = self.separator?;
        let mut candidate = stripped;
        while let Some(pos) = candidate.rfind(separator) {
            candidate = &candidate[..pos];
            if let Some(&i) = self.index.get(candidate) {
                return Some(&self.entries[i]);
            }
        }
        None
    }
}
