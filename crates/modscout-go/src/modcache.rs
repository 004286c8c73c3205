//! Go module cache lookup.
//!
//! Downloaded modules live in `<GOMODCACHE>/<escaped path>@<version>`,
//! where uppercase letters of the module path are escaped as `!lowercase`.

use std::path::{Path, PathBuf};

/// Escapes a module path the way the module cache stores it on disk.
///
/// # Examples
///
/// ```
/// use modscout_go::modcache::escape_module_path;
///
/// assert_eq!(
///     escape_module_path("github.com/BurntSushi/toml"),
///     "github.com/!burnt!sushi/toml"
/// );
/// ```
pub fn escape_module_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len() + 4);
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            escaped.push('!');
            escaped.push(c.to_ascii_lowercase());
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// A module cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModCache {
    root: PathBuf,
}

impl GoModCache {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$GOMODCACHE`, else `$GOPATH/pkg/mod`, else `~/go/pkg/mod`.
    pub fn discover() -> Option<Self> {
        if let Some(dir) = std::env::var_os("GOMODCACHE").filter(|d| !d.is_empty()) {
            return Some(Self::with_root(dir));
        }
        if let Some(gopath) = std::env::var_os("GOPATH").filter(|d| !d.is_empty()) {
            // first entry of a list-valued GOPATH
            let first = std::env::split_paths(&gopath).next()?;
            return Some(Self::with_root(first.join("pkg").join("mod")));
        }
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(|home| Self::with_root(PathBuf::from(home).join("go").join("pkg").join("mod")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of `module_path` at `version`. When that exact version is
    /// absent, the lexically highest cached version is used instead.
    pub fn module_dir(&self, module_path: &str, version: &str) -> Option<PathBuf> {
        let escaped = escape_module_path(module_path);
        let exact = self
            .root
            .join(format!("{escaped}@{}", escape_module_path(version)));
        if exact.is_dir() {
            return Some(exact);
        }

        let relative = Path::new(&escaped);
        let parent = self.root.join(relative.parent()?);
        let prefix = format!("{}@", relative.file_name()?.to_str()?);
        let mut cached: Vec<PathBuf> = std::fs::read_dir(parent)
            .ok()?
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.is_dir()
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();
        cached.sort();
        let fallback = cached.pop();
        if fallback.is_some() {
            tracing::debug!(module = module_path, version, "exact version not cached, using {:?}", fallback);
        }
        fallback
    }

    /// Directory of package `package_path` inside the cached module.
    pub fn package_dir(
        &self,
        module_path: &str,
        version: &str,
        package_path: &str,
    ) -> Option<PathBuf> {
        let module_dir = self.module_dir(module_path, version)?;
        let subpath = package_path
            .strip_prefix(module_path)?
            .trim_start_matches('/');
        let dir = if subpath.is_empty() {
            module_dir
        } else {
            module_dir.join(subpath)
        };
        dir.is_dir().then_some(dir)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;

    /// Writes `<cache>/<escaped module>@<version>/<file>` and returns the module dir.
    pub(crate) fn cache_module(
        cache: &Path,
        module_path: &str,
        version: &str,
        files: &[(&str, &str)],
    ) -> PathBuf {
        let dir = cache.join(format!("{}@{version}", escape_module_path(module_path)));
        for (name, content) in files {
            let file = dir.join(name);
            fs::create_dir_all(file.parent().unwrap()).unwrap();
            fs::write(file, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_escape_module_path() {
        assert_eq!(escape_module_path("github.com/User/Repo"), "github.com/!user/!repo");
        assert_eq!(escape_module_path("github.com/gin-gonic/gin"), "github.com/gin-gonic/gin");
        assert_eq!(escape_module_path("github.com/MyUser/MyRepo"), "github.com/!my!user/!my!repo");
    }

    #[test]
    fn test_module_dir_exact_version() {
        let cache = tempfile::tempdir().unwrap();
        let dir = cache_module(
            cache.path(),
            "github.com/Masterminds/semver/v3",
            "v3.2.1",
            &[("version.go", "package semver\n")],
        );
        let modcache = GoModCache::with_root(cache.path());
        assert_eq!(
            modcache.module_dir("github.com/Masterminds/semver/v3", "v3.2.1"),
            Some(dir)
        );
    }

    #[test]
    fn test_module_dir_falls_back_to_highest_cached() {
        let cache = tempfile::tempdir().unwrap();
        cache_module(cache.path(), "github.com/google/uuid", "v1.5.0", &[("uuid.go", "")]);
        let newest =
            cache_module(cache.path(), "github.com/google/uuid", "v1.6.0", &[("uuid.go", "")]);
        let modcache = GoModCache::with_root(cache.path());
        assert_eq!(modcache.module_dir("github.com/google/uuid", "v1.4.0"), Some(newest));
        assert_eq!(modcache.module_dir("github.com/google/other", "v1.0.0"), None);
    }

    #[test]
    fn test_package_dir() {
        let cache = tempfile::tempdir().unwrap();
        let dir = cache_module(
            cache.path(),
            "github.com/go-chi/chi/v5",
            "v5.0.12",
            &[("chi.go", ""), ("middleware/logger.go", "")],
        );
        let modcache = GoModCache::with_root(cache.path());
        assert_eq!(
            modcache.package_dir("github.com/go-chi/chi/v5", "v5.0.12", "github.com/go-chi/chi/v5/middleware"),
            Some(dir.join("middleware"))
        );
        assert_eq!(
            modcache.package_dir("github.com/go-chi/chi/v5", "v5.0.12", "github.com/go-chi/chi/v5"),
            Some(dir)
        );
        assert_eq!(
            modcache.package_dir("github.com/go-chi/chi/v5", "v5.0.12", "github.com/go-chi/chi/v5/render"),
            None
        );
    }
}
