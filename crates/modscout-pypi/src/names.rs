//! Distribution names versus import names.
//!
//! A requirement declares a *distribution* (`scikit-learn`) while code imports
//! a *module* (`sklearn`). Declared names are compared after PEP 503
//! normalization, with a table of well-known import aliases on top.

/// Import name → distribution name for packages whose names differ.
const IMPORT_ALIASES: &[(&str, &str)] = &[
    ("attr", "attrs"),
    ("bs4", "beautifulsoup4"),
    ("cv2", "opencv-python"),
    ("dateutil", "python-dateutil"),
    ("dotenv", "python-dotenv"),
    ("fitz", "pymupdf"),
    ("google.protobuf", "protobuf"),
    ("jose", "python-jose"),
    ("jwt", "pyjwt"),
    ("magic", "python-magic"),
    ("MySQLdb", "mysqlclient"),
    ("OpenSSL", "pyopenssl"),
    ("PIL", "pillow"),
    ("pkg_resources", "setuptools"),
    ("psycopg2", "psycopg2-binary"),
    ("serial", "pyserial"),
    ("skimage", "scikit-image"),
    ("sklearn", "scikit-learn"),
    ("slugify", "python-slugify"),
    ("telegram", "python-telegram-bot"),
    ("win32api", "pywin32"),
    ("yaml", "pyyaml"),
    ("zmq", "pyzmq"),
];

/// PEP 503 normalization: lowercase, runs of `-`, `_` and `.` become `-`.
///
/// # Examples
///
/// ```
/// use modscout_pypi::names::normalize;
///
/// assert_eq!(normalize("Django_REST.framework"), "django-rest-framework");
/// assert_eq!(normalize("ruamel.yaml"), "ruamel-yaml");
/// ```
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            pending_separator = true;
            continue;
        }
        if pending_separator && !out.is_empty() {
            out.push('-');
        }
        pending_separator = false;
        out.extend(c.to_lowercase());
    }
    out
}

/// Distribution names that may provide `import_name`, most likely first.
pub fn candidate_distributions(import_name: &str) -> Vec<String> {
    let mut candidates = vec![normalize(import_name)];
    if let Some((_, dist)) = IMPORT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == import_name || alias.eq_ignore_ascii_case(import_name))
    {
        let dist = normalize(dist);
        if !candidates.contains(&dist) {
            candidates.push(dist);
        }
    }
    candidates
}

/// Import name under which `distribution` is usually imported.
pub fn import_name_of(distribution: &str) -> String {
    let normalized = normalize(distribution);
    IMPORT_ALIASES
        .iter()
        .find(|(_, dist)| normalize(dist) == normalized)
        .map_or_else(
            || normalized.replace('-', "_"),
            |(alias, _)| (*alias).to_string(),
        )
}
