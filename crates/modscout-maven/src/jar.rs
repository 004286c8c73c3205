//! Class listing of jar archives.
//!
//! Entries are read with `zip`. Nested (`Outer$Inner`) and synthetic
//! classes, `module-info` and `package-info` are not listed. Class headers
//! are decoded just far enough to read the access flags.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use modscout_core::{ExportDescriptor, ExportKind};
use zip::ZipArchive;

use crate::error::{MavenError, Result};

const CLASS_MAGIC: u32 = 0xCAFE_BABE;

const ACC_PUBLIC: u16 = 0x0001;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ANNOTATION: u16 = 0x2000;
const ACC_ENUM: u16 = 0x4000;

/// Top-level classes of a jar, by internal name (`com/acme/Widget`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JarIndex {
    path: PathBuf,
    classes: Vec<String>,
}

impl JarIndex {
    pub fn open(path: &Path) -> Result<Self> {
        let archive = open_archive(path)?;
        let mut classes: Vec<String> = archive
            .file_names()
            .filter_map(|name| name.strip_suffix(".class"))
            .filter(|name| !name.contains('$') && !name.starts_with("META-INF/"))
            .filter(|name| {
                let simple = name.rsplit('/').next().unwrap_or(name);
                simple != "module-info" && simple != "package-info"
            })
            .map(str::to_string)
            .collect();
        classes.sort();
        Ok(Self {
            path: path.to_path_buf(),
            classes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dotted names of every package holding at least one class.
    pub fn packages(&self) -> BTreeSet<String> {
        self.classes
            .iter()
            .filter_map(|class| class.rsplit_once('/'))
            .map(|(package, _)| package.replace('/', "."))
            .collect()
    }

    /// Longest package prefix shared by every class.
    pub fn common_package(&self) -> String {
        let mut packages = self.packages().into_iter();
        let Some(first) = packages.next() else {
            return String::new();
        };
        let mut common: Vec<String> = first.split('.').map(str::to_string).collect();
        for package in packages {
            let shared = common
                .iter()
                .zip(package.split('.'))
                .take_while(|(a, b)| a.as_str() == *b)
                .count();
            common.truncate(shared);
        }
        common.join(".")
    }

    /// Simple names of the classes directly inside `package`.
    pub fn classes_in(&self, package: &str) -> Vec<&str> {
        let prefix = internal_prefix(package);
        self.classes
            .iter()
            .filter_map(|class| class.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .collect()
    }

    /// Names of the packages one level below `package`.
    pub fn subpackages(&self, package: &str) -> Vec<String> {
        let prefix = internal_prefix(package);
        let children: BTreeSet<String> = self
            .classes
            .iter()
            .filter_map(|class| class.strip_prefix(&prefix))
            .filter_map(|rest| rest.split_once('/'))
            .map(|(child, _)| child.to_string())
            .collect();
        children.into_iter().collect()
    }

    /// Public classes of `package` with their kind read from the class header.
    pub fn exports(&self, package: &str) -> Result<Vec<ExportDescriptor>> {
        let mut archive = open_archive(&self.path)?;
        let prefix = internal_prefix(package);
        let mut exports = Vec::new();

        for simple in self.classes_in(package) {
            let entry = format!("{prefix}{simple}.class");
            let flags = match read_entry(&mut archive, &entry).map(|bytes| access_flags(&bytes)) {
                Ok(Some(flags)) => flags,
                Ok(None) => {
                    tracing::debug!("{}", MavenError::InvalidClassFile { entry });
                    ACC_PUBLIC
                }
                Err(e) => {
                    tracing::debug!("cannot read {entry}: {e}");
                    ACC_PUBLIC
                }
            };
            if flags & ACC_PUBLIC == 0 {
                continue;
            }
            exports.push(class_export(simple, flags));
        }
        Ok(exports)
    }
}

fn internal_prefix(package: &str) -> String {
    if package.is_empty() {
        String::new()
    } else {
        format!("{}/", package.replace('.', "/"))
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path)?;
    ZipArchive::new(file).map_err(|source| MavenError::JarError {
        path: path.display().to_string(),
        source,
    })
}

fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> Result<Vec<u8>> {
    let mut entry = archive.by_name(name).map_err(|source| MavenError::JarError {
        path: name.to_string(),
        source,
    })?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn class_export(name: &str, flags: u16) -> ExportDescriptor {
    let (kind, keyword) = if flags & ACC_ANNOTATION != 0 {
        (ExportKind::Interface, "@interface")
    } else if flags & ACC_INTERFACE != 0 {
        (ExportKind::Interface, "interface")
    } else if flags & ACC_ENUM != 0 {
        (ExportKind::Class, "enum")
    } else {
        (ExportKind::Class, "class")
    };
    ExportDescriptor::new(name, kind).with_signature(format!("{keyword} {name}"))
}

/// Big-endian cursor over a class file.
struct ClassReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ClassReader<'a> {
    const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let slice = self.bytes.get(self.pos..self.pos.checked_add(len)?)?;
        self.pos += len;
        Some(slice)
    }

    fn u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    fn u16(&mut self) -> Option<u16> {
        self.take(2).map(|b| u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Option<u32> {
        self.take(4).map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

/// Access flags of a class file, after skipping its constant pool.
pub fn access_flags(bytes: &[u8]) -> Option<u16> {
    let mut reader = ClassReader::new(bytes);
    if reader.u32()? != CLASS_MAGIC {
        return None;
    }
    // minor and major version
    reader.take(4)?;

    let count = reader.u16()?;
    let mut index = 1;
    while index < count {
        match reader.u8()? {
            1 => {
                let len = reader.u16()?;
                reader.take(usize::from(len))?;
            }
            3 | 4 | 9 | 10 | 11 | 12 | 17 | 18 => {
                reader.take(4)?;
            }
            // long and double take two slots
            5 | 6 => {
                reader.take(8)?;
                index += 1;
            }
            7 | 8 | 16 | 19 | 20 => {
                reader.take(2)?;
            }
            15 => {
                reader.take(3)?;
            }
            _ => return None,
        }
        index += 1;
    }
    reader.u16()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// A minimal class file: `this_class` constant plus a long constant.
    pub(crate) fn class_bytes(name: &str, flags: u16) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&CLASS_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 61]);
        bytes.extend_from_slice(&5u16.to_be_bytes());
        bytes.push(1);
        bytes.extend_from_slice(&(name.len() as u16).to_be_bytes());
        bytes.extend_from_slice(name.as_bytes());
        bytes.push(7);
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.push(5);
        bytes.extend_from_slice(&42u64.to_be_bytes());
        bytes.extend_from_slice(&flags.to_be_bytes());
        bytes
    }

    /// Writes a stored (uncompressed) jar with the given class entries.
    pub(crate) fn write_jar(path: &Path, classes: &[(&str, u16)]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut jar = zip::ZipWriter::new(File::create(path).unwrap());
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        jar.start_file("META-INF/MANIFEST.MF", options).unwrap();
        jar.write_all(b"Manifest-Version: 1.0\n").unwrap();
        for (name, flags) in classes {
            jar.start_file(format!("{name}.class"), options).unwrap();
            jar.write_all(&class_bytes(name, *flags)).unwrap();
        }
        jar.finish().unwrap();
    }

    fn sample_jar(dir: &Path) -> PathBuf {
        let path = dir.join("lib.jar");
        write_jar(
            &path,
            &[
                ("com/acme/util/Strings", ACC_PUBLIC),
                ("com/acme/util/Strings$Builder", ACC_PUBLIC),
                ("com/acme/util/Codec", ACC_PUBLIC | ACC_INTERFACE),
                ("com/acme/util/Color", ACC_PUBLIC | ACC_ENUM),
                ("com/acme/util/Hidden", 0),
                ("com/acme/util/package-info", ACC_INTERFACE),
                ("com/acme/util/io/Files", ACC_PUBLIC),
                ("com/acme/net/Client", ACC_PUBLIC),
                ("module-info", 0x8000),
            ],
        );
        path
    }

    #[test]
    fn test_index_filters_entries() {
        let dir = tempfile::tempdir().unwrap();
        let index = JarIndex::open(&sample_jar(dir.path())).unwrap();
        assert_eq!(
            index.classes_in("com.acme.util"),
            vec!["Codec", "Color", "Hidden", "Strings"]
        );
        assert_eq!(index.subpackages("com.acme.util"), vec!["io"]);
        assert_eq!(index.subpackages("com.acme"), vec!["net", "util"]);
        assert_eq!(index.common_package(), "com.acme");
    }

    #[test]
    fn test_exports_read_class_headers() {
        let dir = tempfile::tempdir().unwrap();
        let index = JarIndex::open(&sample_jar(dir.path())).unwrap();
        let exports = index.exports("com.acme.util").unwrap();
        let summary: Vec<(&str, ExportKind, &str)> = exports
            .iter()
            .map(|e| (e.name.as_str(), e.kind, e.signature.as_deref().unwrap()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Codec", ExportKind::Interface, "interface Codec"),
                ("Color", ExportKind::Class, "enum Color"),
                ("Strings", ExportKind::Class, "class Strings"),
            ]
        );
    }

    #[test]
    fn test_access_flags() {
        let flags = access_flags(&class_bytes("a/B", ACC_PUBLIC | ACC_ANNOTATION)).unwrap();
        assert_eq!(flags, ACC_PUBLIC | ACC_ANNOTATION);
        assert_eq!(access_flags(b"not a class"), None);
        assert_eq!(access_flags(&CLASS_MAGIC.to_be_bytes()), None);
    }

    #[test]
    fn test_not_a_jar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jar");
        std::fs::write(&path, b"plain text").unwrap();
        assert!(matches!(JarIndex::open(&path), Err(MavenError::JarError { .. })));
        assert!(matches!(
            JarIndex::open(&dir.path().join("missing.jar")),
            Err(MavenError::Io(_))
        ));
    }
}
