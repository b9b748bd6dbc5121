//! Classpath: ordered resource roots searched by relative path
//!
//! Entries are searched in order. Configured directories come first so a
//! project can shadow the schemas bundled into the binary.

use rust_embed::Embed;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::path::clean_path;

#[derive(Embed)]
#[folder = "resources/"]
struct BundledSchemas;

/// File extensions reported by [`Classpath::list`]
const LISTED_EXTENSIONS: &[&str] = &["xsd", "wsdl", "xml"];

/// A single classpath root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClasspathEntry {
    /// A directory on the local filesystem
    Directory(PathBuf),
    /// Schemas compiled into the binary
    Bundled,
}

impl fmt::Display for ClasspathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClasspathEntry::Directory(dir) => write!(f, "{}", dir.display()),
            ClasspathEntry::Bundled => write!(f, "<bundled>"),
        }
    }
}

/// Where a classpath lookup found its resource
#[derive(Debug, Clone)]
pub enum Located {
    File(PathBuf),
    Bundled { path: String, data: Cow<'static, [u8]> },
}

impl Located {
    pub fn open(&self) -> io::Result<Box<dyn Read>> {
        match self {
            Located::File(path) => Ok(Box::new(File::open(path)?)),
            Located::Bundled { data, .. } => Ok(Box::new(Cursor::new(data.clone()))),
        }
    }

    /// URI identifying the located resource
    ///
    /// Files get a `file:` URL so that relative references from inside them
    /// resolve on disk; bundled resources keep their `classpath:` address.
    pub fn uri(&self) -> String {
        match self {
            Located::File(path) => file_uri(path),
            Located::Bundled { path, .. } => format!("classpath:/{}", path),
        }
    }
}

/// A resource visible on the classpath
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClasspathListing {
    pub path: String,
    pub origin: ClasspathEntry,
}

/// Ordered set of resource roots
#[derive(Debug, Clone)]
pub struct Classpath {
    entries: Vec<ClasspathEntry>,
}

impl Default for Classpath {
    fn default() -> Self {
        Self::bundled()
    }
}

impl Classpath {
    pub fn new(entries: Vec<ClasspathEntry>) -> Self {
        Self { entries }
    }

    /// Classpath holding only the bundled schemas
    pub fn bundled() -> Self {
        Self::new(vec![ClasspathEntry::Bundled])
    }

    /// The given directories (in order) followed by the bundled schemas
    pub fn with_directories<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut entries: Vec<ClasspathEntry> = dirs
            .into_iter()
            .map(|d| ClasspathEntry::Directory(d.into()))
            .collect();
        entries.push(ClasspathEntry::Bundled);
        Self::new(entries)
    }

    pub fn entries(&self) -> &[ClasspathEntry] {
        &self.entries
    }

    /// Find a resource by classpath-relative path
    ///
    /// The path is cleaned first, so `..` segments can never reach outside a
    /// directory root.
    pub fn find(&self, path: &str) -> Option<Located> {
        let cleaned = clean_path(path);
        if cleaned.is_empty() || cleaned.ends_with('/') {
            return None;
        }

        self.entries.iter().find_map(|entry| match entry {
            ClasspathEntry::Directory(dir) => {
                let candidate = dir.join(&cleaned);
                candidate.is_file().then_some(Located::File(candidate))
            }
            ClasspathEntry::Bundled => BundledSchemas::get(&cleaned).map(|file| Located::Bundled {
                path: cleaned.clone(),
                data: file.data,
            }),
        })
    }

    /// List every schema-like resource with the entry that provides it
    ///
    /// Paths shadowed by an earlier entry are reported once.
    pub fn list(&self) -> Vec<ClasspathListing> {
        let mut seen: BTreeMap<String, ClasspathEntry> = BTreeMap::new();

        for entry in &self.entries {
            for path in entry_paths(entry) {
                seen.entry(path).or_insert_with(|| entry.clone());
            }
        }

        seen.into_iter()
            .map(|(path, origin)| ClasspathListing { path, origin })
            .collect()
    }
}

fn entry_paths(entry: &ClasspathEntry) -> Vec<String> {
    match entry {
        ClasspathEntry::Directory(dir) => WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_listed(e.path()))
            .filter_map(|e| {
                let relative = e.path().strip_prefix(dir).ok()?;
                let parts: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                Some(parts.join("/"))
            })
            .collect(),
        ClasspathEntry::Bundled => BundledSchemas::iter()
            .filter(|p| is_listed(Path::new(p.as_ref())))
            .map(|p| p.into_owned())
            .collect(),
    }
}

fn is_listed(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| LISTED_EXTENSIONS.contains(&e))
}

/// Render a filesystem path as a `file:` URL, falling back to the plain path
pub fn file_uri(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    url::Url::from_file_path(&absolute)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| absolute.display().to_string())
}
