//! Resource handles: named, openable byte-stream sources
//!
//! A handle is cheap to build and is discarded once a lookup is done. Handles
//! never cache the outcome of `exists()`.

use miette::Diagnostic;
use percent_encoding::percent_decode_str;
use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::core::classpath::{file_uri, Classpath, Located};
use crate::core::path::{clean_path, normalize};

/// Prefix selecting a classpath lookup in a location string
pub const CLASSPATH_URL_PREFIX: &str = "classpath:";

/// Errors raised by resource handles
#[derive(Debug, Error, Diagnostic)]
pub enum ResourceError {
    #[error("Resource path [{path}] escapes its root and cannot be normalized")]
    #[diagnostic(
        code(xsdr::resource::invalid_path),
        help("the path climbs above its root with '..' segments")
    )]
    InvalidPath { path: String },

    #[error("Malformed URL '{url}': {source}")]
    #[diagnostic(code(xsdr::resource::malformed_url))]
    MalformedUrl {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Unsupported URL scheme '{scheme}'")]
    #[diagnostic(
        code(xsdr::resource::unsupported_scheme),
        help("only file: and classpath: URLs can be read")
    )]
    UnsupportedScheme { scheme: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(xsdr::resource::io))]
    Io(#[from] io::Error),
}

impl ResourceError {
    fn into_io(self) -> io::Error {
        match self {
            ResourceError::Io(e) => e,
            other => {
                let kind = if matches!(other, ResourceError::UnsupportedScheme { .. }) {
                    io::ErrorKind::Unsupported
                } else {
                    io::ErrorKind::InvalidInput
                };
                io::Error::new(kind, other)
            }
        }
    }
}

/// A named byte-stream source
pub trait Resource: fmt::Debug {
    /// Whether the resource can be found
    ///
    /// An `Err` means the existence check itself could not be carried out.
    fn exists(&self) -> Result<bool, ResourceError>;

    /// Open the resource for reading
    fn open(&self) -> io::Result<Box<dyn Read>>;

    /// A handle for `relative`, resolved against this resource's location
    fn create_relative(&self, relative: &str) -> Result<Box<dyn Resource>, ResourceError>;

    /// URI identifying this resource, used as base URI for its own imports
    fn uri(&self) -> String;
}

fn not_found(what: impl fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} cannot be opened because it does not exist", what))
}

/// Directory part of a `/`-separated path, including the trailing slash
fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "",
    }
}

// ---------------------------------------------------------------------------
// Classpath
// ---------------------------------------------------------------------------

/// A `classpath:` resource
///
/// The path is cleaned leniently: `..` above the root is dropped.
#[derive(Debug, Clone)]
pub struct ClasspathResource {
    classpath: Arc<Classpath>,
    path: String,
}

impl ClasspathResource {
    pub fn new(classpath: Arc<Classpath>, path: &str) -> Self {
        Self {
            classpath,
            path: clean_path(path),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn locate(&self) -> Option<Located> {
        self.classpath.find(&self.path)
    }
}

impl Resource for ClasspathResource {
    fn exists(&self) -> Result<bool, ResourceError> {
        Ok(self.locate().is_some())
    }

    fn open(&self) -> io::Result<Box<dyn Read>> {
        match self.locate() {
            Some(located) => located.open(),
            None => Err(not_found(format!("class path resource [{}]", self.path))),
        }
    }

    fn create_relative(&self, relative: &str) -> Result<Box<dyn Resource>, ResourceError> {
        let joined = format!("{}{}", parent_of(&self.path), relative);
        Ok(Box::new(ClasspathResource::new(self.classpath.clone(), &joined)))
    }

    fn uri(&self) -> String {
        match self.locate() {
            Some(located) => located.uri(),
            None => format!("{}/{}", CLASSPATH_URL_PREFIX, self.path),
        }
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// A bare location rooted at the classpath root
///
/// The location is made absolute and normalized strictly, so a path such
/// as `../common.xsd` is invalid rather than absent: `exists()` reports
/// [`ResourceError::InvalidPath`].
#[derive(Debug, Clone)]
pub struct ContextResource {
    classpath: Arc<Classpath>,
    path: String,
}

impl ContextResource {
    pub fn new(classpath: Arc<Classpath>, path: &str) -> Self {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        Self { classpath, path }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn resolved(&self) -> Result<ClasspathResource, ResourceError> {
        let normalized = normalize(&self.path).ok_or_else(|| ResourceError::InvalidPath {
            path: self.path.clone(),
        })?;
        Ok(ClasspathResource::new(self.classpath.clone(), &normalized))
    }
}

impl Resource for ContextResource {
    fn exists(&self) -> Result<bool, ResourceError> {
        self.resolved()?.exists()
    }

    fn open(&self) -> io::Result<Box<dyn Read>> {
        self.resolved().map_err(ResourceError::into_io)?.open()
    }

    fn create_relative(&self, relative: &str) -> Result<Box<dyn Resource>, ResourceError> {
        let joined = format!("{}{}", parent_of(&self.path), relative);
        Ok(Box::new(ContextResource::new(self.classpath.clone(), &joined)))
    }

    fn uri(&self) -> String {
        match self.resolved() {
            Ok(resource) => resource.uri(),
            Err(_) => format!("{}{}", CLASSPATH_URL_PREFIX, self.path),
        }
    }
}

// ---------------------------------------------------------------------------
// Filesystem
// ---------------------------------------------------------------------------

/// A plain file on disk
#[derive(Debug, Clone)]
pub struct FileSystemResource {
    path: PathBuf,
}

impl FileSystemResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Resource for FileSystemResource {
    fn exists(&self) -> Result<bool, ResourceError> {
        Ok(self.path.is_file())
    }

    fn open(&self) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(std::fs::File::open(&self.path)?))
    }

    fn create_relative(&self, relative: &str) -> Result<Box<dyn Resource>, ResourceError> {
        let base = self.path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Box::new(FileSystemResource::new(base.join(relative))))
    }

    fn uri(&self) -> String {
        file_uri(&self.path)
    }
}

// ---------------------------------------------------------------------------
// URL
// ---------------------------------------------------------------------------

/// A resource addressed by URL
///
/// `file:` and `classpath:` URLs are readable; other schemes can be built
/// and joined but not read.
#[derive(Debug, Clone)]
pub struct UrlResource {
    url: Url,
    classpath: Arc<Classpath>,
}

impl UrlResource {
    pub fn parse(url: &str, classpath: Arc<Classpath>) -> Result<Self, ResourceError> {
        let parsed = Url::parse(url).map_err(|source| ResourceError::MalformedUrl {
            url: url.to_string(),
            source: source.into(),
        })?;
        Ok(Self::new(parsed, classpath))
    }

    pub fn new(url: Url, classpath: Arc<Classpath>) -> Self {
        Self { url, classpath }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn target(&self) -> Result<Box<dyn Resource>, ResourceError> {
        match self.url.scheme() {
            "file" => {
                let path = self.url.to_file_path().map_err(|_| {
                    ResourceError::Io(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("'{}' does not denote a local file", self.url),
                    ))
                })?;
                Ok(Box::new(FileSystemResource::new(path)))
            }
            "classpath" => {
                let path = percent_decode_str(self.url.path())
                    .decode_utf8()
                    .map_err(|source| ResourceError::MalformedUrl {
                        url: self.url.to_string(),
                        source: source.into(),
                    })?;
                Ok(Box::new(ClasspathResource::new(self.classpath.clone(), &path)))
            }
            other => Err(ResourceError::UnsupportedScheme {
                scheme: other.to_string(),
            }),
        }
    }
}

impl Resource for UrlResource {
    fn exists(&self) -> Result<bool, ResourceError> {
        self.target()?.exists()
    }

    fn open(&self) -> io::Result<Box<dyn Read>> {
        self.target().map_err(ResourceError::into_io)?.open()
    }

    fn create_relative(&self, relative: &str) -> Result<Box<dyn Resource>, ResourceError> {
        let joined = self.url.join(relative).map_err(|source| ResourceError::MalformedUrl {
            url: relative.to_string(),
            source: source.into(),
        })?;
        Ok(Box::new(UrlResource::new(joined, self.classpath.clone())))
    }

    fn uri(&self) -> String {
        self.url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn bundled() -> Arc<Classpath> {
        Arc::new(Classpath::bundled())
    }

    fn read(resource: &dyn Resource) -> String {
        let mut out = String::new();
        resource.open().unwrap().read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_context_resource_escaping_root_is_invalid() {
        let resource = ContextResource::new(bundled(), "../common.xsd");
        assert_eq!(resource.path(), "/../common.xsd");

        let err = resource.exists().unwrap_err();
        assert!(matches!(err, ResourceError::InvalidPath { .. }));
        assert!(err.to_string().contains("[/../common.xsd]"));

        let open_err = resource.open().err().unwrap();
        assert_eq!(open_err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_context_resource_inside_root() {
        let resource = ContextResource::new(bundled(), "xsd/order/../common.xsd");
        assert!(resource.exists().unwrap());
        assert!(read(&resource).contains("OrderData"));
        assert_eq!(resource.uri(), "classpath:/xsd/common.xsd");
    }

    #[test]
    fn test_classpath_resource_clamps_escaping_root() {
        let resource = ClasspathResource::new(bundled(), "/../xsd/common.xsd");
        assert_eq!(resource.path(), "xsd/common.xsd");
        assert!(resource.exists().unwrap());
    }

    #[test]
    fn test_classpath_resource_create_relative() {
        let resource = ClasspathResource::new(bundled(), "xsd/order/order-webservice.xsd");
        let sibling = resource.create_relative("../common.xsd").unwrap();
        assert!(sibling.exists().unwrap());
        assert_eq!(sibling.uri(), "classpath:/xsd/common.xsd");
    }

    #[test]
    fn test_missing_classpath_resource_fails_to_open() {
        let resource = ClasspathResource::new(bundled(), "xsd/nope.xsd");
        assert!(!resource.exists().unwrap());
        assert_eq!(resource.open().err().unwrap().kind(), io::ErrorKind::NotFound);
        assert_eq!(resource.uri(), "classpath:/xsd/nope.xsd");
    }

    #[test]
    fn test_url_resource_classpath_scheme_relative() {
        let base = UrlResource::parse("classpath:/xsd/order/order-webservice.xsd", bundled()).unwrap();
        let common = base.create_relative("../common.xsd").unwrap();
        assert_eq!(common.uri(), "classpath:/xsd/common.xsd");
        assert!(common.exists().unwrap());
        assert!(read(common.as_ref()).contains("OrderData"));
    }

    #[test]
    fn test_url_resource_file_scheme() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("common.xsd"), "<common/>").unwrap();
        let base_path = dir.path().join("a/main.xsd");
        fs::write(&base_path, "<main/>").unwrap();

        let base_url = Url::from_file_path(&base_path).unwrap();
        let base = UrlResource::new(base_url, bundled());
        assert!(base.exists().unwrap());

        let common = base.create_relative("../common.xsd").unwrap();
        assert!(common.exists().unwrap());
        assert_eq!(read(common.as_ref()), "<common/>");
    }

    #[test]
    fn test_url_resource_classpath_scheme_decodes_path() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("my schemas")).unwrap();
        fs::write(dir.path().join("my schemas/b.xsd"), "<b/>").unwrap();
        let classpath = Arc::new(Classpath::with_directories([dir.path()]));

        let base = UrlResource::parse("classpath:/my schemas/a.xsd", classpath.clone()).unwrap();
        assert_eq!(base.url().path(), "/my%20schemas/a.xsd");

        let sibling = base.create_relative("b.xsd").unwrap();
        assert!(sibling.exists().unwrap());
        assert_eq!(read(sibling.as_ref()), "<b/>");

        let direct = UrlResource::parse("classpath:/my%20schemas/b.xsd", classpath).unwrap();
        assert!(direct.exists().unwrap());
    }

    #[test]
    fn test_url_resource_classpath_scheme_invalid_escape() {
        let resource = UrlResource::parse("classpath:/bad%FFname.xsd", bundled()).unwrap();
        assert!(matches!(
            resource.exists(),
            Err(ResourceError::MalformedUrl { .. })
        ));
    }

    #[test]
    fn test_url_resource_malformed() {
        let err = UrlResource::parse("not a url", bundled()).unwrap_err();
        assert!(matches!(err, ResourceError::MalformedUrl { .. }));
    }

    #[test]
    fn test_url_resource_unsupported_scheme() {
        let resource = UrlResource::parse("http://example.com/common.xsd", bundled()).unwrap();
        assert!(matches!(
            resource.exists(),
            Err(ResourceError::UnsupportedScheme { .. })
        ));
        assert_eq!(resource.open().err().unwrap().kind(), io::ErrorKind::Unsupported);
    }

    #[test]
    fn test_filesystem_resource() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("main.xsd");
        fs::write(&path, "<main/>").unwrap();
        fs::write(dir.path().join("other.xsd"), "<other/>").unwrap();

        let resource = FileSystemResource::new(&path);
        assert!(resource.exists().unwrap());
        assert!(resource.uri().starts_with("file:"));

        let other = resource.create_relative("other.xsd").unwrap();
        assert_eq!(read(other.as_ref()), "<other/>");
        assert!(!resource.create_relative("gone.xsd").unwrap().exists().unwrap());
    }
}
