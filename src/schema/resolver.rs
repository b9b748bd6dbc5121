//! Schema import resolution
//!
//! [`ClasspathUriResolver`] locates the document behind an
//! [`ImportReference`] by trying, in order:
//!
//! 1. the schema location as given, through the [`ResourceLoader`]
//! 2. the schema location relative to the importing document's base URI
//! 3. the schema location on the classpath (`classpath:/<location>`)
//!
//! and hands the reference to a fallback [`UriResolver`] when none of them
//! finds anything. A location such as `../common.xsd` cannot be normalized
//! against the loader's root; its existence check fails instead of
//! returning false, and that failure counts as "not found" so the later
//! strategies still get their turn.

use miette::Diagnostic;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

use crate::core::classpath::file_uri;
use crate::core::loader::{is_url, ResourceLoader};
use crate::core::resource::{Resource, ResourceError, CLASSPATH_URL_PREFIX};
use crate::schema::reference::{ImportReference, InputSource};

/// Errors surfaced by a resolver
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    /// The resource was found but could not be read
    #[error("Could not resolve location '{location}'")]
    #[diagnostic(code(xsdr::resolve::open))]
    Open {
        location: String,
        #[source]
        source: io::Error,
    },

    /// No strategy could produce the document
    #[error("Unable to resolve schema location '{schema_location}': {reason}")]
    #[diagnostic(
        code(xsdr::resolve::unresolvable),
        help("add the directory holding the schema with --classpath, or pass the importing document's URI with --base")
    )]
    Unresolvable {
        schema_location: String,
        reason: String,
    },
}

/// Resolves import references to readable documents
pub trait UriResolver {
    fn resolve_entity(&self, reference: &ImportReference) -> Result<InputSource, ResolveError>;
}

impl<R: UriResolver + ?Sized> UriResolver for &R {
    fn resolve_entity(&self, reference: &ImportReference) -> Result<InputSource, ResolveError> {
        (**self).resolve_entity(reference)
    }
}

impl<R: UriResolver + ?Sized> UriResolver for Box<R> {
    fn resolve_entity(&self, reference: &ImportReference) -> Result<InputSource, ResolveError> {
        (**self).resolve_entity(reference)
    }
}

/// Lookup strategies of [`ClasspathUriResolver`], in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Direct,
    BaseRelative,
    ClasspathPrefixed,
}

impl Strategy {
    pub const ORDER: [Strategy; 3] = [
        Strategy::Direct,
        Strategy::BaseRelative,
        Strategy::ClasspathPrefixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Direct => "direct",
            Strategy::BaseRelative => "base-relative",
            Strategy::ClasspathPrefixed => "classpath-prefixed",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running one strategy
#[derive(Debug)]
enum Lookup {
    Found(Box<dyn Resource>),
    Missing,
    Skipped,
    Failed(ResourceError),
}

/// What a strategy reported, as shown by [`ClasspathUriResolver::trace`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Found, with the resource URI
    Found(String),
    Missing,
    /// Not applicable (no base URI)
    Skipped,
    /// The lookup itself failed
    Failed(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Found(uri) => write!(f, "found {}", uri),
            Outcome::Missing => f.write_str("missing"),
            Outcome::Skipped => f.write_str("skipped"),
            Outcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub strategy: Strategy,
    pub outcome: Outcome,
}

/// Resolver with classpath-aware lookups and a fallback
pub struct ClasspathUriResolver<L, D = DefaultUriResolver> {
    loader: L,
    fallback: D,
}

impl<L: ResourceLoader> ClasspathUriResolver<L> {
    /// Resolver falling back to [`DefaultUriResolver`]
    pub fn new(loader: L) -> Self {
        Self::with_fallback(loader, DefaultUriResolver)
    }
}

impl<L: ResourceLoader, D: UriResolver> ClasspathUriResolver<L, D> {
    pub fn with_fallback(loader: L, fallback: D) -> Self {
        Self { loader, fallback }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Run the strategies without opening anything
    ///
    /// Stops after the first strategy that finds the resource.
    pub fn trace(&self, reference: &ImportReference) -> Vec<Attempt> {
        let mut attempts = Vec::new();
        for strategy in Strategy::ORDER {
            let outcome = match self.attempt(strategy, reference) {
                Lookup::Found(resource) => Outcome::Found(resource.uri()),
                Lookup::Missing => Outcome::Missing,
                Lookup::Skipped => Outcome::Skipped,
                Lookup::Failed(err) => Outcome::Failed(err.to_string()),
            };
            let done = matches!(outcome, Outcome::Found(_));
            attempts.push(Attempt { strategy, outcome });
            if done {
                break;
            }
        }
        attempts
    }

    /// First strategy that finds the resource, with the resource
    pub fn locate(&self, reference: &ImportReference) -> Option<(Strategy, Box<dyn Resource>)> {
        for strategy in Strategy::ORDER {
            match self.attempt(strategy, reference) {
                Lookup::Found(resource) => return Some((strategy, resource)),
                Lookup::Missing => {
                    trace!(%strategy, location = reference.schema_location(), "not found");
                }
                Lookup::Skipped => {
                    trace!(%strategy, "skipped");
                }
                Lookup::Failed(err) => {
                    debug!(%strategy, location = reference.schema_location(), error = %err, "lookup failed, trying next strategy");
                }
            }
        }
        None
    }

    fn attempt(&self, strategy: Strategy, reference: &ImportReference) -> Lookup {
        let location = reference.schema_location();
        match strategy {
            Strategy::Direct => check(self.loader.get_resource(location)),
            Strategy::BaseRelative => {
                let Some(base) = reference.base_uri() else {
                    return Lookup::Skipped;
                };
                match self
                    .loader
                    .get_url_resource(base)
                    .and_then(|base| base.create_relative(location))
                {
                    Ok(resource) => check(resource),
                    Err(err) => Lookup::Failed(err),
                }
            }
            Strategy::ClasspathPrefixed => {
                let prefixed = format!("{}/{}", CLASSPATH_URL_PREFIX, location);
                check(self.loader.get_resource(&prefixed))
            }
        }
    }
}

impl<L: ResourceLoader, D: UriResolver> UriResolver for ClasspathUriResolver<L, D> {
    fn resolve_entity(&self, reference: &ImportReference) -> Result<InputSource, ResolveError> {
        if let Some((strategy, resource)) = self.locate(reference) {
            debug!(%strategy, uri = %resource.uri(), "resolved {}", reference.schema_location());
            return open_source(resource.as_ref());
        }

        debug!(location = reference.schema_location(), "no strategy matched, using fallback resolver");
        self.fallback.resolve_entity(reference)
    }
}

/// Existence check that treats an unnormalizable path as absent
fn check(resource: Box<dyn Resource>) -> Lookup {
    match resource.exists() {
        Ok(true) => Lookup::Found(resource),
        Ok(false) => Lookup::Missing,
        Err(ResourceError::InvalidPath { path }) => {
            trace!(%path, "path escapes its root, treating as absent");
            Lookup::Missing
        }
        Err(err) => Lookup::Failed(err),
    }
}

fn open_source(resource: &dyn Resource) -> Result<InputSource, ResolveError> {
    let uri = resource.uri();
    match resource.open() {
        Ok(stream) => Ok(InputSource::new(uri, stream)),
        Err(source) => Err(ResolveError::Open {
            location: uri,
            source,
        }),
    }
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

/// Plain URI resolution against the base URI
///
/// The location is resolved against the base URI (or, when the base is not
/// a URL, against the directory of the base file) unless it is an absolute
/// URL itself. Only local files can be read.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultUriResolver;

#[derive(Debug)]
enum Target {
    Url(Url),
    Path(PathBuf),
}

impl UriResolver for DefaultUriResolver {
    fn resolve_entity(&self, reference: &ImportReference) -> Result<InputSource, ResolveError> {
        let location = reference.schema_location();
        let unresolvable = |reason: String| ResolveError::Unresolvable {
            schema_location: location.to_string(),
            reason,
        };

        let target = match reference.base_uri() {
            Some(base) if !is_url(location) => resolve_against(base, location),
            _ => target_of(location),
        }
        .map_err(|e| unresolvable(e.to_string()))?;

        let path = match target {
            Target::Path(path) => path,
            Target::Url(url) if url.scheme() == "file" => url
                .to_file_path()
                .map_err(|_| unresolvable(format!("'{}' does not denote a local file", url)))?,
            Target::Url(url) => {
                return Err(unresolvable(format!(
                    "cannot read '{}': unsupported scheme '{}'",
                    url,
                    url.scheme()
                )))
            }
        };

        let file = File::open(&path)
            .map_err(|e| unresolvable(format!("{}: {}", path.display(), e)))?;
        Ok(InputSource::new(file_uri(&path), Box::new(file)))
    }
}

fn resolve_against(base: &str, location: &str) -> Result<Target, url::ParseError> {
    if is_url(base) {
        return Ok(Target::Url(Url::parse(base)?.join(location)?));
    }
    let dir = Path::new(base).parent().unwrap_or_else(|| Path::new(""));
    Ok(Target::Path(dir.join(location)))
}

fn target_of(location: &str) -> Result<Target, url::ParseError> {
    if is_url(location) {
        Ok(Target::Url(Url::parse(location)?))
    } else {
        Ok(Target::Path(PathBuf::from(location)))
    }
}
