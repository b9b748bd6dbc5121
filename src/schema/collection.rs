//! Schema collections: root schemas plus everything they reference
//!
//! Documents are scanned for `import`, `include` and `redefine` elements.
//! Each reference with a `schemaLocation` is resolved through a
//! [`UriResolver`], using the referring document's system id as base URI.
//!
//! Scanning is textual: comments and `annotation` blocks are removed first,
//! then the element tags are matched. A `>` inside an attribute value ends
//! the tag early. Documents are read as bytes; content that is not UTF-8
//! (an ISO-8859-1 schema, say) is scanned lossily, and the digest is taken
//! over the raw bytes.

use miette::Diagnostic;
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::loader::ResourceLoader;
use crate::schema::reference::{ImportReference, InputSource};
use crate::schema::resolver::{ResolveError, UriResolver};

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment regex is always valid"));

static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<(?:[A-Za-z_][\w.-]*:)?annotation\b(?:[^>]*/>|.*?</(?:[A-Za-z_][\w.-]*:)?annotation\s*>)",
    )
    .expect("annotation regex is always valid")
});

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:[A-Za-z_][\w.-]*:)?(import|include|redefine)\b([^>]*)>")
        .expect("reference regex is always valid")
});

static SCHEMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:[A-Za-z_][\w.-]*:)?schema\b([^>]*)>").expect("schema regex is always valid")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w.:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("attribute regex is always valid")
});

/// Errors raised while loading a schema collection
#[derive(Debug, Error, Diagnostic)]
pub enum CollectionError {
    #[error("Schema collection root '{location}' not found")]
    #[diagnostic(
        code(xsdr::collection::root_not_found),
        help("check the root location and the configured classpath (xsdr list)")
    )]
    RootNotFound { location: String },

    #[error("Failed to read schema '{system_id}'")]
    #[diagnostic(code(xsdr::collection::read))]
    Read {
        system_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to resolve '{schema_location}' referenced from '{referrer}'")]
    #[diagnostic(code(xsdr::collection::resolve))]
    Resolve {
        schema_location: String,
        referrer: String,
        #[source]
        #[diagnostic_source]
        source: ResolveError,
    },
}

/// Kind of cross-schema reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Import,
    Include,
    Redefine,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Import => write!(f, "import"),
            ReferenceKind::Include => write!(f, "include"),
            ReferenceKind::Redefine => write!(f, "redefine"),
        }
    }
}

/// A reference found in a schema document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaReference {
    pub kind: ReferenceKind,
    pub namespace: Option<String>,
    pub schema_location: Option<String>,
}

impl SchemaReference {
    /// Import reference for resolving this entry from `base_uri`
    pub fn to_import(&self, base_uri: &str) -> Option<ImportReference> {
        let location = self.schema_location.as_deref()?;
        let mut reference = ImportReference::new(location).with_base_uri(base_uri);
        if let Some(ns) = &self.namespace {
            reference = reference.with_namespace(ns.clone());
        }
        Some(reference)
    }
}

/// A loaded schema document
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDocument {
    pub system_id: String,
    pub target_namespace: Option<String>,
    pub references: Vec<SchemaReference>,
    /// SHA-256 of the content, hex encoded
    pub digest: String,
    #[serde(skip)]
    pub content: String,
}

impl SchemaDocument {
    /// Parse a document's namespace and references from its raw bytes
    pub fn parse(system_id: impl Into<String>, bytes: &[u8]) -> Self {
        let content = String::from_utf8_lossy(bytes).into_owned();
        let uncommented = COMMENT.replace_all(&content, "");
        let stripped = ANNOTATION.replace_all(&uncommented, "");

        let target_namespace = SCHEMA
            .captures(&stripped)
            .and_then(|caps| attribute(&caps[1], "targetNamespace"));

        let references = REFERENCE
            .captures_iter(&stripped)
            .map(|caps| {
                let kind = match &caps[1] {
                    "import" => ReferenceKind::Import,
                    "include" => ReferenceKind::Include,
                    _ => ReferenceKind::Redefine,
                };
                SchemaReference {
                    kind,
                    namespace: attribute(&caps[2], "namespace"),
                    schema_location: attribute(&caps[2], "schemaLocation"),
                }
            })
            .collect();

        Self {
            system_id: system_id.into(),
            target_namespace,
            references,
            digest: format!("{:x}", Sha256::digest(bytes)),
            content,
        }
    }

    fn read(source: InputSource) -> Result<Self, CollectionError> {
        let system_id = source.system_id().to_string();
        let mut bytes = Vec::new();
        source
            .into_stream()
            .read_to_end(&mut bytes)
            .map_err(|source| CollectionError::Read {
                system_id: system_id.clone(),
                source,
            })?;
        Ok(Self::parse(system_id, &bytes))
    }
}

fn attribute(attrs: &str, name: &str) -> Option<String> {
    ATTRIBUTE
        .captures_iter(attrs)
        .find(|caps| &caps[1] == name)
        .and_then(|caps| caps.get(2).or_else(|| caps.get(3)))
        .map(|m| m.as_str().to_string())
}

/// Root schemas and the resolver used to follow their references
pub struct SchemaCollection<L, R> {
    loader: L,
    resolver: R,
    roots: Vec<String>,
    inline: bool,
}

impl<L: ResourceLoader, R: UriResolver> SchemaCollection<L, R> {
    pub fn new<I, S>(loader: L, resolver: R, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            loader,
            resolver,
            roots: roots.into_iter().map(Into::into).collect(),
            inline: true,
        }
    }

    /// Follow references (default) or load the roots only
    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Load all documents, roots first, references depth-first
    ///
    /// A document reached twice (same system id) is loaded once.
    pub fn load(&self) -> Result<Vec<SchemaDocument>, CollectionError> {
        let mut seen = HashSet::new();
        let mut documents = Vec::new();

        for root in &self.roots {
            let resource = self.loader.get_resource(root);
            if !resource.exists().unwrap_or(false) {
                return Err(CollectionError::RootNotFound {
                    location: root.clone(),
                });
            }
            let system_id = resource.uri();
            let stream = resource.open().map_err(|source| CollectionError::Read {
                system_id: system_id.clone(),
                source,
            })?;
            let document = SchemaDocument::read(InputSource::new(system_id, stream))?;
            self.visit(document, &mut seen, &mut documents)?;
        }

        Ok(documents)
    }

    fn visit(
        &self,
        document: SchemaDocument,
        seen: &mut HashSet<String>,
        documents: &mut Vec<SchemaDocument>,
    ) -> Result<(), CollectionError> {
        if !seen.insert(document.system_id.clone()) {
            debug!(system_id = %document.system_id, "already loaded");
            return Ok(());
        }
        info!(
            system_id = %document.system_id,
            references = document.references.len(),
            "loaded schema"
        );

        let imports: Vec<ImportReference> = if self.inline {
            document
                .references
                .iter()
                .filter_map(|r| r.to_import(&document.system_id))
                .collect()
        } else {
            Vec::new()
        };
        let referrer = document.system_id.clone();
        documents.push(document);

        for import in imports {
            let source = self
                .resolver
                .resolve_entity(&import)
                .map_err(|source| CollectionError::Resolve {
                    schema_location: import.schema_location().to_string(),
                    referrer: referrer.clone(),
                    source,
                })?;
            if seen.contains(source.system_id()) {
                continue;
            }
            let child = SchemaDocument::read(source)?;
            self.visit(child, seen, documents)?;
        }

        Ok(())
    }
}
