//! xsdr: layered XSD import resolution
//!
//! Resolves `xs:import`/`xs:include` schema locations against a classpath of
//! directories and bundled schemas, relative to the importing document, or
//! through a plain URI fallback. Paths that climb above their root (such as
//! `../common.xsd` looked up from the classpath root) are treated as absent
//! rather than as errors, so resolution moves on to the next strategy.

pub mod cli;
pub mod core;
pub mod schema;
