//! Schema system - import resolution and schema collections

pub mod collection;
pub mod reference;
pub mod resolver;

pub use collection::{CollectionError, ReferenceKind, SchemaCollection, SchemaDocument, SchemaReference};
pub use reference::{ImportReference, InputSource};
pub use resolver::{
    Attempt, ClasspathUriResolver, DefaultUriResolver, Outcome, ResolveError, Strategy, UriResolver,
};
