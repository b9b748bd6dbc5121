//! Core module - resources, classpath and configuration

pub mod classpath;
pub mod config;
pub mod loader;
pub mod path;
pub mod resource;

pub use classpath::{Classpath, ClasspathEntry, ClasspathListing, Located};
pub use config::Config;
pub use loader::{DefaultResourceLoader, ResourceLoader};
pub use resource::{
    ClasspathResource, ContextResource, FileSystemResource, Resource, ResourceError, UrlResource,
    CLASSPATH_URL_PREFIX,
};
