//! Resource loading: map location strings to resource handles

use std::sync::Arc;

use crate::core::classpath::Classpath;
use crate::core::resource::{
    ClasspathResource, ContextResource, Resource, ResourceError, UrlResource, CLASSPATH_URL_PREFIX,
};

/// Strategy for turning a location into a [`Resource`]
pub trait ResourceLoader {
    /// Handle for `location`; never fails, existence is checked later
    fn get_resource(&self, location: &str) -> Box<dyn Resource>;

    /// Handle for an absolute URL
    fn get_url_resource(&self, url: &str) -> Result<Box<dyn Resource>, ResourceError>;
}

/// Loader backed by a [`Classpath`]
///
/// - `classpath:` locations become [`ClasspathResource`]s
/// - absolute URLs become [`UrlResource`]s
/// - everything else is a [`ContextResource`] rooted at the classpath root
#[derive(Debug, Clone, Default)]
pub struct DefaultResourceLoader {
    classpath: Arc<Classpath>,
}

impl DefaultResourceLoader {
    pub fn new(classpath: Classpath) -> Self {
        Self {
            classpath: Arc::new(classpath),
        }
    }

    pub fn classpath(&self) -> &Classpath {
        &self.classpath
    }
}

impl ResourceLoader for DefaultResourceLoader {
    fn get_resource(&self, location: &str) -> Box<dyn Resource> {
        if let Some(path) = location.strip_prefix(CLASSPATH_URL_PREFIX) {
            return Box::new(ClasspathResource::new(self.classpath.clone(), path));
        }

        if is_url(location) {
            if let Ok(resource) = UrlResource::parse(location, self.classpath.clone()) {
                return Box::new(resource);
            }
        }

        Box::new(ContextResource::new(self.classpath.clone(), location))
    }

    fn get_url_resource(&self, url: &str) -> Result<Box<dyn Resource>, ResourceError> {
        Ok(Box::new(UrlResource::parse(url, self.classpath.clone())?))
    }
}

/// Whether `location` looks like an absolute URL
///
/// Single-letter schemes are rejected so Windows drive paths (`C:\...`) stay
/// plain paths.
pub fn is_url(location: &str) -> bool {
    match location.split_once(':') {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
