//! Import references and resolved input sources

use std::fmt;
use std::io::{self, Read};

/// One cross-schema reference: an `xs:import`, `xs:include` or `xs:redefine`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReference {
    namespace: Option<String>,
    schema_location: String,
    base_uri: Option<String>,
}

impl ImportReference {
    pub fn new(schema_location: impl Into<String>) -> Self {
        Self {
            namespace: None,
            schema_location: schema_location.into(),
            base_uri: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the URI of the importing document; an empty string means none
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        let base_uri = base_uri.into();
        self.base_uri = (!base_uri.is_empty()).then_some(base_uri);
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn schema_location(&self) -> &str {
        &self.schema_location
    }

    pub fn base_uri(&self) -> Option<&str> {
        self.base_uri.as_deref()
    }
}

impl fmt::Display for ImportReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.schema_location)?;
        if let Some(base) = &self.base_uri {
            write!(f, " (relative to {})", base)?;
        }
        Ok(())
    }
}

/// A resolved schema document, ready to be read
pub struct InputSource {
    system_id: String,
    stream: Box<dyn Read>,
}

impl InputSource {
    pub fn new(system_id: impl Into<String>, stream: Box<dyn Read>) -> Self {
        Self {
            system_id: system_id.into(),
            stream,
        }
    }

    /// URI of the resolved document
    pub fn system_id(&self) -> &str {
        &self.system_id
    }

    pub fn into_stream(self) -> Box<dyn Read> {
        self.stream
    }

    /// Read the whole document as UTF-8
    pub fn read_to_string(mut self) -> io::Result<String> {
        let mut content = String::new();
        self.stream.read_to_string(&mut content)?;
        Ok(content)
    }
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputSource")
            .field("system_id", &self.system_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_empty_base_uri_is_absent() {
        let reference = ImportReference::new("common.xsd").with_base_uri("");
        assert_eq!(reference.base_uri(), None);
    }

    #[test]
    fn test_builder() {
        let reference = ImportReference::new("../common.xsd")
            .with_namespace("urn:common")
            .with_base_uri("classpath:/xsd/order/order-webservice.xsd");
        assert_eq!(reference.namespace(), Some("urn:common"));
        assert_eq!(reference.schema_location(), "../common.xsd");
        assert_eq!(
            reference.to_string(),
            "../common.xsd (relative to classpath:/xsd/order/order-webservice.xsd)"
        );
    }

    #[test]
    fn test_input_source_read() {
        let source = InputSource::new("classpath:/a.xsd", Box::new(Cursor::new(b"<a/>".to_vec())));
        assert_eq!(source.system_id(), "classpath:/a.xsd");
        assert!(format!("{:?}", source).contains("classpath:/a.xsd"));
        assert_eq!(source.read_to_string().unwrap(), "<a/>");
    }
}
