//! The document builder context and assembly entry points.
//!
//! [`DocBuilder`] replaces process-wide registries with an explicit context
//! object: types, tags, servers, helper registrations and the source index are
//! all populated through builder methods during startup, then [`DocBuilder::build`]
//! assembles a fresh [`Document`] from a route tree. Registration and builds
//! must be serialized by the caller; the builder provides no locking.

use log::debug;
use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;

use crate::document::{Components, Document, Info, SecurityScheme, Server, Tag};
use crate::error::Result;
use crate::router::{Handler, Router};
use crate::schema::{self, TypeSpec};
use crate::source::SourceIndex;
use crate::{walker, yaml};

/// Builder context: registration API plus document assembly.
#[derive(Debug, Default)]
pub struct DocBuilder {
    pub(crate) types: BTreeMap<String, TypeSpec>,
    /// Logical type name -> status code string or "default".
    pub(crate) classifications: BTreeMap<String, String>,
    /// The one "default"-classified type name; last registration wins.
    pub(crate) default_response: Option<String>,
    tags: Vec<Tag>,
    servers: Vec<Server>,
    /// FIFO queue of out-of-band (verb, handler) registrations.
    pub(crate) helpers: VecDeque<(String, Handler)>,
    /// Qualified name of the generic wrapper routed in place of helpers.
    pub(crate) helper_wrapper: Option<String>,
    pub(crate) auth_active: bool,
    pub(crate) sources: SourceIndex,
}

impl DocBuilder {
    pub fn new() -> Self {
        debug!("initializing DocBuilder");
        Self::default()
    }

    /// Registers a type whose schema documents responses with the given
    /// status code.
    pub fn register_type(&mut self, name: &str, status: u16, spec: TypeSpec) -> &mut Self {
        self.types.insert(name.to_string(), spec);
        self.classifications
            .insert(name.to_string(), status.to_string());
        self
    }

    /// Registers the type synthesized as the `default` response for
    /// operations without an explicit `response:` directive. Registering more
    /// than one default is accepted; the last write wins.
    pub fn register_default_response(&mut self, name: &str, spec: TypeSpec) -> &mut Self {
        self.types.insert(name.to_string(), spec);
        self.classifications
            .insert(name.to_string(), "default".to_string());
        self.default_response = Some(name.to_string());
        self
    }

    /// Registers a tag; output order is registration order.
    pub fn register_tag(&mut self, name: &str, description: &str) -> &mut Self {
        self.tags.push(Tag {
            name: name.to_string(),
            description: description.to_string(),
        });
        self
    }

    /// Registers a server; output order is registration order.
    pub fn register_server(&mut self, url: &str, description: &str) -> &mut Self {
        self.servers.push(Server {
            url: url.to_string(),
            description: description.to_string(),
        });
        self
    }

    /// Registers a handler whose real implementation is routed indirectly
    /// through the generic wrapper named via [`DocBuilder::helper_wrapper`].
    /// Entries are consumed in FIFO order during the build.
    pub fn register_helper(&mut self, method: &str, handler: Handler) -> &mut Self {
        self.helpers.push_back((method.to_uppercase(), handler));
        self
    }

    /// Declares the qualified function path of the generic helper wrapper.
    pub fn helper_wrapper(&mut self, function_path: &str) -> &mut Self {
        self.helper_wrapper = Some(function_path.to_string());
        self
    }

    /// Activates global bearer auth: every operation gains a `bearerAuth`
    /// security requirement and the matching security scheme is emitted.
    pub fn activate_bearer_auth(&mut self) -> &mut Self {
        self.auth_active = true;
        self
    }

    /// Records the defining source location for a handler.
    pub fn register_source(
        &mut self,
        handler: &Handler,
        file: impl Into<PathBuf>,
        line: usize,
        function_path: &str,
    ) -> &mut Self {
        self.sources.insert(handler, file, line, function_path);
        self
    }

    /// Builds the document for a route tree.
    ///
    /// Fails only on a malformed structural tag; handlers that cannot be
    /// located or parsed degrade to partial operations.
    pub fn build(&mut self, router: &Router, title: &str, description: &str) -> Result<Document> {
        debug!("building document: {}", title);
        let schemas = schema::materialize(&self.types)?;
        let paths = walker::walk(self, router, "");

        let security_schemes = if self.auth_active {
            let mut schemes = BTreeMap::new();
            schemes.insert("bearerAuth".to_string(), SecurityScheme::bearer());
            Some(schemes)
        } else {
            None
        };

        Ok(Document {
            openapi: "3.0.1".to_string(),
            info: Info {
                version: "1.0.0".to_string(),
                title: title.to_string(),
                description: description.to_string(),
            },
            servers: self.servers.clone(),
            tags: self.tags.clone(),
            paths,
            components: Components {
                schemas,
                security_schemes,
            },
        })
    }

    /// Builds and serializes the document as pretty-printed JSON.
    pub fn json_document(
        &mut self,
        router: &Router,
        title: &str,
        description: &str,
    ) -> Result<String> {
        let doc = self.build(router, title, description)?;
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Builds the document and serializes it as styled YAML (indent 4).
    pub fn yaml_document(
        &mut self,
        router: &Router,
        title: &str,
        description: &str,
    ) -> Result<String> {
        let doc = self.build(router, title, description)?;
        let json = serde_json::to_vec(&doc)?;
        yaml::json_to_yaml(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_router_yields_empty_paths() {
        let mut builder = DocBuilder::new();
        let doc = builder.build(&Router::new(), "API", "empty").unwrap();
        assert_eq!(doc.openapi, "3.0.1");
        assert_eq!(doc.info.title, "API");
        assert_eq!(doc.info.version, "1.0.0");
        assert!(doc.paths.is_empty());
        assert!(doc.components.security_schemes.is_none());
    }

    #[test]
    fn test_tag_and_server_order_is_registration_order() {
        let mut builder = DocBuilder::new();
        builder
            .register_tag("widgets", "widget ops")
            .register_tag("admin", "admin ops")
            .register_server("https://api.example.com", "production");
        let doc = builder.build(&Router::new(), "API", "").unwrap();
        assert_eq!(doc.tags[0].name, "widgets");
        assert_eq!(doc.tags[1].name, "admin");
        assert_eq!(doc.servers[0].url, "https://api.example.com");
    }

    #[test]
    fn test_last_default_registration_wins() {
        let mut builder = DocBuilder::new();
        builder.register_default_response("First", TypeSpec::new());
        builder.register_default_response("Second", TypeSpec::new());
        assert_eq!(builder.default_response.as_deref(), Some("Second"));
    }

    #[test]
    fn test_auth_emits_bearer_scheme() {
        let mut builder = DocBuilder::new();
        builder.activate_bearer_auth();
        let doc = builder.build(&Router::new(), "API", "").unwrap();
        let schemes = doc.components.security_schemes.unwrap();
        let bearer = &schemes["bearerAuth"];
        assert_eq!(bearer.scheme_type, "http");
        assert_eq!(bearer.scheme, "bearer");
        assert_eq!(bearer.bearer_format, "JWT");
    }
}
