//! routedoc - OpenAPI documentation generated from a running router's route tree.
//!
//! This library turns a router's route tree, plus source-comment annotations
//! and registered type metadata, into a constrained OpenAPI 3.0.1 document,
//! serializable as JSON or styled YAML. Documentation is derived from code:
//! handlers are resolved to their defining source location and the comment
//! block there is mined for machine-readable directives.
//!
//! # Architecture
//!
//! The library is organized into modules that work together, leaf-first:
//!
//! 1. [`router`] - the minimal routing-tree contract the builder consumes
//! 2. [`source`] - handler-to-source resolution and doc-comment extraction
//! 3. [`annotations`] - the directive mini-language inside doc comments
//! 4. [`schema`] - component schemas derived from registered type metadata
//! 5. [`document`] - the OpenAPI object model
//! 6. [`operation`] - one operation per resolved handler
//! 7. [`walker`] - flattens the route tree into the paths map
//! 8. [`builder`] - the registration context and document assembly
//! 9. [`yaml`] - the block/flow styling pass for YAML output
//!
//! # Example Usage
//!
//! ```no_run
//! use routedoc::{DocBuilder, Handler, Router, TypeSpec};
//!
//! // Mirror the application's route tree.
//! let list = Handler::new("api.ListWidgets");
//! let mut router = Router::new();
//! router.handle("/widgets", "GET", list.clone());
//!
//! // Register metadata during startup.
//! let mut builder = DocBuilder::new();
//! builder
//!     .register_type(
//!         "Widget",
//!         200,
//!         TypeSpec::new()
//!             .tagged_field("Id", "int", r#"name:"id" documentation:"widget id,required""#)
//!             .tagged_field("Label", "string", r#"name:"label""#),
//!     )
//!     .register_tag("widgets", "Widget operations")
//!     .register_server("https://api.example.com", "production")
//!     .register_source(&list, "src/api/widgets.go", 42, "example.com/project/api.ListWidgets");
//!
//! // Build once, serialize as needed.
//! let yaml = builder.yaml_document(&router, "Widget API", "Widgets as a service").unwrap();
//! println!("{}", yaml);
//! ```
//!
//! Registration happens during sequential startup; concurrent registration or
//! concurrent builds are unsupported. A build either returns a complete
//! document or fails with a single error naming a malformed structural tag -
//! handlers without usable annotations degrade to partial operations instead
//! of failing the build.

pub mod annotations;
pub mod builder;
pub mod document;
pub mod error;
pub mod operation;
pub mod router;
pub mod schema;
pub mod source;
pub mod walker;
pub mod yaml;

pub use builder::DocBuilder;
pub use document::Document;
pub use error::{Error, Result};
pub use router::{Handler, RouteHandler, Router, ANY_METHOD};
pub use schema::{FieldSpec, TypeSpec};
pub use source::{FuncSource, SourceIndex};
pub use walker::normalize_path;
pub use yaml::Marshaler;
