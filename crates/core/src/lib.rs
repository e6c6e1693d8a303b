//! Derive API documents from declared service operations.
//!
//! A service lists its operations as [`OperationDescriptor`]s: a name plus the
//! ordered input and output types. Generation walks those operations and, for
//! every type that has an example in the [`TypeRegistry`], resolves a schema
//! and records a parameter or response. The result is a [`Document`] mapping
//! each path and method to its operation, plus one schema per documented type.
//!
//! ```no_run
//! use apidoc_core::{
//!     MethodOverrides, OperationDescriptor, Operations, Placement, SchemarsResolver,
//!     TypeDescriptor, TypeRegistry, generate,
//! };
//!
//! #[derive(serde::Serialize, schemars::JsonSchema)]
//! struct Block {
//!     number: i64,
//! }
//!
//! let service = Operations::new()
//!     .operation(OperationDescriptor::new("GetBlock").output(TypeDescriptor::of::<Block>()));
//! let registry = TypeRegistry::new().register(&Block { number: 42 })?;
//! let overrides = MethodOverrides::new();
//! let method = |_: &str| "GET".to_string();
//! let path = |name: &str| format!("api/{name}");
//! let placement = Placement::new(&overrides, &method, &path);
//!
//! let doc = generate(&service, &registry, &placement, &mut SchemarsResolver::default(), None)?;
//! assert!(doc.operation("api/GetBlock", "GET").is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod build;
mod config;
mod descriptor;
mod document;
mod error;
mod generate;
mod location;
mod placement;
mod registry;
mod resolver;

pub use config::GeneratorConfig;
pub use descriptor::{
    DeriveFn, OperationDescriptor, Operations, Service, TypeDescriptor, TypeKey, TypeKind,
};
pub use document::{
    Bound, Document, DocumentInfo, EXAMPLE_KEY, Operation, Parameter, PathItem, Response,
    SWAGGER_VERSION, SchemaType,
};
pub use error::{
    ConfigError, GenerateError, GenerateFailure, LocationError, RegistryError, ResolveError,
};
pub use generate::{Documented, ENTRY_POINT, RESERVED_OPERATIONS, describe, generate, is_reserved};
pub use location::{DEFAULT_REFERENCE_PREFIX, SchemaLocation};
pub use placement::{MethodOverrides, MethodReg, NameFn, Placement};
pub use registry::{ExampleValue, TypeRegistry};
pub use resolver::{SchemaDialect, SchemaRef, SchemaResolver, SchemarsResolver, SharedResolver};
