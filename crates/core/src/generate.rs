//! Whole-service document generation.

use tracing::{debug, info, warn};

use crate::build::{BuildContext, assemble_operation};
use crate::descriptor::Service;
use crate::document::Document;
use crate::error::{GenerateError, GenerateFailure};
use crate::placement::{MethodOverrides, MethodReg, Placement};
use crate::registry::TypeRegistry;
use crate::resolver::SchemaResolver;

/// Accessor names of the [`Documented`] contract.
///
/// A service that also declares operations under these names would document
/// its own plumbing, so they are never treated as operations.
pub const RESERVED_OPERATIONS: &[&str] = &[
    "operations",
    "base_document",
    "default_method",
    "default_path",
    "type_registry",
    "method_overrides",
];

/// Name of the generation entry point, reserved like the accessors.
pub const ENTRY_POINT: &str = "describe";

/// True if `name` can never be documented as an operation.
pub fn is_reserved(name: &str) -> bool {
    name == ENTRY_POINT || RESERVED_OPERATIONS.contains(&name)
}

/// A service that carries everything needed to document itself.
pub trait Documented: Service {
    /// Document to merge into. `None` starts from an empty one.
    fn base_document(&self) -> Option<Document> {
        None
    }

    /// Method for operations without an override.
    fn default_method(&self, operation: &str) -> String;

    /// Path for operations without an override.
    fn default_path(&self, operation: &str) -> String;

    /// Example values for documentable types.
    fn type_registry(&self) -> &TypeRegistry;

    /// Explicit placements.
    fn method_overrides(&self) -> &MethodOverrides;
}

/// Document every operation of `service`.
///
/// Operations are visited in the service's declaration order. Reserved names
/// are skipped. When two operations land on the same path and method the
/// later one wins. On the first fatal error the run stops and the failure
/// carries the document as built so far.
///
/// The document adopts the resolver's schema location. An existing document
/// that already holds schemas elsewhere is rejected before anything is added.
pub fn generate<S: Service + ?Sized>(
    service: &S,
    registry: &TypeRegistry,
    placement: &Placement<'_>,
    resolver: &mut dyn SchemaResolver,
    existing: Option<Document>,
) -> Result<Document, GenerateFailure> {
    let mut document = existing.unwrap_or_default();
    let location = resolver.location();
    if document.location != *location {
        if !document.schemas.is_empty() {
            let failure = GenerateFailure {
                error: GenerateError::LocationMismatch {
                    document: document.location.to_string(),
                    resolver: location.to_string(),
                },
                partial: Box::new(document),
            };
            warn!(error = %failure.error, "Document generation failed.");
            return Err(failure);
        }
        document.location = location.clone();
    }

    for descriptor in service.operations() {
        if is_reserved(&descriptor.name) {
            debug!(operation = %descriptor.name, "Skipping reserved operation.");
            continue;
        }
        debug!(
            operation = %descriptor.name,
            inputs = descriptor.inputs.len(),
            outputs = descriptor.outputs.len(),
            "Documenting operation."
        );

        let mut ctx = BuildContext {
            registry,
            resolver: &mut *resolver,
            schemas: &mut document.schemas,
        };
        let placed = match assemble_operation(&mut ctx, placement, &descriptor) {
            Ok(placed) => placed,
            Err(error) => {
                let failure = GenerateFailure {
                    error,
                    partial: Box::new(document),
                };
                warn!(
                    operation = %descriptor.name,
                    error = %failure.error,
                    "Document generation failed."
                );
                return Err(failure);
            }
        };

        let MethodReg { method, path } = placed.placement;
        if document
            .insert_operation(path.as_str(), method.as_str(), placed.operation)
            .is_some()
        {
            warn!(
                operation = %descriptor.name,
                %method,
                %path,
                "Operation replaced an earlier one at the same path and method."
            );
        }
    }

    info!(
        operations = document.operation_count(),
        schemas = document.schemas.len(),
        "Generated API document."
    );
    Ok(document)
}

/// Document a self-describing service.
pub fn describe<D: Documented + ?Sized>(
    service: &D,
    resolver: &mut dyn SchemaResolver,
) -> Result<Document, GenerateFailure> {
    let default_method = |operation: &str| service.default_method(operation);
    let default_path = |operation: &str| service.default_path(operation);
    let placement = Placement::new(service.method_overrides(), &default_method, &default_path);

    generate(
        service,
        service.type_registry(),
        &placement,
        resolver,
        service.base_document(),
    )
}
