//! Per-operation document assembly.
//!
//! Parameters and responses pass through the same admission gate before a
//! schema is resolved:
//!
//! 1. no declared name: skipped
//! 2. no registered example: skipped
//! 3. function or interface kind: fatal
//! 4. anything else is resolved, and resolver failures are fatal
//!
//! Because the registry check comes first, an unregistered function type is
//! skipped like any other unregistered type. Only a function or interface that
//! the caller explicitly registered stops the run.

#[cfg(test)]
mod fixtures;
mod operation;
mod parameter;
mod response;

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::descriptor::TypeDescriptor;
use crate::error::GenerateError;
use crate::registry::{ExampleValue, TypeRegistry};
use crate::resolver::{SchemaRef, SchemaResolver};

pub use operation::{PlacedOperation, assemble_operation};
pub use parameter::build_parameter;
pub use response::build_response;

/// Why a type was left out of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The type has no declared name.
    Anonymous,
    /// The registry holds no example for the type.
    Unregistered,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::Anonymous => "anonymous type",
            SkipReason::Unregistered => "not in type registry",
        })
    }
}

/// Outcome of building one parameter or response.
#[derive(Debug, Clone, PartialEq)]
pub enum Built<T> {
    /// The item was documented.
    Item(T),
    /// The item was left out.
    Skipped(SkipReason),
}

impl<T> Built<T> {
    /// Transform a documented item, passing skips through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Built<U> {
        match self {
            Built::Item(item) => Built::Item(f(item)),
            Built::Skipped(reason) => Built::Skipped(reason),
        }
    }

    /// The documented item, if any.
    pub fn into_item(self) -> Option<T> {
        match self {
            Built::Item(item) => Some(item),
            Built::Skipped(_) => None,
        }
    }
}

/// Shared state while assembling operations.
///
/// Resolved schemas are written straight into `schemas`, so a failed run
/// still leaves every schema resolved before the failure in the document.
pub struct BuildContext<'a> {
    /// Example values.
    pub registry: &'a TypeRegistry,
    /// Schema source.
    pub resolver: &'a mut dyn SchemaResolver,
    /// The document's schema table.
    pub schemas: &'a mut BTreeMap<String, SchemaRef>,
}

impl fmt::Debug for BuildContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("registry", &self.registry.len())
            .field("schemas", &self.schemas.len())
            .finish_non_exhaustive()
    }
}

/// A type that passed admission and has a schema.
struct Admitted<'r> {
    name: String,
    example: &'r ExampleValue,
    schema: SchemaRef,
}

/// Run the admission gate for `ty` and resolve its schema.
///
/// On success the schema is also recorded in the schema table under the
/// type's declared name, together with every nested schema it refers to.
fn admit<'r>(
    ctx: &mut BuildContext<'r>,
    operation: &str,
    ty: &TypeDescriptor,
) -> Result<Built<Admitted<'r>>, GenerateError> {
    let Some(name) = ty.name() else {
        return Ok(skip(operation, ty, SkipReason::Anonymous));
    };
    let registry = ctx.registry;
    let Some(example) = registry.lookup(ty.key()) else {
        return Ok(skip(operation, ty, SkipReason::Unregistered));
    };
    if ty.kind().is_shapeless() {
        return Err(GenerateError::Unsupported {
            operation: operation.to_string(),
            type_name: name.to_string(),
            kind: ty.kind(),
        });
    }

    let schema = ctx
        .resolver
        .resolve(ty)
        .map_err(|source| GenerateError::Resolve {
            operation: operation.to_string(),
            type_name: name.to_string(),
            source,
        })?;
    for (nested, definition) in schema.definitions() {
        ctx.schemas.insert(nested.clone(), definition.clone());
    }
    ctx.schemas.insert(name.to_string(), schema.clone());

    Ok(Built::Item(Admitted {
        name: name.to_string(),
        example,
        schema,
    }))
}

fn skip<T>(operation: &str, ty: &TypeDescriptor, reason: SkipReason) -> Built<T> {
    debug!(
        operation,
        type_name = ty.display_name(),
        %reason,
        "Skipping type."
    );
    Built::Skipped(reason)
}
