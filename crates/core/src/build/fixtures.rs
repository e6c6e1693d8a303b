//! Shared types for builder tests.

use schemars::JsonSchema;
use serde::Serialize;

use crate::descriptor::TypeDescriptor;
use crate::error::ResolveError;
use crate::location::SchemaLocation;
use crate::registry::TypeRegistry;
use crate::resolver::{SchemaRef, SchemaResolver};

/// A chain block.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Block {
    pub number: i64,
    pub hex: String,
}

/// A block header.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Header {
    pub number: Option<i64>,
}

/// The best known chain.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Chain {
    pub tip: Block,
    pub length: u64,
}

fn block() -> Block {
    Block {
        number: 42,
        hex: "0xdeadbeef".to_string(),
    }
}

/// Registry with examples for `Block`, `Header` and `Chain`.
pub fn registry() -> TypeRegistry {
    TypeRegistry::new()
        .register(&block())
        .and_then(|registry| registry.register(&Header { number: Some(8) }))
        .and_then(|registry| {
            registry.register(&Chain {
                tip: block(),
                length: 43,
            })
        })
        .unwrap_or_default()
}

/// Resolver that rejects every type.
#[derive(Debug, Clone, Default)]
pub struct FailingResolver {
    location: SchemaLocation,
}

impl SchemaResolver for FailingResolver {
    fn resolve(&mut self, ty: &TypeDescriptor) -> Result<SchemaRef, ResolveError> {
        Err(ResolveError::NotAnObject {
            name: ty.display_name().to_string(),
        })
    }

    fn location(&self) -> &SchemaLocation {
        &self.location
    }
}
