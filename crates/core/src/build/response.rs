//! Operation output → response.

use crate::descriptor::TypeDescriptor;
use crate::document::Response;
use crate::error::GenerateError;

use super::{BuildContext, Built, admit};

/// Document one output type of `operation`.
///
/// Returns the response together with the key it is stored under, which is
/// the output type's declared name.
pub fn build_response(
    ctx: &mut BuildContext<'_>,
    operation: &str,
    ty: &TypeDescriptor,
) -> Result<Built<(String, Response)>, GenerateError> {
    Ok(admit(ctx, operation, ty)?.map(|admitted| {
        let response = Response::from_schema(&admitted.schema, admitted.example.clone());
        (admitted.name, response)
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::build::SkipReason;
    use crate::build::fixtures::{FailingResolver, Header, registry};
    use crate::descriptor::{TypeKey, TypeKind};
    use crate::document::EXAMPLE_KEY;
    use crate::resolver::SchemarsResolver;
    use serde_json::json;
    use std::collections::BTreeMap;

    trait Visitor {}

    #[test]
    fn test_registered_type_becomes_response() {
        let registry = registry();
        let mut resolver = SchemarsResolver::default();
        let mut schemas = BTreeMap::new();
        let mut ctx = BuildContext {
            registry: &registry,
            resolver: &mut resolver,
            schemas: &mut schemas,
        };

        let (key, response) =
            build_response(&mut ctx, "BlockToHeader", &TypeDescriptor::of::<Header>())
                .unwrap()
                .into_item()
                .unwrap();

        assert_eq!(key, "Header");
        assert_eq!(response.description.as_deref(), Some("A block header."));
        assert_eq!(response.schema.reference(), "#/definitions/Header");
        assert_eq!(response.examples[EXAMPLE_KEY], json!({ "number": 8 }));
        assert!(schemas["Header"].ptr_eq(&response.schema));
    }

    #[test]
    fn test_unregistered_output_is_skipped() {
        let registry = registry();
        let mut resolver = SchemarsResolver::default();
        let mut schemas = BTreeMap::new();
        let mut ctx = BuildContext {
            registry: &registry,
            resolver: &mut resolver,
            schemas: &mut schemas,
        };

        let built =
            build_response(&mut ctx, "BlockHeaderAsString", &TypeDescriptor::of::<String>())
                .unwrap();

        assert_eq!(built, Built::Skipped(SkipReason::Unregistered));
    }

    #[test]
    fn test_anonymous_output_is_skipped() {
        let registry = registry();
        let mut resolver = SchemarsResolver::default();
        let mut schemas = BTreeMap::new();
        let mut ctx = BuildContext {
            registry: &registry,
            resolver: &mut resolver,
            schemas: &mut schemas,
        };

        let unit = build_response(&mut ctx, "Ping", &TypeDescriptor::anonymous::<()>()).unwrap();
        let registered_but_anonymous =
            build_response(&mut ctx, "Ping", &TypeDescriptor::anonymous::<Header>()).unwrap();

        assert_eq!(unit, Built::Skipped(SkipReason::Anonymous));
        assert_eq!(registered_but_anonymous, Built::Skipped(SkipReason::Anonymous));
        assert!(schemas.is_empty());
    }

    #[test]
    fn test_registered_interface_is_fatal() {
        let mut registry = registry();
        registry.insert(TypeKey::of::<dyn Visitor>(), serde_json::Value::Null);
        let mut resolver = SchemarsResolver::default();
        let mut schemas = BTreeMap::new();
        let mut ctx = BuildContext {
            registry: &registry,
            resolver: &mut resolver,
            schemas: &mut schemas,
        };

        let err = build_response(
            &mut ctx,
            "Visit",
            &TypeDescriptor::interface::<dyn Visitor>("Visitor"),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            GenerateError::Unsupported { kind: TypeKind::Interface, .. }
        ));
    }

    #[test]
    fn test_resolver_failure_is_fatal() {
        let registry = registry();
        let mut resolver = FailingResolver::default();
        let mut schemas = BTreeMap::new();
        let mut ctx = BuildContext {
            registry: &registry,
            resolver: &mut resolver,
            schemas: &mut schemas,
        };

        let err = build_response(&mut ctx, "Op", &TypeDescriptor::of::<Header>()).unwrap_err();
        assert!(err.to_string().contains("`Header`"));
    }
}
