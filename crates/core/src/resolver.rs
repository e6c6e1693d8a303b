//! Type → schema resolution.
//!
//! A resolver is an explicit object handed to each generation call. It owns
//! its cache, so two resolvers never share state by accident. To share one
//! cache across threads, wrap it in [`SharedResolver`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex};

use schemars::generate::SchemaSettings;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::trace;

use crate::descriptor::{TypeDescriptor, TypeKey};
use crate::error::ResolveError;
use crate::location::SchemaLocation;

/// Handle to a resolved schema.
///
/// Clones share the underlying schema; see [`SchemaRef::ptr_eq`]. Types the
/// schema refers to are carried alongside in [`SchemaRef::definitions`], and
/// must be placed in the same schema table for the references to resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRef {
    reference: String,
    schema: Arc<Value>,
    definitions: Arc<BTreeMap<String, SchemaRef>>,
}

impl SchemaRef {
    /// Wrap an already-derived schema.
    pub fn new(reference: impl Into<String>, schema: Value) -> Self {
        Self {
            reference: reference.into(),
            schema: Arc::new(schema),
            definitions: Arc::default(),
        }
    }

    /// Attach the schemas this one refers to.
    pub fn with_definitions(mut self, definitions: BTreeMap<String, SchemaRef>) -> Self {
        self.definitions = Arc::new(definitions);
        self
    }

    /// Reference string, e.g. `#/definitions/Block`.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// The full schema.
    pub fn value(&self) -> &Value {
        &self.schema
    }

    /// Schemas referenced from this one, by name.
    pub fn definitions(&self) -> &BTreeMap<String, SchemaRef> {
        &self.definitions
    }

    /// True if both handles point at the same resolved schema.
    pub fn ptr_eq(&self, other: &SchemaRef) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema)
    }
}

impl Serialize for SchemaRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("$ref", &self.reference)?;
        map.end()
    }
}

/// Turns type descriptors into schemas.
///
/// Implementations must be deterministic per [`TypeKey`]: resolving the same
/// key twice during one run yields the same schema.
pub trait SchemaResolver {
    /// Resolve `ty` to a schema.
    fn resolve(&mut self, ty: &TypeDescriptor) -> Result<SchemaRef, ResolveError>;

    /// Where the references handed out by [`SchemaResolver::resolve`] point.
    fn location(&self) -> &SchemaLocation;
}

/// JSON Schema flavour produced by [`SchemarsResolver`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaDialect {
    /// JSON Schema draft 7.
    #[default]
    Draft07,
    /// OpenAPI 3.0 schema objects.
    OpenApi3,
}

impl SchemaDialect {
    /// Generator settings for this dialect.
    pub fn settings(self) -> SchemaSettings {
        match self {
            SchemaDialect::Draft07 => SchemaSettings::draft07(),
            SchemaDialect::OpenApi3 => SchemaSettings::openapi3(),
        }
    }
}

/// Resolver backed by `schemars`.
///
/// Schemas are memoized by type and declared name, so one type declared under
/// two names yields two references, each pointing at its own name.
pub struct SchemarsResolver {
    dialect: SchemaDialect,
    location: SchemaLocation,
    cache: HashMap<(TypeKey, String), SchemaRef>,
}

impl SchemarsResolver {
    /// Resolver for `dialect` referencing `#/definitions/`.
    pub fn new(dialect: SchemaDialect) -> Self {
        Self::with_location(dialect, SchemaLocation::default())
    }

    /// Resolver referencing a custom location, e.g. `#/components/schemas/`.
    pub fn with_location(dialect: SchemaDialect, location: SchemaLocation) -> Self {
        Self {
            dialect,
            location,
            cache: HashMap::new(),
        }
    }

    /// Number of cached schemas.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached schema.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl Default for SchemarsResolver {
    fn default() -> Self {
        Self::new(SchemaDialect::default())
    }
}

impl fmt::Debug for SchemarsResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemarsResolver")
            .field("dialect", &self.dialect)
            .field("location", &self.location)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl SchemaResolver for SchemarsResolver {
    fn resolve(&mut self, ty: &TypeDescriptor) -> Result<SchemaRef, ResolveError> {
        let name = ty.display_name().to_string();
        let cache_key = (ty.key().clone(), name);
        if let Some(hit) = self.cache.get(&cache_key) {
            return Ok(hit.clone());
        }
        let name = cache_key.1.as_str();

        let derive = ty.derive_fn().ok_or_else(|| ResolveError::Underivable {
            name: name.to_string(),
            key: ty.key().clone(),
        })?;

        // Nested types are emitted at the same location the document uses.
        let mut settings = self.dialect.settings();
        settings.definitions_path = self.location.prefix().to_string().into();
        let schema = derive(&settings);

        let mut value = serde_json::to_value(&schema).map_err(|source| ResolveError::Encode {
            name: name.to_string(),
            source,
        })?;
        let Some(root) = value.as_object_mut() else {
            return Err(ResolveError::NotAnObject {
                name: name.to_string(),
            });
        };
        root.remove("$schema");
        let definitions: BTreeMap<String, SchemaRef> = self
            .location
            .take_definitions(root)
            .into_iter()
            .map(|(nested, definition)| {
                let reference = self.location.reference(&nested);
                (nested, SchemaRef::new(reference, definition))
            })
            .collect();

        let resolved =
            SchemaRef::new(self.location.reference(name), value).with_definitions(definitions);
        trace!(
            key = %ty.key(),
            reference = resolved.reference(),
            nested = resolved.definitions().len(),
            "Derived schema."
        );
        self.cache.insert(cache_key, resolved.clone());
        Ok(resolved)
    }

    fn location(&self) -> &SchemaLocation {
        &self.location
    }
}

/// A resolver shared between threads.
///
/// Every clone points at the same inner resolver and serializes access to it
/// through a mutex, so concurrent generation calls see one cache.
#[derive(Debug)]
pub struct SharedResolver<R> {
    inner: Arc<Mutex<R>>,
    location: SchemaLocation,
}

impl<R: SchemaResolver> SharedResolver<R> {
    /// Share `resolver`.
    pub fn new(resolver: R) -> Self {
        Self {
            location: resolver.location().clone(),
            inner: Arc::new(Mutex::new(resolver)),
        }
    }
}

impl<R> SharedResolver<R> {
    /// Run `f` with exclusive access to the inner resolver.
    pub fn with<T>(&self, f: impl FnOnce(&mut R) -> T) -> Result<T, ResolveError> {
        let mut guard = self.inner.lock().map_err(|_| ResolveError::Poisoned)?;
        Ok(f(&mut guard))
    }
}

impl<R> Clone for SharedResolver<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            location: self.location.clone(),
        }
    }
}

impl<R: SchemaResolver> SchemaResolver for SharedResolver<R> {
    fn resolve(&mut self, ty: &TypeDescriptor) -> Result<SchemaRef, ResolveError> {
        self.with(|inner| inner.resolve(ty))?
    }

    fn location(&self) -> &SchemaLocation {
        &self.location
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;

    /// A chain block.
    #[allow(dead_code)]
    #[derive(schemars::JsonSchema)]
    struct Block {
        number: i64,
        hex: String,
    }

    /// The best known chain.
    #[allow(dead_code)]
    #[derive(schemars::JsonSchema)]
    struct Chain {
        tip: Block,
        length: u64,
    }

    #[test]
    fn test_resolve_is_referentially_stable() {
        let mut resolver = SchemarsResolver::default();
        let ty = TypeDescriptor::of::<Block>();

        let first = resolver.resolve(&ty).unwrap();
        let second = resolver.resolve(&ty).unwrap();

        assert!(first.ptr_eq(&second));
        assert_eq!(resolver.cached(), 1);
        assert_eq!(first.reference(), "#/definitions/Block");
        assert_eq!(first.value()["type"], json!("object"));
        assert_eq!(first.value()["description"], json!("A chain block."));
        assert!(first.value()["properties"].get("number").is_some());
    }

    #[test]
    fn test_clear_forgets_schemas() {
        let mut resolver = SchemarsResolver::default();
        let ty = TypeDescriptor::of::<Block>();

        let first = resolver.resolve(&ty).unwrap();
        resolver.clear();
        let second = resolver.resolve(&ty).unwrap();

        assert!(!first.ptr_eq(&second));
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_location() {
        let location = SchemaLocation::parse("#/components/schemas/").unwrap();
        let mut resolver = SchemarsResolver::with_location(SchemaDialect::OpenApi3, location);
        let resolved = resolver
            .resolve(&TypeDescriptor::named::<Block>("ChainBlock"))
            .unwrap();
        assert_eq!(resolved.reference(), "#/components/schemas/ChainBlock");
        assert!(resolved.value().get("$schema").is_none());
    }

    #[test]
    fn test_same_type_under_two_names() {
        let mut resolver = SchemarsResolver::default();

        let block = resolver.resolve(&TypeDescriptor::of::<Block>()).unwrap();
        let chain_block = resolver
            .resolve(&TypeDescriptor::named::<Block>("ChainBlock"))
            .unwrap();

        assert_eq!(block.reference(), "#/definitions/Block");
        assert_eq!(chain_block.reference(), "#/definitions/ChainBlock");
        assert_eq!(resolver.cached(), 2);
    }

    #[test]
    fn test_nested_types_are_lifted() {
        for (dialect, prefix) in [
            (SchemaDialect::Draft07, "#/definitions/"),
            (SchemaDialect::OpenApi3, "#/definitions/"),
            (SchemaDialect::Draft07, "#/components/schemas/"),
            (SchemaDialect::OpenApi3, "#/components/schemas/"),
        ] {
            let location = SchemaLocation::parse(prefix).unwrap();
            let mut resolver = SchemarsResolver::with_location(dialect, location);

            let resolved = resolver.resolve(&TypeDescriptor::of::<Chain>()).unwrap();

            let tip = &resolved.definitions()["Block"];
            assert_eq!(tip.reference(), format!("{prefix}Block"));
            assert_eq!(tip.value()["description"], json!("A chain block."));
            assert_eq!(
                resolved.value()["properties"]["tip"]["$ref"],
                json!(format!("{prefix}Block"))
            );
            assert!(resolved.value().get("definitions").is_none());
            assert!(resolved.value().get("components").is_none());
        }
    }

    #[test]
    fn test_underivable_descriptor() {
        let mut resolver = SchemarsResolver::default();
        let err = resolver
            .resolve(&TypeDescriptor::function::<fn(i64) -> i64>("Mapper"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Underivable { ref name, .. } if name == "Mapper"));
        assert_eq!(resolver.cached(), 0);
    }

    #[test]
    fn test_shared_resolver_single_cache_across_threads() {
        let shared = SharedResolver::new(SchemarsResolver::default());
        let ty = TypeDescriptor::of::<Block>();

        let results: Vec<SchemaRef> = thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let mut resolver = shared.clone();
                    let ty = ty.clone();
                    scope.spawn(move || resolver.resolve(&ty).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(results.windows(2).all(|pair| pair[0].ptr_eq(&pair[1])));
        assert_eq!(shared.with(|inner| inner.cached()).unwrap(), 1);
    }
}
