//! Example values for documentable types.
//!
//! A type is only documented if the registry holds an example for it. The
//! example doubles as the response example in the generated document.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::descriptor::TypeKey;
use crate::error::RegistryError;

/// Representative value of one type, already encoded as JSON.
pub type ExampleValue = Value;

/// Mapping from type identity to a representative example.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    examples: HashMap<TypeKey, ExampleValue>,
}

impl TypeRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `example` as the representative value of `T`.
    pub fn register<T: Serialize + ?Sized>(mut self, example: &T) -> Result<Self, RegistryError> {
        let key = TypeKey::of::<T>();
        let value = serde_json::to_value(example).map_err(|source| RegistryError::Encode {
            key: key.clone(),
            source,
        })?;
        self.examples.insert(key, value);
        Ok(self)
    }

    /// Insert a pre-encoded example under an explicit key.
    ///
    /// Shapeless kinds (functions, trait objects) cannot be serialized, so
    /// they are registered this way, usually with `Value::Null`.
    pub fn insert(&mut self, key: TypeKey, example: ExampleValue) -> Option<ExampleValue> {
        self.examples.insert(key, example)
    }

    /// Example registered for `key`, if any.
    pub fn lookup(&self, key: &TypeKey) -> Option<&ExampleValue> {
        self.examples.get(key)
    }

    /// True if `key` has an example.
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.examples.contains_key(key)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde_json::json;

    #[derive(Serialize)]
    struct Block {
        number: i64,
        hex: String,
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to encode"))
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = TypeRegistry::new()
            .register(&Block {
                number: 42,
                hex: "0xdeadbeef".to_string(),
            })
            .unwrap();

        let example = registry.lookup(&TypeKey::of::<Block>()).unwrap();
        assert_eq!(example, &json!({ "number": 42, "hex": "0xdeadbeef" }));
        assert!(!registry.contains(&TypeKey::of::<String>()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_boxed_variant_is_a_distinct_key() {
        let registry = TypeRegistry::new()
            .register(&Block {
                number: 1,
                hex: "0x1".to_string(),
            })
            .unwrap()
            .register(&Box::new(Block {
                number: 2,
                hex: "0x2".to_string(),
            }))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.lookup(&TypeKey::of::<Box<Block>>()).unwrap()["number"],
            json!(2)
        );
    }

    #[test]
    fn test_register_reports_encode_failure() {
        let err = TypeRegistry::new().register(&Unencodable).unwrap_err();
        assert!(err.to_string().contains("Unencodable"));
    }

    #[test]
    fn test_insert_raw_example() {
        let mut registry = TypeRegistry::new();
        let key = TypeKey::tagged("callback");
        assert!(registry.insert(key.clone(), Value::Null).is_none());
        assert_eq!(registry.lookup(&key), Some(&Value::Null));
    }
}
