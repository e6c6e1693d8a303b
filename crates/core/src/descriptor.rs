//! Static descriptions of documentable types and operations.
//!
//! Services declare their operations up front as plain data: each operation
//! lists the types it accepts and returns, in order. Nothing is discovered at
//! runtime, so the full operation set can be inspected before generation.

use std::any::type_name;
use std::fmt;

use schemars::generate::SchemaSettings;
use schemars::{JsonSchema, Schema};

/// Derives the root schema of one concrete type under the given settings.
pub type DeriveFn = fn(&SchemaSettings) -> Schema;

fn derive_root<T: JsonSchema>(settings: &SchemaSettings) -> Schema {
    settings.clone().into_generator().into_root_schema_for::<T>()
}

/// Stable identity of a type.
///
/// Keys compare by tag, and the default tag is the fully qualified type name,
/// so `a::Block` and `b::Block` never collide even though they share a short name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeKey(String);

impl TypeKey {
    /// Key for a concrete Rust type.
    pub fn of<T: ?Sized>() -> Self {
        Self(type_name::<T>().to_string())
    }

    /// Key with an explicit tag, for types that have no Rust counterpart.
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The underlying tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Broad shape category of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Plain data with a serializable shape.
    Data,
    /// A callable. Carries no serializable shape.
    Function,
    /// A trait object. Carries no serializable shape.
    Interface,
}

impl TypeKind {
    /// True for kinds that can never be turned into a schema.
    pub fn is_shapeless(self) -> bool {
        matches!(self, TypeKind::Function | TypeKind::Interface)
    }

    /// Lowercase label used in error messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Data => "data",
            TypeKind::Function => "function",
            TypeKind::Interface => "interface",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One type as it appears in an operation signature.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    key: TypeKey,
    name: Option<String>,
    kind: TypeKind,
    derive: Option<DeriveFn>,
}

impl TypeDescriptor {
    /// Data type named after its schema name (`Block`, `Header`, ...).
    pub fn of<T: JsonSchema>() -> Self {
        Self::named::<T>(T::schema_name().into_owned())
    }

    /// Data type with an explicit declared name.
    ///
    /// Use this when two registered types would otherwise share a schema name,
    /// e.g. `Block` and `Box<Block>`.
    pub fn named<T: JsonSchema>(name: impl Into<String>) -> Self {
        Self {
            key: TypeKey::of::<T>(),
            name: Some(name.into()),
            kind: TypeKind::Data,
            derive: Some(derive_root::<T>),
        }
    }

    /// Data type without a declared name. Never documented.
    pub fn anonymous<T: ?Sized>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            name: None,
            kind: TypeKind::Data,
            derive: None,
        }
    }

    /// Callable type, e.g. `fn(Block) -> Header`.
    pub fn function<F: ?Sized>(name: impl Into<String>) -> Self {
        Self::shapeless::<F>(name, TypeKind::Function)
    }

    /// Trait object type, e.g. `dyn Visitor`.
    pub fn interface<I: ?Sized>(name: impl Into<String>) -> Self {
        Self::shapeless::<I>(name, TypeKind::Interface)
    }

    fn shapeless<T: ?Sized>(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            key: TypeKey::of::<T>(),
            name: Some(name.into()),
            kind,
            derive: None,
        }
    }

    /// Replace the identity key, keeping everything else.
    pub fn with_key(mut self, key: TypeKey) -> Self {
        self.key = key;
        self
    }

    /// Identity key used for registry and cache lookups.
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Declared name, `None` for anonymous types.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Shape category.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Schema derivation function, present for named data types.
    pub fn derive_fn(&self) -> Option<DeriveFn> {
        self.derive
    }

    /// Name for logs: the declared name, or the key for anonymous types.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.key.as_str())
    }
}

/// One callable operation of a service.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    /// Operation name, also used for placement lookups.
    pub name: String,
    /// Parameter types in declaration order.
    pub inputs: Vec<TypeDescriptor>,
    /// Return types in declaration order.
    pub outputs: Vec<TypeDescriptor>,
}

impl OperationDescriptor {
    /// Operation with no inputs and no outputs.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Append a parameter type.
    pub fn input(mut self, ty: TypeDescriptor) -> Self {
        self.inputs.push(ty);
        self
    }

    /// Append a return type.
    pub fn output(mut self, ty: TypeDescriptor) -> Self {
        self.outputs.push(ty);
        self
    }
}

/// Anything that can enumerate its operations.
///
/// Implementations must return operations in the same order on every call;
/// generated documents are only reproducible if enumeration is.
pub trait Service {
    /// Declared operations, in stable order.
    fn operations(&self) -> Vec<OperationDescriptor>;
}

/// A ready-made, ordered operation list.
#[derive(Debug, Clone, Default)]
pub struct Operations {
    operations: Vec<OperationDescriptor>,
}

impl Operations {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation.
    pub fn operation(mut self, operation: OperationDescriptor) -> Self {
        self.operations.push(operation);
        self
    }

    /// Number of declared operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// True when nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Service for Operations {
    fn operations(&self) -> Vec<OperationDescriptor> {
        self.operations.clone()
    }
}
