//! Operation name → HTTP method and path.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Explicit placement of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodReg {
    /// HTTP method, used verbatim.
    pub method: String,
    /// Path, used verbatim.
    pub path: String,
}

impl MethodReg {
    /// Placement at `method` + `path`.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
}

/// Per-operation placement overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodOverrides {
    routes: BTreeMap<String, MethodReg>,
}

impl MethodOverrides {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `operation` to `method` + `path`.
    pub fn route(
        mut self,
        operation: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        self.routes
            .insert(operation.into(), MethodReg::new(method, path));
        self
    }

    /// Take every route from `other`, replacing routes with the same name.
    pub fn merge(&mut self, other: &MethodOverrides) {
        self.routes
            .extend(other.routes.iter().map(|(name, reg)| (name.clone(), reg.clone())));
    }

    /// Override registered for `operation`.
    pub fn get(&self, operation: &str) -> Option<&MethodReg> {
        self.routes.get(operation)
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when there are no overrides.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Caller-supplied naming function: operation name → method or path.
pub type NameFn<'a> = &'a dyn Fn(&str) -> String;

/// Resolves where each operation lands in the document.
///
/// An override is taken as a whole; it is never combined with the defaults.
#[derive(Clone, Copy)]
pub struct Placement<'a> {
    overrides: &'a MethodOverrides,
    default_method: NameFn<'a>,
    default_path: NameFn<'a>,
}

impl<'a> Placement<'a> {
    /// Policy over `overrides` with the given fallbacks.
    pub fn new(
        overrides: &'a MethodOverrides,
        default_method: NameFn<'a>,
        default_path: NameFn<'a>,
    ) -> Self {
        Self {
            overrides,
            default_method,
            default_path,
        }
    }

    /// Method and path for `operation`.
    pub fn resolve(&self, operation: &str) -> MethodReg {
        match self.overrides.get(operation) {
            Some(explicit) => explicit.clone(),
            None => MethodReg {
                method: (self.default_method)(operation),
                path: (self.default_path)(operation),
            },
        }
    }
}

impl fmt::Debug for Placement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Placement")
            .field("overrides", self.overrides)
            .finish_non_exhaustive()
    }
}
