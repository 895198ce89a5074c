//! Catalog of field kinds keyed by identifier.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{FieldsError, Result};
use crate::field_type::{Capabilities, FieldType};
use crate::kinds::builtin_types;

pub type TypeRegisteredHook = Box<dyn Fn(&str) + Send + Sync>;

/// Register-once map from identifier to kind.
#[derive(Default)]
pub struct TypeRegistry {
    types: IndexMap<String, Arc<dyn FieldType>>,
    listeners: Vec<TypeRegisteredHook>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every stock kind.
    pub fn with_builtin_types() -> Self {
        let mut registry = Self::new();
        for field_type in builtin_types() {
            // Stock identifiers are unique, so this cannot collide.
            let _ = registry.register(field_type);
        }
        registry
    }

    /// Register a kind. Fails if its identifier is taken; the existing kind
    /// is kept.
    pub fn register(&mut self, field_type: Arc<dyn FieldType>) -> Result<()> {
        let identifier = field_type.identifier().to_string();
        if self.types.contains_key(&identifier) {
            warn!(identifier = %identifier, "field type already registered");
            return Err(FieldsError::DuplicateFieldType { identifier });
        }
        self.types.insert(identifier.clone(), field_type);
        debug!(identifier = %identifier, "registered field type");
        for listener in &self.listeners {
            listener(&identifier);
        }
        Ok(())
    }

    pub fn get(&self, identifier: &str) -> Option<Arc<dyn FieldType>> {
        self.types.get(identifier).cloned()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.types.contains_key(identifier)
    }

    /// Every registered kind, in registration order.
    pub fn all(&self) -> &IndexMap<String, Arc<dyn FieldType>> {
        &self.types
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    /// Kinds whose capabilities satisfy `predicate`.
    pub fn with_capability(&self, predicate: impl Fn(Capabilities) -> bool) -> Vec<Arc<dyn FieldType>> {
        self.types
            .values()
            .filter(|t| predicate(t.capabilities()))
            .cloned()
            .collect()
    }

    /// Called with the identifier of each kind registered from now on.
    pub fn on_registered(&mut self, f: impl Fn(&str) + Send + Sync + 'static) {
        self.listeners.push(Box::new(f));
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Remove every kind. Listeners stay attached.
    pub fn clear(&mut self) {
        self.types.clear();
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.identifiers())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
