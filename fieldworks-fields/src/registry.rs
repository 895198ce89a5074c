//! FieldRegistry: the catalog of field definitions.
//!
//! Owns the [`TypeRegistry`] and the [`Hooks`]. Hosts build one registry
//! during start-up (register kinds, then fields, then `load_external()`)
//! and hand out shared references afterwards.

use std::cmp::Ordering;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::defaults::{builtin_defaults, FieldDefaults};
use crate::error::{FieldsError, Result};
use crate::field_type::FieldType;
use crate::hooks::Hooks;
use crate::type_registry::TypeRegistry;
use crate::types::{FieldConfig, FieldDef};
use crate::value::sanitize_key;

/// Sort key for [`FieldRegistry::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderBy {
    #[default]
    Priority,
    Name,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Criteria for [`FieldRegistry::list`]. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldQuery {
    pub field_type: Option<String>,
    pub searchable: Option<bool>,
    pub filterable: Option<bool>,
    pub admin_only: Option<bool>,
    /// Record tag; global fields always match
    pub applicability: Option<String>,
    pub order_by: OrderBy,
    pub order: SortOrder,
}

impl FieldQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = Some(field_type.into());
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = Some(searchable);
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = Some(filterable);
        self
    }

    pub fn admin_only(mut self, admin_only: bool) -> Self {
        self.admin_only = Some(admin_only);
        self
    }

    pub fn applies_to(mut self, tag: impl Into<String>) -> Self {
        self.applicability = Some(tag.into());
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    fn matches(&self, def: &FieldDef) -> bool {
        self.field_type.as_ref().is_none_or(|t| *t == def.field_type)
            && self.searchable.is_none_or(|s| s == def.searchable)
            && self.filterable.is_none_or(|f| f == def.filterable)
            && self.admin_only.is_none_or(|a| a == def.admin_only)
            && self
                .applicability
                .as_ref()
                .is_none_or(|tag| def.applies_to(tag))
    }

    fn compare(&self, a: &FieldDef, b: &FieldDef) -> Ordering {
        let ordering = match self.order_by {
            OrderBy::Priority => a.priority.cmp(&b.priority),
            OrderBy::Name => a.name.cmp(&b.name),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// The field definition catalog.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    types: TypeRegistry,
    fields: IndexMap<String, FieldDef>,
    hooks: Hooks,
    external_loaded: bool,
}

impl FieldRegistry {
    /// A registry with no kinds and no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every stock kind and no fields.
    pub fn with_builtin_types() -> Self {
        Self::with_types(TypeRegistry::with_builtin_types())
    }

    pub fn with_types(types: TypeRegistry) -> Self {
        Self {
            types,
            ..Self::default()
        }
    }

    // --- Registration ---

    /// Register a field under `name`.
    ///
    /// The name is normalized to `[a-z0-9_-]`. Fails when it normalizes to
    /// nothing or is already taken; the existing definition is never
    /// overwritten.
    pub fn register(&mut self, name: &str, config: FieldConfig) -> Result<()> {
        let key = sanitize_key(name);
        if key.is_empty() {
            warn!(raw = %name, "field name is empty after normalization");
            return Err(FieldsError::InvalidFieldName {
                raw: name.to_string(),
            });
        }
        if self.fields.contains_key(&key) {
            warn!(name = %key, "field already registered");
            return Err(FieldsError::DuplicateFieldName { name: key });
        }

        let mut def = self
            .hooks
            .apply_field_config(FieldDef::from_config(key.clone(), config));
        // The stored name always matches the registry key.
        def.name = key.clone();
        debug!(name = %key, field_type = %def.field_type, "registered field");
        self.fields.insert(key, def.clone());
        self.hooks.notify_field_registered(&def);
        Ok(())
    }

    /// Remove a field. Returns whether anything was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let key = sanitize_key(name);
        if self.fields.shift_remove(&key).is_none() {
            return false;
        }
        debug!(name = %key, "unregistered field");
        self.hooks.notify_field_unregistered(&key);
        true
    }

    /// Register every entry of `defaults` that is not registered yet.
    /// Returns how many were added.
    pub fn register_defaults_from(&mut self, defaults: &FieldDefaults) -> usize {
        let added = self.register_missing(defaults.fields().clone());
        debug!(count = added, "registered default fields");
        added
    }

    /// Register the built-in starter set. Idempotent.
    pub fn register_defaults(&mut self) -> usize {
        self.register_defaults_from(&builtin_defaults())
    }

    /// Ask the external-fields hook for contributions and register them.
    ///
    /// Runs once per registry; later calls return 0 without firing the hook.
    pub fn load_external(&mut self) -> usize {
        if self.external_loaded {
            return 0;
        }
        self.external_loaded = true;
        let external = self.hooks.apply_external_fields();
        let added = self.register_missing(external);
        debug!(count = added, "registered external fields");
        added
    }

    pub fn external_loaded(&self) -> bool {
        self.external_loaded
    }

    fn register_missing(&mut self, configs: IndexMap<String, FieldConfig>) -> usize {
        let mut added = 0;
        for (name, config) in configs {
            if self.contains(&name) {
                continue;
            }
            if self.register(&name, config).is_ok() {
                added += 1;
            }
        }
        added
    }

    // --- Lookup ---

    /// The definition for `name`, passed through the read filter.
    pub fn get(&self, name: &str) -> Option<FieldDef> {
        let def = match self.fields.get(name) {
            Some(def) => def,
            None => self.fields.get(&sanitize_key(name))?,
        };
        Some(self.hooks.apply_field_read(def.clone()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name) || self.fields.contains_key(&sanitize_key(name))
    }

    /// The kind a field's definition names, if both exist.
    pub fn field_type_of(&self, name: &str) -> Option<Arc<dyn FieldType>> {
        self.get(name).and_then(|def| self.types.get(&def.field_type))
    }

    /// Field names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Definitions matching `query`, sorted by its key.
    ///
    /// The sort is stable, so equal keys keep registration order.
    pub fn list(&self, query: &FieldQuery) -> IndexMap<String, FieldDef> {
        let mut defs: Vec<(&String, FieldDef)> = self
            .fields
            .iter()
            .map(|(key, def)| (key, self.hooks.apply_field_read(def.clone())))
            .filter(|(_, def)| query.matches(def))
            .collect();
        defs.sort_by(|(_, a), (_, b)| query.compare(a, b));
        defs.into_iter()
            .map(|(key, def)| (key.clone(), def))
            .collect()
    }

    pub fn searchable_fields(&self) -> IndexMap<String, FieldDef> {
        self.list(&FieldQuery::new().searchable(true))
    }

    pub fn filterable_fields(&self) -> IndexMap<String, FieldDef> {
        self.list(&FieldQuery::new().filterable(true))
    }

    /// Fields shown outside the editor.
    pub fn public_fields(&self) -> IndexMap<String, FieldDef> {
        self.list(&FieldQuery::new().admin_only(false))
    }

    pub fn admin_fields(&self) -> IndexMap<String, FieldDef> {
        self.list(&FieldQuery::new().admin_only(true))
    }

    // --- Owned collaborators ---

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    /// Shorthand for `types_mut().register(..)`.
    pub fn register_type(&mut self, field_type: Arc<dyn FieldType>) -> Result<()> {
        self.types.register(field_type)
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    // --- Teardown ---

    /// Clear fields, kinds and the external-loaded flag. Hooks stay attached.
    pub fn reset(&mut self) {
        self.fields.clear();
        self.types.clear();
        self.external_loaded = false;
    }

    /// Clear fields and the external-loaded flag, keeping kinds.
    pub fn reset_fields_only(&mut self) {
        self.fields.clear();
        self.external_loaded = false;
    }
}
