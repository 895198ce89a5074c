//! Adapter between field values and a host's key-value store.
//!
//! The engine persists nothing itself. [`FieldStore`] derives storage keys and
//! runs each kind's storage codec; the host supplies a [`StorageBackend`].

use std::collections::HashMap;

use tracing::trace;

use crate::error::{FieldsError, Result};
use crate::registry::FieldRegistry;
use crate::value::{RecordId, Value, Values};

/// Prefix namespacing field values among a record's other metadata.
pub const STORAGE_PREFIX: &str = "_fw_";

/// Storage key for a field name.
pub fn storage_key(name: &str) -> String {
    format!("{STORAGE_PREFIX}{name}")
}

/// A per-record key-value store.
pub trait StorageBackend {
    fn read(&self, record: RecordId, key: &str) -> Result<Option<Value>>;

    fn write(&mut self, record: RecordId, key: &str, value: Value) -> Result<()>;
}

/// Reads and writes field values for records through a backend.
#[derive(Debug)]
pub struct FieldStore<'r, S> {
    registry: &'r FieldRegistry,
    backend: S,
}

impl<'r, S: StorageBackend> FieldStore<'r, S> {
    pub fn new(registry: &'r FieldRegistry, backend: S) -> Self {
        Self { registry, backend }
    }

    /// Load one field's value, decoded. A missing value yields the field's
    /// default, else the kind's empty value.
    pub fn load(&self, record: RecordId, name: &str) -> Result<Value> {
        let def = self
            .registry
            .get(name)
            .ok_or_else(|| FieldsError::FieldNotFound {
                name: name.to_string(),
            })?;
        let kind = self
            .registry
            .types()
            .get(&def.field_type)
            .ok_or_else(|| FieldsError::UnknownFieldType {
                field_type: def.field_type.clone(),
            })?;

        match self.backend.read(record, &storage_key(&def.name))? {
            Some(raw) => Ok(kind.decode_from_storage(&raw)),
            None => Ok(def.default.clone().unwrap_or_else(|| kind.default_value())),
        }
    }

    /// Load every registered field whose kind is known.
    pub fn load_all(&self, record: RecordId) -> Result<Values> {
        let mut values = Values::new();
        for name in self.registry.names() {
            match self.load(record, name) {
                Ok(value) => {
                    values.insert(name.to_string(), value);
                }
                Err(FieldsError::UnknownFieldType { field_type }) => {
                    trace!(name, %field_type, "skipping field with unknown type");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(values)
    }

    /// Encode and store one field's value.
    pub fn save(&mut self, record: RecordId, name: &str, value: &Value) -> Result<()> {
        let def = self
            .registry
            .get(name)
            .ok_or_else(|| FieldsError::FieldNotFound {
                name: name.to_string(),
            })?;
        let kind = self
            .registry
            .types()
            .get(&def.field_type)
            .ok_or_else(|| FieldsError::UnknownFieldType {
                field_type: def.field_type.clone(),
            })?;
        self.backend
            .write(record, &storage_key(&def.name), kind.encode_for_storage(value))
    }

    /// Store every registered field present in `values`. Unregistered names
    /// are ignored. Returns how many were written.
    pub fn save_all(&mut self, record: RecordId, values: &Values) -> Result<usize> {
        let mut written = 0;
        for (name, value) in values {
            if !self.registry.contains(name) {
                trace!(name = %name, "not saving unregistered field");
                continue;
            }
            self.save(record, name, value)?;
            written += 1;
        }
        Ok(written)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_inner(self) -> S {
        self.backend
    }
}

/// In-memory backend for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<(RecordId, String), Value>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value exactly as written, without decoding.
    pub fn raw(&self, record: RecordId, key: &str) -> Option<&Value> {
        self.entries.get(&(record, key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, record: RecordId, key: &str) -> Result<Option<Value>> {
        Ok(self.raw(record, key).cloned())
    }

    fn write(&mut self, record: RecordId, key: &str, value: Value) -> Result<()> {
        self.entries.insert((record, key.to_string()), value);
        Ok(())
    }
}
