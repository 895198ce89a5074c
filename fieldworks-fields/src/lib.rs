//! Field registry and pluggable field kinds
//!
//! `fieldworks-fields` is the schema half of fieldworks. It owns field
//! definitions and the catalog of field kinds, and knows nothing about where
//! values are stored or how a host lays out its screens. Consumers decide which
//! fields exist via `register()`, `register_defaults_from()` or the external
//! fields hook.
//!
//! # Architecture
//!
//! - **Kind-agnostic**: every kind implements [`FieldType`]; the registry only
//!   ever talks to the trait
//! - **Register once**: duplicate field names and kind identifiers are rejected,
//!   never overwritten
//! - **Typed configuration**: [`FieldConfig`] carries documented defaults and is
//!   normalized once at registration
//! - **Typed extension points**: [`Hooks`] is a fixed set of filter and
//!   notification lists, not a string-keyed bus
//! - **No persistence**: [`storage`] only derives keys and encodes values for a
//!   host-provided [`StorageBackend`]

pub mod defaults;
pub mod error;
pub mod field_type;
pub mod hooks;
pub mod kinds;
pub mod markup;
pub mod registry;
pub mod sanitize;
pub mod storage;
pub mod type_registry;
pub mod types;
pub mod value;

pub use defaults::{builtin_defaults, FieldDefaults};
pub use error::{ErrorCategory, FieldOutcome, FieldsError, Result, ValidationErrors};
pub use field_type::{check_presence, required_message, Capabilities, FieldType};
pub use hooks::Hooks;
pub use registry::{FieldQuery, FieldRegistry, OrderBy, SortOrder};
pub use storage::{storage_key, FieldStore, MemoryStorage, StorageBackend, STORAGE_PREFIX};
pub use type_registry::TypeRegistry;
pub use types::{Applicability, FieldConfig, FieldDef, RenderContext};
pub use value::{
    derive_label, empty_sentinel, is_empty_value, sanitize_key, value_to_string, RecordId, Value,
    Values,
};
