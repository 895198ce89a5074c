//! Validation, rendering and form wrappers over a fieldworks registry
//!
//! Everything here borrows a [`FieldRegistry`](fieldworks_fields::FieldRegistry)
//! the host built during start-up. [`Validator`] turns untrusted input into
//! sanitized values plus a per-field error set; [`Renderer`] projects fields
//! into the editor, the public submission form or read-only display.
//!
//! ```
//! use fieldworks_fields::{FieldConfig, FieldRegistry, Values};
//! use fieldworks_forms::{BulkOptions, Validator};
//!
//! let mut registry = FieldRegistry::with_builtin_types();
//! registry.register("email", FieldConfig::new("email").required()).unwrap();
//!
//! let result = Validator::new(&registry).process(&Values::new(), &BulkOptions::new());
//! assert!(!result.valid);
//! ```

pub mod forms;
pub mod groups;
pub mod render;
pub mod validation;

pub use forms::{
    display_list, editor_form, submission_form, FormOptions, RECORD_ID_FIELD, TOKEN_FIELD,
    TOKEN_PLACEHOLDER,
};
pub use groups::{FieldGroup, GroupSet};
pub use render::{RenderSelection, Renderer};
pub use validation::{BulkOptions, ProcessResult, Validator, DEFAULT_CONTEXT};
