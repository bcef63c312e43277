//! Declarative format specifications for rebib
//!
//! A specification is JSON text mapping entry-type names to field rules:
//! renames, value transforms, required/default handling, and an
//! unmapped-field policy, plus a reserved `options` block for global
//! conversion policies. This crate only models and validates that text;
//! it performs no I/O and never sees a BibTeX entry.

mod error;
mod options;
mod rules;

pub use error::ConfigError;
pub use options::{
    DuplicateFieldPolicy, FailedEntrySlot, FailurePolicy, Options, UnknownTypePolicy,
    UnmappedPolicy,
};
pub use rules::{ElideMode, ElideRule, FieldRule, FormatSpec, NamesFormat, Transform, TypeRule};
