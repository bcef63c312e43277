//! Global conversion policies
//!
//! Read from the reserved `options` key of the specification JSON. Every
//! knob defaults to the permissive setting so a bare specification behaves
//! like a renamer, not a validator.

use serde::Deserialize;

/// What to do with an entry whose type has no rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownTypePolicy {
    /// Re-emit the entry unchanged.
    #[default]
    PassThrough,
    /// Record a per-entry failure.
    Fail,
}

/// What to do when one entry carries the same field name twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateFieldPolicy {
    /// Report the ambiguity as a per-entry failure.
    #[default]
    Report,
    /// The last occurrence wins, silently.
    LastWins,
}

/// Whether a per-entry failure aborts the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    #[default]
    Collect,
    Abort,
}

/// What a failed entry leaves behind in the output sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailedEntrySlot {
    /// A `@comment{rebib: ...}` slot, keeping one output per parsed entry.
    #[default]
    Placeholder,
    Omit,
}

/// Per-type policy for fields no rule mentions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnmappedPolicy {
    /// Keep them verbatim, in source order, after the ruled fields.
    #[default]
    PassThrough,
    Drop,
    Error,
}

/// The global policy block.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Options {
    #[serde(default)]
    pub unknown_type: UnknownTypePolicy,
    #[serde(default)]
    pub duplicate_fields: DuplicateFieldPolicy,
    #[serde(default)]
    pub on_error: FailurePolicy,
    #[serde(default)]
    pub failed_entry: FailedEntrySlot,
}
