//! Specification-driven entry rewriting
//!
//! One entry in, one output block out. The rule's declared fields come
//! first in declaration order, then whatever the unmapped policy keeps,
//! in source order.

use rebib_format::{
    DuplicateFieldPolicy, FormatSpec, Transform, TypeRule, UnknownTypePolicy, UnmappedPolicy,
};
use rebib_syntax::{Entry, Field};

use crate::authors;
use crate::emit;
use crate::error::TranscodeError;

/// Rewrite one entry under the shared specification.
pub fn transcode_entry(entry: &Entry, spec: &FormatSpec) -> Result<String, TranscodeError> {
    let fields = effective_fields(entry, spec.options.duplicate_fields)?;

    let Some(rule) = spec.rule_for(&entry.entry_type) else {
        return match spec.options.unknown_type {
            UnknownTypePolicy::PassThrough => Ok(passthrough(entry, &fields)),
            UnknownTypePolicy::Fail => Err(TranscodeError::UnknownEntryType {
                key: entry.citation_key.clone(),
                entry_type: entry.entry_type.clone(),
            }),
        };
    };

    let mut consumed = vec![false; fields.len()];
    let mut output = Vec::with_capacity(fields.len());

    for field_rule in &rule.fields {
        let found = fields
            .iter()
            .position(|f| f.name_lower == field_rule.source_lower);
        match found {
            Some(index) => {
                consumed[index] = true;
                let value = apply_transform(&field_rule.transform, &fields[index].value, entry)?;
                output.push((field_rule.target.clone(), value));
            }
            None if field_rule.required => match &field_rule.default {
                Some(default) => output.push((field_rule.target.clone(), default.clone())),
                None => {
                    return Err(TranscodeError::MissingRequired {
                        key: entry.citation_key.clone(),
                        field: field_rule.source.clone(),
                    });
                }
            },
            None => {}
        }
    }

    apply_unmapped(entry, rule, &fields, &consumed, &mut output)?;
    Ok(emit::entry_block(
        &entry.entry_type,
        &entry.citation_key,
        &output,
    ))
}

fn apply_unmapped(
    entry: &Entry,
    rule: &TypeRule,
    fields: &[Field],
    consumed: &[bool],
    output: &mut Vec<(String, String)>,
) -> Result<(), TranscodeError> {
    for (field, &used) in fields.iter().zip(consumed) {
        if used {
            continue;
        }
        match rule.unmapped {
            UnmappedPolicy::PassThrough => {
                output.push((field.name.clone(), field.value.clone()));
            }
            UnmappedPolicy::Drop => {}
            UnmappedPolicy::Error => {
                return Err(TranscodeError::UnmappedField {
                    key: entry.citation_key.clone(),
                    entry_type: entry.entry_type.clone(),
                    field: field.name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Resolve duplicate field names up front so rule lookup sees at most one
/// occurrence of each name. Under last-wins the last value lands at the
/// first occurrence's position.
fn effective_fields(
    entry: &Entry,
    policy: DuplicateFieldPolicy,
) -> Result<Vec<Field>, TranscodeError> {
    let mut fields: Vec<Field> = Vec::with_capacity(entry.fields.len());
    for field in &entry.fields {
        match fields.iter_mut().find(|f| f.name_lower == field.name_lower) {
            Some(existing) => match policy {
                DuplicateFieldPolicy::Report => {
                    return Err(TranscodeError::AmbiguousField {
                        key: entry.citation_key.clone(),
                        field: field.name.clone(),
                    });
                }
                DuplicateFieldPolicy::LastWins => existing.value = field.value.clone(),
            },
            None => fields.push(field.clone()),
        }
    }
    Ok(fields)
}

fn passthrough(entry: &Entry, fields: &[Field]) -> String {
    let output: Vec<(String, String)> = fields
        .iter()
        .map(|f| (f.name.clone(), f.value.clone()))
        .collect();
    emit::entry_block(&entry.entry_type, &entry.citation_key, &output)
}

fn apply_transform(
    transform: &Transform,
    value: &str,
    entry: &Entry,
) -> Result<String, TranscodeError> {
    match transform {
        Transform::Identity => Ok(value.to_string()),
        Transform::Lowercase => Ok(value.to_lowercase()),
        Transform::Uppercase => Ok(value.to_uppercase()),
        Transform::Template { pattern, rewrite } => match pattern.captures(value) {
            Some(captures) => {
                let mut out = String::new();
                captures.expand(rewrite, &mut out);
                Ok(out)
            }
            // Non-matching values pass through untouched.
            None => Ok(value.to_string()),
        },
        Transform::Replace { find, replace } => Ok(value.replace(find, replace)),
        Transform::Names(format) => {
            authors::format_names(value, format).map_err(|err| TranscodeError::BadName {
                key: entry.citation_key.clone(),
                name: err.name,
                message: err.message,
            })
        }
    }
}
