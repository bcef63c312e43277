//! Specification model
//!
//! The specification JSON is an object keyed by entry-type name, plus one
//! reserved sibling key `options` for the global policies:
//!
//! ```json
//! {
//!   "options": { "unknown-type": "pass-through" },
//!   "article": {
//!     "unmapped": "pass-through",
//!     "fields": [
//!       { "source": "title", "target": "booktitle" },
//!       { "source": "year", "required": true, "target": "year", "default": "n.d." }
//!     ]
//!   }
//! }
//! ```
//!
//! Deserialization keeps duplicate type keys visible so the model can
//! reject them; validation then happens per type rule.

use std::collections::{HashMap, HashSet};
use std::fmt;

use regex::Regex;
use serde::de;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::options::{Options, UnmappedPolicy};

/// How to render one contributor name under the `names` transform.
/// Format characters: `f`/`m`/`l` emit the full first/middle/last part,
/// `F`/`M`/`L` its initial with a dot, and a `[...]` section is dropped
/// entirely when the name has no middle part.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamesFormat {
    #[serde(default = "default_name_fmt")]
    pub fmt: String,
    #[serde(default = "default_name_sep")]
    pub sep: String,
    #[serde(default = "default_name_and")]
    pub and: String,
    #[serde(default)]
    pub elide: Option<ElideRule>,
}

fn default_name_fmt() -> String {
    "f [m ]l".to_string()
}

fn default_name_sep() -> String {
    ", ".to_string()
}

fn default_name_and() -> String {
    " and ".to_string()
}

impl Default for NamesFormat {
    fn default() -> Self {
        NamesFormat {
            fmt: default_name_fmt(),
            sep: default_name_sep(),
            and: default_name_and(),
            elide: None,
        }
    }
}

/// Et-al elision for long contributor lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElideRule {
    /// Maximum number of names rendered in full.
    pub limit: usize,
    #[serde(default = "default_elide_marker")]
    pub marker: String,
    #[serde(default)]
    pub mode: ElideMode,
}

fn default_elide_marker() -> String {
    " et al.".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElideMode {
    /// Keep the first `limit` names, then the marker.
    #[default]
    Last,
    /// Keep the first `limit` names and the final one, marker in between.
    BeforeLast,
}

/// A value transformation. A closed set: adding a kind means adding a
/// variant here and a match arm in the transcoder.
#[derive(Debug, Clone)]
pub enum Transform {
    Identity,
    Lowercase,
    Uppercase,
    /// Rewrite values matching `pattern` through `rewrite`, which may
    /// reference named captures as `$name`. Non-matching values pass
    /// through unchanged.
    Template { pattern: Regex, rewrite: String },
    /// Exact-substring replacement.
    Replace { find: String, replace: String },
    /// Contributor-list reformatting.
    Names(NamesFormat),
}

/// One source-field directive, fully validated.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub source: String,
    pub source_lower: String,
    pub target: String,
    pub transform: Transform,
    pub required: bool,
    pub default: Option<String>,
}

/// All directives for one entry type.
#[derive(Debug, Clone)]
pub struct TypeRule {
    pub fields: Vec<FieldRule>,
    pub unmapped: UnmappedPolicy,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFieldRule {
    source: String,
    target: Option<String>,
    transform: Option<String>,
    #[serde(default)]
    required: bool,
    default: Option<String>,
    pattern: Option<String>,
    rewrite: Option<String>,
    find: Option<String>,
    replace: Option<String>,
    names: Option<NamesFormat>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTypeRule {
    #[serde(default)]
    fields: Vec<RawFieldRule>,
    #[serde(default)]
    unmapped: UnmappedPolicy,
}

#[derive(Debug)]
struct RawSpec {
    options: Options,
    types: Vec<(String, serde_json::Value)>,
}

// Hand-written so duplicate type keys survive deserialization: a plain
// JSON map would resolve `{"article": ..., "article": ...}` last-wins
// before the model could reject it.
impl<'de> Deserialize<'de> for RawSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SpecVisitor;

        impl<'de> de::Visitor<'de> for SpecVisitor {
            type Value = RawSpec;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a format specification object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<RawSpec, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut options = None;
                let mut types = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    if key == "options" {
                        if options.replace(map.next_value()?).is_some() {
                            return Err(de::Error::custom("duplicate 'options' block"));
                        }
                    } else {
                        types.push((key, map.next_value()?));
                    }
                }
                Ok(RawSpec {
                    options: options.unwrap_or_default(),
                    types,
                })
            }
        }

        deserializer.deserialize_map(SpecVisitor)
    }
}

/// A parsed, validated format specification. Built once per conversion and
/// shared read-only across every entry.
#[derive(Debug, Clone)]
pub struct FormatSpec {
    pub options: Options,
    types: HashMap<String, TypeRule>,
}

impl FormatSpec {
    /// Build a specification from its JSON text.
    pub fn from_str(text: &str) -> Result<Self, ConfigError> {
        // Deserialized straight from the text: a detour through
        // `serde_json::Value` would collapse duplicate type keys before
        // the model could reject them.
        let raw: RawSpec = serde_json::from_str(text)?;

        let mut types = HashMap::new();
        for (name, body) in raw.types {
            let lowered = name.to_lowercase();
            let raw_rule: RawTypeRule = serde_json::from_value(body)?;
            let rule = build_type_rule(&lowered, raw_rule)?;
            if types.insert(lowered, rule).is_some() {
                return Err(ConfigError::DuplicateType(name));
            }
        }

        Ok(FormatSpec {
            options: raw.options,
            types,
        })
    }

    /// The rule for an entry type, case-insensitively.
    pub fn rule_for(&self, entry_type: &str) -> Option<&TypeRule> {
        self.types.get(&entry_type.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn build_type_rule(entry_type: &str, raw: RawTypeRule) -> Result<TypeRule, ConfigError> {
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(raw.fields.len());
    for raw_field in raw.fields {
        let source_lower = raw_field.source.to_lowercase();
        if !seen.insert(source_lower.clone()) {
            return Err(ConfigError::DuplicateSource {
                entry_type: entry_type.to_string(),
                field: raw_field.source,
            });
        }
        fields.push(build_field_rule(entry_type, raw_field, source_lower)?);
    }
    Ok(TypeRule {
        fields,
        unmapped: raw.unmapped,
    })
}

fn build_field_rule(
    entry_type: &str,
    raw: RawFieldRule,
    source_lower: String,
) -> Result<FieldRule, ConfigError> {
    if raw.required && raw.target.is_none() {
        return Err(ConfigError::MissingTarget {
            entry_type: entry_type.to_string(),
            field: raw.source,
        });
    }
    let transform = build_transform(entry_type, &raw)?;
    let target = raw.target.unwrap_or_else(|| raw.source.clone());
    Ok(FieldRule {
        source: raw.source,
        source_lower,
        target,
        transform,
        required: raw.required,
        default: raw.default,
    })
}

fn build_transform(entry_type: &str, raw: &RawFieldRule) -> Result<Transform, ConfigError> {
    let kind = raw.transform.as_deref().unwrap_or("identity");
    let missing = |parameter: &'static str| ConfigError::MissingParameter {
        entry_type: entry_type.to_string(),
        field: raw.source.clone(),
        kind: kind.to_string(),
        parameter,
    };
    match kind {
        "identity" => Ok(Transform::Identity),
        "lowercase" => Ok(Transform::Lowercase),
        "uppercase" => Ok(Transform::Uppercase),
        "template" => {
            let pattern = raw.pattern.as_deref().ok_or_else(|| missing("pattern"))?;
            let rewrite = raw.rewrite.clone().ok_or_else(|| missing("rewrite"))?;
            let pattern = Regex::new(pattern).map_err(|err| ConfigError::BadPattern {
                pattern: pattern.to_string(),
                message: err.to_string(),
            })?;
            Ok(Transform::Template { pattern, rewrite })
        }
        "replace" => {
            let find = raw.find.clone().ok_or_else(|| missing("find"))?;
            let replace = raw.replace.clone().ok_or_else(|| missing("replace"))?;
            Ok(Transform::Replace { find, replace })
        }
        "names" => Ok(Transform::Names(raw.names.clone().unwrap_or_default())),
        _ => Err(ConfigError::UnknownTransform {
            entry_type: entry_type.to_string(),
            field: raw.source.clone(),
            kind: kind.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_spec() {
        let spec = FormatSpec::from_str(
            r#"{"article": {"fields": [{"source": "title", "target": "booktitle"}]}}"#,
        )
        .unwrap();
        let rule = spec.rule_for("article").unwrap();
        assert_eq!(rule.fields.len(), 1);
        assert_eq!(rule.fields[0].target, "booktitle");
        assert!(matches!(rule.fields[0].transform, Transform::Identity));
    }

    #[test]
    fn test_empty_spec_is_identity() {
        let spec = FormatSpec::from_str("{}").unwrap();
        assert!(spec.is_empty());
        assert!(spec.rule_for("article").is_none());
    }

    #[test]
    fn test_type_lookup_case_insensitive() {
        let spec = FormatSpec::from_str(r#"{"Article": {}}"#).unwrap();
        assert!(spec.rule_for("ARTICLE").is_some());
    }

    #[test]
    fn test_target_defaults_to_source() {
        let spec =
            FormatSpec::from_str(r#"{"article": {"fields": [{"source": "Title"}]}}"#).unwrap();
        let rule = spec.rule_for("article").unwrap();
        assert_eq!(rule.fields[0].target, "Title");
        assert_eq!(rule.fields[0].source_lower, "title");
    }

    #[test]
    fn test_invalid_json_reported_as_such() {
        let err = FormatSpec::from_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson(_)));
    }

    #[test]
    fn test_duplicate_type_after_case_folding() {
        let err = FormatSpec::from_str(r#"{"Article": {}, "article": {}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateType(_)));
    }

    #[test]
    fn test_duplicate_type_byte_identical() {
        let err = FormatSpec::from_str(
            r#"{"article": {"unmapped": "drop"}, "article": {"unmapped": "error"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateType(ref name) if name == "article"));
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let err = FormatSpec::from_str(
            r#"{"article": {"fields": [{"source": "title"}, {"source": "TITLE"}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSource { .. }));
    }

    #[test]
    fn test_unknown_transform_kind() {
        let err = FormatSpec::from_str(
            r#"{"article": {"fields": [{"source": "title", "transform": "rot13"}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownTransform { ref kind, .. } if kind == "rot13"
        ));
    }

    #[test]
    fn test_required_without_target_rejected() {
        let err = FormatSpec::from_str(
            r#"{"article": {"fields": [{"source": "year", "required": true}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingTarget { .. }));
    }

    #[test]
    fn test_template_requires_pattern_and_rewrite() {
        let err = FormatSpec::from_str(
            r#"{"article": {"fields": [{"source": "pages", "transform": "template"}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingParameter { parameter: "pattern", .. }
        ));
    }

    #[test]
    fn test_template_bad_regex() {
        let err = FormatSpec::from_str(
            r#"{"article": {"fields": [
                {"source": "pages", "transform": "template",
                 "pattern": "(unclosed", "rewrite": "x"}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::BadPattern { .. }));
    }

    #[test]
    fn test_names_transform_defaults() {
        let spec = FormatSpec::from_str(
            r#"{"article": {"fields": [{"source": "author", "transform": "names"}]}}"#,
        )
        .unwrap();
        let rule = spec.rule_for("article").unwrap();
        match &rule.fields[0].transform {
            Transform::Names(format) => {
                assert_eq!(format.fmt, "f [m ]l");
                assert_eq!(format.and, " and ");
                assert!(format.elide.is_none());
            }
            other => panic!("expected names transform, got {:?}", other),
        }
    }

    #[test]
    fn test_options_block_is_reserved() {
        let spec = FormatSpec::from_str(
            r#"{"options": {"unknown-type": "fail"}, "misc": {}}"#,
        )
        .unwrap();
        assert_eq!(
            spec.options.unknown_type,
            crate::options::UnknownTypePolicy::Fail
        );
        assert!(spec.rule_for("options").is_none());
    }
}
