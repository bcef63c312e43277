//! Parsed entry model

use serde::Serialize;

/// A single field within an entry. Field names keep their original casing
/// for output; lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(skip_serializing)]
    pub name_lower: String,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let name_lower = name.to_lowercase();
        Field {
            name,
            name_lower,
            value: value.into(),
        }
    }
}

/// One BibTeX entry: a lowercased type, a citation key with its original
/// casing, and fields in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub entry_type: String,
    pub citation_key: String,
    pub fields: Vec<Field>,
}

impl Entry {
    pub fn new(entry_type: impl Into<String>, citation_key: impl Into<String>) -> Self {
        Entry {
            entry_type: entry_type.into(),
            citation_key: citation_key.into(),
            fields: Vec::new(),
        }
    }

    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(Field::new(name, value));
    }

    /// First field matching `name`, case-insensitively.
    pub fn get_field(&self, name: &str) -> Option<&str> {
        let wanted = name.to_lowercase();
        self.fields
            .iter()
            .find(|f| f.name_lower == wanted)
            .map(|f| f.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_field_case_insensitive() {
        let mut entry = Entry::new("article", "doe2020");
        entry.add_field("Title", "Deep Learning");
        assert_eq!(entry.get_field("title"), Some("Deep Learning"));
        assert_eq!(entry.get_field("TITLE"), Some("Deep Learning"));
        assert_eq!(entry.get_field("author"), None);
    }

    #[test]
    fn test_get_field_returns_first_duplicate() {
        let mut entry = Entry::new("article", "k");
        entry.add_field("year", "2019");
        entry.add_field("Year", "2020");
        assert_eq!(entry.get_field("year"), Some("2019"));
    }

    #[test]
    fn test_fields_keep_source_order() {
        let mut entry = Entry::new("book", "k");
        entry.add_field("zzz", "1");
        entry.add_field("aaa", "2");
        let names: Vec<_> = entry.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["zzz", "aaa"]);
    }
}
