//! Output assembly
//!
//! Entries are re-emitted as single-line blocks with every value
//! brace-delimited, whatever quoting style the input used:
//! `@type{key, field = {value}, ...}`.

/// Assemble one entry block from already-ordered output fields.
pub fn entry_block(entry_type: &str, citation_key: &str, fields: &[(String, String)]) -> String {
    let mut capacity = entry_type.len() + citation_key.len() + 3;
    for (name, value) in fields {
        capacity += name.len() + value.len() + 8;
    }
    let mut out = String::with_capacity(capacity);
    out.push('@');
    out.push_str(entry_type);
    out.push('{');
    out.push_str(citation_key);
    for (name, value) in fields {
        out.push_str(", ");
        out.push_str(name);
        out.push_str(" = {");
        out.push_str(value);
        out.push('}');
    }
    out.push('}');
    out
}

/// The placeholder slot a failed entry leaves in the output sequence.
pub fn failure_placeholder(citation_key: &str, message: &str) -> String {
    format!("@comment{{rebib: entry '{}' failed: {}}}", citation_key, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_block_shape() {
        let fields = vec![
            ("booktitle".to_string(), "Deep Learning".to_string()),
            ("year".to_string(), "2020".to_string()),
        ];
        assert_eq!(
            entry_block("article", "doe2020", &fields),
            "@article{doe2020, booktitle = {Deep Learning}, year = {2020}}"
        );
    }

    #[test]
    fn test_entry_block_without_fields() {
        assert_eq!(entry_block("misc", "k", &[]), "@misc{k}");
    }

    #[test]
    fn test_nested_braces_kept_verbatim() {
        let fields = vec![("title".to_string(), "{Deep} Learning".to_string())];
        assert_eq!(
            entry_block("article", "k", &fields),
            "@article{k, title = {{Deep} Learning}}"
        );
    }
}
