use rebib::{convert, convert_entry, ConvertError};

const RENAME_SPEC: &str =
    r#"{"article": {"fields": [{"source": "title", "target": "booktitle"}]}}"#;

const IDENTITY_SPEC: &str = "{}";

#[test]
fn test_worked_example() {
    let outcome = convert(
        "@article{doe2020, title={Deep Learning}, year=2020}",
        RENAME_SPEC,
    )
    .unwrap();
    assert_eq!(
        outcome.outputs,
        vec!["@article{doe2020, booktitle = {Deep Learning}, year = {2020}}"]
    );
    assert!(outcome.failures.is_empty());
}

#[test]
fn test_one_output_per_entry_in_source_order() {
    let input = "\
        @article{a1, title={One}}\n\
        @book{b1, title={Two}}\n\
        @misc{m1, title={Three}}\n";
    let outcome = convert(input, IDENTITY_SPEC).unwrap();
    assert_eq!(outcome.outputs.len(), 3);
    assert!(outcome.outputs[0].starts_with("@article{a1"));
    assert!(outcome.outputs[1].starts_with("@book{b1"));
    assert!(outcome.outputs[2].starts_with("@misc{m1"));
}

#[test]
fn test_identity_spec_normalizes_quotes_to_braces() {
    let outcome = convert(
        r#"@article{k, title = "A {Nested} Title", year = 2020}"#,
        IDENTITY_SPEC,
    )
    .unwrap();
    assert_eq!(
        outcome.outputs,
        vec!["@article{k, title = {A {Nested} Title}, year = {2020}}"]
    );
}

#[test]
fn test_idempotence_under_the_same_spec() {
    let once = convert(
        "@article{doe2020, title={Deep Learning}, year=2020}",
        RENAME_SPEC,
    )
    .unwrap();
    let twice = convert(&once.outputs.join("\n"), RENAME_SPEC).unwrap();
    assert_eq!(once.outputs, twice.outputs);
}

#[test]
fn test_required_field_default() {
    let spec = r#"{"article": {"fields": [
        {"source": "year", "target": "year", "required": true, "default": "n.d."}]}}"#;
    let outcome = convert(
        "@article{a, title={T}}\n@article{b, title={T}, year={1999}}",
        spec,
    )
    .unwrap();
    assert!(outcome.outputs[0].contains("year = {n.d.}"));
    assert!(outcome.outputs[1].contains("year = {1999}"));
}

#[test]
fn test_failed_entry_leaves_placeholder_slot() {
    let spec = r#"{"options": {"unknown-type": "fail"}, "article": {}}"#;
    let input = "@article{good, title={T}}\n@patent{bad, title={T}}\n@article{also, title={T}}";
    let outcome = convert(input, spec).unwrap();
    assert_eq!(outcome.outputs.len(), 3);
    assert!(outcome.outputs[1].starts_with("@comment{rebib: entry 'bad' failed:"));
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].index, 1);
    assert_eq!(outcome.failures[0].citation_key, "bad");
}

#[test]
fn test_failed_entry_omitted_when_configured() {
    let spec = r#"{"options": {"unknown-type": "fail", "failed-entry": "omit"}, "article": {}}"#;
    let input = "@article{good, title={T}}\n@patent{bad, title={T}}";
    let outcome = convert(input, spec).unwrap();
    assert_eq!(outcome.outputs.len(), 1);
    assert_eq!(outcome.failures.len(), 1);
}

#[test]
fn test_abort_policy_turns_entry_failure_fatal() {
    let spec = r#"{"options": {"unknown-type": "fail", "on-error": "abort"}, "article": {}}"#;
    let result = convert("@patent{bad, title={T}}", spec);
    assert!(matches!(result, Err(ConvertError::Transcode(_))));
}

#[test]
fn test_parse_error_is_fatal_to_the_batch() {
    let result = convert("@article{ok, title={T}}\n@article{bad, title={open", IDENTITY_SPEC);
    assert!(matches!(result, Err(ConvertError::Parse(_))));
}

#[test]
fn test_unbalanced_brace_in_quoted_value_is_fatal() {
    // Re-emitting this value brace-delimited would produce a block the
    // parser itself rejects, so it must fail up front.
    let result = convert(r#"@misc{k, note = "a } b"}"#, IDENTITY_SPEC);
    assert!(matches!(result, Err(ConvertError::Parse(_))));
}

#[test]
fn test_config_error_raised_before_entries_are_parsed() {
    // Both inputs are broken; the specification is checked first.
    let result = convert("@article{bad, title={open", "{not json");
    assert!(matches!(result, Err(ConvertError::Config(_))));
}

#[test]
fn test_macros_months_and_concatenation() {
    let input = r#"
        @string{pr = "Phys. Rev."}
        @article{k, journal = pr # " D", month = mar, year = 2021}
    "#;
    let outcome = convert(input, IDENTITY_SPEC).unwrap();
    assert_eq!(
        outcome.outputs,
        vec!["@article{k, journal = {Phys. Rev. D}, month = {March}, year = {2021}}"]
    );
}

#[test]
fn test_comments_and_preamble_produce_no_outputs() {
    let input = "\
        % a line comment\n\
        @comment{ @article{hidden, title={x}} }\n\
        @preamble{\"\\hyphenation{post-script}\"}\n\
        @misc{only}\n";
    let outcome = convert(input, IDENTITY_SPEC).unwrap();
    assert_eq!(outcome.outputs, vec!["@misc{only}"]);
}

#[test]
fn test_paren_delimited_entries_convert_too() {
    let outcome = convert("@article(doe2020, title={Deep Learning}, year=2020)", RENAME_SPEC)
        .unwrap();
    assert_eq!(
        outcome.outputs,
        vec!["@article{doe2020, booktitle = {Deep Learning}, year = {2020}}"]
    );
}

#[test]
fn test_nested_brace_depths_survive_conversion() {
    for depth in [1usize, 2, 10] {
        let inner = format!("{}Deep{} Learning", "{".repeat(depth), "}".repeat(depth));
        let input = format!("@article{{k, title = {{{}}}}}", inner);
        let outcome = convert(&input, IDENTITY_SPEC).unwrap();
        assert_eq!(
            outcome.outputs,
            vec![format!("@article{{k, title = {{{}}}}}", inner)],
            "depth {}",
            depth
        );
    }
}

#[test]
fn test_convert_entry_single() {
    let block = convert_entry(
        "@article{doe2020, title={Deep Learning}, year=2020}",
        RENAME_SPEC,
    )
    .unwrap();
    assert_eq!(
        block,
        "@article{doe2020, booktitle = {Deep Learning}, year = {2020}}"
    );
}

#[test]
fn test_convert_entry_rejects_empty_input() {
    let result = convert_entry("% nothing here\n", RENAME_SPEC);
    assert!(matches!(result, Err(ConvertError::EmptyInput)));
}
