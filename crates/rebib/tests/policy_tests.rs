use rstest::rstest;

use rebib::convert;

fn spec_with_unmapped(policy: &str) -> String {
    format!(
        r#"{{"article": {{"unmapped": "{}", "fields": [{{"source": "title"}}]}}}}"#,
        policy
    )
}

const INPUT_WITH_EXTRA_NOTE: &str = "\
    @article{a, title={One}}\n\
    @article{b, title={Two}, note={extra}}\n\
    @article{c, title={Three}}\n";

#[rstest]
#[case::pass_through("pass-through", true, 0)]
#[case::drop("drop", false, 0)]
#[case::error("error", false, 1)]
fn test_unmapped_field_policies(
    #[case] policy: &str,
    #[case] note_kept: bool,
    #[case] expected_failures: usize,
) {
    let outcome = convert(INPUT_WITH_EXTRA_NOTE, &spec_with_unmapped(policy)).unwrap();
    assert_eq!(outcome.outputs.len(), 3);
    assert_eq!(outcome.failures.len(), expected_failures);

    let b_output = &outcome.outputs[1];
    if note_kept {
        assert!(b_output.contains("note = {extra}"), "{}", b_output);
    } else {
        assert!(!b_output.contains("note"), "{}", b_output);
    }
    if expected_failures > 0 {
        assert_eq!(outcome.failures[0].citation_key, "b");
    }
}

#[rstest]
#[case::report("report", false)]
#[case::last_wins("last-wins", true)]
fn test_duplicate_field_policies(#[case] policy: &str, #[case] resolves: bool) {
    let spec = format!(r#"{{"options": {{"duplicate-fields": "{}"}}}}"#, policy);
    let outcome = convert("@article{k, year={2019}, year={2020}}", &spec).unwrap();
    if resolves {
        assert_eq!(outcome.outputs, vec!["@article{k, year = {2020}}"]);
        assert!(outcome.failures.is_empty());
    } else {
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.outputs[0].starts_with("@comment{rebib:"));
    }
}

#[rstest]
#[case::default_passes_through(r#"{}"#, true)]
#[case::fail_reports(r#"{"options": {"unknown-type": "fail"}}"#, false)]
fn test_unknown_type_policies(#[case] spec: &str, #[case] passes: bool) {
    let outcome = convert("@dataset{k, doi={10.1/xyz}}", spec).unwrap();
    if passes {
        assert_eq!(outcome.outputs, vec!["@dataset{k, doi = {10.1/xyz}}"]);
    } else {
        assert_eq!(outcome.failures.len(), 1);
    }
}
