//! Parsing and conversion benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rebib::{convert, parse_entries, transcode_entry, FormatSpec};

const RENAME_SPEC: &str = r#"{
    "article": {
        "unmapped": "pass-through",
        "fields": [
            {"source": "title", "target": "booktitle"},
            {"source": "pages", "transform": "template",
             "pattern": "^(?P<from>\\d+)-(?P<to>\\d+)$", "rewrite": "$from--$to"},
            {"source": "year", "target": "year", "required": true, "default": "n.d."}
        ]
    }
}"#;

fn generate_many_bibtex_entries(count: usize) -> String {
    let mut result = String::new();
    for i in 0..count {
        result.push_str(&format!(
            r#"
@article{{Entry{i},
    author = {{Author, Test {i}}},
    title = {{Title of {{Paper}} Number {i}}},
    year = {{2024}},
    journal = {{Journal {}}},
    volume = {{{}}},
    pages = {{1-10}},
    doi = {{10.1234/test.{i}}}
}}
"#,
            i % 10,
            i % 50
        ));
    }
    result
}

fn bench_parse_single(c: &mut Criterion) {
    let simple = r#"@article{Smith2024,
    author = {Smith, John},
    title = {A Great Paper},
    year = {2024},
    journal = {Nature}
}"#;

    let complex = r#"@article{Einstein1905,
    author = {Einstein, Albert},
    title = {Zur Elektrodynamik bewegter K{\"o}rper},
    journal = {Annalen der Physik},
    volume = {322},
    number = {10},
    pages = {891--921},
    year = {1905},
    doi = {10.1002/andp.19053221004},
    abstract = {The paper that introduced special relativity.}
}"#;

    let mut group = c.benchmark_group("parse_single");
    group.bench_function("simple", |b| b.iter(|| parse_entries(black_box(simple))));
    group.bench_function("complex", |b| b.iter(|| parse_entries(black_box(complex))));
    group.finish();
}

fn bench_parse_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_many");
    for count in [10, 100, 1000] {
        let content = generate_many_bibtex_entries(count);
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &content,
            |b, content| b.iter(|| parse_entries(black_box(content))),
        );
    }
    group.finish();
}

fn bench_convert_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_many");
    for count in [10, 100, 1000] {
        let content = generate_many_bibtex_entries(count);
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &content,
            |b, content| b.iter(|| convert(black_box(content), black_box(RENAME_SPEC))),
        );
    }
    group.finish();
}

fn bench_transcode_shared_spec(c: &mut Criterion) {
    let parsed = parse_entries(&generate_many_bibtex_entries(100)).unwrap();
    let spec = FormatSpec::from_str(RENAME_SPEC).unwrap();

    c.bench_function("transcode_100_entries", |b| {
        b.iter(|| {
            for entry in &parsed.entries {
                let _ = transcode_entry(black_box(entry), &spec);
            }
        })
    });
}

criterion_group!(
    benches,
    bench_parse_single,
    bench_parse_many,
    bench_convert_many,
    bench_transcode_shared_spec
);
criterion_main!(benches);
