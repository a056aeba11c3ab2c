use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use pegra::{compile, parse, Grammar};

const JSON_GRAMMAR: &str = r#"
WHITESPACE = _{ " " | "\t" | "\r" | "\n" }

json = { SOI ~ value ~ EOI }
value = _{ object | array | string | number | boolean | null }
object = { "{" ~ pair ~ ("," ~ pair)* ~ "}" | "{" ~ "}" }
pair = { string ~ ":" ~ value }
array = { "[" ~ value ~ ("," ~ value)* ~ "]" | "[" ~ "]" }
string = ${ "\"" ~ inner ~ "\"" }
inner = @{ (!("\"" | "\\") ~ ANY | "\\" ~ ANY)* }
number = @{ "-"? ~ ("0" | ASCII_NONZERO_DIGIT ~ ASCII_DIGIT*) ~ ("." ~ ASCII_DIGIT+)? }
boolean = { "true" | "false" }
null = { "null" }
"#;

fn sample_document(records: usize) -> String {
    let mut doc = String::from("[");
    for i in 0..records {
        if i > 0 {
            doc.push(',');
        }
        doc.push_str(&format!(
            r#"{{"id": {i}, "name": "record {i}", "score": {}.5, "tags": ["a", "b"], "active": true}}"#,
            i % 100
        ));
    }
    doc.push(']');
    doc
}

fn json_grammar() -> Grammar {
    compile(JSON_GRAMMAR).expect("grammar compiles")
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_json_grammar", |b| {
        b.iter(|| compile(black_box(JSON_GRAMMAR)).expect("grammar compiles"));
    });
}

fn bench_parse(c: &mut Criterion) {
    let grammar = json_grammar();
    let json = grammar.rule_id("json").expect("json rule");

    let mut group = c.benchmark_group("parse_json");
    for records in [10, 100, 1000] {
        let doc = sample_document(records);
        group.throughput(criterion::Throughput::Bytes(doc.len() as u64));
        group.bench_function(format!("{records}_records"), |b| {
            b.iter(|| parse(&grammar, json, black_box(&doc)).expect("document parses"));
        });
    }
    group.finish();
}

fn bench_parse_failure(c: &mut Criterion) {
    let grammar = json_grammar();
    let json = grammar.rule_id("json").expect("json rule");
    let mut doc = sample_document(100);
    // Corrupt the tail so every parse walks most of the input, then fails.
    doc.truncate(doc.len() - 1);

    c.bench_function("parse_json_failure", |b| {
        b.iter(|| parse(&grammar, json, black_box(&doc)).expect_err("document is truncated"));
    });
}

criterion_group!(benches, bench_compile, bench_parse, bench_parse_failure);
criterion_main!(benches);
