//! End-to-end tests with a JSON grammar fixture

use pegra::{compile, parse, Grammar, ParseError, RuleId};

fn json_grammar() -> Grammar {
    compile(
        r#"
        WHITESPACE = _{ " " | "\t" | "\r" | "\n" }

        json = { SOI ~ value ~ EOI }

        value = _{ object | array | string | number | boolean | null }

        object = { "{" ~ pair ~ ("," ~ pair)* ~ "}" | "{" ~ "}" }
        pair = { string ~ ":" ~ value }

        array = { "[" ~ value ~ ("," ~ value)* ~ "]" | "[" ~ "]" }

        string = ${ "\"" ~ inner ~ "\"" }
        inner = @{ char* }
        char = {
            !("\"" | "\\") ~ ANY
            | "\\" ~ ("\"" | "\\" | "/" | "b" | "f" | "n" | "r" | "t")
            | "\\" ~ "u" ~ ASCII_HEX_DIGIT{4}
        }

        number = @{ "-"? ~ int ~ ("." ~ ASCII_DIGIT+)? ~ (("e" | "E") ~ ("+" | "-")? ~ ASCII_DIGIT+)? }
        int = _{ "0" | ASCII_NONZERO_DIGIT ~ ASCII_DIGIT* }

        boolean = { "true" | "false" }
        null = { "null" }
        "#,
    )
    .unwrap()
}

fn rule(grammar: &Grammar, name: &str) -> RuleId {
    grammar.rule_id(name).unwrap()
}

#[test]
fn test_scalars() {
    let grammar = json_grammar();
    let json = rule(&grammar, "json");

    for input in [
        "0", "-1", "3.25", "1e9", "-2.5E-3", "true", "false", "null", "\"ok\"", "\"\"",
    ] {
        assert!(parse(&grammar, json, input).is_ok(), "failed on {input:?}");
    }
}

#[test]
fn test_rejects_malformed_documents() {
    let grammar = json_grammar();
    let json = rule(&grammar, "json");

    for input in [
        "",
        "01",
        "+1",
        "tru",
        "\"unterminated",
        "{\"a\":}",
        "[1,]",
        "{,}",
        "[1 2]",
        "{} {}",
    ] {
        assert!(parse(&grammar, json, input).is_err(), "accepted {input:?}");
    }
}

#[test]
fn test_nested_document_structure() {
    let grammar = json_grammar();
    let json = rule(&grammar, "json");
    let input = r#"{ "name": "pegra", "tags": ["peg", "parser"], "version": 0.1 }"#;

    let pairs = parse(&grammar, json, input).unwrap();
    let root = pairs.peek().unwrap();
    assert_eq!(root.as_str(), input);

    // `value` is silent, so the object sits directly under `json`.
    let children: Vec<_> = root.into_inner().collect();
    assert_eq!(children.len(), 2, "expected object + EOI");
    assert_eq!(children[0].as_rule(), rule(&grammar, "object"));
    assert_eq!(children[1].as_rule(), rule(&grammar, "EOI"));

    let pairs_in_object: Vec<_> = children[0].clone().into_inner().collect();
    assert_eq!(pairs_in_object.len(), 3);

    let keys: Vec<_> = pairs_in_object
        .iter()
        .map(|p| p.clone().into_inner().next().unwrap().as_str().to_string())
        .collect();
    assert_eq!(keys, vec!["\"name\"", "\"tags\"", "\"version\""]);
}

#[test]
fn test_string_content_via_inner_rule() {
    let grammar = json_grammar();
    let json = rule(&grammar, "json");

    let pairs = parse(&grammar, json, r#""hello \"world\"""#).unwrap();
    let string = pairs.peek().unwrap().into_inner().next().unwrap();
    assert_eq!(string.as_rule(), rule(&grammar, "string"));

    let inner = string.into_inner().next().unwrap();
    assert_eq!(inner.as_rule(), rule(&grammar, "inner"));
    assert_eq!(inner.as_str(), r#"hello \"world\""#);
    // `char` is suppressed by the atomic `inner`.
    assert_eq!(inner.into_inner().count(), 0);
}

#[test]
fn test_whitespace_tolerated_everywhere() {
    let grammar = json_grammar();
    let json = rule(&grammar, "json");

    let compact = r#"{"a":[1,2],"b":{"c":null}}"#;
    let spread = "{ \"a\" : [ 1 , 2 ] ,\n  \"b\" : { \"c\" : null }\n}";
    assert!(parse(&grammar, json, compact).is_ok());
    assert!(parse(&grammar, json, spread).is_ok());
}

#[test]
fn test_failure_reports_offset_of_bad_token() {
    let grammar = json_grammar();
    let json = rule(&grammar, "json");

    match parse(&grammar, json, r#"{"a": 1, "b": }"#) {
        Err(ParseError::Failure(failure)) => {
            // The value after "b": is missing; offsets past the colon-space.
            assert_eq!(failure.offset(), 14);
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn test_deeply_nested_arrays_within_default_budget() {
    let grammar = json_grammar();
    let json = rule(&grammar, "json");

    let depth = 200;
    let input = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
    assert!(parse(&grammar, json, &input).is_ok());
}

#[test]
fn test_pathological_nesting_hits_recursion_limit() {
    let grammar = json_grammar();
    let json = rule(&grammar, "json");

    let depth = 100_000;
    let input = "[".repeat(depth);
    match parse(&grammar, json, &input) {
        Err(ParseError::RecursionLimit { .. }) => {}
        other => panic!("expected recursion limit, got {other:?}"),
    }
}
