//! Tests for the pairs/tokens parse-result API

use pegra::{compile, parse, Grammar, RuleId, Token};

fn rule(grammar: &Grammar, name: &str) -> RuleId {
    grammar.rule_id(name).unwrap()
}

fn sum_grammar() -> Grammar {
    compile(
        r#"
        WHITESPACE = _{ " " }
        sum = { num ~ ("+" ~ num)* }
        num = @{ ASCII_DIGIT+ }
        "#,
    )
    .unwrap()
}

#[test]
fn test_tree_structure() {
    let grammar = sum_grammar();
    let pairs = parse(&grammar, rule(&grammar, "sum"), "1 + 23 + 4").unwrap();

    let sum = pairs.peek().unwrap();
    assert_eq!(sum.as_rule(), rule(&grammar, "sum"));
    assert_eq!(sum.as_str(), "1 + 23 + 4");

    let nums: Vec<_> = sum.into_inner().map(|p| p.as_str().to_string()).collect();
    assert_eq!(nums, vec!["1", "23", "4"]);
}

#[test]
fn test_root_span_covers_match() {
    let grammar = sum_grammar();
    let input = "7 + 8";
    let pairs = parse(&grammar, rule(&grammar, "sum"), input).unwrap();
    let span = pairs.peek().unwrap().as_span();
    assert_eq!(span.start(), 0);
    assert_eq!(span.end(), input.len());
}

#[test]
fn test_child_spans_nested_and_ordered() {
    let grammar = sum_grammar();
    let pairs = parse(&grammar, rule(&grammar, "sum"), "10 + 20 + 30").unwrap();
    let sum = pairs.peek().unwrap();
    let parent = sum.as_span();

    let mut previous_end = parent.start();
    for child in sum.into_inner() {
        let span = child.as_span();
        assert!(span.start() >= previous_end, "siblings overlap");
        assert!(span.end() <= parent.end(), "child escapes parent");
        previous_end = span.end();
    }
}

#[test]
fn test_silent_rules_are_not_materialized() {
    let grammar = compile(
        r#"
        r = { hidden ~ visible }
        hidden = _{ "a" }
        visible = { "b" }
        "#,
    )
    .unwrap();
    let pairs = parse(&grammar, rule(&grammar, "r"), "ab").unwrap();
    let children: Vec<_> = pairs.peek().unwrap().into_inner().collect();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].as_rule(), rule(&grammar, "visible"));
}

#[test]
fn test_silent_rule_descendants_still_materialize() {
    let grammar = compile(
        r#"
        r = { wrapper }
        wrapper = _{ item ~ item }
        item = { ASCII_ALPHA }
        "#,
    )
    .unwrap();
    let pairs = parse(&grammar, rule(&grammar, "r"), "xy").unwrap();
    // wrapper is skipped; its items attach directly under r.
    let children: Vec<_> = pairs.peek().unwrap().into_inner().collect();
    assert_eq!(children.len(), 2);
    assert!(children.iter().all(|c| c.as_rule() == rule(&grammar, "item")));
}

#[test]
fn test_atomic_rule_suppresses_descendants() {
    let grammar = compile(
        r#"
        atomic_rule = @{ part ~ part }
        part = { "a" }
        "#,
    )
    .unwrap();
    let pairs = parse(&grammar, rule(&grammar, "atomic_rule"), "aa").unwrap();
    let root = pairs.peek().unwrap();
    assert_eq!(root.as_str(), "aa");
    assert_eq!(root.into_inner().count(), 0);
}

#[test]
fn test_compound_atomic_keeps_children() {
    let grammar = compile(
        r#"
        WHITESPACE = _{ " " }
        string = ${ "\"" ~ inner ~ "\"" }
        inner = @{ (!"\"" ~ ANY)* }
        "#,
    )
    .unwrap();
    let string = rule(&grammar, "string");

    // Whitespace injection is off inside the compound-atomic rule, but the
    // inner rule still materializes.
    let pairs = parse(&grammar, string, "\"a b\"").unwrap();
    let root = pairs.peek().unwrap();
    let children: Vec<_> = root.into_inner().collect();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].as_rule(), rule(&grammar, "inner"));
    assert_eq!(children[0].as_str(), "a b");
}

#[test]
fn test_token_stream_matches_tree() {
    let grammar = sum_grammar();
    let pairs = parse(&grammar, rule(&grammar, "sum"), "1+2").unwrap();

    let tokens: Vec<_> = pairs.tokens().collect();
    // sum start, num start/end, num start/end, sum end.
    assert_eq!(tokens.len(), 6);

    let sum = rule(&grammar, "sum");
    match (&tokens[0], &tokens[5]) {
        (Token::Start { rule: first, pos }, Token::End { rule: last, pos: end }) => {
            assert_eq!(*first, sum);
            assert_eq!(*last, sum);
            assert_eq!(pos.offset(), 0);
            assert_eq!(end.offset(), 3);
        }
        other => panic!("unexpected boundary tokens: {other:?}"),
    }
}

#[test]
fn test_pair_tokens_are_balanced() {
    let grammar = sum_grammar();
    let pairs = parse(&grammar, rule(&grammar, "sum"), "1+2+3").unwrap();
    let num = rule(&grammar, "num");

    for pair in pairs.peek().unwrap().into_inner() {
        let tokens: Vec<_> = pair.tokens().collect();
        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[0], Token::Start { rule, .. } if rule == num));
        assert!(matches!(tokens[1], Token::End { rule, .. } if rule == num));
    }
}

#[test]
fn test_pairs_are_send_and_shareable() {
    fn assert_send<T: Send>(_: &T) {}

    let grammar = sum_grammar();
    let input = "1+2".to_string();
    let pairs = parse(&grammar, rule(&grammar, "sum"), &input).unwrap();
    assert_send(&pairs);
}

#[test]
fn test_render_pairs_snapshot() {
    let grammar = sum_grammar();
    let pairs = parse(&grammar, rule(&grammar, "sum"), "1 + 23").unwrap();
    let rendered = pegra::testing::render_pairs(&grammar, pairs);
    assert_eq!(
        rendered,
        "sum 0..6 \"1 + 23\"\n  num 0..1 \"1\"\n  num 4..6 \"23\"\n"
    );
}
