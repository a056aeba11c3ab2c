#![no_main]
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

use pegra::{parse_with_config, Grammar, ParseConfig, RuleId};

// A grammar touching every node kind: literals, ranges, repetition, choice,
// predicates, atomicity, whitespace injection, and the match stack.
const GRAMMAR: &str = r#"
WHITESPACE = _{ " " }
doc = { SOI ~ item* ~ EOI }
item = _{ fenced | word | number | parens }
fenced = { PUSH(ASCII_ALPHA{1,3}) ~ ":" ~ word? ~ ":" ~ POP }
parens = { "(" ~ item* ~ ")" }
word = @{ !ASCII_DIGIT ~ (ASCII_ALPHANUMERIC | "_")+ }
number = @{ ASCII_DIGIT+ ~ ("." ~ ASCII_DIGIT+)? }
"#;

fn grammar() -> &'static (Grammar, RuleId) {
    static GRAMMAR_CELL: OnceLock<(Grammar, RuleId)> = OnceLock::new();
    GRAMMAR_CELL.get_or_init(|| {
        let grammar = pegra::compile(GRAMMAR).expect("fuzz grammar compiles");
        let doc = grammar.rule_id("doc").expect("doc rule");
        (grammar, doc)
    })
}

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let (grammar, doc) = grammar();
        let config = ParseConfig {
            max_recursion_depth: 512,
        };
        match parse_with_config(grammar, *doc, input, &config) {
            Ok(pairs) => {
                // Walk the tree; spans must stay inside the input.
                for token in pairs.tokens() {
                    match token {
                        pegra::Token::Start { pos, .. } | pegra::Token::End { pos, .. } => {
                            assert!(pos.offset() <= input.len());
                        }
                    }
                }
            }
            Err(error) => {
                if let Some(failure) = error.failure() {
                    assert!(failure.offset() <= input.len());
                }
            }
        }
    }
});
