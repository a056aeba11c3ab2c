//! Arithmetic calculator example
//!
//! Compiles an expression grammar, parses input lines, and evaluates the
//! pair tree directly with left-associative operators.
//!
//! Run with: `cargo run --example calculator`

use pegra::{compile, parse, Grammar, Pair};

const GRAMMAR: &str = r#"
WHITESPACE = _{ " " }

calculation = { SOI ~ expr ~ EOI }
expr = { term ~ (op ~ term)* }
term = { num | "(" ~ expr ~ ")" }
op = { "+" | "-" | "*" | "/" }
num = @{ ASCII_DIGIT+ }
"#;

fn eval_expr(grammar: &Grammar, pair: Pair<'_>) -> f64 {
    let mut inner = pair.into_inner();
    let mut value = eval_term(grammar, inner.next().expect("expr has a first term"));
    while let Some(op) = inner.next() {
        let rhs = eval_term(grammar, inner.next().expect("operator has a right operand"));
        value = match op.as_str() {
            "+" => value + rhs,
            "-" => value - rhs,
            "*" => value * rhs,
            "/" => value / rhs,
            other => unreachable!("unknown operator {other}"),
        };
    }
    value
}

fn eval_term(grammar: &Grammar, pair: Pair<'_>) -> f64 {
    let child = pair.into_inner().next().expect("term wraps num or expr");
    if child.as_rule() == grammar.rule_id("num").expect("num rule") {
        child.as_str().parse().expect("digits parse as f64")
    } else {
        eval_expr(grammar, child)
    }
}

fn main() {
    let grammar = compile(GRAMMAR).expect("grammar compiles");
    let calculation = grammar.rule_id("calculation").expect("calculation rule");

    for line in [
        "1 + 2 + 3",
        "2 * 3 + 4",
        "(2 + 4) * 9",
        "100 / 4 / 5",
        "7 * (3 - 1)",
        "1 + nope",
    ] {
        match parse(&grammar, calculation, line) {
            Ok(pairs) => {
                let expr = pairs
                    .peek()
                    .expect("calculation pair")
                    .into_inner()
                    .next()
                    .expect("expr pair");
                println!("{line} = {}", eval_expr(&grammar, expr));
            }
            Err(error) => println!("{line} -> {error}"),
        }
    }
}
