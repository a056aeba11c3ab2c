//! CSV summing example
//!
//! Parses a small numeric CSV document and reports the field sum and the
//! record count by walking the pair tree.
//!
//! Run with: `cargo run --example csv_tool`

use pegra::{compile, parse};

const GRAMMAR: &str = r#"
file = { SOI ~ (record ~ NEWLINE)* ~ EOI }
record = { field ~ ("," ~ field)* }
field = @{ "-"? ~ ASCII_DIGIT+ ~ ("." ~ ASCII_DIGIT+)? }
"#;

const DATA: &str = "\
65279,1179403647,1463895090
3.1415927,2.7182817,1.618034
-40,-273.15
13,42
65537
";

fn main() {
    let grammar = compile(GRAMMAR).expect("grammar compiles");
    let file = grammar.rule_id("file").expect("file rule");
    let record = grammar.rule_id("record").expect("record rule");

    let pairs = parse(&grammar, file, DATA).expect("csv parses");

    let mut field_sum = 0.0_f64;
    let mut record_count = 0_u64;

    for row in pairs.peek().expect("file pair").into_inner() {
        if row.as_rule() != record {
            continue; // the EOI pair
        }
        record_count += 1;
        for field in row.into_inner() {
            field_sum += field.as_str().parse::<f64>().expect("numeric field");
        }
    }

    println!("Sum of fields: {field_sum}");
    println!("Number of records: {record_count}");
}
