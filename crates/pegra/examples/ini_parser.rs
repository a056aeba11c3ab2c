//! INI file example
//!
//! Parses an INI document into nested maps keyed by section, the way the
//! grammar's silent and atomic modifiers shape the pair tree.
//!
//! Run with: `cargo run --example ini_parser`

use std::collections::HashMap;

use pegra::{compile, parse};

const GRAMMAR: &str = r#"
WHITESPACE = _{ " " }

file = { SOI ~ ((section | property)? ~ NEWLINE)* ~ EOI }
section = { "[" ~ name ~ "]" }
property = { name ~ "=" ~ value }

name = @{ ident_char+ }
value = @{ (!NEWLINE ~ ANY)* }
ident_char = _{ ASCII_ALPHANUMERIC | "." | "_" | "/" }
"#;

const DATA: &str = "\
username = noha
password = plain_text
salt = NaCl

[server_1]
interface = eth0
ip = 127.0.0.1
document_root = /var/www/example.org

[empty_section]
";

fn main() {
    let grammar = compile(GRAMMAR).expect("grammar compiles");
    let file = grammar.rule_id("file").expect("file rule");
    let section = grammar.rule_id("section").expect("section rule");
    let property = grammar.rule_id("property").expect("property rule");

    let pairs = parse(&grammar, file, DATA).expect("ini parses");

    // section name -> (key -> value); "" holds the global properties.
    let mut properties: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current = String::new();

    for line in pairs.peek().expect("file pair").into_inner() {
        if line.as_rule() == section {
            current = line
                .into_inner()
                .next()
                .expect("section has a name")
                .as_str()
                .to_string();
        } else if line.as_rule() == property {
            let mut inner = line.into_inner();
            let key = inner.next().expect("property key").as_str().to_string();
            let value = inner.next().expect("property value").as_str().to_string();
            properties.entry(current.clone()).or_default().insert(key, value);
        }
    }

    let mut sections: Vec<_> = properties.keys().collect();
    sections.sort();
    for section in sections {
        println!("[{section}]");
        let mut keys: Vec<_> = properties[section].keys().collect();
        keys.sort();
        for key in keys {
            println!("  {key} = {}", properties[section][key]);
        }
    }
}
