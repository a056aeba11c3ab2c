//! Recursive-descent parser for grammar source.
//!
//! Operates on the token list from [`lexer`](crate::compiler::lexer) and
//! produces one [`Expr`] per rule, plus the side tables the compiler uses to
//! attach source locations to validation errors. Operator precedence, from
//! loosest to tightest: choice `|`, sequence `~`, prefix predicates `&`/`!`,
//! postfix repetitions.

use compact_str::CompactString;
use hashbrown::HashMap;

use crate::compiler::lexer::{Token, TokenKind};
use crate::error::{CompileError, Location};
use crate::grammar::{Expr, GrammarError, Modifier};
use crate::syntax::LineIndex;

/// One parsed rule definition.
#[derive(Debug)]
pub(crate) struct ParsedRule {
    pub(crate) name: CompactString,
    /// Offset of the rule name in the source.
    pub(crate) offset: u32,
    pub(crate) modifier: Modifier,
    pub(crate) expr: Expr,
}

/// Parser output: rules in source order plus reference sites for
/// undefined-rule diagnostics.
#[derive(Debug)]
pub(crate) struct ParsedGrammar {
    pub(crate) rules: Vec<ParsedRule>,
    /// First occurrence of each referenced rule name.
    pub(crate) ref_sites: HashMap<CompactString, u32, ahash::RandomState>,
}

pub(crate) fn parse_rules(
    source_len: usize,
    tokens: Vec<Token>,
    index: &LineIndex,
) -> Result<ParsedGrammar, CompileError> {
    let mut parser = Parser {
        tokens,
        cursor: 0,
        source_len,
        index,
        ref_sites: HashMap::default(),
    };
    let mut rules = Vec::new();
    while !parser.at_end() {
        rules.push(parser.parse_rule()?);
    }
    Ok(ParsedGrammar {
        rules,
        ref_sites: parser.ref_sites,
    })
}

struct Parser<'s> {
    tokens: Vec<Token>,
    cursor: usize,
    source_len: usize,
    index: &'s LineIndex,
    ref_sites: HashMap<CompactString, u32, ahash::RandomState>,
}

impl Parser<'_> {
    fn at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.cursor).map(|t| &t.kind)
    }

    fn location_at(&self, offset: u32) -> Location {
        Location::new(offset, self.index.line_col(offset as usize))
    }

    fn current_location(&self) -> Location {
        let offset = self
            .tokens
            .get(self.cursor)
            .map_or(self.source_len as u32, |t| t.offset);
        self.location_at(offset)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Token, CompileError> {
        match self.peek() {
            Some(found) if found == kind => Ok(self.bump().unwrap()),
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        match self.tokens.get(self.cursor) {
            Some(token) => CompileError::UnexpectedToken {
                found: token.kind.describe(),
                expected: expected.to_string(),
                location: self.location_at(token.offset),
            },
            None => CompileError::UnexpectedEof {
                expected: expected.to_string(),
                location: self.current_location(),
            },
        }
    }

    fn parse_rule(&mut self) -> Result<ParsedRule, CompileError> {
        let (name, offset) = match self.peek() {
            Some(TokenKind::Ident(_)) => {
                let Some(Token {
                    kind: TokenKind::Ident(name),
                    offset,
                }) = self.bump()
                else {
                    unreachable!()
                };
                (name, offset)
            }
            _ => return Err(self.unexpected("a rule name")),
        };
        self.expect(&TokenKind::Assign, "'='")?;

        let modifier = match self.peek() {
            Some(TokenKind::Ident(m)) if m == "_" => {
                self.cursor += 1;
                Modifier::Silent
            }
            Some(TokenKind::At) => {
                self.cursor += 1;
                Modifier::Atomic
            }
            Some(TokenKind::Dollar) => {
                self.cursor += 1;
                Modifier::CompoundAtomic
            }
            Some(TokenKind::Bang) => {
                self.cursor += 1;
                Modifier::NonAtomic
            }
            _ => Modifier::Normal,
        };

        self.expect(&TokenKind::LBrace, "'{'")?;
        let expr = self.parse_expr()?;
        self.expect(&TokenKind::RBrace, "'}'")?;

        Ok(ParsedRule {
            name,
            offset,
            modifier,
            expr,
        })
    }

    fn parse_expr(&mut self) -> Result<Expr, CompileError> {
        let mut alternatives = vec![self.parse_seq()?];
        while self.eat(&TokenKind::Pipe) {
            alternatives.push(self.parse_seq()?);
        }
        Ok(Expr::choice(alternatives))
    }

    fn parse_seq(&mut self) -> Result<Expr, CompileError> {
        let mut items = vec![self.parse_prefixed()?];
        while self.eat(&TokenKind::Tilde) {
            items.push(self.parse_prefixed()?);
        }
        Ok(Expr::seq(items))
    }

    fn parse_prefixed(&mut self) -> Result<Expr, CompileError> {
        if self.eat(&TokenKind::Amp) {
            Ok(Expr::pos_pred(self.parse_prefixed()?))
        } else if self.eat(&TokenKind::Bang) {
            Ok(Expr::neg_pred(self.parse_prefixed()?))
        } else {
            self.parse_postfixed()
        }
    }

    fn parse_postfixed(&mut self) -> Result<Expr, CompileError> {
        let mut expr = self.parse_primary()?;
        loop {
            expr = if self.eat(&TokenKind::Star) {
                Expr::star(expr)
            } else if self.eat(&TokenKind::Plus) {
                Expr::plus(expr)
            } else if self.eat(&TokenKind::Question) {
                Expr::opt(expr)
            } else if self.peek() == Some(&TokenKind::LBrace) {
                let brace_offset = self.tokens[self.cursor].offset;
                self.cursor += 1;
                let (min, max) = self.parse_repeat_bounds()?;
                if let Some(max) = max {
                    if min > max {
                        return Err(CompileError::Grammar {
                            source: GrammarError::InvalidRepeat { min, max },
                            location: self.location_at(brace_offset),
                        });
                    }
                }
                Expr::repeat(expr, min, max)
            } else {
                return Ok(expr);
            };
        }
    }

    /// Bounds forms: `{n}`, `{m,}`, `{m,n}`, `{,n}`. The `{` is consumed.
    fn parse_repeat_bounds(&mut self) -> Result<(u32, Option<u32>), CompileError> {
        let bounds = if self.eat(&TokenKind::Comma) {
            let max = self.expect_number()?;
            (0, Some(max))
        } else {
            let min = self.expect_number()?;
            if self.eat(&TokenKind::Comma) {
                if self.peek() == Some(&TokenKind::RBrace) {
                    (min, None)
                } else {
                    (min, Some(self.expect_number()?))
                }
            } else {
                (min, Some(min))
            }
        };
        self.expect(&TokenKind::RBrace, "'}'")?;
        Ok(bounds)
    }

    fn expect_number(&mut self) -> Result<u32, CompileError> {
        match self.peek() {
            Some(TokenKind::Number(n)) => {
                let n = *n;
                self.cursor += 1;
                Ok(n)
            }
            _ => Err(self.unexpected("a repetition bound")),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        match self.peek() {
            Some(TokenKind::LParen) => {
                self.cursor += 1;
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            Some(TokenKind::Str(_)) => {
                let Some(Token {
                    kind: TokenKind::Str(text),
                    ..
                }) = self.bump()
                else {
                    unreachable!()
                };
                Ok(Expr::Literal {
                    text,
                    insensitive: false,
                })
            }
            Some(TokenKind::Caret) => {
                self.cursor += 1;
                match self.peek() {
                    Some(TokenKind::Str(_)) => {
                        let Some(Token {
                            kind: TokenKind::Str(text),
                            ..
                        }) = self.bump()
                        else {
                            unreachable!()
                        };
                        Ok(Expr::Literal {
                            text,
                            insensitive: true,
                        })
                    }
                    _ => Err(self.unexpected("a string literal after '^'")),
                }
            }
            Some(TokenKind::Char(_)) => {
                let Some(Token {
                    kind: TokenKind::Char(lo),
                    ..
                }) = self.bump()
                else {
                    unreachable!()
                };
                self.expect(&TokenKind::DotDot, "'..'")?;
                match self.peek() {
                    Some(TokenKind::Char(_)) => {
                        let Some(Token {
                            kind: TokenKind::Char(hi),
                            ..
                        }) = self.bump()
                        else {
                            unreachable!()
                        };
                        Ok(Expr::range(lo, hi))
                    }
                    _ => Err(self.unexpected("a character literal")),
                }
            }
            Some(TokenKind::Ident(_)) => {
                let Some(Token {
                    kind: TokenKind::Ident(name),
                    offset,
                }) = self.bump()
                else {
                    unreachable!()
                };
                match name.as_str() {
                    "PUSH" => {
                        self.expect(&TokenKind::LParen, "'('")?;
                        let inner = self.parse_expr()?;
                        self.expect(&TokenKind::RParen, "')'")?;
                        Ok(Expr::push(inner))
                    }
                    "POP" => Ok(Expr::Pop),
                    "PEEK" => Ok(Expr::Peek),
                    _ => {
                        self.ref_sites.entry(name.clone()).or_insert(offset);
                        Ok(Expr::Ref(name))
                    }
                }
            }
            _ => Err(self.unexpected("an expression")),
        }
    }
}
