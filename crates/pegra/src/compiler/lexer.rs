//! Tokenizer for grammar source text.
//!
//! Produces a flat token list with byte offsets. Whitespace and comments
//! (`//` to end of line, `/* ... */`) separate tokens and are discarded.

use compact_str::CompactString;

use crate::error::{CompileError, Location};
use crate::syntax::LineIndex;

/// One token of grammar source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    /// Byte offset of the token's first character.
    pub(crate) offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Rule name or keyword (`PUSH`, `POP`, `PEEK`, built-in names).
    Ident(CompactString),
    /// Repetition bound.
    Number(u32),
    /// String literal, escapes decoded.
    Str(CompactString),
    /// Character literal, escapes decoded.
    Char(char),
    Assign,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Tilde,
    Pipe,
    Amp,
    Bang,
    Star,
    Plus,
    Question,
    Caret,
    DotDot,
    Comma,
    At,
    Dollar,
}

impl TokenKind {
    /// Human description for diagnostics.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Ident(name) => format!("identifier '{name}'"),
            Self::Number(n) => format!("number {n}"),
            Self::Str(_) => "string literal".to_string(),
            Self::Char(_) => "character literal".to_string(),
            Self::Assign => "'='".to_string(),
            Self::LBrace => "'{'".to_string(),
            Self::RBrace => "'}'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::Tilde => "'~'".to_string(),
            Self::Pipe => "'|'".to_string(),
            Self::Amp => "'&'".to_string(),
            Self::Bang => "'!'".to_string(),
            Self::Star => "'*'".to_string(),
            Self::Plus => "'+'".to_string(),
            Self::Question => "'?'".to_string(),
            Self::Caret => "'^'".to_string(),
            Self::DotDot => "'..'".to_string(),
            Self::Comma => "','".to_string(),
            Self::At => "'@'".to_string(),
            Self::Dollar => "'$'".to_string(),
        }
    }
}

pub(crate) fn tokenize(source: &str, index: &LineIndex) -> Result<Vec<Token>, CompileError> {
    Lexer {
        source,
        index,
        pos: 0,
    }
    .run()
}

struct Lexer<'s> {
    source: &'s str,
    index: &'s LineIndex,
    pos: usize,
}

impl Lexer<'_> {
    fn run(mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();
        while let Some(c) = self.skip_trivia()? {
            let offset = u32::try_from(self.pos).unwrap_or(u32::MAX);
            let kind = self.scan_token(c)?;
            tokens.push(Token { kind, offset });
        }
        Ok(tokens)
    }

    fn location(&self, offset: usize) -> Location {
        Location::new(
            u32::try_from(offset).unwrap_or(u32::MAX),
            self.index.line_col(offset),
        )
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace and comments; return the next significant character
    /// without consuming it.
    fn skip_trivia(&mut self) -> Result<Option<char>, CompileError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.source[self.pos..].starts_with("//") => {
                    while let Some(c) = self.peek() {
                        if c == '\n' || c == '\r' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('/') if self.source[self.pos..].starts_with("/*") => {
                    let start = self.pos;
                    match self.source[self.pos + 2..].find("*/") {
                        Some(found) => self.pos += 2 + found + 2,
                        None => {
                            return Err(CompileError::UnterminatedComment {
                                location: self.location(start),
                            });
                        }
                    }
                }
                other => return Ok(other),
            }
        }
    }

    fn scan_token(&mut self, first: char) -> Result<TokenKind, CompileError> {
        let start = self.pos;
        match first {
            c if c.is_alphabetic() || c == '_' => {
                while let Some(c) = self.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        self.bump();
                    } else {
                        break;
                    }
                }
                Ok(TokenKind::Ident(self.source[start..self.pos].into()))
            }
            c if c.is_ascii_digit() => {
                while let Some(c) = self.peek() {
                    if c.is_ascii_digit() {
                        self.bump();
                    } else {
                        break;
                    }
                }
                let value = self.source[start..self.pos].parse().unwrap_or(u32::MAX);
                Ok(TokenKind::Number(value))
            }
            '"' => self.scan_string(start),
            '\'' => self.scan_char(start),
            _ => {
                self.bump();
                Ok(match first {
                    '=' => TokenKind::Assign,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '~' => TokenKind::Tilde,
                    '|' => TokenKind::Pipe,
                    '&' => TokenKind::Amp,
                    '!' => TokenKind::Bang,
                    '*' => TokenKind::Star,
                    '+' => TokenKind::Plus,
                    '?' => TokenKind::Question,
                    '^' => TokenKind::Caret,
                    ',' => TokenKind::Comma,
                    '@' => TokenKind::At,
                    '$' => TokenKind::Dollar,
                    '.' => {
                        if self.peek() == Some('.') {
                            self.bump();
                            TokenKind::DotDot
                        } else {
                            return Err(CompileError::UnexpectedChar {
                                ch: '.',
                                location: self.location(start),
                            });
                        }
                    }
                    other => {
                        return Err(CompileError::UnexpectedChar {
                            ch: other,
                            location: self.location(start),
                        });
                    }
                })
            }
        }
    }

    fn scan_string(&mut self, start: usize) -> Result<TokenKind, CompileError> {
        self.bump(); // opening quote
        let mut text = CompactString::default();
        loop {
            match self.bump() {
                None => {
                    return Err(CompileError::UnterminatedString {
                        location: self.location(start),
                    });
                }
                Some('"') => return Ok(TokenKind::Str(text)),
                Some('\\') => text.push(self.scan_escape()?),
                Some(c) => text.push(c),
            }
        }
    }

    fn scan_char(&mut self, start: usize) -> Result<TokenKind, CompileError> {
        self.bump(); // opening quote
        let c = match self.bump() {
            None | Some('\'') => {
                return Err(CompileError::InvalidCharLiteral {
                    location: self.location(start),
                });
            }
            Some('\\') => self.scan_escape()?,
            Some(c) => c,
        };
        if self.bump() != Some('\'') {
            return Err(CompileError::InvalidCharLiteral {
                location: self.location(start),
            });
        }
        Ok(TokenKind::Char(c))
    }

    /// Decode one escape sequence; the backslash is already consumed.
    fn scan_escape(&mut self) -> Result<char, CompileError> {
        let escape_start = self.pos - 1;
        let invalid = |lexer: &Self| CompileError::InvalidEscape {
            escape: lexer.source[escape_start..lexer.pos].to_string(),
            location: lexer.location(escape_start),
        };
        match self.bump() {
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('0') => Ok('\0'),
            Some('\\') => Ok('\\'),
            Some('"') => Ok('"'),
            Some('\'') => Ok('\''),
            Some('u') => {
                if self.bump() != Some('{') {
                    return Err(invalid(self));
                }
                let digits_start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    self.bump();
                }
                let digits = &self.source[digits_start..self.pos];
                if self.bump() != Some('}') || digits.is_empty() {
                    return Err(invalid(self));
                }
                u32::from_str_radix(digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| invalid(self))
            }
            _ => Err(invalid(self)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let index = LineIndex::new(source);
        tokenize(source, &index)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_rule_definition_tokens() {
        assert_eq!(
            kinds("num = { \"a\" }"),
            vec![
                TokenKind::Ident("num".into()),
                TokenKind::Assign,
                TokenKind::LBrace,
                TokenKind::Str("a".into()),
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("~ | & ! * + ? ^ .. , @ $"),
            vec![
                TokenKind::Tilde,
                TokenKind::Pipe,
                TokenKind::Amp,
                TokenKind::Bang,
                TokenKind::Star,
                TokenKind::Plus,
                TokenKind::Question,
                TokenKind::Caret,
                TokenKind::DotDot,
                TokenKind::Comma,
                TokenKind::At,
                TokenKind::Dollar,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a // line\n= /* block */ b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Assign,
                TokenKind::Ident("b".into()),
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\nb\u{21}""#),
            vec![TokenKind::Str("a\nb!".into())]
        );
    }

    #[test]
    fn test_char_literals_and_range() {
        assert_eq!(
            kinds("'a'..'z'"),
            vec![
                TokenKind::Char('a'),
                TokenKind::DotDot,
                TokenKind::Char('z'),
            ]
        );
        assert_eq!(kinds(r"'\n'"), vec![TokenKind::Char('\n')]);
    }

    #[test]
    fn test_unterminated_string() {
        let source = "\"abc";
        let index = LineIndex::new(source);
        let err = tokenize(source, &index).unwrap_err();
        assert!(matches!(err, CompileError::UnterminatedString { .. }));
    }

    #[test]
    fn test_unterminated_comment() {
        let source = "/* abc";
        let index = LineIndex::new(source);
        let err = tokenize(source, &index).unwrap_err();
        assert!(matches!(err, CompileError::UnterminatedComment { .. }));
    }

    #[test]
    fn test_invalid_escape() {
        let source = r#""\q""#;
        let index = LineIndex::new(source);
        let err = tokenize(source, &index).unwrap_err();
        match err {
            CompileError::InvalidEscape { escape, .. } => assert_eq!(escape, r"\q"),
            other => panic!("expected invalid escape, got {other:?}"),
        }
    }

    #[test]
    fn test_unexpected_char() {
        let source = "a = %";
        let index = LineIndex::new(source);
        let err = tokenize(source, &index).unwrap_err();
        match err {
            CompileError::UnexpectedChar { ch, location } => {
                assert_eq!(ch, '%');
                assert_eq!(location.offset, 4);
            }
            other => panic!("expected unexpected char, got {other:?}"),
        }
    }
}
