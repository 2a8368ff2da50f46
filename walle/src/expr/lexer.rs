use std::fmt;

use crate::error::{Result, WallError};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals and names
    Number(i64),
    Identifier(String),
    Str(String),
    True,
    False,
    // Arithmetic
    Plus,     // +
    Minus,    // -
    Star,     // *
    StarStar, // **
    Slash,    // /
    Percent,  // %
    // Logic
    AndAnd, // &&
    OrOr,   // ||
    // Comparison
    Equal,        // ==
    NotEqual,     // !=
    LessEqual,    // <=
    GreaterEqual, // >=
    Less,         // <
    Greater,      // >
    // Grouping
    LParen,
    RParen,
    Comma,
}

impl Token {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Token::Equal
                | Token::NotEqual
                | Token::LessEqual
                | Token::GreaterEqual
                | Token::Less
                | Token::Greater
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Token::AndAnd | Token::OrOr)
    }

    /// Tokens after which a `-` is a binary minus rather than a sign.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_)
                | Token::Identifier(_)
                | Token::Str(_)
                | Token::True
                | Token::False
                | Token::RParen
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Identifier(name) => f.write_str(name),
            Token::Str(text) => write!(f, "\"{text}\""),
            Token::True => f.write_str("true"),
            Token::False => f.write_str("false"),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::StarStar => f.write_str("**"),
            Token::Slash => f.write_str("/"),
            Token::Percent => f.write_str("%"),
            Token::AndAnd => f.write_str("&&"),
            Token::OrOr => f.write_str("||"),
            Token::Equal => f.write_str("=="),
            Token::NotEqual => f.write_str("!="),
            Token::LessEqual => f.write_str("<="),
            Token::GreaterEqual => f.write_str(">="),
            Token::Less => f.write_str("<"),
            Token::Greater => f.write_str(">"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
        }
    }
}

/// Space-separated source text for a token slice, used in error messages.
pub fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits an expression into tokens.
///
/// Identifiers may contain `-`, which collides with subtraction: `a-b` is
/// read as the variable `a-b` only when `is_variable` knows that name,
/// otherwise as `a - b`. The longest known name wins.
pub fn tokenize(source: &str, is_variable: impl Fn(&str) -> bool) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' => {
                let mut digits = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                let value = digits
                    .parse()
                    .map_err(|_| WallError::InvalidExpression(source.trim().to_string()))?;
                tokens.push(Token::Number(value));
            }
            'a'..='z' | 'A'..='Z' => {
                let name = scan_identifier(&source[pos..], &is_variable);
                for _ in 0..name.chars().count() {
                    chars.next();
                }
                tokens.push(match name {
                    "true" => Token::True,
                    "false" => Token::False,
                    _ => Token::Identifier(name.to_string()),
                });
            }
            '"' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '"' {
                        closed = true;
                        break;
                    }
                    text.push(c);
                }
                if !closed {
                    return Err(WallError::syntax(format!(
                        "unclosed string literal in '{}'",
                        source.trim()
                    )));
                }
                tokens.push(Token::Str(text));
            }
            _ => {
                chars.next();
                let next = chars.peek().map(|&(_, c)| c);
                let (token, pair) = match (ch, next) {
                    ('*', Some('*')) => (Token::StarStar, true),
                    ('&', Some('&')) => (Token::AndAnd, true),
                    ('|', Some('|')) => (Token::OrOr, true),
                    ('=', Some('=')) => (Token::Equal, true),
                    ('!', Some('=')) => (Token::NotEqual, true),
                    ('<', Some('=')) => (Token::LessEqual, true),
                    ('>', Some('=')) => (Token::GreaterEqual, true),
                    ('<', _) => (Token::Less, false),
                    ('>', _) => (Token::Greater, false),
                    ('+', _) => (Token::Plus, false),
                    ('-', _) => (Token::Minus, false),
                    ('*', _) => (Token::Star, false),
                    ('/', _) => (Token::Slash, false),
                    ('%', _) => (Token::Percent, false),
                    ('(', _) => (Token::LParen, false),
                    (')', _) => (Token::RParen, false),
                    (',', _) => (Token::Comma, false),
                    _ => {
                        return Err(WallError::InvalidExpression(format!(
                            "unexpected character '{ch}' in '{}'",
                            source.trim()
                        )));
                    }
                };
                if pair {
                    chars.next();
                }
                tokens.push(token);
            }
        }
    }

    Ok(tokens)
}

fn scan_identifier<'a>(rest: &'a str, is_variable: &impl Fn(&str) -> bool) -> &'a str {
    let run_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(rest.len());
    let run = &rest[..run_len];

    let mut candidates: Vec<&str> = run.match_indices('-').map(|(i, _)| &run[..i]).collect();
    if !run.ends_with('-') {
        candidates.push(run);
    }

    let first = candidates.first().copied().unwrap_or(run);
    candidates
        .into_iter()
        .rev()
        .find(|name| is_variable(name))
        .unwrap_or(first)
}
