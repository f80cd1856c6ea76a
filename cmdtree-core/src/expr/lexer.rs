//! Tokenizer for the expression language.

use crate::error::EvalError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

/// A token and the byte offset it starts at
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

pub fn tokenize(source: &str) -> Result<Vec<Spanned>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let token = if c.is_ascii_digit() {
            let mut end = offset;
            let mut is_float = false;
            while let Some(&(i, d)) = chars.peek() {
                if d.is_ascii_digit() {
                    end = i + d.len_utf8();
                    chars.next();
                } else if d == '.' && !is_float && next_is_digit(source, i) {
                    is_float = true;
                    end = i + 1;
                    chars.next();
                } else {
                    break;
                }
            }
            let text = &source[offset..end];
            if is_float {
                Token::Float(
                    text.parse()
                        .map_err(|_| EvalError::syntax(offset, format!("bad number {}", text)))?,
                )
            } else {
                Token::Int(
                    text.parse()
                        .map_err(|_| EvalError::syntax(offset, format!("integer {} too large", text)))?,
                )
            }
        } else if c.is_alphabetic() || c == '_' {
            let mut end = offset;
            while let Some(&(i, d)) = chars.peek() {
                if d.is_alphanumeric() || d == '_' {
                    end = i + d.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            Token::Ident(source[offset..end].to_string())
        } else if c == '\'' || c == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some((_, d)) = chars.next() {
                match d {
                    '\\' => {
                        let (i, escaped) = chars
                            .next()
                            .ok_or_else(|| EvalError::syntax(offset, "unterminated string"))?;
                        match escaped {
                            'n' => text.push('\n'),
                            't' => text.push('\t'),
                            'r' => text.push('\r'),
                            '0' => text.push('\0'),
                            '\\' | '\'' | '"' => text.push(escaped),
                            other => {
                                return Err(EvalError::syntax(
                                    i,
                                    format!("unknown escape \\{}", other),
                                ))
                            }
                        }
                    }
                    d if d == c => {
                        closed = true;
                        break;
                    }
                    d => text.push(d),
                }
            }
            if !closed {
                return Err(EvalError::syntax(offset, "unterminated string"));
            }
            tokens.push(Spanned {
                token: Token::Str(text),
                offset,
            });
            continue;
        } else {
            chars.next();
            let follows_eq = matches!(chars.peek(), Some(&(_, '=')));
            let token = match c {
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Star,
                '/' => Token::Slash,
                '(' => Token::LParen,
                ')' => Token::RParen,
                '[' => Token::LBracket,
                ']' => Token::RBracket,
                ',' => Token::Comma,
                '.' => Token::Dot,
                '=' if follows_eq => Token::EqEq,
                '!' if follows_eq => Token::NotEq,
                '<' if follows_eq => Token::Le,
                '>' if follows_eq => Token::Ge,
                '<' => Token::Lt,
                '>' => Token::Gt,
                other => {
                    return Err(EvalError::syntax(
                        offset,
                        format!("unexpected character {:?}", other),
                    ))
                }
            };
            if matches!(token, Token::EqEq | Token::NotEq | Token::Le | Token::Ge) {
                chars.next();
            }
            tokens.push(Spanned { token, offset });
            continue;
        };

        tokens.push(Spanned { token, offset });
    }

    Ok(tokens)
}

fn next_is_digit(source: &str, dot: usize) -> bool {
    source[dot + 1..]
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_digit())
}
