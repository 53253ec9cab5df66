use crate::expression::error::ExprError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    True,
    False,

    LParen,
    RParen,
    Comma,
    Dot,
    Eq,

    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,

    Bang,

    Eof,
}

pub(crate) fn lex(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let start = i;

        // Number: [0-9]+(.[0-9]+)?([eE][+-]?[0-9]+)? or .[0-9]+([eE][+-]?[0-9]+)?
        if c.is_ascii_digit()
            || (c == '.' && i + 1 < bytes.len() && (bytes[i + 1] as char).is_ascii_digit())
        {
            let mut is_float = false;
            if c == '.' {
                is_float = true;
                i += 1;
            } else {
                while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                    i += 1;
                }
                if i < bytes.len()
                    && (bytes[i] as char) == '.'
                    && i + 1 < bytes.len()
                    && (bytes[i + 1] as char).is_ascii_digit()
                {
                    is_float = true;
                    i += 1;
                }
            }

            while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                i += 1;
            }

            if i < bytes.len() && matches!(bytes[i] as char, 'e' | 'E') {
                let e_pos = i;
                is_float = true;
                i += 1;
                if i < bytes.len() && matches!(bytes[i] as char, '+' | '-') {
                    i += 1;
                }
                let exp_start = i;
                while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                    i += 1;
                }
                if exp_start == i {
                    return Err(ExprError::new(
                        e_pos,
                        "invalid number exponent (expected digits)",
                    ));
                }
            }

            let s = &input[start..i];
            let kind = if is_float {
                let v: f64 = s
                    .parse()
                    .map_err(|_| ExprError::new(start, "invalid number"))?;
                if !v.is_finite() {
                    return Err(ExprError::new(start, format!("number '{s}' is out of range")));
                }
                TokenKind::Float(v)
            } else {
                let v: i64 = s.parse().map_err(|_| {
                    ExprError::new(start, format!("integer literal '{s}' is out of range"))
                })?;
                TokenKind::Int(v)
            };
            out.push(Token {
                kind,
                span: Span { start, end: i },
            });
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            i += 1;
            while i < bytes.len() {
                let ch = bytes[i] as char;
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    i += 1;
                } else {
                    break;
                }
            }
            let s = &input[start..i];
            let kind = match s {
                "true" => TokenKind::True,
                "false" => TokenKind::False,
                _ => TokenKind::Ident(s.to_owned()),
            };
            out.push(Token {
                kind,
                span: Span { start, end: i },
            });
            continue;
        }

        if c == '"' || c == '\'' {
            let (value, end) = lex_string(input, start, c)?;
            i = end;
            out.push(Token {
                kind: TokenKind::Str(value),
                span: Span { start, end },
            });
            continue;
        }

        if input[i..].starts_with("**") {
            i += 2;
            out.push(Token {
                kind: TokenKind::StarStar,
                span: Span { start, end: i },
            });
            continue;
        }

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '=' => TokenKind::Eq,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '!' => TokenKind::Bang,
            _ => {
                let ch = input[i..].chars().next().unwrap_or(c);
                return Err(ExprError::new(start, format!("unexpected character '{ch}'")));
            }
        };
        i += 1;
        out.push(Token {
            kind,
            span: Span { start, end: i },
        });
    }

    out.push(Token {
        kind: TokenKind::Eof,
        span: Span {
            start: input.len(),
            end: input.len(),
        },
    });

    Ok(out)
}

/// Lexes a quoted string starting at `start`; returns the unescaped value and
/// the byte offset just past the closing quote.
fn lex_string(input: &str, start: usize, quote: char) -> Result<(String, usize), ExprError> {
    let mut value = String::new();
    let mut chars = input[start + 1..].char_indices();
    while let Some((off, ch)) = chars.next() {
        let pos = start + 1 + off;
        match ch {
            c if c == quote => return Ok((value, pos + c.len_utf8())),
            '\\' => {
                let Some((_, esc)) = chars.next() else {
                    break;
                };
                value.push(match esc {
                    'n' => '\n',
                    't' => '\t',
                    '\\' | '\'' | '"' => esc,
                    other => {
                        return Err(ExprError::new(
                            pos,
                            format!("unknown escape sequence '\\{other}'"),
                        ));
                    }
                });
            }
            c => value.push(c),
        }
    }
    Err(ExprError::new(start, "unterminated string literal"))
}
