use crate::expression::ast::{BinaryOp, Constant, Expr, Keyword, UnaryOp};
use crate::expression::error::ExprError;
use crate::expression::lexer::{Span, Token, TokenKind, lex};

/// Deepest grouping/operator nesting the parser will descend into.
pub const MAX_NESTING: usize = 256;

/// Parses one expression into the generic tree consumed by the lowering engine.
pub fn parse_expr(src: &str) -> Result<Expr, ExprError> {
    let tokens = lex(src.trim())?;
    let mut p = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = p.parse_sum()?;
    p.expect(TokenKind::Eof)?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind_at(&self, ahead: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + ahead).map(|t| &t.kind)
    }

    fn bump(&mut self) -> &Token {
        let t = &self.tokens[self.pos];
        // Eof is sticky.
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExprError> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(ExprError::new(
                self.span().start,
                format!("expected {kind:?}, found {:?}", self.peek().kind),
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn enter(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ExprError::new(
                self.span().start,
                format!("expression nests deeper than {MAX_NESTING} levels"),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // Left-associative chains nest one level per operator.
    fn leave_chain(&mut self, links: usize) {
        self.depth -= links;
    }

    fn parse_sum(&mut self) -> Result<Expr, ExprError> {
        self.enter()?;
        let mut e = self.parse_product()?;
        let mut links = 0;
        loop {
            let op = if self.consume(TokenKind::Plus) {
                BinaryOp::Add
            } else if self.consume(TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            self.enter()?;
            links += 1;
            let r = self.parse_product()?;
            e = Expr::binary(e, op, r);
        }
        self.leave_chain(links);
        self.leave();
        Ok(e)
    }

    fn parse_product(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_unary()?;
        let mut links = 0;
        loop {
            let op = if self.consume(TokenKind::Star) {
                BinaryOp::Mul
            } else if self.consume(TokenKind::Slash) {
                BinaryOp::Div
            } else if self.consume(TokenKind::Percent) {
                BinaryOp::Mod
            } else {
                break;
            };
            self.enter()?;
            links += 1;
            let r = self.parse_unary()?;
            e = Expr::binary(e, op, r);
        }
        self.leave_chain(links);
        Ok(e)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        let op = if self.consume(TokenKind::Minus) {
            UnaryOp::Minus
        } else if self.consume(TokenKind::Plus) {
            UnaryOp::Plus
        } else if self.consume(TokenKind::Bang) {
            UnaryOp::Not
        } else {
            return self.parse_power();
        };
        self.enter()?;
        let operand = self.parse_unary()?;
        self.leave();
        Ok(Expr::unary(op, operand))
    }

    // `**` binds tighter than a unary on its left and is right-associative;
    // its right operand may carry its own sign.
    fn parse_power(&mut self) -> Result<Expr, ExprError> {
        let base = self.parse_postfix()?;
        if !self.consume(TokenKind::StarStar) {
            return Ok(base);
        }
        self.enter()?;
        let exponent = self.parse_unary()?;
        self.leave();
        Ok(Expr::binary(base, BinaryOp::Pow, exponent))
    }

    fn parse_postfix(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_primary()?;
        let mut links = 0;

        loop {
            if self.consume(TokenKind::Dot) {
                let t = self.bump().clone();
                let name = match t.kind {
                    TokenKind::Ident(s) => s,
                    other => {
                        return Err(ExprError::new(
                            t.span.start,
                            format!("expected ident after '.', found {other:?}"),
                        ));
                    }
                };
                e = append_path(e, name, t.span.start)?;
                continue;
            }

            if self.consume(TokenKind::LParen) {
                self.enter()?;
                links += 1;
                let (args, keywords) = self.parse_args()?;
                // The callee is kept as-is; the lowering engine decides whether it is a
                // valid function name.
                e = Expr::Call {
                    func: Box::new(e),
                    args,
                    keywords,
                };
                continue;
            }

            break;
        }

        self.leave_chain(links);
        Ok(e)
    }

    fn parse_args(&mut self) -> Result<(Vec<Expr>, Vec<Keyword>), ExprError> {
        let mut args = Vec::new();
        let mut keywords: Vec<Keyword> = Vec::new();
        if self.consume(TokenKind::RParen) {
            return Ok((args, keywords));
        }
        loop {
            let is_keyword = matches!(self.peek().kind, TokenKind::Ident(_))
                && self.peek_kind_at(1) == Some(&TokenKind::Eq);
            if is_keyword {
                let TokenKind::Ident(name) = self.bump().kind.clone() else {
                    unreachable!("checked above");
                };
                self.bump();
                let value = self.parse_sum()?;
                keywords.push(Keyword { name, value });
            } else {
                let start = self.span().start;
                let value = self.parse_sum()?;
                if !keywords.is_empty() {
                    return Err(ExprError::new(
                        start,
                        "positional argument follows keyword argument",
                    ));
                }
                args.push(value);
            }
            if self.consume(TokenKind::Comma) {
                // Trailing comma.
                if self.consume(TokenKind::RParen) {
                    return Ok((args, keywords));
                }
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok((args, keywords));
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let t = self.bump().clone();
        match t.kind {
            TokenKind::Int(v) => Ok(Expr::Constant(Constant::Int(v))),
            TokenKind::Float(v) => Ok(Expr::Constant(Constant::Float(v))),
            TokenKind::Str(s) => Ok(Expr::Constant(Constant::Str(s))),
            TokenKind::True => Ok(Expr::Constant(Constant::Bool(true))),
            TokenKind::False => Ok(Expr::Constant(Constant::Bool(false))),
            TokenKind::Ident(s) => Ok(Expr::Path(vec![s])),
            TokenKind::LParen => {
                let e = self.parse_sum()?;
                self.expect(TokenKind::RParen)?;
                Ok(e)
            }
            other => Err(ExprError::new(
                t.span.start,
                format!("unexpected token {other:?}"),
            )),
        }
    }
}

fn append_path(base: Expr, segment: String, offset: usize) -> Result<Expr, ExprError> {
    match base {
        Expr::Path(mut v) => {
            v.push(segment);
            Ok(Expr::Path(v))
        }
        _ => Err(ExprError::new(
            offset,
            "member access base must be an identifier path",
        )),
    }
}
