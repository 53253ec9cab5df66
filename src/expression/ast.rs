use std::fmt;

/// Generic expression tree handed to the lowering engine.
///
/// The tree is deliberately wider than what lowers successfully: `Not`, `Mod`,
/// boolean literals and bare paths can all be parsed so that the engine can
/// reject them with a precise error instead of the parser guessing.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(Constant),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
    /// A dotted identifier path: `abs`, `noise.scale`. One segment is a bare name.
    Path(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

/// `name=value` in a call's argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: String,
    pub value: Expr,
}

impl Expr {
    pub fn int(v: i64) -> Self {
        Self::Constant(Constant::Int(v))
    }

    pub fn float(v: f64) -> Self {
        Self::Constant(Constant::Float(v))
    }

    pub fn string(v: impl Into<String>) -> Self {
        Self::Constant(Constant::Str(v.into()))
    }

    pub fn name(v: impl Into<String>) -> Self {
        Self::Path(vec![v.into()])
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Call of a bare function name.
    pub fn call(func: impl Into<String>, args: Vec<Expr>, keywords: Vec<Keyword>) -> Self {
        Self::Call {
            func: Box::new(Self::name(func)),
            args,
            keywords,
        }
    }
}

impl Keyword {
    pub fn new(name: impl Into<String>, value: Expr) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "!",
        }
    }
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(c) => write!(f, "{c}"),
            Self::Unary { op, operand } => write!(f, "{}{operand}", op.symbol()),
            Self::Binary { op, left, right } => {
                write!(f, "({left} {} {right})", op.symbol())
            }
            Self::Call {
                func,
                args,
                keywords,
            } => {
                write!(f, "{func}(")?;
                let mut first = true;
                for a in args {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    write!(f, "{a}")?;
                }
                for kw in keywords {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    write!(f, "{}={}", kw.name, kw.value)?;
                }
                f.write_str(")")
            }
            Self::Path(segments) => f.write_str(&segments.join(".")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_source_like_text() {
        let e = Expr::call(
            "clamp",
            vec![Expr::binary(Expr::name("x"), BinaryOp::Pow, Expr::int(2))],
            vec![Keyword::new("min", Expr::float(0.5)), Keyword::new("max", Expr::string("a"))],
        );
        assert_eq!(e.to_string(), "clamp((x ** 2), min=0.5, max=\"a\")");
    }

    #[test]
    fn display_keeps_float_point() {
        assert_eq!(Expr::float(1.0).to_string(), "1.0");
        assert_eq!(Expr::unary(UnaryOp::Minus, Expr::int(3)).to_string(), "-3");
    }
}
