//! Lowering engine: expression tree in, density function tree out.
//!
//! Arithmetic desugars onto the loader's own nodes (`add`, `mul`, `invert`,
//! `square`, `cube`), negation and unary plus fold away on literals, and calls
//! are checked against [`crate::registry`] before their arguments are bound.

mod bind;
pub mod error;

use std::cell::Cell;
use std::path::Path;

use crate::density::{DensityNode, DensityValue};
use crate::expression::ast::{BinaryOp, Constant, Expr, Keyword, UnaryOp};
use crate::foundation::error::{DensityError, DensityResult};
use crate::lower::error::LowerError;
use crate::registry::{self, Arity};

/// Options controlling resource limits of a lowering call.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LowerOpts {
    /// Deepest input tree the engine will recurse into.
    pub max_depth: usize,
    /// Largest exponent an integer power may be unrolled to. Each unit of
    /// exponent duplicates the base sub-tree once.
    pub max_pow_exponent: u32,
    /// Most function nodes a single lowered tree may contain. Nested powers
    /// multiply their base sizes, so this is what actually bounds the output.
    pub max_nodes: usize,
}

impl Default for LowerOpts {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_pow_exponent: 64,
            max_nodes: 1_000_000,
        }
    }
}

impl LowerOpts {
    /// Loads options from a JSON file; absent keys keep their defaults.
    pub fn from_path(path: &Path) -> DensityResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DensityError::config(format!("read '{}': {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| DensityError::config(format!("parse '{}': {e}", path.display())))
    }
}

/// Lowers with default options.
pub fn lower(expr: &Expr) -> Result<DensityValue, LowerError> {
    Lowerer::default().lower(expr)
}

/// Lowers with caller-supplied limits.
pub fn lower_with(expr: &Expr, opts: &LowerOpts) -> Result<DensityValue, LowerError> {
    Lowerer::new(opts.clone()).lower(expr)
}

/// Reusable lowering engine holding its limits.
#[derive(Clone, Debug, Default)]
pub struct Lowerer {
    opts: LowerOpts,
    // Function nodes emitted by the current `lower` call.
    emitted: Cell<usize>,
}

impl Lowerer {
    /// Engine with the given limits.
    pub fn new(opts: LowerOpts) -> Self {
        Self {
            opts,
            emitted: Cell::new(0),
        }
    }

    /// Converts `expr` into a density value. The input is never mutated and the
    /// result shares nothing with it.
    #[tracing::instrument(level = "debug", skip_all, fields(max_depth = self.opts.max_depth))]
    pub fn lower(&self, expr: &Expr) -> Result<DensityValue, LowerError> {
        self.emitted.set(0);
        self.lower_at(expr, 1)
    }

    fn charge(&self, nodes: usize) -> Result<(), LowerError> {
        let total = self.emitted.get().saturating_add(nodes);
        if total > self.opts.max_nodes {
            return Err(LowerError::OutputTooLarge {
                limit: self.opts.max_nodes,
            });
        }
        self.emitted.set(total);
        Ok(())
    }

    fn node1(
        &self,
        function: &'static str,
        argument: DensityValue,
    ) -> Result<DensityValue, LowerError> {
        self.charge(1)?;
        Ok(DensityNode::unary(function, argument).into())
    }

    fn node2(
        &self,
        function: &'static str,
        argument1: DensityValue,
        argument2: DensityValue,
    ) -> Result<DensityValue, LowerError> {
        self.charge(1)?;
        Ok(DensityNode::binary(function, argument1, argument2).into())
    }

    fn lower_at(&self, e: &Expr, depth: usize) -> Result<DensityValue, LowerError> {
        if depth > self.opts.max_depth {
            return Err(LowerError::DepthLimitExceeded {
                limit: self.opts.max_depth,
            });
        }
        let next = depth + 1;

        match e {
            Expr::Constant(c) => lower_constant(c),
            Expr::Unary { op, operand } => match op {
                UnaryOp::Plus => self.lower_at(operand, next),
                UnaryOp::Minus => self.negate(operand, next),
                UnaryOp::Not => Err(unsupported(e, op.symbol())),
            },
            Expr::Binary { op, left, right } => match op {
                BinaryOp::Add => {
                    let l = self.lower_at(left, next)?;
                    self.node2("add", l, self.lower_at(right, next)?)
                }
                // a - b == a + (-b), which lets a literal `b` fold.
                BinaryOp::Sub => {
                    let l = self.lower_at(left, next)?;
                    self.node2("add", l, self.negate(right, next)?)
                }
                BinaryOp::Mul => {
                    let l = self.lower_at(left, next)?;
                    self.node2("mul", l, self.lower_at(right, next)?)
                }
                BinaryOp::Div => self.lower_div(left, right, next),
                BinaryOp::Pow => self.lower_pow(left, right, next),
                BinaryOp::Mod => Err(unsupported(e, op.symbol())),
            },
            Expr::Call {
                func,
                args,
                keywords,
            } => self.lower_call(func, args, keywords, next),
            Expr::Path(_) => Err(LowerError::InvalidExpression {
                expr: e.to_string(),
            }),
        }
    }

    fn negate(&self, operand: &Expr, depth: usize) -> Result<DensityValue, LowerError> {
        match self.lower_at(operand, depth)? {
            DensityValue::Number(v) => Ok(DensityValue::Number(-v)),
            other => self.node2("mul", other, DensityValue::Number(-1.0)),
        }
    }

    fn lower_div(
        &self,
        left: &Expr,
        right: &Expr,
        depth: usize,
    ) -> Result<DensityValue, LowerError> {
        if is_literal_one(left) {
            return self.node1("invert", self.lower_at(right, depth)?);
        }
        let numerator = self.lower_at(left, depth)?;
        let reciprocal = self.node1("invert", self.lower_at(right, depth)?)?;
        self.node2("mul", numerator, reciprocal)
    }

    fn lower_pow(
        &self,
        base: &Expr,
        exponent: &Expr,
        depth: usize,
    ) -> Result<DensityValue, LowerError> {
        let n = match exponent {
            Expr::Constant(Constant::Int(n)) if *n >= 0 => *n,
            // Integral floats only reach the dedicated small-power forms.
            Expr::Constant(Constant::Float(v)) if [0.0, 1.0, 2.0, 3.0].contains(v) => *v as i64,
            _ => {
                return Err(LowerError::UnsupportedPower {
                    exponent: exponent.to_string(),
                });
            }
        };

        match n {
            0 => Ok(DensityValue::Number(1.0)),
            1 => self.lower_at(base, depth),
            2 => self.node1("square", self.lower_at(base, depth)?),
            3 => self.node1("cube", self.lower_at(base, depth)?),
            n => {
                let limit = self.opts.max_pow_exponent;
                if n > i64::from(limit) {
                    return Err(LowerError::PowerTooLarge { exponent: n, limit });
                }
                tracing::warn!(
                    exponent = n,
                    "integer power expanded into {} nested mul nodes",
                    n - 1
                );
                // The loader has no way to share a sub-tree, so the base is
                // repeated once per factor.
                let base = self.lower_at(base, depth)?;
                let copies = (n - 1) as usize;
                self.charge(base.node_count().saturating_add(1).saturating_mul(copies))?;
                let mut acc = base.clone();
                for _ in 0..copies {
                    acc = DensityNode::binary("mul", base.clone(), acc).into();
                }
                Ok(acc)
            }
        }
    }

    fn lower_call(
        &self,
        func: &Expr,
        args: &[Expr],
        keywords: &[Keyword],
        depth: usize,
    ) -> Result<DensityValue, LowerError> {
        let name = match func {
            Expr::Path(segments) if segments.len() == 1 => segments[0].as_str(),
            other => {
                return Err(LowerError::InvalidCallTarget {
                    callee: other.to_string(),
                });
            }
        };
        let def = registry::lookup(name).ok_or_else(|| LowerError::UnknownFunction {
            name: name.to_owned(),
        })?;

        let node = match def.arity {
            Arity::Zero => {
                if !keywords.is_empty() {
                    return Err(LowerError::NoKeywordArguments { function: def.name });
                }
                if !args.is_empty() {
                    return Err(LowerError::TakesNoArguments { function: def.name });
                }
                DensityNode::new(def.name)
            }
            Arity::Single => {
                if !keywords.is_empty() {
                    return Err(LowerError::NoKeywordArguments { function: def.name });
                }
                let [arg] = args else {
                    return Err(LowerError::WrongArgumentCount {
                        function: def.name,
                        expected: 1,
                        found: args.len(),
                    });
                };
                DensityNode::unary(def.name, self.lower_at(arg, depth)?)
            }
            Arity::Multi(params) => self.bind_call(def.name, params, args, keywords, depth)?,
        };
        self.charge(1)?;
        Ok(node.into())
    }
}

fn lower_constant(c: &Constant) -> Result<DensityValue, LowerError> {
    match c {
        Constant::Int(v) => Ok(DensityValue::Number(*v as f64)),
        Constant::Float(v) if v.is_finite() => Ok(DensityValue::Number(*v)),
        Constant::Str(s) => Ok(DensityValue::Str(s.clone())),
        Constant::Float(_) | Constant::Bool(_) => Err(LowerError::InvalidConstant {
            value: c.to_string(),
        }),
    }
}

fn is_literal_one(e: &Expr) -> bool {
    match e {
        Expr::Constant(Constant::Int(v)) => *v == 1,
        Expr::Constant(Constant::Float(v)) => *v == 1.0,
        _ => false,
    }
}

fn unsupported(e: &Expr, op: &'static str) -> LowerError {
    LowerError::UnsupportedOperator {
        expr: e.to_string(),
        op,
    }
}
