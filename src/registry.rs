//! Table of every density function the lowering engine knows about.
//!
//! Names, parameter order and value kinds are the downstream loader's contract
//! (game version 1.21.10) and must not drift.

use std::fmt;

use ValueKind::{Const, Expr, Str};

/// Namespace prefixed to every emitted `type`.
pub const NAMESPACE: &str = "minecraft";

/// Required shape of a bound argument after lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Numeric literal (after constant folding).
    Const,
    /// String literal naming another density function or noise.
    Str,
    /// Any lowered value.
    Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub kind: ValueKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Zero,
    /// Exactly one positional argument, bound to `argument`.
    Single,
    Multi(&'static [Param]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: &'static str,
    pub arity: Arity,
}

const fn p(name: &'static str, kind: ValueKind) -> Param {
    Param { name, kind }
}

const fn zero(name: &'static str) -> FunctionDef {
    FunctionDef {
        name,
        arity: Arity::Zero,
    }
}

const fn single(name: &'static str) -> FunctionDef {
    FunctionDef {
        name,
        arity: Arity::Single,
    }
}

const fn multi(name: &'static str, params: &'static [Param]) -> FunctionDef {
    FunctionDef {
        name,
        arity: Arity::Multi(params),
    }
}

const TWO_ARGS: &[Param] = &[p("argument1", Expr), p("argument2", Expr)];
const STR_ARG: &[Param] = &[p("argument", Str)];
const OLD_BLENDED_NOISE: &[Param] = &[
    p("xz_scale", Const),
    p("y_scale", Const),
    p("xz_factor", Const),
    p("y_factor", Const),
    p("smear_scale_multiplier", Const),
];
const NOISE: &[Param] = &[p("noise", Str), p("xz_scale", Const), p("y_scale", Const)];
const WEIRD_SCALED_SAMPLER: &[Param] = &[
    p("rarity_value_mapper", Str),
    p("noise", Str),
    p("input", Expr),
];
const SHIFTED_NOISE: &[Param] = &[
    p("noise", Str),
    p("xz_scale", Const),
    p("y_scale", Const),
    p("shift_x", Expr),
    p("shift_y", Expr),
    p("shift_z", Expr),
];
const RANGE_CHOICE: &[Param] = &[
    p("input", Expr),
    p("min_inclusive", Const),
    p("max_exclusive", Const),
    p("when_in_range", Expr),
    p("when_out_of_range", Expr),
];
const CLAMP: &[Param] = &[p("input", Expr), p("min", Const), p("max", Const)];
const Y_CLAMPED_GRADIENT: &[Param] = &[
    p("from_y", Const),
    p("to_y", Const),
    p("from_value", Const),
    p("to_value", Const),
];
const FIND_TOP_SURFACE: &[Param] = &[
    p("density", Expr),
    p("upper_bound", Expr),
    p("lower_bound", Const),
    p("cell_height", Const),
];

static FUNCTIONS: &[FunctionDef] = &[
    zero("blend_alpha"),
    zero("blend_offset"),
    zero("beardifier"),
    zero("end_islands"),
    single("interpolated"),
    single("flat_cache"),
    single("cache_2d"),
    single("cache_once"),
    single("cache_all_in_cell"),
    single("abs"),
    single("half_negative"),
    single("quarter_negative"),
    single("squeeze"),
    single("invert"),
    single("blend_density"),
    multi("min", TWO_ARGS),
    multi("max", TWO_ARGS),
    multi("old_blended_noise", OLD_BLENDED_NOISE),
    multi("noise", NOISE),
    multi("weird_scaled_sampler", WEIRD_SCALED_SAMPLER),
    multi("shifted_noise", SHIFTED_NOISE),
    multi("range_choice", RANGE_CHOICE),
    multi("shift_a", STR_ARG),
    multi("shift_b", STR_ARG),
    multi("shift", STR_ARG),
    multi("clamp", CLAMP),
    multi("y_clamped_gradient", Y_CLAMPED_GRADIENT),
    multi("find_top_surface", FIND_TOP_SURFACE),
];

/// Exact-match lookup; no aliases, no case folding.
pub fn lookup(name: &str) -> Option<&'static FunctionDef> {
    FUNCTIONS.iter().find(|f| f.name == name)
}

/// Every registered function, in table order.
pub fn functions() -> &'static [FunctionDef] {
    FUNCTIONS
}

impl FunctionDef {
    /// Parameters in declaration order. Single-argument functions report their
    /// implicit `argument` parameter.
    pub fn params(&self) -> &'static [Param] {
        const SINGLE: &[Param] = &[p("argument", Expr)];
        match self.arity {
            Arity::Zero => &[],
            Arity::Single => SINGLE,
            Arity::Multi(params) => params,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Const => "const",
            Self::Str => "str",
            Self::Expr => "expr",
        })
    }
}

/// Renders the call signature, e.g. `clamp(input: expr, min: const, max: const)`.
impl fmt::Display for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", param.name, param.kind)?;
        }
        f.write_str(")")
    }
}
