//! Lowers infix arithmetic and function-call expressions into Minecraft
//! density function JSON.
//!
//! ```text
//! clamp(abs("minecraft:overworld/ridges") * 2, -1, 1)
//! ```
//!
//! becomes a `minecraft:clamp` node wrapping a `minecraft:mul` node, ready for a
//! data pack's `worldgen/density_function` directory. String literals name other
//! density functions or noises and are passed through unchecked.
//!
//! - [`parse_expr`] turns text into an [`Expr`] tree.
//! - [`lower`] / [`Lowerer`] turn an [`Expr`] into a [`DensityValue`].
//! - [`registry`] holds the known functions and their argument contracts.
#![forbid(unsafe_code)]

pub mod density;
pub mod expression;
mod foundation;
pub mod lower;
pub mod registry;

pub use crate::density::{DensityNode, DensityValue};
pub use crate::expression::ast::{BinaryOp, Constant, Expr, Keyword, UnaryOp};
pub use crate::expression::error::ExprError;
pub use crate::expression::parser::parse_expr;
pub use crate::foundation::error::{DensityError, DensityResult};
pub use crate::lower::error::{ArgRef, LowerError};
pub use crate::lower::{LowerOpts, Lowerer, lower, lower_with};

/// Parses and lowers `src` in one step.
pub fn compile_str(src: &str, opts: &LowerOpts) -> DensityResult<DensityValue> {
    let expr = parse_expr(src)?;
    Ok(lower_with(&expr, opts)?)
}
