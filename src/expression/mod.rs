//! Expression front end: the generic tree the lowering engine consumes, plus a
//! small infix parser that produces it from text.

pub mod ast;
pub mod error;
pub(crate) mod lexer;
pub mod parser;
