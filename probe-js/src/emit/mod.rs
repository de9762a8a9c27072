//! Minified TypeScript output for rewritten trees.

mod emitter;
mod escape;
mod expr;
mod stmt;

use thiserror::Error;

use crate::ast::node::Node;
use crate::ast::stx::TopLevel;
use crate::loc::Loc;

pub use emitter::Emitter;
pub use escape::emit_string_literal_double_quoted;
pub use expr::emit_expr;
pub use stmt::{emit_stmt, emit_top_level_stmts};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmitError {
  /// The tree has a shape no source text can express.
  #[error("cannot emit {what} at {loc:?}")]
  Unrepresentable { what: &'static str, loc: Loc },
}

pub type EmitResult = Result<(), EmitError>;

pub(crate) fn unrepresentable(what: &'static str, loc: Loc) -> EmitError {
  EmitError::Unrepresentable { what, loc }
}

/// Emits `top` as minified source text.
pub fn emit_top_level(top: &Node<TopLevel>) -> Result<String, EmitError> {
  let mut out = Emitter::new();
  emit_top_level_stmts(&mut out, top)?;
  // Every fragment written is valid UTF-8.
  Ok(String::from_utf8_lossy(out.as_bytes()).into_owned())
}
