//! Builds the replacement body of a probe from its diagnostics.
//!
//! A probe with no diagnostics becomes
//!
//! ```js
//! { return []; }
//! ```
//!
//! and a probe with diagnostics becomes
//!
//! ```js
//! {
//!   Error.stackTraceLimit = 0;
//!   throw [new Error("first"), new Error("second")][0];
//! }
//! ```
//!
//! Every error is constructed, but only the first is thrown. The
//! `Error.stackTraceLimit = 0` write is process-wide and is never undone: once
//! any failing probe has run, no later error in the process captures a stack
//! trace. [`crate::runtime::ErrorReporting`] models the same switch.

use crate::ast::build;
use crate::ast::expr::Expr;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::diagnostic::Diagnostic;
use crate::loc::{Loc, TextRange};

pub const ERROR_CONSTRUCTOR: &str = "Error";
pub const STACK_TRACE_LIMIT: &str = "stackTraceLimit";

/// Where a synthesized node came from in the original source. Only source-map
/// tooling reads this; it does not change what the code does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceMapRange(pub TextRange);

/// An error the rewritten probe constructs: the diagnostic's message and the
/// span it was reported at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorExpr {
  pub message: String,
  pub range: TextRange,
}

impl ErrorExpr {
  fn from_diagnostic(diagnostic: &Diagnostic) -> Option<ErrorExpr> {
    Some(ErrorExpr {
      message: diagnostic.message.head_text().to_string(),
      range: diagnostic.range()?,
    })
  }

  /// `new Error("<message>")`, located at and tagged with the diagnostic's span.
  fn into_expr(self) -> Node<Expr> {
    let loc = Loc::from(self.range);
    let mut expr = build::new_call(loc, build::id(loc, ERROR_CONSTRUCTOR), vec![build::arg(
      build::lit_str(loc, &self.message),
    )]);
    expr.assoc.set(SourceMapRange(self.range));
    expr
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SynthesizedBody {
  /// No diagnostics: the probe returns an empty list of errors.
  Empty,
  /// At least one diagnostic: the probe disables stack traces and throws the
  /// first error.
  Failing { errors: Vec<ErrorExpr> },
}

/// Chooses the body for a probe whose region contains `diagnostics`, which
/// must already be in the order the checker reported them.
pub fn synthesize(diagnostics: &[&Diagnostic]) -> SynthesizedBody {
  let errors: Vec<ErrorExpr> = diagnostics
    .iter()
    .filter_map(|diagnostic| ErrorExpr::from_diagnostic(diagnostic))
    .collect();
  if errors.is_empty() {
    SynthesizedBody::Empty
  } else {
    SynthesizedBody::Failing { errors }
  }
}

impl SynthesizedBody {
  pub fn is_failing(&self) -> bool {
    matches!(self, SynthesizedBody::Failing { .. })
  }

  pub fn errors(&self) -> &[ErrorExpr] {
    match self {
      SynthesizedBody::Empty => &[],
      SynthesizedBody::Failing { errors } => errors,
    }
  }

  /// Lowers to a block body located at `loc`, the span of the body it replaces.
  pub fn into_func_body(self, loc: Loc) -> Node<FuncBody> {
    let stmts = match self {
      SynthesizedBody::Empty => vec![build::return_stmt(loc, Some(build::lit_arr(loc, Vec::new())))],
      SynthesizedBody::Failing { errors } => vec![
        disable_stack_traces(loc),
        throw_first(loc, errors.into_iter().map(ErrorExpr::into_expr).collect()),
      ],
    };
    build::block_body(loc, stmts)
  }
}

/// `Error.stackTraceLimit = 0;`
fn disable_stack_traces(loc: Loc) -> Node<Stmt> {
  build::expr_stmt(build::assign(
    loc,
    build::member(loc, build::id(loc, ERROR_CONSTRUCTOR), STACK_TRACE_LIMIT),
    build::lit_num(loc, 0.0),
  ))
}

/// `throw [errors...][0];`
fn throw_first(loc: Loc, errors: Vec<Node<Expr>>) -> Node<Stmt> {
  build::throw_stmt(
    loc,
    build::computed_member(loc, build::lit_arr(loc, errors), build::lit_num(loc, 0.0)),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::expr::LitArrElem;

  #[test]
  fn no_diagnostics_is_empty() {
    let body = synthesize(&[]);
    assert_eq!(body, SynthesizedBody::Empty);
    assert!(body.errors().is_empty());
  }

  #[test]
  fn chained_messages_use_the_head() {
    let chained = Diagnostic::new(
      3,
      4,
      crate::diagnostic::DiagnosticMessageChain {
        message_text: "head".into(),
        code: None,
        category: Default::default(),
        next: Vec::new(),
      },
    );
    let flat = Diagnostic::new(9, 1, "flat");
    let body = synthesize(&[&chained, &flat]);
    assert_eq!(body.errors(), &[
      ErrorExpr {
        message: "head".into(),
        range: TextRange::new(3, 7),
      },
      ErrorExpr {
        message: "flat".into(),
        range: TextRange::new(9, 10),
      },
    ]);
  }

  #[test]
  fn unpositioned_diagnostics_do_not_produce_errors() {
    let global = Diagnostic::unpositioned("global");
    assert_eq!(synthesize(&[&global]), SynthesizedBody::Empty);
  }

  #[test]
  fn failing_body_tags_errors_with_their_span() {
    let diagnostic = Diagnostic::new(20, 6, "boom");
    let body = synthesize(&[&diagnostic]).into_func_body(Loc(10, 40));
    assert_eq!(body.loc, Loc(10, 40));
    let FuncBody::Block(stmts) = body.stx.as_ref() else {
      panic!("expected block body");
    };
    assert_eq!(stmts.len(), 2);
    let Stmt::Throw(throw) = stmts[1].stx.as_ref() else {
      panic!("expected throw");
    };
    let Expr::ComputedMember(access) = throw.stx.value.stx.as_ref() else {
      panic!("expected element access");
    };
    let Expr::LitArr(arr) = access.stx.object.stx.as_ref() else {
      panic!("expected array literal");
    };
    let LitArrElem::Single(error) = &arr.stx.elements[0] else {
      panic!("expected element");
    };
    assert_eq!(error.loc, Loc(20, 26));
    assert_eq!(
      error.assoc.get::<SourceMapRange>(),
      Some(&SourceMapRange(TextRange::new(20, 26)))
    );
  }
}
