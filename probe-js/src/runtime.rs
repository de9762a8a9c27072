//! Running rewritten probes and asserting on what they report.
//!
//! A rewritten probe either produces no errors or fails with the errors its
//! diagnostics became. [`evaluate_probe`] turns the synthesized body into a
//! [`ProbeOutcome`] that keeps all of them, and [`ProbeResult`] decides how
//! many to look at: `expect_to_compile` surfaces only the first, while
//! `expect_to_fail_with` searches all of them.

use regex::Regex;
use std::backtrace::Backtrace;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::ast::expr::{CallExpr, Expr, LitArrElem};
use crate::ast::func::{Func, FuncBody};
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::loc::{Loc, TextRange};
use crate::operator::OperatorName;
use crate::synthesize::{SourceMapRange, ERROR_CONSTRUCTOR, STACK_TRACE_LIMIT};

/// Whether errors capture stack traces.
///
/// Capture starts on. The first failing probe turns it off and it stays off:
/// nothing turns it back on, so every error created afterwards in the process
/// has no stack trace. Assertion failures turn it off too, to keep their
/// output to the message alone.
#[derive(Debug, Default)]
pub struct ErrorReporting {
  stack_traces_suppressed: AtomicBool,
}

static GLOBAL_REPORTING: ErrorReporting = ErrorReporting::new();

impl ErrorReporting {
  pub const fn new() -> Self {
    Self {
      stack_traces_suppressed: AtomicBool::new(false),
    }
  }

  /// The process-wide instance.
  pub fn global() -> &'static ErrorReporting {
    &GLOBAL_REPORTING
  }

  pub fn suppress_stack_traces(&self) {
    self.stack_traces_suppressed.store(true, Ordering::SeqCst);
  }

  pub fn captures_stack_traces(&self) -> bool {
    !self.stack_traces_suppressed.load(Ordering::SeqCst)
  }

  fn capture(&self) -> Option<Arc<Backtrace>> {
    self
      .captures_stack_traces()
      .then(|| Arc::new(Backtrace::capture()))
  }
}

/// An error produced by running a probe.
#[derive(Clone)]
pub struct RuntimeError {
  message: String,
  origin: Option<TextRange>,
  stack: Option<Arc<Backtrace>>,
}

impl RuntimeError {
  pub fn new(message: impl Into<String>, reporting: &ErrorReporting) -> Self {
    Self {
      message: message.into(),
      origin: None,
      stack: reporting.capture(),
    }
  }

  pub fn with_origin(mut self, origin: TextRange) -> Self {
    self.origin = Some(origin);
    self
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  /// Span of the diagnostic this error was synthesized from.
  pub fn origin(&self) -> Option<TextRange> {
    self.origin
  }

  pub fn stack(&self) -> Option<&Backtrace> {
    self.stack.as_deref()
  }
}

impl fmt::Debug for RuntimeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RuntimeError")
      .field("message", &self.message)
      .field("origin", &self.origin)
      .field("has_stack", &self.stack.is_some())
      .finish()
  }
}

impl fmt::Display for RuntimeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Error: {}", self.message)
  }
}

impl std::error::Error for RuntimeError {}

#[derive(Clone, Debug)]
pub enum ProbeOutcome {
  Ok,
  /// Never empty. The error the probe threw comes first.
  Fail(Vec<RuntimeError>),
}

impl ProbeOutcome {
  fn from_errors(errors: Vec<RuntimeError>) -> Self {
    if errors.is_empty() {
      ProbeOutcome::Ok
    } else {
      ProbeOutcome::Fail(errors)
    }
  }

  pub fn errors(&self) -> &[RuntimeError] {
    match self {
      ProbeOutcome::Ok => &[],
      ProbeOutcome::Fail(errors) => errors,
    }
  }

  pub fn into_errors(self) -> Vec<RuntimeError> {
    match self {
      ProbeOutcome::Ok => Vec::new(),
      ProbeOutcome::Fail(errors) => errors,
    }
  }
}

#[derive(Debug, Error)]
pub enum EvalError {
  #[error("unsupported {what} at {loc:?}; the probe was not rewritten")]
  Unsupported { what: &'static str, loc: Loc },
  #[error("thrown index {index} is out of bounds for {len} errors at {loc:?}")]
  ThrownIndexOutOfBounds { index: usize, len: usize, loc: Loc },
}

fn unsupported<T>(what: &'static str, loc: Loc) -> Result<T, EvalError> {
  Err(EvalError::Unsupported { what, loc })
}

struct ProbeEvaluator<'a> {
  reporting: &'a ErrorReporting,
}

impl ProbeEvaluator<'_> {
  fn body(&self, body: &Node<FuncBody>) -> Result<ProbeOutcome, EvalError> {
    let FuncBody::Block(stmts) = body.stx.as_ref() else {
      return unsupported("expression body", body.loc);
    };
    for stmt in stmts {
      match stmt.stx.as_ref() {
        Stmt::Empty(_) => {}
        Stmt::Expr(expr_stmt) => self.stack_trace_limit_write(&expr_stmt.stx.expr)?,
        Stmt::Return(ret) => {
          let errors = match &ret.stx.value {
            Some(value) => self.error_list(value)?,
            None => Vec::new(),
          };
          return Ok(ProbeOutcome::from_errors(errors));
        }
        Stmt::Throw(throw) => return self.throw(&throw.stx.value).map(ProbeOutcome::Fail),
        _ => return unsupported("statement", stmt.loc),
      }
    }
    // Falling off the end returns nothing, which reports no errors.
    Ok(ProbeOutcome::Ok)
  }

  /// `Error.stackTraceLimit = 0`
  fn stack_trace_limit_write(&self, expr: &Node<Expr>) -> Result<(), EvalError> {
    let Expr::Binary(assign) = expr.stx.as_ref() else {
      return unsupported("expression statement", expr.loc);
    };
    if assign.stx.operator != OperatorName::Assignment {
      return unsupported("operator", expr.loc);
    }
    let Expr::Member(target) = assign.stx.left.stx.as_ref() else {
      return unsupported("assignment target", assign.stx.left.loc);
    };
    let is_error_global = matches!(
      target.stx.left.stx.as_ref(),
      Expr::Id(id) if id.stx.name == ERROR_CONSTRUCTOR
    );
    if !is_error_global || target.stx.right != STACK_TRACE_LIMIT {
      return unsupported("assignment target", assign.stx.left.loc);
    }
    match assign.stx.right.stx.as_ref() {
      Expr::LitNum(limit) if limit.stx.value == 0.0 => {
        self.reporting.suppress_stack_traces();
        Ok(())
      }
      _ => unsupported("stack trace limit", assign.stx.right.loc),
    }
  }

  /// Errors in the order they must be reported, thrown error first.
  fn throw(&self, value: &Node<Expr>) -> Result<Vec<RuntimeError>, EvalError> {
    match value.stx.as_ref() {
      Expr::ComputedMember(access) => {
        let mut errors = self.error_list(&access.stx.object)?;
        let Expr::LitNum(index) = access.stx.member.stx.as_ref() else {
          return unsupported("thrown element index", access.stx.member.loc);
        };
        let raw = index.stx.value;
        if raw < 0.0 || raw.fract() != 0.0 {
          return unsupported("thrown element index", access.stx.member.loc);
        }
        let index = raw as usize;
        if index >= errors.len() {
          return Err(EvalError::ThrownIndexOutOfBounds {
            index,
            len: errors.len(),
            loc: access.stx.member.loc,
          });
        }
        let thrown = errors.remove(index);
        errors.insert(0, thrown);
        Ok(errors)
      }
      _ => Ok(vec![self.error(value)?]),
    }
  }

  fn error_list(&self, value: &Node<Expr>) -> Result<Vec<RuntimeError>, EvalError> {
    let Expr::LitArr(arr) = value.stx.as_ref() else {
      return unsupported("error list", value.loc);
    };
    arr
      .stx
      .elements
      .iter()
      .map(|elem| match elem {
        LitArrElem::Single(error) => self.error(error),
        LitArrElem::Rest(_) | LitArrElem::Empty => unsupported("error list element", value.loc),
      })
      .collect()
  }

  /// `new Error("<message>")`
  fn error(&self, value: &Node<Expr>) -> Result<RuntimeError, EvalError> {
    let Expr::Unary(new) = value.stx.as_ref() else {
      return unsupported("error expression", value.loc);
    };
    if new.stx.operator != OperatorName::New {
      return unsupported("error expression", value.loc);
    }
    let Expr::Call(construct) = new.stx.argument.stx.as_ref() else {
      return unsupported("error construction", new.stx.argument.loc);
    };
    let message = error_message(&construct.stx)
      .ok_or(EvalError::Unsupported {
        what: "error construction",
        loc: construct.loc,
      })?;
    let error = RuntimeError::new(message, self.reporting);
    Ok(match value.assoc.get::<SourceMapRange>() {
      Some(SourceMapRange(range)) => error.with_origin(*range),
      None => error,
    })
  }
}

fn error_message(call: &CallExpr) -> Option<&str> {
  let Expr::Id(callee) = call.callee.stx.as_ref() else {
    return None;
  };
  if callee.stx.name != ERROR_CONSTRUCTOR {
    return None;
  }
  match call.arguments.as_slice() {
    [] => Some(""),
    [arg] if !arg.stx.spread => match arg.stx.value.stx.as_ref() {
      Expr::LitStr(message) => Some(&message.stx.value),
      _ => None,
    },
    _ => None,
  }
}

/// Runs a rewritten probe function.
///
/// Only the statement shapes the rewriter synthesizes are understood; a probe
/// that still has its original body is reported as [`EvalError::Unsupported`].
pub fn evaluate_probe(func: &Node<Func>, reporting: &ErrorReporting) -> Result<ProbeOutcome, EvalError> {
  ProbeEvaluator { reporting }.body(&func.stx.body)
}

#[derive(Debug, Error)]
pub enum AssertionError {
  /// The probe was expected to compile; this is its first error.
  #[error("{0}")]
  DidNotCompile(RuntimeError),
  #[error("No semantic failures")]
  NoFailures,
  #[error("No matching semantic failures, expected \"{pattern}\"!")]
  NoMatchingFailures { pattern: String },
  #[error("Expected failure \"{pattern}\", got failure \"{actual}\"!")]
  Mismatch { pattern: String, actual: RuntimeError },
  #[error("invalid failure pattern \"{pattern}\": {source}")]
  InvalidPattern { pattern: String, source: regex::Error },
}

/// What a probe reported, with the expectations a test can place on it.
#[derive(Debug)]
pub struct ProbeResult<'r> {
  pub errors: Vec<RuntimeError>,
  reporting: &'r ErrorReporting,
}

impl<'r> ProbeResult<'r> {
  pub fn new(outcome: ProbeOutcome, reporting: &'r ErrorReporting) -> Self {
    Self {
      errors: outcome.into_errors(),
      reporting,
    }
  }

  fn fail(&self, err: AssertionError) -> Result<(), AssertionError> {
    self.reporting.suppress_stack_traces();
    Err(err)
  }

  /// Passes if the probe reported no errors; otherwise fails with the first.
  pub fn expect_to_compile(&self) -> Result<(), AssertionError> {
    match self.errors.first() {
      None => Ok(()),
      Some(first) => self.fail(AssertionError::DidNotCompile(first.clone())),
    }
  }

  pub fn expect_to_fail(&self) -> Result<(), AssertionError> {
    if self.errors.is_empty() {
      return self.fail(AssertionError::NoFailures);
    }
    Ok(())
  }

  /// Passes if any error's message matches `pattern`, a regular expression.
  /// Use an inline flag such as `(?i)` for case-insensitive matching.
  pub fn expect_to_fail_with(&self, pattern: &str) -> Result<(), AssertionError> {
    match Regex::new(pattern) {
      Ok(re) => self.expect_to_fail_matching(&re),
      Err(source) => self.fail(AssertionError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
      }),
    }
  }

  pub fn expect_to_fail_matching(&self, pattern: &Regex) -> Result<(), AssertionError> {
    let Some(first) = self.errors.first() else {
      return self.fail(AssertionError::NoMatchingFailures {
        pattern: pattern.to_string(),
      });
    };
    if self.errors.iter().any(|error| pattern.is_match(error.message())) {
      return Ok(());
    }
    self.fail(AssertionError::Mismatch {
      pattern: pattern.to_string(),
      actual: first.clone(),
    })
  }
}

/// Runs a rewritten probe and wraps what it reported for assertions.
pub fn probe<'r>(func: &Node<Func>, reporting: &'r ErrorReporting) -> Result<ProbeResult<'r>, EvalError> {
  let outcome = evaluate_probe(func, reporting)?;
  Ok(ProbeResult::new(outcome, reporting))
}
