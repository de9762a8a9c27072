use derive_visitor::{Drive, Visitor};

use crate::ast::expr::{CallArg, CallExpr, Expr};
use crate::ast::func::Func;
use crate::ast::node::Node;
use crate::ast::stx::TopLevel;
use crate::config::ProbeOptions;
use crate::correlate::SourceRegion;
use crate::loc::Loc;

type CallExprNode = Node<CallExpr>;

/// The single argument of `marker(arg)`, if the call has that shape.
fn marker_arg<'a>(call: &'a CallExpr, marker: &str) -> Option<&'a Node<CallArg>> {
  let Expr::Id(callee) = call.callee.stx.as_ref() else {
    return None;
  };
  if callee.stx.name != marker {
    return None;
  }
  let [arg] = call.arguments.as_slice() else {
    return None;
  };
  (!arg.stx.spread).then_some(arg)
}

/// The function literal probed by `call`, if `call` is a marker call.
///
/// Only the call's shape decides: the callee must be the bare marker name and
/// the sole argument a `function` or arrow literal. The literal's parameters,
/// `async`, and generator flags are not consulted.
pub fn probe_func<'a>(call: &'a CallExpr, marker: &str) -> Option<&'a Node<Func>> {
  match marker_arg(call, marker)?.stx.value.stx.as_ref() {
    Expr::ArrowFunc(arrow) => Some(&arrow.stx.func),
    Expr::Func(func) => Some(&func.stx.func),
    _ => None,
  }
}

pub fn probe_func_mut<'a>(call: &'a mut CallExpr, marker: &str) -> Option<&'a mut Node<Func>> {
  marker_arg(call, marker)?;
  match call.arguments[0].stx.value.stx.as_mut() {
    Expr::ArrowFunc(arrow) => Some(&mut arrow.stx.func),
    Expr::Func(func) => Some(&mut func.stx.func),
    _ => None,
  }
}

pub fn is_marker_call(expr: &Expr, marker: &str) -> bool {
  match expr {
    Expr::Call(call) => probe_func(&call.stx, marker).is_some(),
    _ => false,
  }
}

/// A marker call found in a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeSite {
  /// Span of the whole marker call.
  pub call: Loc,
  /// Span of the probed function's body.
  pub region: SourceRegion,
  /// Parameters the probed function declares. Zero for a well-formed probe,
  /// but probes are rewritten regardless.
  pub parameters: usize,
}

#[derive(Visitor)]
#[visitor(CallExprNode(enter))]
struct ProbeCollector<'a> {
  marker: &'a str,
  sites: Vec<ProbeSite>,
}

impl ProbeCollector<'_> {
  fn enter_call_expr_node(&mut self, node: &CallExprNode) {
    if let Some(func) = probe_func(&node.stx, self.marker) {
      self.sites.push(ProbeSite {
        call: node.loc,
        region: SourceRegion::of_body(&func.stx.body),
        parameters: func.stx.parameters.len(),
      });
    }
  }
}

/// Every marker call in `top`, outermost first, in document order.
pub fn find_probes(top: &Node<TopLevel>, options: &ProbeOptions) -> Vec<ProbeSite> {
  let mut collector = ProbeCollector {
    marker: &options.marker,
    sites: Vec::new(),
  };
  top.drive(&mut collector);
  collector.sites
}
