#![allow(dead_code)]

use probe_js::ast::build::*;
use probe_js::ast::expr::Expr;
use probe_js::ast::func::Func;
use probe_js::ast::node::Node;
use probe_js::ast::stmt::Stmt;
use probe_js::ast::stx::TopLevel;
use probe_js::detect::probe_func;
use probe_js::emit_top_level;
use probe_js::loc::Loc;
use serde_json::Value;

/// `marker(()=>{ undefinedName; })` with the call spanning `span` and the
/// arrow's body spanning `body`.
pub fn probe_expr(marker: &str, span: Loc, body: Loc) -> Node<Expr> {
  let callee = Loc(span.0, span.0 + marker.len());
  let original = expr_stmt(id(body, "undefinedName"));
  let arrow = arrow_func(
    Loc(callee.1 + 1, span.1 - 1),
    Vec::new(),
    block_body(body, vec![original]),
  );
  call(span, id(callee, marker), vec![arg(arrow)])
}

pub fn probe_stmt(marker: &str, span: Loc, body: Loc) -> Node<Stmt> {
  expr_stmt(probe_expr(marker, span, body))
}

pub fn emit(top: &Node<TopLevel>) -> String {
  emit_top_level(top).unwrap()
}

/// The probed functions of every top-level `marker(..)` statement.
pub fn top_level_probes<'a>(top: &'a Node<TopLevel>, marker: &str) -> Vec<&'a Node<Func>> {
  top
    .stx
    .body
    .iter()
    .filter_map(|stmt| match stmt.stx.as_ref() {
      Stmt::Expr(expr_stmt) => match expr_stmt.stx.expr.stx.as_ref() {
        Expr::Call(call) => probe_func(&call.stx, marker),
        _ => None,
      },
      _ => None,
    })
    .collect()
}

/// Serializes a tree for comparison against a JSON snapshot. Nodes serialize
/// their syntax only, so spans never appear.
pub fn snapshot<T: serde::Serialize>(value: &T) -> Value {
  serde_json::to_value(value).expect("serialize value")
}
