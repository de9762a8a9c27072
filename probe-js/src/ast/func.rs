use derive_more::derive::From;
use derive_visitor::{Drive, DriveMut};
use serde::Serialize;

use super::expr::Expr;
use super::node::Node;
use super::pat::ParamDecl;
use super::stmt::Stmt;
use super::type_expr::TypeExpr;

// One type for arrow functions, function expressions, and function declarations, so downstream code only has one shape to match on.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct Func {
  #[drive(skip)]
  pub arrow: bool,
  #[drive(skip)]
  pub async_: bool,
  #[drive(skip)]
  pub generator: bool,
  pub parameters: Vec<Node<ParamDecl>>,
  pub return_type: Option<Node<TypeExpr>>,
  // A node of its own so the body's span is known apart from the parameter list.
  pub body: Node<FuncBody>,
}

#[derive(Debug, Drive, DriveMut, From, Serialize)]
pub enum FuncBody {
  Block(Vec<Node<Stmt>>),
  // If arrow function.
  Expression(Node<Expr>),
}
