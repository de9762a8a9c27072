//! Constructors for trees that never came from a parser: the bodies the pass
//! synthesizes, and the trees hosts (and tests) hand to it.

use derive_visitor::{Drive, DriveMut};

use super::expr::*;
use super::func::{Func, FuncBody};
use super::node::Node;
use super::pat::{ClassOrFuncName, IdPat, ParamDecl};
use super::stmt::{ExprStmt, ReturnStmt, Stmt, ThrowStmt};
use super::stx::TopLevel;
use crate::loc::Loc;
use crate::operator::OperatorName;

pub fn node<T: Drive + DriveMut>(loc: Loc, stx: T) -> Node<T> {
  Node::new(loc, stx)
}

pub fn id(loc: Loc, name: &str) -> Node<Expr> {
  node(loc, Expr::Id(node(loc, IdExpr {
    name: name.to_string(),
  })))
}

pub fn member(loc: Loc, left: Node<Expr>, right: &str) -> Node<Expr> {
  node(loc, Expr::Member(node(loc, MemberExpr {
    optional_chaining: false,
    left,
    right: right.to_string(),
  })))
}

pub fn computed_member(loc: Loc, object: Node<Expr>, member: Node<Expr>) -> Node<Expr> {
  node(loc, Expr::ComputedMember(node(loc, ComputedMemberExpr {
    optional_chaining: false,
    object,
    member,
  })))
}

pub fn binary(loc: Loc, operator: OperatorName, left: Node<Expr>, right: Node<Expr>) -> Node<Expr> {
  node(loc, Expr::Binary(node(loc, BinaryExpr {
    operator,
    left,
    right,
  })))
}

pub fn assign(loc: Loc, left: Node<Expr>, right: Node<Expr>) -> Node<Expr> {
  binary(loc, OperatorName::Assignment, left, right)
}

pub fn arg(value: Node<Expr>) -> Node<CallArg> {
  value.wrap(|value| CallArg {
    spread: false,
    value,
  })
}

pub fn spread_arg(value: Node<Expr>) -> Node<CallArg> {
  value.wrap(|value| CallArg {
    spread: true,
    value,
  })
}

pub fn call(loc: Loc, callee: Node<Expr>, arguments: Vec<Node<CallArg>>) -> Node<Expr> {
  node(loc, Expr::Call(node(loc, CallExpr {
    optional_chaining: false,
    callee,
    arguments,
  })))
}

/// `new callee(arguments)`.
pub fn new_call(loc: Loc, callee: Node<Expr>, arguments: Vec<Node<CallArg>>) -> Node<Expr> {
  node(loc, Expr::Unary(node(loc, UnaryExpr {
    operator: OperatorName::New,
    argument: call(loc, callee, arguments),
  })))
}

pub fn lit_arr(loc: Loc, elements: Vec<Node<Expr>>) -> Node<Expr> {
  node(loc, Expr::LitArr(node(loc, LitArrExpr {
    elements: elements.into_iter().map(LitArrElem::Single).collect(),
  })))
}

pub fn lit_num(loc: Loc, value: f64) -> Node<Expr> {
  node(loc, Expr::LitNum(node(loc, LitNumExpr { value })))
}

pub fn lit_str(loc: Loc, value: &str) -> Node<Expr> {
  node(loc, Expr::LitStr(node(loc, LitStrExpr {
    value: value.to_string(),
  })))
}

pub fn expr_stmt(expr: Node<Expr>) -> Node<Stmt> {
  expr.wrap(|expr| ExprStmt { expr }).wrap(Stmt::Expr)
}

pub fn return_stmt(loc: Loc, value: Option<Node<Expr>>) -> Node<Stmt> {
  node(loc, Stmt::Return(node(loc, ReturnStmt { value })))
}

pub fn throw_stmt(loc: Loc, value: Node<Expr>) -> Node<Stmt> {
  node(loc, Stmt::Throw(node(loc, ThrowStmt { value })))
}

pub fn param(loc: Loc, name: &str) -> Node<ParamDecl> {
  node(loc, ParamDecl {
    rest: false,
    pattern: node(loc, IdPat {
      name: name.to_string(),
    }),
    type_annotation: None,
    default_value: None,
  })
}

pub fn block_body(loc: Loc, stmts: Vec<Node<Stmt>>) -> Node<FuncBody> {
  node(loc, FuncBody::Block(stmts))
}

pub fn expr_body(expr: Node<Expr>) -> Node<FuncBody> {
  expr.wrap(FuncBody::Expression)
}

/// An arrow function spanning `loc` whose body is `body`.
pub fn arrow_func(loc: Loc, parameters: Vec<Node<ParamDecl>>, body: Node<FuncBody>) -> Node<Expr> {
  let func = node(loc, Func {
    arrow: true,
    async_: false,
    generator: false,
    parameters,
    return_type: None,
    body,
  });
  node(loc, Expr::ArrowFunc(node(loc, ArrowFuncExpr { func })))
}

/// A `function` expression spanning `loc` whose body is `body`.
pub fn func_expr(
  loc: Loc,
  name: Option<&str>,
  parameters: Vec<Node<ParamDecl>>,
  body: Node<FuncBody>,
) -> Node<Expr> {
  let func = node(loc, Func {
    arrow: false,
    async_: false,
    generator: false,
    parameters,
    return_type: None,
    body,
  });
  let name = name.map(|name| {
    node(loc, ClassOrFuncName {
      name: name.to_string(),
    })
  });
  node(loc, Expr::Func(node(loc, FuncExpr { name, func })))
}

/// A top level whose span covers every statement in `body`.
pub fn top_level(body: Vec<Node<Stmt>>) -> Node<TopLevel> {
  let loc = body
    .iter()
    .fold(Loc(0, 0), |acc, stmt| Loc(acc.0, acc.1.max(stmt.loc.1)));
  node(loc, TopLevel { body })
}
