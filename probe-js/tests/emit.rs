mod common;

use common::emit;
use probe_js::ast::build::*;
use probe_js::ast::expr::{CondExpr, Expr, UnaryExpr, UnaryPostfixExpr};
use probe_js::ast::func::Func;
use probe_js::ast::node::Node;
use probe_js::ast::pat::IdPat;
use probe_js::ast::stmt::*;
use probe_js::ast::type_expr::{TypeArray, TypeExpr, TypeKeyword, TypeKeywordExpr, TypeReference};
use probe_js::emit::EmitError;
use probe_js::emit_top_level;
use probe_js::loc::Loc;
use probe_js::operator::OperatorName;

const L: Loc = Loc(0, 0);

fn keyword(keyword: TypeKeyword) -> Node<TypeExpr> {
  node(L, TypeExpr::Keyword(node(L, TypeKeywordExpr { keyword })))
}

fn var_decl(mode: VarDeclMode, name: &str, type_annotation: Option<Node<TypeExpr>>, initializer: Option<Node<Expr>>) -> Node<Stmt> {
  node(L, Stmt::VarDecl(node(L, VarDecl {
    export: false,
    mode,
    declarators: vec![VarDeclarator {
      pattern: node(L, IdPat { name: name.to_string() }),
      type_annotation,
      initializer,
    }],
  })))
}

fn unary(operator: OperatorName, argument: Node<Expr>) -> Node<Expr> {
  node(L, Expr::Unary(node(L, UnaryExpr { operator, argument })))
}

#[test]
fn emits_typed_declarations() {
  let numbers = node(L, TypeExpr::Array(node(L, TypeArray {
    element: keyword(TypeKeyword::Number),
  })));
  let promise = node(L, TypeExpr::Reference(node(L, TypeReference {
    name: "Promise".to_string(),
    type_arguments: vec![keyword(TypeKeyword::String)],
  })));
  let top = top_level(vec![
    var_decl(VarDeclMode::Const, "x", Some(keyword(TypeKeyword::Number)), Some(lit_str(L, "a"))),
    var_decl(VarDeclMode::Let, "xs", Some(numbers), None),
    var_decl(VarDeclMode::Var, "p", Some(promise), Some(id(L, "q"))),
  ]);
  assert_eq!(
    emit(&top),
    r#"const x:number="a";let xs:number[];var p:Promise<string>=q;"#
  );
}

#[test]
fn emits_control_flow() {
  let l = L;
  let body = |stmt: Node<Stmt>| node(l, Stmt::Block(node(l, BlockStmt { body: vec![stmt] })));
  let top = top_level(vec![
    node(l, Stmt::If(node(l, IfStmt {
      test: id(l, "a"),
      consequent: expr_stmt(call(l, id(l, "f"), Vec::new())),
      alternate: Some(return_stmt(l, None)),
    }))),
    node(l, Stmt::While(node(l, WhileStmt {
      condition: lit_bool(l, true),
      body: body(node(l, Stmt::Break(node(l, BreakStmt { label: None })))),
    }))),
    node(l, Stmt::DoWhile(node(l, DoWhileStmt {
      condition: id(l, "more"),
      body: node(l, Stmt::Continue(node(l, ContinueStmt {
        label: Some("outer".to_string()),
      }))),
    }))),
    node(l, Stmt::Empty(node(l, EmptyStmt {}))),
    node(l, Stmt::Try(node(l, TryStmt {
      wrapped: node(l, BlockStmt {
        body: vec![throw_stmt(l, new_call(l, id(l, "Error"), Vec::new()))],
      }),
      catch: Some(node(l, CatchBlock {
        parameter: Some(node(l, IdPat { name: "e".to_string() })),
        body: Vec::new(),
      })),
      finally: Some(node(l, BlockStmt { body: Vec::new() })),
    }))),
  ]);
  assert_eq!(
    emit(&top),
    "if(a){f();}else{return;}while(true){break;}do{continue outer;}while(more);try{throw new Error();}catch(e){}finally{}"
  );
}

fn lit_bool(loc: Loc, value: bool) -> Node<Expr> {
  node(loc, Expr::LitBool(node(loc, probe_js::ast::expr::LitBoolExpr { value })))
}

#[test]
fn emits_function_declarations() {
  let decl = node(L, Stmt::FunctionDecl(node(L, FuncDecl {
    export: true,
    name: Some(node(L, probe_js::ast::pat::ClassOrFuncName {
      name: "check".to_string(),
    })),
    func: node(L, Func {
      arrow: false,
      async_: false,
      generator: false,
      parameters: vec![param(L, "a"), param(L, "b")],
      return_type: None,
      body: block_body(L, vec![return_stmt(
        L,
        Some(binary(L, OperatorName::Addition, id(L, "a"), id(L, "b"))),
      )]),
    }),
  })));
  assert_eq!(emit(&top_level(vec![decl])), "export function check(a,b){return a+b;}");
}

#[test]
fn spaces_only_where_tokens_would_merge() {
  let top = top_level(vec![
    expr_stmt(binary(L, OperatorName::Subtraction, id(L, "a"), unary(OperatorName::UnaryNegation, id(L, "b")))),
    expr_stmt(binary(L, OperatorName::Addition, id(L, "a"), unary(OperatorName::PrefixIncrement, id(L, "b")))),
    expr_stmt(unary(OperatorName::Typeof, id(L, "x"))),
    expr_stmt(unary(OperatorName::LogicalNot, unary(OperatorName::Void, lit_num(L, 0.0)))),
    expr_stmt(binary(L, OperatorName::In, lit_str(L, "k"), id(L, "o"))),
    expr_stmt(node(L, Expr::UnaryPostfix(node(L, UnaryPostfixExpr {
      operator: OperatorName::PostfixIncrement,
      argument: id(L, "i"),
    })))),
  ]);
  assert_eq!(emit(&top), r#"a- -b;a+ ++b;typeof x;!void 0;"k"in o;i++;"#);
}

#[test]
fn parenthesizes_nested_conditionals_and_exponents() {
  let cond = |test, consequent, alternate| {
    node(L, Expr::Cond(node(L, CondExpr {
      test,
      consequent,
      alternate,
    })))
  };
  let nested = cond(cond(id(L, "a"), id(L, "b"), id(L, "c")), id(L, "d"), id(L, "e"));
  let power = binary(
    L,
    OperatorName::Exponentiation,
    unary(OperatorName::UnaryNegation, id(L, "x")),
    lit_num(L, 2.0),
  );
  let top = top_level(vec![expr_stmt(nested), expr_stmt(power)]);
  assert_eq!(emit(&top), "(a?b:c)?d:e;(-x)**2;");
}

#[test]
fn escapes_diagnostic_messages() {
  let top = top_level(vec![expr_stmt(new_call(L, id(L, "Error"), vec![arg(lit_str(
    L,
    "Property \"x\" does not exist on type '{}'.\n",
  ))]))]);
  assert_eq!(
    emit(&top),
    r#"new Error("Property \"x\" does not exist on type '{}'.\n");"#
  );
}

#[test]
fn unrepresentable_trees_are_errors() {
  let no_handler = top_level(vec![node(L, Stmt::Try(node(L, TryStmt {
    wrapped: node(L, BlockStmt { body: Vec::new() }),
    catch: None,
    finally: None,
  })))]);
  assert!(matches!(
    emit_top_level(&no_handler),
    Err(EmitError::Unrepresentable { .. })
  ));

  let expression_function = top_level(vec![expr_stmt(func_expr(L, None, Vec::new(), expr_body(id(L, "x"))))]);
  assert!(emit_top_level(&expression_function).is_err());
}

#[test]
fn mixed_nullish_and_logical_operands_are_parenthesized() {
  let or = binary(L, OperatorName::LogicalOr, id(L, "a"), id(L, "b"));
  let nullish = binary(L, OperatorName::NullishCoalescing, id(L, "c"), id(L, "d"));
  let top = top_level(vec![
    expr_stmt(binary(L, OperatorName::NullishCoalescing, or, id(L, "c"))),
    expr_stmt(binary(L, OperatorName::LogicalOr, nullish, id(L, "e"))),
  ]);
  assert_eq!(emit(&top), "(a||b)??c;(c??d)||e;");
}

#[test]
fn new_with_a_call_in_the_callee_chain() {
  let callee = member(L, call(L, id(L, "f"), Vec::new()), "g");
  let top = top_level(vec![expr_stmt(new_call(L, callee, Vec::new()))]);
  assert_eq!(emit(&top), "new(f().g)();");
}

#[test]
fn html_comment_openers_are_split() {
  let opener = binary(
    L,
    OperatorName::LessThan,
    id(L, "a"),
    unary(OperatorName::LogicalNot, unary(OperatorName::PrefixDecrement, id(L, "b"))),
  );
  let closer = binary(
    L,
    OperatorName::GreaterThan,
    node(L, Expr::UnaryPostfix(node(L, UnaryPostfixExpr {
      operator: OperatorName::PostfixDecrement,
      argument: id(L, "i"),
    }))),
    id(L, "j"),
  );
  let top = top_level(vec![expr_stmt(opener), expr_stmt(closer)]);
  assert_eq!(emit(&top), "a<! --b;i-- >j;");
}
