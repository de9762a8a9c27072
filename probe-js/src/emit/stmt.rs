use super::expr::{emit_expr, starts_with_function};
use super::{unrepresentable, EmitResult, Emitter};
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::pat::ParamDecl;
use crate::ast::stmt::*;
use crate::ast::stx::TopLevel;
use crate::ast::type_expr::TypeExpr;
use crate::operator::ASSIGNMENT_PRECEDENCE;

fn is_empty_stmt(stmt: &Node<Stmt>) -> bool {
  matches!(stmt.stx.as_ref(), Stmt::Empty(_))
}

fn emit_stmts(out: &mut Emitter, stmts: &[Node<Stmt>]) -> EmitResult {
  for stmt in stmts.iter().filter(|stmt| !is_empty_stmt(stmt)) {
    emit_stmt(out, stmt)?;
  }
  Ok(())
}

pub fn emit_top_level_stmts(out: &mut Emitter, top: &Node<TopLevel>) -> EmitResult {
  emit_stmts(out, &top.stx.body)
}

pub fn emit_stmt(out: &mut Emitter, stmt: &Node<Stmt>) -> EmitResult {
  match stmt.stx.as_ref() {
    Stmt::Block(block) => emit_block(out, block),
    Stmt::Break(brk) => {
      emit_jump(out, "break", brk.stx.label.as_deref());
      Ok(())
    }
    Stmt::Continue(cont) => {
      emit_jump(out, "continue", cont.stx.label.as_deref());
      Ok(())
    }
    Stmt::DoWhile(do_while) => {
      out.write_keyword("do");
      emit_stmt_as_block(out, &do_while.stx.body)?;
      out.write_keyword("while");
      out.write_punct("(");
      emit_expr(out, &do_while.stx.condition, 1)?;
      out.write_punct(")");
      out.write_punct(";");
      Ok(())
    }
    Stmt::Empty(_) => Ok(()),
    Stmt::Expr(expr_stmt) => emit_expr_stmt(out, expr_stmt),
    Stmt::If(if_stmt) => {
      out.write_keyword("if");
      out.write_punct("(");
      emit_expr(out, &if_stmt.stx.test, 1)?;
      out.write_punct(")");
      emit_stmt_as_block(out, &if_stmt.stx.consequent)?;
      if let Some(alternate) = &if_stmt.stx.alternate {
        out.write_keyword("else");
        emit_stmt_as_block(out, alternate)?;
      }
      Ok(())
    }
    Stmt::Return(ret) => {
      out.write_keyword("return");
      if let Some(value) = &ret.stx.value {
        emit_expr(out, value, 1)?;
      }
      out.write_punct(";");
      Ok(())
    }
    Stmt::Throw(throw) => {
      out.write_keyword("throw");
      emit_expr(out, &throw.stx.value, 1)?;
      out.write_punct(";");
      Ok(())
    }
    Stmt::Try(try_stmt) => emit_try(out, try_stmt),
    Stmt::While(while_stmt) => {
      out.write_keyword("while");
      out.write_punct("(");
      emit_expr(out, &while_stmt.stx.condition, 1)?;
      out.write_punct(")");
      emit_stmt_as_block(out, &while_stmt.stx.body)
    }
    Stmt::FunctionDecl(decl) => emit_func_decl(out, decl),
    Stmt::VarDecl(decl) => emit_var_decl(out, decl),
  }
}

fn emit_block(out: &mut Emitter, block: &Node<BlockStmt>) -> EmitResult {
  out.write_punct("{");
  emit_stmts(out, &block.stx.body)?;
  out.write_punct("}");
  Ok(())
}

fn emit_stmt_as_block(out: &mut Emitter, stmt: &Node<Stmt>) -> EmitResult {
  match stmt.stx.as_ref() {
    Stmt::Block(block) => emit_block(out, block),
    _ => {
      out.write_punct("{");
      emit_stmt(out, stmt)?;
      out.write_punct("}");
      Ok(())
    }
  }
}

fn emit_jump(out: &mut Emitter, keyword: &str, label: Option<&str>) {
  out.write_keyword(keyword);
  if let Some(label) = label {
    out.write_identifier(label);
  }
  out.write_punct(";");
}

fn emit_expr_stmt(out: &mut Emitter, expr_stmt: &Node<ExprStmt>) -> EmitResult {
  let expr = &expr_stmt.stx.expr;
  if starts_with_function(expr, 1) {
    out.write_punct("(");
    emit_expr(out, expr, 1)?;
    out.write_punct(")");
  } else {
    emit_expr(out, expr, 1)?;
  }
  out.write_punct(";");
  Ok(())
}

fn emit_try(out: &mut Emitter, try_stmt: &Node<TryStmt>) -> EmitResult {
  if try_stmt.stx.catch.is_none() && try_stmt.stx.finally.is_none() {
    return Err(unrepresentable("try statement without catch or finally", try_stmt.loc));
  }
  out.write_keyword("try");
  emit_block(out, &try_stmt.stx.wrapped)?;
  if let Some(catch) = &try_stmt.stx.catch {
    out.write_keyword("catch");
    if let Some(parameter) = &catch.stx.parameter {
      out.write_punct("(");
      out.write_identifier(&parameter.stx.name);
      out.write_punct(")");
    }
    out.write_punct("{");
    emit_stmts(out, &catch.stx.body)?;
    out.write_punct("}");
  }
  if let Some(finally) = &try_stmt.stx.finally {
    out.write_keyword("finally");
    emit_block(out, finally)?;
  }
  Ok(())
}

fn emit_func_decl(out: &mut Emitter, decl: &Node<FuncDecl>) -> EmitResult {
  let Some(name) = &decl.stx.name else {
    return Err(unrepresentable("function declaration without a name", decl.loc));
  };
  let func = decl.stx.func.stx.as_ref();
  let FuncBody::Block(body) = func.body.stx.as_ref() else {
    return Err(unrepresentable("function declaration with an expression body", decl.loc));
  };
  if decl.stx.export {
    out.write_keyword("export");
  }
  if func.async_ {
    out.write_keyword("async");
  }
  out.write_keyword("function");
  if func.generator {
    out.write_punct("*");
  }
  out.write_identifier(&name.stx.name);
  emit_params(out, &func.parameters)?;
  if let Some(return_type) = &func.return_type {
    emit_type_annotation(out, return_type);
  }
  emit_func_body_block(out, body)
}

fn emit_var_decl(out: &mut Emitter, decl: &Node<VarDecl>) -> EmitResult {
  if decl.stx.declarators.is_empty() {
    return Err(unrepresentable("variable declaration without declarators", decl.loc));
  }
  if decl.stx.export {
    out.write_keyword("export");
  }
  out.write_keyword(match decl.stx.mode {
    VarDeclMode::Const => "const",
    VarDeclMode::Let => "let",
    VarDeclMode::Var => "var",
  });
  for (idx, declarator) in decl.stx.declarators.iter().enumerate() {
    if idx > 0 {
      out.write_punct(",");
    }
    out.write_identifier(&declarator.pattern.stx.name);
    if let Some(type_annotation) = &declarator.type_annotation {
      emit_type_annotation(out, type_annotation);
    }
    if let Some(initializer) = &declarator.initializer {
      out.write_punct("=");
      emit_expr(out, initializer, ASSIGNMENT_PRECEDENCE)?;
    }
  }
  out.write_punct(";");
  Ok(())
}

pub(super) fn emit_func_body_block(out: &mut Emitter, body: &[Node<Stmt>]) -> EmitResult {
  out.write_punct("{");
  emit_stmts(out, body)?;
  out.write_punct("}");
  Ok(())
}

pub(super) fn emit_params(out: &mut Emitter, parameters: &[Node<ParamDecl>]) -> EmitResult {
  out.write_punct("(");
  for (idx, param) in parameters.iter().enumerate() {
    if idx > 0 {
      out.write_punct(",");
    }
    let decl = param.stx.as_ref();
    if decl.rest {
      if decl.default_value.is_some() {
        return Err(unrepresentable("rest parameter with a default value", param.loc));
      }
      out.write_punct("...");
    }
    out.write_identifier(&decl.pattern.stx.name);
    if let Some(type_annotation) = &decl.type_annotation {
      emit_type_annotation(out, type_annotation);
    }
    if let Some(default_value) = &decl.default_value {
      out.write_punct("=");
      emit_expr(out, default_value, ASSIGNMENT_PRECEDENCE)?;
    }
  }
  out.write_punct(")");
  Ok(())
}

pub(super) fn emit_type_annotation(out: &mut Emitter, ty: &Node<TypeExpr>) {
  out.write_punct(":");
  emit_type(out, ty);
}

fn emit_type(out: &mut Emitter, ty: &Node<TypeExpr>) {
  match ty.stx.as_ref() {
    TypeExpr::Array(array) => {
      emit_type(out, &array.stx.element);
      out.write_punct("[]");
    }
    TypeExpr::Keyword(keyword) => out.write_keyword(keyword.stx.keyword.as_str()),
    TypeExpr::Reference(reference) => {
      out.write_identifier(&reference.stx.name);
      if !reference.stx.type_arguments.is_empty() {
        out.write_punct("<");
        for (idx, argument) in reference.stx.type_arguments.iter().enumerate() {
          if idx > 0 {
            out.write_punct(",");
          }
          emit_type(out, argument);
        }
        out.write_punct(">");
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::build::*;
  use crate::ast::type_expr::{TypeKeyword, TypeKeywordExpr};
  use crate::loc::Loc;

  const L: Loc = Loc(0, 0);

  fn emitted(stmt: &Node<Stmt>) -> String {
    let mut out = Emitter::new();
    emit_stmt(&mut out, stmt).unwrap();
    String::from_utf8(out.into_bytes()).unwrap()
  }

  #[test]
  fn wraps_function_at_statement_start() {
    let iife = expr_stmt(call(L, func_expr(L, None, Vec::new(), block_body(L, Vec::new())), Vec::new()));
    assert_eq!(emitted(&iife), "(function(){}());");
  }

  #[test]
  fn keeps_parameter_annotations() {
    let mut p = param(L, "x");
    p.stx.type_annotation = Some(node(L, TypeExpr::Keyword(node(L, TypeKeywordExpr {
      keyword: TypeKeyword::Number,
    }))));
    let decl = node(L, Stmt::Expr(node(L, ExprStmt {
      expr: arrow_func(L, vec![p], block_body(L, vec![return_stmt(L, Some(id(L, "x")))])),
    })));
    assert_eq!(emitted(&decl), "(x:number)=>{return x;};");
  }

  #[test]
  fn try_needs_a_handler() {
    let bare = node(L, Stmt::Try(node(L, TryStmt {
      wrapped: node(L, BlockStmt { body: Vec::new() }),
      catch: None,
      finally: None,
    })));
    let mut out = Emitter::new();
    assert!(emit_stmt(&mut out, &bare).is_err());
  }
}
