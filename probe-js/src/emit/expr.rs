use super::stmt::{emit_func_body_block, emit_params, emit_type_annotation};
use super::{unrepresentable, EmitResult, Emitter};
use crate::ast::expr::*;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::operator::Associativity;
use crate::operator::OperatorName;
use crate::operator::ASSIGNMENT_PRECEDENCE;
use crate::operator::CALL_MEMBER_PRECEDENCE;
use crate::operator::POSTFIX_PRECEDENCE;
use crate::operator::PRIMARY_PRECEDENCE;
use crate::operator::UNARY_PRECEDENCE;

/// Emits `expr`, parenthesized if it binds looser than `min_prec`.
pub fn emit_expr(out: &mut Emitter, expr: &Node<Expr>, min_prec: u8) -> EmitResult {
  ExprEmitter { out }.emit_expr_with_min_prec(expr, min_prec)
}

fn expr_precedence(expr: &Node<Expr>) -> u8 {
  match expr.stx.as_ref() {
    Expr::ArrowFunc(_) | Expr::Cond(_) => ASSIGNMENT_PRECEDENCE,
    Expr::Binary(binary) => binary.stx.operator.operator().precedence,
    Expr::Call(_) | Expr::ComputedMember(_) | Expr::Member(_) => CALL_MEMBER_PRECEDENCE,
    Expr::Unary(unary) => unary.stx.operator.operator().precedence,
    Expr::UnaryPostfix(_) => POSTFIX_PRECEDENCE,
    // A negative literal is written with a leading `-`.
    Expr::LitNum(num) if num.stx.value.is_sign_negative() && !num.stx.value.is_nan() => {
      UNARY_PRECEDENCE
    }
    Expr::Func(_)
    | Expr::Id(_)
    | Expr::This(_)
    | Expr::LitArr(_)
    | Expr::LitBool(_)
    | Expr::LitNull(_)
    | Expr::LitNum(_)
    | Expr::LitStr(_) => PRIMARY_PRECEDENCE,
  }
}

fn is_nullish(expr: &Node<Expr>) -> bool {
  matches!(
    expr.stx.as_ref(),
    Expr::Binary(binary) if binary.stx.operator == OperatorName::NullishCoalescing
  )
}

fn is_logical_and_or(expr: &Node<Expr>) -> bool {
  matches!(
    expr.stx.as_ref(),
    Expr::Binary(binary)
      if binary.stx.operator == OperatorName::LogicalAnd
        || binary.stx.operator == OperatorName::LogicalOr
  )
}

/// `??` cannot share an operand with `||` or `&&` without parentheses.
fn mixes_nullish_and_logical(operator: OperatorName, operand: &Node<Expr>) -> bool {
  match operator {
    OperatorName::NullishCoalescing => is_logical_and_or(operand),
    OperatorName::LogicalAnd | OperatorName::LogicalOr => is_nullish(operand),
    _ => false,
  }
}

fn binary_left_min_prec(binary: &Node<BinaryExpr>) -> u8 {
  let operator = binary.stx.operator;
  if mixes_nullish_and_logical(operator, &binary.stx.left) {
    return PRIMARY_PRECEDENCE;
  }
  // `-a ** b` is a syntax error, so unary bases are always parenthesized.
  if operator == OperatorName::Exponentiation {
    return POSTFIX_PRECEDENCE;
  }
  let op = operator.operator();
  match op.associativity {
    Associativity::Left => op.precedence,
    Associativity::Right => op.precedence + 1,
  }
}

fn binary_right_min_prec(binary: &Node<BinaryExpr>) -> u8 {
  let operator = binary.stx.operator;
  if mixes_nullish_and_logical(operator, &binary.stx.right) {
    return PRIMARY_PRECEDENCE;
  }
  let op = operator.operator();
  match op.associativity {
    Associativity::Left => op.precedence + 1,
    Associativity::Right => op.precedence,
  }
}

/// Whether a call appears anywhere along `expr`'s member chain. Under `new`,
/// such a callee would lend its argument list to the constructor.
fn has_call_in_member_chain(expr: &Node<Expr>) -> bool {
  match expr.stx.as_ref() {
    Expr::Call(_) => true,
    Expr::Member(member) => has_call_in_member_chain(&member.stx.left),
    Expr::ComputedMember(member) => has_call_in_member_chain(&member.stx.object),
    _ => false,
  }
}

fn render_number(value: f64) -> String {
  if value.is_nan() {
    "NaN".to_string()
  } else if value.is_infinite() {
    let rendered = if value < 0.0 { "-Infinity" } else { "Infinity" };
    rendered.to_string()
  } else if value == 0.0 {
    // `-0` and `0` are written the same; the sign only matters to `Object.is`.
    "0".to_string()
  } else {
    value.to_string()
  }
}

fn requires_trailing_dot(rendered: &str) -> bool {
  rendered.bytes().all(|b| b.is_ascii_digit())
}

struct ExprEmitter<'a> {
  out: &'a mut Emitter,
}

impl ExprEmitter<'_> {
  fn emit_expr_with_min_prec(&mut self, expr: &Node<Expr>, min_prec: u8) -> EmitResult {
    let needs_parens = expr_precedence(expr) < min_prec;
    if needs_parens {
      self.out.write_punct("(");
    }
    self.emit_expr_no_parens(expr)?;
    if needs_parens {
      self.out.write_punct(")");
    }
    Ok(())
  }

  fn emit_expr_no_parens(&mut self, expr: &Node<Expr>) -> EmitResult {
    match expr.stx.as_ref() {
      Expr::ArrowFunc(arrow) => self.emit_arrow_func(arrow),
      Expr::Binary(binary) => self.emit_binary(binary),
      Expr::Call(call) => self.emit_call(call),
      Expr::ComputedMember(member) => self.emit_computed_member(member),
      Expr::Cond(cond) => self.emit_cond(cond),
      Expr::Func(func) => self.emit_func_expr(func),
      Expr::Id(id) => {
        self.out.write_identifier(&id.stx.name);
        Ok(())
      }
      Expr::Member(member) => self.emit_member(member),
      Expr::This(_) => {
        self.out.write_keyword("this");
        Ok(())
      }
      Expr::Unary(unary) => self.emit_unary(unary),
      Expr::UnaryPostfix(unary) => {
        self.emit_expr_with_min_prec(&unary.stx.argument, CALL_MEMBER_PRECEDENCE)?;
        self.out.write_punct(unary.stx.operator.operator().token);
        Ok(())
      }
      Expr::LitArr(arr) => self.emit_lit_arr(arr),
      Expr::LitBool(lit) => {
        self
          .out
          .write_keyword(if lit.stx.value { "true" } else { "false" });
        Ok(())
      }
      Expr::LitNull(_) => {
        self.out.write_keyword("null");
        Ok(())
      }
      Expr::LitNum(lit) => {
        self.out.write_number(&render_number(lit.stx.value));
        Ok(())
      }
      Expr::LitStr(lit) => {
        self.out.write_string_literal(&lit.stx.value);
        Ok(())
      }
    }
  }

  fn emit_arrow_func(&mut self, arrow: &Node<ArrowFuncExpr>) -> EmitResult {
    let func = arrow.stx.func.stx.as_ref();
    if func.generator {
      return Err(unrepresentable("generator arrow function", arrow.loc));
    }
    if func.async_ {
      self.out.write_keyword("async");
    }
    emit_params(self.out, &func.parameters)?;
    if let Some(return_type) = &func.return_type {
      emit_type_annotation(self.out, return_type);
    }
    self.out.write_punct("=>");
    match func.body.stx.as_ref() {
      FuncBody::Block(body) => emit_func_body_block(self.out, body),
      FuncBody::Expression(expr) => self.emit_expr_with_min_prec(expr, ASSIGNMENT_PRECEDENCE),
    }
  }

  fn emit_func_expr(&mut self, func_expr: &Node<FuncExpr>) -> EmitResult {
    let func = func_expr.stx.func.stx.as_ref();
    let FuncBody::Block(body) = func.body.stx.as_ref() else {
      return Err(unrepresentable("function expression with an expression body", func_expr.loc));
    };
    if func.async_ {
      self.out.write_keyword("async");
    }
    self.out.write_keyword("function");
    if func.generator {
      self.out.write_punct("*");
    }
    if let Some(name) = &func_expr.stx.name {
      self.out.write_identifier(&name.stx.name);
    }
    emit_params(self.out, &func.parameters)?;
    if let Some(return_type) = &func.return_type {
      emit_type_annotation(self.out, return_type);
    }
    emit_func_body_block(self.out, body)
  }

  fn emit_binary(&mut self, binary: &Node<BinaryExpr>) -> EmitResult {
    let op = binary.stx.operator.operator();
    self.emit_expr_with_min_prec(&binary.stx.left, binary_left_min_prec(binary))?;
    if binary.stx.operator.is_keyword() {
      self.out.write_keyword(op.token);
    } else {
      self.out.write_punct(op.token);
    }
    self.emit_expr_with_min_prec(&binary.stx.right, binary_right_min_prec(binary))
  }

  fn emit_args(&mut self, arguments: &[Node<CallArg>]) -> EmitResult {
    self.out.write_punct("(");
    for (idx, arg) in arguments.iter().enumerate() {
      if idx > 0 {
        self.out.write_punct(",");
      }
      if arg.stx.spread {
        self.out.write_punct("...");
      }
      self.emit_expr_with_min_prec(&arg.stx.value, ASSIGNMENT_PRECEDENCE)?;
    }
    self.out.write_punct(")");
    Ok(())
  }

  fn emit_call(&mut self, call: &Node<CallExpr>) -> EmitResult {
    self.emit_expr_with_min_prec(&call.stx.callee, CALL_MEMBER_PRECEDENCE)?;
    if call.stx.optional_chaining {
      self.out.write_punct("?.");
    }
    self.emit_args(&call.stx.arguments)
  }

  fn emit_member_object(&mut self, object: &Node<Expr>) -> EmitResult {
    if let Expr::LitNum(num) = object.stx.as_ref() {
      if expr_precedence(object) == PRIMARY_PRECEDENCE {
        let rendered = render_number(num.stx.value);
        self.out.write_number(&rendered);
        if requires_trailing_dot(&rendered) {
          self.out.write_punct(".");
        }
        return Ok(());
      }
    }
    self.emit_expr_with_min_prec(object, CALL_MEMBER_PRECEDENCE)
  }

  fn emit_member(&mut self, member: &Node<MemberExpr>) -> EmitResult {
    self.emit_member_object(&member.stx.left)?;
    self.out.write_punct(if member.stx.optional_chaining { "?." } else { "." });
    self.out.write_identifier(&member.stx.right);
    Ok(())
  }

  fn emit_computed_member(&mut self, member: &Node<ComputedMemberExpr>) -> EmitResult {
    self.emit_expr_with_min_prec(&member.stx.object, CALL_MEMBER_PRECEDENCE)?;
    if member.stx.optional_chaining {
      self.out.write_punct("?.");
    }
    self.out.write_punct("[");
    self.emit_expr_with_min_prec(&member.stx.member, 1)?;
    self.out.write_punct("]");
    Ok(())
  }

  fn emit_cond(&mut self, cond: &Node<CondExpr>) -> EmitResult {
    self.emit_expr_with_min_prec(&cond.stx.test, ASSIGNMENT_PRECEDENCE + 1)?;
    self.out.write_punct("?");
    self.emit_expr_with_min_prec(&cond.stx.consequent, ASSIGNMENT_PRECEDENCE)?;
    self.out.write_punct(":");
    self.emit_expr_with_min_prec(&cond.stx.alternate, ASSIGNMENT_PRECEDENCE)
  }

  fn emit_unary(&mut self, unary: &Node<UnaryExpr>) -> EmitResult {
    let operator = unary.stx.operator;
    if operator == OperatorName::New {
      return self.emit_new(unary);
    }
    let token = operator.operator().token;
    if operator.is_keyword() {
      self.out.write_keyword(token);
    } else {
      self.out.write_punct(token);
    }
    self.emit_expr_with_min_prec(&unary.stx.argument, UNARY_PRECEDENCE)
  }

  fn emit_new(&mut self, unary: &Node<UnaryExpr>) -> EmitResult {
    self.out.write_keyword("new");
    match unary.stx.argument.stx.as_ref() {
      Expr::Call(call) => {
        if call.stx.optional_chaining {
          return Err(unrepresentable("optional call under `new`", call.loc));
        }
        // `new f().g()` would construct `f` rather than the result of `f().g`.
        self.emit_expr_with_min_prec(&call.stx.callee, new_callee_min_prec(&call.stx.callee))?;
        self.emit_args(&call.stx.arguments)
      }
      _ => self.emit_expr_with_min_prec(&unary.stx.argument, new_callee_min_prec(&unary.stx.argument)),
    }
  }

  fn emit_lit_arr(&mut self, arr: &Node<LitArrExpr>) -> EmitResult {
    self.out.write_punct("[");
    for (idx, elem) in arr.stx.elements.iter().enumerate() {
      if idx > 0 {
        self.out.write_punct(",");
      }
      match elem {
        LitArrElem::Single(value) => self.emit_expr_with_min_prec(value, ASSIGNMENT_PRECEDENCE)?,
        LitArrElem::Rest(value) => {
          self.out.write_punct("...");
          self.emit_expr_with_min_prec(value, ASSIGNMENT_PRECEDENCE)?;
        }
        LitArrElem::Empty => {}
      }
    }
    // A trailing comma is swallowed, so a trailing hole needs one more.
    if matches!(arr.stx.elements.last(), Some(LitArrElem::Empty)) {
      self.out.write_punct(",");
    }
    self.out.write_punct("]");
    Ok(())
  }
}

fn new_callee_min_prec(callee: &Node<Expr>) -> u8 {
  if has_call_in_member_chain(callee) {
    PRIMARY_PRECEDENCE
  } else {
    CALL_MEMBER_PRECEDENCE
  }
}

/// Whether `expr`, written at the start of a statement, would begin with the
/// `function` keyword and so be read as a declaration.
pub(super) fn starts_with_function(expr: &Node<Expr>, min_prec: u8) -> bool {
  if expr_precedence(expr) < min_prec {
    return false;
  }
  match expr.stx.as_ref() {
    Expr::Func(_) => true,
    Expr::Binary(binary) => starts_with_function(&binary.stx.left, binary_left_min_prec(binary)),
    Expr::Call(call) => starts_with_function(&call.stx.callee, CALL_MEMBER_PRECEDENCE),
    Expr::ComputedMember(member) => {
      starts_with_function(&member.stx.object, CALL_MEMBER_PRECEDENCE)
    }
    Expr::Member(member) => starts_with_function(&member.stx.left, CALL_MEMBER_PRECEDENCE),
    Expr::Cond(cond) => starts_with_function(&cond.stx.test, ASSIGNMENT_PRECEDENCE + 1),
    Expr::UnaryPostfix(unary) => {
      starts_with_function(&unary.stx.argument, CALL_MEMBER_PRECEDENCE)
    }
    _ => false,
  }
}
