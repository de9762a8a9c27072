use ahash::HashMap;
use ahash::HashMapExt;
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
  Left,
  Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum OperatorName {
  Addition,
  Assignment,
  AssignmentAddition,
  AssignmentSubtraction,
  Await,
  Comma,
  Division,
  Equality,
  Exponentiation,
  GreaterThan,
  GreaterThanOrEqual,
  In,
  Inequality,
  Instanceof,
  LessThan,
  LessThanOrEqual,
  LogicalAnd,
  LogicalNot,
  LogicalOr,
  Multiplication,
  New,
  NullishCoalescing,
  PostfixDecrement,
  PostfixIncrement,
  PrefixDecrement,
  PrefixIncrement,
  Remainder,
  StrictEquality,
  StrictInequality,
  Subtraction,
  Typeof,
  UnaryNegation,
  UnaryPlus,
  Void,
}

#[derive(Clone, Copy, Debug)]
pub struct Operator {
  pub name: OperatorName,
  pub precedence: u8,
  pub associativity: Associativity,
  pub token: &'static str,
}

pub const ASSIGNMENT_PRECEDENCE: u8 = 2;
pub const UNARY_PRECEDENCE: u8 = 14;
pub const POSTFIX_PRECEDENCE: u8 = 15;
pub const NEW_PRECEDENCE: u8 = 16;
pub const CALL_MEMBER_PRECEDENCE: u8 = 17;
pub const PRIMARY_PRECEDENCE: u8 = CALL_MEMBER_PRECEDENCE + 1;

pub static OPERATORS: Lazy<HashMap<OperatorName, Operator>> = Lazy::new(|| {
  use Associativity::*;
  use OperatorName::*;

  let table: [(OperatorName, u8, Associativity, &'static str); 34] = [
    (Comma, 1, Left, ","),
    (Assignment, ASSIGNMENT_PRECEDENCE, Right, "="),
    (AssignmentAddition, ASSIGNMENT_PRECEDENCE, Right, "+="),
    (AssignmentSubtraction, ASSIGNMENT_PRECEDENCE, Right, "-="),
    (LogicalOr, 3, Left, "||"),
    (NullishCoalescing, 3, Left, "??"),
    (LogicalAnd, 4, Left, "&&"),
    (Equality, 8, Left, "=="),
    (Inequality, 8, Left, "!="),
    (StrictEquality, 8, Left, "==="),
    (StrictInequality, 8, Left, "!=="),
    (LessThan, 9, Left, "<"),
    (LessThanOrEqual, 9, Left, "<="),
    (GreaterThan, 9, Left, ">"),
    (GreaterThanOrEqual, 9, Left, ">="),
    (In, 9, Left, "in"),
    (Instanceof, 9, Left, "instanceof"),
    (Addition, 11, Left, "+"),
    (Subtraction, 11, Left, "-"),
    (Multiplication, 12, Left, "*"),
    (Division, 12, Left, "/"),
    (Remainder, 12, Left, "%"),
    (Exponentiation, 13, Right, "**"),
    (Await, UNARY_PRECEDENCE, Right, "await"),
    (LogicalNot, UNARY_PRECEDENCE, Right, "!"),
    (PrefixDecrement, UNARY_PRECEDENCE, Right, "--"),
    (PrefixIncrement, UNARY_PRECEDENCE, Right, "++"),
    (Typeof, UNARY_PRECEDENCE, Right, "typeof"),
    (UnaryNegation, UNARY_PRECEDENCE, Right, "-"),
    (UnaryPlus, UNARY_PRECEDENCE, Right, "+"),
    (Void, UNARY_PRECEDENCE, Right, "void"),
    (PostfixDecrement, POSTFIX_PRECEDENCE, Left, "--"),
    (PostfixIncrement, POSTFIX_PRECEDENCE, Left, "++"),
    (New, NEW_PRECEDENCE, Right, "new"),
  ];

  let mut map = HashMap::with_capacity(table.len());
  for (name, precedence, associativity, token) in table {
    map.insert(name, Operator {
      name,
      precedence,
      associativity,
      token,
    });
  }
  map
});

impl OperatorName {
  pub fn operator(self) -> &'static Operator {
    // Every variant has a table entry.
    &OPERATORS[&self]
  }

  /// Whether the token is a word and therefore needs keyword spacing.
  pub fn is_keyword(self) -> bool {
    self
      .operator()
      .token
      .bytes()
      .all(|b| b.is_ascii_alphabetic())
  }
}
