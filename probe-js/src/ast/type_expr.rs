use derive_more::derive::From;
use derive_visitor::{Drive, DriveMut};
use serde::Serialize;

use super::node::Node;

/// The TypeScript annotations a probe body can carry. They are only ever
/// re-emitted; nothing here is interpreted.
#[derive(Debug, Drive, DriveMut, From, Serialize)]
#[serde(tag = "$t")]
pub enum TypeExpr {
  Array(Node<TypeArray>),
  Keyword(Node<TypeKeywordExpr>),
  Reference(Node<TypeReference>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TypeKeyword {
  Any,
  Boolean,
  Never,
  Null,
  Number,
  String,
  Undefined,
  Unknown,
  Void,
}

impl TypeKeyword {
  pub fn as_str(self) -> &'static str {
    match self {
      TypeKeyword::Any => "any",
      TypeKeyword::Boolean => "boolean",
      TypeKeyword::Never => "never",
      TypeKeyword::Null => "null",
      TypeKeyword::Number => "number",
      TypeKeyword::String => "string",
      TypeKeyword::Undefined => "undefined",
      TypeKeyword::Unknown => "unknown",
      TypeKeyword::Void => "void",
    }
  }
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeArray {
  pub element: Node<TypeExpr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeKeywordExpr {
  #[drive(skip)]
  pub keyword: TypeKeyword,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeReference {
  #[drive(skip)]
  pub name: String,
  pub type_arguments: Vec<Node<TypeExpr>>,
}
