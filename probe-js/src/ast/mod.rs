pub mod build;
pub mod expr;
pub mod func;
pub mod node;
pub mod pat;
pub mod stmt;
pub mod stx;
pub mod type_expr;
