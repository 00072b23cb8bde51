//! Abstract syntax tree produced by the parser and consumed by the compiler.

pub mod expr;
pub mod stmt;

pub use expr::{BinaryOp, Expr, ExprKind, LogicalOp, UnaryOp};
pub use stmt::{ClassDecl, FunctionDecl, Parameter, Program, Stmt, StmtKind};
