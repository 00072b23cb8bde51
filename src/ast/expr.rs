//! Expression AST nodes.

use crate::ast::stmt::{Parameter, Stmt};
use crate::span::Span;

/// An expression in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// All expression variants (spec.md §6 "Expressions").
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    NumberLiteral(f64),
    StringLiteral(String),
    BoolLiteral(bool),
    Null,

    /// Variable reference.
    Variable(String),

    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },

    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
    },

    Logical {
        operator: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Ternary/conditional expression: cond ? then_expr : else_expr
    Ternary {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },

    /// Function call: callee(args)
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },

    /// Member access: obj.field
    Member { object: Box<Expr>, name: String },

    /// Array index: arr[index]
    Index { object: Box<Expr>, index: Box<Expr> },

    /// Assignment to a variable, member, or index target.
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },

    /// Array literal: [1, 2, 3]
    Array(Vec<Expr>),

    /// Object literal: {key: value, ...}. Keys may be a literal or a
    /// computed expression (spec.md §6).
    Object(Vec<(Expr, Expr)>),

    /// Anonymous function.
    AnonymousFunction {
        params: Vec<Parameter>,
        body: Vec<Stmt>,
    },

    /// `ni` — the implicit receiver inside a method body.
    This,

    /// `mai ClassName(args)` — object instantiation.
    New {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },

    /// `ror expr` — await. Pass-through in this release (spec.md §9).
    Await(Box<Expr>),

    /// `...expr` — spread. Pass-through in this release (spec.md §9).
    Spread(Box<Expr>),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "**",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::LShift => "<<",
            BinaryOp::RShift => ">>",
        };
        write!(f, "{s}")
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
    BitNot,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        };
        write!(f, "{s}")
    }
}

/// Short-circuiting logical operators, kept separate from `BinaryOp` since
/// they compile to jumps rather than to an arithmetic opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}
