//! Error types for all compilation phases.

use crate::span::Span;
use thiserror::Error;

/// Lexer errors.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("unexpected character '{0}' at {1}")]
    UnexpectedChar(char, Span),

    #[error("unterminated string at {0}")]
    UnterminatedString(Span),

    #[error("invalid escape sequence '\\{0}' at {1}")]
    InvalidEscape(char, Span),

    #[error("invalid number '{0}' at {1}")]
    InvalidNumber(String, Span),
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar(_, span) => *span,
            Self::UnterminatedString(span) => *span,
            Self::InvalidEscape(_, span) => *span,
            Self::InvalidNumber(_, span) => *span,
        }
    }
}

/// Parser errors. A production that fails to parse is collected rather
/// than aborting the whole program — mirrors the compiler's "collect,
/// don't abort" policy one phase up (spec §4.1).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected token '{found}', expected {expected} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("unexpected end of input at {0}")]
    UnexpectedEof(Span),

    #[error("invalid assignment target at {0}")]
    InvalidAssignmentTarget(Span),

    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl ParseError {
    pub fn unexpected_token(
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn general(message: impl Into<String>, span: Span) -> Self {
        Self::General {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } => *span,
            Self::UnexpectedEof(span) => *span,
            Self::InvalidAssignmentTarget(span) => *span,
            Self::General { span, .. } => *span,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self::General {
            message: err.to_string(),
            span: err.span(),
        }
    }
}

/// Bytecode compiler errors (spec §7 "Compile-time error kinds").
/// Non-fatal individually — the compiler collects them and only discards
/// the resulting Function if the collection ends up non-empty.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("variable '{0}' already declared in this scope at {1}")]
    DuplicateDeclaration(String, Span),

    #[error("cannot read local variable '{0}' in its own initializer at {1}")]
    SelfReferentialInitializer(String, Span),

    #[error("'yud' (break) outside of a loop at {0}")]
    BreakOutsideLoop(Span),

    #[error("'tor_pai' (continue) outside of a loop at {0}")]
    ContinueOutsideLoop(Span),

    #[error("'kuun' (return) outside of a function at {0}")]
    ReturnOutsideFunction(Span),

    #[error("jump offset of {0} bytes exceeds the 16-bit limit at {1}")]
    JumpTooLarge(usize, Span),

    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl CompileError {
    pub fn general(message: impl Into<String>, span: Span) -> Self {
        Self::General {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::DuplicateDeclaration(_, span) => *span,
            Self::SelfReferentialInitializer(_, span) => *span,
            Self::BreakOutsideLoop(span) => *span,
            Self::ContinueOutsideLoop(span) => *span,
            Self::ReturnOutsideFunction(span) => *span,
            Self::JumpTooLarge(_, span) => *span,
            Self::General { span, .. } => *span,
        }
    }
}

/// Runtime faults (spec §7 "Runtime-fault kinds"). Each one halts the
/// current `run` — no opcode catches these; user-level try/catch is out of
/// scope for this release (spec §9).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("division by zero at {0}")]
    DivisionByZero(Span),

    #[error("undefined variable '{0}' at {1}")]
    UndefinedVariable(String, Span),

    #[error("only functions and classes are callable at {0}")]
    NotCallable(Span),

    #[error("expected {expected} arguments, got {got} at {span}")]
    WrongArity {
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("{message} at {span}")]
    TypeError { message: String, span: Span },

    #[error("undefined property '{property}' on {value_type} at {span}")]
    UndefinedProperty {
        value_type: String,
        property: String,
        span: Span,
    },

    #[error("value stack overflow at {0}")]
    StackOverflow(Span),

    #[error("value stack underflow at {0}")]
    StackUnderflow(Span),

    #[error("frame stack overflow at {0}")]
    FrameOverflow(Span),

    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl RuntimeError {
    pub fn general(message: impl Into<String>, span: Span) -> Self {
        Self::General {
            message: message.into(),
            span,
        }
    }

    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        Self::TypeError {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::DivisionByZero(span) => *span,
            Self::UndefinedVariable(_, span) => *span,
            Self::NotCallable(span) => *span,
            Self::WrongArity { span, .. } => *span,
            Self::TypeError { span, .. } => *span,
            Self::UndefinedProperty { span, .. } => *span,
            Self::StackOverflow(span) => *span,
            Self::StackUnderflow(span) => *span,
            Self::FrameOverflow(span) => *span,
            Self::General { span, .. } => *span,
        }
    }
}

/// A unified error type for all phases, used by the CLI and library entry
/// points.
#[derive(Debug, Error)]
pub enum RangsiError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
