//! Expression lowering (spec.md §4.1 "Expression lowering").

use crate::ast::{BinaryOp, Expr, ExprKind, LogicalOp, UnaryOp};
use crate::error::CompileError;
use crate::span::Span;

use super::chunk::Constant;
use super::compiler::{CompileResult, Compiler, FunctionType};
use super::opcode::Op;

/// Result of folding a binary op over two number literals at compile time.
enum Folded {
    Number(f64),
    Bool(bool),
}

impl Compiler {
    pub fn compile_expr(&mut self, expr: &Expr) -> CompileResult<()> {
        let line = expr.span.line;
        match &expr.kind {
            ExprKind::NumberLiteral(n) => self.emit_number_literal(*n, line),
            ExprKind::StringLiteral(s) => self.emit_constant(Constant::String(s.clone()), line),
            ExprKind::BoolLiteral(true) => {
                self.emit(Op::True, line);
            }
            ExprKind::BoolLiteral(false) => {
                self.emit(Op::False, line);
            }
            ExprKind::Null => {
                self.emit(Op::Null, line);
            }
            ExprKind::This => self.compile_variable_get("ni", expr.span)?,
            ExprKind::Variable(name) => self.compile_variable_get(name, expr.span)?,

            ExprKind::Binary {
                left,
                operator,
                right,
            } => self.compile_binary(left, *operator, right, line)?,

            ExprKind::Unary { operator, operand } => {
                self.compile_expr(operand)?;
                let op = match operator {
                    UnaryOp::Negate => Op::Negate,
                    UnaryOp::Not => Op::Not,
                    UnaryOp::BitNot => Op::BitNot,
                };
                self.emit(op, line);
            }

            ExprKind::Logical {
                operator,
                left,
                right,
            } => self.compile_logical(*operator, left, right, line)?,

            ExprKind::Ternary {
                condition,
                then_branch,
                else_branch,
            } => self.compile_ternary(condition, then_branch, else_branch, line)?,

            ExprKind::Call { callee, arguments } => self.compile_call(callee, arguments, line)?,

            ExprKind::Member { object, name } => {
                self.compile_expr(object)?;
                let idx = self.add_string_constant(name);
                self.emit(Op::GetProperty(idx), line);
            }

            ExprKind::Index { object, index } => {
                self.compile_expr(object)?;
                self.compile_expr(index)?;
                self.emit(Op::GetIndex, line);
            }

            ExprKind::Assign { target, value } => self.compile_assign(target, value, line)?,

            ExprKind::Array(elements) => {
                for el in elements {
                    self.compile_expr(el)?;
                }
                let count = Self::check_count(elements.len(), expr.span)?;
                self.emit(Op::Array(count), line);
            }

            ExprKind::Object(entries) => {
                for (key, value) in entries {
                    self.compile_expr(key)?;
                    self.compile_expr(value)?;
                }
                let count = Self::check_count(entries.len(), expr.span)?;
                self.emit(Op::Object(count), line);
            }

            ExprKind::AnonymousFunction { params, body } => {
                self.compile_anonymous_function(params, body, expr.span)?;
            }

            ExprKind::New { callee, arguments } => self.compile_call(callee, arguments, line)?,

            ExprKind::Await(inner) | ExprKind::Spread(inner) => {
                // Pass-through in this release (spec.md §9).
                self.compile_expr(inner)?;
            }
        }
        Ok(())
    }

    fn emit_number_literal(&mut self, n: f64, line: usize) {
        if n == 0.0 && n.is_sign_positive() {
            self.emit(Op::LoadZero, line);
        } else if n == 1.0 {
            self.emit(Op::LoadOne, line);
        } else {
            self.emit_constant(Constant::Number(n), line);
        }
    }

    fn compile_binary(
        &mut self,
        left: &Expr,
        operator: BinaryOp,
        right: &Expr,
        line: usize,
    ) -> CompileResult<()> {
        if let (ExprKind::NumberLiteral(a), ExprKind::NumberLiteral(b)) = (&left.kind, &right.kind)
        {
            if let Some(folded) = fold_binary(operator, *a, *b) {
                match folded {
                    Folded::Number(n) => self.emit_number_literal(n, line),
                    Folded::Bool(true) => {
                        self.emit(Op::True, line);
                    }
                    Folded::Bool(false) => {
                        self.emit(Op::False, line);
                    }
                }
                return Ok(());
            }
        }

        self.compile_expr(left)?;
        self.compile_expr(right)?;
        self.emit(binary_opcode(operator), line);
        Ok(())
    }

    fn compile_logical(
        &mut self,
        operator: LogicalOp,
        left: &Expr,
        right: &Expr,
        line: usize,
    ) -> CompileResult<()> {
        self.compile_expr(left)?;
        match operator {
            LogicalOp::And => {
                let end_jump = self.emit(Op::JumpIfFalse(0), line);
                self.emit(Op::Pop, line);
                self.compile_expr(right)?;
                self.patch_jump(end_jump);
            }
            LogicalOp::Or => {
                let end_jump = self.emit(Op::JumpIfTrue(0), line);
                self.emit(Op::Pop, line);
                self.compile_expr(right)?;
                self.patch_jump(end_jump);
            }
        }
        Ok(())
    }

    fn compile_ternary(
        &mut self,
        condition: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
        line: usize,
    ) -> CompileResult<()> {
        self.compile_expr(condition)?;
        let else_jump = self.emit(Op::JumpIfFalse(0), line);
        self.emit(Op::Pop, line);
        self.compile_expr(then_branch)?;
        let end_jump = self.emit(Op::Jump(0), line);
        self.patch_jump(else_jump);
        self.emit(Op::Pop, line);
        self.compile_expr(else_branch)?;
        self.patch_jump(end_jump);
        Ok(())
    }

    fn compile_call(
        &mut self,
        callee: &Expr,
        arguments: &[Expr],
        line: usize,
    ) -> CompileResult<()> {
        self.compile_expr(callee)?;
        for arg in arguments {
            self.compile_expr(arg)?;
        }
        if arguments.len() > u8::MAX as usize {
            return Err(CompileError::general(
                format!(
                    "call with {} arguments exceeds the 255-argument limit",
                    arguments.len()
                ),
                callee.span,
            ));
        }
        self.emit(Op::Call(arguments.len() as u8), line);
        Ok(())
    }

    fn compile_assign(&mut self, target: &Expr, value: &Expr, line: usize) -> CompileResult<()> {
        match &target.kind {
            ExprKind::Variable(name) => {
                self.compile_expr(value)?;
                self.compile_variable_set(name, target.span)?;
            }
            ExprKind::Member { object, name } => {
                self.compile_expr(object)?;
                self.compile_expr(value)?;
                let idx = self.add_string_constant(name);
                self.emit(Op::SetProperty(idx), line);
            }
            ExprKind::Index { object, index } => {
                self.compile_expr(object)?;
                self.compile_expr(index)?;
                self.compile_expr(value)?;
                self.emit(Op::SetIndex, line);
            }
            _ => {
                return Err(CompileError::general(
                    "invalid assignment target",
                    target.span,
                ));
            }
        }
        Ok(())
    }

    fn compile_anonymous_function(
        &mut self,
        params: &[crate::ast::Parameter],
        body: &[crate::ast::Stmt],
        span: Span,
    ) -> CompileResult<()> {
        let line = span.line;
        self.start_function(FunctionType::Function, String::new(), params);
        self.begin_scope();
        for s in body {
            self.compile_stmt_recovering(s);
        }
        self.end_scope(line);
        let proto = self.finish_function(line);
        let idx = self.add_constant(Constant::Function(std::rc::Rc::new(proto)));
        self.emit(Op::Closure(idx), line);
        Ok(())
    }

    fn emit_constant(&mut self, constant: Constant, line: usize) {
        let idx = self.add_constant(constant);
        self.emit(Op::Constant(idx), line);
    }

    fn check_count(len: usize, span: Span) -> CompileResult<u16> {
        if len > u16::MAX as usize {
            return Err(CompileError::general(
                format!("literal with {len} elements exceeds the 16-bit limit"),
                span,
            ));
        }
        Ok(len as u16)
    }
}

fn binary_opcode(operator: BinaryOp) -> Op {
    match operator {
        BinaryOp::Add => Op::Add,
        BinaryOp::Subtract => Op::Subtract,
        BinaryOp::Multiply => Op::Multiply,
        BinaryOp::Divide => Op::Divide,
        BinaryOp::Modulo => Op::Modulo,
        BinaryOp::Power => Op::Power,
        BinaryOp::Equal => Op::Equal,
        BinaryOp::NotEqual => Op::NotEqual,
        BinaryOp::Less => Op::Less,
        BinaryOp::LessEqual => Op::LessEqual,
        BinaryOp::Greater => Op::Greater,
        BinaryOp::GreaterEqual => Op::GreaterEqual,
        BinaryOp::BitAnd => Op::BitAnd,
        BinaryOp::BitOr => Op::BitOr,
        BinaryOp::BitXor => Op::BitXor,
        BinaryOp::LShift => Op::LShift,
        BinaryOp::RShift => Op::RShift,
    }
}

/// Constant-fold a binary op over two number literals (spec.md §4.1
/// "Binary on two numeric literals"). Division/modulo by zero are left
/// unfolded so the fault surfaces at runtime with a line number.
fn fold_binary(operator: BinaryOp, a: f64, b: f64) -> Option<Folded> {
    match operator {
        BinaryOp::Add => Some(Folded::Number(a + b)),
        BinaryOp::Subtract => Some(Folded::Number(a - b)),
        BinaryOp::Multiply => Some(Folded::Number(a * b)),
        BinaryOp::Divide if b != 0.0 => Some(Folded::Number(a / b)),
        BinaryOp::Modulo if b != 0.0 => Some(Folded::Number(a % b)),
        BinaryOp::Power => Some(Folded::Number(a.powf(b))),
        BinaryOp::Less => Some(Folded::Bool(a < b)),
        BinaryOp::LessEqual => Some(Folded::Bool(a <= b)),
        BinaryOp::Greater => Some(Folded::Bool(a > b)),
        BinaryOp::GreaterEqual => Some(Folded::Bool(a >= b)),
        BinaryOp::Equal => Some(Folded::Bool(a == b)),
        BinaryOp::NotEqual => Some(Folded::Bool(a != b)),
        _ => None,
    }
}
