//! Statement lowering (spec.md §4.1 "Statement lowering").

use crate::ast::{Stmt, StmtKind};
use crate::error::CompileError;

use super::chunk::Constant;
use super::compiler::{CompileResult, Compiler, FunctionType, VariableAccess};
use super::opcode::Op;

impl Compiler {
    pub fn compile_stmt(&mut self, stmt: &Stmt) -> CompileResult<()> {
        let line = stmt.span.line;
        match &stmt.kind {
            StmtKind::Expression(expr) => {
                self.compile_expr(expr)?;
                self.emit(Op::Pop, line);
            }
            StmtKind::VarDecl { name, initializer } => {
                self.declare_local(name, stmt.span)?;
                match initializer {
                    Some(expr) => self.compile_expr(expr)?,
                    None => {
                        self.emit(Op::Null, line);
                    }
                }
                if self.scope_depth == 0 {
                    let idx = self.add_string_constant(name);
                    self.emit(Op::DefineGlobal(idx), line);
                } else {
                    self.mark_initialized();
                }
            }
            StmtKind::Print(exprs) => {
                for expr in exprs {
                    self.compile_expr(expr)?;
                    self.emit(Op::Print, expr.span.line);
                }
            }
            StmtKind::Block(stmts) => {
                self.begin_scope();
                for s in stmts {
                    self.compile_stmt_recovering(s);
                }
                self.end_scope(line);
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.compile_if(condition, then_branch, else_branch.as_deref(), line)?,
            StmtKind::While { condition, body } => self.compile_while(condition, body, line)?,
            StmtKind::CounterFor {
                variable,
                start,
                end,
                step,
                body,
            } => self.compile_counter_for(variable, start, end, step.as_ref(), body, stmt.span)?,
            StmtKind::Return(value) => self.compile_return(value.as_ref(), stmt.span)?,
            StmtKind::Break => self.compile_break(stmt.span)?,
            StmtKind::Continue => self.compile_continue(stmt.span)?,
            StmtKind::Switch {
                discriminant,
                cases,
                default,
            } => self.compile_switch(discriminant, cases, default.as_deref(), line)?,
            StmtKind::Function(decl) => {
                self.compile_function_decl(decl, FunctionType::Function, stmt.span)?
            }
            StmtKind::Class(decl) => self.compile_class_decl(decl, stmt.span)?,
        }
        Ok(())
    }

    fn compile_if(
        &mut self,
        condition: &crate::ast::Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
        line: usize,
    ) -> CompileResult<()> {
        self.compile_expr(condition)?;
        let then_jump = self.emit(Op::JumpIfFalse(0), line);
        self.emit(Op::Pop, line);
        self.compile_stmt(then_branch)?;

        let end_jump = self.emit(Op::Jump(0), line);
        self.patch_jump(then_jump);
        self.emit(Op::Pop, line);

        if let Some(else_stmt) = else_branch {
            self.compile_stmt(else_stmt)?;
        }
        self.patch_jump(end_jump);
        Ok(())
    }

    fn compile_while(
        &mut self,
        condition: &crate::ast::Expr,
        body: &Stmt,
        line: usize,
    ) -> CompileResult<()> {
        let loop_start = self.current_offset();
        self.begin_loop(loop_start);

        self.compile_expr(condition)?;
        let exit_jump = self.emit(Op::JumpIfFalse(0), line);
        self.emit(Op::Pop, line);
        self.compile_stmt(body)?;
        self.emit_loop(loop_start, line)?;

        self.patch_jump(exit_jump);
        self.emit(Op::Pop, line);
        self.end_loop();
        Ok(())
    }

    /// `samrab i = start tung end [kao step] ... job` (spec.md §4.1 "For (counted)").
    fn compile_counter_for(
        &mut self,
        variable: &str,
        start: &crate::ast::Expr,
        end: &crate::ast::Expr,
        step: Option<&crate::ast::Expr>,
        body: &Stmt,
        span: crate::span::Span,
    ) -> CompileResult<()> {
        let line = span.line;
        self.begin_scope();

        self.declare_local(variable, span)?;
        self.compile_expr(start)?;
        self.mark_initialized();
        let var_slot = self.resolve_local(variable, span)?.expect("just declared");

        let loop_start = self.current_offset();
        self.begin_loop(loop_start);

        self.emit(Op::GetLocal(var_slot), line);
        self.compile_expr(end)?;
        self.emit(Op::Less, line);
        let exit_jump = self.emit(Op::JumpIfFalse(0), line);
        self.emit(Op::Pop, line);

        self.compile_stmt(body)?;

        let is_step_one = match step {
            None => true,
            Some(expr) => {
                matches!(&expr.kind, crate::ast::ExprKind::NumberLiteral(n) if *n == 1.0)
            }
        };
        if is_step_one {
            self.emit(Op::IncLocal(var_slot), line);
        } else {
            let step_expr = step.expect("checked above");
            self.emit(Op::GetLocal(var_slot), line);
            self.compile_expr(step_expr)?;
            self.emit(Op::Add, line);
            self.emit(Op::SetLocal(var_slot), line);
            self.emit(Op::Pop, line);
        }

        self.emit_loop(loop_start, line)?;
        self.patch_jump(exit_jump);
        self.emit(Op::Pop, line);
        self.end_loop();

        self.end_scope(line);
        Ok(())
    }

    fn compile_return(
        &mut self,
        value: Option<&crate::ast::Expr>,
        span: crate::span::Span,
    ) -> CompileResult<()> {
        if self.function_type == FunctionType::Script {
            return Err(CompileError::ReturnOutsideFunction(span));
        }
        let line = span.line;
        match value {
            Some(expr) => {
                self.compile_expr(expr)?;
                self.emit(Op::Return, line);
            }
            None => self.emit_synthesized_return(line),
        }
        Ok(())
    }

    fn compile_break(&mut self, span: crate::span::Span) -> CompileResult<()> {
        if self.loop_context.is_none() {
            return Err(CompileError::BreakOutsideLoop(span));
        }
        let offset = self.emit(Op::Jump(0), span.line);
        self.add_break_patch(offset);
        Ok(())
    }

    fn compile_continue(&mut self, span: crate::span::Span) -> CompileResult<()> {
        let Some(ctx) = self.loop_context.clone() else {
            return Err(CompileError::ContinueOutsideLoop(span));
        };
        self.emit_loop(ctx.loop_start, span.line)?;
        Ok(())
    }

    /// `cheek discriminant ... karani v: body ... baeb_chai: body ... job`
    /// (spec.md §4.1 "Switch"). Cases never fall through.
    fn compile_switch(
        &mut self,
        discriminant: &crate::ast::Expr,
        cases: &[(crate::ast::Expr, Vec<Stmt>)],
        default: Option<&[Stmt]>,
        line: usize,
    ) -> CompileResult<()> {
        self.compile_expr(discriminant)?;

        let mut end_jumps = Vec::with_capacity(cases.len());
        for (case_value, case_body) in cases {
            self.emit(Op::Dup, line);
            self.compile_expr(case_value)?;
            self.emit(Op::Equal, line);
            let skip_jump = self.emit(Op::JumpIfFalse(0), line);
            self.emit(Op::Pop, line); // pop the Equal result
            self.emit(Op::Pop, line); // pop the discriminant
            self.begin_scope();
            for s in case_body {
                self.compile_stmt_recovering(s);
            }
            self.end_scope(line);
            end_jumps.push(self.emit(Op::Jump(0), line));
            self.patch_jump(skip_jump);
            self.emit(Op::Pop, line); // pop the Equal result on the skip path
        }

        self.emit(Op::Pop, line); // pop the discriminant (no case matched)
        if let Some(default_body) = default {
            self.begin_scope();
            for s in default_body {
                self.compile_stmt_recovering(s);
            }
            self.end_scope(line);
        }
        for jump in end_jumps {
            self.patch_jump(jump);
        }
        Ok(())
    }

    /// Compile a named function declaration — shared by top-level functions
    /// and class methods (spec.md §4.1 "Function declaration").
    pub fn compile_function_decl(
        &mut self,
        decl: &crate::ast::FunctionDecl,
        function_type: FunctionType,
        span: crate::span::Span,
    ) -> CompileResult<()> {
        let line = span.line;
        self.declare_local(&decl.name, span)?;
        if self.scope_depth > 0 {
            self.mark_initialized();
        }

        self.compile_function_body(decl, function_type)?;

        if self.scope_depth == 0 {
            let idx = self.add_string_constant(&decl.name);
            self.emit(Op::DefineGlobal(idx), line);
        }
        Ok(())
    }

    /// Compile a function/method body into a fresh nested compiler, leaving
    /// the resulting `Closure` on the enclosing stack.
    pub fn compile_function_body(
        &mut self,
        decl: &crate::ast::FunctionDecl,
        function_type: FunctionType,
    ) -> CompileResult<()> {
        let line = decl.span.line;
        self.start_function(function_type, decl.name.clone(), &decl.params);
        self.begin_scope();
        for s in &decl.body {
            self.compile_stmt_recovering(s);
        }
        self.end_scope(line);
        let proto = self.finish_function(line);
        let fn_idx = self.add_constant(Constant::Function(std::rc::Rc::new(proto)));
        self.emit(Op::Closure(fn_idx), line);
        Ok(())
    }

    /// Resolve and emit the access for reading a variable.
    pub fn compile_variable_get(
        &mut self,
        name: &str,
        span: crate::span::Span,
    ) -> CompileResult<()> {
        match self.resolve_variable(name, span)? {
            VariableAccess::Local(slot) => self.emit(Op::GetLocal(slot), span.line),
            VariableAccess::Upvalue(idx) => self.emit(Op::GetUpvalue(idx), span.line),
            VariableAccess::Global(name) => {
                let idx = self.add_string_constant(&name);
                self.emit(Op::GetGlobal(idx), span.line)
            }
        };
        Ok(())
    }

    /// Resolve and emit the access for writing a variable. The value to
    /// assign must already be on top of the stack.
    pub fn compile_variable_set(
        &mut self,
        name: &str,
        span: crate::span::Span,
    ) -> CompileResult<()> {
        match self.resolve_variable(name, span)? {
            VariableAccess::Local(slot) => self.emit(Op::SetLocal(slot), span.line),
            VariableAccess::Upvalue(idx) => self.emit(Op::SetUpvalue(idx), span.line),
            VariableAccess::Global(name) => {
                let idx = self.add_string_constant(&name);
                self.emit(Op::SetGlobal(idx), span.line)
            }
        };
        Ok(())
    }
}
