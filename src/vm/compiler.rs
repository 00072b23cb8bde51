//! AST-to-bytecode compiler (spec.md §4.1).
//!
//! Single-pass compilation: the AST is walked once, emitting bytecode into
//! a `Chunk`. Variable resolution happens at compile time — locals become
//! stack slot indices, captured locals become upvalue indices, everything
//! else is a named global.

use std::rc::Rc;

use crate::ast::{Parameter, Program};
use crate::error::CompileError;
use crate::span::Span;

use super::chunk::{Chunk, CompiledModule, Constant, FunctionProto};
use super::opcode::Op;
use super::upvalue::UpvalueDescriptor;

pub type CompileResult<T> = Result<T, CompileError>;

/// A local variable tracked during compilation. `depth == -1` means
/// declared but not yet initialized — referring to it is a compile error
/// (spec.md §4.1 "Variable resolution").
#[derive(Debug, Clone)]
pub struct Local {
    pub name: String,
    pub depth: i32,
    pub is_captured: bool,
}

/// What kind of function body is currently being compiled. Affects only
/// the synthesized trailing return (spec.md §4.1 "Return").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionType {
    Script,
    Function,
    Method,
    /// The method named by the initializer convention (`sang`).
    Initializer,
}

#[derive(Debug, Clone)]
pub struct LoopContext {
    /// Byte offset of the loop's test, for `continue`.
    pub loop_start: usize,
    pub break_patches: Vec<usize>,
    pub enclosing: Option<Box<LoopContext>>,
}

/// The compiler: transforms one AST program, and recursively its nested
/// functions/methods, into bytecode.
pub struct Compiler {
    pub proto: FunctionProto,
    pub locals: Vec<Local>,
    pub scope_depth: i32,
    pub upvalues: Vec<UpvalueDescriptor>,
    pub enclosing: Option<Box<Compiler>>,
    pub function_type: FunctionType,
    pub loop_context: Option<LoopContext>,
    /// Set once any sibling production records a `CompileError`. A single
    /// failed statement does not abort compilation of the rest (spec.md
    /// §4.1 "Error semantics") — but a set flag means the top-level
    /// `Function` is discarded once compilation finishes.
    pub had_error: bool,
    /// Every `CompileError` recorded so far, across this compiler and any
    /// nested compiler that finished and folded its errors back in.
    pub errors: Vec<CompileError>,
}

impl Compiler {
    pub fn new(function_type: FunctionType, name: String) -> Self {
        let mut compiler = Self {
            proto: FunctionProto::new(name),
            locals: Vec::new(),
            scope_depth: 0,
            upvalues: Vec::new(),
            enclosing: None,
            function_type,
            loop_context: None,
            had_error: false,
            errors: Vec::new(),
        };

        // Slot 0 names the implicit receiver for methods, and is anonymous
        // (but still reserved) for ordinary functions (spec.md §4.1).
        let slot_name = if matches!(
            function_type,
            FunctionType::Method | FunctionType::Initializer
        ) {
            "ni".to_string()
        } else {
            String::new()
        };
        compiler.locals.push(Local {
            name: slot_name,
            depth: 0,
            is_captured: false,
        });

        compiler
    }

    /// Compile a full program into a top-level Function. Every top-level
    /// statement is attempted even if an earlier sibling failed to
    /// compile (spec.md §4.1 "Error semantics"); if any error was
    /// recorded, the resulting `Function` is discarded and the first
    /// recorded error is returned.
    pub fn compile(program: &Program) -> CompileResult<CompiledModule> {
        let mut compiler = Compiler::new(FunctionType::Script, String::new());
        for stmt in &program.statements {
            compiler.compile_stmt_recovering(stmt);
        }
        compiler.emit(Op::Null, 0);
        compiler.emit(Op::Return, 0);

        if compiler.had_error {
            return Err(compiler.errors.remove(0));
        }

        let mut proto = compiler.proto;
        proto.upvalue_descriptors = compiler.upvalues;
        Ok(CompiledModule {
            main: Rc::new(proto),
        })
    }

    // --- Chunk helpers ---

    pub fn chunk(&mut self) -> &mut Chunk {
        &mut self.proto.chunk
    }

    pub fn emit(&mut self, op: Op, line: usize) -> usize {
        self.proto.chunk.emit(op, line)
    }

    pub fn emit_constant(&mut self, constant: Constant, line: usize) {
        let idx = self.proto.chunk.add_constant(constant);
        self.emit(Op::Constant(idx), line);
    }

    pub fn current_offset(&self) -> usize {
        self.proto.chunk.len()
    }

    pub fn patch_jump(&mut self, offset: usize) {
        self.proto.chunk.patch_jump(offset);
    }

    /// Emit a backward `LOOP` to `loop_start`.
    pub fn emit_loop(&mut self, loop_start: usize, line: usize) -> CompileResult<()> {
        let offset = self.proto.chunk.len() - loop_start + 1;
        if offset > u16::MAX as usize {
            return Err(CompileError::JumpTooLarge(offset, Span::new(line, 0)));
        }
        self.emit(Op::Loop(offset as u16), line);
        Ok(())
    }

    pub fn add_constant(&mut self, constant: Constant) -> u16 {
        self.proto.chunk.add_constant(constant)
    }

    pub fn add_string_constant(&mut self, s: &str) -> u16 {
        self.proto
            .chunk
            .add_constant(Constant::String(s.to_string()))
    }

    // --- Scope management ---

    pub fn begin_scope(&mut self) {
        self.scope_depth += 1;
    }

    /// Ends a scope, emitting one `POP` (or `CLOSE_UPVALUE` for a captured
    /// local) per local leaving scope (spec.md §4.1 "Block").
    pub fn end_scope(&mut self, line: usize) {
        self.scope_depth -= 1;
        while let Some(local) = self.locals.last() {
            if local.depth <= self.scope_depth {
                break;
            }
            if local.is_captured {
                self.emit(Op::CloseUpvalue, line);
            } else {
                self.emit(Op::Pop, line);
            }
            self.locals.pop();
        }
    }

    // --- Local variables ---

    /// Declare `name` as a local at the current scope (no-op at scope 0,
    /// where declarations instead become globals). Errors on redeclaration
    /// in the same scope (spec.md §4.1 "Declaration rules").
    pub fn declare_local(&mut self, name: &str, span: Span) -> CompileResult<()> {
        if self.scope_depth == 0 {
            return Ok(());
        }
        for local in self.locals.iter().rev() {
            if local.depth != -1 && local.depth < self.scope_depth {
                break;
            }
            if local.name == name {
                return Err(CompileError::DuplicateDeclaration(name.to_string(), span));
            }
        }
        self.locals.push(Local {
            name: name.to_string(),
            depth: -1,
            is_captured: false,
        });
        Ok(())
    }

    /// Marks the most recently declared local as initialized, i.e. usable.
    pub fn mark_initialized(&mut self) {
        if self.scope_depth == 0 {
            return;
        }
        if let Some(local) = self.locals.last_mut() {
            local.depth = self.scope_depth;
        }
    }

    /// Push a parameter local directly (already initialized — no
    /// initializer expression to wait on).
    pub fn add_param_local(&mut self, name: String) {
        self.locals.push(Local {
            name,
            depth: self.scope_depth,
            is_captured: false,
        });
    }

    /// Resolve `name` to a local slot. Returns an error if the name refers
    /// to a local still being initialized (reading a variable in its own
    /// initializer), `Ok(None)` if no local matches at all.
    pub fn resolve_local(&self, name: &str, span: Span) -> CompileResult<Option<u16>> {
        for (i, local) in self.locals.iter().enumerate().rev() {
            if local.name == name {
                if local.depth == -1 {
                    return Err(CompileError::SelfReferentialInitializer(
                        name.to_string(),
                        span,
                    ));
                }
                return Ok(Some(i as u16));
            }
        }
        Ok(None)
    }

    /// Walk the enclosing compiler chain, marking captured locals and
    /// threading an UpvalueInfo through every compiler on the path
    /// (spec.md §4.1 "Variable resolution", step 2).
    pub fn resolve_upvalue(&mut self, name: &str, span: Span) -> CompileResult<Option<u16>> {
        let Some(enclosing) = self.enclosing.as_mut() else {
            return Ok(None);
        };
        if let Some(local_idx) = enclosing.resolve_local(name, span)? {
            enclosing.locals[local_idx as usize].is_captured = true;
            return Ok(Some(self.add_upvalue(local_idx, true)));
        }
        if let Some(upvalue_idx) = enclosing.resolve_upvalue(name, span)? {
            return Ok(Some(self.add_upvalue(upvalue_idx, false)));
        }
        Ok(None)
    }

    fn add_upvalue(&mut self, index: u16, is_local: bool) -> u16 {
        for (i, uv) in self.upvalues.iter().enumerate() {
            if uv.index == index && uv.is_local == is_local {
                return i as u16;
            }
        }
        let idx = self.upvalues.len() as u16;
        self.upvalues.push(UpvalueDescriptor { is_local, index });
        idx
    }

    /// Resolve a variable name to the appropriate access kind (spec.md
    /// §4.1 "Variable resolution").
    pub fn resolve_variable(&mut self, name: &str, span: Span) -> CompileResult<VariableAccess> {
        if let Some(slot) = self.resolve_local(name, span)? {
            return Ok(VariableAccess::Local(slot));
        }
        if let Some(idx) = self.resolve_upvalue(name, span)? {
            return Ok(VariableAccess::Upvalue(idx));
        }
        Ok(VariableAccess::Global(name.to_string()))
    }

    // --- Function compilation ---

    /// Start compiling a nested function: swaps in a fresh compiler with
    /// `self` as its enclosing link, and declares each parameter as an
    /// initialized local.
    pub fn start_function(&mut self, function_type: FunctionType, name: String, params: &[Parameter]) {
        let mut new_compiler = Compiler::new(function_type, name);
        for param in params {
            new_compiler.add_param_local(param.name.clone());
        }
        new_compiler.proto.arity = params.len() as u8;

        let old = std::mem::replace(self, new_compiler);
        self.enclosing = Some(Box::new(old));
    }

    /// Finish compiling the current function: emits the synthesized
    /// trailing return, then restores the enclosing compiler and returns
    /// the finished prototype.
    pub fn finish_function(&mut self, line: usize) -> FunctionProto {
        self.emit_synthesized_return(line);

        let mut proto = std::mem::replace(&mut self.proto, FunctionProto::new(String::new()));
        proto.upvalue_descriptors = std::mem::take(&mut self.upvalues);
        proto.is_initializer = self.function_type == FunctionType::Initializer;

        let had_error = self.had_error;
        let mut errors = std::mem::take(&mut self.errors);

        if let Some(enclosing) = self.enclosing.take() {
            *self = *enclosing;
        }
        self.had_error = self.had_error || had_error;
        self.errors.append(&mut errors);

        proto
    }

    /// Bare `kuun` or falling off the end of a function body: an
    /// initializer method returns the receiver (slot 0), everything else
    /// returns Null (spec.md §4.1 "Return").
    pub fn emit_synthesized_return(&mut self, line: usize) {
        if self.function_type == FunctionType::Initializer {
            self.emit(Op::GetLocal(0), line);
        } else {
            self.emit(Op::Null, line);
        }
        self.emit(Op::Return, line);
    }

    // --- Loop context ---

    pub fn begin_loop(&mut self, loop_start: usize) {
        let enclosing = self.loop_context.take().map(Box::new);
        self.loop_context = Some(LoopContext {
            loop_start,
            break_patches: Vec::new(),
            enclosing,
        });
    }

    pub fn end_loop(&mut self) {
        if let Some(ctx) = self.loop_context.take() {
            for patch in &ctx.break_patches {
                self.patch_jump(*patch);
            }
            self.loop_context = ctx.enclosing.map(|b| *b);
        }
    }

    pub fn add_break_patch(&mut self, offset: usize) {
        if let Some(ctx) = self.loop_context.as_mut() {
            ctx.break_patches.push(offset);
        }
    }

    // --- Error collection ---

    /// Record a `CompileError` without aborting compilation of sibling
    /// productions (spec.md §4.1 "Error semantics").
    pub fn record_error(&mut self, err: CompileError) {
        self.had_error = true;
        self.errors.push(err);
    }

    /// Compile one statement, recording (rather than propagating) a
    /// `CompileError` so the next sibling statement in the same list still
    /// gets compiled (spec.md §4.1 "Error semantics": "a single failed
    /// production does not abort sibling productions").
    pub fn compile_stmt_recovering(&mut self, stmt: &crate::ast::Stmt) {
        if let Err(err) = self.compile_stmt(stmt) {
            self.record_error(err);
        }
    }
}

/// How a variable is accessed at runtime.
#[derive(Debug, Clone)]
pub enum VariableAccess {
    Local(u16),
    Upvalue(u16),
    Global(String),
}

#[cfg(test)]
mod tests {
    use crate::error::CompileError;
    use crate::lexer::Scanner;
    use crate::parser::Parser;
    use super::Compiler;

    fn compile_err(source: &str) -> CompileError {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        let program = Parser::new(tokens).parse().unwrap();
        Compiler::compile(&program).unwrap_err()
    }

    /// A failed sibling statement doesn't stop later siblings from also
    /// being attempted and recorded (spec.md §4.1 "Error semantics").
    #[test]
    fn collects_errors_from_every_failing_sibling_statement() {
        let tokens = Scanner::new("yud\nyud\nda 1\n").scan_tokens().unwrap();
        let program = Parser::new(tokens).parse().unwrap();
        let mut compiler = Compiler::new(super::FunctionType::Script, String::new());
        for stmt in &program.statements {
            compiler.compile_stmt_recovering(stmt);
        }
        assert_eq!(compiler.errors.len(), 2);
        assert!(compiler
            .errors
            .iter()
            .all(|e| matches!(e, CompileError::BreakOutsideLoop(_))));
    }

    #[test]
    fn discards_the_function_when_any_statement_failed() {
        let err = compile_err("yud\n");
        assert!(matches!(err, CompileError::BreakOutsideLoop(_)));
    }
}
