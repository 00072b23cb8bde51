//! Class declaration lowering (spec.md §4.1 "Class declaration").

use crate::ast::ClassDecl;
use crate::span::Span;

use super::compiler::{CompileResult, Compiler, FunctionType};
use super::opcode::Op;

/// The method name convention marking a class's initializer/constructor
/// (spec.md §4.1, `sang`).
pub const INITIALIZER_NAME: &str = "sang";

impl Compiler {
    /// `klum Name ... job` — declare the name, emit `CLASS`, define the
    /// variable, reload the class value, then compile and attach each
    /// method in declaration order before popping the class.
    ///
    /// At scope 0 the name is a global: `Op::Class` leaves the only copy
    /// of the class on the stack, `DefineGlobal` consumes it, and
    /// `GetGlobal` reloads a fresh copy to attach methods to and finally
    /// pop. At inner scope depths the name is a local: `Op::Class`'s push
    /// *is* the local's stack slot, so there is nothing to pop once the
    /// methods are attached — popping it here would destroy the binding
    /// `declare_local`/`mark_initialized` just registered.
    pub fn compile_class_decl(&mut self, decl: &ClassDecl, span: Span) -> CompileResult<()> {
        let line = span.line;
        self.declare_local(&decl.name, span)?;

        let name_idx = self.add_string_constant(&decl.name);
        self.emit(Op::Class(name_idx), line);

        let is_global = self.scope_depth == 0;
        if is_global {
            self.emit(Op::DefineGlobal(name_idx), line);
            self.emit(Op::GetGlobal(name_idx), line);
        } else {
            self.mark_initialized();
        }

        for method in &decl.methods {
            let function_type = if method.name == INITIALIZER_NAME {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.compile_function_body(method, function_type)?;
            let method_idx = self.add_string_constant(&method.name);
            self.emit(Op::Method(method_idx), method.span.line);
        }

        if is_global {
            self.emit(Op::Pop, line);
        }
        Ok(())
    }
}
