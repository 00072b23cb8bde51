//! Rangsi: a dynamically-typed, class-based scripting language with
//! bilingual (transliterated Thai) keywords.
//!
//! The crate's core, per spec.md §1, is the AST-to-bytecode compiler and
//! the stack-based VM that executes the resulting chunks (`vm`). The
//! lexer and parser exist to give the crate a complete, runnable pipeline
//! from source text to the compiler's input AST (spec.md §6).

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod vm;

use error::RangsiError;
use vm::Vm;

/// Compile and run a Rangsi program from source text, printing through the
/// VM's default `println!`-based output sink.
pub fn run(source: &str) -> Result<(), RangsiError> {
    let mut vm = Vm::new();
    for native in vm::natives::standard_natives() {
        vm.register_native(native);
    }
    run_with_vm(source, &mut vm)
}

/// Compile and run a Rangsi program against a caller-supplied `Vm`, so the
/// host can install its own output sink or natives table first (spec.md §6).
pub fn run_with_vm(source: &str, vm: &mut Vm) -> Result<(), RangsiError> {
    let module = compile(source)?;
    vm.execute(&module.main)?;
    Ok(())
}

/// Lex and parse source text into an AST, without compiling or running it.
pub fn parse(source: &str) -> Result<ast::Program, RangsiError> {
    let tokens = lexer::Scanner::new(source).scan_tokens()?;
    let program = parser::Parser::new(tokens).parse()?;
    Ok(program)
}

/// Lex, parse, and compile source text into a `CompiledModule`, without
/// running it. Used by the CLI's `--disassemble` flag and by benches.
pub fn compile(source: &str) -> Result<vm::CompiledModule, RangsiError> {
    let program = parse(source)?;
    let module = vm::Compiler::compile(&program)?;
    Ok(module)
}
