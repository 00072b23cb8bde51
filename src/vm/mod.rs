//! Bytecode VM for Rangsi — compiles the AST to a `FunctionProto` chunk
//! (`compiler`) and executes it on a stack-based `Vm` (`vm`).

pub mod chunk;
pub mod compiler;
pub mod compiler_classes;
pub mod compiler_exprs;
pub mod compiler_stmts;
pub mod disassembler;
pub mod natives;
pub mod opcode;
pub mod upvalue;
pub mod value;
#[allow(clippy::module_inception)]
pub mod vm;
pub mod vm_calls;
pub mod vm_classes;

pub use chunk::{CompiledModule, FunctionProto};
pub use compiler::Compiler;
pub use disassembler::disassemble;
pub use opcode::Op;
pub use upvalue::VmClosure;
pub use vm::Vm;
