//! Bytecode disassembler for debug output (spec.md A.8, an opt-in CLI flag
//! and the tool used by constant-pool-deduplication tests).

use super::chunk::{Chunk, Constant, FunctionProto};
use super::opcode::Op;

/// Disassemble a function prototype to a human-readable string.
pub fn disassemble(proto: &FunctionProto) -> String {
    let mut out = String::new();
    let name = if proto.name.is_empty() {
        "<script>"
    } else {
        &proto.name
    };
    out.push_str(&format!(
        "== {} (arity={}, upvalues={}) ==\n",
        name,
        proto.arity,
        proto.upvalue_descriptors.len()
    ));
    disassemble_chunk(&proto.chunk, &mut out);

    // Recursively disassemble nested functions, since they only live in the
    // constant pool (spec.md §3.2).
    for constant in &proto.chunk.constants {
        if let Constant::Function(nested) = constant {
            out.push('\n');
            out.push_str(&disassemble(nested));
        }
    }
    out
}

fn disassemble_chunk(chunk: &Chunk, out: &mut String) {
    for (offset, op) in chunk.code.iter().enumerate() {
        let line = chunk.lines.get(offset).copied().unwrap_or(0);
        let line_str = if offset > 0 && chunk.lines.get(offset - 1).copied() == Some(line) {
            "   |".to_string()
        } else {
            format!("{:4}", line)
        };
        out.push_str(&format!("{:04} {} ", offset, line_str));
        disassemble_op(op, chunk, out);
        out.push('\n');
    }
}

fn disassemble_op(op: &Op, chunk: &Chunk, out: &mut String) {
    match op {
        Op::Pop => out.push_str("POP"),
        Op::Dup => out.push_str("DUP"),
        Op::Swap => out.push_str("SWAP"),

        Op::True => out.push_str("TRUE"),
        Op::False => out.push_str("FALSE"),
        Op::Null => out.push_str("NULL"),
        Op::LoadZero => out.push_str("LOAD_ZERO"),
        Op::LoadOne => out.push_str("LOAD_ONE"),
        Op::Constant(idx) => {
            let val = chunk.constants.get(*idx as usize);
            out.push_str(&format!("CONSTANT     {:>5} ({})", idx, format_constant(val)));
        }

        Op::Add => out.push_str("ADD"),
        Op::Subtract => out.push_str("SUBTRACT"),
        Op::Multiply => out.push_str("MULTIPLY"),
        Op::Divide => out.push_str("DIVIDE"),
        Op::Modulo => out.push_str("MODULO"),
        Op::Power => out.push_str("POWER"),
        Op::Negate => out.push_str("NEGATE"),

        Op::Equal => out.push_str("EQUAL"),
        Op::NotEqual => out.push_str("NOT_EQUAL"),
        Op::Greater => out.push_str("GREATER"),
        Op::GreaterEqual => out.push_str("GREATER_EQUAL"),
        Op::Less => out.push_str("LESS"),
        Op::LessEqual => out.push_str("LESS_EQUAL"),

        Op::Not => out.push_str("NOT"),

        Op::BitAnd => out.push_str("BIT_AND"),
        Op::BitOr => out.push_str("BIT_OR"),
        Op::BitXor => out.push_str("BIT_XOR"),
        Op::BitNot => out.push_str("BIT_NOT"),
        Op::LShift => out.push_str("LSHIFT"),
        Op::RShift => out.push_str("RSHIFT"),

        Op::DefineGlobal(idx) => {
            out.push_str(&format!("DEF_GLOBAL   {:>5} ({})", idx, constant_string(chunk, *idx)));
        }
        Op::GetGlobal(idx) => {
            out.push_str(&format!("GET_GLOBAL   {:>5} ({})", idx, constant_string(chunk, *idx)));
        }
        Op::SetGlobal(idx) => {
            out.push_str(&format!("SET_GLOBAL   {:>5} ({})", idx, constant_string(chunk, *idx)));
        }

        Op::GetLocal(slot) => out.push_str(&format!("GET_LOCAL    {:>5}", slot)),
        Op::SetLocal(slot) => out.push_str(&format!("SET_LOCAL    {:>5}", slot)),
        Op::IncLocal(slot) => out.push_str(&format!("INC_LOCAL    {:>5}", slot)),

        Op::GetUpvalue(idx) => out.push_str(&format!("GET_UPVALUE  {:>5}", idx)),
        Op::SetUpvalue(idx) => out.push_str(&format!("SET_UPVALUE  {:>5}", idx)),
        Op::CloseUpvalue => out.push_str("CLOSE_UPVALUE"),

        Op::Jump(offset) => out.push_str(&format!("JUMP         {:>5}", offset)),
        Op::JumpIfFalse(offset) => out.push_str(&format!("JUMP_IF_FALSE{:>5}", offset)),
        Op::JumpIfTrue(offset) => out.push_str(&format!("JUMP_IF_TRUE {:>5}", offset)),
        Op::Loop(offset) => out.push_str(&format!("LOOP         {:>5}", offset)),

        Op::Call(argc) => out.push_str(&format!("CALL         {:>5}", argc)),
        Op::Closure(idx) => {
            let val = chunk.constants.get(*idx as usize);
            out.push_str(&format!("CLOSURE      {:>5} ({})", idx, format_constant(val)));
        }
        Op::Return => out.push_str("RETURN"),

        Op::Array(n) => out.push_str(&format!("ARRAY        {:>5}", n)),
        Op::Object(n) => out.push_str(&format!("OBJECT       {:>5}", n)),
        Op::GetIndex => out.push_str("GET_INDEX"),
        Op::SetIndex => out.push_str("SET_INDEX"),

        Op::GetProperty(idx) => {
            out.push_str(&format!("GET_PROPERTY {:>5} ({})", idx, constant_string(chunk, *idx)));
        }
        Op::SetProperty(idx) => {
            out.push_str(&format!("SET_PROPERTY {:>5} ({})", idx, constant_string(chunk, *idx)));
        }
        Op::Class(idx) => {
            out.push_str(&format!("CLASS        {:>5} ({})", idx, constant_string(chunk, *idx)));
        }
        Op::Method(idx) => {
            out.push_str(&format!("METHOD       {:>5} ({})", idx, constant_string(chunk, *idx)));
        }

        Op::Print => out.push_str("PRINT"),
    }
}

fn constant_string(chunk: &Chunk, idx: u16) -> String {
    match chunk.constants.get(idx as usize) {
        Some(Constant::String(s)) => s.clone(),
        _ => format!("?{idx}"),
    }
}

fn format_constant(val: Option<&Constant>) -> String {
    match val {
        Some(Constant::Number(n)) => format!("{n}"),
        Some(Constant::String(s)) => format!("\"{s}\""),
        Some(Constant::Function(f)) => format!("<fn {}>", f.name),
        None => "???".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;
    use crate::parser::Parser;
    use crate::vm::compiler::Compiler;

    fn compile(source: &str) -> std::rc::Rc<FunctionProto> {
        let tokens = Scanner::new(source).scan_tokens().expect("lex error");
        let program = Parser::new(tokens).parse().expect("parse error");
        Compiler::compile(&program).expect("compile error").main
    }

    #[test]
    fn dedups_repeated_number_constant_in_output() {
        let proto = compile("da 7\nda 7\n");
        let text = disassemble(&proto);
        assert_eq!(text.matches("CONSTANT").count(), 1);
    }

    #[test]
    fn names_nested_function_prototypes() {
        let proto = compile("kian add(a, b)\n  kuun a + b\njob\n");
        let text = disassemble(&proto);
        assert!(text.contains("== add"));
    }
}
