//! The bytecode virtual machine — stack-based execution engine (spec.md §4.2).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::span::Span;

use super::chunk::{Constant, FunctionProto};
use super::opcode::Op;
use super::upvalue::{Upvalue, VmClosure};
use super::value::{ObjectMap, Value};

/// A call frame on the VM call stack (spec.md §3.4).
pub struct CallFrame {
    pub closure: Rc<VmClosure>,
    pub ip: usize,
    /// Index into the value stack where this frame's locals begin. Slot 0
    /// is the callee itself, or for methods, the receiver.
    pub stack_base: usize,
}

/// The bytecode VM. One `Vm` runs one top-level Function to completion or
/// to the first runtime fault (spec.md §4.2).
pub struct Vm {
    pub stack: Vec<Value>,
    pub frames: Vec<CallFrame>,
    pub globals: HashMap<String, Value>,
    /// Open upvalues keyed by the stack slot they point at — at most one
    /// handle per live slot (spec.md §3.3).
    pub open_upvalues: Vec<Rc<RefCell<Upvalue>>>,
    /// Host-supplied output sink, invoked once per `PRINT` (spec.md §6).
    pub output_sink: Box<dyn FnMut(&str)>,
}

impl Vm {
    pub const MAX_STACK: usize = 4096;
    pub const MAX_FRAMES: usize = 256;

    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(256),
            frames: Vec::with_capacity(64),
            globals: HashMap::new(),
            open_upvalues: Vec::new(),
            output_sink: Box::new(|line| println!("{line}")),
        }
    }

    /// Register a host-supplied output sink, replacing the default
    /// `println!`-based one.
    pub fn with_output_sink(mut self, sink: impl FnMut(&str) + 'static) -> Self {
        self.output_sink = Box::new(sink);
        self
    }

    /// Register the host's natives table into globals (spec.md §6 "Host-
    /// registered natives").
    pub fn register_native(&mut self, native: super::value::Native) {
        self.globals
            .insert(native.name.clone(), Value::Native(Rc::new(native)));
    }

    /// Execute a compiled module (top-level script).
    pub fn execute(&mut self, proto: &Rc<FunctionProto>) -> Result<Value, RuntimeError> {
        let closure = Rc::new(VmClosure::new(proto.clone(), Vec::new()));
        self.push(Value::Closure(closure.clone()));
        self.frames.push(CallFrame {
            closure,
            ip: 0,
            stack_base: 0,
        });
        self.run()
    }

    /// Run the dispatch loop.
    pub fn run(&mut self) -> Result<Value, RuntimeError> {
        loop {
            let frame_idx = self.frames.len() - 1;
            let ip = self.frames[frame_idx].ip;
            let chunk_len = self.frames[frame_idx].closure.proto.chunk.code.len();

            if ip >= chunk_len {
                return Ok(Value::Nil);
            }

            let op = self.frames[frame_idx].closure.proto.chunk.code[ip];
            let line = self.frames[frame_idx]
                .closure
                .proto
                .chunk
                .lines
                .get(ip)
                .copied()
                .unwrap_or(0);
            let span = Span::new(line, 0);
            self.frames[frame_idx].ip += 1;

            match op {
                Op::Constant(idx) => {
                    let value = self.read_constant(frame_idx, idx);
                    self.push(value);
                }
                Op::Null => self.push(Value::Nil),
                Op::True => self.push(Value::Bool(true)),
                Op::False => self.push(Value::Bool(false)),
                Op::LoadZero => self.push(Value::Number(0.0)),
                Op::LoadOne => self.push(Value::Number(1.0)),

                Op::Pop => {
                    self.pop(span)?;
                }
                Op::Dup => {
                    let top = self.peek(0).clone();
                    self.push(top);
                }
                Op::Swap => {
                    let len = self.stack.len();
                    self.stack.swap(len - 1, len - 2);
                }

                Op::GetLocal(slot) => {
                    let base = self.frames[frame_idx].stack_base;
                    let val = self.stack[base + slot as usize].clone();
                    self.push(val);
                }
                Op::SetLocal(slot) => {
                    let val = self.peek(0).clone();
                    let base = self.frames[frame_idx].stack_base;
                    self.stack[base + slot as usize] = val;
                }
                Op::IncLocal(slot) => {
                    let base = self.frames[frame_idx].stack_base;
                    let target = base + slot as usize;
                    match &self.stack[target] {
                        Value::Number(n) => self.stack[target] = Value::Number(n + 1.0),
                        other => {
                            return Err(RuntimeError::type_error(
                                format!("cannot increment {}", other.type_name()),
                                span,
                            ));
                        }
                    }
                }

                Op::GetGlobal(idx) => {
                    let name = self.read_string_constant(frame_idx, idx);
                    match self.globals.get(&name) {
                        Some(val) => self.push(val.clone()),
                        None => return Err(RuntimeError::UndefinedVariable(name, span)),
                    }
                }
                Op::SetGlobal(idx) => {
                    let name = self.read_string_constant(frame_idx, idx);
                    let val = self.peek(0).clone();
                    match self.globals.entry(name.clone()) {
                        std::collections::hash_map::Entry::Occupied(mut e) => {
                            e.insert(val);
                        }
                        std::collections::hash_map::Entry::Vacant(_) => {
                            return Err(RuntimeError::UndefinedVariable(name, span));
                        }
                    }
                }
                Op::DefineGlobal(idx) => {
                    let name = self.read_string_constant(frame_idx, idx);
                    let val = self.pop(span)?;
                    self.globals.insert(name, val);
                }

                Op::GetUpvalue(idx) => {
                    let upvalue = self.frames[frame_idx].closure.upvalues[idx as usize].clone();
                    let val = match &*upvalue.borrow() {
                        Upvalue::Open(slot) => self.stack[*slot].clone(),
                        Upvalue::Closed(val) => val.clone(),
                    };
                    self.push(val);
                }
                Op::SetUpvalue(idx) => {
                    let val = self.peek(0).clone();
                    let upvalue = self.frames[frame_idx].closure.upvalues[idx as usize].clone();
                    match &mut *upvalue.borrow_mut() {
                        Upvalue::Open(slot) => self.stack[*slot] = val,
                        Upvalue::Closed(v) => *v = val,
                    }
                }
                Op::CloseUpvalue => {
                    let slot = self.stack.len() - 1;
                    self.close_upvalues(slot);
                    self.pop(span)?;
                }

                // --- Arithmetic ---
                Op::Add => {
                    let b = self.pop(span)?;
                    let a = self.pop(span)?;
                    self.push(self.op_add(a, b, span)?);
                }
                Op::Subtract => {
                    let (a, b) = self.pop_numeric_pair("subtract", span)?;
                    self.push(Value::Number(a - b));
                }
                Op::Multiply => {
                    let (a, b) = self.pop_numeric_pair("multiply", span)?;
                    self.push(Value::Number(a * b));
                }
                Op::Divide => {
                    let (a, b) = self.pop_numeric_pair("divide", span)?;
                    if b == 0.0 {
                        return Err(RuntimeError::DivisionByZero(span));
                    }
                    self.push(Value::Number(a / b));
                }
                Op::Modulo => {
                    let (a, b) = self.pop_numeric_pair("modulo", span)?;
                    if b == 0.0 {
                        return Err(RuntimeError::DivisionByZero(span));
                    }
                    self.push(Value::Number(a % b));
                }
                Op::Power => {
                    let (a, b) = self.pop_numeric_pair("exponentiate", span)?;
                    self.push(Value::Number(a.powf(b)));
                }
                Op::Negate => {
                    let val = self.pop(span)?;
                    match val {
                        Value::Number(n) => self.push(Value::Number(-n)),
                        other => {
                            return Err(RuntimeError::type_error(
                                format!("cannot negate {}", other.type_name()),
                                span,
                            ));
                        }
                    }
                }

                // --- Comparison ---
                Op::Equal => {
                    let b = self.pop(span)?;
                    let a = self.pop(span)?;
                    self.push(Value::Bool(a == b));
                }
                Op::NotEqual => {
                    let b = self.pop(span)?;
                    let a = self.pop(span)?;
                    self.push(Value::Bool(a != b));
                }
                Op::Less => {
                    let (a, b) = self.pop_numeric_pair("compare", span)?;
                    self.push(Value::Bool(a < b));
                }
                Op::LessEqual => {
                    let (a, b) = self.pop_numeric_pair("compare", span)?;
                    self.push(Value::Bool(a <= b));
                }
                Op::Greater => {
                    let (a, b) = self.pop_numeric_pair("compare", span)?;
                    self.push(Value::Bool(a > b));
                }
                Op::GreaterEqual => {
                    let (a, b) = self.pop_numeric_pair("compare", span)?;
                    self.push(Value::Bool(a >= b));
                }

                Op::Not => {
                    let val = self.pop(span)?;
                    self.push(Value::Bool(!val.is_truthy()));
                }

                // --- Bitwise (32-bit two's-complement, spec.md §9 open question) ---
                Op::BitAnd => {
                    let (a, b) = self.pop_bitwise_pair(span)?;
                    self.push(Value::Number((a & b) as f64));
                }
                Op::BitOr => {
                    let (a, b) = self.pop_bitwise_pair(span)?;
                    self.push(Value::Number((a | b) as f64));
                }
                Op::BitXor => {
                    let (a, b) = self.pop_bitwise_pair(span)?;
                    self.push(Value::Number((a ^ b) as f64));
                }
                Op::LShift => {
                    let (a, b) = self.pop_bitwise_pair(span)?;
                    self.push(Value::Number((a.wrapping_shl(b as u32 & 31)) as f64));
                }
                Op::RShift => {
                    let (a, b) = self.pop_bitwise_pair(span)?;
                    self.push(Value::Number((a.wrapping_shr(b as u32 & 31)) as f64));
                }
                Op::BitNot => {
                    let val = self.pop(span)?;
                    match val {
                        Value::Number(n) => self.push(Value::Number(!to_i32(n) as f64)),
                        other => {
                            return Err(RuntimeError::type_error(
                                format!("cannot bitwise-negate {}", other.type_name()),
                                span,
                            ));
                        }
                    }
                }

                // --- Control flow ---
                Op::Jump(offset) => {
                    self.frames[frame_idx].ip += offset as usize;
                }
                Op::JumpIfFalse(offset) => {
                    if !self.peek(0).is_truthy() {
                        self.frames[frame_idx].ip += offset as usize;
                    }
                }
                Op::JumpIfTrue(offset) => {
                    if self.peek(0).is_truthy() {
                        self.frames[frame_idx].ip += offset as usize;
                    }
                }
                Op::Loop(offset) => {
                    self.frames[frame_idx].ip -= offset as usize;
                }

                // --- Functions ---
                Op::Call(argc) => {
                    self.call_value(argc as usize, span)?;
                }
                Op::Closure(idx) => {
                    let constant =
                        self.frames[frame_idx].closure.proto.chunk.constants[idx as usize].clone();
                    let Constant::Function(proto) = constant else {
                        return Err(RuntimeError::general(
                            "CLOSURE operand is not a compiled function",
                            span,
                        ));
                    };
                    let mut upvalues = Vec::with_capacity(proto.upvalue_descriptors.len());
                    for desc in &proto.upvalue_descriptors {
                        if desc.is_local {
                            let slot = self.frames[frame_idx].stack_base + desc.index as usize;
                            upvalues.push(self.capture_upvalue(slot));
                        } else {
                            upvalues.push(
                                self.frames[frame_idx].closure.upvalues[desc.index as usize]
                                    .clone(),
                            );
                        }
                    }
                    self.push(Value::Closure(Rc::new(VmClosure::new(proto, upvalues))));
                }
                Op::Return => {
                    let popped = self.pop(span)?;
                    let frame = self.frames.pop().unwrap();
                    let result = if frame.closure.proto.is_initializer {
                        self.stack[frame.stack_base].clone()
                    } else {
                        popped
                    };
                    self.close_upvalues(frame.stack_base);
                    self.stack.truncate(frame.stack_base);

                    if self.frames.is_empty() {
                        return Ok(result);
                    }
                    self.push(result);
                }

                // --- Collections ---
                Op::Array(n) => {
                    let mut elements = Vec::with_capacity(n as usize);
                    for _ in 0..n {
                        elements.push(self.pop(span)?);
                    }
                    elements.reverse();
                    self.push(Value::array(elements));
                }
                Op::Object(n) => {
                    let mut pairs = Vec::with_capacity(n as usize);
                    for _ in 0..n {
                        let value = self.pop(span)?;
                        let key = self.pop(span)?;
                        pairs.push((key, value));
                    }
                    pairs.reverse();
                    let mut map = ObjectMap::default();
                    for (key, value) in pairs {
                        let key_str = match key {
                            Value::String(s) => s.to_string(),
                            other => {
                                return Err(RuntimeError::type_error(
                                    format!("object keys must be strings, got {}", other.type_name()),
                                    span,
                                ));
                            }
                        };
                        map.insert(key_str, value);
                    }
                    self.push(Value::object(map));
                }
                Op::GetIndex => {
                    let index = self.pop(span)?;
                    let object = self.pop(span)?;
                    let result = self.op_get_index(&object, &index, span)?;
                    self.push(result);
                }
                Op::SetIndex => {
                    let value = self.pop(span)?;
                    let index = self.pop(span)?;
                    let object = self.pop(span)?;
                    self.op_set_index(&object, &index, value.clone(), span)?;
                    self.push(value);
                }

                // --- Objects / classes ---
                Op::GetProperty(idx) => {
                    let name = self.read_string_constant(frame_idx, idx);
                    let object = self.pop(span)?;
                    let result = self.op_get_property(&object, &name, span)?;
                    self.push(result);
                }
                Op::SetProperty(idx) => {
                    let name = self.read_string_constant(frame_idx, idx);
                    let value = self.pop(span)?;
                    let object = self.pop(span)?;
                    self.op_set_property(&object, &name, value.clone(), span)?;
                    self.push(value);
                }
                Op::Class(idx) => {
                    let name = self.read_string_constant(frame_idx, idx);
                    self.op_class(name);
                }
                Op::Method(idx) => {
                    let name = self.read_string_constant(frame_idx, idx);
                    self.op_method(name, span)?;
                }

                // --- I/O ---
                Op::Print => {
                    let val = self.pop(span)?;
                    let text = val.stringify();
                    (self.output_sink)(&text);
                }
            }

            if self.stack.len() > Self::MAX_STACK {
                return Err(RuntimeError::StackOverflow(span));
            }
        }
    }

    // --- Stack operations ---

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    /// Pop the top value off the stack, faulting rather than panicking if
    /// the stack is already empty (spec.md §7 "Resource": "value-stack
    /// overflow/underflow" is a runtime fault routed through the host
    /// fault hook, not a process abort).
    #[inline]
    pub fn pop(&mut self, span: Span) -> Result<Value, RuntimeError> {
        self.stack
            .pop()
            .ok_or(RuntimeError::StackUnderflow(span))
    }

    #[inline]
    pub fn peek(&self, distance: usize) -> &Value {
        &self.stack[self.stack.len() - 1 - distance]
    }

    // --- Helpers ---

    fn read_constant(&self, frame_idx: usize, idx: u16) -> Value {
        match &self.frames[frame_idx].closure.proto.chunk.constants[idx as usize] {
            Constant::Number(n) => Value::Number(*n),
            Constant::String(s) => Value::string(s.as_str()),
            Constant::Function(proto) => {
                Value::Closure(Rc::new(VmClosure::new(proto.clone(), Vec::new())))
            }
        }
    }

    fn read_string_constant(&self, frame_idx: usize, idx: u16) -> String {
        match &self.frames[frame_idx].closure.proto.chunk.constants[idx as usize] {
            Constant::String(s) => s.clone(),
            other => panic!("expected string constant, found {other:?}"),
        }
    }

    fn pop_numeric_pair(&mut self, verb: &str, span: Span) -> Result<(f64, f64), RuntimeError> {
        let b = self.pop(span)?;
        let a = self.pop(span)?;
        match (&a, &b) {
            (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
            _ => Err(RuntimeError::type_error(
                format!("cannot {verb} {} and {}", a.type_name(), b.type_name()),
                span,
            )),
        }
    }

    fn pop_bitwise_pair(&mut self, span: Span) -> Result<(i32, i32), RuntimeError> {
        let (a, b) = self.pop_numeric_pair("apply a bitwise operator to", span)?;
        Ok((to_i32(a), to_i32(b)))
    }

    fn capture_upvalue(&mut self, slot: usize) -> Rc<RefCell<Upvalue>> {
        for uv in &self.open_upvalues {
            if let Upvalue::Open(s) = &*uv.borrow() {
                if *s == slot {
                    return uv.clone();
                }
            }
        }
        let upvalue = Rc::new(RefCell::new(Upvalue::Open(slot)));
        self.open_upvalues.push(upvalue.clone());
        upvalue
    }

    /// Close every open upvalue at or above `from_slot` (spec.md §4.2
    /// "Upvalue closing discipline").
    pub fn close_upvalues(&mut self, from_slot: usize) {
        let mut i = 0;
        while i < self.open_upvalues.len() {
            let slot = match &*self.open_upvalues[i].borrow() {
                Upvalue::Open(slot) => Some(*slot),
                Upvalue::Closed(_) => None,
            };
            match slot {
                Some(slot) if slot >= from_slot => {
                    let upvalue = self.open_upvalues.remove(i);
                    let value = self.stack[slot].clone();
                    *upvalue.borrow_mut() = Upvalue::Closed(value);
                }
                _ => i += 1,
            }
        }
    }

    // --- Arithmetic / indexing helpers ---

    fn op_add(&self, a: Value, b: Value, span: Span) -> Result<Value, RuntimeError> {
        match (&a, &b) {
            (Value::Number(x), Value::Number(y)) => Ok(Value::Number(x + y)),
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::string(format!("{}{}", a.stringify(), b.stringify())))
            }
            _ => Err(RuntimeError::type_error(
                format!("cannot add {} and {}", a.type_name(), b.type_name()),
                span,
            )),
        }
    }

    fn op_get_index(&self, object: &Value, index: &Value, span: Span) -> Result<Value, RuntimeError> {
        match object {
            Value::Array(arr) => {
                let arr = arr.borrow();
                match array_index(index, arr.len()) {
                    Some(i) => Ok(arr[i].clone()),
                    None => Ok(Value::Nil),
                }
            }
            Value::Object(map) => {
                let key = index.stringify();
                Ok(map.borrow().get(&key).cloned().unwrap_or(Value::Nil))
            }
            Value::String(s) => {
                let chars: Vec<char> = s.chars().collect();
                match array_index(index, chars.len()) {
                    Some(i) => Ok(Value::string(chars[i].to_string())),
                    None => Ok(Value::Nil),
                }
            }
            _ => Err(RuntimeError::type_error(
                format!("cannot index {} with {}", object.type_name(), index.type_name()),
                span,
            )),
        }
    }

    fn op_set_index(
        &self,
        object: &Value,
        index: &Value,
        value: Value,
        span: Span,
    ) -> Result<(), RuntimeError> {
        match object {
            Value::Array(arr) => {
                let mut arr = arr.borrow_mut();
                match array_index(index, arr.len()) {
                    Some(i) => {
                        arr[i] = value;
                        Ok(())
                    }
                    None => Err(RuntimeError::type_error(
                        format!("array index {} out of range (length {})", index.stringify(), arr.len()),
                        span,
                    )),
                }
            }
            Value::Object(map) => {
                map.borrow_mut().insert(index.stringify(), value);
                Ok(())
            }
            Value::String(_) => Err(RuntimeError::type_error(
                "cannot write into a String by index",
                span,
            )),
            _ => Err(RuntimeError::type_error(
                format!("cannot set index on {}", object.type_name()),
                span,
            )),
        }
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

fn to_i32(n: f64) -> i32 {
    n as i64 as i32
}

fn array_index(index: &Value, len: usize) -> Option<usize> {
    match index {
        Value::Number(n) if *n >= 0.0 => {
            let i = *n as usize;
            if i < len {
                Some(i)
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;
    use crate::parser::Parser;
    use crate::vm::compiler::Compiler;

    fn run(source: &str) -> (Value, Vec<String>) {
        let tokens = Scanner::new(source).scan_tokens().expect("lex error");
        let program = Parser::new(tokens).parse().expect("parse error");
        let module = Compiler::compile(&program).expect("compile error");
        let output = Rc::new(RefCell::new(Vec::new()));
        let sink_output = output.clone();
        let mut vm = Vm::new().with_output_sink(move |line| sink_output.borrow_mut().push(line.to_string()));
        let result = vm.execute(&module.main).expect("runtime error");
        let lines = Rc::try_unwrap(output).unwrap().into_inner();
        (result, lines)
    }

    fn global(source: &str, name: &str) -> Value {
        let tokens = Scanner::new(source).scan_tokens().expect("lex error");
        let program = Parser::new(tokens).parse().expect("parse error");
        let module = Compiler::compile(&program).expect("compile error");
        let mut vm = Vm::new();
        vm.execute(&module.main).expect("runtime error");
        vm.globals.get(name).cloned().unwrap_or(Value::Nil)
    }

    #[test]
    fn arithmetic_and_variables() {
        let (_, lines) = run("ao x = 10\nda x + 5\n");
        assert_eq!(lines, vec!["15"]);
    }

    #[test]
    fn while_loop_and_mutation() {
        let (_, lines) = run("ao i = 0\nwonn i < 3\n  da i\n  i = i + 1\njob\n");
        assert_eq!(lines, vec!["0", "1", "2"]);
    }

    #[test]
    fn closure_capture_sharing() {
        let (_, lines) = run(
            "kian make()\n  ao n = 0\n  kuun kian()\n    n = n + 1\n    kuun n\n  job\njob\nao c = make()\nda c()\nda c()\n",
        );
        assert_eq!(lines, vec!["1", "2"]);
    }

    #[test]
    fn class_with_initializer_and_method() {
        let (_, lines) = run(
            "klum Box\n  kian sang(v)\n    ni.v = v\n  job\n  kian get()\n    kuun ni.v\n  job\njob\nao b = mai Box(7)\nda b.get()\n",
        );
        assert_eq!(lines, vec!["7"]);
    }

    #[test]
    fn class_declared_inside_function_scope_is_usable() {
        let (_, lines) = run(
            "kian make_box()\n  klum Box\n    kian sang(v)\n      ni.v = v\n    job\n    kian get()\n      kuun ni.v\n    job\n  job\n  kuun mai Box(9)\njob\nao b = make_box()\nda b.get()\n",
        );
        assert_eq!(lines, vec!["9"]);
    }

    #[test]
    fn division_by_zero_faults() {
        let tokens = Scanner::new("da 1 / 0\n").scan_tokens().unwrap();
        let program = Parser::new(tokens).parse().unwrap();
        let module = Compiler::compile(&program).unwrap();
        let mut vm = Vm::new();
        let err = vm.execute(&module.main).unwrap_err();
        assert!(matches!(err, RuntimeError::DivisionByZero(_)));
    }

    #[test]
    fn switch_does_not_fall_through() {
        let (_, lines) = run(
            "ao x = 2\ncheek x\n  karani 1: da \"one\"\n  karani 2: da \"two\"\n  karani 3: da \"three\"\njob\n",
        );
        assert_eq!(lines, vec!["two"]);
    }

    #[test]
    fn constant_pool_deduplicates_repeated_literal() {
        let tokens = Scanner::new("da 7\nda 7\n").scan_tokens().unwrap();
        let program = Parser::new(tokens).parse().unwrap();
        let module = Compiler::compile(&program).unwrap();
        let number_constants = module
            .main
            .chunk
            .constants
            .iter()
            .filter(|c| matches!(c, Constant::Number(n) if *n == 7.0))
            .count();
        assert_eq!(number_constants, 1);
    }

    #[test]
    fn scope_pop_restores_stack_depth() {
        let tokens = Scanner::new("ao x = 1\nwonn x < 5\n  ao y = x\n  x = y + 1\njob\n")
            .scan_tokens()
            .unwrap();
        let program = Parser::new(tokens).parse().unwrap();
        let module = Compiler::compile(&program).unwrap();
        let mut vm = Vm::new();
        vm.execute(&module.main).unwrap();
        assert!(vm.stack.is_empty());
    }

    #[test]
    fn equality_is_reflexive_for_every_variant() {
        assert_eq!(global("ao x = 3 == 3", "x"), Value::Bool(true));
        assert_eq!(global("ao x = \"a\" == \"a\"", "x"), Value::Bool(true));
        assert_eq!(global("ao x = wang == wang", "x"), Value::Bool(true));
    }
}
