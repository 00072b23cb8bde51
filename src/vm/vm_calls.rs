//! Call dispatch (spec.md §4.2 "Call protocol").

use std::rc::Rc;

use crate::error::RuntimeError;
use crate::span::Span;

use super::value::Value;
use super::upvalue::VmClosure;
use super::vm::{CallFrame, Vm};

impl Vm {
    /// `CALL n` — the stack layout at dispatch is `[..., callee, arg1, ...,
    /// argN]`. `base` is the callee's slot.
    pub fn call_value(&mut self, argc: usize, span: Span) -> Result<(), RuntimeError> {
        let base = self.stack.len() - argc - 1;
        let callee = self.stack[base].clone();

        match callee {
            Value::Closure(closure) => self.call_closure(closure, base, argc, span),
            Value::Class(class) => self.call_class(&class, base, argc, span),
            Value::BoundMethod(bound) => {
                self.stack[base] = Value::Instance(bound.receiver.clone());
                self.call_closure(bound.method.clone(), base, argc, span)
            }
            Value::Native(native) => {
                let mut args = Vec::with_capacity(argc);
                for _ in 0..argc {
                    args.push(self.pop(span)?);
                }
                args.reverse();
                self.pop(span)?; // the callee
                let result = (native.invoke)(&args).map_err(|e| RuntimeError::general(e, span))?;
                self.push(result);
                Ok(())
            }
            _ => Err(RuntimeError::NotCallable(span)),
        }
    }

    fn call_closure(
        &mut self,
        closure: Rc<VmClosure>,
        base: usize,
        argc: usize,
        span: Span,
    ) -> Result<(), RuntimeError> {
        let arity = closure.proto.arity as usize;
        if argc != arity {
            return Err(RuntimeError::WrongArity {
                expected: arity,
                got: argc,
                span,
            });
        }
        if self.frames.len() >= Self::MAX_FRAMES {
            return Err(RuntimeError::FrameOverflow(span));
        }
        self.frames.push(CallFrame {
            closure,
            ip: 0,
            stack_base: base,
        });
        Ok(())
    }

    /// Class callee: synthesize an Instance, call its initializer (`sang`)
    /// if one exists, otherwise require zero arguments.
    fn call_class(
        &mut self,
        class: &Rc<std::cell::RefCell<super::value::ClassData>>,
        base: usize,
        argc: usize,
        span: Span,
    ) -> Result<(), RuntimeError> {
        let instance = Self::new_instance(class);
        self.stack[base] = Value::Instance(instance);

        match Self::find_initializer(class) {
            Some(initializer) => self.call_closure(initializer, base, argc, span),
            None => {
                if argc > 0 {
                    return Err(RuntimeError::WrongArity {
                        expected: 0,
                        got: argc,
                        span,
                    });
                }
                Ok(())
            }
        }
    }
}
