//! Property access and class/method wiring (spec.md §4.2 "Class/Method/Property").

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::span::Span;

use super::upvalue::VmClosure;
use super::value::{ClassData, InstanceData, Value};
use super::vm::Vm;

impl Vm {
    /// `GET_PROPERTY` — field wins over method on an Instance; Object looks
    /// up the String key directly; anything else faults.
    pub fn op_get_property(
        &self,
        object: &Value,
        name: &str,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        match object {
            Value::Instance(inst) => {
                let inst_ref = inst.borrow();
                if let Some(val) = inst_ref.fields.get(name) {
                    return Ok(val.clone());
                }
                if let Some(method) = inst_ref.class.borrow().methods.get(name) {
                    return Ok(Value::BoundMethod(Rc::new(super::value::BoundMethod {
                        receiver: inst.clone(),
                        method: method.clone(),
                    })));
                }
                Err(RuntimeError::UndefinedProperty {
                    value_type: inst_ref.class.borrow().name.clone(),
                    property: name.to_string(),
                    span,
                })
            }
            Value::Object(map) => Ok(map.borrow().get(name).cloned().unwrap_or(Value::Nil)),
            _ => Err(RuntimeError::UndefinedProperty {
                value_type: object.type_name().to_string(),
                property: name.to_string(),
                span,
            }),
        }
    }

    /// `SET_PROPERTY` — Instance sets a field (creating it on first write);
    /// Object sets a key; anything else faults.
    pub fn op_set_property(
        &self,
        object: &Value,
        name: &str,
        value: Value,
        span: Span,
    ) -> Result<(), RuntimeError> {
        match object {
            Value::Instance(inst) => {
                inst.borrow_mut().fields.insert(name.to_string(), value);
                Ok(())
            }
            Value::Object(map) => {
                map.borrow_mut().insert(name.to_string(), value);
                Ok(())
            }
            _ => Err(RuntimeError::type_error(
                format!("cannot set property '{name}' on {}", object.type_name()),
                span,
            )),
        }
    }

    /// `CLASS c` — push a fresh, method-less Class.
    pub fn op_class(&mut self, name: String) {
        self.push(Value::Class(Rc::new(RefCell::new(ClassData::new(name)))));
    }

    /// `METHOD c` — pop a Closure, attach it to the Class now on top of the
    /// stack under the given name.
    pub fn op_method(&mut self, name: String, span: Span) -> Result<(), RuntimeError> {
        let method = self.pop(span)?;
        let closure = match method {
            Value::Closure(c) => c,
            other => {
                return Err(RuntimeError::type_error(
                    format!("expected a compiled function for method '{name}', got {}", other.type_name()),
                    span,
                ));
            }
        };
        match self.peek(0) {
            Value::Class(class) => {
                class.borrow_mut().methods.insert(name, closure);
                Ok(())
            }
            other => Err(RuntimeError::type_error(
                format!("expected a class to attach method '{name}' to, got {}", other.type_name()),
                span,
            )),
        }
    }

    /// Build a fresh Instance for a Class callee (spec.md §4.2 "Call
    /// protocol", Class callee).
    pub fn new_instance(class: &Rc<RefCell<ClassData>>) -> Rc<RefCell<InstanceData>> {
        Rc::new(RefCell::new(InstanceData::new(class.clone())))
    }

    pub fn find_initializer(class: &Rc<RefCell<ClassData>>) -> Option<Rc<VmClosure>> {
        class
            .borrow()
            .methods
            .get(super::compiler_classes::INITIALIZER_NAME)
            .cloned()
    }
}
