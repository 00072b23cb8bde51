//! Demonstration natives exercising the host registration protocol
//! (spec.md §6 "Host-registered natives", SPEC_FULL.md A.7).
//!
//! These are fixtures for the protocol, not a standard library: spec.md
//! explicitly scopes network/file/crypto semantics out, so every native
//! registered here has zero I/O surface.

use std::time::{SystemTime, UNIX_EPOCH};

use super::value::{Native, Value};

/// `clock()` — seconds since the Unix epoch, as a Number.
fn clock(args: &[Value]) -> Result<Value, String> {
    if !args.is_empty() {
        return Err(format!("clock() takes no arguments, got {}", args.len()));
    }
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    Ok(Value::Number(secs))
}

/// `len(v)` — element count of an Array, code-point count of a String, or
/// key count of an Object.
fn len(args: &[Value]) -> Result<Value, String> {
    match args {
        [Value::Array(items)] => Ok(Value::Number(items.borrow().len() as f64)),
        [Value::String(s)] => Ok(Value::Number(s.chars().count() as f64)),
        [Value::Object(map)] => Ok(Value::Number(map.borrow().len() as f64)),
        [other] => Err(format!("len() has no meaning for {}", other.type_name())),
        _ => Err(format!("len() takes exactly 1 argument, got {}", args.len())),
    }
}

/// `type_of(v)` — the runtime type name of a Value (spec.md §3.1 variants).
fn type_of(args: &[Value]) -> Result<Value, String> {
    match args {
        [v] => Ok(Value::string(v.type_name())),
        _ => Err(format!("type_of() takes exactly 1 argument, got {}", args.len())),
    }
}

/// The demonstration natives table, registered into a fresh `Vm` by the
/// host (the CLI's `Vm::new()` call site).
pub fn standard_natives() -> Vec<Native> {
    vec![
        Native {
            name: "clock".to_string(),
            arity: Some(0),
            invoke: Box::new(clock),
        },
        Native {
            name: "len".to_string(),
            arity: Some(1),
            invoke: Box::new(len),
        },
        Native {
            name: "type_of".to_string(),
            arity: Some(1),
            invoke: Box::new(type_of),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_reports_array_element_count() {
        let arr = Value::array(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(len(&[arr]), Ok(Value::Number(2.0)));
    }

    #[test]
    fn len_reports_string_code_point_count() {
        assert_eq!(len(&[Value::string("abc")]), Ok(Value::Number(3.0)));
    }

    #[test]
    fn type_of_names_every_variant() {
        assert_eq!(type_of(&[Value::Nil]), Ok(Value::string("nil")));
        assert_eq!(type_of(&[Value::Number(1.0)]), Ok(Value::string("number")));
        assert_eq!(type_of(&[Value::Bool(true)]), Ok(Value::string("bool")));
    }

    #[test]
    fn clock_takes_no_arguments() {
        assert!(clock(&[Value::Nil]).is_err());
        assert!(clock(&[]).is_ok());
    }
}
