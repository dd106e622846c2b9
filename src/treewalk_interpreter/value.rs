use super::errors::{RuntimeError, RuntimeResult};
use super::function::LangFn;
use super::native_function::NativeFn;
use crate::frontend::grammar::BinaryOperator;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Value produced by evaluation. `None` payloads stand for an uninitialized
/// number or boolean and display as `undefined`.
#[derive(Debug, PartialEq, Clone)]
pub enum RuntimeValue {
    Null,
    Boolean(Option<bool>),
    Number(Option<Decimal>),
    String(String),
    Object(ObjectRef),
    NativeFunction(NativeFn),
    Function(LangFn),
}

/// Shared, mutable property map. Copies of a value alias the same object.
#[derive(Clone, Default)]
pub struct ObjectRef(Rc<RefCell<BTreeMap<String, RuntimeValue>>>);

impl ObjectRef {
    pub fn get(&self, key: &str) -> Option<RuntimeValue> {
        self.0.borrow().get(key).cloned()
    }

    /// Adds the property or replaces its value.
    pub fn set(&self, key: String, value: RuntimeValue) {
        self.0.borrow_mut().insert(key, value);
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    fn fmt_with(&self, f: &mut fmt::Formatter, seen: &mut Vec<*const ()>) -> fmt::Result {
        let ptr = Rc::as_ptr(&self.0) as *const ();
        if seen.contains(&ptr) {
            return write!(f, "{{...}}");
        }

        let properties = self.0.borrow();
        if properties.is_empty() {
            return write!(f, "{{}}");
        }

        seen.push(ptr);
        write!(f, "{{ ")?;
        for (i, (key, value)) in properties.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: ", key)?;
            match value {
                RuntimeValue::String(s) => write!(f, "\"{}\"", s.escape_debug())?,
                RuntimeValue::Object(nested) => nested.fmt_with(f, seen)?,
                other => write!(f, "{}", other)?,
            }
        }
        seen.pop();
        write!(f, " }}")
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_with(f, &mut vec![])
    }
}

impl PartialEq for ObjectRef {
    // Objects compare by identity, which also keeps cyclic objects comparable.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl RuntimeValue {
    pub fn number(n: impl Into<Decimal>) -> Self {
        RuntimeValue::Number(Some(n.into()))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            RuntimeValue::Null => "null",
            RuntimeValue::Boolean(_) => "boolean",
            RuntimeValue::Number(_) => "number",
            RuntimeValue::String(_) => "string",
            RuntimeValue::Object(_) => "object",
            RuntimeValue::NativeFunction(_) => "native function",
            RuntimeValue::Function(_) => "function",
        }
    }

    /// Arithmetic over two initialized numbers. Any other combination of
    /// operands yields `Null`.
    pub fn apply_binary_op(
        op: BinaryOperator,
        lhs: RuntimeValue,
        rhs: RuntimeValue,
    ) -> RuntimeResult<RuntimeValue> {
        let (a, b) = match (lhs, rhs) {
            (RuntimeValue::Number(Some(a)), RuntimeValue::Number(Some(b))) => (a, b),
            _ => return Ok(RuntimeValue::Null),
        };

        let result = match op {
            BinaryOperator::Add => a.checked_add(b).ok_or("overflow"),
            BinaryOperator::Subtract => a.checked_sub(b).ok_or("overflow"),
            BinaryOperator::Multiply => a.checked_mul(b).ok_or("overflow"),
            BinaryOperator::Divide if b.is_zero() => Err("division by zero"),
            BinaryOperator::Divide => a.checked_div(b).ok_or("overflow"),
            BinaryOperator::Modulo if b.is_zero() => Err("division by zero"),
            BinaryOperator::Modulo => a.checked_rem(b).ok_or("overflow"),
            BinaryOperator::Power => power(a, b),
        };

        result
            .map(RuntimeValue::number)
            .map_err(|reason| RuntimeError::Arithmetic {
                operator: op.symbol(),
                reason,
            })
    }
}

/// `^` goes through `f64`, so large operands lose precision.
fn power(base: Decimal, exponent: Decimal) -> Result<Decimal, &'static str> {
    let (base, exponent) = match (base.to_f64(), exponent.to_f64()) {
        (Some(base), Some(exponent)) => (base, exponent),
        _ => return Err("operand out of range"),
    };
    Decimal::from_f64(base.powf(exponent)).ok_or("result out of range")
}

impl fmt::Display for RuntimeValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuntimeValue::Null | RuntimeValue::Boolean(None) | RuntimeValue::Number(None) => {
                write!(f, "undefined")
            }
            RuntimeValue::Boolean(Some(b)) => write!(f, "{}", b),
            RuntimeValue::Number(Some(n)) => write!(f, "{}", n),
            RuntimeValue::String(s) => write!(f, "{}", s),
            RuntimeValue::Object(object) => object.fmt_with(f, &mut vec![]),
            RuntimeValue::NativeFunction(func) => write!(f, "<native fn {}>", func.name()),
            RuntimeValue::Function(func) => write!(f, "<fn {}>", func.name()),
        }
    }
}
