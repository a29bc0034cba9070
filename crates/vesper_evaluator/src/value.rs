//! Run-time values.

use std::fmt;
use std::rc::Rc;
use vesper_core::intern::StringInterner;
use vesper_ir::{BoundConstant, TypeSymbol};

/// A run-time value. Strings are reference-counted so reads and assignments
/// never copy the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// The result of a statement with no value.
    Unit,
    Int(i64),
    Bool(bool),
    String(Rc<str>),
}

impl Value {
    pub fn ty(&self) -> TypeSymbol {
        match self {
            Value::Unit => TypeSymbol::Void,
            Value::Int(_) => TypeSymbol::Int,
            Value::Bool(_) => TypeSymbol::Bool,
            Value::String(_) => TypeSymbol::String,
        }
    }

    pub fn from_constant(constant: BoundConstant, interner: &StringInterner) -> Value {
        match constant {
            BoundConstant::Int(v) => Value::Int(v),
            BoundConstant::Bool(v) => Value::Bool(v),
            BoundConstant::String(s) => Value::String(Rc::from(interner.resolve(s))),
        }
    }

    pub fn as_int(&self) -> i64 {
        match self {
            Value::Int(v) => *v,
            other => panic!("expected Int, got {}", other.ty()),
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(v) => *v,
            other => panic!("expected Bool, got {}", other.ty()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => Ok(()),
            Value::Int(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::String(s) => f.write_str(s),
        }
    }
}
