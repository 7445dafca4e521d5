//! Runtime values.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::json;

use crate::ast::Stmt;
use crate::env::Env;
use crate::eval::RuntimeError;

#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Null,
    Number(f64),
    Bool(bool),
    Object(Rc<BTreeMap<String, Value>>),
    Function(Rc<Function>),
    Native(NativeFunction),
}

/// User function: a closure over the frame it was declared in.
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub env: Rc<Env>,
    pub body: Rc<[Stmt]>,
}

// The captured frame is left out: it usually holds the function itself.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

/// Signature of host callbacks: evaluated arguments and the calling frame.
pub type NativeFn = dyn Fn(&[Value], &Rc<Env>) -> Result<Value, RuntimeError>;

#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    pub call: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: &str, call: F) -> NativeFunction
    where
        F: Fn(&[Value], &Rc<Env>) -> Result<Value, RuntimeError> + 'static,
    {
        NativeFunction {
            name: name.to_string(),
            call: Rc::new(call),
        }
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish()
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.call, &other.call)
    }
}

impl Value {
    pub fn object(properties: BTreeMap<String, Value>) -> Value {
        Value::Object(Rc::new(properties))
    }

    /// Name of the value kind, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::Native(_) => "native function",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// JSON view of the value, for tooling that serializes results.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Number(n) => json!(n),
            Value::Bool(b) => json!(b),
            Value::Object(props) => serde_json::Value::Object(
                props
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Function(func) => json!({ "fn": func.name, "params": func.params }),
            Value::Native(native) => json!(format!("[native fn {}]", native.name)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Object(props) => {
                if props.is_empty() {
                    return write!(f, "{{}}");
                }
                write!(f, "{{ ")?;
                for (i, (key, value)) in props.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, " }}")
            }
            Value::Function(func) => write!(f, "fn {}({})", func.name, func.params.join(", ")),
            Value::Native(native) => write!(f, "native fn {}", native.name),
        }
    }
}
