//! Global frame: constants and native functions.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::env::Env;
use crate::eval::RuntimeError;
use crate::value::{NativeFunction, Value};

/// Shared sink that `print` writes to.
pub type Output = Rc<RefCell<dyn Write>>;

/// Create the global frame.  Every binding in it is immutable.
pub fn global_env(output: Output) -> Rc<Env> {
    let globals = Env::new();
    for (name, val) in [
        ("true", Value::Bool(true)),
        ("false", Value::Bool(false)),
        ("null", Value::Null),
    ] {
        globals
            .declare(name, val, true)
            .expect("error when binding global constant");
    }

    globals.add_native(NativeFunction::new("print", move |args, _| {
        builtin_print(&output, args)
    }));
    globals.add_native(NativeFunction::new("clock", |args, _| builtin_clock(args)));
    globals.add_native(NativeFunction::new("sqrt", |args, _| builtin_sqrt(args)));
    globals
}

fn builtin_print(output: &Output, args: &[Value]) -> Result<Value, RuntimeError> {
    let line = args
        .iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(output.borrow_mut(), "{}", line)?;
    Ok(Value::Null)
}

fn builtin_clock(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("clock", args, 0)?;
    Ok(Value::Number(seconds_since_epoch(SystemTime::now())?))
}

fn seconds_since_epoch(now: SystemTime) -> Result<f64, RuntimeError> {
    Ok(now.duration_since(UNIX_EPOCH)?.as_secs_f64())
}

fn builtin_sqrt(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("sqrt", args, 1)?;
    if let Value::Number(n) = args[0] {
        Ok(Value::Number(n.sqrt()))
    } else {
        Err(RuntimeError::ExpectedNumber(args[0].type_name()))
    }
}

fn expect_arity(name: &str, args: &[Value], expected: usize) -> Result<(), RuntimeError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RuntimeError::BadNumberOfArguments {
            name: name.to_string(),
            expected,
            found: args.len(),
        })
    }
}
