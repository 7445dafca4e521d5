use std::collections::BTreeMap;
use std::io;
use std::rc::Rc;
use std::time::SystemTimeError;

use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::{BinaryOp, Expr, Program, Property, Stmt};
use crate::env::Env;
use crate::value::{Function, Value};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown variable: {0}")]
    UnknownVar(String),
    #[error("redefined variable: {0}")]
    RedefinedVar(String),
    #[error("cannot assign to constant: {0}")]
    ImmutableVar(String),
    #[error("type mismatch: cannot apply '{op}' to {lhs} and {rhs}")]
    TypeMismatch {
        op: BinaryOp,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("expected number, found {0}")]
    ExpectedNumber(&'static str),
    #[error("division by zero")]
    DivByZero,
    #[error("modulo by zero")]
    ModByZero,
    #[error("{0} is not callable")]
    NotCallable(&'static str),
    #[error("cannot access property of {0}")]
    NotAnObject(&'static str),
    #[error("property name after '.' must be an identifier")]
    NonIdentifierProperty,
    #[error("{0} cannot be used as a property key")]
    InvalidComputedKey(&'static str),
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("{name} expects {expected} argument(s), got {found}")]
    BadNumberOfArguments {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("clock error: {0}")]
    Clock(#[from] SystemTimeError),
}

/// Evaluate every statement of `program` in `env` and return the value of the last one.
pub fn evaluate(program: &Program, env: &Rc<Env>) -> Result<Value, RuntimeError> {
    eval_stmts(&program.body, env)
}

fn eval_stmts(stmts: &[Stmt], env: &Rc<Env>) -> Result<Value, RuntimeError> {
    let mut last = Value::Null;
    for stmt in stmts {
        last = eval_stmt(stmt, env)?;
    }
    Ok(last)
}

pub fn eval_stmt(stmt: &Stmt, env: &Rc<Env>) -> Result<Value, RuntimeError> {
    match stmt {
        Stmt::VarDecl {
            name,
            init,
            is_const,
        } => {
            let val = match init {
                Some(init) => eval_expr(init, env)?,
                None => Value::Null,
            };
            debug!(%name, is_const, "declaring variable");
            env.declare(name, val, *is_const)
        }
        Stmt::FunDecl { name, params, body } => {
            let func = Value::Function(Rc::new(Function {
                name: name.clone(),
                params: params.clone(),
                env: env.clone(),
                body: body.clone(),
            }));
            debug!(%name, arity = params.len(), "declaring function");
            env.declare(name, func, true)
        }
        Stmt::Expr(e) => eval_expr(e, env),
    }
}

pub fn eval_expr(expr: &Expr, env: &Rc<Env>) -> Result<Value, RuntimeError> {
    match expr {
        Expr::Null => Ok(Value::Null),
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Identifier(name) => env.lookup(name),
        Expr::Assign { target, value } => {
            let name = match target.as_ref() {
                Expr::Identifier(name) => name,
                _ => return Err(RuntimeError::InvalidAssignmentTarget),
            };
            let val = eval_expr(value, env)?;
            env.assign(name, val)
        }
        Expr::Binary { lhs, op, rhs } => {
            let l = eval_expr(lhs, env)?;
            let r = eval_expr(rhs, env)?;
            match (l, r) {
                (Value::Number(l), Value::Number(r)) => arithmetic(*op, l, r),
                (l, r) => Err(RuntimeError::TypeMismatch {
                    op: *op,
                    lhs: l.type_name(),
                    rhs: r.type_name(),
                }),
            }
        }
        Expr::Object(props) => eval_object(props, env),
        Expr::Member {
            object,
            property,
            computed,
        } => {
            let props = match eval_expr(object, env)? {
                Value::Object(props) => props,
                other => return Err(RuntimeError::NotAnObject(other.type_name())),
            };
            let key = if *computed {
                property_key(eval_expr(property, env)?)?
            } else if let Expr::Identifier(name) = property.as_ref() {
                name.clone()
            } else {
                return Err(RuntimeError::NonIdentifierProperty);
            };
            Ok(props.get(&key).cloned().unwrap_or(Value::Null))
        }
        Expr::Call { callee, args } => {
            let callee = eval_expr(callee, env)?;
            let evaluated_args = args
                .iter()
                .map(|a| eval_expr(a, env))
                .collect::<Result<Vec<Value>, RuntimeError>>()?;
            call(callee, evaluated_args, env)
        }
    }
}

fn arithmetic(op: BinaryOp, l: f64, r: f64) -> Result<Value, RuntimeError> {
    let n = match op {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div if r == 0.0 => return Err(RuntimeError::DivByZero),
        BinaryOp::Div => l / r,
        BinaryOp::Mod if r == 0.0 => return Err(RuntimeError::ModByZero),
        BinaryOp::Mod => l % r,
    };
    Ok(Value::Number(n))
}

fn eval_object(props: &[Property], env: &Rc<Env>) -> Result<Value, RuntimeError> {
    let mut object = BTreeMap::new();
    for Property { key, value } in props {
        let val = match value {
            Some(value) => eval_expr(value, env)?,
            None => env.lookup(key)?,
        };
        object.insert(key.clone(), val);
    }
    Ok(Value::object(object))
}

// Only scalars that print unambiguously can index an object.
fn property_key(key: Value) -> Result<String, RuntimeError> {
    match key {
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(RuntimeError::InvalidComputedKey(other.type_name())),
    }
}

/// Invoke `callee`.  Natives see the caller's frame; user functions run in a fresh
/// frame whose parent is the frame they were declared in.
fn call(callee: Value, args: Vec<Value>, env: &Rc<Env>) -> Result<Value, RuntimeError> {
    match callee {
        Value::Native(native) => {
            trace!(name = %native.name, args = args.len(), "calling native function");
            (native.call)(&args, env)
        }
        Value::Function(func) => {
            if args.len() != func.params.len() {
                return Err(RuntimeError::BadNumberOfArguments {
                    name: func.name.clone(),
                    expected: func.params.len(),
                    found: args.len(),
                });
            }
            trace!(name = %func.name, args = args.len(), "calling function");
            let scope = Env::with_parent(Some(func.env.clone()));
            for (param, arg) in func.params.iter().zip(args.into_iter()) {
                scope.declare(param, arg, false)?;
            }
            eval_stmts(&func.body, &scope)
        }
        other => Err(RuntimeError::NotCallable(other.type_name())),
    }
}
