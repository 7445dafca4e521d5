//! API to control the interpreter.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use thiserror::Error;

use crate::ast::Program;
use crate::builtins::{self, Output};
use crate::diag::FullParseError;
use crate::env::Env;
use crate::eval::{self, RuntimeError};
use crate::parser;
use crate::value::Value;

/// Tree-walk interpreter session.
///
/// Programs evaluated by the same session share their top-level bindings.  They run in a
/// frame below the global one, so a program may shadow a builtin.
///
/// # Example
///
/// Invoke the interpreter a first time to define a function then additional times to call this
/// function:
///
/// ```
/// # use std::cell::RefCell;
/// # use std::rc::Rc;
/// # use vibescript::interpreter::{Interpreter, VibeError};
/// # use vibescript::value::Value;
///
/// let output = Rc::new(RefCell::new(Vec::new()));
/// let mut interp = Interpreter::with_output(output.clone());
///
/// let func_def = r#"
///     fn point(x, y) {
///         { x, y }
///     }
/// "#;
/// interp.eval(func_def)?;
///
/// interp.eval("print(point(10, 20).y);")?;
/// assert_eq!(interp.eval("point(1, 2)[true]")?, Value::Null);
///
/// assert_eq!(output.borrow().as_slice(), b"20\n");
/// # Ok::<(), VibeError>(())
/// ```
#[derive(Debug)]
pub struct Interpreter {
    globals: Rc<Env>,
    session: Rc<Env>,
}

/// Errors the interpreter can raise.
#[derive(Debug, Error)]
pub enum VibeError {
    /// Error occurring during lexical or syntactic analysis.
    #[error(transparent)]
    Parse(#[from] FullParseError),

    /// Error occurring during evaluation.
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl Interpreter {
    /// Creates a session whose `print` writes to standard output.
    pub fn new() -> Interpreter {
        Self::with_output(Rc::new(RefCell::new(io::stdout())))
    }

    pub fn with_output(output: Output) -> Interpreter {
        let globals = builtins::global_env(output);
        let session = Env::with_parent(Some(globals.clone()));
        Interpreter { globals, session }
    }

    /// Parse and evaluate `source`, returning the value of its last statement.
    pub fn eval(&mut self, source: &str) -> Result<Value, VibeError> {
        let prg = parser::parse_program(source)?;
        Ok(self.run(&prg)?)
    }

    /// Evaluate an already parsed program.  The program is left untouched and can be run
    /// again.
    pub fn run(&mut self, program: &Program) -> Result<Value, RuntimeError> {
        eval::evaluate(program, &self.session)
    }

    pub fn globals(&self) -> &Rc<Env> {
        &self.globals
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
