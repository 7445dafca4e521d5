//! A small interpreted language with lexically scoped closures and object literals.
//!
//! Source text is scanned into tokens, parsed into a syntax tree and evaluated by a tree-walking
//! evaluator over a chain of scope frames.
//!
//! # Examples
//!
//! See [`crate::interpreter::Interpreter`], or drive the stages by hand:
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use vibescript::{builtins, evaluate, parse_program, value::Value};
//!
//! let prg = parse_program("2 + 3 * 4")?;
//! let globals = builtins::global_env(Rc::new(RefCell::new(std::io::sink())));
//! assert_eq!(evaluate(&prg, &globals)?, Value::Number(14.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Limitations
//!
//! - The scanner and parser do not attempt any error recovery.  They bail out on the first
//! encountered error.
//! - There are no strings, conditionals or loops.
//! - Call depth is bounded by the native stack.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod ast;
pub mod builtins;
pub mod diag;
pub mod env;
pub mod eval;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

pub use eval::evaluate;
pub use parser::parse_program;
