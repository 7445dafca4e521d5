use std::fmt;
use std::rc::Rc;

use serde::Serialize;

/// Root of a parsed source text.
#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct Program {
    pub body: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub enum Stmt {
    VarDecl {
        name: String,
        init: Option<Expr>,
        is_const: bool,
    },
    // Body is shared with the function values created from this declaration.
    FunDecl {
        name: String,
        params: Vec<String>,
        body: Rc<[Stmt]>,
    },
    Expr(Expr),
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub enum Expr {
    Null,
    Number(f64),
    Identifier(String),
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Binary {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },
    Object(Vec<Property>),
}

/// Object literal entry.  `value` is `None` for the `{ key }` shorthand.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Property {
    pub key: String,
    pub value: Option<Expr>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        };
        write!(f, "{}", s)
    }
}
