use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::rc::Rc;

use vibescript::diag::{FullParseError, ParseError};
use vibescript::eval::RuntimeError;
use vibescript::interpreter::{Interpreter, VibeError};
use vibescript::parse_program;
use vibescript::value::Value;

fn session() -> Interpreter {
    Interpreter::with_output(Rc::new(RefCell::new(io::sink())))
}

fn eval(source: &str) -> Result<Value, VibeError> {
    session().eval(source)
}

#[test]
fn multiplication_binds_tighter_than_addition() -> Result<(), VibeError> {
    assert_eq!(eval("2 + 3 * 4")?, Value::Number(14.0));
    assert_eq!(eval("(2 + 3) * 4")?, Value::Number(20.0));
    Ok(())
}

#[test]
fn binary_operators_are_left_associative() -> Result<(), VibeError> {
    assert_eq!(eval("10 - 3 - 2")?, Value::Number(5.0));
    assert_eq!(eval("64 / 4 / 2")?, Value::Number(8.0));
    assert_eq!(eval("17 % 10 % 4")?, Value::Number(3.0));
    Ok(())
}

#[test]
fn division_and_modulo_by_zero_fail() {
    for source in ["1 / 0", "let z = 0; 5 / z", "1 % 0", "7 % (3 - 3)"] {
        match eval(source) {
            Err(VibeError::Runtime(RuntimeError::DivByZero))
            | Err(VibeError::Runtime(RuntimeError::ModByZero)) => (),
            out => panic!("unexpected output for {}: {:?}", source, out),
        }
    }
}

#[test]
fn parsing_is_deterministic() -> Result<(), FullParseError> {
    let source = "const o = { a: 1, b }; fn f(x) { o[x] } f(1).a = 2";
    assert_eq!(parse_program(source)?, parse_program(source)?);
    Ok(())
}

#[test]
fn const_without_initializer_is_a_parse_error() {
    match eval("const c;") {
        Err(VibeError::Parse(FullParseError {
            error: ParseError::MissingConstInitializer(name),
            ..
        })) => assert_eq!(name, "c"),
        out => panic!("unexpected output: {:?}", out),
    }
}

#[test]
fn assigning_to_const_is_a_runtime_error() {
    match eval("const c = 1; c = 2;") {
        Err(VibeError::Runtime(RuntimeError::ImmutableVar(name))) => assert_eq!(name, "c"),
        out => panic!("unexpected output: {:?}", out),
    }
}

#[test]
fn uninitialized_let_is_null_and_assignable() -> Result<(), VibeError> {
    assert_eq!(eval("let v; v")?, Value::Null);
    assert_eq!(eval("let v; v = 3; v")?, Value::Number(3.0));
    Ok(())
}

#[test]
fn closure_outlives_defining_call() -> Result<(), VibeError> {
    let prg = r#"
        fn outer() {
            let n = 5;
            fn inner() { n }
            inner
        }
        const f = outer();
        f()
    "#;
    assert_eq!(eval(prg)?, Value::Number(5.0));
    Ok(())
}

#[test]
fn closures_share_captured_frame() -> Result<(), VibeError> {
    let prg = r#"
        fn counter() {
            let n = 0;
            fn next() { n = n + 1 }
            next
        }
        const tick = counter();
        tick(); tick();
        tick()
    "#;
    assert_eq!(eval(prg)?, Value::Number(3.0));
    Ok(())
}

#[test]
fn shorthand_property_takes_variable_value() -> Result<(), VibeError> {
    let mut expected = BTreeMap::new();
    expected.insert("x".to_string(), Value::Number(5.0));
    assert_eq!(eval("let x = 5; { x }")?, Value::object(expected));
    Ok(())
}

#[test]
fn shorthand_property_of_unknown_variable_fails() {
    match eval("{ nowhere }") {
        Err(VibeError::Runtime(RuntimeError::UnknownVar(name))) => assert_eq!(name, "nowhere"),
        out => panic!("unexpected output: {:?}", out),
    }
}

#[test]
fn missing_key_is_null() -> Result<(), VibeError> {
    assert_eq!(eval("{}.missing")?, Value::Null);
    assert_eq!(eval("const o = {}; o.missing")?, Value::Null);
    assert_eq!(eval("{ a: 2 }[true]")?, Value::Null);
    assert_eq!(eval("let n = { a: 2 }.a; n * 3")?, Value::Number(6.0));
    assert_eq!(eval("const o = { a: 1 }; o[2]")?, Value::Null);
    Ok(())
}

#[test]
fn nested_member_access() -> Result<(), VibeError> {
    let prg = "const o = { inner: { true: 8 } }; o.inner[true] + o.inner[1 + 1]";
    match eval(prg) {
        Err(VibeError::Runtime(RuntimeError::TypeMismatch { rhs: "null", .. })) => (),
        out => panic!("unexpected output: {:?}", out),
    }
    assert_eq!(eval("const o = { inner: { true: 8 } }; o.inner[true]")?, Value::Number(8.0));
    Ok(())
}

#[test]
fn redeclaration_in_same_scope_fails() {
    match eval("let a = 1; let a = 2;") {
        Err(VibeError::Runtime(RuntimeError::RedefinedVar(name))) => assert_eq!(name, "a"),
        out => panic!("unexpected output: {:?}", out),
    }
}

#[test]
fn shadowing_in_nested_scope_succeeds() -> Result<(), VibeError> {
    let prg = r#"
        let a = 1;
        fn f() {
            let a = 2;
            a
        }
        f() * 10 + a
    "#;
    assert_eq!(eval(prg)?, Value::Number(21.0));
    Ok(())
}

#[test]
fn calling_non_function_fails() {
    for (source, kind) in [("let n = 3; n()", "number"), ("const o = {}; o()", "object")] {
        match eval(source) {
            Err(VibeError::Runtime(RuntimeError::NotCallable(found))) => assert_eq!(found, kind),
            out => panic!("unexpected output for {}: {:?}", source, out),
        }
    }
}

#[test]
fn wrong_number_of_arguments_fails() {
    match eval("fn f(a, b) { a } f(1)") {
        Err(VibeError::Runtime(RuntimeError::BadNumberOfArguments {
            name,
            expected: 2,
            found: 1,
        })) => assert_eq!(name, "f"),
        out => panic!("unexpected output: {:?}", out),
    }
}

#[test]
fn print_writes_to_session_output() -> Result<(), VibeError> {
    let output = Rc::new(RefCell::new(Vec::new()));
    let mut interp = Interpreter::with_output(output.clone());
    interp.eval("const p = { a: 1, b: null }; print(p, sqrt(16), true);")?;
    assert_eq!(
        String::from_utf8_lossy(&output.borrow()),
        "{ a: 1, b: null } 4 true\n"
    );
    Ok(())
}

#[test]
fn results_convert_to_json() -> Result<(), VibeError> {
    let val = eval("fn f(a) { a } { n: 3 / 2, t: true, z: null, f }")?;
    assert_eq!(
        val.to_json(),
        serde_json::json!({
            "n": 1.5,
            "t": true,
            "z": null,
            "f": { "fn": "f", "params": ["a"] },
        })
    );
    Ok(())
}
