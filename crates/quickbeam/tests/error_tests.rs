//! Error classification, source positions, and diagnostic wording

use quickbeam::*;

fn run_err(src: &str) -> EvalError {
    match Interp::new().run(src, "test.qb") {
        Err(QuickbeamError::Eval(err)) => err,
        other => panic!("expected an eval error, got {other:?}"),
    }
}

fn parse_err(src: &str) -> ParseError {
    match Interp::new().run(src, "test.qb") {
        Err(QuickbeamError::Parse(err)) => err,
        other => panic!("expected a parse error, got {other:?}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Parse Errors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_unclosed_bracket() {
    let err = parse_err("[print \"hi\"");
    assert_eq!(err.script, "test.qb");
    assert!(err.to_string().starts_with("parser error: test.qb:"));
}

#[test]
fn test_stray_closer() {
    let err = parse_err("print hi]");
    assert_eq!(err.line, 1);
}

#[test]
fn test_parse_errors_carry_the_failing_line() {
    let err = parse_err("[pass 1]\n[pass 2]\n(oops");
    assert_eq!(err.line, 3);
}

// ═══════════════════════════════════════════════════════════════════════
// Unknown Actions
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_unknown_string_action() {
    let err = run_err("[frobnicate 1 2]");
    assert_eq!(
        err,
        EvalError::UnknownAction {
            script: "test.qb".to_string(),
            line: 1,
            action: "frobnicate".to_string(),
        }
    );
}

#[test]
fn test_numbers_are_never_actions() {
    let err = run_err("[42 1]");
    assert!(matches!(
        err,
        EvalError::UnknownAction { ref action, .. } if action == "42"
    ));
}

#[test]
fn test_nil_is_never_an_action() {
    assert!(matches!(
        run_err("[$unbound 1]"),
        EvalError::UnknownAction { .. }
    ));
}

#[test]
fn test_eval_errors_carry_the_failing_line() {
    let err = run_err("[pass 1]\n[pass 2]\n[frobnicate]");
    assert!(matches!(err, EvalError::UnknownAction { line: 3, .. }));
}

#[test]
fn test_error_message_names_file_and_line() {
    let err = run_err("[pass 1]\n[frobnicate]");
    assert_eq!(
        err.to_string(),
        "eval error: test.qb: line 2: unknown action frobnicate"
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Contract Violations
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_arguments() {
    assert!(matches!(
        run_err("[+]"),
        EvalError::NotEnoughArguments { expected: 1, .. }
    ));
    assert!(matches!(
        run_err("[if 1]"),
        EvalError::NotEnoughArguments { expected: 2, .. }
    ));
    assert!(matches!(
        run_err("[local]"),
        EvalError::NotEnoughArguments { .. }
    ));
    assert!(matches!(
        run_err("[pass]"),
        EvalError::NotEnoughArguments { .. }
    ));
}

#[test]
fn test_operand_type_violations() {
    assert!(matches!(run_err("[+ 1 \"x\"]"), EvalError::WrongType { .. }));
    assert!(matches!(run_err("[sqrt \"x\"]"), EvalError::WrongType { .. }));
    assert!(matches!(run_err("[++ \"x\"]"), EvalError::WrongType { .. }));
    assert!(matches!(run_err("[number 5]"), EvalError::WrongType { .. }));
    assert!(matches!(run_err("[import 5]"), EvalError::WrongType { .. }));
    assert!(matches!(run_err("[local 1 2]"), EvalError::WrongType { .. }));
}

#[test]
fn test_function_name_must_be_string_or_nil() {
    assert!(matches!(
        run_err("[function 5 [pass 1]]"),
        EvalError::WrongType { .. }
    ));
}

#[test]
fn test_errors_abort_the_rest_of_the_script() {
    let mut interp = Interp::new();
    let result = interp.run("[sqrt \"x\"][global \"after\" 1]", "test.qb");
    assert!(result.is_err());
    assert!(interp.env().lookup(b"after").is_none());
}

// ═══════════════════════════════════════════════════════════════════════
// Nesting Depth
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_nesting_past_the_limit_is_an_error() {
    let mut interp = Interp::new();
    interp.set_max_depth(8);
    let deep = format!("{}1{}", "(".repeat(20), ")".repeat(20));
    let result = interp.run(&deep, "test.qb");
    assert!(matches!(
        result,
        Err(QuickbeamError::Eval(EvalError::TooDeep { max: 8, .. }))
    ));
}

#[test]
fn test_depth_recovers_after_an_error() {
    let mut interp = Interp::new();
    interp.set_max_depth(8);
    let deep = format!("{}1{}", "(".repeat(20), ")".repeat(20));
    assert!(interp.run(&deep, "test.qb").is_err());
    // The counter unwound with the error; shallow scripts still run.
    let result = interp.run("[+ 1 2]", "test.qb").unwrap();
    assert_eq!(result.as_number(), Some(3.0));
}

#[test]
fn test_runaway_recursion_is_an_error_not_a_crash() {
    let mut interp = Interp::new();
    interp.set_max_depth(100);
    let result = interp.run("[function \"f\" [f]][f]", "test.qb");
    assert!(matches!(
        result,
        Err(QuickbeamError::Eval(EvalError::TooDeep { .. }))
    ));
}
