//! Loading and evaluating source at runtime

use crate::error::EvalError;
use crate::interp::{ActionCall, Interp};
use crate::parse;
use crate::value::Value;

use super::EvalResult;

/// `import PATH` reads, parses, and evaluates a script in the current
/// scope, threading the current previous value through it.
///
/// Failures to read, parse, or evaluate the file are soft: they go to the
/// diagnostic sink and the action returns Number 0. Success returns
/// Number 1.
pub(crate) fn import(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, "import", 1));
    }
    let path_value = interp.eval_arg(&call.args[0], previous)?;
    let Some(path) = path_value.string_bytes() else {
        return Err(EvalError::wrong_type(call.node, "import", "a string path"));
    };

    let Some(bytes) = interp.read_script(&path) else {
        interp.report(&format!(
            "import: could not read {}",
            String::from_utf8_lossy(&path)
        ));
        return Ok(Value::number(0.0));
    };
    let source = String::from_utf8_lossy(&bytes);
    let name = String::from_utf8_lossy(&path);
    let ast = match parse::parse(&source, &name) {
        Ok(ast) => ast,
        Err(err) => {
            interp.report(&err.to_string());
            return Ok(Value::number(0.0));
        }
    };
    match interp.eval_with_previous(&ast, previous) {
        Ok(_) => Ok(Value::number(1.0)),
        Err(err) => {
            interp.report(&err.to_string());
            Ok(Value::number(0.0))
        }
    }
}

/// `eval S` parses and evaluates a string in the current scope under the
/// calling script's name, threading the current previous value.
///
/// Failures are soft and yield nil; success yields the evaluated result.
pub(crate) fn eval(interp: &mut Interp, call: &ActionCall<'_>, previous: &mut Value) -> EvalResult {
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, "eval", 1));
    }
    let source_value = interp.eval_arg(&call.args[0], previous)?;
    let Some(source_bytes) = source_value.string_bytes() else {
        return Err(EvalError::wrong_type(call.node, "eval", "a string"));
    };

    let source = String::from_utf8_lossy(&source_bytes);
    let ast = match parse::parse(&source, &call.node.script) {
        Ok(ast) => ast,
        Err(err) => {
            interp.report(&err.to_string());
            return Ok(Value::nil());
        }
    };
    match interp.eval_with_previous(&ast, previous) {
        Ok(value) => Ok(value),
        Err(err) => {
            interp.report(&err.to_string());
            Ok(Value::nil())
        }
    }
}
