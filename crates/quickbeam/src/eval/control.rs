//! Sequencing, conditionals, loops, and short-circuit logic

use crate::error::EvalError;
use crate::interp::{ActionCall, Interp};
use crate::value::{Payload, Value};

use super::EvalResult;

/// True when the previous value marks an already-satisfied branch: a
/// nonzero Number left behind by `if` or a predecessor in the cascade.
fn satisfied(previous: &Value) -> bool {
    matches!(&*previous.payload(), Payload::Number(n) if *n != 0.0)
}

/// `pass A ...` evaluates each argument in turn and yields the last one.
pub(crate) fn pass(interp: &mut Interp, call: &ActionCall<'_>, previous: &mut Value) -> EvalResult {
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, "pass", 1));
    }
    let mut ret = Value::nil();
    for arg in call.args {
        ret = interp.eval_arg(arg, previous)?;
    }
    Ok(ret)
}

/// Shared implementation of `if`, `elseif`, and `loop`.
///
/// All three test a condition and evaluate a body. `if` and `elseif`
/// return Number 1 when the branch ran and Number 0 when it did not;
/// `loop` repeats until the condition fails and then returns Number 0.
/// `elseif` first checks whether an earlier branch already ran, and if so
/// passes that along as Number 1 without touching its own condition.
pub(crate) fn conditional(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    let name = call.name.unwrap_or_default();
    if name == "elseif" && satisfied(previous) {
        return Ok(Value::number(1.0));
    }
    if call.args.len() < 2 {
        return Err(EvalError::not_enough_args(call.node, name, 2));
    }
    let looping = name == "loop";
    loop {
        let cond = interp.eval_arg(&call.args[0], previous)?;
        if !cond.is_truthy() {
            return Ok(Value::number(0.0));
        }
        // The body result is discarded; only previous threads onward.
        interp.eval_rest(&call.args[1..], previous)?;
        if !looping {
            return Ok(Value::number(1.0));
        }
    }
}

/// `else B ...` runs its body when no earlier branch in the cascade did.
/// Returns Number 1 either way, so a later `elseif` stays quiet.
pub(crate) fn else_branch(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    if satisfied(previous) {
        return Ok(Value::number(1.0));
    }
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, "else", 1));
    }
    interp.eval_rest(call.args, previous)?;
    Ok(Value::number(1.0))
}

/// `&&` and `||` over any number of operands, stopping at the first
/// operand that settles the answer.
pub(crate) fn logical(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    let name = call.name.unwrap_or_default();
    if call.args.len() < 2 {
        return Err(EvalError::not_enough_args(call.node, name, 2));
    }
    let conjunction = name == "&&";
    for arg in call.args {
        let value = interp.eval_arg(arg, previous)?;
        if value.is_truthy() != conjunction {
            return Ok(Value::number(if conjunction { 0.0 } else { 1.0 }));
        }
    }
    Ok(Value::number(if conjunction { 1.0 } else { 0.0 }))
}
