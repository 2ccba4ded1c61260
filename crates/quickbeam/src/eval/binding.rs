//! The `global` and `local` binding actions

use crate::error::EvalError;
use crate::interp::{ActionCall, Interp};
use crate::value::Value;

use super::EvalResult;

/// Shared implementation of `global` and `local`.
///
/// With one argument the action tests whether the name is bound in the
/// targeted scope, returning Number 1 or 0. With two arguments it binds
/// the name to a shallow copy of the value and returns the stored copy,
/// which stays aliased to the binding.
pub(crate) fn binding(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    let name = call.name.unwrap_or_default();
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, name, 1));
    }
    let key = interp.eval_arg(&call.args[0], previous)?;
    let Some(key_bytes) = key.string_bytes() else {
        return Err(EvalError::wrong_type(call.node, name, "a string name"));
    };
    let global = name == "global";

    if call.args.len() == 1 {
        let exists = if global {
            interp.env().get_global(&key_bytes).is_some()
        } else {
            interp.env().get_local(&key_bytes).is_some()
        };
        return Ok(Value::number(if exists { 1.0 } else { 0.0 }));
    }

    let value = interp.eval_arg(&call.args[1], previous)?;
    let stored = value.shallow_copy();
    if global {
        interp.env_mut().define_global(&key_bytes, stored.clone());
    } else {
        interp.env_mut().define(&key_bytes, stored.clone());
    }
    Ok(stored)
}
