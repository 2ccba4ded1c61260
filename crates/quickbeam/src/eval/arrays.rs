//! Value copying, array construction, and element access

use crate::error::EvalError;
use crate::interp::{ActionCall, Interp};
use crate::value::{Payload, Value};

use super::EvalResult;

/// Truncate a fractional index and bounds-check it. Negative, NaN, and
/// past-the-end indexes are all rejected.
pub(crate) fn checked_index(n: f64, len: usize) -> Option<usize> {
    if n.is_nan() || n < 0.0 {
        return None;
    }
    let i = n as usize;
    if i < len {
        Some(i)
    } else {
        None
    }
}

/// `copy V` yields a deep copy of its argument.
pub(crate) fn copy(interp: &mut Interp, call: &ActionCall<'_>, previous: &mut Value) -> EvalResult {
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, "copy", 1));
    }
    let value = interp.eval_arg(&call.args[0], previous)?;
    Ok(value.deep_copy())
}

/// `array ...` builds a fresh array whose elements alias the evaluated
/// arguments.
pub(crate) fn array(interp: &mut Interp, call: &ActionCall<'_>, previous: &mut Value) -> EvalResult {
    let mut items = Vec::with_capacity(call.args.len());
    for arg in call.args {
        items.push(interp.eval_arg(arg, previous)?);
    }
    Ok(Value::array(items))
}

/// `get V N` reads an element.
///
/// Arrays yield an alias of the element; strings yield a fresh one-byte
/// string. Any other first argument comes back unchanged. The index is
/// evaluated either way, so its side effects always run.
pub(crate) fn get(interp: &mut Interp, call: &ActionCall<'_>, previous: &mut Value) -> EvalResult {
    if call.args.len() < 2 {
        return Err(EvalError::not_enough_args(call.node, "get", 2));
    }
    let target = interp.eval_arg(&call.args[0], previous)?;
    let index_value = interp.eval_arg(&call.args[1], previous)?;
    let numeric = index_value.as_number();
    let require_number =
        || EvalError::wrong_type(call.node, "get", "a number argument");

    let result = match &*target.payload() {
        Payload::Array(items) => {
            let index = numeric.ok_or_else(require_number)?;
            match checked_index(index, items.len()) {
                Some(i) => Ok(items[i].clone()),
                None => Err(EvalError::out_of_bounds(call.node, "get", index, items.len())),
            }
        }
        Payload::String(s) => {
            let index = numeric.ok_or_else(require_number)?;
            match checked_index(index, s.len()) {
                Some(i) => Ok(Value::string(vec![s[i]])),
                None => Err(EvalError::out_of_bounds(call.node, "get", index, s.len())),
            }
        }
        _ => Ok(target.clone()),
    };
    result
}

/// `set D S` overwrites the destination's payload in place with a shallow
/// copy of the source, leaving every alias of the destination changed.
/// Returns Number 1.
pub(crate) fn set(interp: &mut Interp, call: &ActionCall<'_>, previous: &mut Value) -> EvalResult {
    if call.args.len() < 2 {
        return Err(EvalError::not_enough_args(call.node, "set", 2));
    }
    let dest = interp.eval_arg(&call.args[0], previous)?;
    let source = interp.eval_arg(&call.args[1], previous)?;
    dest.copy_from(&source, false);
    Ok(Value::number(1.0))
}

/// `insert A N V` splices an aliased element in before position N; a
/// position at or past the end appends. Returns Number 1.
pub(crate) fn insert(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    if call.args.len() < 3 {
        return Err(EvalError::not_enough_args(call.node, "insert", 3));
    }
    let target = interp.eval_arg(&call.args[0], previous)?;
    if !target.is_array() {
        return Err(EvalError::wrong_type(call.node, "insert", "an array"));
    }
    let position = interp.number_arg(call.node, &call.args[1], previous, "insert")?;
    let value = interp.eval_arg(&call.args[2], previous)?;

    if position.is_nan() || position < 0.0 {
        let len = match &*target.payload() {
            Payload::Array(items) => items.len(),
            _ => 0,
        };
        return Err(EvalError::out_of_bounds(call.node, "insert", position, len));
    }
    let result = match &mut *target.payload_mut() {
        Payload::Array(items) => {
            let at = (position as usize).min(items.len());
            items.insert(at, value);
            Ok(Value::number(1.0))
        }
        _ => Err(EvalError::wrong_type(call.node, "insert", "an array")),
    };
    result
}

/// `remove A N` drops the element at a bounds-checked position. Returns
/// Number 1.
pub(crate) fn remove(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    if call.args.len() < 2 {
        return Err(EvalError::not_enough_args(call.node, "remove", 2));
    }
    let target = interp.eval_arg(&call.args[0], previous)?;
    if !target.is_array() {
        return Err(EvalError::wrong_type(call.node, "remove", "an array"));
    }
    let position = interp.number_arg(call.node, &call.args[1], previous, "remove")?;
    let result = match &mut *target.payload_mut() {
        Payload::Array(items) => match checked_index(position, items.len()) {
            Some(i) => {
                items.remove(i);
                Ok(Value::number(1.0))
            }
            None => Err(EvalError::out_of_bounds(
                call.node,
                "remove",
                position,
                items.len(),
            )),
        },
        _ => Err(EvalError::wrong_type(call.node, "remove", "an array")),
    };
    result
}
