//! Type inspection and conversion actions

use crate::error::EvalError;
use crate::hash::hash_bytes;
use crate::interp::{ActionCall, Interp};
use crate::parse::double_prefix;
use crate::value::{Payload, Value};

use super::EvalResult;

/// `typeof V` yields the type code as a Number: external 0, nil 1,
/// number 2, string 3, array 4, function 5.
pub(crate) fn type_of(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, "typeof", 1));
    }
    let value = interp.eval_arg(&call.args[0], previous)?;
    Ok(Value::number(value.kind() as u8 as f64))
}

/// `sizeof V` yields string length in bytes, array length in elements,
/// function parameter count, and 1 for everything else.
pub(crate) fn size_of(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, "sizeof", 1));
    }
    let value = interp.eval_arg(&call.args[0], previous)?;
    let size = match &*value.payload() {
        Payload::String(s) => s.len(),
        Payload::Array(items) => items.len(),
        Payload::Function(f) => f.arity(),
        _ => 1,
    };
    Ok(Value::number(size as f64))
}

/// `string-hash S` yields the scope-table hash of a string's bytes, or 0
/// for any other type.
pub(crate) fn string_hash(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, "string-hash", 1));
    }
    let value = interp.eval_arg(&call.args[0], previous)?;
    let hash = match &*value.payload() {
        Payload::String(s) => hash_bytes(s),
        _ => 0,
    };
    Ok(Value::number(hash as f64))
}

/// `self-name` yields the name of the script the expression came from.
pub(crate) fn self_name(
    _interp: &mut Interp,
    call: &ActionCall<'_>,
    _previous: &mut Value,
) -> EvalResult {
    Ok(Value::string(call.node.script.as_bytes()))
}

/// `number S` parses a numeric prefix out of a string, 0 when none.
pub(crate) fn number(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, "number", 1));
    }
    let value = interp.eval_arg(&call.args[0], previous)?;
    let result = match &*value.payload() {
        Payload::String(s) => Ok(Value::number(double_prefix(s))),
        _ => Err(EvalError::wrong_type(call.node, "number", "a string")),
    };
    result
}

/// `asc N` yields the one-byte string for a truncated number, except that
/// byte zero yields the empty string.
pub(crate) fn asc(interp: &mut Interp, call: &ActionCall<'_>, previous: &mut Value) -> EvalResult {
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, "asc", 1));
    }
    let n = interp.number_arg(call.node, &call.args[0], previous, "asc")?;
    let byte = (n as i32) as u8;
    if byte == 0 {
        Ok(Value::string(Vec::new()))
    } else {
        Ok(Value::string(vec![byte]))
    }
}

/// `char S N` yields the byte at a bounds-checked position, sign-extended
/// to a Number, so bytes above 0x7f come back negative.
pub(crate) fn char_at(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    if call.args.len() < 2 {
        return Err(EvalError::not_enough_args(call.node, "char", 2));
    }
    let value = interp.eval_arg(&call.args[0], previous)?;
    let Some(bytes) = value.string_bytes() else {
        return Err(EvalError::wrong_type(call.node, "char", "a string"));
    };
    let index = interp.number_arg(call.node, &call.args[1], previous, "char")?;
    match super::arrays::checked_index(index, bytes.len()) {
        Some(i) => Ok(Value::number((bytes[i] as i8) as f64)),
        None => Err(EvalError::out_of_bounds(
            call.node,
            "char",
            index,
            bytes.len(),
        )),
    }
}
