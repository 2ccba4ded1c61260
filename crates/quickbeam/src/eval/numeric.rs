//! Relational, arithmetic, bitwise, and math-function actions

use std::cmp::Ordering;

use crate::error::EvalError;
use crate::interp::{ActionCall, Interp};
use crate::value::{Payload, Value};

use super::EvalResult;

// ═══════════════════════════════════════════════════════════════════════
// Relationals
// ═══════════════════════════════════════════════════════════════════════

/// The six comparison actions. Exactly two operands are compared; any
/// further arguments are left unevaluated.
///
/// Operands of different types always compare to 0, whatever the
/// operator. Two nils always compare to 1. Strings compare by bytes up to
/// the first NUL, arrays by length, functions by parameter count, and
/// externals by identity.
pub(crate) fn relational(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    let name = call.name.unwrap_or_default();
    if call.args.len() < 2 {
        return Err(EvalError::not_enough_args(call.node, name, 2));
    }
    let a = interp.eval_arg(&call.args[0], previous)?;
    let b = interp.eval_arg(&call.args[1], previous)?;
    let holds = compare(&a, &b, name);
    Ok(Value::number(if holds { 1.0 } else { 0.0 }))
}

fn compare(a: &Value, b: &Value, op: &str) -> bool {
    match (&*a.payload(), &*b.payload()) {
        (Payload::Nil, Payload::Nil) => true,
        (Payload::Number(x), Payload::Number(y)) => cmp_by(*x, *y, op),
        (Payload::String(x), Payload::String(y)) => cmp_c_strings(x, y, op),
        (Payload::Array(x), Payload::Array(y)) => cmp_by(x.len(), y.len(), op),
        (Payload::Function(x), Payload::Function(y)) => cmp_by(x.arity(), y.arity(), op),
        (Payload::External(x), Payload::External(y)) => cmp_by(x.addr(), y.addr(), op),
        _ => false,
    }
}

fn cmp_by<T: PartialOrd>(x: T, y: T, op: &str) -> bool {
    match op {
        "==" => x == y,
        "!=" => x != y,
        "<" => x < y,
        "<=" => x <= y,
        ">" => x > y,
        ">=" => x >= y,
        _ => false,
    }
}

/// String comparison with C string semantics: bytes past the first NUL
/// are invisible.
fn cmp_c_strings(x: &[u8], y: &[u8], op: &str) -> bool {
    let x = x.split(|&b| b == 0).next().unwrap_or(x);
    let y = y.split(|&b| b == 0).next().unwrap_or(y);
    match x.cmp(y) {
        Ordering::Equal => matches!(op, "==" | "<=" | ">="),
        Ordering::Less => matches!(op, "!=" | "<" | "<="),
        Ordering::Greater => matches!(op, "!=" | ">" | ">="),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic and Bitwise
// ═══════════════════════════════════════════════════════════════════════

/// The n-ary numeric actions: `+ - * / ** % >> << & ^ |`.
///
/// The first operand seeds the accumulator and the rest fold in from the
/// left. Bitwise operators truncate both sides to 32-bit integers for
/// each step. With a single operand, `+` yields its absolute value, `-`
/// its negated absolute value, and everything else the operand itself.
pub(crate) fn arithmetic(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    let name = call.name.unwrap_or_default();
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, name, 1));
    }
    let first = interp.number_arg(call.node, &call.args[0], previous, name)?;
    if call.args.len() == 1 {
        let value = match name {
            "+" => first.abs(),
            "-" => -first.abs(),
            _ => first,
        };
        return Ok(Value::number(value));
    }
    let mut acc = first;
    for arg in &call.args[1..] {
        let operand = interp.number_arg(call.node, arg, previous, name)?;
        acc = fold(acc, operand, name);
    }
    Ok(Value::number(acc))
}

fn fold(a: f64, b: f64, op: &str) -> f64 {
    match op {
        "+" => a + b,
        "-" => a - b,
        "*" => a * b,
        "/" => a / b,
        "**" => a.powf(b),
        "%" => a % b,
        ">>" => ((a as i32).wrapping_shr(b as i32 as u32)) as f64,
        "<<" => ((a as i32).wrapping_shl(b as i32 as u32)) as f64,
        "&" => ((a as i32) & (b as i32)) as f64,
        "^" => ((a as i32) ^ (b as i32)) as f64,
        "|" => ((a as i32) | (b as i32)) as f64,
        _ => a,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Unary Forms
// ═══════════════════════════════════════════════════════════════════════

/// The unary actions `~ ! ++ --`.
///
/// With one operand, `~` is 32-bit complement, `!` is the logical
/// negation of a number, and `++`/`--` mutate their operand in place
/// through its alias and yield the new value as a fresh Number. With more
/// than one operand every argument still evaluates, but the result is
/// simply the first operand unchanged.
pub(crate) fn unary(interp: &mut Interp, call: &ActionCall<'_>, previous: &mut Value) -> EvalResult {
    let name = call.name.unwrap_or_default();
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, name, 1));
    }
    if call.args.len() > 1 {
        let first = interp.number_arg(call.node, &call.args[0], previous, name)?;
        for arg in &call.args[1..] {
            interp.number_arg(call.node, arg, previous, name)?;
        }
        return Ok(Value::number(first));
    }

    let operand = interp.eval_arg(&call.args[0], previous)?;
    let n = match &*operand.payload() {
        Payload::Number(n) => *n,
        _ => return Err(EvalError::wrong_type(call.node, name, "a number argument")),
    };
    let value = match name {
        "~" => !(n as i32) as f64,
        "!" => {
            if n != 0.0 {
                0.0
            } else {
                1.0
            }
        }
        "++" | "--" => {
            let stepped = if name == "++" { n + 1.0 } else { n - 1.0 };
            if let Payload::Number(slot) = &mut *operand.payload_mut() {
                *slot = stepped;
            }
            stepped
        }
        _ => n,
    };
    Ok(Value::number(value))
}

// ═══════════════════════════════════════════════════════════════════════
// Math Functions
// ═══════════════════════════════════════════════════════════════════════

/// The one-argument math actions, `sin` through `ceil`. Extra arguments
/// are left unevaluated.
pub(crate) fn math(interp: &mut Interp, call: &ActionCall<'_>, previous: &mut Value) -> EvalResult {
    let name = call.name.unwrap_or_default();
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, name, 1));
    }
    let n = interp.number_arg(call.node, &call.args[0], previous, name)?;
    let value = match name {
        "sin" => n.sin(),
        "cos" => n.cos(),
        "tan" => n.tan(),
        "asin" => n.asin(),
        "acos" => n.acos(),
        "atan" => n.atan(),
        "sinh" => n.sinh(),
        "cosh" => n.cosh(),
        "tanh" => n.tanh(),
        "exp" => n.exp(),
        "log" => n.ln(),
        "log10" => n.log10(),
        "sqrt" => n.sqrt(),
        "fabs" => n.abs(),
        "floor" => n.floor(),
        "ceil" => n.ceil(),
        _ => n,
    };
    Ok(Value::number(value))
}
