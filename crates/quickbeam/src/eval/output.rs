//! Rendering actions

use std::io::Write;

use crate::interp::{ActionCall, Interp};
use crate::value::Value;

use super::EvalResult;

/// `print ...` writes each argument's rendering followed by a space, then
/// one newline, to standard output. Returns Number 1.
pub(crate) fn print(interp: &mut Interp, call: &ActionCall<'_>, previous: &mut Value) -> EvalResult {
    let mut out = Vec::new();
    for arg in call.args {
        let value = interp.eval_arg(arg, previous)?;
        value.render_into(&mut out);
        out.push(b' ');
    }
    out.push(b'\n');
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    let _ = lock.write_all(&out);
    Ok(Value::number(1.0))
}

/// `string ...` concatenates each argument's rendering, with no
/// separators, into a fresh String.
pub(crate) fn string(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    let mut out = Vec::new();
    for arg in call.args {
        let value = interp.eval_arg(arg, previous)?;
        value.render_into(&mut out);
    }
    Ok(Value::string(out))
}
