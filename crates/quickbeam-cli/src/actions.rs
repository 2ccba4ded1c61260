//! Host actions: file and stream I/O, environment access, shell execution

use std::io::{Read, Write};
use std::process::Command;
use std::rc::Rc;

use quickbeam::{format_number, ActionCall, EvalError, Interp, Payload, Value};

/// Install the filesystem reader, the I/O router, and (optionally) the
/// shell fallback on an interpreter.
pub fn install(interp: &mut Interp, allow_exec: bool) {
    interp.set_read_file(Rc::new(|path: &[u8]| {
        std::fs::read(lossy_string(path)).ok()
    }));
    interp.set_router(Rc::new(router));
    if allow_exec {
        interp.set_shell(Rc::new(shell_exec));
    }
}

fn router(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> Result<Option<Value>, EvalError> {
    let Some(name) = call.name else {
        return Ok(None);
    };
    let value = match name {
        "pipeout" => pipeout(interp, call, previous)?,
        "file-read" => file_read(interp, call, previous)?,
        "file-write" | "file-append" => file_write(interp, call, previous)?,
        "stdin-read" => stdin_read(interp, call, previous)?,
        "stdout-write" | "stderr-write" => stream_write(interp, call, previous)?,
        "getenv" => getenv(interp, call, previous)?,
        _ => return Ok(None),
    };
    Ok(Some(value))
}

/// `pipeout OUT CMD ...` runs a shell command, overwrites OUT in place
/// with the command's standard output, and returns the exit code.
/// A command that cannot be spawned reports and yields nil.
fn pipeout(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> Result<Value, EvalError> {
    if call.args.len() < 2 {
        return Err(too_few(call, "pipeout", 2));
    }
    let target = interp.eval_arg(&call.args[0], previous)?;
    let mut command = Vec::new();
    for arg in &call.args[1..] {
        let value = interp.eval_arg(arg, previous)?;
        push_rendered(&mut command, &value);
    }

    match Command::new("sh")
        .arg("-c")
        .arg(lossy_string(&command))
        .output()
    {
        Ok(output) => {
            target.copy_from(&Value::string(output.stdout), false);
            Ok(Value::number(output.status.code().unwrap_or(-1) as f64))
        }
        Err(err) => {
            interp.report(&format!("pipeout: {err}"));
            Ok(Value::nil())
        }
    }
}

/// `file-read PATH` yields the file's bytes as a String, or nil when the
/// file cannot be read.
fn file_read(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> Result<Value, EvalError> {
    if call.args.is_empty() {
        return Err(too_few(call, "file-read", 1));
    }
    let path = string_arg(interp, call, 0, previous, "file-read", "a string path")?;
    match std::fs::read(lossy_string(&path)) {
        Ok(data) => Ok(Value::string(data)),
        Err(_) => Ok(Value::nil()),
    }
}

/// `file-write PATH DATA` and `file-append PATH DATA` write a String to a
/// file, creating it as needed, and yield the byte count written. A file
/// that cannot be opened or written yields nil.
fn file_write(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> Result<Value, EvalError> {
    let name = call.name.unwrap_or_default();
    if call.args.len() < 2 {
        return Err(too_few(call, name, 2));
    }
    let path = string_arg(interp, call, 0, previous, name, "a string path")?;
    let data = string_arg(interp, call, 1, previous, name, "a string to write")?;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true);
    if name == "file-append" {
        options.append(true);
    } else {
        options.truncate(true);
    }
    match options.open(lossy_string(&path)) {
        Ok(mut file) => match file.write_all(&data) {
            Ok(()) => Ok(Value::number(data.len() as f64)),
            Err(_) => Ok(Value::nil()),
        },
        Err(_) => Ok(Value::nil()),
    }
}

/// `stdin-read SPEC` reads standard input: a Number reads that many bytes
/// (zero or less reads everything), a String reads until its first byte
/// is seen.
fn stdin_read(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> Result<Value, EvalError> {
    if call.args.is_empty() {
        return Err(too_few(call, "stdin-read", 1));
    }
    enum Mode {
        Count(f64),
        Until(u8),
    }
    let spec = interp.eval_arg(&call.args[0], previous)?;
    let mode = match &*spec.payload() {
        Payload::Number(n) => Mode::Count(*n),
        Payload::String(s) => Mode::Until(s.first().copied().unwrap_or(0)),
        _ => return Err(bad_type(call, "stdin-read", "a number or string")),
    };

    let stdin = std::io::stdin();
    let mut lock = stdin.lock();
    let mut buf = Vec::new();
    match mode {
        Mode::Count(n) if n <= 0.0 => {
            let _ = lock.read_to_end(&mut buf);
        }
        Mode::Count(n) => {
            let want = n as usize;
            let mut chunk = [0u8; 4096];
            while buf.len() < want {
                let room = (want - buf.len()).min(chunk.len());
                match lock.read(&mut chunk[..room]) {
                    Ok(0) | Err(_) => break,
                    Ok(k) => buf.extend_from_slice(&chunk[..k]),
                }
            }
        }
        Mode::Until(terminator) => {
            let mut one = [0u8; 1];
            loop {
                match lock.read(&mut one) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        if one[0] == terminator {
                            break;
                        }
                        buf.push(one[0]);
                    }
                }
            }
        }
    }
    Ok(Value::string(buf))
}

/// `stdout-write ...` and `stderr-write ...` write each argument's
/// rendering, with no separators and no newline. Returns Number 1.
fn stream_write(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> Result<Value, EvalError> {
    let mut out = Vec::new();
    for arg in call.args {
        let value = interp.eval_arg(arg, previous)?;
        value.render_into(&mut out);
    }
    if call.name == Some("stderr-write") {
        let _ = std::io::stderr().lock().write_all(&out);
    } else {
        let _ = std::io::stdout().lock().write_all(&out);
    }
    Ok(Value::number(1.0))
}

/// `getenv NAME` yields the environment variable's value, or nil when it
/// is not set.
fn getenv(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> Result<Value, EvalError> {
    if call.args.is_empty() {
        return Err(too_few(call, "getenv", 1));
    }
    let name = string_arg(interp, call, 0, previous, "getenv", "a string name")?;
    match std::env::var_os(lossy_string(&name)) {
        Some(value) => Ok(Value::string(
            value.to_string_lossy().into_owned().into_bytes(),
        )),
        None => Ok(Value::nil()),
    }
}

/// The dispatch fallback: run the unmatched action name as a shell
/// command with its rendered arguments, yielding the exit code.
fn shell_exec(
    interp: &mut Interp,
    action: &[u8],
    args: &[Value],
) -> Result<Option<Value>, EvalError> {
    let mut command = Vec::new();
    command.extend_from_slice(action);
    command.push(b' ');
    for value in args {
        push_rendered(&mut command, value);
    }
    match Command::new("sh")
        .arg("-c")
        .arg(lossy_string(&command))
        .status()
    {
        Ok(status) => Ok(Some(Value::number(status.code().unwrap_or(-1) as f64))),
        Err(err) => {
            interp.report(&format!("shell: {err}"));
            Ok(None)
        }
    }
}

/// Append a value to a command line: numbers and strings render with a
/// trailing space, other types are skipped.
fn push_rendered(out: &mut Vec<u8>, value: &Value) {
    match &*value.payload() {
        Payload::Number(n) => {
            out.extend_from_slice(format_number(*n).as_bytes());
            out.push(b' ');
        }
        Payload::String(s) => {
            out.extend_from_slice(s);
            out.push(b' ');
        }
        _ => {}
    }
}

fn string_arg(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    index: usize,
    previous: &mut Value,
    action: &str,
    expected: &str,
) -> Result<Vec<u8>, EvalError> {
    let value = interp.eval_arg(&call.args[index], previous)?;
    value
        .string_bytes()
        .ok_or_else(|| bad_type(call, action, expected))
}

fn lossy_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn too_few(call: &ActionCall<'_>, action: &str, expected: usize) -> EvalError {
    EvalError::NotEnoughArguments {
        script: call.node.script.to_string(),
        line: call.node.line,
        action: action.to_string(),
        expected,
    }
}

fn bad_type(call: &ActionCall<'_>, action: &str, expected: &str) -> EvalError {
    EvalError::WrongType {
        script: call.node.script.to_string(),
        line: call.node.line,
        action: action.to_string(),
        expected: expected.to_string(),
    }
}
