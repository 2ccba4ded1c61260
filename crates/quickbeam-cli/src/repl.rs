//! The interactive session

use std::process::ExitCode;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use quickbeam::{Interp, Value};

const PROMPT: &str = "# ";
const CONTINUE_PROMPT: &str = "> ";

/// Read, buffer, and evaluate lines until `exit` or end of input.
///
/// Lines accumulate while brackets are unbalanced or the line ends in a
/// backslash; a balanced buffer is parsed and evaluated as one
/// submission. The previous-value slot persists across submissions, so a
/// conditional cascade can be typed one branch per line. Results are not
/// echoed; errors go to standard error and the session continues.
pub fn run(interp: &mut Interp) -> Result<ExitCode> {
    let mut editor = DefaultEditor::new()?;
    let mut buffer = String::new();
    let mut previous = Value::number(0.0);
    loop {
        let prompt = if buffer.is_empty() {
            PROMPT
        } else {
            CONTINUE_PROMPT
        };
        match editor.readline(prompt) {
            Ok(line) => {
                if line == "exit" {
                    return Ok(ExitCode::SUCCESS);
                }
                let _ = editor.add_history_entry(&line);
                let continued = line.ends_with('\\');
                buffer.push_str(&line);
                buffer.push('\n');
                if !continued && balanced(&buffer) {
                    submit(interp, &buffer, &mut previous);
                    buffer.clear();
                }
            }
            Err(ReadlineError::Interrupted) => buffer.clear(),
            Err(ReadlineError::Eof) => return Ok(ExitCode::SUCCESS),
            Err(err) => return Err(err.into()),
        }
    }
}

fn submit(interp: &mut Interp, source: &str, previous: &mut Value) {
    match quickbeam::parse(source, "repl.qb") {
        Ok(ast) => {
            if let Err(err) = interp.eval_with_previous(&ast, previous) {
                eprintln!("{err}");
            }
        }
        Err(err) => eprintln!("{err}"),
    }
}

/// Whether every opening bracket outside a string literal has been
/// closed. Over-closed buffers count as balanced so the parser can
/// report them.
fn balanced(source: &str) -> bool {
    let bytes = source.as_bytes();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => {
                i += 2;
                continue;
            }
            b'"' => in_string = !in_string,
            b'(' | b'[' | b'{' if !in_string => depth += 1,
            b')' | b']' | b'}' if !in_string => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    depth <= 0
}

#[cfg(test)]
mod tests {
    use super::balanced;

    #[test]
    fn test_balanced_plain_lines() {
        assert!(balanced("print hello\n"));
        assert!(balanced("[print hello]\n"));
        assert!(balanced("\n"));
    }

    #[test]
    fn test_open_brackets_keep_buffering() {
        assert!(!balanced("[if [> $x 1]\n"));
        assert!(!balanced("(a [b\n"));
        assert!(balanced("(a [b]\n)"));
    }

    #[test]
    fn test_brackets_inside_strings_are_ignored() {
        assert!(balanced("print \"[\"\n"));
        assert!(!balanced("[print \"]\"\n"));
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        assert!(balanced("print \"a\\\"[\"\n"));
    }

    #[test]
    fn test_overclosed_counts_as_balanced() {
        assert!(balanced("a]]\n"));
    }
}
