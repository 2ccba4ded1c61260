//! Error types for parsing and evaluation

use thiserror::Error;

use crate::ast::Node;
use crate::value::Value;

/// A failure while turning source text into an AST.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parser error: {script}: line {line}: {message}")]
pub struct ParseError {
    /// Name of the script being parsed.
    pub script: String,
    /// 1-based line the parser had reached.
    pub line: u32,
    /// What went wrong.
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(script: &str, line: u32, message: impl Into<String>) -> Self {
        Self {
            script: script.to_string(),
            line,
            message: message.into(),
        }
    }
}

/// A fatal failure while evaluating an AST.
///
/// Every variant carries the script name and line of the expression that
/// failed. Fatal means fatal: evaluation unwinds immediately and no part of
/// the surrounding script runs. Soft failures (an `import` that cannot read
/// its file, an `eval` of bad source) are reported through the diagnostic
/// sink instead and never take this form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The action position held a value no dispatch layer recognized.
    #[error("eval error: {script}: line {line}: unknown action {action}")]
    UnknownAction {
        /// Script the expression came from.
        script: String,
        /// Line of the expression.
        line: u32,
        /// Rendering of the unrecognized action value.
        action: String,
    },

    /// A builtin received fewer arguments than it requires.
    #[error("eval error: {script}: line {line}: {action} takes at least {expected} argument(s)")]
    NotEnoughArguments {
        /// Script the expression came from.
        script: String,
        /// Line of the expression.
        line: u32,
        /// Name of the builtin.
        action: String,
        /// Minimum number of arguments.
        expected: usize,
    },

    /// An argument evaluated to a type the builtin cannot use.
    #[error("eval error: {script}: line {line}: {action} expected {expected}")]
    WrongType {
        /// Script the expression came from.
        script: String,
        /// Line of the expression.
        line: u32,
        /// Name of the builtin.
        action: String,
        /// Description of what was required.
        expected: String,
    },

    /// An index was negative or past the end of an array or string.
    #[error("eval error: {script}: line {line}: {action} index {index} out of bounds for length {len}")]
    OutOfBounds {
        /// Script the expression came from.
        script: String,
        /// Line of the expression.
        line: u32,
        /// Name of the builtin.
        action: String,
        /// The offending index, as evaluated.
        index: f64,
        /// Length of the indexed value.
        len: usize,
    },

    /// A function was invoked with fewer arguments than it declares.
    #[error("eval error: {script}: line {line}: function wanted {expected} argument(s) but got {got}")]
    TooFewCallArguments {
        /// Script the expression came from.
        script: String,
        /// Line of the call expression.
        line: u32,
        /// Declared parameter count.
        expected: usize,
        /// Arguments actually supplied.
        got: usize,
    },

    /// Expression nesting exceeded the interpreter's depth limit.
    #[error("eval error: {script}: line {line}: expression nesting exceeds {max} levels")]
    TooDeep {
        /// Script the expression came from.
        script: String,
        /// Line of the expression.
        line: u32,
        /// The configured limit.
        max: usize,
    },
}

impl EvalError {
    pub(crate) fn unknown_action(node: &Node, action: &Value) -> Self {
        EvalError::UnknownAction {
            script: node.script.to_string(),
            line: node.line,
            action: String::from_utf8_lossy(&action.render()).into_owned(),
        }
    }

    pub(crate) fn not_enough_args(node: &Node, action: &str, expected: usize) -> Self {
        EvalError::NotEnoughArguments {
            script: node.script.to_string(),
            line: node.line,
            action: action.to_string(),
            expected,
        }
    }

    pub(crate) fn wrong_type(node: &Node, action: &str, expected: &str) -> Self {
        EvalError::WrongType {
            script: node.script.to_string(),
            line: node.line,
            action: action.to_string(),
            expected: expected.to_string(),
        }
    }

    pub(crate) fn out_of_bounds(node: &Node, action: &str, index: f64, len: usize) -> Self {
        EvalError::OutOfBounds {
            script: node.script.to_string(),
            line: node.line,
            action: action.to_string(),
            index,
            len,
        }
    }

    pub(crate) fn too_few_call_args(node: &Node, expected: usize, got: usize) -> Self {
        EvalError::TooFewCallArguments {
            script: node.script.to_string(),
            line: node.line,
            expected,
            got,
        }
    }

    pub(crate) fn too_deep(node: &Node, max: usize) -> Self {
        EvalError::TooDeep {
            script: node.script.to_string(),
            line: node.line,
            max,
        }
    }
}

/// Union of everything a one-shot entry point can fail with.
#[derive(Error, Debug)]
pub enum QuickbeamError {
    /// The source text did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The script failed at runtime.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Convenience alias for fallible crate operations.
pub type Result<T> = std::result::Result<T, QuickbeamError>;
