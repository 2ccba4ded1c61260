//! # Quickbeam
//!
//! An embeddable interpreter for a tiny, dynamically-typed, S-expression
//! scripting language in which almost nothing is built into the grammar:
//! `if`, `loop`, arithmetic, and binding are all ordinary *actions*
//! resolved by name when an expression evaluates. Hosts extend the
//! language the same way the builtins are written, by handling action
//! names through a router callback.
//!
//! Values are shared, reference-counted handles with interior mutability:
//! assignment through one alias is visible through every other, which is
//! what makes `set`, `++`, and output capture work on plain values with
//! no variable machinery in the language itself.
//!
//! ## Architecture
//!
//! - **Parser**: source text to an AST of nested statement chains
//! - **Values**: shared handles over tagged, mutable payloads
//! - **Scope chain**: flat frames of hash-keyed bindings
//! - **Evaluator**: a chain walker threading a previous-value slot, with
//!   layered dispatch (builtins, bound functions, host router, host shell)
//!
//! ## Example
//!
//! ```
//! use quickbeam::Interp;
//!
//! let mut interp = Interp::new();
//! let result = interp
//!     .run("[local \"n\" 0] [loop [< $n 5] [++ $n]] [pass $n]", "demo.qb")
//!     .unwrap();
//! assert_eq!(result.as_number(), Some(5.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod environment;
pub mod error;
mod eval;
pub mod hash;
pub mod interp;
pub mod parse;
pub mod table;
pub mod value;

// Re-export main types
pub use ast::{Node, NodeKind};
pub use environment::{Binding, Environment, ScopeGuard};
pub use error::{EvalError, ParseError, QuickbeamError, Result};
pub use interp::{
    ActionCall, DiagSink, FileReader, Interp, Router, ShellExec, DEFAULT_MAX_DEPTH,
};
pub use parse::{parse, parse_numbered};
pub use value::{format_number, ExternalValue, FunctionValue, Payload, Value, ValueKind};

/// Quickbeam version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
