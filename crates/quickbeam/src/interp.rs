//! Interpreter state: the scope chain, the dispatch table, and host seams

use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::Node;
use crate::environment::Environment;
use crate::error::{EvalError, QuickbeamError};
use crate::eval;
use crate::parse;
use crate::value::Value;

/// Depth limit applied to expression nesting unless the host overrides it.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// One dispatched action: the evaluated leading value of an expression plus
/// its unevaluated argument nodes.
///
/// Routers and builtins receive this and decide for themselves which
/// arguments to evaluate, and how.
pub struct ActionCall<'a> {
    /// The evaluated leading value.
    pub action: &'a Value,

    /// The action's name, when the leading value is a String holding
    /// UTF-8. Byte-string actions that are not UTF-8 leave this empty.
    pub name: Option<&'a str>,

    /// The expression being dispatched, for script and line diagnostics.
    pub node: &'a Node,

    /// The unevaluated argument nodes.
    pub args: &'a [Node],
}

/// Handler signature for builtin actions.
pub(crate) type ActionFn =
    fn(&mut Interp, &ActionCall<'_>, &mut Value) -> Result<Value, EvalError>;

/// Host callback consulted for actions the builtin table and the scope
/// chain do not resolve. Returning `Ok(None)` declines the action.
pub type Router =
    Rc<dyn Fn(&mut Interp, &ActionCall<'_>, &mut Value) -> Result<Option<Value>, EvalError>>;

/// Host file reader used by `import`. Returns `None` when the path cannot
/// be read.
pub type FileReader = Rc<dyn Fn(&[u8]) -> Option<Vec<u8>>>;

/// Host shell executor backing the final dispatch fallback. Receives the
/// action's name bytes and its already-evaluated arguments; returning
/// `Ok(None)` declines.
pub type ShellExec =
    Rc<dyn Fn(&mut Interp, &[u8], &[Value]) -> Result<Option<Value>, EvalError>>;

/// Advisory diagnostic sink. Soft failures are reported here and never
/// affect control flow.
pub type DiagSink = Rc<dyn Fn(&str)>;

/// An interpreter instance: one scope chain plus its host configuration.
///
/// ```
/// use quickbeam::Interp;
///
/// let mut interp = Interp::new();
/// let result = interp
///     .run(r#"[function "add" "a" "b" [+ $a $b]] [add 3 4]"#, "demo.qb")
///     .unwrap();
/// assert_eq!(result.as_number(), Some(7.0));
/// ```
pub struct Interp {
    env: Environment,
    actions: IndexMap<&'static str, ActionFn>,
    router: Option<Router>,
    read_file: Option<FileReader>,
    import_fallback: Option<FileReader>,
    shell: Option<ShellExec>,
    diag: DiagSink,
    depth: usize,
    max_depth: usize,
}

impl Default for Interp {
    fn default() -> Self {
        Self::new()
    }
}

impl Interp {
    /// An interpreter with the full builtin table, no host seams, and
    /// diagnostics on standard error.
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
            actions: eval::action_table(),
            router: None,
            read_file: None,
            import_fallback: None,
            shell: None,
            diag: Rc::new(|message| eprintln!("{message}")),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Host Configuration
    // ═══════════════════════════════════════════════════════════════════

    /// Install the router consulted for unknown actions.
    pub fn set_router(&mut self, router: Router) {
        self.router = Some(router);
    }

    /// Install the file reader used by `import`.
    pub fn set_read_file(&mut self, reader: FileReader) {
        self.read_file = Some(reader);
    }

    /// Install a second reader tried when the primary cannot supply a
    /// path. Embedders use this for bundled or generated sources.
    pub fn set_import_fallback(&mut self, reader: FileReader) {
        self.import_fallback = Some(reader);
    }

    /// Install the shell executor tried after every other dispatch layer.
    pub fn set_shell(&mut self, shell: ShellExec) {
        self.shell = Some(shell);
    }

    /// Replace the advisory diagnostic sink.
    pub fn set_diagnostics(&mut self, sink: DiagSink) {
        self.diag = sink;
    }

    /// Adjust the expression nesting limit.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// Send an advisory message to the diagnostic sink.
    pub fn report(&self, message: &str) {
        (self.diag)(message);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Scope Access
    // ═══════════════════════════════════════════════════════════════════

    /// The scope chain, for inspection.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// The scope chain, for staging bindings or pushing frames.
    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    // ═══════════════════════════════════════════════════════════════════
    // Evaluation Entry Points
    // ═══════════════════════════════════════════════════════════════════

    /// Parse and evaluate `source` in one step.
    pub fn run(&mut self, source: &str, script_name: &str) -> Result<Value, QuickbeamError> {
        let ast = parse::parse(source, script_name)?;
        Ok(self.eval(&ast)?)
    }

    /// Evaluate a parsed tree with a fresh previous-value slot.
    pub fn eval(&mut self, node: &Node) -> Result<Value, EvalError> {
        let mut previous = Value::number(0.0);
        self.eval_node(node, &mut previous, false)
    }

    /// Evaluate a parsed tree threading the caller's previous-value slot,
    /// so conditional cascades can span multiple submissions.
    pub fn eval_with_previous(
        &mut self,
        node: &Node,
        previous: &mut Value,
    ) -> Result<Value, EvalError> {
        self.eval_node(node, previous, false)
    }

    pub(crate) fn read_script(&self, path: &[u8]) -> Option<Vec<u8>> {
        if let Some(reader) = &self.read_file {
            if let Some(bytes) = reader(path) {
                return Some(bytes);
            }
        }
        if let Some(reader) = &self.import_fallback {
            if let Some(bytes) = reader(path) {
                return Some(bytes);
            }
        }
        None
    }

    pub(crate) fn router(&self) -> Option<Router> {
        self.router.clone()
    }

    pub(crate) fn shell(&self) -> Option<ShellExec> {
        self.shell.clone()
    }

    pub(crate) fn action(&self, name: &str) -> Option<ActionFn> {
        self.actions.get(name).copied()
    }

    pub(crate) fn enter_expr(&mut self, node: &Node) -> Result<(), EvalError> {
        if self.depth >= self.max_depth {
            return Err(EvalError::too_deep(node, self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn exit_expr(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
