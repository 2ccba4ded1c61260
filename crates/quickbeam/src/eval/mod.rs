//! The evaluator: chain walking, previous-value threading, and dispatch

mod arrays;
mod binding;
mod control;
mod functions;
mod introspect;
mod load;
mod numeric;
mod output;

use indexmap::IndexMap;

use crate::ast::{Node, NodeKind};
use crate::error::EvalError;
use crate::interp::{ActionCall, ActionFn, Interp};
use crate::value::{Payload, Value};

pub(crate) type EvalResult = Result<Value, EvalError>;

// ═══════════════════════════════════════════════════════════════════════
// Core Walk
// ═══════════════════════════════════════════════════════════════════════

impl Interp {
    /// Evaluate one node. `previous` is the running result slot every
    /// dispatch writes into; `single` stops statement chains after their
    /// first expression, which is how a node in argument position
    /// evaluates without dragging its siblings along.
    pub(crate) fn eval_node(
        &mut self,
        node: &Node,
        previous: &mut Value,
        single: bool,
    ) -> EvalResult {
        match &node.kind {
            NodeKind::Value(v) => Ok(v.clone()),
            NodeKind::Word(name) => Ok(self.resolve_word(name)),
            NodeKind::Expr(kids) => {
                self.enter_expr(node)?;
                let result = self.eval_expr(node, kids, previous, single);
                self.exit_expr();
                result
            }
        }
    }

    fn eval_expr(
        &mut self,
        node: &Node,
        kids: &[Node],
        previous: &mut Value,
        single: bool,
    ) -> EvalResult {
        // Empty brackets pass the predecessor's result through.
        let Some(head) = kids.first() else {
            return Ok(previous.clone());
        };
        if head.is_expr() {
            return self.eval_chain(kids, previous, single);
        }
        let action = self.eval_node(head, previous, single)?;
        let value = self.dispatch(node, &action, &kids[1..], previous)?;
        *previous = value.clone();
        Ok(value)
    }

    /// Walk expressions in statement position, threading `previous`
    /// through each. A leaf or an empty pair in statement position ends
    /// the chain early with the running previous value.
    pub(crate) fn eval_chain(
        &mut self,
        elems: &[Node],
        previous: &mut Value,
        single: bool,
    ) -> EvalResult {
        let mut ret = previous.clone();
        for elem in elems {
            let stops = match &elem.kind {
                NodeKind::Expr(kids) => kids.is_empty(),
                _ => true,
            };
            if stops {
                return Ok(previous.clone());
            }
            ret = self.eval_node(elem, previous, single)?;
            if single {
                break;
            }
        }
        Ok(ret)
    }

    fn resolve_word(&self, name: &str) -> Value {
        // $nil is reserved and always a fresh nil; so is any unbound name.
        if name == "nil" {
            return Value::nil();
        }
        match self.env().lookup(name.as_bytes()) {
            Some(value) => value.clone(),
            None => Value::nil(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Argument Evaluation
    // ═══════════════════════════════════════════════════════════════════

    /// Evaluate exactly one argument node, leaving its siblings alone.
    pub fn eval_arg(&mut self, arg: &Node, previous: &mut Value) -> EvalResult {
        self.eval_node(arg, previous, true)
    }

    /// Evaluate an argument and everything after it as one statement
    /// sequence, yielding the last expression's value. Body arguments of
    /// `if`, `loop`, and `else` evaluate this way.
    pub fn eval_rest(&mut self, args: &[Node], previous: &mut Value) -> EvalResult {
        match args.first() {
            None => Ok(previous.clone()),
            Some(head) if head.is_expr() => self.eval_chain(args, previous, false),
            Some(head) => self.eval_node(head, previous, false),
        }
    }

    pub(crate) fn number_arg(
        &mut self,
        node: &Node,
        arg: &Node,
        previous: &mut Value,
        action: &str,
    ) -> Result<f64, EvalError> {
        let value = self.eval_arg(arg, previous)?;
        let result = match &*value.payload() {
            Payload::Number(n) => Ok(*n),
            _ => Err(EvalError::wrong_type(node, action, "a number argument")),
        };
        result
    }

    // ═══════════════════════════════════════════════════════════════════
    // Dispatch
    // ═══════════════════════════════════════════════════════════════════

    /// Resolve an action value to a handler and run it. The layers try in
    /// order: builtin table, function bound under the name, host router,
    /// host shell. A value no layer accepts is a hard error.
    fn dispatch(
        &mut self,
        node: &Node,
        action: &Value,
        args: &[Node],
        previous: &mut Value,
    ) -> EvalResult {
        let name_bytes = action.string_bytes();
        let name = name_bytes
            .as_deref()
            .and_then(|bytes| std::str::from_utf8(bytes).ok());
        let call = ActionCall {
            action,
            name,
            node,
            args,
        };

        if let Some(bytes) = name_bytes.as_deref() {
            if let Some(handler) = name.and_then(|n| self.action(n)) {
                return handler(self, &call, previous);
            }
            if let Some(bound) = self.env().lookup(bytes).cloned() {
                if bound.is_function() {
                    return functions::invoke(self, node, &bound, args, previous);
                }
            }
        }

        if let Some(router) = self.router() {
            if let Some(value) = router(self, &call, previous)? {
                return Ok(value);
            }
        }

        if let (Some(bytes), Some(shell)) = (name_bytes.as_deref(), self.shell()) {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(self.eval_arg(arg, previous)?);
            }
            if let Some(value) = shell(self, bytes, &values)? {
                return Ok(value);
            }
        }

        Err(EvalError::unknown_action(node, action))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Builtin Table
// ═══════════════════════════════════════════════════════════════════════

/// The builtin actions, in their canonical order.
pub(crate) fn action_table() -> IndexMap<&'static str, ActionFn> {
    let mut table: IndexMap<&'static str, ActionFn> = IndexMap::new();

    // Output and rendering
    table.insert("print", output::print as ActionFn);
    table.insert("string", output::string);

    // Sequencing, conditionals, loops
    table.insert("pass", control::pass);
    table.insert("if", control::conditional);
    table.insert("elseif", control::conditional);
    table.insert("loop", control::conditional);
    table.insert("else", control::else_branch);
    table.insert("&&", control::logical);
    table.insert("||", control::logical);

    // Bindings
    table.insert("global", binding::binding);
    table.insert("local", binding::binding);

    // Functions
    table.insert("function", functions::function);
    table.insert("call", functions::call);

    // Values and arrays
    table.insert("copy", arrays::copy);
    table.insert("array", arrays::array);
    table.insert("get", arrays::get);
    table.insert("set", arrays::set);
    table.insert("insert", arrays::insert);
    table.insert("remove", arrays::remove);

    // Introspection and conversion
    table.insert("typeof", introspect::type_of);
    table.insert("sizeof", introspect::size_of);
    table.insert("string-hash", introspect::string_hash);
    table.insert("self-name", introspect::self_name);
    table.insert("number", introspect::number);
    table.insert("asc", introspect::asc);
    table.insert("char", introspect::char_at);

    // Loading source at runtime
    table.insert("import", load::import);
    table.insert("eval", load::eval);

    // Relationals
    table.insert("==", numeric::relational);
    table.insert("!=", numeric::relational);
    table.insert("<", numeric::relational);
    table.insert("<=", numeric::relational);
    table.insert(">", numeric::relational);
    table.insert(">=", numeric::relational);

    // Arithmetic and bitwise
    table.insert("+", numeric::arithmetic);
    table.insert("-", numeric::arithmetic);
    table.insert("*", numeric::arithmetic);
    table.insert("/", numeric::arithmetic);
    table.insert("**", numeric::arithmetic);
    table.insert("%", numeric::arithmetic);
    table.insert(">>", numeric::arithmetic);
    table.insert("<<", numeric::arithmetic);
    table.insert("&", numeric::arithmetic);
    table.insert("^", numeric::arithmetic);
    table.insert("|", numeric::arithmetic);

    // Unary forms
    table.insert("~", numeric::unary);
    table.insert("!", numeric::unary);
    table.insert("++", numeric::unary);
    table.insert("--", numeric::unary);

    // Math functions
    table.insert("sin", numeric::math);
    table.insert("cos", numeric::math);
    table.insert("tan", numeric::math);
    table.insert("asin", numeric::math);
    table.insert("acos", numeric::math);
    table.insert("atan", numeric::math);
    table.insert("sinh", numeric::math);
    table.insert("cosh", numeric::math);
    table.insert("tanh", numeric::math);
    table.insert("exp", numeric::math);
    table.insert("log", numeric::math);
    table.insert("log10", numeric::math);
    table.insert("sqrt", numeric::math);
    table.insert("fabs", numeric::math);
    table.insert("floor", numeric::math);
    table.insert("ceil", numeric::math);

    table
}
