//! Function definition and the call protocol

use std::rc::Rc;

use crate::ast::Node;
use crate::error::EvalError;
use crate::interp::{ActionCall, Interp};
use crate::value::{FunctionValue, Payload, Value};

use super::EvalResult;

/// `function NAME P... BODY` builds a function value from evaluated
/// parameter names and the unevaluated final argument.
///
/// The name may be nil for an anonymous function; a String name also
/// binds the function in the current scope. Parameter arguments that do
/// not evaluate to Strings are skipped. The body is captured as a copy of
/// its node, sharing literal payloads with the original, so the same
/// definition re-run yields functions with a common set of literals.
pub(crate) fn function(
    interp: &mut Interp,
    call: &ActionCall<'_>,
    previous: &mut Value,
) -> EvalResult {
    if call.args.len() < 2 {
        return Err(EvalError::not_enough_args(call.node, "function", 2));
    }
    let name_value = interp.eval_arg(&call.args[0], previous)?;
    let bind_name = match &*name_value.payload() {
        Payload::String(s) => Some(s.clone()),
        Payload::Nil => None,
        _ => {
            return Err(EvalError::wrong_type(
                call.node,
                "function",
                "a string or nil name",
            ))
        }
    };

    let mut params = Vec::new();
    for arg in &call.args[1..call.args.len() - 1] {
        let value = interp.eval_arg(arg, previous)?;
        if value.is_string() {
            params.push(value.deep_copy());
        }
    }
    let body = call.args[call.args.len() - 1].clone();
    let func = Value::function(FunctionValue {
        params: Value::array(params),
        body: Rc::new(body),
    });
    if let Some(name_bytes) = bind_name {
        interp.env_mut().define(&name_bytes, func.clone());
    }
    Ok(func)
}

/// `call F ...` invokes an explicit function value.
pub(crate) fn call(interp: &mut Interp, call: &ActionCall<'_>, previous: &mut Value) -> EvalResult {
    if call.args.is_empty() {
        return Err(EvalError::not_enough_args(call.node, "call", 1));
    }
    let target = interp.eval_arg(&call.args[0], previous)?;
    if !target.is_function() {
        return Err(EvalError::wrong_type(call.node, "call", "a function"));
    }
    invoke(interp, call.node, &target, &call.args[1..], previous)
}

/// The call protocol, shared by `call` and by dispatch on a bound
/// function name.
///
/// A fresh frame is pushed and `...` is bound first, so extra arguments
/// land there as they evaluate. Arguments evaluate in the caller's chain
/// (threading the caller's previous value) and bind by alias, not copy.
/// Supplying fewer arguments than declared parameters is an error, raised
/// only after every supplied argument has evaluated. The body runs with a
/// fresh previous value.
pub(crate) fn invoke(
    interp: &mut Interp,
    node: &Node,
    target: &Value,
    arg_nodes: &[Node],
    previous: &mut Value,
) -> EvalResult {
    let (param_names, body) = match &*target.payload() {
        Payload::Function(f) => (f.param_names(), Rc::clone(&f.body)),
        _ => return Err(EvalError::wrong_type(node, "call", "a function")),
    };

    interp.env_mut().push_frame();
    let result = bind_and_run(interp, node, &param_names, &body, arg_nodes, previous);
    interp.env_mut().pop_frame();
    result
}

fn bind_and_run(
    interp: &mut Interp,
    node: &Node,
    param_names: &[Vec<u8>],
    body: &Node,
    arg_nodes: &[Node],
    previous: &mut Value,
) -> EvalResult {
    let extras = Value::array(Vec::new());
    interp.env_mut().define(b"...", extras.clone());

    let mut count = 0;
    for arg in arg_nodes {
        let value = interp.eval_arg(arg, previous)?;
        if count < param_names.len() {
            interp.env_mut().define(&param_names[count], value);
        } else if let Payload::Array(items) = &mut *extras.payload_mut() {
            items.push(value);
        }
        count += 1;
    }
    if count < param_names.len() {
        return Err(EvalError::too_few_call_args(node, param_names.len(), count));
    }

    let mut body_previous = Value::number(0.0);
    interp.eval_node(body, &mut body_previous, false)
}
