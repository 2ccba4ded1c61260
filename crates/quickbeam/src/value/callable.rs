//! Function and external payloads

use std::any::Any;
use std::rc::Rc;

use crate::ast::Node;

use super::{Payload, Value};

/// A script function: parameter names plus a captured body.
///
/// The parameter list is itself an Array value of Strings, so copies of a
/// function follow the same shallow-alias and deep-copy rules as any other
/// array, and `sizeof` on the parameter list behaves like any array. The
/// body is shared; its strong count is the number of function values and
/// host handles keeping it alive.
#[derive(Debug, Clone)]
pub struct FunctionValue {
    /// Array value of String values naming the positional parameters.
    pub params: Value,

    /// The captured body, shared across copies.
    pub body: Rc<Node>,
}

impl FunctionValue {
    /// Capture `body` with the given parameter names.
    pub fn new(param_names: Vec<Vec<u8>>, body: Node) -> Self {
        let params = param_names.into_iter().map(Value::string).collect();
        Self {
            params: Value::array(params),
            body: Rc::new(body),
        }
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        match &*self.params.payload() {
            Payload::Array(items) => items.len(),
            _ => 0,
        }
    }

    /// Parameter names in declaration order.
    ///
    /// A parameter entry that is not a String binds under the empty name.
    pub fn param_names(&self) -> Vec<Vec<u8>> {
        match &*self.params.payload() {
            Payload::Array(items) => items
                .iter()
                .map(|item| item.string_bytes().unwrap_or_default())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Opaque host data carried through the interpreter untouched.
///
/// Scripts cannot construct or unpack externals; they can only pass them
/// along, compare them, and test them for truth. Identity is the pointer of
/// the primary slot. An external with an empty primary slot is the falsy
/// external.
#[derive(Clone)]
pub struct ExternalValue {
    /// Primary host payload; `None` makes the value falsy.
    pub data: Option<Rc<dyn Any>>,

    /// Secondary host payload, ignored by the interpreter.
    pub aux: Option<Rc<dyn Any>>,
}

impl ExternalValue {
    /// Wrap host data in an external.
    pub fn new(data: Rc<dyn Any>) -> Self {
        Self {
            data: Some(data),
            aux: None,
        }
    }

    /// The falsy external, carrying nothing.
    pub fn null() -> Self {
        Self {
            data: None,
            aux: None,
        }
    }

    /// Pointer identity of the primary slot, 0 when absent.
    pub fn addr(&self) -> usize {
        self.data
            .as_ref()
            .map(|rc| Rc::as_ptr(rc) as *const () as usize)
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for ExternalValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExternalValue(0x{:x})", self.addr())
    }
}
