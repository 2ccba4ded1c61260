//! Runtime values: shared handles over tagged, mutable payloads

mod callable;
mod copy;
mod display;

pub use callable::{ExternalValue, FunctionValue};
pub use display::format_number;

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Type codes as reported by the `typeof` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Opaque host data.
    External = 0,
    /// The absent value.
    Nil = 1,
    /// IEEE double.
    Number = 2,
    /// Raw bytes, NULs allowed.
    String = 3,
    /// Ordered sequence of aliased values.
    Array = 4,
    /// Parameter names plus a captured body.
    Function = 5,
}

/// The payload behind a value handle.
///
/// `Payload::clone` is the language's shallow copy: strings duplicate their
/// bytes, arrays build a fresh container of aliased elements, and functions
/// alias their parameter list and share their body.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Opaque host data; falsy when its primary slot is empty.
    External(ExternalValue),
    /// The absent value.
    Nil,
    /// IEEE double.
    Number(f64),
    /// Raw bytes; never assumed to be UTF-8.
    String(Vec<u8>),
    /// Ordered sequence of aliased values.
    Array(Vec<Value>),
    /// A callable script function.
    Function(FunctionValue),
}

/// A shared, mutable handle to a [`Payload`].
///
/// Cloning a handle aliases the payload rather than copying it; the number
/// of live handles is the value's reference count. Mutation through any
/// alias (`set`, `++`, `pipeout`) is visible through every other alias.
///
/// ```
/// use quickbeam::{Payload, Value};
///
/// let a = Value::number(1.0);
/// let b = a.clone();
/// assert_eq!(a.ref_count(), 2);
///
/// *a.payload_mut() = Payload::Number(5.0);
/// assert_eq!(b.as_number(), Some(5.0));
/// ```
#[derive(Clone)]
pub struct Value(Rc<RefCell<Payload>>);

impl Value {
    // ═══════════════════════════════════════════════════════════════════
    // Constructors
    // ═══════════════════════════════════════════════════════════════════

    /// A fresh nil value.
    pub fn nil() -> Self {
        Self::from_payload(Payload::Nil)
    }

    /// A fresh number value.
    pub fn number(n: f64) -> Self {
        Self::from_payload(Payload::Number(n))
    }

    /// A fresh string value from any byte source.
    pub fn string(bytes: impl Into<Vec<u8>>) -> Self {
        Self::from_payload(Payload::String(bytes.into()))
    }

    /// A fresh array value holding the given elements, aliased as given.
    pub fn array(items: Vec<Value>) -> Self {
        Self::from_payload(Payload::Array(items))
    }

    /// A fresh function value.
    pub fn function(function: FunctionValue) -> Self {
        Self::from_payload(Payload::Function(function))
    }

    /// A fresh external value.
    pub fn external(external: ExternalValue) -> Self {
        Self::from_payload(Payload::External(external))
    }

    pub(crate) fn from_payload(payload: Payload) -> Self {
        Value(Rc::new(RefCell::new(payload)))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Payload Access
    // ═══════════════════════════════════════════════════════════════════

    /// Borrow the payload for inspection.
    pub fn payload(&self) -> Ref<'_, Payload> {
        self.0.borrow()
    }

    /// Borrow the payload for in-place mutation, visible to all aliases.
    pub fn payload_mut(&self) -> RefMut<'_, Payload> {
        self.0.borrow_mut()
    }

    /// The value's type code.
    pub fn kind(&self) -> ValueKind {
        match &*self.payload() {
            Payload::External(_) => ValueKind::External,
            Payload::Nil => ValueKind::Nil,
            Payload::Number(_) => ValueKind::Number,
            Payload::String(_) => ValueKind::String,
            Payload::Array(_) => ValueKind::Array,
            Payload::Function(_) => ValueKind::Function,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Predicates
    // ═══════════════════════════════════════════════════════════════════

    /// True when the payload is nil.
    pub fn is_nil(&self) -> bool {
        matches!(&*self.payload(), Payload::Nil)
    }

    /// True when the payload is a number.
    pub fn is_number(&self) -> bool {
        matches!(&*self.payload(), Payload::Number(_))
    }

    /// True when the payload is a string.
    pub fn is_string(&self) -> bool {
        matches!(&*self.payload(), Payload::String(_))
    }

    /// True when the payload is an array.
    pub fn is_array(&self) -> bool {
        matches!(&*self.payload(), Payload::Array(_))
    }

    /// True when the payload is a function.
    pub fn is_function(&self) -> bool {
        matches!(&*self.payload(), Payload::Function(_))
    }

    /// True when the payload is an external.
    pub fn is_external(&self) -> bool {
        matches!(&*self.payload(), Payload::External(_))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors
    // ═══════════════════════════════════════════════════════════════════

    /// The number payload, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match &*self.payload() {
            Payload::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string bytes cloned out of the shared payload, if this is a
    /// string.
    pub fn string_bytes(&self) -> Option<Vec<u8>> {
        match &*self.payload() {
            Payload::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Truthiness and Identity
    // ═══════════════════════════════════════════════════════════════════

    /// The language's truth test.
    ///
    /// Nil is falsy, zero is falsy, empty strings and arrays are falsy, an
    /// external with no primary data is falsy. Everything else, NaN
    /// included, is truthy.
    pub fn is_truthy(&self) -> bool {
        match &*self.payload() {
            Payload::Nil => false,
            Payload::Number(n) => *n != 0.0,
            Payload::String(s) => !s.is_empty(),
            Payload::Array(items) => !items.is_empty(),
            Payload::Function(_) => true,
            Payload::External(e) => e.data.is_some(),
        }
    }

    /// Number of live handles sharing this payload.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// True when both handles share one payload.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Value {
    /// Structural equality, mirroring what the `==` action can observe:
    /// numbers by value, strings by bytes, arrays element-wise, functions
    /// by parameter list and shared body, externals by identity.
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (&*self.payload(), &*other.payload()) {
            (Payload::Nil, Payload::Nil) => true,
            (Payload::Number(a), Payload::Number(b)) => a == b,
            (Payload::String(a), Payload::String(b)) => a == b,
            (Payload::Array(a), Payload::Array(b)) => a == b,
            (Payload::Function(a), Payload::Function(b)) => {
                a.params == b.params && Rc::ptr_eq(&a.body, &b.body)
            }
            (Payload::External(a), Payload::External(b)) => a.addr() == b.addr(),
            _ => false,
        }
    }
}
