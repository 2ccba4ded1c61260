//! Shallow and deep copying, and in-place overwrite

use std::rc::Rc;

use super::{FunctionValue, Payload, Value};

impl Value {
    /// A fresh value holding a shallow copy of the payload.
    ///
    /// Strings duplicate their bytes. Arrays get a new container whose
    /// elements alias the originals. Functions alias their parameter list
    /// and share their body. Externals share their host data.
    pub fn shallow_copy(&self) -> Value {
        Value::from_payload(self.payload_snapshot(false))
    }

    /// A fresh value holding a deep copy of the payload.
    ///
    /// Arrays copy every element recursively and functions copy their
    /// parameter list; function bodies are always shared. A value that
    /// contains itself recurses without limit, so hosts must not feed
    /// cyclic structures to this.
    pub fn deep_copy(&self) -> Value {
        Value::from_payload(self.payload_snapshot(true))
    }

    /// Overwrite this value's payload in place with a copy of `source`'s,
    /// leaving every alias of this value pointing at the new payload.
    ///
    /// Overwriting a value with itself is a no-op.
    pub fn copy_from(&self, source: &Value, deep: bool) {
        if self.ptr_eq(source) {
            return;
        }
        let snapshot = source.payload_snapshot(deep);
        *self.payload_mut() = snapshot;
    }

    fn payload_snapshot(&self, deep: bool) -> Payload {
        match &*self.payload() {
            Payload::Array(items) if deep => {
                Payload::Array(items.iter().map(|item| item.deep_copy()).collect())
            }
            Payload::Function(f) if deep => Payload::Function(FunctionValue {
                params: f.params.deep_copy(),
                body: Rc::clone(&f.body),
            }),
            // Payload::clone is the shallow copy for every type.
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shallow_array_copy_aliases_elements() {
        let inner = Value::number(1.0);
        let original = Value::array(vec![inner.clone()]);
        let copy = original.shallow_copy();

        assert!(!copy.ptr_eq(&original));
        match &*copy.payload() {
            Payload::Array(items) => assert!(items[0].ptr_eq(&inner)),
            other => panic!("expected array, got {other:?}"),
        };
    }

    #[test]
    fn test_deep_array_copy_detaches_elements() {
        let inner = Value::string("leaf");
        let original = Value::array(vec![inner.clone()]);
        let copy = original.deep_copy();

        match &*copy.payload() {
            Payload::Array(items) => {
                assert!(!items[0].ptr_eq(&inner));
                assert_eq!(items[0].string_bytes(), Some(b"leaf".to_vec()));
            }
            other => panic!("expected array, got {other:?}"),
        }
        // The original element is untouched by mutating the copy.
        if let Payload::Array(items) = &*copy.payload() {
            *items[0].payload_mut() = Payload::Number(9.0);
        }
        assert_eq!(inner.string_bytes(), Some(b"leaf".to_vec()));
    }

    #[test]
    fn test_copy_from_rebinds_every_alias() {
        let a = Value::number(1.0);
        let alias = a.clone();
        a.copy_from(&Value::string("now a string"), false);
        assert_eq!(alias.string_bytes(), Some(b"now a string".to_vec()));
    }

    #[test]
    fn test_copy_from_self_is_noop() {
        let a = Value::number(7.0);
        a.copy_from(&a.clone(), false);
        assert_eq!(a.as_number(), Some(7.0));
    }

    #[test]
    fn test_copy_from_does_not_link_source() {
        let a = Value::nil();
        let b = Value::number(3.0);
        a.copy_from(&b, false);
        *b.payload_mut() = Payload::Number(4.0);
        assert_eq!(a.as_number(), Some(3.0));
    }

    #[test]
    fn test_deep_copy_shares_function_body() {
        use super::super::FunctionValue;
        use crate::ast::{Node, NodeKind};

        let body = Node {
            kind: NodeKind::Expr(Vec::new()),
            line: 1,
            script: Rc::from("test.qb"),
        };
        let f = Value::function(FunctionValue::new(vec![b"x".to_vec()], body));
        let copy = f.deep_copy();

        match (&*f.payload(), &*copy.payload()) {
            (Payload::Function(orig), Payload::Function(dup)) => {
                assert!(Rc::ptr_eq(&orig.body, &dup.body));
                assert!(!orig.params.ptr_eq(&dup.params));
            }
            _ => panic!("expected two functions"),
        };
    }
}
