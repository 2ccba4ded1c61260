//! RAII scope guard for automatic frame cleanup

use super::Environment;

/// Guard that pops a frame when dropped, for hosts that stage bindings
/// around an evaluation.
///
/// # Example
///
/// ```
/// use quickbeam::{Environment, Value};
///
/// let mut env = Environment::new();
/// env.define(b"x", Value::number(1.0));
///
/// {
///     let mut guard = env.scope_guard();
///     guard.define(b"y", Value::number(2.0));
///     assert!(guard.lookup(b"y").is_some());
/// }
/// // Frame popped, y is gone.
/// assert!(env.lookup(b"y").is_none());
/// assert!(env.lookup(b"x").is_some());
/// ```
pub struct ScopeGuard<'a> {
    env: &'a mut Environment,
}

impl Environment {
    /// Push a frame now and pop it when the returned guard drops.
    pub fn scope_guard(&mut self) -> ScopeGuard<'_> {
        self.push_frame();
        ScopeGuard { env: self }
    }
}

impl<'a> Drop for ScopeGuard<'a> {
    fn drop(&mut self) {
        self.env.pop_frame();
    }
}

impl<'a> std::ops::Deref for ScopeGuard<'a> {
    type Target = Environment;

    fn deref(&self) -> &Self::Target {
        self.env
    }
}

impl<'a> std::ops::DerefMut for ScopeGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_guard_pushes_and_pops() {
        let mut env = Environment::new();
        let initial = env.depth();
        {
            let guard = env.scope_guard();
            assert_eq!(guard.depth(), initial + 1);
        }
        assert_eq!(env.depth(), initial);
    }

    #[test]
    fn test_guard_isolates_bindings() {
        let mut env = Environment::new();
        env.define(b"outer", Value::number(1.0));
        {
            let mut guard = env.scope_guard();
            guard.define(b"inner", Value::number(2.0));
            assert!(guard.lookup(b"outer").is_some());
            assert!(guard.lookup(b"inner").is_some());
        }
        assert!(env.lookup(b"outer").is_some());
        assert!(env.lookup(b"inner").is_none());
    }

    #[test]
    fn test_guard_shadowing_reverts_on_drop() {
        let mut env = Environment::new();
        env.define(b"x", Value::number(1.0));
        {
            let mut guard = env.scope_guard();
            guard.define(b"x", Value::number(2.0));
            assert_eq!(guard.lookup(b"x").and_then(|v| v.as_number()), Some(2.0));
        }
        assert_eq!(env.lookup(b"x").and_then(|v| v.as_number()), Some(1.0));
    }

    #[test]
    fn test_nested_guards() {
        let mut env = Environment::new();
        env.define(b"a", Value::number(1.0));
        {
            let mut guard1 = env.scope_guard();
            guard1.define(b"b", Value::number(2.0));
            {
                let mut guard2 = guard1.scope_guard();
                guard2.define(b"c", Value::number(3.0));
                assert!(guard2.lookup(b"a").is_some());
                assert!(guard2.lookup(b"b").is_some());
                assert!(guard2.lookup(b"c").is_some());
            }
            assert!(guard1.lookup(b"c").is_none());
            assert!(guard1.lookup(b"b").is_some());
        }
        assert!(env.lookup(b"a").is_some());
        assert!(env.lookup(b"b").is_none());
    }

    #[test]
    fn test_mutation_through_alias_survives_guard() {
        // Payload mutation is not a binding: changes made through an alias
        // persist after the frame that held the alias is gone.
        let mut env = Environment::new();
        let shared = Value::number(10.0);
        env.define(b"x", shared.clone());
        {
            let mut guard = env.scope_guard();
            guard.define(b"alias", shared.clone());
            if let Some(v) = guard.lookup(b"alias") {
                *v.payload_mut() = crate::Payload::Number(20.0);
            }
        }
        assert_eq!(env.lookup(b"x").and_then(|v| v.as_number()), Some(20.0));
    }
}
