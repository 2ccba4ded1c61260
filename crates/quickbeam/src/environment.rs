//! The scope chain: frames of hash-keyed bindings

mod frame;

pub use frame::ScopeGuard;

use crate::hash::hash_bytes;
use crate::value::Value;

/// A single name binding.
///
/// Only the 32-bit hash of the name is stored. Lookups compare hashes
/// alone, so two distinct names that hash alike are the same binding.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Hash of the binding's name.
    pub hash: u32,

    /// The bound value.
    pub value: Value,
}

/// The scope chain backing an interpreter.
///
/// Uses a flat binding array with frame boundaries: entering a scope
/// records the array length, leaving one truncates back to it. Lookups
/// scan from the end, which visits inner frames before outer ones.
///
/// # Example
///
/// ```
/// use quickbeam::{Environment, Value};
///
/// let mut env = Environment::new();
/// env.define(b"x", Value::number(1.0));
///
/// env.push_frame();
/// env.define(b"x", Value::number(10.0)); // shadows the outer x
/// assert_eq!(env.lookup(b"x").and_then(|v| v.as_number()), Some(10.0));
///
/// env.pop_frame();
/// assert_eq!(env.lookup(b"x").and_then(|v| v.as_number()), Some(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    /// All bindings in a flat array, most recent at the end.
    bindings: Vec<Binding>,

    /// Frame boundaries: indices into `bindings` where each scope begins.
    frames: Vec<usize>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create an environment holding only the empty root scope.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            frames: vec![0],
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Frame Management
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a new scope.
    pub fn push_frame(&mut self) {
        self.frames.push(self.bindings.len());
    }

    /// Leave the current scope, dropping every binding made inside it.
    ///
    /// The root scope is never popped.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            if let Some(boundary) = self.frames.pop() {
                self.bindings.truncate(boundary);
            }
        }
    }

    /// Number of live frames, root included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// True when the innermost scope is the root scope.
    pub fn is_root(&self) -> bool {
        self.frames.len() == 1
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Definition
    // ═══════════════════════════════════════════════════════════════════

    /// Bind `name` in the innermost scope, overwriting a binding with the
    /// same hash already present there.
    pub fn define(&mut self, name: &[u8], value: Value) {
        let hash = hash_bytes(name);
        let start = self.innermost_start();
        if let Some(binding) = self.bindings[start..].iter_mut().find(|b| b.hash == hash) {
            binding.value = value;
            return;
        }
        self.bindings.push(Binding { hash, value });
    }

    /// Bind `name` in the root scope, overwriting a root binding with the
    /// same hash, without touching inner frames.
    pub fn define_global(&mut self, name: &[u8], value: Value) {
        let hash = hash_bytes(name);
        let root_end = self.root_end();
        if let Some(binding) = self.bindings[..root_end].iter_mut().find(|b| b.hash == hash) {
            binding.value = value;
            return;
        }
        // Splice into the root frame and shift every later frame boundary.
        self.bindings.insert(root_end, Binding { hash, value });
        for boundary in &mut self.frames[1..] {
            *boundary += 1;
        }
    }

    /// Drop `name` from the innermost scope. Returns whether a binding
    /// was removed.
    pub fn remove_local(&mut self, name: &[u8]) -> bool {
        let hash = hash_bytes(name);
        let start = self.innermost_start();
        if let Some(pos) = self.bindings[start..].iter().position(|b| b.hash == hash) {
            self.bindings.remove(start + pos);
            return true;
        }
        false
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Find `name` anywhere in the chain, innermost scope first.
    pub fn lookup(&self, name: &[u8]) -> Option<&Value> {
        let hash = hash_bytes(name);
        self.bindings
            .iter()
            .rev()
            .find(|b| b.hash == hash)
            .map(|b| &b.value)
    }

    /// Find `name` in the innermost scope only.
    pub fn get_local(&self, name: &[u8]) -> Option<&Value> {
        let hash = hash_bytes(name);
        let start = self.innermost_start();
        self.bindings[start..]
            .iter()
            .find(|b| b.hash == hash)
            .map(|b| &b.value)
    }

    /// Find `name` in the root scope only.
    pub fn get_global(&self, name: &[u8]) -> Option<&Value> {
        let hash = hash_bytes(name);
        let root_end = self.root_end();
        self.bindings[..root_end]
            .iter()
            .find(|b| b.hash == hash)
            .map(|b| &b.value)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Iterate over every binding in the chain, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Total number of bindings across all frames.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True when no binding exists in any frame.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Drop everything and return to a single empty root scope.
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.frames = vec![0];
    }

    fn innermost_start(&self) -> usize {
        *self.frames.last().unwrap_or(&0)
    }

    fn root_end(&self) -> usize {
        self.frames.get(1).copied().unwrap_or(self.bindings.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let mut env = Environment::new();
        env.define(b"x", Value::number(42.0));
        assert_eq!(env.lookup(b"x").and_then(|v| v.as_number()), Some(42.0));
        assert!(env.lookup(b"y").is_none());
    }

    #[test]
    fn test_define_overwrites_in_same_frame() {
        let mut env = Environment::new();
        env.define(b"x", Value::number(1.0));
        env.define(b"x", Value::number(2.0));
        assert_eq!(env.len(), 1);
        assert_eq!(env.lookup(b"x").and_then(|v| v.as_number()), Some(2.0));
    }

    #[test]
    fn test_inner_frame_shadows_outer() {
        let mut env = Environment::new();
        env.define(b"x", Value::number(1.0));
        env.push_frame();
        env.define(b"x", Value::number(2.0));
        assert_eq!(env.lookup(b"x").and_then(|v| v.as_number()), Some(2.0));
        env.pop_frame();
        assert_eq!(env.lookup(b"x").and_then(|v| v.as_number()), Some(1.0));
    }

    #[test]
    fn test_pop_never_drops_root() {
        let mut env = Environment::new();
        env.define(b"x", Value::number(1.0));
        env.pop_frame();
        env.pop_frame();
        assert_eq!(env.depth(), 1);
        assert!(env.lookup(b"x").is_some());
    }

    #[test]
    fn test_define_global_reaches_past_inner_frames() {
        let mut env = Environment::new();
        env.push_frame();
        env.define(b"local", Value::number(1.0));
        env.define_global(b"g", Value::number(9.0));

        assert_eq!(env.get_global(b"g").and_then(|v| v.as_number()), Some(9.0));
        assert!(env.get_local(b"g").is_none());
        // Inner bindings survive the splice.
        assert_eq!(env.get_local(b"local").and_then(|v| v.as_number()), Some(1.0));

        env.pop_frame();
        assert_eq!(env.lookup(b"g").and_then(|v| v.as_number()), Some(9.0));
    }

    #[test]
    fn test_local_does_not_see_outer_frames() {
        let mut env = Environment::new();
        env.define(b"x", Value::number(1.0));
        env.push_frame();
        assert!(env.get_local(b"x").is_none());
        assert!(env.lookup(b"x").is_some());
    }

    #[test]
    fn test_colliding_names_share_a_binding() {
        // costarring and liquid collide under the 32-bit hash, so the
        // second write lands on the first binding.
        let mut env = Environment::new();
        env.define(b"costarring", Value::number(1.0));
        env.define(b"liquid", Value::number(2.0));
        assert_eq!(env.len(), 1);
        assert_eq!(
            env.lookup(b"costarring").and_then(|v| v.as_number()),
            Some(2.0)
        );
    }

    #[test]
    fn test_remove_local() {
        let mut env = Environment::new();
        env.define(b"x", Value::number(1.0));
        assert!(env.remove_local(b"x"));
        assert!(!env.remove_local(b"x"));
        assert!(env.lookup(b"x").is_none());
    }

    #[test]
    fn test_pop_frame_releases_values() {
        let mut env = Environment::new();
        let shared = Value::number(5.0);
        env.push_frame();
        env.define(b"v", shared.clone());
        assert_eq!(shared.ref_count(), 2);
        env.pop_frame();
        assert_eq!(shared.ref_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut env = Environment::new();
        env.define(b"x", Value::number(1.0));
        env.push_frame();
        env.define(b"y", Value::number(2.0));
        env.clear();
        assert!(env.is_empty());
        assert_eq!(env.depth(), 1);
    }
}
