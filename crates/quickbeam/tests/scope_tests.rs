//! The scope chain as scripts observe it: global, local, shadowing

use quickbeam::*;

fn run(src: &str) -> Value {
    Interp::new().run(src, "test.qb").expect("script failed")
}

fn run_number(src: &str) -> f64 {
    run(src).as_number().expect("expected a number result")
}

// ═══════════════════════════════════════════════════════════════════════
// Binding and Existence Tests
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_binding_returns_the_stored_value() {
    assert_eq!(run_number("[local \"x\" 5]"), 5.0);
    assert_eq!(run_number("[global \"x\" 6]"), 6.0);
}

#[test]
fn test_one_argument_is_an_existence_test() {
    assert_eq!(run_number("[local \"x\" 0][local \"x\"]"), 1.0);
    assert_eq!(run_number("[local \"x\"]"), 0.0);
    assert_eq!(run_number("[global \"x\" 0][global \"x\"]"), 1.0);
    assert_eq!(run_number("[global \"x\"]"), 0.0);
}

#[test]
fn test_existence_test_sees_only_its_own_scope() {
    // A global is not a local inside a function frame, and vice versa.
    let src = "[global \"x\" 5][function \"f\" [local \"x\"]][f]";
    assert_eq!(run_number(src), 0.0);

    let src = "[function \"f\" [[local \"y\" 1][global \"y\"]]][f]";
    assert_eq!(run_number(src), 0.0);
}

#[test]
fn test_rebinding_overwrites() {
    assert_eq!(run_number("[local \"x\" 1][local \"x\" 2][pass $x]"), 2.0);
}

#[test]
fn test_binding_stores_a_copy_not_an_alias() {
    // b gets its own number; rewriting a afterwards does not move b.
    let src = "[global \"a\" 5][global \"b\" $a][set $a 6][pass $b]";
    assert_eq!(run_number(src), 5.0);
}

// ═══════════════════════════════════════════════════════════════════════
// Frames Around Function Calls
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_global_write_from_inside_a_function() {
    let src = "[function \"f\" [global \"g\" 7]][f][pass $g]";
    assert_eq!(run_number(src), 7.0);
}

#[test]
fn test_local_dies_with_its_frame() {
    let src = "[function \"f\" [local \"l\" 7]][f][typeof $l]";
    assert_eq!(run_number(src), 1.0); // nil
}

#[test]
fn test_parameter_shadows_an_outer_binding() {
    let src = "[global \"x\" 1][function \"f\" \"x\" [pass $x]][f 9]";
    assert_eq!(run_number(src), 9.0);
}

#[test]
fn test_outer_binding_survives_shadowing() {
    let src = "[global \"x\" 1][function \"f\" \"x\" [pass $x]][f 9][pass $x]";
    assert_eq!(run_number(src), 1.0);
}

#[test]
fn test_inner_frames_read_outward() {
    let src = "[global \"x\" 3][function \"f\" [+ $x 1]][f]";
    assert_eq!(run_number(src), 4.0);
}

#[test]
fn test_at_top_level_local_and_global_share_the_root() {
    let src = "[local \"x\" 5][global \"x\"]";
    assert_eq!(run_number(src), 1.0);
}

// ═══════════════════════════════════════════════════════════════════════
// Hash-Only Matching
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_colliding_names_are_one_binding() {
    // costarring and liquid collide under the 32-bit hash; the language
    // matches bindings on the hash alone, so they are the same variable.
    let src = "[local \"costarring\" 1][pass $liquid]";
    assert_eq!(run_number(src), 1.0);
}

// ═══════════════════════════════════════════════════════════════════════
// Host-Side Scope Access
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_host_staged_bindings_are_visible() {
    let mut interp = Interp::new();
    interp.env_mut().define(b"seed", Value::number(6.0));
    let result = interp.run("[* $seed 7]", "test.qb").unwrap();
    assert_eq!(result.as_number(), Some(42.0));
}

#[test]
fn test_script_bindings_are_visible_to_the_host() {
    let mut interp = Interp::new();
    interp.run("[global \"answer\" 42]", "test.qb").unwrap();
    let bound = interp.env().lookup(b"answer").and_then(|v| v.as_number());
    assert_eq!(bound, Some(42.0));
}

#[test]
fn test_frames_are_balanced_after_evaluation() {
    let mut interp = Interp::new();
    let before = interp.env().depth();
    interp
        .run("[function \"f\" [[function \"g\" [pass 1]][g]]][f]", "test.qb")
        .unwrap();
    assert_eq!(interp.env().depth(), before);
}

#[test]
fn test_frames_are_balanced_after_a_call_error() {
    let mut interp = Interp::new();
    let before = interp.env().depth();
    let result = interp.run("[function \"f\" \"a\" [pass $a]][f]", "test.qb");
    assert!(result.is_err());
    assert_eq!(interp.env().depth(), before);
}

#[test]
fn test_scope_teardown_releases_values() {
    let mut interp = Interp::new();
    let shared = Value::number(5.0);
    interp.env_mut().push_frame();
    interp.env_mut().define(b"v", shared.clone());
    assert_eq!(shared.ref_count(), 2);
    interp.env_mut().pop_frame();
    assert_eq!(shared.ref_count(), 1);
}
