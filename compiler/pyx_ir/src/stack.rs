//! Stack growth for recursive walks over the tree.
//!
//! The parser and the environment-dependence analysis both recurse once per
//! nesting level; deeply nested source would otherwise overflow the native
//! stack.

/// Run `f`, growing the native stack first if fewer than 100 KiB remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    const RED_ZONE: usize = 100 * 1024;
    const GROWTH: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
