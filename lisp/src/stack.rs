// Parsing and evaluation recurse on the native stack. Deep but legal inputs
// get a heap allocated stack segment instead of overflowing; the depth
// limits in parser.rs and eval.rs bound how far that can go.

const RED_ZONE: usize = 100 * 1024;
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
