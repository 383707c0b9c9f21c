#![forbid(unsafe_code)]

//! Ordered shallow equality over dependency slices.

/// Pairwise, ordered, same-length equality check over two slices.
///
/// Elements are compared with `PartialEq` only — no deep or recursive
/// comparison beyond what the element type itself defines. A reordering
/// of otherwise identical elements counts as a difference.
#[must_use]
pub fn shallow_eq<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}
