//! Token list problems: merge (4), intersection (8) and difference (9).
//!
//! Tokens are compared as strings, so `"10"` sorts before `"9"`.

use std::collections::HashSet;

/// Merge step of a merge sort over two token lists. On equal tokens the
/// one from `left` goes first.
pub fn merge_sorted(left: &str, right: &str) -> String {
    let left: Vec<&str> = left.split_whitespace().collect();
    let right: Vec<&str> = right.split_whitespace().collect();

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if left[i] <= right[j] {
            merged.push(left[i]);
            i += 1;
        } else {
            merged.push(right[j]);
            j += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);

    merged.join(" ")
}

/// Tokens present in both lists, once each, in the order they first
/// appear in `second`.
pub fn intersection(first: &str, second: &str) -> String {
    let mut pending: HashSet<&str> = first.split_whitespace().collect();

    second
        .split_whitespace()
        .filter(|token| pending.remove(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tokens of `first` that never appear in `second`, keeping the order
/// and repetitions of `first`.
pub fn difference(first: &str, second: &str) -> String {
    let excluded: HashSet<&str> = second.split_whitespace().collect();

    first
        .split_whitespace()
        .filter(|token| !excluded.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}
