#![forbid(unsafe_code)]

//! Run chunking: split a sequence into maximal consecutive runs sharing a key.
//!
//! Each element's key is compared only with the key of the element right
//! before it, so equal keys that are not adjacent stay in separate runs.
//!
//! ```
//! use tabweave_core::chunk::chunk;
//!
//! let runs = chunk(['a', 'a', 'b', 'a'], |c| *c);
//! let keys: Vec<char> = runs.iter().map(|run| run.key).collect();
//! assert_eq!(keys, vec!['a', 'b', 'a']);
//! ```

use std::ops::Range;

/// A maximal run of consecutive elements mapping to the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<K, T> {
    pub key: K,
    pub items: Vec<T>,
}

impl<K, T> Run<K, T> {
    /// Number of elements in the run (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Runs produced by [`chunk`] are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Group `items` into maximal runs of equal adjacent keys, in input order.
///
/// Concatenating the returned runs reproduces the input exactly.
pub fn chunk<T, K, F>(items: impl IntoIterator<Item = T>, mut key_fn: F) -> Vec<Run<K, T>>
where
    K: PartialEq,
    F: FnMut(&T) -> K,
{
    let mut runs: Vec<Run<K, T>> = Vec::new();
    for item in items {
        let key = key_fn(&item);
        match runs.last_mut() {
            Some(run) if run.key == key => run.items.push(item),
            _ => runs.push(Run {
                key,
                items: vec![item],
            }),
        }
    }
    runs
}

/// Same contract as [`chunk`] over a slice, yielding index ranges instead of
/// moved elements.
pub fn chunk_ranges<T, K, F>(items: &[T], mut key_fn: F) -> Vec<(K, Range<usize>)>
where
    K: PartialEq,
    F: FnMut(&T) -> K,
{
    let mut runs: Vec<(K, Range<usize>)> = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let key = key_fn(item);
        match runs.last_mut() {
            Some((last, range)) if *last == key => range.end = index + 1,
            _ => runs.push((key, index..index + 1)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_runs() {
        let runs = chunk(Vec::<u8>::new(), |x| *x);
        assert!(runs.is_empty());
        assert!(chunk_ranges::<u8, u8, _>(&[], |x| *x).is_empty());
    }

    #[test]
    fn non_adjacent_keys_stay_separate() {
        let runs = chunk(["a", "a", "b", "a"], |s| *s);
        assert_eq!(
            runs,
            vec![
                Run {
                    key: "a",
                    items: vec!["a", "a"]
                },
                Run {
                    key: "b",
                    items: vec!["b"]
                },
                Run {
                    key: "a",
                    items: vec!["a"]
                },
            ]
        );
    }

    #[test]
    fn ranges_cover_the_slice() {
        let values = [1, 1, 2, 2, 2, 1, 3];
        let ranges = chunk_ranges(&values, |v| *v);
        assert_eq!(ranges, vec![(1, 0..2), (2, 2..5), (1, 5..6), (3, 6..7)]);
    }

    #[test]
    fn derived_keys() {
        let runs = chunk(1..=7, |n| n % 3 == 0);
        let shapes: Vec<(bool, usize)> = runs.iter().map(|run| (run.key, run.len())).collect();
        assert_eq!(
            shapes,
            vec![(false, 2), (true, 1), (false, 2), (true, 1), (false, 1)]
        );
    }
}
