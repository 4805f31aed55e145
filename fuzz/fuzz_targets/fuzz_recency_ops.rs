#![no_main]

use libfuzzer_sys::fuzz_target;
use tabweave_recency::RecencyTracker;

fuzz_target!(|data: &[u8]| {
    let mut tracker = RecencyTracker::new();
    let mut model: Vec<u8> = Vec::new();

    for pair in data.chunks_exact(2) {
        let (op, value) = (pair[0] % 3, pair[1] % 32);
        match op {
            0 => {
                tracker.touch(value);
                model.retain(|x| *x != value);
                model.insert(0, value);
            }
            1 => {
                let removed = tracker.remove(&value);
                let before = model.len();
                model.retain(|x| *x != value);
                assert_eq!(removed, before != model.len());
            }
            _ => {
                // Replace into a fresh id only; duplicates are a caller error.
                let fresh = value + 32;
                if tracker.contains(&fresh) {
                    continue;
                }
                let replaced = tracker.replace(&value, fresh);
                match model.iter().position(|x| *x == value) {
                    Some(at) => {
                        assert!(replaced);
                        model[at] = fresh;
                    }
                    None => assert!(!replaced),
                }
            }
        }
        assert_eq!(tracker.len(), model.len());
    }
    assert_eq!(tracker.to_ordered_list(), model);
});
