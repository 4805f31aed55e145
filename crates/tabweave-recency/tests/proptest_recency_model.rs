//! Property tests for the recency tracker against a plain `Vec` model.
//!
//! 1. After any interleaving of touch/remove/replace the tracker lists exactly
//!    the model's identifiers, most recent first.
//! 2. `touch(x)` always leaves `x` at the front.
//! 3. Restoring a snapshot reproduces the order.

use proptest::prelude::*;
use tabweave_recency::{RecencySnapshot, RecencyTracker};

#[derive(Debug, Clone)]
enum Op {
    Touch(u8),
    Remove(u8),
    Replace(u8, u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..24).prop_map(Op::Touch),
        2 => (0u8..24).prop_map(Op::Remove),
        1 => (0u8..24, 0u8..48).prop_map(|(old, new)| Op::Replace(old, new)),
    ]
}

/// Reference model: a vector, most recent first.
#[derive(Default)]
struct Model {
    ids: Vec<u8>,
}

impl Model {
    fn touch(&mut self, id: u8) {
        self.ids.retain(|x| *x != id);
        self.ids.insert(0, id);
    }

    fn remove(&mut self, id: u8) -> bool {
        let before = self.ids.len();
        self.ids.retain(|x| *x != id);
        before != self.ids.len()
    }

    fn replace(&mut self, old: u8, new: u8) -> bool {
        match self.ids.iter().position(|x| *x == old) {
            Some(at) => {
                self.ids[at] = new;
                true
            }
            None => false,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn tracker_matches_vec_model(ops in proptest::collection::vec(op(), 0..200)) {
        let mut tracker = RecencyTracker::new();
        let mut model = Model::default();
        for op in ops {
            match op {
                Op::Touch(id) => {
                    tracker.touch(id);
                    model.touch(id);
                }
                Op::Remove(id) => {
                    prop_assert_eq!(tracker.remove(&id), model.remove(id));
                }
                Op::Replace(old, new) => {
                    // Replacing into an already tracked id is outside the contract.
                    if old == new || tracker.contains(&new) {
                        continue;
                    }
                    prop_assert_eq!(tracker.replace(&old, new), model.replace(old, new));
                }
            }
            prop_assert_eq!(tracker.len(), model.ids.len());
        }
        prop_assert_eq!(tracker.to_ordered_list(), model.ids);
    }

    #[test]
    fn touch_puts_id_first(
        prior in proptest::collection::vec(0u16..64, 0..64),
        id in 0u16..64,
    ) {
        let mut tracker: RecencyTracker<u16> = prior.into_iter().collect();
        tracker.touch(id);
        prop_assert_eq!(tracker.to_ordered_list()[0], id);
        prop_assert_eq!(tracker.most_recent(), Some(&id));
    }

    #[test]
    fn snapshot_restore_round_trip(touches in proptest::collection::vec(0u32..32, 0..100)) {
        let mut tracker = RecencyTracker::new();
        for id in touches {
            tracker.touch(id);
        }
        let restored = RecencyTracker::restore(RecencySnapshot { ids: tracker.to_ordered_list() });
        prop_assert_eq!(restored.to_ordered_list(), tracker.to_ordered_list());
    }
}
