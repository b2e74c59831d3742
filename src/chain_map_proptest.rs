#![cfg(test)]

// Property tests for ChainMap kept inside the crate so they can check the
// structural invariants after every step.

use crate::chain_map::ChainMap;
use crate::config::{DuplicateKeys, MapConfig};
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, String),
    Remove(usize),
    Get(usize),
    GetOther(String),
    Resize,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}|\\PC{1,3}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            6 => (idx.clone(), "\\PC{0,6}").prop_map(|(i, v)| Op::Insert(i, v)),
            3 => idx.clone().prop_map(Op::Remove),
            3 => idx.clone().prop_map(Op::Get),
            1 => "[a-z]{0,4}".prop_map(Op::GetOther),
            1 => Just(Op::Resize),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Per-key stack of live values; the last element is the visible one.
#[derive(Default)]
struct Model {
    stacks: HashMap<String, Vec<String>>,
    policy: DuplicateKeys,
}

impl Model {
    fn insert(&mut self, k: &str, v: &str) {
        let stack = self.stacks.entry(k.to_string()).or_default();
        match self.policy {
            DuplicateKeys::Replace if !stack.is_empty() => {
                *stack.last_mut().unwrap() = v.to_string();
            }
            _ => stack.push(v.to_string()),
        }
    }

    fn remove(&mut self, k: &str) -> Option<String> {
        let stack = self.stacks.get_mut(k)?;
        let v = stack.pop();
        if stack.is_empty() {
            self.stacks.remove(k);
        }
        v
    }

    fn get(&self, k: &str) -> Option<&str> {
        self.stacks.get(k).and_then(|s| s.last()).map(String::as_str)
    }

    fn len(&self) -> usize {
        self.stacks.values().map(Vec::len).sum()
    }
}

fn run(
    capacity: usize,
    policy: DuplicateKeys,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let cfg = MapConfig::new().initial_capacity(capacity).duplicates(policy);
    let mut sut = ChainMap::with_config(cfg).unwrap();
    let mut model = Model {
        policy,
        ..Model::default()
    };
    let mut expected_cap = capacity;

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                sut.insert(&pool[i], &v).unwrap();
                model.insert(&pool[i], &v);
                // Round-trip: the just-inserted value is visible.
                prop_assert_eq!(sut.get(&pool[i]), Some(v.as_str()));
            }
            Op::Remove(i) => {
                prop_assert_eq!(sut.remove(&pool[i]), model.remove(&pool[i]));
            }
            Op::Get(i) => {
                prop_assert_eq!(sut.get(&pool[i]), model.get(&pool[i]));
            }
            Op::GetOther(k) => {
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.contains_key(&k), model.get(&k).is_some());
            }
            // Keep the table small enough to walk after every step.
            Op::Resize if expected_cap >= 1 << 12 => {}
            Op::Resize => {
                let before = sut.len();
                sut.resize();
                expected_cap *= 2;
                prop_assert_eq!(sut.len(), before);
            }
            Op::Clear => {
                sut.clear();
                model.stacks.clear();
            }
        }

        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.len() == 0);
        prop_assert_eq!(sut.capacity(), expected_cap);
        for k in pool {
            prop_assert_eq!(sut.get(k), model.get(k));
        }
    }
    Ok(())
}

// Property: state-machine equivalence against a per-key stack model under
// the default Shadow policy. Exercises head insertion, shadow uncovering on
// remove, rehash on resize, and len counting every entry.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_shadow(cap in 1usize..16, (pool, ops) in arb_scenario()) {
        run(cap, DuplicateKeys::Shadow, &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_replace(cap in 1usize..16, (pool, ops) in arb_scenario()) {
        run(cap, DuplicateKeys::Replace, &pool, ops)?;
    }
}

// Property: same invariants with every key in one chain, stressing unlink at
// every chain position.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_single_chain((pool, ops) in arb_scenario()) {
        let ops: Vec<Op> = ops.into_iter().filter(|op| !matches!(op, Op::Resize)).collect();
        run(1, DuplicateKeys::Shadow, &pool, ops)?;
    }
}
