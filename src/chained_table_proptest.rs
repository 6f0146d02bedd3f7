#![cfg(test)]

// Property tests for ChainedTable kept inside the crate so they can reach
// both chain backends and compare against a hashbrown model.

use crate::chain::{Chain, VecChain};
use crate::chained_table::{ChainedTable, Entry};
use crate::hashing::{BytesEq, PolyHash};
use crate::linked_chain::LinkedChain;
use hashbrown::HashMap;
use proptest::prelude::*;
use std::collections::BTreeSet;

// Pool-indexed operations so shrinking moves toward earlier keys and shorter
// op lists.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Lookup(String),
    Mutate(usize, i32),
    Rehash(usize),
    Clear,
    Views,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, usize, Vec<Op>)> {
    (proptest::collection::vec("[a-z]{0,5}", 1..=8), 1usize..=16).prop_flat_map(
        |(pool, buckets)| {
            let idxs: Vec<usize> = (0..pool.len()).collect();
            let idx = proptest::sample::select(idxs);
            let op = prop_oneof![
                4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
                2 => idx.clone().prop_map(Op::Remove),
                2 => idx.clone().prop_map(Op::Get),
                1 => "[a-z]{0,5}".prop_map(Op::Lookup),
                1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
                1 => (0usize..=24).prop_map(Op::Rehash),
                1 => Just(Op::Clear),
                1 => Just(Op::Views),
            ];
            proptest::collection::vec(op, 1..80)
                .prop_map(move |ops| (pool.clone(), buckets, ops))
        },
    )
}

fn run_against_model<C>(pool: &[String], buckets: usize, ops: Vec<Op>) -> Result<(), TestCaseError>
where
    C: Chain<Entry<String, i32>>,
{
    let mut sut: ChainedTable<String, i32, PolyHash, BytesEq, C> =
        ChainedTable::with_buckets_and_functions(buckets, PolyHash, BytesEq);
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = pool[i].clone();
                prop_assert_eq!(sut.insert(k.clone(), v), model.insert(k, v));
            }
            Op::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k.as_str()), model.remove(k));
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k.as_str()), model.get(k));
            }
            Op::Lookup(s) => {
                prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
            }
            Op::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k.as_str()) {
                    *v = v.wrapping_add(d);
                }
                if let Some(v) = model.get_mut(k) {
                    *v = v.wrapping_add(d);
                }
            }
            Op::Rehash(n) => {
                let before = sut.bucket_count();
                sut = sut.rehash(n);
                let expected = if n == 0 { before } else { n };
                prop_assert_eq!(sut.bucket_count(), expected);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
            Op::Views => {
                let keys: BTreeSet<&String> = sut.keys().into_iter().collect();
                let model_keys: BTreeSet<&String> = model.keys().collect();
                prop_assert_eq!(keys, model_keys);

                let mut values: Vec<i32> = sut.values().into_iter().copied().collect();
                let mut model_values: Vec<i32> = model.values().copied().collect();
                values.sort_unstable();
                model_values.sort_unstable();
                prop_assert_eq!(values, model_values);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.bucket_lens().sum::<usize>(), model.len());
    }

    for (k, v) in &model {
        prop_assert_eq!(sut.get(k.as_str()), Some(v));
    }
    Ok(())
}

// Property: state-machine equivalence against hashbrown::HashMap.
// Invariants exercised across random operation sequences:
// - `insert` returns the previous value exactly when the model had one.
// - `remove`/`get`/`contains_key` parity with the model.
// - `rehash(n)` preserves every pair; `rehash(0)` keeps the bucket count.
// - `keys`/`values` hold the model's contents.
// - `len`, `is_empty` and the sum of chain lengths agree after every op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_vec_chain((pool, buckets, ops) in arb_scenario()) {
        run_against_model::<VecChain<Entry<String, i32>>>(&pool, buckets, ops)?;
    }

    #[test]
    fn prop_state_machine_linked_chain((pool, buckets, ops) in arb_scenario()) {
        run_against_model::<LinkedChain<Entry<String, i32>>>(&pool, buckets, ops)?;
    }
}

// Property: for N distinct keys, any positive rehash target keeps all N pairs.
proptest! {
    #[test]
    fn prop_rehash_preserves_pairs(
        keys in proptest::collection::btree_set("[a-z0-9]{1,8}", 0..64),
        start in 1usize..=32,
        target in 1usize..=256,
    ) {
        let mut t: ChainedTable<String, usize> = ChainedTable::with_buckets(start);
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(t.insert(k.clone(), i), None);
        }
        let t = t.rehash(target);
        prop_assert_eq!(t.bucket_count(), target);
        prop_assert_eq!(t.len(), keys.len());
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(t.get(k.as_str()), Some(&i));
        }
    }
}
