//! A randomized insert/delete/lookup soak test checked against a
//! `HashMap` oracle, adapted from the reference implementation's
//! `btree-fuzzer` standalone binary (a `rand`-driven instruction
//! generator) to run in-process against `MemStore`.

use cow_btree::mem::MemStore;
use cow_btree::Tree;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Instruction {
    Insert(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

fn generate_instruction(rng: &mut StdRng, oracle: &HashMap<Vec<u8>, Vec<u8>>) -> Instruction {
    if rng.gen_bool(0.7) || oracle.is_empty() {
        let key_len: usize = rng.gen_range(1, 25);
        let key: Vec<u8> = (0..key_len).map(|_| rng.gen()).collect();
        let val_len: usize = rng.gen_range(0, 64);
        let val: Vec<u8> = (0..val_len).map(|_| rng.gen()).collect();
        Instruction::Insert(key, val)
    } else {
        let key = oracle.keys().choose(rng).unwrap().clone();
        Instruction::Delete(key)
    }
}

#[test]
fn randomized_instruction_soak_matches_hashmap_oracle() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut store = MemStore::new();
    let mut tree = Tree::new();
    let mut oracle: HashMap<Vec<u8>, Vec<u8>> = HashMap::new();

    for step in 0..20_000 {
        match generate_instruction(&mut rng, &oracle) {
            Instruction::Insert(key, val) => {
                tree.insert(&mut store, &key, &val);
                oracle.insert(key, val);
            }
            Instruction::Delete(key) => {
                let existed = oracle.remove(&key).is_some();
                assert_eq!(
                    tree.delete(&mut store, &key),
                    existed,
                    "delete disagreement at step {}",
                    step
                );
            }
        }

        if step % 500 == 0 {
            for (k, v) in oracle.iter() {
                assert_eq!(tree.get(&store, k), Some(v.clone()), "lookup disagreement at step {}", step);
            }
        }
    }

    for (k, v) in oracle.iter() {
        assert_eq!(tree.get(&store, k), Some(v.clone()));
    }
}

#[test]
fn balanced_insert_then_delete_all_leaves_no_leaked_pages() {
    let mut rng = StdRng::seed_from_u64(0xDEC0DE);
    let mut store = MemStore::new();
    let mut tree = Tree::new();

    // One allocation for the initial sentinel-only leaf root.
    tree.insert(&mut store, b"seed", b"seed");
    let baseline_outstanding = store.outstanding();

    let mut keys: Vec<Vec<u8>> = Vec::new();
    for _ in 0..3000 {
        let len: usize = rng.gen_range(1, 21);
        let key: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        let val: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
        tree.insert(&mut store, &key, &val);
        keys.push(key);
    }
    for key in &keys {
        tree.delete(&mut store, key);
    }

    assert_eq!(
        store.outstanding(),
        baseline_outstanding,
        "page count did not return to baseline after a balanced insert/delete sequence"
    );
}
