use std::ops::Range;

use proptest::prelude::*;

use crate::model;

use super::*;

fn insert_find_all(keys: &[u32]) {
    let mut tree: AvlTree<u32> = AvlTree::new();

    for &key in keys {
        tree.insert(key).unwrap();
        tree.assert_invariants();
    }

    for key in keys {
        assert!(tree.contains_key(key), "{key} not found");
    }
    assert_eq!(tree.len(), keys.len());
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    insert_find_all(&[0, 1]);
    insert_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    insert_find_all(&[0, 1, 2]);
    insert_find_all(&[0, 2, 1]);
    insert_find_all(&[1, 0, 2]);
    insert_find_all(&[1, 2, 0]);
    insert_find_all(&[2, 0, 1]);
    insert_find_all(&[2, 1, 0]);
}

// Calls `f` with every permutation of `0..n`.
fn for_each_permutation(n: u32, f: fn(&[u32])) {
    fn permute(prefix: &mut Vec<u32>, rest: &mut Vec<u32>, f: fn(&[u32])) {
        if rest.is_empty() {
            f(prefix);
            return;
        }

        for i in 0..rest.len() {
            let key = rest.remove(i);
            prefix.push(key);
            permute(prefix, rest, f);
            prefix.pop();
            rest.insert(i, key);
        }
    }

    permute(&mut Vec::new(), &mut (0..n).collect(), f);
}

#[test]
fn five_elems_find() {
    for_each_permutation(5, insert_find_all);
}

fn insert_remove_all(keys: &[u32]) {
    let mut tree: AvlTree<u32> = AvlTree::new();

    for &key in keys {
        tree.insert(key).unwrap();
        tree.assert_invariants();
    }

    for key in keys {
        assert_eq!(tree.remove(key).unwrap(), (*key, ()));
        tree.assert_invariants();
    }
    assert!(tree.is_empty());

    for &key in keys {
        tree.insert(key).unwrap();
        tree.assert_invariants();
    }

    for key in keys.iter().rev() {
        assert_eq!(tree.remove(key).unwrap(), (*key, ()));
        tree.assert_invariants();
    }
    assert!(tree.is_empty());
}

#[test]
fn remove_one() {
    insert_remove_all(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all(&[0, 1]);
    insert_remove_all(&[1, 0]);
}

#[test]
fn remove_three() {
    insert_remove_all(&[0, 1, 2]);
    insert_remove_all(&[0, 2, 1]);
    insert_remove_all(&[1, 0, 2]);
    insert_remove_all(&[1, 2, 0]);
    insert_remove_all(&[2, 0, 1]);
    insert_remove_all(&[2, 1, 0]);
}

#[test]
fn remove_five() {
    for_each_permutation(5, insert_remove_all);
}

#[test]
fn double_rotation_scenario() {
    let mut tree: AvlTree<u32> = AvlTree::new();

    for key in [10, 20, 30, 40, 50, 25] {
        tree.insert(key).unwrap();
        tree.assert_invariants();
    }

    assert_eq!(
        tree.keys().copied().collect::<Vec<_>>(),
        [10, 20, 25, 30, 40, 50]
    );
    assert_eq!(
        tree.preorder().map(|(k, _)| *k).collect::<Vec<_>>(),
        [30, 20, 10, 25, 40, 50]
    );
    assert_eq!(tree.height(), 2);
    assert!(tree.is_avl());
    assert!(tree.is_balanced());
}

#[test]
fn ascending_inserts_stay_logarithmic() {
    let mut tree: AvlTree<u32> = AvlTree::new();

    for key in 0..1023 {
        tree.insert(key).unwrap();
    }

    tree.assert_invariants();
    assert_eq!(tree.height(), 9);
    assert_eq!(tree.first(), Some((&0, &())));
    assert_eq!(tree.last(), Some((&1022, &())));
}

#[test]
fn duplicate_insert_is_rejected() {
    let mut tree: AvlTree<&str, u8> = AvlTree::new();
    tree.insert_with_value("b", 1).unwrap();
    tree.insert_with_value("a", 2).unwrap();

    assert!(matches!(
        tree.insert_with_value("b", 3),
        Err(Error::DuplicateKey)
    ));
    assert_eq!(tree.get("b"), Some(&1));
    assert_eq!(tree.len(), 2);
    tree.assert_invariants();
}

#[test]
fn absent_remove_is_rejected() {
    let mut tree: AvlTree<u32> = AvlTree::new();
    assert!(matches!(tree.remove(&7), Err(Error::MissingKey)));

    tree.insert(3).unwrap();
    let err = tree.remove(&7).unwrap_err();
    assert!(err.is_precondition_violation());
    assert_eq!(tree.len(), 1);
}

#[test]
fn cardinality_after_removals() {
    let mut tree: AvlTree<u32, String> = AvlTree::new();

    for key in 0..100 {
        tree.insert_with_value(key, key.to_string()).unwrap();
    }
    for key in (0..100).step_by(3) {
        let (removed, value) = tree.remove(&key).unwrap();
        assert_eq!(value, removed.to_string());
    }

    tree.assert_invariants();
    assert_eq!(tree.len(), 100 - 34);
    assert!(tree.iter().all(|(k, v)| k % 3 != 0 && *v == k.to_string()));
}

#[test]
fn get_mut_and_clear() {
    let mut tree: AvlTree<String, Vec<u8>> = AvlTree::new();
    tree.insert_with_value("x".to_owned(), vec![1]).unwrap();

    tree.get_mut("x").unwrap().push(2);
    assert_eq!(tree.get("x"), Some(&vec![1, 2]));
    assert_eq!(tree.get_mut("y"), None);

    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.height(), -1);
    tree.assert_invariants();
}

#[test]
fn clone_keeps_shape() {
    let mut tree: AvlTree<u32, String> = AvlTree::new();
    for key in 0..31 {
        tree.insert_with_value(key, key.to_string()).unwrap();
    }

    let mut copy = tree.clone();
    copy.assert_invariants();
    assert_eq!(copy.height(), tree.height());
    assert!(copy.preorder().eq(tree.preorder()));

    for key in 0..20 {
        copy.remove(&key).unwrap();
    }
    copy.get_mut(&25).unwrap().push('!');
    copy.insert_with_value(100, "new".to_owned()).unwrap();
    copy.assert_invariants();

    tree.assert_invariants();
    assert_eq!(tree.len(), 31);
    assert_eq!(tree.get(&25).map(String::as_str), Some("25"));
    assert!(!tree.contains_key(&100));
    assert!(tree.iter().all(|(k, v)| *v == k.to_string()));
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn btree_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_btree_equivalence(ops);
    }

    #[test]
    fn index_equivalence(ops in proptest::collection::vec(model::index_op_strategy(), FUZZ_RANGE)) {
        model::run_index_equivalence(ops);
    }
}
