//! Operation models that check the tree and the index against the standard library's ordered
//! collections.
//!
//! The runners are shared by the property tests and the fuzz targets.

use std::collections::{BTreeMap, BTreeSet};

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::{
    similarity::{similarity, SUGGESTION_LIMIT, SUGGESTION_THRESHOLD},
    AvlTree, Error, TranslationIndex,
};

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue),
    Contains(ItemValue),
    Remove(ItemValue),
    First,
    Last,
}

impl Op {
    fn finalize(self, sorted: &[u32]) -> FinalOp {
        fn get_value(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Insert(item) => FinalOp::Insert(get_value(sorted, item)),
            Op::Contains(item) => FinalOp::Contains(get_value(sorted, item)),
            Op::Remove(item) => FinalOp::Remove(get_value(sorted, item)),
            Op::First => FinalOp::First,
            Op::Last => FinalOp::Last,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32),
    Contains(u32),
    Remove(u32),
    First,
    Last,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        value_strategy().prop_map(Op::Insert),
        value_strategy().prop_map(Op::Contains),
        value_strategy().prop_map(Op::Remove),
        Just(Op::First),
        Just(Op::Last),
    ]
}

/// Applies `ops` to both an [`AvlTree`] and a [`BTreeSet`], checking after every step that they
/// agree and that the tree's invariants hold.
pub fn run_btree_equivalence(ops: Vec<Op>) {
    let mut sorted_values = Vec::with_capacity(ops.len());
    let mut btree = BTreeSet::new();
    let mut avl: AvlTree<u32> = AvlTree::new();

    fn insert_sorted(v: &mut Vec<u32>, value: u32) {
        if let Err(idx) = v.binary_search(&value) {
            v.insert(idx, value);
        }
    }

    fn remove_sorted(v: &mut Vec<u32>, value: u32) {
        if let Ok(idx) = v.binary_search(&value) {
            v.remove(idx);
        }
    }

    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(&sorted_values);

        match final_op {
            FinalOp::Insert(value) => {
                insert_sorted(&mut sorted_values, value);

                let from_btree = btree.insert(value);
                let from_avl = match avl.insert(value) {
                    Ok(()) => true,
                    Err(Error::DuplicateKey) => false,
                    Err(e) => panic!("FinalOp #{op_id}: {final_op:?}: unexpected error {e}"),
                };

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Contains(value) => {
                let from_btree = btree.contains(&value);
                let from_avl = avl.contains_key(&value);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Remove(value) => {
                remove_sorted(&mut sorted_values, value);

                let from_btree = btree.remove(&value).then_some(value);
                let from_avl = match avl.remove(&value) {
                    Ok((key, ())) => Some(key),
                    Err(Error::MissingKey) => None,
                    Err(e) => panic!("FinalOp #{op_id}: {final_op:?}: unexpected error {e}"),
                };

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::First => {
                let from_btree = btree.first();
                let from_avl = avl.first().map(|(key, _)| key);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Last => {
                let from_btree = btree.last();
                let from_avl = avl.last().map(|(key, _)| key);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }
        }

        avl.assert_invariants();
        assert_eq!(btree.len(), avl.len());
        assert!(btree.iter().eq(avl.keys()));
    }
}

/// Spells `code` as a short word over a small alphabet, so that generated words often lie within
/// a few edits of one another.
pub fn spell(code: u16) -> String {
    const ALPHABET: &[u8] = b"aeilnorst";

    let mut code = usize::from(code % 4096);
    let mut word = String::new();

    loop {
        word.push(char::from(ALPHABET[code % ALPHABET.len()]));
        code /= ALPHABET.len();

        if code == 0 {
            return word;
        }
    }
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum IndexOp {
    AddWord(u16, u8),
    RemoveWord(u16),
    Translate(u16),
    Suggest(u16),
}

pub fn index_op_strategy() -> impl Strategy<Value = IndexOp> {
    proptest::prop_oneof![
        3 => (0u16..200, 0u8..4).prop_map(|(word, translation)| IndexOp::AddWord(word, translation)),
        1 => (0u16..200).prop_map(IndexOp::RemoveWord),
        1 => (0u16..200).prop_map(IndexOp::Translate),
        1 => (0u16..200).prop_map(IndexOp::Suggest),
    ]
}

// Ranks every stored word by sorting `(score, word)` pairs in ascending order and reading them
// back to front, for comparison with `TranslationIndex::suggest`.
fn reference_suggestions(map: &BTreeMap<String, Vec<String>>, misspelled: &str) -> Vec<String> {
    let mut scored: Vec<(f64, &String)> = map
        .keys()
        .map(|word| (similarity(misspelled, word), word))
        .collect();

    scored.sort_by(|a, b| a.partial_cmp(b).expect("similarity is never NaN"));

    scored
        .into_iter()
        .rev()
        .take_while(|&(score, _)| score >= SUGGESTION_THRESHOLD)
        .take(SUGGESTION_LIMIT)
        .map(|(_, word)| word.clone())
        .collect()
}

/// Applies `ops` to both a [`TranslationIndex`] and a [`BTreeMap`] of translation lists,
/// checking after every step that they agree and that the index's invariants hold.
pub fn run_index_equivalence(ops: Vec<IndexOp>) {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut index = TranslationIndex::new();

    for (op_id, op) in ops.into_iter().enumerate() {
        match op {
            IndexOp::AddWord(word, translation) => {
                let word = spell(word);
                let translation = format!("t{translation}");

                map.entry(word.clone()).or_default().push(translation.clone());
                index.add_word(&word, translation);
            }

            IndexOp::RemoveWord(word) => {
                let word = spell(word);

                match (map.remove(&word), index.remove_word(&word)) {
                    (Some(expected), Ok(removed)) => {
                        assert_eq!(expected, removed, "IndexOp #{op_id}: {op:?}")
                    }
                    (None, Err(Error::Empty)) => assert!(map.is_empty(), "IndexOp #{op_id}"),
                    (None, Err(Error::NotFound(missing))) => {
                        assert!(!map.is_empty(), "IndexOp #{op_id}");
                        assert_eq!(missing, word, "IndexOp #{op_id}");
                    }
                    (expected, actual) => {
                        panic!("IndexOp #{op_id}: {op:?}: expected {expected:?}, got {actual:?}")
                    }
                }
            }

            IndexOp::Translate(word) => {
                let word = spell(word);
                let from_map = map.get(&word).map(Vec::as_slice);
                let from_index = index.translate(&word).ok();

                assert_eq!(from_map, from_index, "IndexOp #{op_id}: {op:?}");
            }

            IndexOp::Suggest(word) => {
                let word = spell(word);
                let suggestions = index.suggest(&word);

                assert!(suggestions.len() <= SUGGESTION_LIMIT);
                assert_eq!(
                    reference_suggestions(&map, &word),
                    suggestions,
                    "IndexOp #{op_id}: {op:?}"
                );
            }
        }

        index.assert_invariants();
        assert_eq!(map.len(), index.len());
        assert!(map.iter().eq(index.iter()));
    }
}
