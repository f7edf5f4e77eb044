//! A height-balanced (AVL) binary search tree, and a bilingual word index built on top of it.
//!
//! [`AvlTree`] is an ordered tree over unique keys, each carrying a payload. [`TranslationIndex`]
//! specializes it to words mapped to an ordered list of translations, with "did you mean"
//! suggestions scored by [`similarity`].

// Conventions used in comments:
// - The height of a node `x` is denoted `h(x)`. A leaf has height 0 and an empty subtree has
//   height -1; the empty subtree is never materialized as a node.
// - The balance of `x` is `h(left(x)) - h(right(x))`.
// - A node "leans" toward `dir` if its `dir` child is strictly taller than its `!dir` child.
//
// The invariants of the tree, which hold whenever a public method returns:
// 1. Every key in the left subtree of `x` is less than `x`'s key, and every key in the right
//    subtree is greater.
// 2. `|balance(x)| <= 1` for every node `x`.
// 3. `h(x) = 1 + max(h(left(x)), h(right(x)))` for every node `x`.
// 4. No two nodes share a key.
// 5. `len` equals the number of nodes.
//
// Nodes are owned by their parent's child slot and hold no back-pointers. Mutating operations
// recurse on the owning slot, so a rotation can replace a subtree's root in place.

use core::{borrow::Borrow, cmp::Ordering, fmt, mem, ops::Not};
use std::collections::VecDeque;

mod debug;
mod entry;
mod error;
pub mod import;
mod index;
mod iter;
pub mod similarity;

#[cfg(feature = "model")]
pub mod model;
#[cfg(all(test, not(feature = "model")))]
mod model;

#[cfg(test)]
mod tests;

pub use debug::LevelDump;
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use error::{Error, Result};
pub use index::TranslationIndex;
pub use iter::{Iter, Keys, LevelOrder, PostOrder, PreOrder};

/// A self-balancing binary search tree following the AVL discipline.
///
/// Every key is unique and carries one payload of type `V`. The bare tree (`V = ()`) is a plain
/// ordered set.
///
/// Lookup, insertion and removal complete in _O(log(n))_ time. Cloning copies every node,
/// including its cached height, so the clone has the same shape as the original.
#[derive(Clone)]
pub struct AvlTree<K, V = ()> {
    root: Link<K, V>,
    len: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    children: [Link<K, V>; 2],
    height: i32,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

/// Returns the height of the subtree behind `link`.
#[inline]
fn height<K, V>(link: &Link<K, V>) -> i32 {
    link.as_ref().map_or(-1, |node| node.height)
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            children: [None, None],
            height: 0,
        })
    }

    #[inline]
    fn child(&self, dir: Dir) -> &Link<K, V> {
        &self.children[dir as usize]
    }

    #[inline]
    fn child_mut(&mut self, dir: Dir) -> &mut Link<K, V> {
        &mut self.children[dir as usize]
    }

    #[inline]
    fn left(&self) -> Option<&Node<K, V>> {
        self.child(Dir::Left).as_deref()
    }

    #[inline]
    fn right(&self) -> Option<&Node<K, V>> {
        self.child(Dir::Right).as_deref()
    }

    #[inline]
    fn update_height(&mut self) {
        self.height = 1 + height(self.child(Dir::Left)).max(height(self.child(Dir::Right)));
    }

    /// `h(left) - h(right)`.
    #[inline]
    fn balance(&self) -> i32 {
        height(self.child(Dir::Left)) - height(self.child(Dir::Right))
    }

    /// Returns `true` if the `dir` subtree is at least two levels taller than the other.
    #[inline]
    fn is_heavy(&self, dir: Dir) -> bool {
        height(self.child(dir)) - height(self.child(!dir)) >= 2
    }

    #[inline]
    fn leans(&self, dir: Dir) -> bool {
        height(self.child(dir)) > height(self.child(!dir))
    }
}

// Lifts the `dir` child of the node in `slot` into `slot`, moving the old root down to the `!dir`
// side of the lifted node.
//
// Lifting the left child is a right rotation; lifting the right child is a left rotation. Heights
// of the two affected nodes are recomputed, the lowered node first.
fn rotate_up<K, V>(slot: &mut Box<Node<K, V>>, dir: Dir) {
    tracing::trace!(?dir, "rotate");

    let mut up = slot
        .child_mut(dir)
        .take()
        .expect("rotation requires a child on the rising side");

    // `across` goes from the `!dir` child of `up` to the `dir` child of `down`.
    let across = up.child_mut(!dir).take();
    *slot.child_mut(dir) = across;
    slot.update_height();

    let down = mem::replace(slot, up);
    *slot.child_mut(!dir) = Some(down);
    slot.update_height();
}

// Restores the balance invariant at the node in `slot`, assuming both of its subtrees are valid
// AVL trees whose heights differ by at most 2.
fn rebalance<K, V>(slot: &mut Box<Node<K, V>>) {
    for dir in [Dir::Left, Dir::Right] {
        if !slot.is_heavy(dir) {
            continue;
        }

        if let Some(heavy) = slot.child_mut(dir) {
            // When the heavy child leans away from `dir`, straighten it first (zig-zag). A child
            // that leans toward `dir` or is balanced takes the single rotation (zig-zig); the
            // balanced case must not be treated as zig-zag.
            if heavy.leans(!dir) {
                rotate_up(heavy, !dir);
            }
        }

        rotate_up(slot, dir);
        break;
    }

    debug_assert!(slot.balance().abs() < 2);
}

fn insert_at<K: Ord, V>(link: &mut Link<K, V>, key: K, value: V) -> Result<()> {
    let node = match link {
        Some(node) => node,
        None => {
            *link = Some(Node::new(key, value));
            return Ok(());
        }
    };

    let dir = match key.cmp(&node.key) {
        Ordering::Less => Dir::Left,
        Ordering::Equal => return Err(Error::DuplicateKey),
        Ordering::Greater => Dir::Right,
    };

    insert_at(node.child_mut(dir), key, value)?;

    node.update_height();
    rebalance(node);

    Ok(())
}

// Swaps `key` and `value` with the payload of the minimum node in the subtree rooted at `node`.
fn swap_with_min<K, V>(node: &mut Node<K, V>, key: &mut K, value: &mut V) {
    match node.children[Dir::Left as usize].as_deref_mut() {
        Some(left) => swap_with_min(left, key, value),
        None => {
            mem::swap(&mut node.key, key);
            mem::swap(&mut node.value, value);
        }
    }
}

fn remove_at<K, V, Q>(link: &mut Link<K, V>, target: &Q) -> Option<(K, V)>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    let node = link.as_mut()?;

    let dir = match target.cmp(node.key.borrow()) {
        Ordering::Less => Dir::Left,
        Ordering::Greater => Dir::Right,
        Ordering::Equal => {
            // There are three possible cases:
            //
            // 1. `node` is a leaf. It is detached and dropped.
            //
            // 2. `node` has one child. The payloads of `node` and its child are exchanged, and the
            //    removal continues into the child, which now holds the target.
            //
            // 3. `node` has two children. The payloads of `node` and its successor (the minimum of
            //    the right subtree) are exchanged, and the removal continues into the right
            //    subtree. The target is smaller than every other key there, so it sits at the
            //    minimum position and order is preserved.
            let Node {
                key,
                value,
                children,
                ..
            } = &mut **node;

            match children {
                [None, None] => {
                    let removed = link.take()?;
                    let Node { key, value, .. } = *removed;
                    return Some((key, value));
                }

                [Some(child), None] => {
                    mem::swap(key, &mut child.key);
                    mem::swap(value, &mut child.value);
                    Dir::Left
                }

                [None, Some(child)] => {
                    mem::swap(key, &mut child.key);
                    mem::swap(value, &mut child.value);
                    Dir::Right
                }

                [Some(_), Some(right)] => {
                    swap_with_min(right, key, value);
                    Dir::Right
                }
            }
        }
    };

    let removed = remove_at(node.child_mut(dir), target)?;

    node.update_height();
    rebalance(node);

    Some(removed)
}

impl<K, V> AvlTree<K, V> {
    /// Returns a new empty tree.
    pub const fn new() -> AvlTree<K, V> {
        AvlTree { root: None, len: 0 }
    }

    /// Returns `true` if the tree contains no elements.
    pub const fn is_empty(&self) -> bool {
        let empty = self.len() == 0;

        if cfg!(debug_assertions) {
            // Can't use assert_eq!() in const fn.
            assert!(empty == self.root.is_none());
        }

        empty
    }

    /// Returns the number of elements in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the height of the tree: `0` for a single node, `-1` for an empty tree.
    pub fn height(&self) -> i32 {
        height(&self.root)
    }

    /// Returns `true` if the heights of the root's two subtrees differ by at most one.
    ///
    /// This only inspects the root. An empty tree is reported as unbalanced. Use
    /// [`is_avl`](Self::is_avl) to verify every node.
    pub fn is_balanced(&self) -> bool {
        match &self.root {
            Some(root) => root.balance().abs() < 2,
            None => false,
        }
    }

    /// Returns `true` if every node of the tree satisfies the AVL balance bound.
    ///
    /// Nodes are visited in level order and the scan stops at the first violation. An empty tree
    /// is an AVL tree.
    pub fn is_avl(&self) -> bool {
        let mut queue = VecDeque::new();
        queue.extend(self.root.as_deref());

        while let Some(node) = queue.pop_front() {
            if node.balance().abs() > 1 {
                return false;
            }

            queue.extend(node.left());
            queue.extend(node.right());
        }

        true
    }

    /// Returns the minimum element of the tree.
    pub fn first(&self) -> Option<(&K, &V)> {
        let mut cur = self.root.as_deref()?;

        while let Some(left) = cur.left() {
            cur = left;
        }

        Some((&cur.key, &cur.value))
    }

    /// Returns the maximum element of the tree.
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut cur = self.root.as_deref()?;

        while let Some(right) = cur.right() {
            cur = right;
        }

        Some((&cur.key, &cur.value))
    }

    /// Clears the tree, removing all elements.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }
}

impl<K, V> AvlTree<K, V>
where
    K: Ord,
{
    /// Returns `true` if the tree contains `key`.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns a reference to the value associated with `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut opt_cur = self.root.as_deref();

        loop {
            let cur = opt_cur?;

            match key.cmp(cur.key.borrow()) {
                Ordering::Less => opt_cur = cur.left(),
                Ordering::Equal => return Some(&cur.value),
                Ordering::Greater => opt_cur = cur.right(),
            }
        }
    }

    /// Returns a mutable reference to the value associated with `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut opt_cur = self.root.as_deref_mut();

        while let Some(cur) = opt_cur {
            let dir = match key.cmp(cur.key.borrow()) {
                Ordering::Less => Dir::Left,
                Ordering::Equal => return Some(&mut cur.value),
                Ordering::Greater => Dir::Right,
            };

            opt_cur = cur.child_mut(dir).as_deref_mut();
        }

        None
    }

    /// Inserts `key` with its associated `value` and rebalances every ancestor of the new node.
    ///
    /// Returns [`Error::DuplicateKey`] and leaves the tree untouched if `key` is already present.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn insert_with_value(&mut self, key: K, value: V) -> Result<()> {
        insert_at(&mut self.root, key, value)?;
        self.len += 1;

        Ok(())
    }

    /// Removes `key` from the tree, returning its key and value.
    ///
    /// Returns [`Error::MissingKey`] if `key` is not present.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = remove_at(&mut self.root, key).ok_or(Error::MissingKey)?;
        self.len -= 1;

        Ok(removed)
    }
}

impl<K: Ord> AvlTree<K, ()> {
    /// Inserts `key` into the tree.
    ///
    /// Returns [`Error::DuplicateKey`] if `key` is already present.
    pub fn insert(&mut self, key: K) -> Result<()> {
        self.insert_with_value(key, ())
    }
}

impl<K: Ord + fmt::Debug, V> AvlTree<K, V> {
    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        let count = Self::assert_invariants_at(self.root.as_deref(), None, None);
        assert_eq!(count, self.len, "`len` does not match the number of nodes");
    }

    // Checks the subtree rooted at `node`, whose keys must lie strictly between `lower` and
    // `upper`. Returns the number of nodes in the subtree.
    fn assert_invariants_at(node: Option<&Node<K, V>>, lower: Option<&K>, upper: Option<&K>) -> usize {
        let Some(node) = node else {
            return 0;
        };

        // Ensure BST order, which also rules out duplicate keys.
        if let Some(lower) = lower {
            assert!(lower < &node.key, "{:?} is not greater than {lower:?}", node.key);
        }
        if let Some(upper) = upper {
            assert!(&node.key < upper, "{:?} is not less than {upper:?}", node.key);
        }

        // Ensure the cached height is correct.
        let expected = 1 + height(node.child(Dir::Left)).max(height(node.child(Dir::Right)));
        assert_eq!(node.height, expected, "stale height at {:?}", node.key);

        // Ensure the balance bound.
        assert!(
            node.balance().abs() <= 1,
            "{:?} has balance {}",
            node.key,
            node.balance()
        );

        1 + Self::assert_invariants_at(node.left(), lower, Some(&node.key))
            + Self::assert_invariants_at(node.right(), Some(&node.key), upper)
    }
}

impl<K, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
