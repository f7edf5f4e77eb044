use std::collections::VecDeque;

use crate::{AvlTree, Node};

/// An in-order iterator over the entries of an [`AvlTree`].
///
/// Nodes hold no parent links, so the path back up the tree is kept on an explicit stack. The
/// stack never holds more than `h + 1` nodes.
pub struct Iter<'tree, K, V> {
    // Nodes whose left subtree has been visited (or is being visited) and which are not yet
    // yielded. The top of the stack is the next node in order.
    stack: Vec<&'tree Node<K, V>>,

    len: usize,
}

impl<'tree, K, V> Iter<'tree, K, V> {
    pub(crate) fn new(tree: &'tree AvlTree<K, V>) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            len: tree.len(),
        };

        iter.push_left_spine(tree.root.as_deref());
        iter
    }

    // Upon entering a new subtree, stack every node on the way down to its minimum.
    fn push_left_spine(&mut self, mut opt_cur: Option<&'tree Node<K, V>>) {
        while let Some(cur) = opt_cur {
            self.stack.push(cur);
            opt_cur = cur.left();
        }
    }
}

impl<'tree, K, V> Iterator for Iter<'tree, K, V> {
    type Item = (&'tree K, &'tree V);

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.stack.pop()?;

        // The left subtree of `cur` has been exhausted; its right subtree comes next.
        self.push_left_spine(cur.right());
        self.len -= 1;

        Some((&cur.key, &cur.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// An in-order iterator over the keys of an [`AvlTree`].
pub struct Keys<'tree, K, V> {
    inner: Iter<'tree, K, V>,
}

impl<'tree, K, V> Iterator for Keys<'tree, K, V> {
    type Item = &'tree K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// A pre-order iterator over the entries of an [`AvlTree`]: each node, then its left subtree,
/// then its right subtree.
pub struct PreOrder<'tree, K, V> {
    stack: Vec<&'tree Node<K, V>>,
}

impl<'tree, K, V> Iterator for PreOrder<'tree, K, V> {
    type Item = (&'tree K, &'tree V);

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.stack.pop()?;

        // Right is pushed first so that the left subtree is visited first.
        self.stack.extend(cur.right());
        self.stack.extend(cur.left());

        Some((&cur.key, &cur.value))
    }
}

/// A post-order iterator over the entries of an [`AvlTree`]: the left subtree, the right
/// subtree, then the node itself.
pub struct PostOrder<'tree, K, V> {
    // Each node is stacked twice: first unexpanded, then, once its children are stacked above
    // it, expanded and ready to be yielded.
    stack: Vec<(&'tree Node<K, V>, bool)>,
}

impl<'tree, K, V> Iterator for PostOrder<'tree, K, V> {
    type Item = (&'tree K, &'tree V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (cur, expanded) = self.stack.pop()?;

            if expanded {
                return Some((&cur.key, &cur.value));
            }

            self.stack.push((cur, true));
            self.stack.extend(cur.right().map(|right| (right, false)));
            self.stack.extend(cur.left().map(|left| (left, false)));
        }
    }
}

/// A breadth-first iterator over the entries of an [`AvlTree`], visiting the root, then every
/// node at depth 1 from left to right, and so on.
pub struct LevelOrder<'tree, K, V> {
    queue: VecDeque<&'tree Node<K, V>>,
}

impl<'tree, K, V> Iterator for LevelOrder<'tree, K, V> {
    type Item = (&'tree K, &'tree V);

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.queue.pop_front()?;

        self.queue.extend(cur.left());
        self.queue.extend(cur.right());

        Some((&cur.key, &cur.value))
    }
}

impl<K, V> AvlTree<K, V> {
    /// Returns an iterator over the entries of the tree, in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Returns an iterator over the keys of the tree, in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns a pre-order iterator over the entries of the tree.
    pub fn preorder(&self) -> PreOrder<'_, K, V> {
        PreOrder {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    /// Returns a post-order iterator over the entries of the tree.
    pub fn postorder(&self) -> PostOrder<'_, K, V> {
        PostOrder {
            stack: self.root.as_deref().map(|root| (root, false)).into_iter().collect(),
        }
    }

    /// Returns a breadth-first iterator over the entries of the tree.
    pub fn level_order(&self) -> LevelOrder<'_, K, V> {
        LevelOrder {
            queue: self.root.as_deref().into_iter().collect(),
        }
    }
}

impl<'tree, K, V> IntoIterator for &'tree AvlTree<K, V> {
    type Item = (&'tree K, &'tree V);
    type IntoIter = Iter<'tree, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
