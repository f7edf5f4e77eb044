use core::borrow::Borrow;

use crate::AvlTree;

/// A view into a single entry in an [`AvlTree`], which may be either vacant or occupied.
pub enum Entry<'tree, 'key, K, V, Q: ?Sized> {
    Vacant(VacantEntry<'tree, 'key, K, V, Q>),
    Occupied(OccupiedEntry<'tree, 'key, K, V, Q>),
}

impl<'tree, 'key, K, V, Q> Entry<'tree, 'key, K, V, Q>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    /// Returns the key used to look up this entry.
    pub fn key(&self) -> &'key Q {
        match self {
            Entry::Vacant(vacant) => vacant.key,
            Entry::Occupied(occupied) => occupied.key,
        }
    }

    /// Returns `true` if the entry is occupied.
    pub fn is_occupied(&self) -> bool {
        matches!(self, Entry::Occupied(_))
    }

    /// Calls `f` on the value if the entry is occupied.
    pub fn and_modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        if let Entry::Occupied(occupied) = &mut self {
            f(occupied.get_mut());
        }

        self
    }
}

/// A view into a vacant entry in an [`AvlTree`].
pub struct VacantEntry<'tree, 'key, K, V, Q: ?Sized> {
    tree: &'tree mut AvlTree<K, V>,
    key: &'key Q,
}

impl<'tree, 'key, K, V, Q> VacantEntry<'tree, 'key, K, V, Q>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    /// Returns the key used to look up this entry.
    pub fn key(&self) -> &'key Q {
        self.key
    }

    /// Inserts `key` and `value` at this entry, rebalancing the tree, and returns a mutable
    /// reference to the stored value.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not equal to the key used to retrieve this entry.
    pub fn insert(self, key: K, value: V) -> &'tree mut V {
        let borrowed: &Q = key.borrow();
        assert!(
            borrowed == self.key,
            "inserted key must match the entry's key"
        );

        // The tree has been exclusively borrowed since the lookup, so the key is still absent.
        if self.tree.insert_with_value(key, value).is_err() {
            unreachable!("vacant entry key must be absent from the tree");
        }

        // Rotations may have moved the new node; find it again by key.
        self.tree
            .get_mut(self.key)
            .expect("inserted entry must be present in the tree")
    }
}

/// A view into an occupied entry in an [`AvlTree`].
pub struct OccupiedEntry<'tree, 'key, K, V, Q: ?Sized> {
    tree: &'tree mut AvlTree<K, V>,
    key: &'key Q,
}

impl<'tree, 'key, K, V, Q> OccupiedEntry<'tree, 'key, K, V, Q>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    /// Returns the key used to look up this entry.
    pub fn key(&self) -> &'key Q {
        self.key
    }

    /// Returns a reference to the value in the entry.
    pub fn get(&self) -> &V {
        self.tree
            .get(self.key)
            .expect("occupied entry must be present in the tree")
    }

    /// Returns a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        self.tree
            .get_mut(self.key)
            .expect("occupied entry must be present in the tree")
    }

    /// Converts the entry into a mutable reference to its value, bound to the tree's borrow.
    pub fn into_mut(self) -> &'tree mut V {
        self.tree
            .get_mut(self.key)
            .expect("occupied entry must be present in the tree")
    }

    /// Removes the entry from the tree, returning its key and value.
    pub fn remove(self) -> (K, V) {
        self.tree
            .remove(self.key)
            .expect("occupied entry must be present in the tree")
    }
}

impl<K: Ord, V> AvlTree<K, V> {
    /// Returns the entry for `key`, for in-place insertion or update.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn entry<'key, Q>(&mut self, key: &'key Q) -> Entry<'_, 'key, K, V, Q>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.contains_key(key) {
            Entry::Occupied(OccupiedEntry { tree: self, key })
        } else {
            Entry::Vacant(VacantEntry { tree: self, key })
        }
    }
}
