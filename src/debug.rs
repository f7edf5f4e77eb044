use std::{collections::VecDeque, fmt};

use crate::{AvlTree, Node};

/// A breadth-first dump of an [`AvlTree`], for checking its shape by eye.
///
/// Each node is written on its own line, in level order, as `key, balance, path`:
/// - `balance` is the height of the left subtree minus the height of the right subtree, an absent
///   child counting as -1.
/// - `path` locates the node: the root is `1`, and each step appends `.1` for a left child or `.2`
///   for a right child.
pub struct LevelDump<'tree, K, V> {
    tree: &'tree AvlTree<K, V>,
}

impl<'tree, K, V> LevelDump<'tree, K, V> {
    pub(crate) fn new(tree: &'tree AvlTree<K, V>) -> Self {
        LevelDump { tree }
    }
}

impl<K: fmt::Display, V> fmt::Display for LevelDump<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut queue: VecDeque<(&Node<K, V>, String)> = VecDeque::new();
        queue.extend(self.tree.root.as_deref().map(|root| (root, String::from("1"))));

        while let Some((node, path)) = queue.pop_front() {
            writeln!(f, "{}, {}, {path}", node.key, node.balance())?;

            if let Some(left) = node.left() {
                queue.push_back((left, format!("{path}.1")));
            }

            if let Some(right) = node.right() {
                queue.push_back((right, format!("{path}.2")));
            }
        }

        Ok(())
    }
}

impl<K: fmt::Display, V> AvlTree<K, V> {
    /// Returns the breadth-first diagnostic dump of the tree.
    pub fn level_dump(&self) -> LevelDump<'_, K, V> {
        LevelDump::new(self)
    }

    /// Writes the tree as a Graphviz digraph named `name`.
    ///
    /// Nodes of equal depth share a rank and are labelled `key:balance`. Absent children are drawn
    /// as points.
    pub fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
    {
        let root = match self.root.as_deref() {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item<'a, K, V> {
            Node(&'a Node<K, V>),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut missing = 0;
        let mut links = String::new();

        while !queue.is_empty() {
            use fmt::Write;

            write!(w, "{{rank=same; ")?;

            for _rank_node in 0..queue.len() {
                let node = match queue.pop_front() {
                    Some(Item::Node(node)) => node,
                    Some(Item::Missing(id)) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                    None => break,
                };

                let key = &node.key;
                let balance = node.balance();
                write!(w, "\"graph{name}-{key}\" [label=\"{key}:{balance}\"]; ")?;

                for child in [node.left(), node.right()] {
                    if let Some(child) = child {
                        let child_key = &child.key;

                        queue.push_back(Item::Node(child));
                        writeln!(
                            links,
                            "\"graph{name}-{key}\" -> \"graph{name}-{child_key}\";"
                        )?;
                    } else {
                        queue.push_back(Item::Missing(missing));
                        writeln!(
                            links,
                            "\"graph{name}-{key}\" -> \"graph{name}-missing{missing}\";"
                        )?;
                        missing += 1;
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}

#[cfg(test)]
mod tests {
    use crate::{AvlTree, TranslationIndex};

    #[test]
    fn level_dump_paths() {
        let mut tree: AvlTree<i32> = AvlTree::new();
        for key in [2, 1, 3, 4] {
            tree.insert(key).unwrap();
        }

        assert_eq!(
            tree.level_dump().to_string(),
            "2, -1, 1\n1, 0, 1.1\n3, -1, 1.2\n4, 0, 1.2.2\n"
        );
    }

    #[test]
    fn empty_dump() {
        let index = TranslationIndex::new();
        assert_eq!(index.level_dump().to_string(), "");

        let mut dot = String::new();
        index.dotgraph("empty", &mut dot).unwrap();
        assert_eq!(dot, "digraph \"graph-empty\" {}");
    }

    #[test]
    fn dotgraph_links_every_child() {
        let index: TranslationIndex = [("b", "x"), ("a", "y"), ("c", "z")].into_iter().collect();

        let mut dot = String::new();
        index.dotgraph("abc", &mut dot).unwrap();

        assert!(dot.contains("\"graphabc-b\" [label=\"b:0\"]"));
        assert!(dot.contains("\"graphabc-b\" -> \"graphabc-a\";"));
        assert!(dot.contains("\"graphabc-b\" -> \"graphabc-c\";"));
        assert_eq!(dot.matches("[shape=point]").count(), 4);
    }
}
