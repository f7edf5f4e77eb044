use core::fmt;

use crate::{
    similarity::{similarity, SUGGESTION_LIMIT, SUGGESTION_THRESHOLD},
    AvlTree, Entry, Error, Iter, Keys, LevelDump, Result,
};

/// A bilingual dictionary mapping each word to its translations, in the order they were added.
///
/// Words are kept in an [`AvlTree`], so lookup, insertion and removal complete in
/// _O(log(n))_ time. Words are compared case-sensitively.
#[derive(Clone, Default)]
pub struct TranslationIndex {
    tree: AvlTree<String, Vec<String>>,
}

impl TranslationIndex {
    /// Creates a new, empty `TranslationIndex`.
    pub const fn new() -> Self {
        Self {
            tree: AvlTree::new(),
        }
    }

    /// Returns `true` if the index contains no words.
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of distinct words in the index.
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Adds `translation` to the translations of `word`.
    ///
    /// A word seen for the first time gets a new node; otherwise the translation is appended to the
    /// existing list. The same translation may be added twice and is then listed twice.
    pub fn add_word(&mut self, word: &str, translation: impl Into<String>) {
        let translation = translation.into();

        match self.tree.entry(word) {
            Entry::Occupied(mut occupied) => {
                tracing::trace!(word, %translation, "appended translation");
                occupied.get_mut().push(translation);
            }

            Entry::Vacant(vacant) => {
                tracing::debug!(word, %translation, "inserted word");
                vacant.insert(word.to_owned(), vec![translation]);
            }
        }
    }

    /// Removes `word` and all its translations, returning the translations.
    ///
    /// Fails with [`Error::Empty`] if the index has no words, and otherwise with
    /// [`Error::NotFound`] if `word` is absent.
    pub fn remove_word(&mut self, word: &str) -> Result<Vec<String>> {
        if self.is_empty() {
            return Err(Error::Empty);
        }

        let (_, translations) = self
            .tree
            .remove(word)
            .map_err(|_| Error::not_found(word))?;

        tracing::debug!(word, remaining = self.len(), "removed word");

        Ok(translations)
    }

    /// Returns `true` if `word` is in the index.
    pub fn contains(&self, word: &str) -> bool {
        self.tree.contains_key(word)
    }

    /// Returns the translations of `word`, in the order they were added.
    pub fn translate(&self, word: &str) -> Result<&[String]> {
        self.tree
            .get(word)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::not_found(word))
    }

    /// Suggests up to five stored words that are similar to `misspelled`, most similar first.
    ///
    /// Only words with a [`similarity`] of at least 0.5 qualify. Words with equal similarity are
    /// ordered by descending word.
    pub fn suggest(&self, misspelled: &str) -> Vec<String> {
        self.suggest_scored(misspelled)
            .into_iter()
            .map(|(_, word)| word)
            .collect()
    }

    /// Like [`suggest`](Self::suggest), but also returns the similarity of each suggestion.
    pub fn suggest_scored(&self, misspelled: &str) -> Vec<(f64, String)> {
        let mut scored: Vec<(f64, &String)> = self
            .tree
            .preorder()
            .map(|(word, _)| (similarity(misspelled, word), word))
            .filter(|&(score, _)| score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| b.1.cmp(a.1)));
        scored.truncate(SUGGESTION_LIMIT);

        tracing::trace!(misspelled, found = scored.len(), "suggestions");

        scored
            .into_iter()
            .map(|(score, word)| (score, word.clone()))
            .collect()
    }

    /// Returns `true` if the heights of the root's two subtrees differ by at most one.
    ///
    /// Only the root is inspected, and an empty index is reported as unbalanced. See
    /// [`is_avl`](Self::is_avl) for a check of every node.
    pub fn is_balanced(&self) -> bool {
        self.tree.is_balanced()
    }

    /// Returns `true` if every node of the underlying tree satisfies the AVL balance bound.
    pub fn is_avl(&self) -> bool {
        self.tree.is_avl()
    }

    /// Returns an iterator over the stored words, in ascending order.
    pub fn words(&self) -> Keys<'_, String, Vec<String>> {
        self.tree.keys()
    }

    /// Returns an iterator over the words and their translations, in ascending word order.
    pub fn iter(&self) -> Iter<'_, String, Vec<String>> {
        self.tree.iter()
    }

    /// Returns the breadth-first diagnostic dump of the underlying tree.
    pub fn level_dump(&self) -> LevelDump<'_, String, Vec<String>> {
        LevelDump::new(&self.tree)
    }

    /// Writes the underlying tree as a Graphviz digraph named `name`.
    pub fn dotgraph<W: fmt::Write>(&self, name: &str, w: W) -> fmt::Result {
        self.tree.dotgraph(name, w)
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        self.tree.assert_invariants();
        assert!(
            self.tree.iter().all(|(_, translations)| !translations.is_empty()),
            "every word must have at least one translation"
        );
    }
}

impl<W, T> Extend<(W, T)> for TranslationIndex
where
    W: AsRef<str>,
    T: Into<String>,
{
    fn extend<I: IntoIterator<Item = (W, T)>>(&mut self, iter: I) {
        for (word, translation) in iter {
            self.add_word(word.as_ref(), translation);
        }
    }
}

impl<W, T> FromIterator<(W, T)> for TranslationIndex
where
    W: AsRef<str>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (W, T)>>(iter: I) -> Self {
        let mut index = TranslationIndex::new();
        index.extend(iter);
        index
    }
}

impl fmt::Debug for TranslationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_word_appends() {
        let mut index = TranslationIndex::new();
        index.add_word("cat", "chat");
        index.add_word("cat", "minou");

        assert_eq!(index.translate("cat").unwrap(), ["chat", "minou"]);
        assert_eq!(index.len(), 1);
        index.assert_invariants();
    }

    #[test]
    fn duplicate_translation_is_kept() {
        let index: TranslationIndex = [("dog", "chien"), ("dog", "chien")].into_iter().collect();

        assert_eq!(index.translate("dog").unwrap(), ["chien", "chien"]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn remove_last_word() {
        let mut index = TranslationIndex::new();
        index.add_word("dog", "chien");

        assert_eq!(index.remove_word("dog").unwrap(), ["chien"]);
        assert!(index.is_empty());
        assert!(!index.contains("dog"));

        assert!(matches!(index.remove_word("dog"), Err(Error::Empty)));
    }

    #[test]
    fn remove_absent_word() {
        let mut index = TranslationIndex::new();
        index.add_word("dog", "chien");

        match index.remove_word("cat") {
            Err(Error::NotFound(word)) => assert_eq!(word, "cat"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn remove_keeps_translations_with_their_word() {
        let mut index = TranslationIndex::new();
        for (i, word) in ["m", "f", "t", "b", "h", "p", "w", "a", "c"].iter().enumerate() {
            index.add_word(word, format!("{word}{i}"));
            index.add_word(word, format!("{word}-alt"));
        }

        // "f" has two children, so its payload is exchanged with its successor before removal.
        index.remove_word("f").unwrap();
        index.remove_word("m").unwrap();
        index.assert_invariants();

        for (word, translations) in index.iter() {
            assert!(translations.iter().all(|t| t.starts_with(word.as_str())));
            assert_eq!(translations.len(), 2);
        }
        assert_eq!(
            index.words().map(String::as_str).collect::<Vec<_>>(),
            ["a", "b", "c", "h", "p", "t", "w"]
        );
    }

    #[test]
    fn translate_absent_word() {
        let index = TranslationIndex::new();

        assert!(matches!(index.translate("ghost"), Err(Error::NotFound(_))));
    }

    #[test]
    fn suggest_orders_by_similarity() {
        let index: TranslationIndex = [
            ("color", "couleur"),
            ("colour", "couleur"),
            ("colonel", "colonel"),
        ]
        .into_iter()
        .collect();

        assert_eq!(index.suggest("collor"), ["color", "colour"]);
    }

    #[test]
    fn suggest_caps_results() {
        let index: TranslationIndex = ["bat", "cat", "eat", "fat", "hat", "mat", "oat", "pat"]
            .into_iter()
            .map(|word| (word, "x"))
            .collect();

        let suggestions = index.suggest_scored("rat");
        assert_eq!(suggestions.len(), 5);

        // Every candidate scores 2/3, so ties fall back to descending word order.
        let words: Vec<_> = suggestions.iter().map(|(_, word)| word.as_str()).collect();
        assert_eq!(words, ["pat", "oat", "mat", "hat", "fat"]);
        assert!(suggestions.iter().all(|&(score, _)| score == 2.0 / 3.0));
    }

    #[test]
    fn suggest_nothing_similar() {
        let mut index = TranslationIndex::new();
        assert!(index.suggest("anything").is_empty());

        index.add_word("zebra", "zèbre");
        assert!(index.suggest("apple").is_empty());
    }

    #[test]
    fn suggest_scores_encoded_bytes() {
        let index: TranslationIndex = [("ae", "x")].into_iter().collect();

        // "aé" is three bytes, two edits away from "ae".
        assert!(index.suggest("aé").is_empty());
        assert_eq!(index.suggest("ae"), ["ae"]);
    }

    #[test]
    fn clone_is_independent() {
        let mut index: TranslationIndex = [("cat", "chat"), ("dog", "chien"), ("owl", "hibou")]
            .into_iter()
            .collect();
        let snapshot = index.clone();

        index.add_word("cat", "minou");
        index.remove_word("dog").unwrap();
        index.add_word("ant", "fourmi");

        assert_eq!(snapshot.translate("cat").unwrap(), ["chat"]);
        assert_eq!(snapshot.translate("dog").unwrap(), ["chien"]);
        assert!(!snapshot.contains("ant"));
        assert_eq!(snapshot.len(), 3);
        assert_eq!(index.translate("cat").unwrap(), ["chat", "minou"]);
        snapshot.assert_invariants();
        index.assert_invariants();
    }

    #[test]
    fn shallow_balance_check() {
        let mut index = TranslationIndex::new();
        assert!(!index.is_balanced());
        assert!(index.is_avl());

        for word in ["a", "b", "c", "d", "e", "f", "g"] {
            index.add_word(word, word.to_uppercase());
        }
        assert!(index.is_balanced());
        assert!(index.is_avl());
    }
}
