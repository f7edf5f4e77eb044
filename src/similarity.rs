//! String similarity used to rank "did you mean" suggestions.
//!
//! Similarity is derived from the Levenshtein edit distance, normalized by the length of the
//! longer string. Lengths and edits are counted in bytes of the UTF-8 encoding, so a non-ASCII
//! character weighs as much as its encoded length.

/// The maximum number of suggestions returned for a misspelled word.
pub const SUGGESTION_LIMIT: usize = 5;

/// The minimum similarity a stored word needs to be suggested.
pub const SUGGESTION_THRESHOLD: f64 = 0.5;

/// Returns the Levenshtein distance between `a` and `b`: the minimum number of single-byte
/// insertions, deletions and substitutions transforming one into the other.
///
/// The full `(len(a) + 1) x (len(b) + 1)` table is computed, so this runs in
/// _O(len(a) * len(b))_ time.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());

    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];

    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in table[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let substitution = if a[i - 1] == b[j - 1] { 0 } else { 1 };

            table[i][j] = (table[i - 1][j] + 1)
                .min(table[i][j - 1] + 1)
                .min(table[i - 1][j - 1] + substitution);
        }
    }

    table[a.len()][b.len()]
}

/// Returns how similar `a` and `b` are, from `0.0` (nothing in common) to `1.0` (identical).
///
/// Two empty strings are identical. Otherwise the result is
/// `(max_len - edit_distance(a, b)) / max_len`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.len().max(b.len());

    if max_len == 0 {
        return 1.0;
    }

    let max_len = max_len as f64;
    (max_len - edit_distance(a, b) as f64) / max_len
}
