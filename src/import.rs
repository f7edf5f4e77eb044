//! Loading a [`TranslationIndex`] from a tab-separated dictionary file.
//!
//! Each line holds a source word, a tab, then a raw definition:
//!
//! ```text
//! # comment lines start with '#'
//! abandon	abandonner [verb]
//! abbey	abbaye {f}
//! ```
//!
//! The definition is cleaned up into a single translation by [`parse_definition`].

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{Result, TranslationIndex};

/// Characters that end a translation when no colon marks it.
const TERMINATORS: &[char] = &['(', '[', ',', ';', '\n'];

/// Parses one dictionary line into a `(word, translation)` pair.
///
/// Returns `None` for comment lines (starting with `#`), blank lines and lines without a tab.
pub fn parse_line(line: &str) -> Option<(&str, String)> {
    if line.starts_with('#') || line.trim().is_empty() {
        return None;
    }

    let (word, definition) = line.split_once('\t')?;
    Some((word, parse_definition(definition)))
}

/// Extracts the translation from a raw definition.
///
/// Bracketed (`[...]`) and then parenthesized (`(...)`) annotations are removed first; an
/// unterminated annotation runs to the end of the definition. Then, with `:` the first colon and
/// `~` the first tilde:
/// - if `:` comes before `~` (or there is no `~`), the translation is the text before `:`;
/// - if `~` comes before `:`, the translation is the text after `:` up to the next `,`, `;`, `(`,
///   `[` or newline;
/// - without a colon, the translation is the text up to the first such terminator.
///
/// The result is trimmed of surrounding whitespace.
pub fn parse_definition(definition: &str) -> String {
    let definition = strip_groups(&strip_groups(definition, '[', ']'), '(', ')');

    let translation = match (definition.find(':'), definition.find('~')) {
        (Some(colon), Some(tilde)) if tilde < colon => {
            let after = &definition[colon + 1..];
            up_to_terminator(after)
        }
        (Some(colon), _) => &definition[..colon],
        (None, _) => up_to_terminator(&definition),
    };

    translation.trim().to_owned()
}

fn up_to_terminator(text: &str) -> &str {
    match text.find(TERMINATORS) {
        Some(end) => &text[..end],
        None => text,
    }
}

// Removes every `open ... close` group from `text`, including the delimiters.
fn strip_groups(text: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(open) {
        out.push_str(&rest[..start]);

        rest = match rest[start..].find(close) {
            Some(end) => &rest[start + end + close.len_utf8()..],
            None => "",
        };
    }

    out.push_str(rest);
    out
}

/// Builds an index from every line of `reader`.
///
/// Lines that do not parse are skipped. Words may repeat; each occurrence adds a translation.
pub fn load<R: BufRead>(reader: R) -> Result<TranslationIndex> {
    let mut index = TranslationIndex::new();
    let mut skipped = 0usize;

    for line in reader.lines() {
        let line = line?;

        match parse_line(&line) {
            Some((word, translation)) => index.add_word(word, translation),
            None => skipped += 1,
        }
    }

    tracing::debug!(words = index.len(), skipped, "loaded dictionary");

    Ok(index)
}

/// Opens the dictionary file at `path` and loads it with [`load`].
pub fn load_path(path: impl AsRef<Path>) -> Result<TranslationIndex> {
    let path = path.as_ref();
    let file = File::open(path)?;

    tracing::info!(path = %path.display(), "reading dictionary");

    load(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        assert_eq!(parse_line("# English-French dictionary"), None);
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("no tab here"), None);
    }

    #[test]
    fn strips_annotations() {
        assert_eq!(
            parse_line("abandon\tabandonner [verb]"),
            Some(("abandon", "abandonner".to_owned()))
        );
        assert_eq!(
            parse_definition("(to) [formal] quitter [verb] (sth.)"),
            "quitter"
        );
        assert_eq!(parse_definition("chose [unterminated"), "chose");
    }

    #[test]
    fn stops_at_terminator() {
        assert_eq!(parse_definition("maison, foyer"), "maison");
        assert_eq!(parse_definition("rapide; vite"), "rapide");
    }

    #[test]
    fn colon_before_tilde_keeps_prefix() {
        assert_eq!(parse_definition("pomme: ~ de terre"), "pomme");
        assert_eq!(parse_definition("chien: animal"), "chien");
    }

    #[test]
    fn tilde_before_colon_keeps_suffix() {
        assert_eq!(parse_definition("faire ~ : prendre, saisir"), "prendre");
    }

    #[test]
    fn tilde_without_colon() {
        assert_eq!(parse_definition("~ chose, truc"), "~ chose");
    }

    #[test]
    fn load_repeated_words() {
        let data = "# header\ncat\tchat\ncat\tminou {m}\ndog\tchien [animal]\n\n";
        let index = load(data.as_bytes()).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.translate("cat").unwrap(), ["chat", "minou {m}"]);
        assert_eq!(index.translate("dog").unwrap(), ["chien"]);
        index.assert_invariants();
    }

    #[test]
    fn missing_file() {
        let err = load_path("/nonexistent/dictionary.txt").unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
