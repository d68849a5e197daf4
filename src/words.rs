//! Word lists that identifiers are assembled from.

use std::path::Path;

use crate::error::WordListError;

/// The built-in word list, one word per line.
static DEFAULT_WORDS: &str = include_str!("../words/default.txt");

/// The built-in word list.
pub fn default_words() -> Vec<String> {
    filter_words(DEFAULT_WORDS.lines())
}

/// Whether a line is a usable word: lowercase ASCII letters only.
///
/// Narrower than a Java identifier part: digits, `_`, `$`, capitals and
/// non-ASCII letters are rejected.
pub fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_lowercase())
}

/// Trim lines and keep only usable words, in input order.
pub fn filter_words<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let word = line.as_ref().trim();
            is_word(word).then(|| word.to_string())
        })
        .collect()
}

/// Read a word list from disk, one word per line.
///
/// Lines are trimmed. Blank lines and lines that fail [`is_word`] are
/// dropped, including valid Java identifier parts such as `oak_2`, `Elm` or
/// `ahorn$`.
pub fn load_word_list(path: &Path) -> Result<Vec<String>, WordListError> {
    let content = std::fs::read_to_string(path).map_err(|source| WordListError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let words = filter_words(content.lines());
    if words.is_empty() {
        return Err(WordListError::NoUsableWords {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(path = %path.display(), count = words.len(), "loaded word list");
    Ok(words)
}
