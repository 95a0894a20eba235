//! Abstract text reconstruction from a positional word index

use std::collections::BTreeMap;

/// Tokens that never get a leading space when rejoined.
const PUNCTUATION: &[&str] = &[",", ".", "(", ")", "[", "]", "{", "}", ":", ";", "!", "?"];

/// Rebuild plain text from an inverted index (token -> positions).
///
/// Tokens are emitted in ascending position order. Every token except the
/// one at position 0 and the fixed punctuation set is preceded by a single
/// space. Position collisions are resolved last-write-wins; well-formed
/// source data has none.
pub fn decode_inverted_index(index: &BTreeMap<String, Vec<usize>>) -> String {
    let mut by_position: BTreeMap<usize, &str> = BTreeMap::new();
    for (token, positions) in index {
        for &position in positions {
            by_position.insert(position, token);
        }
    }

    let mut text = String::new();
    for (&position, &token) in &by_position {
        if position != 0 && !PUNCTUATION.contains(&token) {
            text.push(' ');
        }
        text.push_str(token);
    }
    text
}
