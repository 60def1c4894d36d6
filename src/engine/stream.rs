//! CharacterStream construction
//!
//! A display character is an extended grapheme cluster, so combining marks
//! and emoji sequences occupy a single cell. Whitespace clusters are dropped
//! before each remaining cluster is repeated in place.

use unicode_segmentation::UnicodeSegmentation;

/// Ordered sequence of display characters ready for pagination
pub type CharacterStream = Vec<String>;

/// Split text into display characters, skipping whitespace
pub fn display_characters(text: &str) -> Vec<String> {
    text.graphemes(true)
        .filter(|g| !is_whitespace(g))
        .map(str::to_string)
        .collect()
}

/// Build the stream: whitespace removed, each character repeated `repeat_count` times
pub fn build_stream(text: &str, repeat_count: u32) -> CharacterStream {
    let repeat = repeat_count.max(1) as usize;
    let chars = display_characters(text);
    let mut stream = Vec::with_capacity(chars.len() * repeat);
    for ch in chars {
        for _ in 1..repeat {
            stream.push(ch.clone());
        }
        stream.push(ch);
    }
    stream
}

fn is_whitespace(grapheme: &str) -> bool {
    grapheme.chars().all(char::is_whitespace)
}
