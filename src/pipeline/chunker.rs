//! Splits article text into bounded slices for the summarization backend.

use std::num::NonZeroUsize;

/// A contiguous slice of the source text.
///
/// Lengths and offsets count `char`s, so a chunk never splits a code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub offset: usize,
    pub text: &'a str,
}

impl Chunk<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Split `text` into consecutive, non-overlapping chunks of `max_len` chars.
/// The last chunk holds the remainder. Empty input yields no chunks.
#[must_use]
pub fn chunk(text: &str, max_len: NonZeroUsize) -> Vec<Chunk<'_>> {
    let max_len = max_len.get();
    let mut chunks = Vec::new();
    let mut start_byte = 0;
    let mut start_char = 0;

    for (count, (byte_idx, _)) in text.char_indices().enumerate() {
        if count > start_char && count - start_char == max_len {
            chunks.push(Chunk {
                offset: start_char,
                text: &text[start_byte..byte_idx],
            });
            start_byte = byte_idx;
            start_char = count;
        }
    }

    if start_byte < text.len() {
        chunks.push(Chunk {
            offset: start_char,
            text: &text[start_byte..],
        });
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: usize) -> NonZeroUsize {
        NonZeroUsize::new(v).unwrap()
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk("", n(10)).is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = chunk("A. B. C.", n(100));
        assert_eq!(chunks, vec![Chunk { offset: 0, text: "A. B. C." }]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_chunk() {
        let chunks = chunk("abcdef", n(3));
        assert_eq!(
            chunks,
            vec![
                Chunk { offset: 0, text: "abc" },
                Chunk { offset: 3, text: "def" },
            ]
        );
    }

    #[test]
    fn remainder_goes_in_last_chunk() {
        let texts: Vec<&str> = chunk("abcdefg", n(3)).iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["abc", "def", "g"]);
    }

    #[test]
    fn multibyte_characters_are_counted_once() {
        let chunks = chunk("héllo wörld", n(4));
        assert!(chunks.iter().all(|c| c.len() <= 4));
        assert_eq!(chunks[0].text, "héll");
        assert_eq!(chunks[1].offset, 4);
    }

    #[test]
    fn chunks_reassemble_the_input_for_many_lengths() {
        let text = "The quick brown fox — jumps over the lazy dog. ünïcödé ✓ ".repeat(7);
        let total = text.chars().count();

        for max in 1..=40 {
            let chunks = chunk(&text, n(max));
            let joined: String = chunks.iter().map(|c| c.text).collect();
            assert_eq!(joined, text, "max_len {max}");
            assert_eq!(chunks.len(), total.div_ceil(max), "max_len {max}");
            assert!(chunks.iter().all(|c| c.len() <= max && !c.is_empty()));
        }
    }
}
