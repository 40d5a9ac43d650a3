//! Sentence-based text chunking.
//!
//! MMS VITS models degrade on very long inputs, so text is split into chunks
//! of at most `max_chars` characters, closing chunks on sentence boundaries.
//! The period is the sentence terminator; question marks and exclamation
//! points do not split (they stay embedded in their sentence).

/// Default maximum characters per chunk.
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 200;

/// Split text into chunks based on sentence boundaries and a maximum length.
///
/// Line breaks are normalized to spaces, the text is split on `.`, and
/// consecutive sentences are greedily packed into a chunk while it stays
/// within `max_chars` (counting the single space joining sentences). A chunk
/// that would overflow is closed and the next sentence starts a new one.
///
/// The bound is soft: a single sentence longer than `max_chars` is emitted
/// as its own oversized chunk rather than truncated.
///
/// Empty or whitespace-only input yields no chunks. Lengths are counted in
/// characters, not bytes, so non-Latin scripts chunk the same way.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let normalized = text.replace(['\n', '\r'], " ");

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for fragment in normalized.split('.') {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }

        // Re-append the terminator the split consumed.
        let sentence_chars = fragment.chars().count() + 1;

        if current.is_empty() {
            current.push_str(fragment);
            current.push('.');
            current_chars = sentence_chars;
        } else if current_chars + 1 + sentence_chars <= max_chars {
            current.push(' ');
            current.push_str(fragment);
            current.push('.');
            current_chars += 1 + sentence_chars;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(fragment);
            current.push('.');
            current_chars = sentence_chars;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Strip injected terminators and collapse whitespace so chunk output can
    /// be compared against the source text.
    fn normalize(text: &str) -> String {
        text.replace('.', " ").split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn short_text_yields_single_chunk() {
        let chunks = chunk_text("Hello there. How are you? Fine.", 200);
        assert_eq!(chunks, vec!["Hello there. How are you? Fine."]);
    }

    #[test]
    fn chunks_reconstruct_the_input() {
        let text = "The first sentence. A second one follows.\nA third, on its own line. And a fourth to finish.";
        let chunks = chunk_text(text, 40);
        assert!(chunks.len() > 1);
        assert_eq!(normalize(&chunks.join(" ")), normalize(text));
    }

    #[test]
    fn chunk_lengths_respect_the_maximum() {
        let text = "One short sentence. Another short sentence. Yet another short sentence. And one more for good measure.";
        for chunk in chunk_text(text, 50) {
            assert!(chunk.chars().count() <= 50, "chunk too long: {:?}", chunk);
        }
    }

    #[test]
    fn oversized_sentence_passes_through_unsplit() {
        let long = format!("{} end", "word ".repeat(30));
        let text = format!("Short one. {}. Short two.", long.trim());
        let chunks = chunk_text(&text, 40);
        assert!(chunks.iter().any(|c| c.chars().count() > 40));
        assert_eq!(normalize(&chunks.join(" ")), normalize(&text));
    }

    #[test]
    fn ninety_char_sentences_split_at_150() {
        // Three sentences of ~90 characters against a 150-char maximum:
        // no two fit together, so each becomes its own chunk.
        let sentence = "x".repeat(89);
        let text = format!("{s}. {s}. {s}.", s = sentence);
        let chunks = chunk_text(&text, 150);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], format!("{}.", sentence));
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_text("", 200).is_empty());
        assert!(chunk_text("   \n\n  ", 200).is_empty());
        assert!(chunk_text("...", 200).is_empty());
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = "Alpha beta gamma. Delta epsilon. Zeta eta theta iota. Kappa lambda.";
        assert_eq!(chunk_text(text, 30), chunk_text(text, 30));
    }

    #[test]
    fn line_breaks_are_normalized_to_spaces() {
        let chunks = chunk_text("First line\nsecond line. Next sentence.", 200);
        assert_eq!(chunks, vec!["First line second line. Next sentence."]);
    }

    #[test]
    fn text_without_periods_stays_one_chunk() {
        // Only the period terminates sentences; other punctuation does not
        // split, so this stays a single oversized chunk.
        let text = "Is this one sentence? Yes! It never splits";
        let chunks = chunk_text(text, 10);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], "Is this one sentence? Yes! It never splits.");
    }
}
