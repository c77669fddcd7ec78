use memchr::memchr3_iter;
use tracing::debug;

/// Extra bytes past the size limit searched for a sentence end.
const BOUNDARY_LOOKAHEAD: usize = 50;

/// Splits text into bounded-size chunks, preferring sentence boundaries.
///
/// # Algorithm
///
/// A cursor walks the remaining text. At each step the candidate boundary
/// is `min(remaining, limit)` bytes. When more text follows, the window up
/// to `boundary + 50` bytes is searched for the last sentence end: either
/// a period directly followed by a newline, or `.`/`!`/`?` followed by a
/// space and an uppercase letter. A match moves the boundary to one byte
/// past the terminator; no match falls back to a hard cut. Each emitted
/// chunk is trimmed of surrounding whitespace.
///
/// Cuts always land on `char` boundaries, so a hard cut can never split a
/// code point. A single sentence longer than `limit + 50` produces one
/// oversized chunk. Empty input produces no chunks. Output is
/// deterministic for identical inputs.
///
/// # Panics
///
/// Panics if `limit` is zero.
#[must_use]
pub fn chunk(text: &str, limit: usize) -> Vec<String> {
    assert!(limit > 0, "chunk limit must be greater than 0");

    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let mut boundary = floor_char_boundary(rest, rest.len().min(limit));

        if boundary < rest.len() {
            let window_end =
                floor_char_boundary(rest, rest.len().min(boundary + BOUNDARY_LOOKAHEAD));
            if let Some(pos) = last_sentence_end(&rest[..window_end]) {
                // Split right after the terminator; the space and the
                // following capital open the next chunk.
                boundary = pos + 1;
            }
        }

        if boundary == 0 {
            // Limit smaller than the first character: take one whole char.
            boundary = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }

        chunks.push(rest[..boundary].trim().to_string());
        rest = &rest[boundary..];
    }

    debug!("Split text into {} chunks (limit {} bytes)", chunks.len(), limit);

    chunks
}

/// Finds the byte offset of the last sentence terminator in the window.
///
/// A terminator is a period immediately followed by a newline, or one of
/// `.`/`!`/`?` followed by a space and an uppercase letter.
fn last_sentence_end(window: &str) -> Option<usize> {
    let bytes = window.as_bytes();
    let mut last = None;

    for pos in memchr3_iter(b'.', b'!', b'?', bytes) {
        match bytes.get(pos + 1) {
            Some(b'\n') if bytes[pos] == b'.' => last = Some(pos),
            Some(b' ') => {
                // The terminator and space are ASCII, so pos + 2 is a
                // valid char boundary.
                let next_is_uppercase = window[pos + 2..]
                    .chars()
                    .next()
                    .is_some_and(char::is_uppercase);
                if next_is_uppercase {
                    last = Some(pos);
                }
            }
            _ => {}
        }
    }

    last
}

/// Rounds `index` down to the nearest `char` boundary of `s`.
fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(chunk("", 100).is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk("Ala ma kota.", 100);
        assert_eq!(chunks, vec!["Ala ma kota."]);
    }

    #[test]
    fn test_splits_at_sentence_boundary() {
        let text = "Ala ma kota. Za oknem pada deszcz i wieje silny wiatr.";
        let chunks = chunk(text, 30);

        assert_eq!(chunks[0], "Ala ma kota.");
        assert_eq!(normalized(&chunks.join(" ")), normalized(text));
    }

    #[test]
    fn test_splits_after_period_newline() {
        let text = "Pierwszy akapit kończy się tutaj.\nDrugi akapit zaczyna się małą literą bo to cytat.";
        let chunks = chunk(text, 40);

        assert_eq!(chunks[0], "Pierwszy akapit kończy się tutaj.");
    }

    #[test]
    fn test_exclamation_and_question_boundaries() {
        let text = "To był wielki sukces! Wszyscy o tym mówili przez tydzień.";
        let chunks = chunk(text, 25);
        assert_eq!(chunks[0], "To był wielki sukces!");

        let text = "Czy to prawda? Nikt nie potrafił odpowiedzieć na to pytanie.";
        let chunks = chunk(text, 20);
        assert_eq!(chunks[0], "Czy to prawda?");
    }

    #[test]
    fn test_boundary_requires_uppercase_continuation() {
        // "r." followed by a lowercase word is an abbreviation, not a
        // sentence end, so the cut falls back to a hard boundary.
        let text = "W 2024 r. odbyły się wybory";
        let chunks = chunk(text, 15);
        assert!(chunks[0].len() >= 14);
    }

    #[test]
    fn test_hard_cut_without_boundary() {
        let text = "a".repeat(250);
        let chunks = chunk(&text, 100);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 100);
        assert_eq!(chunks[1].len(), 100);
        assert_eq!(chunks[2].len(), 50);
    }

    #[test]
    fn test_size_bound_property() {
        let sentence = "To jest zdanie o przewidywalnej długości w teście. ";
        let text = sentence.repeat(40) + "Koniec";
        let limit = 120;

        let chunks = chunk(&text, limit);
        assert!(chunks.len() > 1);

        for piece in &chunks[..chunks.len() - 1] {
            assert!(
                piece.len() <= limit + BOUNDARY_LOOKAHEAD,
                "chunk of {} bytes exceeds bound",
                piece.len()
            );
        }
    }

    #[test]
    fn test_content_preserved() {
        let text = "Ala ma kota. Kot ma Alę! Czy to wszystko? Na pewno nie.\nDalszy ciąg artykułu nastąpi.";
        let chunks = chunk(text, 20);

        let rejoined = chunks.join(" ");
        assert_eq!(normalized(&rejoined), normalized(text));
    }

    #[test]
    fn test_oversized_sentence_kept_whole_after_boundary() {
        let long_tail = "b".repeat(300);
        let text = format!("Krótki wstęp. A{long_tail}");
        let chunks = chunk(&text, 50);

        assert_eq!(chunks[0], "Krótki wstęp.");
        // The tail has no boundary, so it is hard-cut at the limit.
        assert!(chunks[1].len() <= 50);
    }

    #[test]
    fn test_multibyte_hard_cut_respects_char_boundaries() {
        let text = "ż".repeat(100);
        let chunks = chunk(&text, 15);

        for piece in &chunks {
            assert!(piece.chars().all(|c| c == 'ż'));
        }
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_polish_uppercase_recognized() {
        let text = "Sejm przyjął ustawę. Żaden poseł nie głosował przeciw niej wczoraj.";
        let chunks = chunk(text, 25);
        assert_eq!(chunks[0], "Sejm przyjął ustawę.");
    }

    #[test]
    fn test_deterministic() {
        let text = "Ala ma kota. Kot ma Alę. Pies szczeka na listonosza. Listonosz ucieka.";
        assert_eq!(chunk(text, 30), chunk(text, 30));
    }

    #[test]
    fn test_rechunking_covers_same_content() {
        let text = "Pierwsze zdanie testu. Drugie zdanie testu. Trzecie zdanie testu. Czwarte zdanie testu.";
        let first = chunk(text, 30);
        let second = chunk(&first.join(" "), 30);

        assert_eq!(
            normalized(&second.join(" ")),
            normalized(text),
            "re-chunking must cover the same text"
        );
    }

    #[test]
    fn test_boundary_found_in_lookahead_window() {
        // The only sentence end sits past the limit but inside the
        // 50-byte lookahead, so the chunker stretches to reach it.
        let text = "To zdanie jest nieco dłuższe niż limit. Ale kolejne zdanie zaczyna się dalej.";
        let chunks = chunk(text, 30);

        assert_eq!(chunks[0], "To zdanie jest nieco dłuższe niż limit.");
    }
}
