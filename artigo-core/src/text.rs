//! Text cleanup and chunking.
//!
//! PDF extractors produce noisy text: sentinel tokens, hyphenated words
//! split across line breaks, runs of whitespace and stray control bytes.
//! Everything is normalized here before chunking so that chunk boundaries
//! and embeddings are computed over clean text.

use regex::Regex;
use std::sync::LazyLock;

static BROKEN_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)-\s*\n\s*(\w+)").expect("valid regex"));
static NEWLINE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").expect("valid regex"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^\w\s.,;:!?\-()\[\]{}"'@#$%&*+=<>|~`/\\áàâãéêíóôõúçÁÀÂÃÉÊÍÓÔÕÚÇ]"#)
        .expect("valid regex")
});
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,;:!?])").expect("valid regex"));

/// Normalizes raw extracted text.
///
/// Order matters: hyphen repair must see the original line breaks, and the
/// character allow-list runs after whitespace collapsing so that stripped
/// characters do not leave double spaces behind.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = text.replace("<EOS>", "").replace("<pad>", "").replace('\0', "");
    let text = BROKEN_HYPHEN.replace_all(&text, "$1$2");
    let text = NEWLINE_RUNS.replace_all(&text, " ");
    let text = WHITESPACE_RUNS.replace_all(&text, " ");
    let text = DISALLOWED.replace_all(&text, "");
    let text = text.trim();
    SPACE_BEFORE_PUNCT.replace_all(text, "$1").into_owned()
}

/// Lighter variant used when rendering stored chunks back to the caller:
/// sentinel removal and whitespace collapsing only.
pub fn clean_snippet(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = text.replace("<EOS>", "").replace("<pad>", "");
    WHITESPACE_RUNS.replace_all(&text, " ").trim().to_string()
}

/// Truncates to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Splits text into overlapping chunks, preferring natural boundaries.
///
/// Break points are searched within each window in priority order: paragraph
/// break, line break, sentence end, word boundary, and finally an arbitrary
/// cut. A boundary is only taken from the second half of the window so
/// chunks never degenerate to a few characters. Deterministic for identical
/// input and parameters.
///
/// # UTF-8 Safety
///
/// All cut positions are adjusted to the nearest valid character boundary.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() || chunk_size == 0 {
        return vec![];
    }

    if text.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let overlap = overlap.min(chunk_size.saturating_sub(1));
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + chunk_size).min(text.len());
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }

        let cut = if end == text.len() {
            end
        } else {
            find_break(text, start, end)
        };

        let chunk = text[start..cut].trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        if cut == text.len() {
            break;
        }

        let mut next = cut.saturating_sub(overlap);
        while next < text.len() && !text.is_char_boundary(next) {
            next += 1;
        }
        // Always make forward progress, even with pathological overlap.
        if next <= start {
            next = cut;
        }
        start = next;
    }

    chunks
}

/// Finds the best cut position in `text[start..end]`.
///
/// Returns an absolute byte offset just past the chosen boundary, or `end`
/// when no acceptable boundary exists in the second half of the window.
fn find_break(text: &str, start: usize, end: usize) -> usize {
    let window = &text[start..end];
    let min_pos = window.len() / 2;

    for separator in ["\n\n", "\n"] {
        if let Some(pos) = window.rfind(separator) {
            if pos >= min_pos {
                return start + pos + separator.len();
            }
        }
    }

    if let Some(pos) = window.rfind(['.', '!', '?']) {
        if pos >= min_pos {
            return start + pos + 1;
        }
    }

    if let Some(pos) = window.rfind(' ') {
        if pos >= min_pos {
            return start + pos + 1;
        }
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_sentinels_and_nulls() {
        let dirty = "abc<EOS>def<pad>ghi\0jkl";
        assert_eq!(clean_text(dirty), "abcdefghijkl");
    }

    #[test]
    fn test_clean_rejoins_hyphenated_words() {
        let dirty = "um texto que-\nbrado em duas linhas";
        assert_eq!(clean_text(dirty), "um texto quebrado em duas linhas");
    }

    #[test]
    fn test_clean_collapses_whitespace_and_newlines() {
        let dirty = "linha um\n\n\nlinha   dois\tlinha tres";
        assert_eq!(clean_text(dirty), "linha um linha dois linha tres");
    }

    #[test]
    fn test_clean_keeps_accents_drops_junk() {
        let dirty = "ação química\u{2022} ótima";
        assert_eq!(clean_text(dirty), "ação química ótima");
    }

    #[test]
    fn test_clean_strips_space_before_punctuation() {
        assert_eq!(clean_text("fim do teste ."), "fim do teste.");
    }

    #[test]
    fn test_chunk_small_text_is_single_chunk() {
        let chunks = chunk_text("short", 100, 10);
        assert_eq!(chunks, vec!["short".to_string()]);
    }

    #[test]
    fn test_chunk_prefers_sentence_boundaries() {
        let text = "Primeira frase completa. Segunda frase completa. Terceira frase completa.";
        let chunks = chunk_text(text, 40, 5);
        assert!(chunks.len() > 1);
        // First chunk should end at a sentence, not mid-word.
        assert!(chunks[0].ends_with('.'), "got: {:?}", chunks[0]);
    }

    #[test]
    fn test_chunk_overlap_repeats_tail() {
        let text = "aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii jjjj";
        let chunks = chunk_text(text, 20, 8);
        assert!(chunks.len() >= 2);
        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().rev().take(4).collect();
            let tail: String = tail.chars().rev().collect();
            assert!(
                pair[1].contains(tail.trim()),
                "expected overlap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_chunk_is_deterministic() {
        let text = "Texto repetido para verificar determinismo. ".repeat(50);
        assert_eq!(chunk_text(&text, 200, 40), chunk_text(&text, 200, 40));
    }

    #[test]
    fn test_chunk_respects_utf8_boundaries() {
        let text = "ção".repeat(300);
        let chunks = chunk_text(&text, 100, 20);
        assert!(!chunks.is_empty());
        // Would panic on a bad boundary; also verify nothing was lost entirely.
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("áéíóú", 3), "áéí");
        assert_eq!(truncate_chars("ab", 10), "ab");
    }
}
