use crate::Lexicon;

/// Decide whether a token counts as English.
///
/// This is the ASCII-word heuristic, not language identification: a token
/// made only of `[A-Za-z]` is an English candidate, and with a lexicon it must
/// also be a (lowercased) member. ASCII-only Turkish words and names are false
/// positives without a lexicon; English words missing from the lexicon are
/// false negatives with one.
pub fn is_english_token(token: &str, lexicon: Option<&Lexicon>) -> bool {
    if token.is_empty() {
        return false;
    }
    if !token.bytes().all(|b| b.is_ascii_alphabetic()) {
        return false;
    }
    match lexicon {
        Some(lex) => lex.contains(&token.to_ascii_lowercase()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_words_are_english_without_lexicon() {
        assert!(is_english_token("very", None));
        assert!(is_english_token("GOOD", None));
        // heuristic false positive: plain-ASCII Turkish
        assert!(is_english_token("bir", None));
    }

    #[test]
    fn empty_digits_and_accents_are_never_english() {
        let lex: Lexicon = ["cafe", "abc1", "gun"].into_iter().collect();
        for tok in ["", "abc1", "2024", "café", "gün", "ışık", "don't", "hi-fi"] {
            assert!(!is_english_token(tok, None), "{tok}");
            assert!(!is_english_token(tok, Some(&lex)), "{tok}");
        }
    }

    #[test]
    fn lexicon_narrows_and_is_case_insensitive() {
        let lex: Lexicon = ["very", "good"].into_iter().collect();
        assert!(is_english_token("Very", Some(&lex)));
        assert!(is_english_token("GOOD", Some(&lex)));
        assert!(!is_english_token("bir", Some(&lex)));
        assert!(!is_english_token("oldu", Some(&lex)));
    }

    #[test]
    fn empty_lexicon_rejects_everything() {
        let lex = Lexicon::new();
        assert!(!is_english_token("hello", Some(&lex)));
    }
}
