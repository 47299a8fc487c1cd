use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Runs of ASCII letters, Latin-1 letters (À–Ö, Ø–ö, ø–ÿ) and the Turkish
/// letters outside Latin-1. Anything else separates.
static RATIO_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-zÀ-ÖØ-öø-ÿĞğÜüŞşİıÇç]+").expect("ratio word pattern")
});

/// Runs of ASCII letters and apostrophes, so suffixed forms like
/// `like'ladım` keep their English head attached.
static ROOT_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z']+").expect("root word pattern"));

/// Which set of characters counts as "word" for a tokenizer.
///
/// The two sets serve different measurements and are never merged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    /// Latin letters plus Turkish diacritics; digits and apostrophes separate.
    Ratio,
    /// ASCII letters plus apostrophe; edges trimmed, single letters dropped.
    Root,
}

/// Splits text on every character outside its [`CharClass`].
///
/// Total on any input: control characters, emoji and other scripts simply
/// act as separators, and the output never contains empty strings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tokenizer {
    class: CharClass,
}

impl Tokenizer {
    pub const fn new(class: CharClass) -> Self {
        Self { class }
    }

    /// Tokenizer used for the code-mixing ratio.
    pub const fn ratio() -> Self {
        Self::new(CharClass::Ratio)
    }

    /// Tokenizer used for English root extraction.
    pub const fn root() -> Self {
        Self::new(CharClass::Root)
    }

    pub fn class(&self) -> CharClass {
        self.class
    }

    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match self.class {
            CharClass::Ratio => RATIO_WORD.find_iter(text).map(|m| m.as_str()).collect(),
            CharClass::Root => ROOT_WORD
                .find_iter(text)
                .map(|m| m.as_str().trim_matches('\''))
                .filter(|t| t.chars().count() > 1)
                .collect(),
        }
    }

    /// Whether `c` belongs to this tokenizer's word set.
    pub fn is_word_char(&self, c: char) -> bool {
        match self.class {
            CharClass::Ratio => matches!(c,
                'A'..='Z' | 'a'..='z'
                | 'À'..='Ö' | 'Ø'..='ö' | 'ø'..='ÿ'
                | 'Ğ' | 'ğ' | 'Ü' | 'ü' | 'Ş' | 'ş' | 'İ' | 'ı' | 'Ç' | 'ç'),
            CharClass::Root => c.is_ascii_alphabetic() || c == '\'',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_keeps_turkish_letters_and_drops_punctuation() {
        let toks = Tokenizer::ratio().tokenize("Bugün very good bir gün oldu.");
        assert_eq!(toks, vec!["Bugün", "very", "good", "bir", "gün", "oldu"]);
    }

    #[test]
    fn ratio_splits_on_digits_and_apostrophes() {
        let toks = Tokenizer::ratio().tokenize("like'ladım 2x save2day");
        assert_eq!(toks, vec!["like", "ladım", "x", "save", "day"]);
    }

    #[test]
    fn ratio_accepts_dotted_and_dotless_i() {
        let toks = Tokenizer::ratio().tokenize("İSTANBUL ışık Çiçek Şeker Ağaç");
        assert_eq!(toks, vec!["İSTANBUL", "ışık", "Çiçek", "Şeker", "Ağaç"]);
    }

    #[test]
    fn other_scripts_and_emoji_are_separators() {
        let toks = Tokenizer::ratio().tokenize("hello🙂привет\u{0007}world مرحبا ok");
        assert_eq!(toks, vec!["hello", "world", "ok"]);
        // × and ÷ sit inside the Latin-1 block but are not letters
        assert_eq!(Tokenizer::ratio().tokenize("a×b÷c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_and_blank_inputs_yield_nothing() {
        for tk in [Tokenizer::ratio(), Tokenizer::root()] {
            assert!(tk.tokenize("").is_empty());
            assert!(tk.tokenize("   \t\n").is_empty());
            assert!(tk.tokenize("123 ... !!!").is_empty());
        }
    }

    #[test]
    fn no_empty_tokens_and_retokenizing_is_stable() {
        let tk = Tokenizer::ratio();
        let text = "  Çok iyi!! 100% agree,,, süper'di :) ";
        let toks = tk.tokenize(text);
        assert!(toks.iter().all(|t| !t.is_empty()));
        for t in &toks {
            assert!(t.chars().all(|c| tk.is_word_char(c)));
            assert_eq!(tk.tokenize(t), vec![*t]);
        }
    }

    #[test]
    fn root_trims_edge_apostrophes_and_short_fragments() {
        let toks = Tokenizer::root().tokenize("Bugün like'ladım ve save'ledim.");
        assert_eq!(toks, vec!["Bug", "like'lad", "ve", "save'ledim"]);

        let toks = Tokenizer::root().tokenize("'quoted' a 'b' '' it's");
        assert_eq!(toks, vec!["quoted", "it's"]);
    }

    #[test]
    fn the_two_classes_disagree_on_apostrophes_and_diacritics() {
        let ratio = Tokenizer::ratio();
        let root = Tokenizer::root();
        assert!(!ratio.is_word_char('\''));
        assert!(root.is_word_char('\''));
        assert!(ratio.is_word_char('ş'));
        assert!(!root.is_word_char('ş'));
        assert!(!ratio.is_word_char('7'));
        assert!(!root.is_word_char('7'));
    }
}
