/// A word-to-stem transform injected into the root extractor.
///
/// Implementations are shared read-only across a batch, hence `Send + Sync`.
pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;

    /// `false` means the extractor should skip this stemmer and only
    /// lowercase. Lets a placeholder stand in when no algorithm was compiled in.
    fn is_available(&self) -> bool {
        true
    }
}

/// Placeholder stemmer that is never available.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unstemmed;

impl Stemmer for Unstemmed {
    fn stem(&self, word: &str) -> String {
        word.to_owned()
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// English Snowball (Porter2) stemmer backed by `rust-stemmers`.
#[cfg(feature = "stemming")]
pub struct SnowballStemmer {
    inner: rust_stemmers::Stemmer,
}

#[cfg(feature = "stemming")]
impl SnowballStemmer {
    pub fn english() -> Self {
        Self { inner: rust_stemmers::Stemmer::create(rust_stemmers::Algorithm::English) }
    }
}

#[cfg(feature = "stemming")]
impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(feature = "stemming")]
impl std::fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowballStemmer").field("algorithm", &"english").finish()
    }
}

#[cfg(feature = "stemming")]
impl Stemmer for SnowballStemmer {
    fn stem(&self, word: &str) -> String {
        self.inner.stem(word).into_owned()
    }
}
