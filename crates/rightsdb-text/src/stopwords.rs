use std::collections::HashSet;
use std::sync::LazyLock;

/// Spanish function words excluded from token-overlap scoring.
///
/// Entries are already in normalized form (no accents). Domain nouns such as
/// `policia`, `derecho` or `celular` must never appear here.
pub const SPANISH_STOPWORDS: &[&str] = &[
    "me", "mi", "yo", "el", "la", "los", "las", "un", "una", "unos", "unas",
    "de", "del", "en", "a", "al", "por", "para", "con", "sin", "que", "es",
    "y", "o", "no", "si", "se", "lo", "le", "les", "su", "sus", "como",
    "pero", "mas", "muy", "ya", "esta", "esto", "ese", "esa", "esos", "esas",
    "hay", "han", "ha", "he", "ser", "son", "fue", "van", "ir", "te", "tu",
    "nos", "cuando", "donde", "quien", "cual", "cuanto",
];

static SPANISH: LazyLock<Stopwords> = LazyLock::new(|| Stopwords::new(SPANISH_STOPWORDS.iter().copied()));

/// The built-in Spanish set, built on first use and shared afterwards.
pub fn spanish_stopwords() -> &'static Stopwords { &SPANISH }

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Default for Stopwords {
    fn default() -> Self { Self::spanish() }
}

impl Stopwords {
    pub fn spanish() -> Self { spanish_stopwords().clone() }

    /// Build a set from arbitrary words; each one is normalized first so that
    /// configured lists may carry accents or capitals.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| crate::normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn contains(&self, token: &str) -> bool { self.words.contains(token) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }

    /// Tokenize `text` and drop every stopword.
    pub fn filter(&self, text: &str) -> HashSet<String> {
        crate::tokenize(text).into_iter().filter(|t| !self.contains(t)).collect()
    }
}
