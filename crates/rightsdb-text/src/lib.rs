//! rightsdb-text
//!
//! Spanish text folding shared by every scorer: `normalize` folds case,
//! accents and punctuation; `tokenize` turns the result into a token set;
//! `Stopwords` drops function words that carry no signal.

pub mod normalize;
pub mod stopwords;
pub mod tokenize;

pub use normalize::normalize;
pub use stopwords::{spanish_stopwords, Stopwords, SPANISH_STOPWORDS};
pub use tokenize::{tokenize, tokens_without_stopwords};
