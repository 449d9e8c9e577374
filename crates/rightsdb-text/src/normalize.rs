use unicode_normalization::UnicodeNormalization;

/// Fold `text` into the form every comparison in the engine works on:
/// lowercase, no diacritics, no punctuation, single spaces, no edge spaces.
///
/// `normalize(normalize(x)) == normalize(x)` for every input.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let folded: String = lowered
        .trim()
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect();

    let mut out = String::with_capacity(folded.len());
    for word in folded.split_whitespace() {
        if !out.is_empty() { out.push(' '); }
        out.push_str(word);
    }
    out
}

// Combining Diacritical Marks block.
fn is_combining_diacritic(c: char) -> bool { ('\u{0300}'..='\u{036F}').contains(&c) }

fn is_word_char(c: char) -> bool { c.is_alphanumeric() || c == '_' }
