// src/classifier/content.rs
//! Layer 3: bots fill free-text fields with short random tokens ("toc2kc", "hfp9ky").

/// True when every field, trimmed, is shorter than `min_length` characters.
/// One meaningful field clears the whole set; an empty set counts as gibberish.
pub fn is_gibberish<S: AsRef<str>>(fields: &[S], min_length: usize) -> bool {
    !fields
        .iter()
        .any(|f| f.as_ref().trim().chars().count() >= min_length)
}
