//! Token-set similarity on a 0-100 scale

use std::collections::BTreeSet;

/// Normalized Levenshtein similarity, rounded to a whole percentage.
pub fn ratio(a: &str, b: &str) -> u8 {
    (strsim::normalized_levenshtein(a, b) * 100.0).round() as u8
}

/// Order- and repetition-insensitive similarity of two phrases.
///
/// Both phrases are split into uppercase word sets. The shared words, and the shared words
/// followed by each side's remainder, are compared pairwise; the best score wins. One phrase
/// containing all words of the other therefore scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let tokens_a = tokens(a);
    let tokens_b = tokens(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let shared = join(tokens_a.intersection(&tokens_b));
    let only_a = join(tokens_a.difference(&tokens_b));
    let only_b = join(tokens_b.difference(&tokens_a));
    let with_a = format!("{shared} {only_a}").trim().to_owned();
    let with_b = format!("{shared} {only_b}").trim().to_owned();

    ratio(&shared, &with_a)
        .max(ratio(&shared, &with_b))
        .max(ratio(&with_a, &with_b))
}

fn tokens(text: &str) -> BTreeSet<String> {
    text.split_whitespace().map(str::to_uppercase).collect()
}

fn join<'a>(words: impl Iterator<Item = &'a String>) -> String {
    words.map(String::as_str).collect::<Vec<_>>().join(" ")
}
