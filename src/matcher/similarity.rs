//! Token-order-insensitive string similarity.

/// A 0-100 similarity score between two strings.
///
/// The matcher only depends on this trait so the metric can be swapped out.
pub trait Similarity: Send + Sync {
    fn score(&self, a: &str, b: &str) -> u8;
}

/// Token-sort ratio.
///
/// Both inputs are lower-cased, every non-alphanumeric character becomes a
/// space, the whitespace-separated tokens are sorted and re-joined, and the
/// normalized Levenshtein similarity of the results is scaled to 0-100.
/// Either side being empty after processing scores 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortRatio;

impl Similarity for TokenSortRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        let a = sorted_tokens(a);
        let b = sorted_tokens(b);
        if a.is_empty() || b.is_empty() {
            return 0;
        }
        (strsim::normalized_levenshtein(&a, &b) * 100.0).round() as u8
    }
}

fn sorted_tokens(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
