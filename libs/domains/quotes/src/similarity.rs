use std::cmp::Ordering;

use crate::models::{Quote, QuoteMatch};

/// Cosine similarity of two vectors, clamped to `[-1, 1]`.
///
/// `None` when the lengths differ, a vector is empty, or either has zero
/// magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    score.is_finite().then(|| score.clamp(-1.0, 1.0) as f32)
}

/// Search ordering: scored rows by descending score, then unscored rows.
/// Ties break on ascending id.
pub fn by_rank(a: &QuoteMatch, b: &QuoteMatch) -> Ordering {
    let by_id = a.quote.id.cmp(&b.quote.id);
    match (a.score, b.score) {
        (Some(x), Some(y)) => y.total_cmp(&x).then(by_id),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => by_id,
    }
}

/// Score every quote against `query` and keep the best `limit`.
pub fn rank<I>(query: &[f32], quotes: I, limit: usize) -> Vec<QuoteMatch>
where
    I: IntoIterator<Item = Quote>,
{
    let mut matches: Vec<QuoteMatch> = quotes
        .into_iter()
        .map(|quote| {
            let score = quote
                .embedding
                .as_deref()
                .and_then(|embedding| cosine_similarity(query, embedding));
            QuoteMatch { quote, score }
        })
        .collect();

    matches.sort_by(by_rank);
    matches.truncate(limit);
    matches
}
