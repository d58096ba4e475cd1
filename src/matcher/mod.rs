//! Best-candidate selection for a local track.
//!
//! Given the title and artists read from a file and the candidates returned by
//! a catalog search, pick at most one catalog track:
//!
//! 1. **Exact**: canonical titles are equal and either one local artist appears
//!    among the candidate's artists, or the whole artist sets are equal. The
//!    first exact hit in provider order is returned immediately.
//! 2. **Fuzzy**: otherwise the decorated-stripped titles are compared with a
//!    token-sort similarity. Candidates at or above the threshold whose artists
//!    also agree (fuzzy on the joined raw lists, or one exact canonical artist)
//!    are collected, and the highest score wins. Ties go to the candidate the
//!    provider ranked first.
//!
//! Candidates whose canonical title matches but whose artists don't are skipped
//! entirely; they are not considered for the fuzzy pass.

mod similarity;

pub use similarity::{Similarity, TokenSortRatio};

use crate::catalog::CatalogTrack;
use crate::normalize::{canonical_artist, canonical_artist_set, canonical_title, strip_decoration};

/// A fuzzy candidate and its title similarity, alive only during ranking.
#[derive(Debug, Clone, Copy)]
pub struct MatchCandidate<'a> {
    pub score: u8,
    pub track: &'a CatalogTrack,
}

/// Ranks catalog candidates against local tag values.
pub struct Matcher {
    similarity: Box<dyn Similarity>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(TokenSortRatio)
    }
}

impl Matcher {
    pub fn new(similarity: impl Similarity + 'static) -> Self {
        Self {
            similarity: Box::new(similarity),
        }
    }

    /// Select the best candidate, or `None` if nothing is close enough.
    ///
    /// `fuzziness` is the minimum similarity (0-100) for both the title and the
    /// artist comparison on the fuzzy path. Candidates are visited in the order
    /// given, which must be the provider's relevance order.
    pub fn match_track<'a, S: AsRef<str>>(
        &self,
        local_title: &str,
        local_artists: &[S],
        candidates: &'a [CatalogTrack],
        fuzziness: u8,
    ) -> Option<&'a CatalogTrack> {
        let clean_title = canonical_title(local_title);
        let clean_artists = canonical_artist_set(local_artists);
        let local_canonical: Vec<String> = local_artists
            .iter()
            .map(|a| canonical_artist(a.as_ref()))
            .collect();
        let decorated_title = strip_decoration(local_title);
        let raw_artists = local_artists
            .iter()
            .map(|a| a.as_ref())
            .collect::<Vec<&str>>()
            .join(", ");

        let mut fuzzy: Vec<MatchCandidate<'a>> = Vec::new();

        for track in candidates {
            let track_artists: Vec<String> = track
                .artists
                .iter()
                .map(|a| canonical_artist(&a.name))
                .collect();
            let shares_artist = local_canonical.iter().any(|a| track_artists.contains(a));

            if canonical_title(&track.title) == clean_title {
                if shares_artist {
                    tracing::debug!(id = track.id, title = %track.title, "Exact match on title and artist");
                    return Some(track);
                }
                if canonical_artist_set(&track_artists[..]) == clean_artists {
                    tracing::debug!(id = track.id, title = %track.title, "Exact match on title and artist set");
                    return Some(track);
                }
                continue;
            }

            let score = self
                .similarity
                .score(&strip_decoration(&track.title), &decorated_title);
            if score < fuzziness {
                continue;
            }

            let artist_score = self
                .similarity
                .score(&raw_artists, &track.joined_artists(", "));
            if artist_score >= fuzziness || shares_artist {
                tracing::debug!(id = track.id, title = %track.title, score, artist_score, "Fuzzy candidate");
                fuzzy.push(MatchCandidate { score, track });
            }
        }

        // max_by_key returns the last maximum; iterate reversed so ties keep the
        // earliest candidate.
        fuzzy
            .into_iter()
            .rev()
            .max_by_key(|c| c.score)
            .map(|c| c.track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::catalog_track;

    /// Similarity that must never be consulted.
    struct PanicSimilarity;

    impl Similarity for PanicSimilarity {
        fn score(&self, _a: &str, _b: &str) -> u8 {
            panic!("fuzzy scoring should not run");
        }
    }

    /// Similarity that always returns the same score.
    struct FixedSimilarity(u8);

    impl Similarity for FixedSimilarity {
        fn score(&self, _a: &str, _b: &str) -> u8 {
            self.0
        }
    }

    #[test]
    fn test_empty_candidates() {
        let matcher = Matcher::default();
        assert!(matcher.match_track("Test Track", &["DJ One"], &[], 80).is_none());
    }

    #[test]
    fn test_exact_match_short_circuits() {
        let mut exact = catalog_track("Test Track", &["DJ One"]);
        exact.id = 1;
        let mut later = catalog_track("Test Track (Original Mix)", &["Someone Else"]);
        later.id = 2;
        let candidates = vec![exact, later];

        let matcher = Matcher::new(PanicSimilarity);
        let found = matcher
            .match_track("Test Track", &["DJ One", "DJ Two"], &candidates, 80)
            .unwrap();
        assert_eq!(found.id, 1);
    }

    #[test]
    fn test_exact_match_ignores_decoration_and_case() {
        let candidates = vec![catalog_track("TEST TRACK (Original Mix)", &["dj one"])];
        let matcher = Matcher::new(PanicSimilarity);
        assert!(
            matcher
                .match_track("Test Track feat. MC Three", &["DJ One"], &candidates, 80)
                .is_some()
        );
    }

    #[test]
    fn test_exact_match_on_full_artist_set() {
        // No single artist matches canonically, but the concatenated sets do
        let candidates = vec![catalog_track("Test Track", &["DJ", "One"])];
        let matcher = Matcher::new(PanicSimilarity);
        let found = matcher.match_track("Test Track", &["DJOne"], &candidates, 80);
        assert!(found.is_some());
    }

    #[test]
    fn test_exact_title_without_artist_is_skipped() {
        let candidates = vec![catalog_track("Test Track", &["Someone Else"])];
        let matcher = Matcher::new(FixedSimilarity(100));
        assert!(matcher.match_track("Test Track", &["DJ One"], &candidates, 80).is_none());
    }

    #[test]
    fn test_fuzzy_fallback_respects_threshold() {
        let candidates = vec![catalog_track("Tset Track", &["DJ One"])];
        let matcher = Matcher::default();

        // "track tset" vs "test track" scores 20
        let found = matcher.match_track("Test Track (Original Mix)", &["DJ One"], &candidates, 20);
        assert_eq!(found.map(|t| t.title.as_str()), Some("Tset Track"));

        let found = matcher.match_track("Test Track (Original Mix)", &["DJ One"], &candidates, 80);
        assert!(found.is_none());
    }

    #[test]
    fn test_fuzzy_requires_artist_agreement() {
        let candidates = vec![catalog_track("Test Trak", &["Someone Else"])];
        let matcher = Matcher::default();
        assert!(matcher.match_track("Test Track", &["DJ One"], &candidates, 80).is_none());
    }

    #[test]
    fn test_fuzzy_artist_similarity_counts() {
        // "DJ On" vs "DJ One" scores 83 and no canonical artist is shared
        let candidates = vec![catalog_track("Test Trak", &["DJ On"])];
        let matcher = Matcher::default();
        assert!(matcher.match_track("Test Track", &["DJ One"], &candidates, 80).is_some());
    }

    #[test]
    fn test_best_of_multiple_fuzzy() {
        let mut weaker = catalog_track("Summer Bree", &["DJ One"]);
        weaker.id = 85;
        let mut stronger = catalog_track("Summer Breez", &["DJ One"]);
        stronger.id = 92;
        let candidates = vec![weaker, stronger];

        let matcher = Matcher::default();
        let found = matcher
            .match_track("Summer Breeze (Original Mix)", &["DJ One"], &candidates, 80)
            .unwrap();
        assert_eq!(found.id, 92);
    }

    #[test]
    fn test_fuzzy_tie_keeps_earliest() {
        let mut first = catalog_track("Summer Bree", &["DJ One"]);
        first.id = 1;
        let mut second = catalog_track("Sumer Breez", &["DJ One"]);
        second.id = 2;
        let candidates = vec![first, second];

        let matcher = Matcher::default();
        let found = matcher
            .match_track("Summer Breeze", &["DJ One"], &candidates, 80)
            .unwrap();
        assert_eq!(found.id, 1);
    }

    #[test]
    fn test_exact_beats_earlier_fuzzy() {
        let mut fuzzy = catalog_track("Test Trak", &["DJ One"]);
        fuzzy.id = 1;
        let mut exact = catalog_track("Test Track", &["DJ One"]);
        exact.id = 2;
        let candidates = vec![fuzzy, exact];

        let matcher = Matcher::default();
        let found = matcher
            .match_track("Test Track", &["DJ One"], &candidates, 80)
            .unwrap();
        assert_eq!(found.id, 2);
    }

    #[test]
    fn test_custom_similarity_is_used() {
        let candidates = vec![catalog_track("Completely Different", &["DJ One"])];
        let matcher = Matcher::new(FixedSimilarity(95));
        assert!(matcher.match_track("Test Track", &["DJ One"], &candidates, 90).is_some());
        assert!(matcher.match_track("Test Track", &["DJ One"], &candidates, 96).is_none());
    }
}
