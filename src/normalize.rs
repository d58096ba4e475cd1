//! Title and artist normalization.
//!
//! Catalog records and local tags disagree on capitalization, featured-artist
//! annotations, mix suffixes and stray punctuation. The functions here reduce
//! both sides to canonical forms that can be compared with `==`.
//!
//! Every function is pure and total: any input string produces an output and
//! nothing is logged or cached.
//!
//! Note that [`canonical_title`] is not idempotent. The trailing "mix" suffix is
//! stripped once, so `"remixmix"` and `"remix"` canonicalize differently.

use regex::Regex;
use std::sync::LazyLock;

/// "feat" clause up to the next opening parenthesis/bracket or end of string.
static RE_FEAT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(*feat[^(\[]*").unwrap());

/// Qualifier phrases that carry no identity information.
static RE_QUALIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[(\[](?:original (?:re)?mix|intro|clean)[)\]]").unwrap()
});

static RE_MIX_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(?:re)*mix$").unwrap());

static RE_MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Characters removed by [`strip_punctuation`]. The space is filler here, not a
/// word separator.
const PUNCTUATION: &[char] = &['.', ',', '(', ')', '[', ']', ' ', '&', '_', '"', '\''];

/// Lower-case and drop "feat." clauses and noise qualifiers like "(Original Mix)".
pub fn strip_decoration(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_feat = RE_FEAT.replace_all(&lowered, "");
    let without_qualifiers = RE_QUALIFIER.replace_all(&without_feat, "");
    RE_MULTI_SPACE
        .replace_all(&without_qualifiers, " ")
        .trim()
        .to_string()
}

/// Remove `. , ( ) [ ] & _ " '` and spaces.
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Canonical form of a track title.
///
/// The "the " removal is a plain substring replace, so it also fires inside
/// words ("breathe now" loses its "the ").
pub fn canonical_title(title: &str) -> String {
    let decorated = strip_decoration(title).replace("the ", "");
    let compact = strip_punctuation(&decorated);
    RE_MIX_SUFFIX.replace(&compact, "").trim().to_string()
}

pub fn canonical_artist(name: &str) -> String {
    strip_punctuation(&name.to_lowercase())
}

/// Order-insensitive fingerprint of an artist list.
pub fn canonical_artist_set<S: AsRef<str>>(names: &[S]) -> String {
    let mut canonical: Vec<String> = names.iter().map(|n| canonical_artist(n.as_ref())).collect();
    canonical.sort();
    canonical.concat()
}
