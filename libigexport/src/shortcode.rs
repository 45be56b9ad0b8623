//! Shortcode extraction
//!
//! A shortcode is the token in a post's canonical URL
//! (`https://www.instagram.com/p/<shortcode>/`) used as the Hugo embed key.
//! The Graph API does not return it directly, so it is recovered from the
//! permalink with a fixed set of rules, tried in order:
//!
//! 1. `.../p/<shortcode>/...`
//! 2. `.../reel/<shortcode>/...`
//! 3. the last path segment, unless it equals the post id
//! 4. the post id itself
//!
//! # Example
//!
//! ```
//! use libigexport::shortcode::{extract_shortcode, ShortcodeSource};
//!
//! let sc = extract_shortcode("https://www.instagram.com/reel/C4abcDEF/", "1789");
//! assert_eq!(sc.value, "C4abcDEF");
//! assert_eq!(sc.source, ShortcodeSource::Reel);
//!
//! let sc = extract_shortcode("", "1789");
//! assert_eq!(sc.value, "1789");
//! assert_eq!(sc.source, ShortcodeSource::Fallback);
//! ```

/// Which rule produced a shortcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcodeSource {
    /// `/p/<shortcode>` permalink
    Post,
    /// `/reel/<shortcode>` permalink
    Reel,
    /// Last path segment of an unrecognised permalink
    PathTail,
    /// No usable permalink; the post id is used
    Fallback,
}

impl ShortcodeSource {
    /// True when the shortcode came from a recognised permalink shape
    #[must_use]
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Post | Self::Reel)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcode {
    pub value: String,
    pub source: ShortcodeSource,
}

impl std::fmt::Display for Shortcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

type Matcher = fn(&[&str]) -> Option<String>;

/// Structural matchers for known permalink shapes, highest priority first
const MATCHERS: &[(ShortcodeSource, Matcher)] = &[
    (ShortcodeSource::Post, post_segment),
    (ShortcodeSource::Reel, reel_segment),
];

fn post_segment(segments: &[&str]) -> Option<String> {
    segment_after(segments, "p")
}

fn reel_segment(segments: &[&str]) -> Option<String> {
    segment_after(segments, "reel")
}

/// Extract a shortcode from `permalink`, falling back to `fallback_id`
#[must_use]
pub fn extract_shortcode(permalink: &str, fallback_id: &str) -> Shortcode {
    let path = url_path(permalink);
    let segments: Vec<&str> = path.split('/').collect();

    for (source, matcher) in MATCHERS {
        if let Some(value) = matcher(&segments) {
            return Shortcode {
                value,
                source: *source,
            };
        }
    }

    if !permalink.is_empty() {
        if let Some(tail) = path.trim_end_matches('/').rsplit('/').next() {
            if !tail.is_empty() && tail != fallback_id {
                return Shortcode {
                    value: tail.to_string(),
                    source: ShortcodeSource::PathTail,
                };
            }
        }
    }

    Shortcode {
        value: fallback_id.to_string(),
        source: ShortcodeSource::Fallback,
    }
}

/// The segment immediately following a `marker` segment, if non-empty
fn segment_after(segments: &[&str], marker: &str) -> Option<String> {
    segments
        .windows(2)
        .find(|pair| pair[0] == marker && !pair[1].is_empty())
        .map(|pair| pair[1].to_string())
}

/// Path portion of a URL: scheme, host, query and fragment removed
///
/// Strings without a `scheme://` prefix are treated as a bare path.
fn url_path(permalink: &str) -> &str {
    let without_query = permalink
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    match without_query.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, path)| path).unwrap_or(""),
        None => without_query,
    }
}
