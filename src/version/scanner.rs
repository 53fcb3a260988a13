//! Release index scanner
//!
//! Pulls every version-looking token out of a release index page and picks
//! the newest one.
//!
//! Token format: 2-4 digit major followed by three dot-separated groups and
//! an optional `-N` or `-N.N` revision suffix, e.g. `136.0.7103.92-1.1`.

use indexmap::IndexSet;
use regex::Regex;
use tracing::debug;

use crate::version::comparator::compare;

/// Lowest major version considered a plausible modern Chromium release
pub const MIN_MODERN_MAJOR: u64 = 100;

/// Scanner for version tokens on a release index page
pub struct ReleasePageScanner {
    /// Regex for a version token: `136.0.7103.92` or `136.0.7103.92-1.1`
    version_re: Regex,
}

impl ReleasePageScanner {
    pub fn new() -> Self {
        Self {
            version_re: Regex::new(
                r"\b[0-9]{2,4}\.[0-9]+\.[0-9]+\.[0-9]+(?:-[0-9]+(?:\.[0-9]+)?)?\b",
            )
            .expect("version token pattern is valid"),
        }
    }

    /// Extract unique version tokens from page text, in order of first appearance
    pub fn extract_candidates(&self, page_text: &str) -> IndexSet<String> {
        let candidates: IndexSet<String> = self
            .version_re
            .find_iter(page_text)
            .map(|m| m.as_str().to_string())
            .collect();

        debug!("Found {} unique version tokens", candidates.len());
        candidates
    }

    /// Pick the newest candidate.
    ///
    /// Candidates with a modern major version are preferred. When none of them
    /// qualifies, the newest of all candidates is returned instead. Returns
    /// `None` only when there are no candidates.
    pub fn select_latest(&self, candidates: &IndexSet<String>) -> Option<String> {
        let modern: Vec<&String> = candidates.iter().filter(|v| is_modern(v)).collect();
        debug!("Modern version tokens: {:?}", modern);

        if modern.is_empty() && !candidates.is_empty() {
            debug!("No modern version tokens, ranking all candidates");
            return newest(candidates.iter());
        }

        newest(modern.into_iter())
    }

    /// Extract and select in one step
    pub fn scan(&self, page_text: &str) -> Option<String> {
        self.select_latest(&self.extract_candidates(page_text))
    }
}

impl Default for ReleasePageScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the leading numeric group of a token is at least [`MIN_MODERN_MAJOR`]
pub fn is_modern(version: &str) -> bool {
    version
        .split('.')
        .next()
        .and_then(|major| major.parse::<u64>().ok())
        .is_some_and(|major| major >= MIN_MODERN_MAJOR)
}

// Equal tokens (e.g. "1.0.0.0" and "1.0.0.0-0") are broken by string order
// so the pick does not depend on page order.
fn newest<'a>(versions: impl Iterator<Item = &'a String>) -> Option<String> {
    versions
        .max_by(|a, b| compare(a, b).then_with(|| a.cmp(b)))
        .cloned()
}
