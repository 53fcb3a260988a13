//! Fixed-width numeric form of a version string

use std::fmt;

/// Number of components every version is normalized to
pub const COMPONENTS: usize = 5;

/// `(major, minor, build, patch, extra)` extracted from a version string.
///
/// Ordering is lexicographic over the components, which is what
/// [`crate::version::comparator::compare`] relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VersionToken([u64; COMPONENTS]);

impl VersionToken {
    /// Normalize an arbitrary string into a version token.
    ///
    /// Every character other than digits, `.` and `-` is dropped, the rest is
    /// split on `.` or `-`, and each part becomes one component. Empty parts
    /// count as zero and parts too large for `u64` saturate at `u64::MAX`.
    /// The result is padded with zeros or truncated to exactly five
    /// components.
    ///
    /// Examples:
    /// - "136.0.7103.92" -> (136, 0, 7103, 92, 0)
    /// - "131.0.6778.85-1.1" -> (131, 0, 6778, 85, 1)
    /// - "v1..2" -> (1, 0, 2, 0, 0)
    /// - "" -> (0, 0, 0, 0, 0)
    pub fn normalize(raw: &str) -> Self {
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();

        let mut components = [0u64; COMPONENTS];
        for (slot, part) in components.iter_mut().zip(cleaned.split(['.', '-'])) {
            // Only digits remain, so a parse error on a non-empty part is overflow
            *slot = if part.is_empty() {
                0
            } else {
                part.parse().unwrap_or(u64::MAX)
            };
        }

        Self(components)
    }

    pub fn components(&self) -> [u64; COMPONENTS] {
        self.0
    }

}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e] = self.0;
        write!(f, "{}.{}.{}.{}.{}", a, b, c, d, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("136.0.7103.92", [136, 0, 7103, 92, 0])]
    #[case("131.0.6778.85-1", [131, 0, 6778, 85, 1])]
    #[case("131.0.6778.85-1.1", [131, 0, 6778, 85, 1])] // truncated to five
    #[case("1.2", [1, 2, 0, 0, 0])] // padded
    #[case("v120.0.6099.109", [120, 0, 6099, 109, 0])] // prefix stripped
    #[case("Version 99 . 1", [99, 1, 0, 0, 0])] // spaces stripped
    #[case("1..2", [1, 0, 2, 0, 0])] // empty part is zero
    #[case("-5", [0, 5, 0, 0, 0])] // leading separator gives an empty first part
    #[case("", [0, 0, 0, 0, 0])]
    #[case("garbage", [0, 0, 0, 0, 0])]
    #[case("...", [0, 0, 0, 0, 0])]
    fn normalize_returns_five_components(#[case] raw: &str, #[case] expected: [u64; 5]) {
        assert_eq!(VersionToken::normalize(raw).components(), expected);
    }

    #[test]
    fn normalize_saturates_overflowing_part() {
        let token = VersionToken::normalize("99999999999999999999999.1");
        assert_eq!(token.components(), [u64::MAX, 1, 0, 0, 0]);
    }

    #[test]
    fn overflowing_part_ranks_above_any_regular_value() {
        let huge = VersionToken::normalize("136.0.99999999999999999999.1");
        let regular = VersionToken::normalize("136.0.7103.92");
        assert!(huge > regular);
    }

    #[test]
    fn normalize_handles_non_ascii_input_without_panicking() {
        let token = VersionToken::normalize("версия 136.0 ✓ ١٢٣");
        assert_eq!(token.components(), [136, 0, 0, 0, 0]);
    }

    #[test]
    fn display_shows_all_components() {
        assert_eq!(
            VersionToken::normalize("136.0.7103.92").to_string(),
            "136.0.7103.92.0"
        );
    }
}
