//! The one ordering used for ranking candidates and deciding on updates

use std::cmp::Ordering;

use crate::version::token::VersionToken;

/// Compare two version strings by their normalized tokens.
///
/// `Less` means `a` is older than `b`. Strings that normalize to the same
/// token compare `Equal`, including two strings with no digits at all.
pub fn compare(a: &str, b: &str) -> Ordering {
    VersionToken::normalize(a).cmp(&VersionToken::normalize(b))
}

/// Whether `latest` is newer than `current`
pub fn is_update_available(current: &str, latest: &str) -> bool {
    compare(current, latest) == Ordering::Less
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("130.0.0.0", "136.0.7103.92", Ordering::Less)]
    #[case("140.0.0.0", "136.0.7103.92", Ordering::Greater)]
    #[case("136.0.7103.92", "136.0.7103.92", Ordering::Equal)]
    #[case("136.0.7103.92", "136.0.7103.92-1", Ordering::Less)]
    #[case("136.0.7103.92-1", "136.0.7103.92-1.1", Ordering::Equal)] // sixth part dropped
    #[case("136.0.7103.113", "136.0.7103.92", Ordering::Greater)] // numeric, not textual
    #[case("1.2", "1.2.0.0.0", Ordering::Equal)]
    #[case("abc", "", Ordering::Equal)] // both fall back to zero
    #[case("", "0.0.0.1", Ordering::Less)]
    fn compare_orders_by_normalized_components(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(compare(a, b), expected);
    }

    fn generated_versions() -> Vec<String> {
        let mut versions = vec![String::new(), "garbage".to_string()];
        for major in [99, 100, 136] {
            for build in [0, 7103] {
                for patch in [9, 92, 113] {
                    versions.push(format!("{}.0.{}.{}", major, build, patch));
                    versions.push(format!("{}.0.{}.{}-1", major, build, patch));
                    versions.push(format!("{}.0.{}.{}-1.2", major, build, patch));
                }
            }
        }
        versions
    }

    #[test]
    fn compare_is_antisymmetric_and_reflexive() {
        let versions = generated_versions();
        for a in &versions {
            assert_eq!(compare(a, a), Ordering::Equal, "{a}");
            for b in &versions {
                assert_eq!(compare(a, b), compare(b, a).reverse(), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn compare_is_transitive() {
        let versions = generated_versions();
        for a in &versions {
            for b in &versions {
                if compare(a, b) == Ordering::Greater {
                    continue;
                }
                for c in &versions {
                    if compare(b, c) != Ordering::Greater {
                        assert_ne!(compare(a, c), Ordering::Greater, "{a} <= {b} <= {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn is_update_available_only_when_latest_is_newer() {
        assert!(is_update_available("130.0.0.0", "136.0.7103.92"));
        assert!(!is_update_available("136.0.7103.92", "136.0.7103.92"));
        assert!(!is_update_available("140.0.0.0", "136.0.7103.92"));
    }
}
