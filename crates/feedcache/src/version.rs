//! # Version Comparison
//!
//! Dotted-integer version comparison used by the manifest strategy. The
//! comparison is total: malformed segments count as 0 and no input can make
//! it fail.

/// Check whether `fresh` is strictly newer than `cached`.
///
/// An absent cached version means any fresh version counts as newer; an
/// absent fresh version is never newer. Equal versions are not newer, so
/// `"1.2"` and `"1.2.0"` compare as equal.
pub fn is_newer_version(fresh: Option<&str>, cached: Option<&str>) -> bool {
    let Some(fresh) = fresh else {
        return false;
    };
    let Some(cached) = cached else {
        return true;
    };

    let fresh_segments = parse_segments(fresh);
    let cached_segments = parse_segments(cached);

    let positions = fresh_segments.len().max(cached_segments.len());
    for i in 0..positions {
        let f = fresh_segments.get(i).copied().unwrap_or(0);
        let c = cached_segments.get(i).copied().unwrap_or(0);
        if f != c {
            return f > c;
        }
    }

    false
}

/// Split a dotted version string, treating unparseable segments as 0
fn parse_segments(version: &str) -> Vec<u64> {
    version
        .split('.')
        .map(|segment| segment.trim().parse::<u64>().unwrap_or(0))
        .collect()
}
