//! Segment-wise path matching against endpoint patterns.
//!
//! Pattern segments:
//!   literal  - must equal the path segment (case-sensitive)
//!   `:name`  - matches any single segment
//!   `*name`  - matches the rest of the path, however long
//!
//! A path with more segments than the pattern only matches when a `*`
//! segment absorbs the surplus.

/// Returns true when `path` satisfies `pattern`.
pub fn match_path(path: &str, pattern: &str) -> bool {
    let path_segments: Vec<&str> = path.split('/').collect();
    let pattern_segments: Vec<&str> = pattern.split('/').collect();

    if path_segments.len() < pattern_segments.len() {
        return false;
    }

    for (i, path_seg) in path_segments.iter().enumerate() {
        let Some(seg) = pattern_segments.get(i) else {
            // surplus path segments with no wildcard to absorb them
            return false;
        };

        if seg.starts_with(':') {
            continue;
        }

        if seg.starts_with('*') {
            return true;
        }

        if seg != path_seg {
            return false;
        }
    }

    true
}

/// True when the pattern contains no `:` or `*` segments.
pub fn is_literal(pattern: &str) -> bool {
    pattern
        .split('/')
        .all(|seg| !seg.starts_with(':') && !seg.starts_with('*'))
}
