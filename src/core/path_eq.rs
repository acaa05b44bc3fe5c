//! Platform-aware path equality
//!
//! Paths are compared as strings after a normalization pass that rewrites
//! separators, drive letters and `.`/`..` segments until nothing changes.

use std::sync::LazyLock;

use regex::Regex;

/// A rewrite rule: pattern, replacement, and whether all matches are replaced per pass
struct Rewrite {
    pattern: Regex,
    replacement: &'static str,
    global: bool,
}

impl Rewrite {
    fn new(pattern: &str, replacement: &'static str, global: bool) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("rewrite regex must compile"),
            replacement,
            global,
        }
    }

    /// Apply until the pattern no longer matches
    fn apply(&self, input: String) -> String {
        let mut current = input;
        while self.pattern.is_match(&current) {
            let next = if self.global {
                self.pattern.replace_all(&current, self.replacement)
            } else {
                self.pattern.replace(&current, self.replacement)
            };
            current = next.into_owned();
        }
        current
    }
}

static REWRITES: LazyLock<Vec<Rewrite>> = LazyLock::new(|| {
    vec![
        Rewrite::new(r"\\", "/", true),
        // `C:` -> `/C`
        Rewrite::new(r"(\w):", "/${1}", false),
        Rewrite::new(r"(\w+)/\.\./?", "", true),
        Rewrite::new(r"^\./", "", false),
        Rewrite::new(r"/\./", "/", false),
        Rewrite::new(r"/\.$", "", false),
        Rewrite::new(r"/$", "", false),
    ]
});

/// Normalize a path string for comparison. Pure and deterministic.
pub(crate) fn normalize(path: &str) -> String {
    REWRITES
        .iter()
        .fold(path.to_string(), |current, rule| rule.apply(current))
}

/// Compare two paths with the given case sensitivity
pub(crate) fn equal_with_case(a: &str, b: &str, case_insensitive: bool) -> bool {
    if a == b {
        return true;
    }
    let left = normalize(a);
    let right = normalize(b);
    if case_insensitive {
        left.to_lowercase() == right.to_lowercase()
    } else {
        left == right
    }
}

/// Compare two paths using the current platform's case rules (case-insensitive on Windows)
pub(crate) fn path_equal(a: &str, b: &str) -> bool {
    equal_with_case(a, b, cfg!(windows))
}
