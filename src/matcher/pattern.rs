use std::sync::Arc;

use regex::Regex;

/// A path template compiled for matching: anchored regex, ordered capture
/// names, and the specificity score used to rank it against its siblings.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// RAI of the endpoint this pattern resolves to.
    pub rai: Arc<str>,
    /// The resolved path template the pattern was compiled from.
    pub path: String,
    /// Anchored regex with one capture group per parameter/wildcard.
    pub regex: Regex,
    /// Capture names in template order (`*` for the wildcard).
    pub param_names: Vec<Arc<str>>,
    /// Specificity score in tenths (see [`score_tenths`]).
    pub score_tenths: u64,
}

/// Whether a template segment is a named parameter or the wildcard.
#[inline]
pub(crate) fn is_dynamic_segment(segment: &str) -> bool {
    segment.starts_with(':') || segment == "*"
}

/// Whether a resolved path contains any parameter or wildcard marker.
pub(crate) fn is_dynamic(path: &str) -> bool {
    path.split('/').any(is_dynamic_segment)
}

/// The trailing-slash-toggled counterpart of a path, if it has one.
///
/// `/posts` ⇄ `/posts/`; the root path has no counterpart.
pub(crate) fn toggle_slash(path: &str) -> Option<String> {
    if path == "/" || path.is_empty() {
        None
    } else if let Some(stripped) = path.strip_suffix('/') {
        Some(stripped.to_string())
    } else {
        Some(format!("{path}/"))
    }
}

/// Convert a path template to an anchored regex and its capture names.
///
/// `:name` segments match one non-empty segment; a `*` segment matches the
/// remainder of the path and is captured under the name `*`. Literal
/// segments are matched verbatim (regex metacharacters escaped).
pub(crate) fn compile_template(path: &str) -> (Regex, Vec<Arc<str>>) {
    if path == "/" {
        return (
            Regex::new("^/$").expect("Failed to compile path regex"),
            Vec::new(),
        );
    }

    let mut pattern = String::with_capacity(path.len() + 8);
    pattern.push('^');
    let mut param_names = Vec::new();

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if let Some(name) = segment.strip_prefix(':') {
            pattern.push_str("/([^/]+)");
            param_names.push(Arc::from(name));
        } else if segment == "*" {
            pattern.push_str("/(.+)");
            param_names.push(Arc::from("*"));
        } else {
            pattern.push('/');
            pattern.push_str(&regex::escape(segment));
        }
    }

    pattern.push('$');
    let regex = Regex::new(&pattern).expect("Failed to compile path regex");

    (regex, param_names)
}

/// Specificity score of a path template, in tenths.
///
/// Per segment at index `i` (0-based) of `n`: bare literal 10.0, named
/// parameter 1.0, wildcard 0.5, plus a position weight of `(n - i) * 0.1`
/// so earlier segments weigh more. Every component is a multiple of 0.1, so
/// the score is held as an integer count of tenths and the descending sort
/// over it is total and reproducible.
pub(crate) fn score_tenths(path: &str) -> u64 {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let n = segments.len() as u64;
    let mut score = 0u64;
    for (i, segment) in segments.iter().enumerate() {
        score += if segment.starts_with(':') {
            10
        } else if *segment == "*" {
            5
        } else {
            100
        };
        score += n - i as u64;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_segments_outscore_params() {
        // /a/b/:y and /a/:x/c carry the same mix, just reordered
        assert_eq!(score_tenths("/a/b/:y"), score_tenths("/a/:x/c"));
        assert!(score_tenths("/a/b/c") > score_tenths("/a/b/:y"));
        assert!(score_tenths("/a/:x") > score_tenths("/a/*"));
    }

    #[test]
    fn score_arithmetic_is_exact() {
        // /posts/:id = literal(10.0) + param(1.0) + positions 0.2 + 0.1,
        // held in tenths
        assert_eq!(score_tenths("/posts/:id"), 113);
        // /files/* = literal(10.0) + wildcard(0.5) + positions 0.2 + 0.1
        assert_eq!(score_tenths("/files/*"), 108);
    }

    #[test]
    fn root_scores_zero() {
        assert_eq!(score_tenths("/"), 0);
    }

    #[test]
    fn template_compiles_to_anchored_regex() {
        let (re, names) = compile_template("/posts/:id/comments");
        assert!(re.is_match("/posts/42/comments"));
        assert!(!re.is_match("/posts/42/comments/7"));
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].as_ref(), "id");
    }

    #[test]
    fn wildcard_captures_remainder() {
        let (re, names) = compile_template("/files/*");
        let caps = re.captures("/files/a/b/c.txt").expect("should match");
        assert_eq!(&caps[1], "a/b/c.txt");
        assert_eq!(names[0].as_ref(), "*");
    }

    #[test]
    fn literal_segments_are_escaped() {
        let (re, _) = compile_template("/v1.0/items");
        assert!(re.is_match("/v1.0/items"));
        assert!(!re.is_match("/v1x0/items"));
    }

    #[test]
    fn toggle_slash_round_trips() {
        assert_eq!(toggle_slash("/posts").as_deref(), Some("/posts/"));
        assert_eq!(toggle_slash("/posts/").as_deref(), Some("/posts"));
        assert_eq!(toggle_slash("/"), None);
    }

    #[test]
    fn dynamic_detection() {
        assert!(is_dynamic("/posts/:id"));
        assert!(is_dynamic("/files/*"));
        assert!(!is_dynamic("/posts/new"));
    }
}
