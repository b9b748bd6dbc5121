//! Resource path normalization
//!
//! Two flavours of dot-segment handling are provided:
//!
//! - [`normalize`] is strict. A `..` that would climb above the root makes
//!   the whole path invalid, which is how servlet containers treat
//!   context-relative resource paths.
//! - [`clean_path`] is lenient. A `..` at the root is dropped, following the
//!   "remove dot segments" rule for URL paths.

/// Normalize a root-relative resource path
///
/// The result always starts with `/`. Repeated separators collapse and `.`
/// segments disappear. Returns `None` when a `..` segment would escape the
/// root.
///
/// ```
/// use xsdr::core::path::normalize;
///
/// assert_eq!(normalize("/my/sample/./path").as_deref(), Some("/my/sample/path"));
/// assert_eq!(normalize("/my/sample/../path").as_deref(), Some("/my/path"));
/// assert_eq!(normalize("/../my/path"), None);
/// ```
pub fn normalize(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    Some(join_segments(&segments, has_trailing_slash(path), true))
}

/// Clean a resource path without ever failing
///
/// Same segment rules as [`normalize`], except that `..` at the root is
/// discarded. The result is relative (no leading `/`), ready to be looked up
/// against a classpath root.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    join_segments(&segments, has_trailing_slash(path), false)
}

fn has_trailing_slash(path: &str) -> bool {
    path.ends_with('/') || path.ends_with("/.") || path.ends_with("/..")
}

fn join_segments(segments: &[&str], trailing: bool, absolute: bool) -> String {
    let mut out = String::new();
    if absolute {
        out.push('/');
    }
    out.push_str(&segments.join("/"));
    if trailing && !segments.is_empty() {
        out.push('/');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_removes_current_dir_segments() {
        assert_eq!(normalize("/my/sample/./path").as_deref(), Some("/my/sample/path"));
    }

    #[test]
    fn test_normalize_resolves_parent_segments() {
        assert_eq!(normalize("/my/sample/../path").as_deref(), Some("/my/path"));
    }

    #[test]
    fn test_normalize_rejects_escaping_root() {
        assert_eq!(normalize("/../my/path"), None);
        assert_eq!(normalize("/../common.xsd"), None);
        assert_eq!(normalize("/a/../../b"), None);
        assert_eq!(normalize("/.."), None);
    }

    #[test]
    fn test_normalize_makes_relative_paths_absolute() {
        assert_eq!(normalize("xsd/common.xsd").as_deref(), Some("/xsd/common.xsd"));
    }

    #[test]
    fn test_normalize_collapses_separators() {
        assert_eq!(normalize("//xsd///order//a.xsd").as_deref(), Some("/xsd/order/a.xsd"));
    }

    #[test]
    fn test_normalize_keeps_trailing_slash() {
        assert_eq!(normalize("/xsd/order/").as_deref(), Some("/xsd/order/"));
        assert_eq!(normalize("/xsd/order/..").as_deref(), Some("/xsd/"));
        assert_eq!(normalize("/").as_deref(), Some("/"));
    }

    #[test]
    fn test_clean_path_clamps_at_root() {
        assert_eq!(clean_path("/../common.xsd"), "common.xsd");
        assert_eq!(clean_path("../../xsd/./common.xsd"), "xsd/common.xsd");
    }

    #[test]
    fn test_clean_path_matches_normalize_inside_root() {
        for path in ["/xsd/order/../common.xsd", "xsd/./order/a.xsd", "/a//b"] {
            let strict = normalize(path).unwrap();
            assert_eq!(format!("/{}", clean_path(path)), strict);
        }
    }
}
