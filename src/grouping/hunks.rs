//! Hunk counting over raw patch text.

/// Marker that opens a hunk header line in a unified diff.
const HUNK_MARKER: &str = "@@";

/// Count the hunks in a unified patch.
///
/// Undecodable bytes are replaced, since only line structure matters here.
pub fn count_hunks(patch: &[u8]) -> usize {
    String::from_utf8_lossy(patch)
        .split('\n')
        .filter(|line| line.starts_with(HUNK_MARKER))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch() {
        assert_eq!(count_hunks(b""), 0);
    }

    #[test]
    fn test_counts_hunk_headers_only() {
        let patch = b"diff --git a/Foo.java b/Foo.java\n\
--- a/Foo.java\n\
+++ b/Foo.java\n\
@@ -1,3 +1,3 @@\n\
-old\n\
+new\n\
 context @@ not a header\n\
@@ -10,2 +10,2 @@ class Foo {\n\
-a\n\
+b\n";
        assert_eq!(count_hunks(patch), 2);
    }

    #[test]
    fn test_changed_line_starting_with_marker_is_not_a_hunk() {
        let patch = b"@@ -1 +1 @@\n-@@ old\n+@@ new\n";
        assert_eq!(count_hunks(patch), 1);
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let mut patch = b"@@ -1 +1 @@\n-".to_vec();
        patch.extend_from_slice(&[0xff, 0xfe, b'\n']);
        patch.extend_from_slice(b"@@ -5 +5 @@\n+x\n");
        assert_eq!(count_hunks(&patch), 2);
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(count_hunks(b"@@ -1 +1 @@\r\n-a\r\n+b\r\n"), 1);
    }
}
