//! Reading the list of repositories to process.

use std::path::Path;

use crate::error::DatasetError;

/// Read repository names from a plain text file.
///
/// Names are separated by whitespace, usually one per line. Lines starting
/// with `#` are comments.
pub fn read_work_list(path: &Path) -> Result<Vec<String>, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::ReadWorkList {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_work_list(&content))
}

/// Parse work list content into repository names, preserving order.
pub fn parse_work_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_name_per_line() {
        let names = parse_work_list("javaparser\nguava\n\n  jsoup  \n");
        assert_eq!(names, vec!["javaparser", "guava", "jsoup"]);
    }

    #[test]
    fn test_whitespace_separated_names() {
        let names = parse_work_list("a b\tc\r\nd");
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_comments_are_skipped() {
        let names = parse_work_list("# repositories\nguava\n  # disabled\n");
        assert_eq!(names, vec!["guava"]);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_work_list(&dir.path().join("repos.txt"));
        assert!(matches!(result, Err(DatasetError::ReadWorkList { .. })));
    }
}
