//! Eligibility of changed file paths.

use std::ops::RangeInclusive;

use regex_lite::Regex;

use crate::error::ConfigError;

/// Settings for [`PathFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFilterConfig {
    /// Required file suffix, e.g. `.java`.
    pub extension: String,
    /// Paths containing any character in these ranges are rejected.
    pub excluded_chars: Vec<RangeInclusive<char>>,
    /// A path must contain at least one of these fragments.
    pub source_roots: Vec<String>,
}

impl Default for PathFilterConfig {
    fn default() -> Self {
        Self {
            extension: ".java".to_string(),
            // CJK Unified Ideographs
            excluded_chars: vec!['\u{4e00}'..='\u{9fff}'],
            source_roots: vec!["src/main/java".to_string(), "src/test/java".to_string()],
        }
    }
}

/// Decides whether a changed path takes part in composite-commit analysis.
#[derive(Debug, Clone)]
pub struct PathFilter {
    extension: String,
    excluded: Option<Regex>,
    source_roots: Vec<String>,
}

impl PathFilter {
    pub fn new(config: PathFilterConfig) -> Result<Self, ConfigError> {
        let excluded = build_excluded_pattern(&config.excluded_chars)?;
        Ok(Self {
            extension: config.extension,
            excluded,
            source_roots: config.source_roots,
        })
    }

    /// A missing path (created or deleted file side) is always eligible.
    pub fn is_eligible(&self, path: Option<&str>) -> bool {
        let Some(path) = path else {
            return true;
        };

        if !path.ends_with(&self.extension) {
            return false;
        }

        if self.excluded.as_ref().is_some_and(|re| re.is_match(path)) {
            return false;
        }

        self.source_roots.iter().any(|root| path.contains(root.as_str()))
    }
}

impl Default for PathFilter {
    /// The default configuration holds a single ascending range, which always
    /// compiles to a valid character class.
    fn default() -> Self {
        Self::new(PathFilterConfig::default()).expect("Invalid default path filter")
    }
}

/// Compile the ranges into one character class, or None when there are no ranges.
fn build_excluded_pattern(ranges: &[RangeInclusive<char>]) -> Result<Option<Regex>, ConfigError> {
    if ranges.is_empty() {
        return Ok(None);
    }

    let mut class = String::from("[");
    for range in ranges {
        let (start, end) = (*range.start(), *range.end());
        if start > end {
            return Err(ConfigError::EmptyRange { start, end });
        }
        class.push_str(&format!("\\x{{{:x}}}-\\x{{{:x}}}", start as u32, end as u32));
    }
    class.push(']');

    Regex::new(&class).map(Some).map_err(ConfigError::InvalidPattern)
}
