// Subject ignore-list
//
// One filter per line. A trailing `*` makes it a prefix match, a leading `*`
// a suffix match, both a substring match, neither an exact match:
//
//   Etika*
//   *modulis
//   *ugdymas*
//   Fizinis ugdymas

use std::fs;
use std::path::{Path, PathBuf};

use crate::ConfigError;

const FILE_NAME: &str = "ignored_subjects.txt";

const WILDCARD: char = '*';

/// How a filter pattern is compared against a subject name.
///
/// The discriminants are the on-disk bitmask: bit 0 is always set, bit 1
/// marks a trailing wildcard, bit 2 a leading one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact = 1,
    Prefix = 3,
    Suffix = 5,
    Contains = 7,
}

impl MatchKind {
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            1 => Self::Exact,
            3 => Self::Prefix,
            5 => Self::Suffix,
            _ => Self::Contains,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn matches(self, name: &str, pattern: &str) -> bool {
        match self {
            Self::Exact => name == pattern,
            Self::Prefix => name.starts_with(pattern),
            Self::Suffix => name.ends_with(pattern),
            Self::Contains => name.contains(pattern),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreFilter {
    pub kind: MatchKind,
    pub pattern: String,
}

impl IgnoreFilter {
    pub fn new(kind: MatchKind, pattern: impl Into<String>) -> Self {
        Self { kind, pattern: pattern.into() }
    }

    /// Parse one ignore-list line. Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let mut pattern = line.trim_end();
        if pattern.is_empty() {
            return None;
        }

        let mut bits = 1u8;
        if let Some(stripped) = pattern.strip_suffix(WILDCARD) {
            pattern = stripped;
            bits |= 1 << 1;
        }
        if let Some(stripped) = pattern.strip_prefix(WILDCARD) {
            pattern = stripped;
            bits |= 1 << 2;
        }

        Some(Self::new(MatchKind::from_bits(bits), pattern))
    }

    pub fn matches(&self, name: &str) -> bool {
        self.kind.matches(name, &self.pattern)
    }
}

/// User-maintained list of subject-name filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    filters: Vec<IgnoreFilter>,
}

impl IgnoreList {
    pub fn new(filters: Vec<IgnoreFilter>) -> Self {
        Self { filters }
    }

    pub fn default_path() -> PathBuf {
        crate::config_dir().join(FILE_NAME)
    }

    pub fn parse(input: &str) -> Self {
        Self::new(input.lines().filter_map(IgnoreFilter::parse).collect())
    }

    /// Load from `path`. A missing file is an empty list, not an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self::parse(&contents))
    }

    pub fn matches(&self, name: &str) -> bool {
        self.filters.iter().any(|f| f.matches(name))
    }

    pub fn filters(&self) -> &[IgnoreFilter] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
