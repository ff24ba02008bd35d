//! Target file list handling.
//!
//! Entries are opaque paths kept byte-for-byte: no trimming, quoting or
//! normalization. Only empty lines are dropped.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{DomsubError, Result};

/// Terminator of the quoted here-document that embeds the list in the script.
pub const HEREDOC_TERMINATOR: &str = "__END__";

/// Ordered list of files the generated script backs up and rewrites
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileList {
    entries: Vec<String>,
}

impl FileList {
    /// Parse a newline-delimited list, skipping empty lines.
    ///
    /// An entry equal to the here-document terminator would cut the embedded
    /// list short, so it is rejected.
    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = Vec::new();

        for (index, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            if line == HEREDOC_TERMINATOR {
                return Err(DomsubError::malformed_file_entry(
                    index + 1,
                    format!("entry collides with here-document terminator {HEREDOC_TERMINATOR}"),
                ));
            }
            entries.push(line.to_string());
        }

        Ok(Self { entries })
    }

    /// Read and parse a file list from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| DomsubError::io(path, e))?;
        let list = Self::parse(&content)?;
        debug!(path = %path.display(), count = list.len(), "Loaded file list");
        Ok(list)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FileList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}
