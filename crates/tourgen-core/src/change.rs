//! Change runs extracted from a unified diff

/// A maximal block of added and/or deleted lines inside one hunk.
///
/// Runs are bounded by context lines, hunk headers, file headers or the end
/// of the diff. The parser never hands out an empty run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeRun {
    /// Target-side path of the file
    pub file_path: String,
    /// First target-side line touched by the run (1-based)
    pub start_line: usize,
    /// Lines only present on the target side, in diff order
    pub added_lines: Vec<String>,
    /// Lines only present on the source side, in diff order
    pub deleted_lines: Vec<String>,
    /// The file does not exist on the source side
    pub is_new_file: bool,
}

impl ChangeRun {
    pub fn new(file_path: impl Into<String>, start_line: usize) -> Self {
        Self {
            file_path: file_path.into(),
            start_line,
            ..Self::default()
        }
    }

    pub fn with_added<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.added_lines.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn with_deleted<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deleted_lines.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn new_file(mut self, is_new_file: bool) -> Self {
        self.is_new_file = is_new_file;
        self
    }

    /// Check if the run carries no content at all
    pub fn is_empty(&self) -> bool {
        self.added_lines.is_empty() && self.deleted_lines.is_empty()
    }

    /// Only additions, nothing removed
    pub fn is_pure_addition(&self) -> bool {
        self.deleted_lines.is_empty() && !self.added_lines.is_empty()
    }

    /// Only deletions, nothing added
    pub fn is_pure_deletion(&self) -> bool {
        self.added_lines.is_empty() && !self.deleted_lines.is_empty()
    }

    /// Added lines joined with `\n`, the body of generated code fences
    pub fn added_text(&self) -> String {
        self.added_lines.join("\n")
    }
}
