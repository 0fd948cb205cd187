//! Unified diff parser
//!
//! [`DiffParser`] is a line-driven state machine: every call to
//! [`DiffParser::feed`] performs one transition and yields a completed
//! [`ChangeRun`] whenever the line closes the open run. [`ChangeRuns`] wraps
//! the parser as a lazy iterator over a whole diff.

use crate::change::ChangeRun;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@")
        .expect("hunk header pattern is valid")
});

const SOURCE_ABSENT: &str = "/dev/null";

/// Line numbers announced by a `@@ -a,b +c,d @@` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
}

impl HunkHeader {
    /// Parse a hunk header; omitted lengths default to 1
    pub fn parse(line: &str) -> Option<Self> {
        let caps = HUNK_HEADER.captures(line)?;
        let number = |idx: usize, default: usize| -> Option<usize> {
            match caps.get(idx) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(default),
            }
        };

        Some(Self {
            old_start: number(1, 0)?,
            old_len: number(2, 1)?,
            new_start: number(3, 0)?,
            new_len: number(4, 1)?,
        })
    }
}

/// What kind of line the parser had to skip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseWarningKind {
    MalformedHunkHeader,
    MalformedFileHeader,
}

/// A line the parser could not interpret and skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number within the diff text
    pub line_number: usize,
    pub kind: ParseWarningKind,
    pub line: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            ParseWarningKind::MalformedHunkHeader => "malformed hunk header",
            ParseWarningKind::MalformedFileHeader => "malformed file header",
        };
        write!(f, "line {}: skipped {}: {}", self.line_number, what, self.line)
    }
}

/// State machine turning unified diff lines into change runs
#[derive(Debug, Clone, Default)]
pub struct DiffParser {
    /// Target-side path of the file being parsed
    current_file: String,
    /// Target-side line number of the next hunk line (1-based)
    cursor: usize,
    /// First target line touched by the open run
    run_start: Option<usize>,
    added_lines: Vec<String>,
    deleted_lines: Vec<String>,
    is_new_file: bool,
    in_hunk: bool,
    /// Source/target lines the current hunk header still announces
    old_remaining: usize,
    new_remaining: usize,
    line_number: usize,
    warnings: Vec<ParseWarning>,
}

impl DiffParser {
    pub fn new() -> Self {
        Self {
            cursor: 1,
            ..Self::default()
        }
    }

    pub fn current_file(&self) -> &str {
        &self.current_file
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn in_hunk(&self) -> bool {
        self.in_hunk
    }

    pub fn is_new_file(&self) -> bool {
        self.is_new_file
    }

    /// Lines skipped so far
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Consume one diff line, returning the run it completed, if any
    pub fn feed(&mut self, line: &str) -> Option<ChangeRun> {
        self.line_number += 1;

        if let Some(rest) = line.strip_prefix("diff --git ") {
            return self.start_file(rest, line);
        }
        if line.starts_with("@@") {
            return self.start_hunk(line);
        }
        if self.in_hunk && !self.is_file_marker(line) {
            return self.feed_hunk_line(line);
        }
        self.feed_header_line(line)
    }

    /// Flush whatever is still open at the end of the input
    pub fn finish(&mut self) -> Option<ChangeRun> {
        self.in_hunk = false;
        self.flush(1)
    }

    fn start_file(&mut self, rest: &str, line: &str) -> Option<ChangeRun> {
        let run = self.flush(self.cursor);

        self.current_file = match target_path_from_header(rest) {
            Some(path) => path,
            None => {
                self.warn(ParseWarningKind::MalformedFileHeader, line);
                String::new()
            }
        };
        self.cursor = 1;
        self.run_start = None;
        self.is_new_file = false;
        self.in_hunk = false;
        self.old_remaining = 0;
        self.new_remaining = 0;
        log::trace!("file header for {}", self.current_file);

        run
    }

    fn start_hunk(&mut self, line: &str) -> Option<ChangeRun> {
        let Some(header) = HunkHeader::parse(line) else {
            // No-op: cursor, hunk mode and the open run are left as they are
            self.warn(ParseWarningKind::MalformedHunkHeader, line);
            return None;
        };

        let run = self.flush(self.cursor);
        self.cursor = header.new_start;
        self.run_start = None;
        self.old_remaining = header.old_len;
        self.new_remaining = header.new_len;
        self.in_hunk = true;
        log::trace!(
            "hunk in {} at target line {} ({} old, {} new)",
            self.current_file,
            header.new_start,
            header.old_len,
            header.new_len
        );

        run
    }

    fn feed_hunk_line(&mut self, line: &str) -> Option<ChangeRun> {
        if let Some(content) = line.strip_prefix('+') {
            self.mark_run_start();
            self.added_lines.push(content.to_string());
            self.cursor = self.cursor.saturating_add(1);
            self.new_remaining = self.new_remaining.saturating_sub(1);
            None
        } else if let Some(content) = line.strip_prefix('-') {
            self.mark_run_start();
            self.deleted_lines.push(content.to_string());
            self.old_remaining = self.old_remaining.saturating_sub(1);
            None
        } else if line.starts_with('\\') {
            // "\ No newline at end of file"
            None
        } else {
            let run = self.flush(self.cursor);
            self.cursor = self.cursor.saturating_add(1);
            self.old_remaining = self.old_remaining.saturating_sub(1);
            self.new_remaining = self.new_remaining.saturating_sub(1);
            run
        }
    }

    /// `---`/`+++` markers and the file metadata lines around them
    fn feed_header_line(&mut self, line: &str) -> Option<ChangeRun> {
        if let Some(path) = line.strip_prefix("--- ") {
            // A source marker also starts a new section in diffs without
            // `diff --git` headers
            let run = self.flush(self.cursor);
            self.in_hunk = false;
            self.is_new_file = marker_path(path) == SOURCE_ABSENT;
            return run;
        }
        if let Some(path) = line.strip_prefix("+++ ") {
            let path = marker_path(path);
            if path != SOURCE_ABSENT {
                let path = path.strip_prefix("b/").unwrap_or(path);
                if path != self.current_file {
                    self.current_file = path.to_string();
                }
            }
            self.in_hunk = false;
        }
        None
    }

    /// Inside a hunk, `--- x`/`+++ x` is content while the header still
    /// announces lines on that side
    fn is_file_marker(&self, line: &str) -> bool {
        (line.starts_with("--- ") && self.old_remaining == 0)
            || (line.starts_with("+++ ") && self.new_remaining == 0)
    }

    fn mark_run_start(&mut self) {
        if self.run_start.is_none() {
            self.run_start = Some(self.cursor.max(1));
        }
    }

    /// Hand the open run out, if it holds anything
    fn flush(&mut self, fallback_start: usize) -> Option<ChangeRun> {
        let start_line = self.run_start.take().unwrap_or(fallback_start).max(1);
        if self.added_lines.is_empty() && self.deleted_lines.is_empty() {
            return None;
        }

        let run = ChangeRun {
            file_path: self.current_file.clone(),
            start_line,
            added_lines: std::mem::take(&mut self.added_lines),
            deleted_lines: std::mem::take(&mut self.deleted_lines),
            is_new_file: self.is_new_file,
        };
        log::debug!(
            "run in {} at line {}: +{} -{}",
            run.file_path,
            run.start_line,
            run.added_lines.len(),
            run.deleted_lines.len()
        );
        Some(run)
    }

    fn warn(&mut self, kind: ParseWarningKind, line: &str) {
        let warning = ParseWarning {
            line_number: self.line_number,
            kind,
            line: line.to_string(),
        };
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// `<dst>` out of `a/<src> b/<dst>`, tolerating quoted paths
fn target_path_from_header(rest: &str) -> Option<String> {
    let idx = rest.rfind(" b/").or_else(|| rest.rfind(" \"b/"))?;
    let target = rest[idx + 1..].trim_matches('"');
    target
        .strip_prefix("b/")
        .filter(|path| !path.is_empty())
        .map(str::to_string)
}

/// Path of a `---`/`+++` marker without quotes or a trailing timestamp
fn marker_path(rest: &str) -> &str {
    let path = rest.split('\t').next().unwrap_or(rest);
    path.trim_end().trim_matches('"')
}

/// Lazy iterator over the change runs of a diff
#[derive(Debug)]
pub struct ChangeRuns<I> {
    lines: I,
    parser: DiffParser,
    finished: bool,
}

impl<I, S> ChangeRuns<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            parser: DiffParser::new(),
            finished: false,
        }
    }

    /// Lines skipped so far
    pub fn warnings(&self) -> &[ParseWarning] {
        self.parser.warnings()
    }
}

impl<I, S> Iterator for ChangeRuns<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = ChangeRun;

    fn next(&mut self) -> Option<ChangeRun> {
        if self.finished {
            return None;
        }
        for line in self.lines.by_ref() {
            if let Some(run) = self.parser.feed(line.as_ref()) {
                return Some(run);
            }
        }
        self.finished = true;
        self.parser.finish()
    }
}

/// Change runs of `diff_text`, in diff order
pub fn change_runs(diff_text: &str) -> ChangeRuns<std::str::Lines<'_>> {
    ChangeRuns::new(diff_text.lines())
}
