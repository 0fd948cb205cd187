//! Tour steps and the synthesizer that builds them from change runs

use crate::change::ChangeRun;
use crate::diff::change_runs;
use crate::language::LanguageMap;
use serde::{Deserialize, Serialize};

/// Position inside a file.
///
/// `line` is 1-based. `character` counts UTF-16 code units, the unit editor
/// positions use, offset by the synthesizer's [`ColumnBase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

/// Range of text a step highlights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

/// One navigable annotation of the tour.
///
/// Serialized without a tag, so each variant becomes a plain CodeTour step
/// object whose shape is given by the fields present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TourStep {
    /// Ask the reader to create an empty file
    CreateFile { title: String, description: String },
    /// Fill a freshly created file
    AddContentToFile {
        file: String,
        line: usize,
        title: String,
        description: String,
    },
    /// Insert lines at a single target line
    Addition {
        file: String,
        line: usize,
        description: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    /// Replace or remove a selected range
    Replacement {
        file: String,
        selection: Selection,
        description: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

impl TourStep {
    pub fn file(&self) -> Option<&str> {
        match self {
            TourStep::CreateFile { .. } => None,
            TourStep::AddContentToFile { file, .. }
            | TourStep::Addition { file, .. }
            | TourStep::Replacement { file, .. } => Some(file),
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            TourStep::AddContentToFile { line, .. } | TourStep::Addition { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            TourStep::Replacement { selection, .. } => Some(selection),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            TourStep::CreateFile { title, .. } | TourStep::AddContentToFile { title, .. } => {
                Some(title)
            }
            TourStep::Addition { title, .. } | TourStep::Replacement { title, .. } => {
                title.as_deref()
            }
        }
    }

    pub fn description(&self) -> &str {
        match self {
            TourStep::CreateFile { description, .. }
            | TourStep::AddContentToFile { description, .. }
            | TourStep::Addition { description, .. }
            | TourStep::Replacement { description, .. } => description,
        }
    }
}

/// Whether selection characters count from 0 or from 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnBase {
    #[default]
    Zero,
    One,
}

impl ColumnBase {
    pub fn offset(self) -> usize {
        match self {
            ColumnBase::Zero => 0,
            ColumnBase::One => 1,
        }
    }
}

/// Turns change runs into tour steps
#[derive(Debug, Clone, Default)]
pub struct StepSynthesizer {
    languages: LanguageMap,
    column_base: ColumnBase,
}

impl StepSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_languages(mut self, languages: LanguageMap) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_column_base(mut self, column_base: ColumnBase) -> Self {
        self.column_base = column_base;
        self
    }

    pub fn languages(&self) -> &LanguageMap {
        &self.languages
    }

    pub fn column_base(&self) -> ColumnBase {
        self.column_base
    }

    /// Steps for one run: two for a new file with content, otherwise one
    pub fn synthesize(&self, run: ChangeRun) -> Vec<TourStep> {
        if run.is_new_file {
            return self.new_file_steps(run);
        }

        if run.is_pure_addition() {
            vec![self.addition(run)]
        } else {
            vec![self.replacement(run)]
        }
    }

    /// Parse `diff_text` and synthesize every run, in diff order
    pub fn steps_for(&self, diff_text: &str) -> Vec<TourStep> {
        change_runs(diff_text)
            .flat_map(|run| self.synthesize(run))
            .collect()
    }

    fn new_file_steps(&self, run: ChangeRun) -> Vec<TourStep> {
        let path = run.file_path.as_str();
        let create_title = format!("Create {}", path);

        if run.added_lines.is_empty() {
            return vec![TourStep::CreateFile {
                title: create_title,
                description: String::new(),
            }];
        }

        let create = TourStep::CreateFile {
            title: create_title,
            description: create_file_description(path),
        };
        let content = TourStep::AddContentToFile {
            file: path.to_string(),
            line: 1,
            title: format!("Add content to {}", path),
            description: format!(
                "Add the following content to `{}`:\n\n{}",
                path,
                self.fence(path, &run.added_text())
            ),
        };

        vec![create, content]
    }

    fn replacement(&self, run: ChangeRun) -> TourStep {
        let base = self.column_base.offset();
        let last_len = run
            .deleted_lines
            .last()
            .map(|line| line.encode_utf16().count())
            .unwrap_or(0);
        let end_line = run
            .start_line
            .saturating_add(run.deleted_lines.len().saturating_sub(1));
        let selection = Selection {
            start: Position {
                line: run.start_line,
                character: base,
            },
            end: Position {
                line: end_line,
                character: base.saturating_add(last_len),
            },
        };

        let description = if run.is_pure_deletion() {
            "Remove the selected code.".to_string()
        } else {
            format!(
                "Replace the selected code with:\n\n{}",
                self.fence(&run.file_path, &run.added_text())
            )
        };

        TourStep::Replacement {
            file: run.file_path,
            selection,
            description,
            title: None,
        }
    }

    fn addition(&self, run: ChangeRun) -> TourStep {
        let description = format!(
            "Add the following code:\n\n{}",
            self.fence(&run.file_path, &run.added_text())
        );

        TourStep::Addition {
            file: run.file_path,
            line: run.start_line,
            description,
            title: None,
        }
    }

    fn fence(&self, path: &str, code: &str) -> String {
        code_fence(self.languages.classify(path), code)
    }
}

/// Steps for `diff_text` using the built-in language table
pub fn parse_diff(diff_text: &str) -> Vec<TourStep> {
    StepSynthesizer::default().steps_for(diff_text)
}

/// Fenced markdown block; the fence grows past any backtick run in `code`
fn code_fence(language: &str, code: &str) -> String {
    let longest_run = code
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    format!("{fence}{language}\n{code}\n{fence}")
}

fn create_file_description(path: &str) -> String {
    let unix = match path.rsplit_once('/') {
        Some((dir, _)) if !dir.is_empty() => {
            format!("mkdir -p \"{}\" && touch \"{}\"", dir, path)
        }
        _ => format!("touch \"{}\"", path),
    };
    let windows = format!(
        "New-Item -ItemType File -Force -Path \"{}\"",
        path.replace('/', "\\")
    );

    format!(
        "Create an empty file `{}`.\n\nOn macOS or Linux:\n\n```bash\n{}\n```\n\nOn Windows (PowerShell):\n\n```powershell\n{}\n```",
        path, unix, windows
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_file_produces_two_steps() {
        let synth = StepSynthesizer::new();
        let run = ChangeRun::new("web/new.js", 1)
            .with_added(["let a = 1;", "let b = 2;"])
            .new_file(true);

        let steps = synth.synthesize(run);
        assert_eq!(steps.len(), 2);

        assert_eq!(steps[0].title(), Some("Create web/new.js"));
        assert_eq!(steps[0].file(), None);
        assert!(steps[0]
            .description()
            .contains("mkdir -p \"web\" && touch \"web/new.js\""));
        assert!(steps[0]
            .description()
            .contains("New-Item -ItemType File -Force -Path \"web\\new.js\""));

        assert_eq!(steps[1].title(), Some("Add content to web/new.js"));
        assert_eq!(steps[1].file(), Some("web/new.js"));
        assert_eq!(steps[1].line(), Some(1));
        assert!(steps[1]
            .description()
            .contains("```javascript\nlet a = 1;\nlet b = 2;\n```"));
    }

    #[test]
    fn test_new_file_in_root_uses_plain_touch() {
        let description = create_file_description("notes.md");
        assert!(description.contains("touch \"notes.md\""));
        assert!(!description.contains("mkdir"));
    }

    #[test]
    fn test_new_file_without_content() {
        let run = ChangeRun::new("empty.txt", 1).new_file(true);
        let steps = StepSynthesizer::new().synthesize(run);
        assert_eq!(
            steps,
            vec![TourStep::CreateFile {
                title: "Create empty.txt".to_string(),
                description: String::new(),
            }]
        );
    }

    #[test]
    fn test_replacement_selection() {
        let run = ChangeRun::new("src/lib.rs", 10)
            .with_deleted(["fn a() {}", "fn bé() {}"])
            .with_added(["fn c() {}"]);

        let steps = StepSynthesizer::new().synthesize(run);
        assert_eq!(
            steps[0].selection(),
            Some(&Selection {
                start: Position {
                    line: 10,
                    character: 0
                },
                end: Position {
                    line: 11,
                    character: 10
                },
            })
        );
        assert_eq!(
            steps[0].description(),
            "Replace the selected code with:\n\n```rust\nfn c() {}\n```"
        );
    }

    #[test]
    fn test_one_based_columns_shift_both_ends() {
        let run = ChangeRun::new("a.txt", 3).with_deleted(["abc"]);
        let synth = StepSynthesizer::new().with_column_base(ColumnBase::One);
        let selection = *synth.synthesize(run)[0].selection().unwrap();
        assert_eq!(selection.start.character, 1);
        assert_eq!(selection.end.character, 4);
        assert_eq!(selection.start.line, selection.end.line);
    }

    #[test]
    fn test_end_character_counts_utf16_units() {
        let run = ChangeRun::new("a.md", 1).with_deleted(["ok 🎉"]);
        let steps = StepSynthesizer::new().synthesize(run);
        assert_eq!(steps[0].selection().unwrap().end.character, 5);
    }

    #[test]
    fn test_selection_at_huge_start_line_saturates() {
        let run = ChangeRun::new("a.txt", usize::MAX).with_deleted(["x", "y"]);
        let steps = StepSynthesizer::new().synthesize(run);
        let selection = steps[0].selection().unwrap();
        assert_eq!(selection.start.line, usize::MAX);
        assert_eq!(selection.end.line, usize::MAX);
    }

    #[test]
    fn test_pure_deletion_has_no_fence() {
        let run = ChangeRun::new("a.py", 2).with_deleted(["x = 1", "y = 2"]);
        let steps = StepSynthesizer::new().synthesize(run);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].description(), "Remove the selected code.");
        assert!(!steps[0].description().contains("```"));
    }

    #[test]
    fn test_pure_addition() {
        let run = ChangeRun::new("conf.yaml", 7).with_added(["key: value"]);
        let steps = StepSynthesizer::new().synthesize(run);
        assert_eq!(
            steps,
            vec![TourStep::Addition {
                file: "conf.yaml".to_string(),
                line: 7,
                description: "Add the following code:\n\n```yaml\nkey: value\n```".to_string(),
                title: None,
            }]
        );
    }

    #[test]
    fn test_injected_languages() {
        let languages = LanguageMap::empty().with_language("tpl", "handlebars").unwrap();
        let synth = StepSynthesizer::new().with_languages(languages);
        let steps = synth.synthesize(ChangeRun::new("page.tpl", 1).with_added(["{{x}}"]));
        assert!(steps[0].description().contains("```handlebars\n{{x}}\n```"));

        let steps = synth.synthesize(ChangeRun::new("main.rs", 1).with_added(["x"]));
        assert!(steps[0].description().contains("```text\nx\n```"));
    }

    #[test]
    fn test_code_fence_outgrows_backticks() {
        assert_eq!(code_fence("md", "plain"), "```md\nplain\n```");
        assert_eq!(
            code_fence("md", "```rust\nfn x() {}\n```"),
            "````md\n```rust\nfn x() {}\n```\n````"
        );
    }

    #[test]
    fn test_step_json_shapes() {
        let synth = StepSynthesizer::new();
        let replace = synth.synthesize(ChangeRun::new("f.txt", 1).with_deleted(["ab"]));
        let json = serde_json::to_value(&replace[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "file": "f.txt",
                "selection": {
                    "start": { "line": 1, "character": 0 },
                    "end": { "line": 1, "character": 2 }
                },
                "description": "Remove the selected code."
            })
        );

        let create = synth.synthesize(ChangeRun::new("n.txt", 1).with_added(["x"]).new_file(true));
        let json = serde_json::to_value(&create[0]).unwrap();
        assert!(json.get("file").is_none());
        assert_eq!(json["title"], "Create n.txt");
        let json = serde_json::to_value(&create[1]).unwrap();
        assert_eq!(json["file"], "n.txt");
        assert_eq!(json["line"], 1);
    }

    #[test]
    fn test_parse_diff_end_to_end() {
        let diff = "diff --git a/file.txt b/file.txt\n--- a/file.txt\n+++ b/file.txt\n@@ -1,1 +1,1 @@\n-old content\n+new content\n";
        let steps = parse_diff(diff);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].file(), Some("file.txt"));
        assert!(steps[0].description().contains("```text\nnew content\n```"));
    }
}
