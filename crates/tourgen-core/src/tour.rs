//! Tour assembly

use crate::step::TourStep;
use serde::{Deserialize, Serialize};

/// A resolved revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionInfo {
    pub short_hash: String,
    /// Commit subject line
    pub message: String,
}

impl RevisionInfo {
    pub fn new(short_hash: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            short_hash: short_hash.into(),
            message: message.into(),
        }
    }
}

/// The finished walkthrough document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tour {
    pub title: String,
    pub description: String,
    pub steps: Vec<TourStep>,
}

impl Tour {
    /// Build a tour from steps in diff order; the steps are kept verbatim
    pub fn assemble(steps: Vec<TourStep>, from: &RevisionInfo, to: &RevisionInfo) -> Self {
        Self {
            title: format!("Changes from {} to {}", from.short_hash, to.short_hash),
            description: describe(from, to),
            steps,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Free-function form of [`Tour::assemble`]
pub fn assemble_tour(steps: Vec<TourStep>, from: &RevisionInfo, to: &RevisionInfo) -> Tour {
    Tour::assemble(steps, from, to)
}

fn describe(from: &RevisionInfo, to: &RevisionInfo) -> String {
    format!(
        "Walkthrough of the changes between two commits.\n\n- From `{}`: {}\n- To `{}`: {}",
        from.short_hash,
        one_line(&from.message),
        to.short_hash,
        one_line(&to.message)
    )
}

fn one_line(message: &str) -> &str {
    message.lines().next().unwrap_or("").trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{Position, Selection};
    use pretty_assertions::assert_eq;

    fn revisions() -> (RevisionInfo, RevisionInfo) {
        (
            RevisionInfo::new("abc1234", "Initial commit"),
            RevisionInfo::new("def5678", "Add parser\n\nLonger body text"),
        )
    }

    #[test]
    fn test_title_and_description() {
        let (from, to) = revisions();
        let tour = assemble_tour(Vec::new(), &from, &to);

        assert_eq!(tour.title, "Changes from abc1234 to def5678");
        assert_eq!(
            tour.description,
            "Walkthrough of the changes between two commits.\n\n- From `abc1234`: Initial commit\n- To `def5678`: Add parser"
        );
        assert!(tour.is_empty());
    }

    #[test]
    fn test_steps_kept_in_order() {
        let (from, to) = revisions();
        let steps = vec![
            TourStep::Addition {
                file: "b.rs".to_string(),
                line: 3,
                description: "second file first".to_string(),
                title: None,
            },
            TourStep::Replacement {
                file: "a.rs".to_string(),
                selection: Selection {
                    start: Position {
                        line: 1,
                        character: 0,
                    },
                    end: Position {
                        line: 1,
                        character: 4,
                    },
                },
                description: "then this".to_string(),
                title: None,
            },
        ];

        let tour = Tour::assemble(steps.clone(), &from, &to);
        assert_eq!(tour.steps, steps);
        assert_eq!(tour.len(), 2);
    }

    #[test]
    fn test_title_override() {
        let (from, to) = revisions();
        let tour = Tour::assemble(Vec::new(), &from, &to).with_title("Release notes");
        assert_eq!(tour.title, "Release notes");
    }

    #[test]
    fn test_serialized_shape() {
        let (from, to) = revisions();
        let json = serde_json::to_value(Tour::assemble(Vec::new(), &from, &to)).unwrap();
        assert_eq!(json["title"], "Changes from abc1234 to def5678");
        assert_eq!(json["steps"], serde_json::json!([]));
    }
}
