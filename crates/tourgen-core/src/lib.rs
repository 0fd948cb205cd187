//! Tourgen Core - turns unified diffs into guided code tours
//!
//! The pipeline is pure and synchronous: [`diff::DiffParser`] splits diff
//! text into [`ChangeRun`]s, [`StepSynthesizer`] renders each run as one or
//! two [`TourStep`]s, and [`Tour::assemble`] wraps the steps with a title and
//! description taken from the two revisions.

pub mod change;
pub mod diff;
pub mod language;
pub mod step;
pub mod tour;

pub use change::ChangeRun;
pub use diff::{change_runs, ChangeRuns, DiffParser, HunkHeader, ParseWarning, ParseWarningKind};
pub use language::{language_for, LanguageError, LanguageMap, FALLBACK_LANGUAGE};
pub use step::{parse_diff, ColumnBase, Position, Selection, StepSynthesizer, TourStep};
pub use tour::{assemble_tour, RevisionInfo, Tour};
