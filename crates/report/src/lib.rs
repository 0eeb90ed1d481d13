//! Gradebook report parsing.
//!
//! Turns the platform's class and group report exports into [`Summary`]
//! values:
//!
//! - [`mark`]: raw cell → canonical mark
//! - [`subject`]: which subjects count, and their cross-period names
//! - [`layout`] / [`locate`]: fixed geometry and scanned structure
//! - [`parser`]: one worksheet → one summary
//! - [`batch`]: many files of one layout → accepted summaries + rejections
//!
//! Everything is synchronous and side-effect free apart from reading the
//! input files and logging through the `log` facade.

pub mod anonymize;
pub mod batch;
pub mod error;
pub mod layout;
pub mod locate;
pub mod mark;
pub mod model;
pub mod parser;
pub mod subject;

pub use anonymize::anonymize_pupil_names;
pub use batch::{BatchAggregator, BatchOutcome, Rejection, Source};
pub use error::ReportError;
pub use layout::LayoutSpec;
pub use mark::{Mark, MarkValue};
pub use model::{
    sort_chronologically, Attendance, Layout, Pupil, PupilKey, Subject, Summary, TermType,
};
pub use parser::{ParseOptions, ReportParser};
pub use subject::{IgnoreReason, SubjectClassifier};
