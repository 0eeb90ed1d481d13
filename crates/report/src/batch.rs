// Batch aggregation.
//
// Files are parsed strictly in input order. A failing file becomes a
// rejection and the batch moves on; nothing raises past file granularity.
// Survivors then pass the cross-file filters in a fixed order: annual
// reports (semester), duplicate periods, incomplete periods (period).

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use gradebook_io::{GridError, SheetGrid};
use serde::Serialize;

use crate::error::ReportError;
use crate::layout::LayoutSpec;
use crate::model::{Layout, Summary};
use crate::parser::{ParseOptions, ReportParser};

/// One report to parse: a file on disk or bytes already in memory.
#[derive(Debug, Clone)]
pub enum Source {
    Path(PathBuf),
    Bytes { name: String, data: Vec<u8> },
}

impl Source {
    /// File name used in rejections and log lines.
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Bytes { name, .. } => name.clone(),
        }
    }

    fn open(self) -> Result<SheetGrid, GridError> {
        match self {
            Self::Path(path) => SheetGrid::open(&path),
            Self::Bytes { data, .. } => SheetGrid::from_bytes(data),
        }
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub file: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    /// Survivors in input order
    pub accepted: Vec<Summary>,
    pub rejected: Vec<Rejection>,
}

impl BatchOutcome {
    /// Zero summaries survived. Callers report this as its own condition,
    /// not as an empty success.
    pub fn nothing_usable(&self) -> bool {
        self.accepted.is_empty()
    }
}

/// Why a parsed report was dropped by a cross-file filter.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FilterReason {
    Annual,
    Duplicate(String),
    MissingAverage(String),
}

impl std::fmt::Display for FilterReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Annual => write!(f, "annual reports cannot be compared with term reports"),
            Self::Duplicate(label) => write!(f, "a report for {label} was already loaded"),
            Self::MissingAverage(pupil) => write!(
                f,
                "pupil '{pupil}' has no average mark; the period is too incomplete to use"
            ),
        }
    }
}

pub struct BatchAggregator {
    spec: LayoutSpec,
    options: ParseOptions,
}

impl BatchAggregator {
    pub fn new(layout: Layout, options: ParseOptions) -> Self {
        Self { spec: LayoutSpec::for_layout(layout), options }
    }

    pub fn layout(&self) -> Layout {
        self.spec.layout
    }

    /// Parse a single source with this aggregator's layout. No filters.
    pub fn parse_source(&self, source: Source) -> Result<Summary, ReportError> {
        let grid = source.open()?;
        ReportParser::with_spec(grid, self.spec.clone(), self.options).parse()
    }

    pub fn run<I>(&self, sources: I) -> BatchOutcome
    where
        I: IntoIterator,
        I::Item: Into<Source>,
    {
        let layout = self.spec.layout;
        let mut outcome = BatchOutcome::default();
        let mut seen_periods = HashSet::new();

        for source in sources {
            let source = source.into();
            let name = source.name();

            let started = Instant::now();
            let parsed = self.parse_source(source);
            log::debug!("{name}: parsed as {layout} in {:.3}s", started.elapsed().as_secs_f64());

            let summary = match parsed {
                Ok(summary) => summary,
                Err(e) => {
                    match &e {
                        ReportError::UnrecognizedMarkToken(token) => {
                            log::error!("{name}: unknown mark encoding {token:?} ({e:?})")
                        }
                        _ => log::error!("{name}: {e}"),
                    }
                    outcome.rejected.push(Rejection { file: name, reason: e.to_string() });
                    continue;
                }
            };

            if let Some(reason) = self.filter(&summary, &seen_periods) {
                log::warn!("{name}: {reason}");
                outcome.rejected.push(Rejection { file: name, reason: reason.to_string() });
                continue;
            }

            seen_periods.insert(summary.representable_name());
            outcome.accepted.push(summary);
        }

        if outcome.nothing_usable() {
            log::error!("no usable {layout} reports were found");
        }
        log::debug!(
            "{layout} batch: {} accepted, {} rejected",
            outcome.accepted.len(),
            outcome.rejected.len()
        );
        outcome
    }

    fn filter(&self, summary: &Summary, seen_periods: &HashSet<String>) -> Option<FilterReason> {
        let layout = self.spec.layout;

        if layout == Layout::Semester && summary.term_type.is_some_and(|t| t.is_annual()) {
            return Some(FilterReason::Annual);
        }

        let label = summary.representable_name();
        if seen_periods.contains(&label) {
            return Some(FilterReason::Duplicate(label.replace('\n', " ")));
        }

        if layout == Layout::Period {
            if let Some(pupil) = summary.pupils.iter().find(|p| p.average.is_absent()) {
                return Some(FilterReason::MissingAverage(pupil.name.clone()));
            }
        }

        None
    }
}
