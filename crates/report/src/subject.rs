// Subject classification: which marks take part in aggregation, and a
// best-effort canonical name for matching a subject across periods.

use gradebook_config::{IgnoreList, MatchKind};
use serde::Serialize;

/// Marker the platform puts in the name of every elective module.
pub const MODULE_MARKER: &str = "modulis";

pub const INFORMATION_TECHNOLOGY: &str = "Informacinės technologijos";
pub const PHYSICAL_EDUCATION: &str = "Fizinis ugdymas";
pub const TECHNOLOGIES: &str = "Technologijos";

/// Older names the platform still emits for some schools, keyed lower-case.
const COMMON_GENERIC_NAMES: [(&str, &str); 2] = [
    ("informatika", INFORMATION_TECHNOLOGY),
    ("kūno kultūra", PHYSICAL_EDUCATION),
];

/// Subjects that are never graded on the 1–10 scale, whatever the ignore-list says.
const NON_GRADED_SUBJECTS: [(MatchKind, &str); 7] = [
    // informal education
    (MatchKind::Contains, "Neformal"),
    // moral education, both the ethics and the faith track
    (MatchKind::Prefix, "Dorinis ugdymas"),
    // subjects carried over from home schooling
    (MatchKind::Contains, "namuose"),
    (MatchKind::Prefix, "Pilietinė"),
    (MatchKind::Prefix, "Karjeros"),
    // social work counted in hours
    (MatchKind::Prefix, "Socialinė veikla"),
    (MatchKind::Prefix, "Socialinė-pilietinė"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    Module,
    IgnoreList,
    NonGraded,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Module => write!(f, "module"),
            Self::IgnoreList => write!(f, "ignore-list"),
            Self::NonGraded => write!(f, "non-graded"),
        }
    }
}

/// Decides whether a subject's mark is used. Stateless apart from the
/// ignore-list it is built with.
#[derive(Debug, Clone, Default)]
pub struct SubjectClassifier {
    ignore_list: IgnoreList,
}

impl SubjectClassifier {
    pub fn new(ignore_list: IgnoreList) -> Self {
        Self { ignore_list }
    }

    pub fn ignore_list(&self) -> &IgnoreList {
        &self.ignore_list
    }

    pub fn is_module(name: &str) -> bool {
        name.contains(MODULE_MARKER)
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_reason(name).is_some()
    }

    /// First rule that excludes `name`, checked module → list → built-in.
    pub fn ignore_reason(&self, name: &str) -> Option<IgnoreReason> {
        if Self::is_module(name) {
            Some(IgnoreReason::Module)
        } else if self.ignore_list.matches(name) {
            Some(IgnoreReason::IgnoreList)
        } else if is_non_graded(name) {
            Some(IgnoreReason::NonGraded)
        } else {
            None
        }
    }

    /// Canonical display name for cross-period matching.
    ///
    /// Guesswork: only a couple of renames and the technology tracks are
    /// recognized. Independent of the ignore-list.
    pub fn generic_name(name: &str) -> String {
        let cleaned = name.trim().to_lowercase();

        let generic = COMMON_GENERIC_NAMES
            .iter()
            .find(|(alias, _)| *alias == cleaned)
            .map(|(_, canonical)| *canonical)
            .unwrap_or(name);

        let lower = generic.to_lowercase();
        if lower.contains("menas") {
            // "Menas ir amatai" is the boys' technology track
            if lower.contains("amatai") {
                return TECHNOLOGIES.to_string();
            }
            log::debug!("subject '{generic}' is related to either art or technologies");
        }
        // girls' technology track
        if lower.contains("tekstilė") || lower.contains("apranga") {
            return TECHNOLOGIES.to_string();
        }

        generic.to_string()
    }
}

fn is_non_graded(name: &str) -> bool {
    NON_GRADED_SUBJECTS
        .iter()
        .any(|(kind, pattern)| kind.matches(name, pattern))
}
