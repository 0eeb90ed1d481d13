// `gradebook parse` - run one batch and print what survived

use std::path::PathBuf;

use gradebook_config::{IgnoreList, Settings};
use gradebook_report::{
    anonymize_pupil_names, sort_chronologically, BatchAggregator, BatchOutcome, IgnoreReason,
    Layout, MarkValue, ParseOptions, Pupil, Rejection, SubjectClassifier, Summary,
};
use serde::Serialize;

use crate::exit_codes::EXIT_NOTHING_USABLE;
use crate::CliError;

pub struct ParseArgs {
    pub json: bool,
    pub sort: bool,
    pub anonymize: bool,
    pub no_subjects: bool,
}

#[derive(Serialize)]
struct ParseReport<'a> {
    layout: Layout,
    accepted: &'a [Summary],
    rejected: &'a [Rejection],
    ignored_subjects: Vec<IgnoredSubject>,
}

#[derive(Debug, Serialize, PartialEq)]
struct IgnoredSubject {
    name: String,
    reason: IgnoreReason,
}

pub fn cmd_parse(
    layout: Layout,
    files: Vec<PathBuf>,
    args: ParseArgs,
    settings: &Settings,
    ignore_list: IgnoreList,
) -> Result<(), CliError> {
    let mut options = ParseOptions::from(settings);
    if args.no_subjects {
        options.fetch_subjects = false;
    }

    let BatchOutcome { mut accepted, rejected } = BatchAggregator::new(layout, options).run(files);

    if args.sort {
        sort_chronologically(&mut accepted);
    }
    if args.anonymize {
        accepted = anonymize_pupil_names(&accepted, &mut rand::thread_rng());
    }

    let classifier = SubjectClassifier::new(ignore_list);
    let ignored = ignored_subjects(&accepted, &classifier);

    for r in &rejected {
        eprintln!("skipped {}: {}", r.file, r.reason);
    }

    if args.json {
        let report = ParseReport {
            layout,
            accepted: &accepted,
            rejected: &rejected,
            ignored_subjects: ignored,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::io(format!("cannot serialize output: {e}")))?;
        println!("{json}");
    } else {
        for (i, summary) in accepted.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print_summary(summary, &classifier);
        }
    }

    if accepted.is_empty() {
        return Err(CliError::new(EXIT_NOTHING_USABLE, "no usable reports were found")
            .with_hint(format!("check that the files are {layout} reports with finalized marks")));
    }
    Ok(())
}

/// Distinct subject names across all summaries that the classifier drops,
/// in first-seen order.
fn ignored_subjects(summaries: &[Summary], classifier: &SubjectClassifier) -> Vec<IgnoredSubject> {
    let mut out: Vec<IgnoredSubject> = Vec::new();
    for name in summaries.iter().flat_map(subject_names) {
        if out.iter().any(|s| s.name == name) {
            continue;
        }
        if let Some(reason) = classifier.ignore_reason(&name) {
            out.push(IgnoredSubject { name, reason });
        }
    }
    out
}

fn subject_names(summary: &Summary) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for subject in summary.pupils.iter().flat_map(|p| &p.subjects) {
        if !names.contains(&subject.name) {
            names.push(subject.name.clone());
        }
    }
    names
}

fn print_summary(summary: &Summary, classifier: &SubjectClassifier) {
    println!("{}", summary.representable_name().replace('\n', " "));
    match &summary.group_name {
        Some(group) => println!("  grade:   {} (group {group})", summary.grade_name),
        None => println!("  grade:   {}", summary.grade_name),
    }
    println!("  period:  {}", summary.full_representable_name());

    let (counted, ignored): (Vec<_>, Vec<_>) = subject_names(summary)
        .into_iter()
        .partition(|name| !classifier.is_ignored(name));
    if !counted.is_empty() {
        let generic: Vec<_> = counted.iter().map(|n| SubjectClassifier::generic_name(n)).collect();
        println!("  subjects: {}", generic.join(", "));
    }
    if !ignored.is_empty() {
        println!("  ignored:  {}", ignored.join(", "));
    }

    println!("  pupils:  {}", summary.pupils.len());
    for pupil in &summary.pupils {
        println!("    {}", pupil_line(pupil));
    }
}

fn pupil_line(pupil: &Pupil) -> String {
    let a = pupil.attendance;
    format!(
        "{:<30} average {:>5}  missed {} (illness {}, other {}, unexcused {})",
        pupil.sane_name(),
        mark_text(pupil.average.value),
        a.total_missed,
        a.excused_illness,
        a.excused_other,
        a.unexcused,
    )
}

fn mark_text(value: MarkValue) -> String {
    match value {
        MarkValue::Numeric(n) => format!("{n:.2}"),
        MarkValue::Binary(true) => "įsk".to_string(),
        MarkValue::Binary(false) => "nsk".to_string(),
        MarkValue::Absent => "-".to_string(),
    }
}
