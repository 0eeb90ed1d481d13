// `gradebook classify` - preview the subject filters

use gradebook_config::IgnoreList;
use gradebook_report::{IgnoreReason, SubjectClassifier};
use serde::Serialize;

use crate::CliError;

#[derive(Debug, Serialize)]
struct Classification {
    name: String,
    counted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<IgnoreReason>,
    generic_name: String,
}

fn classify(classifier: &SubjectClassifier, name: String) -> Classification {
    let reason = classifier.ignore_reason(&name);
    Classification {
        counted: reason.is_none(),
        reason,
        generic_name: SubjectClassifier::generic_name(&name),
        name,
    }
}

pub fn cmd_classify(names: Vec<String>, json: bool, ignore_list: IgnoreList) -> Result<(), CliError> {
    let classifier = SubjectClassifier::new(ignore_list);
    let results: Vec<_> = names.into_iter().map(|n| classify(&classifier, n)).collect();

    if json {
        let out = serde_json::to_string_pretty(&results)
            .map_err(|e| CliError::io(format!("cannot serialize output: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    for c in &results {
        match c.reason {
            Some(reason) => println!("{}: ignored ({reason})", c.name),
            None if c.generic_name != c.name => println!("{}: counted as {}", c.name, c.generic_name),
            None => println!("{}: counted", c.name),
        }
    }
    Ok(())
}
