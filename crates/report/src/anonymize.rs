// Pseudonymization for sharing parsed results.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{PupilKey, Summary};

const GIVEN_NAMES: [&str; 9] = [
    "Antanas", "Bernardas", "Cezis", "Dainius", "Ernestas", "Henrikas", "Jonas", "Petras", "Tilius",
];

const SURNAMES: [&str; 7] = [
    "Antanivičius",
    "Petraitis",
    "Brazdžionis",
    "Katiliškis",
    "Mickevičius",
    "Juozevičius",
    "Eilėraštinis",
];

/// Copy `summaries` with every pupil renamed to a pseudonym.
///
/// The same pupil (by [`PupilKey`]) gets the same pseudonym in every
/// summary, and no two pupils share one. Pseudonyms keep the export's
/// surname-first order. Once the name pool is used up, the surname gets a
/// round number ("Petraitis2 Jonas").
pub fn anonymize_pupil_names<R: Rng + ?Sized>(summaries: &[Summary], rng: &mut R) -> Vec<Summary> {
    let mut pool: Vec<(&str, &str)> = SURNAMES
        .iter()
        .flat_map(|&surname| GIVEN_NAMES.iter().map(move |&given| (surname, given)))
        .collect();
    pool.shuffle(rng);

    let mut pseudonyms: HashMap<PupilKey, String> = HashMap::new();
    let mut out = summaries.to_vec();

    for summary in &mut out {
        for pupil in &mut summary.pupils {
            let next = pseudonyms.len();
            let pseudonym = pseudonyms.entry(pupil.key()).or_insert_with(|| {
                let (surname, given) = pool[next % pool.len()];
                match next / pool.len() {
                    0 => format!("{surname} {given}"),
                    round => format!("{surname}{} {given}", round + 1),
                }
            });
            pupil.name = pseudonym.clone();
        }
    }

    log::debug!("anonymized {} pupils across {} summaries", pseudonyms.len(), out.len());
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::mark::Mark;
    use crate::model::{Attendance, Layout, Pupil};

    fn summary(names: &[&str]) -> Summary {
        Summary {
            layout: Layout::Period,
            grade_name: "5a".into(),
            group_name: None,
            term_start: NaiveDate::from_ymd_opt(2021, 9, 1).unwrap(),
            term_end: NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(),
            term_type: None,
            pupils: names
                .iter()
                .map(|n| Pupil {
                    name: n.to_string(),
                    subjects: Vec::new(),
                    average: Mark::absent(),
                    attendance: Attendance::default(),
                })
                .collect(),
        }
    }

    #[test]
    fn same_pupil_same_pseudonym_across_summaries() {
        let input = vec![
            summary(&["Jonaitis Jonas", "Petraitė Ona"]),
            summary(&["Petraitė  Ona", "Jonaitis Jonas", "Kazlauskas Tomas"]),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let out = anonymize_pupil_names(&input, &mut rng);

        assert_eq!(out[0].pupils[0].name, out[1].pupils[1].name);
        assert_eq!(out[0].pupils[1].name, out[1].pupils[0].name);
        assert_ne!(out[0].pupils[0].name, out[0].pupils[1].name);

        // input untouched
        assert_eq!(input[0].pupils[0].name, "Jonaitis Jonas");
        for pupil in out.iter().flat_map(|s| &s.pupils) {
            assert!(SURNAMES.iter().any(|s| pupil.name.starts_with(s)), "{}", pupil.name);
        }
    }

    #[test]
    fn pseudonyms_stay_unique_past_the_pool() {
        let names: Vec<String> = (0..80).map(|i| format!("Mokinys {i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let out = anonymize_pupil_names(&[summary(&refs)], &mut rng);

        let unique: HashSet<_> = out[0].pupils.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(unique.len(), 80);

        // 63 names in the pool: the rest reuse it with a numbered surname
        let overflow = &out[0].pupils[63..];
        for pupil in overflow {
            let sane = pupil.sane_name();
            assert!(GIVEN_NAMES.iter().any(|g| sane.starts_with(g)), "{sane}");
            assert!(sane.ends_with('2'), "{sane}");
        }
    }
}
