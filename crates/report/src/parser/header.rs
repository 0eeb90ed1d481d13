// Header cell formats: labels, school-year periods, date ranges and the
// "MM\nDD" mark dates of group reports.

use chrono::{Datelike, NaiveDate};

use crate::model::TermType;

const DATE_FORMAT: &str = "%Y-%m-%d";
const RANGE_SEPARATOR: &str = " - ";

/// Length of the "2021m.m." chunk between the end year and the term name.
const SCHOOL_YEAR_PREFIX: usize = 8;

/// Value part of a "Label: value" cell, without trailing commas or spaces.
/// Cells without a label are returned trimmed.
pub(crate) fn strip_label(text: &str) -> &str {
    let value = text.split_once(':').map_or(text, |(_, value)| value);
    value
        .trim_start()
        .trim_end_matches(|c: char| c == ',' || c.is_whitespace())
}

/// "Laikotarpis: 2020-2021m.m.II pusmetis" → Jan 1 2020, Jan 1 2021, II half-year.
pub(crate) fn parse_school_year(text: &str) -> Option<(NaiveDate, NaiveDate, TermType)> {
    let value = strip_label(text);
    let (start_year, rest) = value.split_once('-')?;
    let start_year: i32 = start_year.trim().parse().ok()?;
    let end_year: i32 = rest.get(..4)?.parse().ok()?;
    let term = TermType::parse(rest.get(SCHOOL_YEAR_PREFIX..)?)?;

    Some((
        NaiveDate::from_ymd_opt(start_year, 1, 1)?,
        NaiveDate::from_ymd_opt(end_year, 1, 1)?,
        term,
    ))
}

/// "2021-09-01 - 2021-12-31", inclusive on both ends.
pub(crate) fn parse_date_range(text: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (start, end) = text.trim().split_once(RANGE_SEPARATOR)?;
    let start = NaiveDate::parse_from_str(start.trim(), DATE_FORMAT).ok()?;
    let end = NaiveDate::parse_from_str(end.trim(), DATE_FORMAT).ok()?;
    Some((start, end))
}

/// "09\n15" → (9, 15). A dash works as the separator too.
pub(crate) fn parse_month_day(text: &str) -> Option<(u32, u32)> {
    let (month, day) = text.trim().split_once(['\n', '-'])?;
    Some((month.trim().parse().ok()?, day.trim().parse().ok()?))
}

/// The export omits the year on mark dates. Take it from the period start,
/// rolling into the next year for dates that would fall before the start.
pub(crate) fn resolve_mark_date(month: u32, day: u32, period_start: NaiveDate) -> Option<NaiveDate> {
    let year = period_start.year();
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) if date >= period_start => Some(date),
        // Feb 29 may only exist in the following year.
        _ => NaiveDate::from_ymd_opt(year + 1, month, day),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn labels() {
        assert_eq!(strip_label("Klasė: 5"), "5");
        assert_eq!(strip_label("Klasė: 5a, "), "5a");
        assert_eq!(strip_label("  7b "), "7b");
    }

    #[test]
    fn school_year_periods() {
        assert_eq!(
            parse_school_year("Laikotarpis: 2020-2021m.m.II pusmetis"),
            Some((date(2020, 1, 1), date(2021, 1, 1), TermType::HalfYear(2)))
        );
        assert_eq!(
            parse_school_year("Laikotarpis: 2019-2020m.m.III"),
            Some((date(2019, 1, 1), date(2020, 1, 1), TermType::Trimester(3)))
        );
        assert_eq!(
            parse_school_year("Laikotarpis: 2020-2021m.m.metinis"),
            Some((date(2020, 1, 1), date(2021, 1, 1), TermType::Annual))
        );
        assert_eq!(parse_school_year("Laikotarpis: 2020"), None);
        assert_eq!(parse_school_year("Laikotarpis: 2020-2021m.m.ketvirtis"), None);
    }

    #[test]
    fn date_ranges() {
        assert_eq!(
            parse_date_range("2021-09-01 - 2021-12-31"),
            Some((date(2021, 9, 1), date(2021, 12, 31)))
        );
        assert_eq!(parse_date_range("2021-09-01"), None);
        assert_eq!(parse_date_range("2021-13-01 - 2021-12-31"), None);
    }

    #[test]
    fn mark_dates_roll_over_the_new_year() {
        assert_eq!(parse_month_day("09\n15"), Some((9, 15)));
        assert_eq!(parse_month_day("01-10"), Some((1, 10)));
        assert_eq!(parse_month_day("Vidurkis"), None);

        let start = date(2021, 9, 1);
        assert_eq!(resolve_mark_date(9, 15, start), Some(date(2021, 9, 15)));
        assert_eq!(resolve_mark_date(1, 10, start), Some(date(2022, 1, 10)));
        assert_eq!(resolve_mark_date(2, 30, start), None);
    }

    #[test]
    fn leap_day_in_the_following_year() {
        let start = date(2023, 9, 1);
        assert_eq!(resolve_mark_date(2, 29, start), Some(date(2024, 2, 29)));
        assert_eq!(resolve_mark_date(2, 29, date(2024, 1, 1)), Some(date(2024, 2, 29)));
        assert_eq!(resolve_mark_date(2, 29, date(2022, 9, 1)), None);
    }
}
