//! Date extraction for French administrative texts.

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, DATE_FRENCH_LONG, DATE_YMD};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
///
/// Patterns are tried in order (long French form, then `dd/mm/yyyy`, then
/// ISO); within one pattern, occurrences are reported in text order and
/// impossible calendar dates are skipped.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        // "10 janvier 2024", "1er mars 2023"
        for caps in DATE_FRENCH_LONG.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month = french_month_to_number(&caps[2]);
            let year: i32 = caps[3].parse().unwrap_or(0);
            push_date(&mut results, 0, NaiveDate::from_ymd_opt(year, month, day), &caps);
        }

        // DD/MM/YYYY, DD.MM.YYYY or DD-MM-YYYY
        for caps in DATE_DMY.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let year: i32 = caps[3].parse().unwrap_or(0);
            push_date(&mut results, 1, NaiveDate::from_ymd_opt(year, month, day), &caps);
        }

        // YYYY-MM-DD
        for caps in DATE_YMD.captures_iter(text) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);
            push_date(&mut results, 2, NaiveDate::from_ymd_opt(year, month, day), &caps);
        }

        results
    }
}

fn push_date(
    results: &mut Vec<ExtractionMatch<NaiveDate>>,
    pattern_index: usize,
    date: Option<NaiveDate>,
    caps: &regex::Captures<'_>,
) {
    let Some(date) = date else {
        return;
    };
    if results.iter().any(|r| r.value == date) {
        return;
    }
    if let Some(full_match) = caps.get(0) {
        results.push(
            ExtractionMatch::new(date, pattern_index, full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        );
    }
}

/// Extract the first date of a text, normalized to ISO `yyyy-mm-dd`.
pub fn extract_date(text: &str) -> Option<String> {
    DateExtractor::new()
        .extract(text)
        .map(|m| m.value.format("%Y-%m-%d").to_string())
}

fn french_month_to_number(month: &str) -> u32 {
    match month.to_lowercase().as_str() {
        "janvier" => 1,
        "février" | "fevrier" => 2,
        "mars" => 3,
        "avril" => 4,
        "mai" => 5,
        "juin" => 6,
        "juillet" => 7,
        "août" | "aout" => 8,
        "septembre" => 9,
        "octobre" => 10,
        "novembre" => 11,
        "décembre" | "decembre" => 12,
        _ => 0,
    }
}
