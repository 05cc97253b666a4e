//! Date parsing with Thai month names and Buddhist-era years.
//!
//! Input goes through a fixed sequence of strategies, first success wins:
//!
//! 1. month name (Thai full names, then abbreviations and English names)
//! 2. the explicit numeric formats in [`FORMATS`], in order
//! 3. a permutation fallback over exactly three numerals
//!
//! Years above the Buddhist-era cutoff have 543 subtracted before the
//! calendar date is built. Output is always `YYYY-MM-DD`.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use fieldnorm_model::{DateParams, ErrorKind, FieldSpec, LogicalType, Outcome};
use regex::Regex;

use crate::lexicon::{MONTH_ALIASES, THAI_MONTHS, fold_thai_digits, thai_month_name};
use crate::validator::{FieldValidator, blank_outcome, is_blank};

static DATE_LABELS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"วันที่|ว/ด/ป|เมื่อ").expect("Invalid date label regex"));

static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,\s]+").expect("Invalid separator regex"));

static DIGIT_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid digit run regex"));

const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Two-digit years below this are read as 20xx, the rest as 19xx.
const CENTURY_PIVOT: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Day,
    Month,
    /// Four-digit year (`%Y`).
    Year,
    /// Two-digit year (`%y`).
    ShortYear,
}

/// An explicit numeric date format.
#[derive(Debug, Clone, Copy)]
pub struct DateFormat {
    pattern: &'static str,
    separator: char,
    order: [Component; 3],
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern)
    }
}

use Component::{Day, Month, ShortYear, Year};

/// Explicit formats, tried in order.
pub const FORMATS: [DateFormat; 8] = [
    DateFormat {
        pattern: "%m/%d/%Y",
        separator: '/',
        order: [Month, Day, Year],
    },
    DateFormat {
        pattern: "%d/%m/%Y",
        separator: '/',
        order: [Day, Month, Year],
    },
    DateFormat {
        pattern: "%Y/%m/%d",
        separator: '/',
        order: [Year, Month, Day],
    },
    DateFormat {
        pattern: "%m-%d-%Y",
        separator: '-',
        order: [Month, Day, Year],
    },
    DateFormat {
        pattern: "%d-%m-%Y",
        separator: '-',
        order: [Day, Month, Year],
    },
    DateFormat {
        pattern: "%Y-%m-%d",
        separator: '-',
        order: [Year, Month, Day],
    },
    DateFormat {
        pattern: "%m/%d/%y",
        separator: '/',
        order: [Month, Day, ShortYear],
    },
    DateFormat {
        pattern: "%d/%m/%y",
        separator: '/',
        order: [Day, Month, ShortYear],
    },
];

/// Successfully parsed date plus a note describing how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDate {
    pub date: NaiveDate,
    pub note: String,
}

#[derive(Debug, Clone)]
pub struct DateProcessor {
    field: String,
    allows_null: bool,
    params: DateParams,
    today: Option<NaiveDate>,
}

impl DateProcessor {
    pub fn new(spec: &FieldSpec, params: &DateParams) -> Self {
        Self {
            field: spec.name.clone(),
            allows_null: spec.allows_null(),
            params: params.clone(),
            today: None,
        }
    }

    /// Fix the reference date used by the future-date check.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Thai month name of a date given as ISO text or any parseable form.
    pub fn extract_month_name(&self, value: &str) -> Option<&'static str> {
        let value = value.trim();
        let date = match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => self.parse(value).ok()?.date,
        };
        thai_month_name(date.month())
    }

    /// Parse without range checks.
    ///
    /// The error carries a note naming the cleaned input.
    pub fn parse(&self, raw: &str) -> Result<ParsedDate, String> {
        let cleaned = clean(raw);
        if let Some(parsed) = self.parse_month_name(&cleaned) {
            return Ok(parsed);
        }
        if let Some(parsed) = self.parse_formats(&cleaned) {
            return Ok(parsed);
        }
        if let Some(parsed) = self.parse_permutations(&cleaned) {
            return Ok(parsed);
        }
        Err(format!("No matching date format found for: {cleaned}"))
    }

    fn gregorian_year(&self, year: i32) -> (i32, bool) {
        if year > self.params.buddhist_era_cutoff {
            (year - BUDDHIST_ERA_OFFSET, true)
        } else {
            (year, false)
        }
    }

    fn parse_month_name(&self, cleaned: &str) -> Option<ParsedDate> {
        let (month, matched) = find_month(cleaned)?;
        let numbers = digit_runs(cleaned);
        if numbers.len() < 2 {
            return None;
        }
        let day = u32::try_from(numbers[0]).ok()?;
        let (year, converted) = self.gregorian_year(numbers[1]);
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let mut note = format!("Parsed Thai month format with {matched}");
        if converted {
            note.push_str(&format!(", converted Buddhist year {} to Gregorian {year}", numbers[1]));
        }
        Some(ParsedDate { date, note })
    }

    fn parse_formats(&self, cleaned: &str) -> Option<ParsedDate> {
        FORMATS
            .iter()
            .find_map(|format| self.parse_with(format, cleaned))
    }

    fn parse_with(&self, format: &DateFormat, cleaned: &str) -> Option<ParsedDate> {
        let parts: Vec<&str> = cleaned.split(format.separator).collect();
        if parts.len() != 3 {
            return None;
        }

        let (mut day, mut month, mut year) = (0u32, 0u32, 0i32);
        let mut short_year = false;
        for (component, part) in format.order.iter().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            match component {
                Day | Month if part.len() > 2 => return None,
                Year if part.len() != 4 => return None,
                ShortYear if part.len() != 2 => return None,
                _ => {}
            }
            let value: u32 = part.parse().ok()?;
            match component {
                Day => day = value,
                Month => month = value,
                Year => year = i32::try_from(value).ok()?,
                ShortYear => {
                    short_year = true;
                    year = i32::try_from(value).ok()?;
                }
            }
        }
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }

        let (year, note) = if short_year {
            let century = if year < CENTURY_PIVOT { 2000 } else { 1900 };
            (century + year, format!("Parsed with format {format}"))
        } else {
            let (gregorian, converted) = self.gregorian_year(year);
            let note = if converted {
                format!(
                    "Parsed {format}, converted Buddhist year {year} to Gregorian {gregorian}"
                )
            } else {
                format!("Parsed with format {format}")
            };
            (gregorian, note)
        };

        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(ParsedDate { date, note })
    }

    fn parse_permutations(&self, cleaned: &str) -> Option<ParsedDate> {
        let numbers = digit_runs(cleaned);
        let [a, b, c] = numbers[..] else {
            return None;
        };
        // (month, day, year)
        let candidates = [(a, b, c), (b, a, c), (b, c, a)];
        candidates.into_iter().find_map(|(month, day, year)| {
            let year = if year > self.params.buddhist_era_cutoff {
                year - BUDDHIST_ERA_OFFSET
            } else if year < 100 {
                if year < CENTURY_PIVOT {
                    year + 2000
                } else {
                    year + 1900
                }
            } else {
                year
            };
            if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
                return None;
            }
            let date =
                NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)?;
            Some(ParsedDate {
                date,
                note: format!("Alternative parsing: {month}/{day}/{year}"),
            })
        })
    }
}

impl FieldValidator for DateProcessor {
    fn field_name(&self) -> &str {
        &self.field
    }

    fn logical_type(&self) -> LogicalType {
        LogicalType::Date
    }

    fn validate(&self, raw: &str) -> Outcome {
        if is_blank(raw) {
            return blank_outcome(self.allows_null);
        }
        let parsed = match self.parse(raw) {
            Ok(parsed) => parsed,
            Err(note) => {
                return Outcome::failure(
                    ErrorKind::Parse,
                    format!("Unable to parse date: {}", raw.trim()),
                )
                .with_note(note);
            }
        };

        let iso = parsed.date.format("%Y-%m-%d").to_string();
        let year = parsed.date.year();
        if year < self.params.min_year || year > self.params.max_year {
            return Outcome::failure(
                ErrorKind::Range,
                format!(
                    "Date {iso} outside valid range ({}-{})",
                    self.params.min_year, self.params.max_year
                ),
            );
        }
        if !self.params.allow_future_dates && parsed.date > self.today() {
            return Outcome::failure(ErrorKind::Range, format!("Future date not allowed: {iso}"));
        }

        Outcome::success(iso).with_note(parsed.note)
    }
}

/// Strip labels, fold digits and turn separator runs into `/`.
fn clean(raw: &str) -> String {
    let without_labels = DATE_LABELS.replace_all(raw.trim(), "");
    let folded = fold_thai_digits(without_labels.trim());
    let slashed = SEPARATOR_RUNS.replace_all(&folded, "/");
    slashed.trim_matches('/').to_string()
}

fn digit_runs(cleaned: &str) -> Vec<i32> {
    DIGIT_RUNS
        .find_iter(cleaned)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Month number and the spelling that matched.
///
/// Aliases are compared with separators removed on both sides, so `ก.ค.`
/// still matches after cleaning turned it into `ก/ค`.
fn find_month(cleaned: &str) -> Option<(u32, &'static str)> {
    for (index, name) in THAI_MONTHS.iter().enumerate() {
        if cleaned.contains(name) {
            return Some((index as u32 + 1, name));
        }
    }
    let compact = compact(cleaned);
    MONTH_ALIASES
        .iter()
        .find(|(alias, _)| compact.contains(&compact_alias(alias)))
        .map(|(alias, month)| (*month, *alias))
}

fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '/' | '.' | '-') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn compact_alias(alias: &str) -> String {
    alias
        .chars()
        .filter(|c| *c != '.')
        .flat_map(char::to_lowercase)
        .collect()
}
