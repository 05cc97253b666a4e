//! Clock time extraction.

use std::sync::LazyLock;

use fieldnorm_model::{ErrorKind, FieldSpec, LogicalType, Outcome};
use regex::{Captures, Regex};

use crate::lexicon::fold_thai_digits;
use crate::validator::{FieldValidator, blank_outcome, is_blank};

/// `H:MM` with optional seconds, then `H.MM`.
static CLOCK_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(\d{1,2}):(\d{2})(?::(\d{2}))?").expect("Invalid colon time regex"),
        Regex::new(r"(\d{1,2})\.(\d{2})").expect("Invalid dotted time regex"),
    ]
});

#[derive(Debug, Clone)]
pub struct TimeProcessor {
    field: String,
    allows_null: bool,
}

impl TimeProcessor {
    pub fn new(spec: &FieldSpec) -> Self {
        Self {
            field: spec.name.clone(),
            allows_null: spec.allows_null(),
        }
    }
}

impl FieldValidator for TimeProcessor {
    fn field_name(&self) -> &str {
        &self.field
    }

    fn logical_type(&self) -> LogicalType {
        LogicalType::Time
    }

    fn validate(&self, raw: &str) -> Outcome {
        if is_blank(raw) {
            return blank_outcome(self.allows_null);
        }
        let text = fold_thai_digits(raw.trim());

        let Some(captures) = CLOCK_PATTERNS
            .iter()
            .find_map(|pattern| pattern.captures(&text))
        else {
            return Outcome::failure(
                ErrorKind::Parse,
                format!("Invalid time format: {}", raw.trim()),
            );
        };

        let matched = captures.get(0).map_or("", |m| m.as_str());
        match clock_components(&captures) {
            Some((hour, minute, second)) if hour <= 23 && minute <= 59 && second <= 59 => {
                Outcome::success(format!("{hour:02}:{minute:02}:{second:02}"))
            }
            _ => Outcome::failure(
                ErrorKind::Parse,
                format!("Time out of range: {matched}"),
            ),
        }
    }
}

fn clock_components(captures: &Captures<'_>) -> Option<(u32, u32, u32)> {
    let part = |index: usize| -> Option<u32> {
        match captures.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    Some((part(1)?, part(2)?, part(3)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldnorm_model::{FieldKind, LogicalType as Lt};

    fn processor() -> TimeProcessor {
        TimeProcessor::new(&FieldSpec::new(
            "เวลาที่เสียชีวิต",
            FieldKind::default_for(Lt::Time),
        ))
    }

    #[test]
    fn pads_components() {
        assert_eq!(processor().validate("9:05").processed_value(), Some("09:05:00"));
        assert_eq!(
            processor().validate("23:59:59").processed_value(),
            Some("23:59:59")
        );
    }

    #[test]
    fn dotted_and_embedded_times() {
        assert_eq!(
            processor().validate("ประมาณ 14.30 น.").processed_value(),
            Some("14:30:00")
        );
        assert_eq!(processor().validate("๐๘:๑๕").processed_value(), Some("08:15:00"));
    }

    #[test]
    fn first_structural_match_decides() {
        let outcome = processor().validate("25:00 or 10.30");
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Parse));
        assert_eq!(outcome.error_message(), Some("Time out of range: 25:00"));
    }

    #[test]
    fn no_clock_pattern() {
        let outcome = processor().validate("ตอนเช้า");
        assert_eq!(outcome.error_message(), Some("Invalid time format: ตอนเช้า"));
    }
}
