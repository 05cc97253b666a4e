//! Thai and English word tables shared by the validators.

use std::borrow::Cow;

/// Thai month names, January first.
pub const THAI_MONTHS: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

/// Abbreviations and English names mapped to month numbers.
///
/// Longer spellings of the same month come first so that "January" is
/// consumed whole rather than as "Jan".
pub const MONTH_ALIASES: &[(&str, u32)] = &[
    ("ม.ค.", 1),
    ("มค", 1),
    ("January", 1),
    ("Jan", 1),
    ("ก.พ.", 2),
    ("กพ", 2),
    ("February", 2),
    ("Feb", 2),
    ("มี.ค.", 3),
    ("มีค", 3),
    ("March", 3),
    ("Mar", 3),
    ("เม.ย.", 4),
    ("เมย", 4),
    ("April", 4),
    ("Apr", 4),
    ("พ.ค.", 5),
    ("พค", 5),
    ("May", 5),
    ("มิ.ย.", 6),
    ("มิย", 6),
    ("June", 6),
    ("Jun", 6),
    ("ก.ค.", 7),
    ("กค", 7),
    ("July", 7),
    ("Jul", 7),
    ("ส.ค.", 8),
    ("สค", 8),
    ("August", 8),
    ("Aug", 8),
    ("ก.ย.", 9),
    ("กย", 9),
    ("September", 9),
    ("Sep", 9),
    ("ต.ค.", 10),
    ("ตค", 10),
    ("October", 10),
    ("Oct", 10),
    ("พ.ย.", 11),
    ("พย", 11),
    ("November", 11),
    ("Nov", 11),
    ("ธ.ค.", 12),
    ("ธค", 12),
    ("December", 12),
    ("Dec", 12),
];

const THAI_NUMBER_WORDS: &[(&str, i64)] = &[
    ("หนึ่ง", 1),
    ("สอง", 2),
    ("สาม", 3),
    ("สี่", 4),
    ("ห้า", 5),
    ("หก", 6),
    ("เจ็ด", 7),
    ("แปด", 8),
    ("เก้า", 9),
    ("สิบ", 10),
];

const ENGLISH_NUMBER_WORDS: &[(&str, i64)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

/// Thai month name for a month number (1-12).
pub fn thai_month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    THAI_MONTHS.get(index).copied()
}

/// Replace Thai digits (U+0E50..U+0E59) with ASCII digits.
pub fn fold_thai_digits(value: &str) -> Cow<'_, str> {
    if !value.chars().any(is_thai_digit) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .chars()
            .map(|c| {
                if is_thai_digit(c) {
                    char::from(b'0' + (u32::from(c) - 0x0E50) as u8)
                } else {
                    c
                }
            })
            .collect(),
    )
}

fn is_thai_digit(c: char) -> bool {
    ('\u{0E50}'..='\u{0E59}').contains(&c)
}

/// Translate the first number word in `value`.
///
/// Thai words are matched as substrings since Thai is written without
/// spaces; English words must stand alone.
pub fn number_word_value(value: &str) -> Option<i64> {
    let thai = THAI_NUMBER_WORDS
        .iter()
        .filter_map(|(word, number)| value.find(word).map(|pos| (pos, word.len(), *number)))
        .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    if let Some((_, _, number)) = thai {
        return Some(number);
    }

    let lower = value.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .find_map(|token| {
            ENGLISH_NUMBER_WORDS
                .iter()
                .find(|(word, _)| *word == token)
                .map(|(_, number)| *number)
        })
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
