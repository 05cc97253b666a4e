//! Controlled-vocabulary matching.
//!
//! A value is resolved against the field's vocabulary through a cascade,
//! first hit wins:
//!
//! 1. exact match (case-folded unless case-sensitive)
//! 2. alias table lookup, accepted only if the target is in the vocabulary
//! 3. fuzzy match on Indel similarity, best score at or above the threshold
//! 4. containment either way, best length ratio above 0.3
//!
//! Ties in 3 and 4 go to the entry declared first. With no match, strict
//! fields fail and other fields fall back to their default value.

use fieldnorm_model::{ErrorKind, FieldSpec, LogicalType, MulticlassParams, Outcome};
use rapidfuzz::distance::indel;

use crate::lexicon::collapse_whitespace;
use crate::validator::{FieldValidator, blank_outcome, is_blank};
use crate::vocabulary::{builtin_for, prefixes_for};

const MIN_PARTIAL_RATIO: f64 = 0.3;
const MIN_PARTIAL_CHARS: usize = 3;

/// How a value was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Alias,
    Fuzzy,
    Partial,
}

/// A resolved vocabulary entry with its match score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyMatch<'a> {
    pub entry: &'a str,
    pub kind: MatchKind,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct MulticlassValidator {
    field: String,
    allows_null: bool,
    vocabulary: Vec<String>,
    /// `vocabulary` case-folded, index for index
    folded: Vec<String>,
    /// (folded alias, index into `vocabulary`)
    aliases: Vec<(String, usize)>,
    prefixes: Vec<&'static str>,
    params: MulticlassParams,
    default_value: String,
}

impl MulticlassValidator {
    pub fn new(spec: &FieldSpec, params: &MulticlassParams) -> Self {
        let builtin = builtin_for(&spec.name);

        let mut vocabulary: Vec<String> = Vec::new();
        let declared = params.vocabulary.iter().map(String::as_str);
        let builtin_entries = builtin.into_iter().flat_map(|b| b.entries.iter().copied());
        for entry in declared.chain(builtin_entries) {
            let entry = entry.trim();
            if !entry.is_empty() && !vocabulary.iter().any(|v| v == entry) {
                vocabulary.push(entry.to_string());
            }
        }

        let case_sensitive = params.case_sensitive;
        let declared_aliases = params
            .aliases
            .iter()
            .map(|(alias, target)| (alias.as_str(), target.as_str()));
        let builtin_aliases = builtin.into_iter().flat_map(|b| b.aliases.iter().copied());
        let mut aliases = Vec::new();
        for (alias, target) in declared_aliases.chain(builtin_aliases) {
            let folded = fold(alias.trim(), case_sensitive);
            if aliases.iter().any(|(a, _)| *a == folded) {
                continue;
            }
            match vocabulary.iter().position(|v| v == target.trim()) {
                Some(index) => aliases.push((folded, index)),
                None => tracing::debug!(
                    field = %spec.name,
                    alias,
                    target,
                    "alias target not in vocabulary, ignored"
                ),
            }
        }

        if let Some(builtin) = builtin {
            tracing::debug!(
                field = %spec.name,
                vocabulary = builtin.label,
                entries = vocabulary.len(),
                "attached built-in vocabulary"
            );
        }

        let folded = vocabulary
            .iter()
            .map(|entry| fold(entry, case_sensitive))
            .collect();

        let default_value = params
            .default_value
            .clone()
            .or_else(|| spec.default_value.clone())
            .unwrap_or_default();

        Self {
            field: spec.name.clone(),
            allows_null: spec.allows_null(),
            vocabulary,
            folded,
            aliases,
            prefixes: prefixes_for(&spec.name),
            params: params.clone(),
            default_value,
        }
    }

    /// Entries in match-priority order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Strip administrative prefixes and collapse whitespace.
    fn clean(&self, raw: &str) -> String {
        let mut value = raw.trim();
        for prefix in &self.prefixes {
            if let Some(rest) = value.strip_prefix(prefix) {
                value = rest.trim_start();
                break;
            }
        }
        collapse_whitespace(value)
    }

    /// Resolve a cleaned value against the vocabulary.
    pub fn resolve(&self, cleaned: &str) -> Option<VocabularyMatch<'_>> {
        let case_sensitive = self.params.case_sensitive;
        let input = fold(cleaned, case_sensitive);
        let folded = &self.folded;

        if let Some(index) = folded.iter().position(|entry| *entry == input) {
            return Some(self.matched(index, MatchKind::Exact, 1.0));
        }

        if let Some((_, index)) = self.aliases.iter().find(|(alias, _)| *alias == input) {
            return Some(self.matched(*index, MatchKind::Alias, 1.0));
        }

        if self.params.allow_fuzzy
            && let Some((index, score)) = best_by(folded, |entry| {
                Some(indel::normalized_similarity(input.chars(), entry.chars()))
            })
            && score >= self.params.fuzzy_threshold
        {
            return Some(self.matched(index, MatchKind::Fuzzy, score));
        }

        let input_chars = input.chars().count();
        if self.params.allow_partial && input_chars >= MIN_PARTIAL_CHARS {
            let partial = best_by(folded, |entry| {
                let entry_chars = entry.chars().count();
                let ratio = if entry.contains(input.as_str()) {
                    input_chars as f64 / entry_chars as f64
                } else if input.contains(entry) {
                    entry_chars as f64 / input_chars as f64
                } else {
                    return None;
                };
                (ratio > MIN_PARTIAL_RATIO).then_some(ratio)
            });
            if let Some((index, ratio)) = partial {
                return Some(self.matched(index, MatchKind::Partial, ratio));
            }
        }

        None
    }

    fn matched(&self, index: usize, kind: MatchKind, score: f64) -> VocabularyMatch<'_> {
        VocabularyMatch {
            entry: &self.vocabulary[index],
            kind,
            score,
        }
    }
}

impl FieldValidator for MulticlassValidator {
    fn field_name(&self) -> &str {
        &self.field
    }

    fn logical_type(&self) -> LogicalType {
        LogicalType::Multiclass
    }

    fn validate(&self, raw: &str) -> Outcome {
        if is_blank(raw) {
            return blank_outcome(self.allows_null);
        }
        let cleaned = self.clean(raw);

        if let Some(found) = self.resolve(&cleaned) {
            let note = match found.kind {
                MatchKind::Exact => format!("Exact match found: {}", found.entry),
                MatchKind::Alias => format!("Normalized: {cleaned} -> {}", found.entry),
                MatchKind::Fuzzy => format!(
                    "Fuzzy match found: {cleaned} -> {} (similarity {:.2})",
                    found.entry, found.score
                ),
                MatchKind::Partial => {
                    format!("Partial match found: {cleaned} -> {}", found.entry)
                }
            };
            return Outcome::success(found.entry)
                .with_confidence(found.score)
                .with_note(note);
        }

        if self.params.strict {
            return Outcome::failure(
                ErrorKind::Vocabulary,
                format!("Value \"{cleaned}\" not in controlled vocabulary"),
            );
        }
        Outcome::success(self.default_value.as_str())
            .with_confidence(0.0)
            .with_note(format!("No match found, using default: {}", self.default_value))
    }
}

fn fold(value: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        value.to_string()
    } else {
        value.to_lowercase()
    }
}

/// Index and score of the highest-scoring entry; the earliest wins ties.
fn best_by<F>(entries: &[String], mut score: F) -> Option<(usize, f64)>
where
    F: FnMut(&str) -> Option<f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, entry) in entries.iter().enumerate() {
        let Some(value) = score(entry) else {
            continue;
        };
        if best.is_none_or(|(_, current)| value > current) {
            best = Some((index, value));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldnorm_model::FieldKind;

    fn validator(name: &str, params: MulticlassParams) -> MulticlassValidator {
        let spec = FieldSpec::new(name, FieldKind::Multiclass(params.clone()));
        MulticlassValidator::new(&spec, &params)
    }

    #[test]
    fn declared_entries_come_first() {
        let v = validator(
            "ภาค",
            MulticlassParams::with_vocabulary(["ภาคใต้", "ภาคเหนือ"]),
        );
        assert_eq!(&v.vocabulary()[..3], ["ภาคใต้", "ภาคเหนือ", "ภาคกลางและตะวันตก"]);
        assert_eq!(v.vocabulary().len(), 5);
    }

    #[test]
    fn province_prefix_and_exact() {
        let v = validator("จังหวัดที่เกิดเหตุ", MulticlassParams::default());
        let outcome = v.validate("จ. เชียงใหม่");
        assert_eq!(outcome.processed_value(), Some("เชียงใหม่"));
        assert_eq!(outcome.confidence_score(), Some(1.0));
    }

    #[test]
    fn alias_lookup_is_case_folded() {
        let v = validator("จังหวัดที่เกิดเหตุ", MulticlassParams::default());
        let outcome = v.validate("Bangkok");
        assert_eq!(outcome.processed_value(), Some("กรุงเทพฯ"));
        assert_eq!(outcome.notes(), ["Normalized: Bangkok -> กรุงเทพฯ"]);
    }

    #[test]
    fn exact_match_returns_declared_spelling() {
        let params = MulticlassParams {
            vocabulary: vec!["Heat Stroke".into(), "Heat Cramps".into()],
            allow_fuzzy: false,
            allow_partial: false,
            ..MulticlassParams::default()
        };
        let v = validator("diagnosis", params.clone());
        assert_eq!(v.folded, ["heat stroke", "heat cramps"]);
        let resolved = v.resolve("HEAT CRAMPS").expect("exact match");
        assert_eq!((resolved.entry, resolved.kind), ("Heat Cramps", MatchKind::Exact));

        let strict_case = validator(
            "diagnosis",
            MulticlassParams {
                case_sensitive: true,
                ..params
            },
        );
        assert_eq!(strict_case.folded, ["Heat Stroke", "Heat Cramps"]);
        assert!(strict_case.resolve("HEAT CRAMPS").is_none());
    }

    #[test]
    fn fuzzy_match_for_typos() {
        let v = validator("จังหวัด", MulticlassParams::default());
        let outcome = v.validate("เชียงใหมม");
        assert_eq!(outcome.processed_value(), Some("เชียงใหม่"));
        assert!(outcome.notes()[0].starts_with("Fuzzy match found"));
        assert!(outcome.confidence_score().unwrap_or_default() >= 0.6);
    }

    #[test]
    fn partial_match_picks_highest_ratio() {
        let params = MulticlassParams {
            vocabulary: vec!["heat stroke".into(), "heat".into()],
            allow_fuzzy: false,
            ..MulticlassParams::default()
        };
        let v = validator("diagnosis", params);
        let outcome = v.validate("severe heat stroke case");
        assert_eq!(outcome.processed_value(), Some("heat stroke"));
    }

    #[test]
    fn ties_go_to_first_declared_entry() {
        let params = MulticlassParams {
            vocabulary: vec!["abcx".into(), "abcy".into()],
            ..MulticlassParams::default()
        };
        let v = validator("code", params);
        assert_eq!(v.validate("abcz").processed_value(), Some("abcx"));
    }

    #[test]
    fn default_value_chain() {
        let spec = FieldSpec::new(
            "สถานะ",
            FieldKind::Multiclass(MulticlassParams {
                allow_fuzzy: false,
                allow_partial: false,
                ..MulticlassParams::default()
            }),
        )
        .with_default_value("เสียชีวิต");
        let FieldKind::Multiclass(params) = &spec.kind else {
            unreachable!()
        };
        let outcome = MulticlassValidator::new(&spec, params).validate("???");
        assert_eq!(outcome.processed_value(), Some("เสียชีวิต"));
        assert_eq!(outcome.notes(), ["No match found, using default: เสียชีวิต"]);
    }

    #[test]
    fn strict_mode_rejects() {
        let v = validator(
            "เพศ",
            MulticlassParams::default().with_strict(true).with_default_value("ไม่ระบุ"),
        );
        let outcome = v.validate("qwerty");
        assert!(!outcome.is_valid());
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Vocabulary));
    }
}
