//! Extraction hits and their materialization into per-field values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::convert::{ConverterRegistry, Value};
use crate::pattern::Pattern;

/// Known-correct field values for a document, as plain strings.
pub type KnownValues = BTreeMap<String, String>;

/// One successful (pattern, value) match.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Position of the originating pattern in the store.
    pub pattern_index: usize,
    /// Snapshot of the pattern at extraction time.
    pub pattern: Pattern,
    pub page_number: usize,
    pub value: Value,
    /// The regex match the value was converted from.
    pub matched_text: String,
}

impl Hit {
    pub fn field(&self) -> &str {
        self.pattern.metadata_field()
    }
}

/// How to choose one value when several hits target the same field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum HitPolicy {
    /// The first hit in walk order.
    First,
    /// The last hit in walk order.
    Last,
    /// The hit whose pattern ranks best; earliest on ties.
    #[default]
    BestRanked,
    /// The value produced by the most hits; earliest on ties.
    MostFrequent,
}

impl HitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            HitPolicy::First => "first",
            HitPolicy::Last => "last",
            HitPolicy::BestRanked => "best-ranked",
            HitPolicy::MostFrequent => "most-frequent",
        }
    }
}

impl fmt::Display for HitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(HitPolicy::First),
            "last" => Ok(HitPolicy::Last),
            "best-ranked" => Ok(HitPolicy::BestRanked),
            "most-frequent" => Ok(HitPolicy::MostFrequent),
            other => Err(format!(
                "unknown hit policy '{other}' (expected first, last, best-ranked or most-frequent)"
            )),
        }
    }
}

/// All hits produced for one document, in walk order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResult {
    pub doc_id: Option<String>,
    pub hits: Vec<Hit>,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn hits_for<'a>(&'a self, field: &str) -> impl Iterator<Item = &'a Hit> {
        self.hits.iter().filter(move |hit| hit.field() == field)
    }

    /// Pick one hit for `field` according to `policy`.
    pub fn best_hit(&self, field: &str, policy: HitPolicy) -> Option<&Hit> {
        let mut hits = self.hits_for(field);
        match policy {
            HitPolicy::First => hits.next(),
            HitPolicy::Last => hits.last(),
            HitPolicy::BestRanked => hits.fold(None, |best: Option<&Hit>, hit| match best {
                Some(b) if !hit.pattern.rank(&b.pattern).is_lt() => Some(b),
                _ => Some(hit),
            }),
            HitPolicy::MostFrequent => {
                let hits: Vec<&Hit> = hits.collect();
                let mut best: Option<(&Hit, usize)> = None;
                for &hit in &hits {
                    let count = hits.iter().filter(|h| h.value == hit.value).count();
                    if best.is_none_or(|(_, c)| count > c) {
                        best = Some((hit, count));
                    }
                }
                best.map(|(hit, _)| hit)
            }
        }
    }

    /// One value per field that has at least one hit.
    pub fn best_values(&self, policy: HitPolicy) -> BTreeMap<String, Value> {
        let mut fields: Vec<&str> = self.hits.iter().map(Hit::field).collect();
        fields.sort_unstable();
        fields.dedup();
        fields
            .into_iter()
            .filter_map(|field| {
                self.best_hit(field, policy)
                    .map(|hit| (field.to_string(), hit.value.clone()))
            })
            .collect()
    }

    /// Indices of hits whose value disagrees with the known value for their
    /// field. Fields without a known value are not judged.
    ///
    /// Known strings are converted with the converter of the hit's pattern
    /// (the field's converter when that regex was never resolved); when that
    /// fails, the trimmed known string is compared with the matched text.
    pub fn mismatches(&self, known: &KnownValues, registry: &ConverterRegistry) -> Vec<usize> {
        self.hits
            .iter()
            .enumerate()
            .filter(|(_, hit)| {
                known.get(hit.field()).is_some_and(|expected| {
                    let converter = registry
                        .converter_for_pattern(hit.field(), hit.pattern.regex())
                        .or_else(|| registry.converter_for(hit.field()));
                    match converter.and_then(|c| c.convert(expected)) {
                        Some(value) => value != hit.value,
                        None => expected.trim() != hit.matched_text.trim(),
                    }
                })
            })
            .map(|(i, _)| i)
            .collect()
    }
}

/// Outcome of a false-positive feedback pass.
#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    /// Patterns that produced a wrong value, with their counters already
    /// incremented. Each pattern appears once.
    pub error_patterns: Vec<Pattern>,
    /// The hits of the walk, with pattern snapshots taken before feedback.
    pub result: ExtractionResult,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        !self.error_patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{DefaultHierarchy, FieldType, MetadataSchema};
    use crate::pattern::Locator;

    fn make_hit(index: usize, field: &str, counts: (u32, u32), value: Value) -> Hit {
        let pattern = Pattern::new(field, 1, ".+", 0, Locator::RawText)
            .with_counts(counts.0, counts.1)
            .unwrap();
        Hit {
            pattern_index: index,
            pattern,
            page_number: 1,
            matched_text: value.to_string(),
            value,
        }
    }

    fn sample() -> ExtractionResult {
        ExtractionResult {
            doc_id: Some("doc-1".to_string()),
            hits: vec![
                make_hit(0, "Total", (2, 1), Value::Decimal(10.0)),
                make_hit(1, "Total", (5, 0), Value::Decimal(45.0)),
                make_hit(2, "Total", (3, 0), Value::Decimal(10.0)),
                make_hit(3, "Ref", (1, 0), Value::Text("INV-1".to_string())),
                make_hit(4, "Total", (5, 0), Value::Decimal(99.0)),
            ],
        }
    }

    fn total(result: &ExtractionResult, policy: HitPolicy) -> Option<Value> {
        result.best_hit("Total", policy).map(|h| h.value.clone())
    }

    #[test]
    fn test_policies() {
        let result = sample();
        assert_eq!(total(&result, HitPolicy::First), Some(Value::Decimal(10.0)));
        assert_eq!(total(&result, HitPolicy::Last), Some(Value::Decimal(99.0)));
        // Net 5 twice; earliest wins.
        assert_eq!(total(&result, HitPolicy::BestRanked), Some(Value::Decimal(45.0)));
        assert_eq!(total(&result, HitPolicy::MostFrequent), Some(Value::Decimal(10.0)));
        assert_eq!(result.best_hit("Missing", HitPolicy::First), None);
    }

    #[test]
    fn test_best_values_covers_each_field() {
        let values = sample().best_values(HitPolicy::BestRanked);
        assert_eq!(values.len(), 2);
        assert_eq!(values["Ref"], Value::Text("INV-1".to_string()));
        assert_eq!(values["Total"], Value::Decimal(45.0));
    }

    #[test]
    fn test_hits_for() {
        let result = sample();
        assert_eq!(result.hits_for("Total").count(), 4);
        assert_eq!(result.hits_for("Ref").count(), 1);
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_best_hit_outlives_field_name() {
        let result = sample();
        let hit = {
            let field = String::from("Ref");
            result.best_hit(&field, HitPolicy::First)
        };
        assert_eq!(hit.map(|h| h.pattern_index), Some(3));

        let from_iter = {
            let field = "Total".to_string();
            result.hits_for(&field).last()
        };
        assert_eq!(from_iter.map(|h| h.pattern_index), Some(4));
    }

    #[test]
    fn test_mismatches_convert_known_values() {
        let schema = MetadataSchema::new("Invoice")
            .with_field("Total", FieldType::Decimal)
            .with_field("Ref", FieldType::Text);
        let registry = crate::convert::ConverterRegistry::resolve(&schema, &[], &DefaultHierarchy::default());
        let mut known = KnownValues::new();
        known.insert("Total".to_string(), "10,00".to_string());

        // Ref is not judged; hits 1 and 4 disagree with 10.0.
        assert_eq!(sample().mismatches(&known, &registry), vec![1, 4]);
    }

    #[test]
    fn test_mismatches_fall_back_to_text() {
        let schema = MetadataSchema::new("Invoice").with_field("Total", FieldType::Decimal);
        let registry = crate::convert::ConverterRegistry::resolve(&schema, &[], &DefaultHierarchy::default());
        let mut known = KnownValues::new();
        known.insert("Total".to_string(), "n/a".to_string());
        assert_eq!(sample().mismatches(&known, &registry).len(), 4);
    }

    #[test]
    fn test_policy_names() {
        for policy in [
            HitPolicy::First,
            HitPolicy::Last,
            HitPolicy::BestRanked,
            HitPolicy::MostFrequent,
        ] {
            assert_eq!(policy.as_str().parse::<HitPolicy>(), Ok(policy));
        }
        assert!("best".parse::<HitPolicy>().is_err());
        assert_eq!(HitPolicy::default(), HitPolicy::BestRanked);
    }
}
