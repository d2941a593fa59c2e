//! The pattern store: matching, containment scoring and false-positive
//! feedback.
//!
//! A [`PatternStore`] is built once per learned profile and queried many
//! times. [`extract`](PatternStore::extract) takes `&self` and may run on
//! several documents at once; [`check_against_known_values`](PatternStore::check_against_known_values)
//! takes `&mut self`, so feedback passes on one store are serialized.

use std::collections::BTreeSet;
#[cfg(feature = "serde")]
use std::fs;
#[cfg(feature = "serde")]
use std::path::Path;

use pdftagger_core::{Document, PageData, TextRect};
use regex::Regex;
use tracing::{debug, info, trace, warn};

use crate::convert::{ConverterHierarchy, ConverterRegistry, MetadataSchema};
use crate::error::{Result, TagError};
use crate::index::PageIndex;
use crate::pattern::{Locator, Pattern, PatternRecord, SourceKind};
use crate::result::{CheckResult, ExtractionResult, Hit, HitPolicy, KnownValues};

/// Descriptive metadata about a stored profile.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreInfo {
    /// Category of documents this profile was learned from.
    pub doc_category: String,
    /// Name of the converter hierarchy the profile expects.
    pub hierarchy_set_name: String,
    /// Name of the metadata type the fields belong to.
    pub metadata_type_name: String,
}

/// Serializable form of a pattern store.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreProfile {
    #[cfg_attr(feature = "serde", serde(default))]
    pub info: StoreInfo,
    pub schema: MetadataSchema,
    #[cfg_attr(feature = "serde", serde(default))]
    pub patterns: Vec<PatternRecord>,
}

#[cfg(feature = "serde")]
impl StoreProfile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a profile from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write the profile as pretty-printed JSON, replacing `path`.
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

/// Options for extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractOptions {
    /// Fraction of a candidate's area the reference rectangle must cover,
    /// strictly exceeded (default: 0.7).
    pub min_rectangle_common: f64,
    /// How [`ExtractionResult::best_values`] callers should resolve several
    /// hits for one field (default: [`HitPolicy::BestRanked`]).
    pub hit_policy: HitPolicy,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_rectangle_common: 0.7,
            hit_policy: HitPolicy::BestRanked,
        }
    }
}

/// An ordered collection of patterns plus everything needed to run them.
#[derive(Debug, Clone)]
pub struct PatternStore {
    info: StoreInfo,
    schema: MetadataSchema,
    patterns: Vec<Pattern>,
    /// Compiled regex per pattern; `None` disables the pattern.
    regexes: Vec<Option<Regex>>,
    registry: ConverterRegistry,
    options: ExtractOptions,
    /// Stored records that did not form a valid pattern, kept for write-back.
    rejected: Vec<PatternRecord>,
}

impl PatternStore {
    /// Build a store, compiling every regex and resolving converters.
    ///
    /// Patterns that cannot run (invalid regex, incomplete locator, unknown
    /// field or no converter) are kept but never match.
    pub fn new(
        info: StoreInfo,
        schema: MetadataSchema,
        patterns: Vec<Pattern>,
        hierarchy: &dyn ConverterHierarchy,
    ) -> Self {
        let registry = ConverterRegistry::resolve(&schema, &patterns, hierarchy);
        let regexes = patterns
            .iter()
            .map(|pattern| match prepare(pattern, &schema, &registry) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    warn!(field = pattern.metadata_field(), error = %err, "pattern disabled");
                    None
                }
            })
            .collect();
        Self {
            info,
            schema,
            patterns,
            regexes,
            registry,
            options: ExtractOptions::default(),
            rejected: Vec::new(),
        }
    }

    /// Build a store from a stored profile. Records that do not form a valid
    /// pattern are skipped with a warning and kept aside, so
    /// [`to_profile`](Self::to_profile) writes them back unchanged.
    pub fn from_profile(profile: StoreProfile, hierarchy: &dyn ConverterHierarchy) -> Self {
        let mut patterns = Vec::with_capacity(profile.patterns.len());
        let mut rejected = Vec::new();
        for (i, record) in profile.patterns.into_iter().enumerate() {
            match Pattern::try_from(record.clone()) {
                Ok(pattern) => patterns.push(pattern),
                Err(err) => {
                    warn!(record = i, error = %err, "skipping stored pattern");
                    rejected.push(record);
                }
            }
        }
        let mut store = Self::new(profile.info, profile.schema, patterns, hierarchy);
        store.rejected = rejected;
        store
    }

    /// Set the default extraction options (builder pattern).
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn info(&self) -> &StoreInfo {
        &self.info
    }

    pub fn schema(&self) -> &MetadataSchema {
        &self.schema
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether the pattern at `index` takes part in matching.
    pub fn is_enabled(&self, index: usize) -> bool {
        self.regexes.get(index).is_some_and(Option::is_some)
    }

    /// Patterns of `kind` targeting `field`, in store order.
    pub fn find_patterns(&self, kind: SourceKind, field: &str) -> Vec<&Pattern> {
        self.patterns
            .iter()
            .filter(|p| p.source_kind() == kind && p.metadata_field() == field)
            .collect()
    }

    /// Records from the loaded profile that did not form a valid pattern.
    pub fn rejected_records(&self) -> &[PatternRecord] {
        &self.rejected
    }

    /// Serializable form of the store: every pattern with its current
    /// counters, followed by the rejected records as they were loaded.
    pub fn to_profile(&self) -> StoreProfile {
        StoreProfile {
            info: self.info.clone(),
            schema: self.schema.clone(),
            patterns: self
                .patterns
                .iter()
                .map(PatternRecord::from)
                .chain(self.rejected.iter().cloned())
                .collect(),
        }
    }

    /// Run every pattern against `document` with the store's options.
    pub fn extract(&self, document: &Document) -> ExtractionResult {
        self.extract_with(document, &self.options)
    }

    /// Run every pattern against `document`.
    ///
    /// Each page is walked by source kind (word groups, lines, raw text,
    /// colour/font word groups); within a kind, every candidate is tried
    /// against every eligible pattern in store order.
    pub fn extract_with(&self, document: &Document, options: &ExtractOptions) -> ExtractionResult {
        let index = PageIndex::build(&self.patterns);
        let mut hits = Vec::new();
        let pages = if index.is_empty() { &[][..] } else { &document.pages[..] };

        for page in pages {
            let eligible = index.for_page(page.page_number);
            if eligible.is_empty() {
                continue;
            }
            for kind in SourceKind::ALL {
                let candidates: Vec<usize> = eligible
                    .iter()
                    .copied()
                    .filter(|&i| self.patterns[i].source_kind() == kind && self.is_enabled(i))
                    .collect();
                if !candidates.is_empty() {
                    self.match_source(kind, page, &candidates, options, &mut hits);
                }
            }
        }

        info!(
            doc_id = document.doc_id.as_deref().unwrap_or("-"),
            pages = document.pages.len(),
            hits = hits.len(),
            "extraction finished"
        );
        ExtractionResult {
            doc_id: document.doc_id.clone(),
            hits,
        }
    }

    /// Re-run extraction on a document whose values are known and charge
    /// one error to every pattern that produced a wrong value.
    ///
    /// Fields missing from `known` are not judged. A pattern with several
    /// wrong hits is reported and charged once per call.
    pub fn check_against_known_values(
        &mut self,
        document: &Document,
        known: &KnownValues,
    ) -> CheckResult {
        let result = self.extract(document);
        let mut charged = BTreeSet::new();
        let mut error_patterns = Vec::new();

        for hit_index in result.mismatches(known, &self.registry) {
            let hit = &result.hits[hit_index];
            if !charged.insert(hit.pattern_index) {
                continue;
            }
            let pattern = &mut self.patterns[hit.pattern_index];
            pattern.record_error();
            debug!(
                field = pattern.metadata_field(),
                value = %hit.value,
                errors = pattern.errors_count(),
                "false positive"
            );
            error_patterns.push(pattern.clone());
        }

        info!(
            doc_id = document.doc_id.as_deref().unwrap_or("-"),
            errors = error_patterns.len(),
            "feedback finished"
        );
        CheckResult {
            error_patterns,
            result,
        }
    }

    fn match_source(
        &self,
        kind: SourceKind,
        page: &PageData,
        candidates: &[usize],
        options: &ExtractOptions,
        hits: &mut Vec<Hit>,
    ) {
        let rects = match kind {
            SourceKind::RawText => {
                for &i in candidates {
                    self.match_raw_text(i, page, hits);
                }
                return;
            }
            SourceKind::WordGroups => &page.word_groups,
            SourceKind::Lines => &page.lines,
            SourceKind::ColorFontWordGroups => &page.color_font_word_groups,
        };
        for rect in rects {
            for &i in candidates {
                if let Some(hit) = self.match_rect(i, rect, page.page_number, options) {
                    hits.push(hit);
                }
            }
        }
    }

    /// Raw-text patterns take every match on the page, ignoring the match
    /// index, and keep numeric zeros.
    fn match_raw_text(&self, index: usize, page: &PageData, hits: &mut Vec<Hit>) {
        let Some(regex) = &self.regexes[index] else {
            return;
        };
        let pattern = &self.patterns[index];
        for m in regex.find_iter(&page.raw_text) {
            match self
                .registry
                .convert_with(pattern.metadata_field(), pattern.regex(), m.as_str())
            {
                Some(value) => {
                    debug!(field = pattern.metadata_field(), page = page.page_number, value = %value, "raw text hit");
                    hits.push(Hit {
                        pattern_index: index,
                        pattern: pattern.clone(),
                        page_number: page.page_number,
                        value,
                        matched_text: m.as_str().to_string(),
                    });
                }
                None => trace!(field = pattern.metadata_field(), text = m.as_str(), "conversion failed"),
            }
        }
    }

    fn match_rect(
        &self,
        index: usize,
        candidate: &TextRect,
        page_number: usize,
        options: &ExtractOptions,
    ) -> Option<Hit> {
        let regex = self.regexes[index].as_ref()?;
        let pattern = &self.patterns[index];

        let located = match pattern.locator() {
            Locator::WordGroup { rect } | Locator::Line { rect } => candidate
                .rect
                .is_almost_same_area(rect, options.min_rectangle_common),
            Locator::ColorFont { rect, style, axis } => {
                candidate.style.as_ref() == Some(style)
                    && axis.edges_match(rect.as_ref(), Some(&candidate.rect))
            }
            Locator::RawText => false,
        };
        if !located {
            return None;
        }

        let Some(m) = regex.find_iter(&candidate.text).nth(pattern.match_index()) else {
            trace!(field = pattern.metadata_field(), text = %candidate.text, "no match at index");
            return None;
        };
        let Some(value) = self
            .registry
            .convert_with(pattern.metadata_field(), pattern.regex(), m.as_str())
        else {
            trace!(field = pattern.metadata_field(), text = m.as_str(), "conversion failed");
            return None;
        };
        if value.is_zero_numeric() {
            trace!(field = pattern.metadata_field(), "zero value ignored");
            return None;
        }

        debug!(
            field = pattern.metadata_field(),
            kind = %pattern.source_kind(),
            page = page_number,
            value = %value,
            "hit"
        );
        Some(Hit {
            pattern_index: index,
            pattern: pattern.clone(),
            page_number,
            value,
            matched_text: m.as_str().to_string(),
        })
    }
}

/// Validate a pattern against the schema and compile its regex.
fn prepare(pattern: &Pattern, schema: &MetadataSchema, registry: &ConverterRegistry) -> Result<Regex> {
    pattern.validate()?;
    let field = pattern.metadata_field();
    if schema.field_type(field).is_none() || !registry.is_resolved_for(field, pattern.regex()) {
        return Err(TagError::UnknownField(field.to_string()));
    }
    Regex::new(pattern.regex()).map_err(|source| TagError::InvalidRegex {
        regex: pattern.regex().to_string(),
        source,
    })
}
