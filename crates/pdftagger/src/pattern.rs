//! Learned extraction patterns.
//!
//! A [`Pattern`] maps a locator (raw page text, a reference rectangle, or a
//! colour/font signature) plus a regular expression to a metadata field, and
//! carries a running confidence score.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use pdftagger_core::{Rect, StyleSignature};

use crate::error::{Result, TagError};

/// The category of page content a pattern matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceKind {
    #[cfg_attr(feature = "serde", serde(rename = "WordGroupsInfos"))]
    WordGroups,
    #[cfg_attr(feature = "serde", serde(rename = "LinesInfos"))]
    Lines,
    #[cfg_attr(feature = "serde", serde(rename = "PdfTextInfos"))]
    RawText,
    #[cfg_attr(feature = "serde", serde(rename = "ColorFontWordGroupsInfos"))]
    ColorFontWordGroups,
}

impl SourceKind {
    /// All source kinds, in page walk order.
    pub const ALL: [SourceKind; 4] = [
        SourceKind::WordGroups,
        SourceKind::Lines,
        SourceKind::RawText,
        SourceKind::ColorFontWordGroups,
    ];

    /// Returns the stable name used in stored profiles.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::WordGroups => "WordGroupsInfos",
            SourceKind::Lines => "LinesInfos",
            SourceKind::RawText => "PdfTextInfos",
            SourceKind::ColorFontWordGroups => "ColorFontWordGroupsInfos",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self> {
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TagError::UnknownSourceKind(s.to_string()))
    }
}

/// Which rectangle edges a colour/font pattern pins down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CfAxis {
    /// Position is ignored; style alone locates the value.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "NA"))]
    NotApplicable,
    /// Left or right edge must coincide.
    X,
    /// Bottom or top edge must coincide.
    Y,
}

impl CfAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            CfAxis::NotApplicable => "NA",
            CfAxis::X => "X",
            CfAxis::Y => "Y",
        }
    }

    /// Whether `a` and `b` agree on the edges this axis mode pins down.
    ///
    /// `NotApplicable` always agrees. `X` and `Y` need both rectangles and
    /// an exact match of at least one edge on that axis.
    pub fn edges_match(&self, a: Option<&Rect>, b: Option<&Rect>) -> bool {
        match self {
            CfAxis::NotApplicable => true,
            CfAxis::X => match (a, b) {
                (Some(a), Some(b)) => a.llx == b.llx || a.urx == b.urx,
                _ => false,
            },
            CfAxis::Y => match (a, b) {
                (Some(a), Some(b)) => a.lly == b.lly || a.ury == b.ury,
                _ => false,
            },
        }
    }
}

impl fmt::Display for CfAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CfAxis {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NA" => Ok(CfAxis::NotApplicable),
            "X" => Ok(CfAxis::X),
            "Y" => Ok(CfAxis::Y),
            other => Err(TagError::UnknownAxis(other.to_string())),
        }
    }
}

/// Where a pattern looks for its value. Each variant carries exactly the
/// fields meaningful for its source kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Locator {
    /// The regex runs over the full page text.
    RawText,
    /// Word groups mostly covered by the reference rectangle.
    WordGroup { rect: Rect },
    /// Lines mostly covered by the reference rectangle.
    Line { rect: Rect },
    /// Word groups with an identical style signature, optionally pinned to
    /// an edge of the reference rectangle.
    ColorFont {
        rect: Option<Rect>,
        style: StyleSignature,
        axis: CfAxis,
    },
}

impl Locator {
    pub fn kind(&self) -> SourceKind {
        match self {
            Locator::RawText => SourceKind::RawText,
            Locator::WordGroup { .. } => SourceKind::WordGroups,
            Locator::Line { .. } => SourceKind::Lines,
            Locator::ColorFont { .. } => SourceKind::ColorFontWordGroups,
        }
    }

    /// The reference rectangle, if the locator has one.
    pub fn rect(&self) -> Option<&Rect> {
        match self {
            Locator::RawText => None,
            Locator::WordGroup { rect } | Locator::Line { rect } => Some(rect),
            Locator::ColorFont { rect, .. } => rect.as_ref(),
        }
    }

    fn same_as(&self, other: &Locator) -> bool {
        match (self, other) {
            (Locator::RawText, Locator::RawText) => true,
            (Locator::WordGroup { rect: a }, Locator::WordGroup { rect: b })
            | (Locator::Line { rect: a }, Locator::Line { rect: b }) => a == b,
            (
                Locator::ColorFont {
                    rect: ra,
                    style: sa,
                    axis: xa,
                },
                Locator::ColorFont {
                    rect: rb,
                    style: sb,
                    axis: xb,
                },
            ) => sa == sb && xa == xb && xa.edges_match(ra.as_ref(), rb.as_ref()),
            _ => false,
        }
    }
}

/// A learned extraction rule with its confidence counters.
///
/// Counters always satisfy `matches_count >= errors_count` and
/// `matches_count >= 1`. The locator, regex and target never change after
/// creation; only [`record_error`](Pattern::record_error) mutates a pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    metadata_field: String,
    page_number: usize,
    is_last_page: bool,
    regex: String,
    match_index: usize,
    locator: Locator,
    matches_count: u32,
    errors_count: u32,
}

impl Pattern {
    /// Create a freshly learned pattern (`matches_count = 1`, `errors_count = 0`).
    pub fn new(
        metadata_field: impl Into<String>,
        page_number: usize,
        regex: impl Into<String>,
        match_index: usize,
        locator: Locator,
    ) -> Self {
        Self {
            metadata_field: metadata_field.into(),
            page_number,
            is_last_page: false,
            regex: regex.into(),
            match_index,
            locator,
            matches_count: 1,
            errors_count: 0,
        }
    }

    /// Mark the pattern as applying to every page (builder pattern).
    pub fn on_last_page(mut self) -> Self {
        self.is_last_page = true;
        self
    }

    /// Restore stored counters, rejecting inconsistent ones.
    pub fn with_counts(mut self, matches_count: u32, errors_count: u32) -> Result<Self> {
        if matches_count < 1 || errors_count > matches_count {
            return Err(TagError::InvalidCounts {
                field: self.metadata_field,
                matches: matches_count,
                errors: errors_count,
            });
        }
        self.matches_count = matches_count;
        self.errors_count = errors_count;
        Ok(self)
    }

    pub fn metadata_field(&self) -> &str {
        &self.metadata_field
    }

    /// Page number (1-based). Meaningless when [`is_last_page`](Self::is_last_page) is set.
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn is_last_page(&self) -> bool {
        self.is_last_page
    }

    pub fn regex(&self) -> &str {
        &self.regex
    }

    /// Which regex match (0-based) to use when several occur.
    pub fn match_index(&self) -> usize {
        self.match_index
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn source_kind(&self) -> SourceKind {
        self.locator.kind()
    }

    pub fn matches_count(&self) -> u32 {
        self.matches_count
    }

    pub fn errors_count(&self) -> u32 {
        self.errors_count
    }

    /// `matches_count - errors_count`.
    pub fn net_score(&self) -> i64 {
        i64::from(self.matches_count) - i64::from(self.errors_count)
    }

    /// Whether this pattern takes part in matching on `page_number`.
    pub fn applies_to_page(&self, page_number: usize) -> bool {
        self.is_last_page || self.page_number == page_number
    }

    /// Record a false positive. Saturates at `matches_count`; returns
    /// whether the counter moved.
    pub fn record_error(&mut self) -> bool {
        if self.errors_count < self.matches_count {
            self.errors_count += 1;
            true
        } else {
            false
        }
    }

    /// Compare by trustworthiness: `Less` means `self` is the better pattern.
    ///
    /// Higher net score ranks first; ties go to the higher `matches_count`.
    pub fn rank(&self, other: &Pattern) -> Ordering {
        other
            .net_score()
            .cmp(&self.net_score())
            .then(other.matches_count.cmp(&self.matches_count))
    }

    /// Sort patterns best first. Stable for equal ranks.
    pub fn sort_by_rank(patterns: &mut [Pattern]) {
        patterns.sort_by(Pattern::rank);
    }

    /// Equality against an arbitrary value, reporting a type mismatch
    /// instead of returning `false` when `other` is not a pattern.
    pub fn try_equals<T: Any>(&self, other: &T) -> Result<bool> {
        (other as &dyn Any)
            .downcast_ref::<Pattern>()
            .map(|p| self == p)
            .ok_or(TagError::TypeMismatch {
                found: std::any::type_name::<T>(),
            })
    }

    /// Ranking against an arbitrary value; see [`try_equals`](Self::try_equals).
    pub fn try_rank<T: Any>(&self, other: &T) -> Result<Ordering> {
        (other as &dyn Any)
            .downcast_ref::<Pattern>()
            .map(|p| self.rank(p))
            .ok_or(TagError::TypeMismatch {
                found: std::any::type_name::<T>(),
            })
    }

    /// Check that the locator is complete for its source kind and that the
    /// counters are consistent.
    pub fn validate(&self) -> Result<()> {
        if self.matches_count < 1 || self.errors_count > self.matches_count {
            return Err(TagError::InvalidCounts {
                field: self.metadata_field.clone(),
                matches: self.matches_count,
                errors: self.errors_count,
            });
        }
        if let Locator::ColorFont { rect, style, axis } = &self.locator {
            if style.is_empty() {
                return Err(self.missing("style signature"));
            }
            if *axis != CfAxis::NotApplicable && rect.is_none() {
                return Err(self.missing("reference rectangle"));
            }
        }
        Ok(())
    }

    fn missing(&self, what: &'static str) -> TagError {
        TagError::MissingLocator {
            field: self.metadata_field.clone(),
            kind: self.source_kind(),
            missing: what,
        }
    }
}

/// Identity comparison.
///
/// Counters never take part. Colour/font patterns compare style and axis
/// mode, and their rectangles only along the pinned axis. Other kinds
/// compare reference rectangles corner by corner.
impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.metadata_field == other.metadata_field
            && self.page_number == other.page_number
            && self.is_last_page == other.is_last_page
            && self.regex == other.regex
            && self.match_index == other.match_index
            && self.locator.same_as(&other.locator)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) ({}) {} [{}] /{}/#{}",
            self.matches_count,
            self.errors_count,
            self.metadata_field,
            self.source_kind(),
            self.regex,
            self.match_index
        )
    }
}

#[cfg(feature = "serde")]
fn one() -> u32 {
    1
}

/// Flat form of a pattern, as stored in learned profiles.
///
/// Locator fields are optional here; converting into a [`Pattern`] checks
/// that the fields required by `source_kind` are present.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternRecord {
    pub metadata_field: String,
    pub page_number: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_last_page: bool,
    pub source_kind: SourceKind,
    pub regex: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub match_index: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rect: Option<Rect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fill_color: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stroke_color: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub font_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub font_size: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cf_axis: Option<CfAxis>,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub matches_count: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub errors_count: u32,
}

impl TryFrom<PatternRecord> for Pattern {
    type Error = TagError;

    fn try_from(record: PatternRecord) -> Result<Self> {
        let missing_rect = |field: &str| TagError::MissingLocator {
            field: field.to_string(),
            kind: record.source_kind,
            missing: "reference rectangle",
        };
        let locator = match record.source_kind {
            SourceKind::RawText => Locator::RawText,
            SourceKind::WordGroups => Locator::WordGroup {
                rect: record.rect.ok_or_else(|| missing_rect(&record.metadata_field))?,
            },
            SourceKind::Lines => Locator::Line {
                rect: record.rect.ok_or_else(|| missing_rect(&record.metadata_field))?,
            },
            SourceKind::ColorFontWordGroups => Locator::ColorFont {
                rect: record.rect,
                style: StyleSignature {
                    fill_color: record.fill_color,
                    stroke_color: record.stroke_color,
                    font_name: record.font_name,
                    font_size: record.font_size,
                },
                axis: record.cf_axis.unwrap_or_default(),
            },
        };

        let mut pattern = Pattern::new(
            record.metadata_field,
            record.page_number,
            record.regex,
            record.match_index,
            locator,
        );
        pattern.is_last_page = record.is_last_page;
        pattern.matches_count = record.matches_count;
        pattern.errors_count = record.errors_count;
        pattern.validate()?;
        Ok(pattern)
    }
}

impl From<&Pattern> for PatternRecord {
    fn from(pattern: &Pattern) -> Self {
        let (style, cf_axis) = match &pattern.locator {
            Locator::ColorFont { style, axis, .. } => (style.clone(), Some(*axis)),
            _ => (StyleSignature::default(), None),
        };
        PatternRecord {
            metadata_field: pattern.metadata_field.clone(),
            page_number: pattern.page_number,
            is_last_page: pattern.is_last_page,
            source_kind: pattern.source_kind(),
            regex: pattern.regex.clone(),
            match_index: pattern.match_index,
            rect: pattern.locator.rect().copied(),
            fill_color: style.fill_color,
            stroke_color: style.stroke_color,
            font_name: style.font_name,
            font_size: style.font_size,
            cf_axis,
            matches_count: pattern.matches_count,
            errors_count: pattern.errors_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::new(10.0, 700.0, 60.0, 712.0)
    }

    fn red() -> StyleSignature {
        StyleSignature::new(Some("ff0000"), None, Some("Helvetica-Bold"), Some(12.0))
    }

    fn word_group(field: &str) -> Pattern {
        Pattern::new(field, 1, r"\d+", 0, Locator::WordGroup { rect: rect() })
    }

    fn color_font(axis: CfAxis, rect: Rect) -> Pattern {
        Pattern::new(
            "InvoiceNumber",
            1,
            r"\d+",
            0,
            Locator::ColorFont {
                rect: Some(rect),
                style: red(),
                axis,
            },
        )
    }

    fn with_counts(p: Pattern, matches: u32, errors: u32) -> Pattern {
        p.with_counts(matches, errors).unwrap()
    }

    #[test]
    fn test_new_pattern_counters() {
        let p = word_group("Total");
        assert_eq!(p.matches_count(), 1);
        assert_eq!(p.errors_count(), 0);
        assert_eq!(p.net_score(), 1);
        assert_eq!(p.source_kind(), SourceKind::WordGroups);
    }

    #[test]
    fn test_source_kind_names_round_trip() {
        for kind in SourceKind::ALL {
            assert_eq!(kind.as_str().parse::<SourceKind>().unwrap(), kind);
        }
        assert!(matches!(
            "Nope".parse::<SourceKind>(),
            Err(TagError::UnknownSourceKind(_))
        ));
    }

    #[test]
    fn test_axis_names() {
        assert_eq!("NA".parse::<CfAxis>().unwrap(), CfAxis::NotApplicable);
        assert_eq!("X".parse::<CfAxis>().unwrap(), CfAxis::X);
        assert_eq!(CfAxis::Y.to_string(), "Y");
        assert!("Z".parse::<CfAxis>().is_err());
    }

    #[test]
    fn test_equal_ignores_counters() {
        let a = word_group("Total");
        let b = with_counts(word_group("Total"), 7, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rectangle_must_match_exactly() {
        let a = word_group("Total");
        let b = Pattern::new(
            "Total",
            1,
            r"\d+",
            0,
            Locator::WordGroup {
                rect: Rect::new(10.0, 700.0, 60.5, 712.0),
            },
        );
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_fields_matter() {
        let a = word_group("Total");
        assert_ne!(a, word_group("Net"));
        assert_ne!(a, word_group("Total").on_last_page());
        assert_ne!(
            a,
            Pattern::new("Total", 2, r"\d+", 0, Locator::WordGroup { rect: rect() })
        );
        assert_ne!(
            a,
            Pattern::new("Total", 1, r"\d+", 1, Locator::WordGroup { rect: rect() })
        );
        assert_ne!(a, Pattern::new("Total", 1, r"\d+", 0, Locator::Line { rect: rect() }));
    }

    #[test]
    fn test_raw_text_patterns_have_no_rectangle() {
        let a = Pattern::new("Ref", 1, r"INV-\d+", 0, Locator::RawText);
        let b = Pattern::new("Ref", 1, r"INV-\d+", 0, Locator::RawText);
        assert_eq!(a, b);
        assert_eq!(a.locator().rect(), None);
    }

    #[test]
    fn test_color_font_axis_x_equality() {
        let a = color_font(CfAxis::X, Rect::new(10.0, 700.0, 60.0, 712.0));
        let same_left = color_font(CfAxis::X, Rect::new(10.0, 500.0, 90.0, 512.0));
        let same_right = color_font(CfAxis::X, Rect::new(30.0, 500.0, 60.0, 512.0));
        let neither = color_font(CfAxis::X, Rect::new(11.0, 700.0, 61.0, 712.0));
        assert_eq!(a, same_left);
        assert_eq!(a, same_right);
        assert_ne!(a, neither);
    }

    #[test]
    fn test_color_font_axis_y_equality() {
        let a = color_font(CfAxis::Y, Rect::new(10.0, 700.0, 60.0, 712.0));
        let same_bottom = color_font(CfAxis::Y, Rect::new(200.0, 700.0, 260.0, 720.0));
        let neither = color_font(CfAxis::Y, Rect::new(10.0, 701.0, 60.0, 713.0));
        assert_eq!(a, same_bottom);
        assert_ne!(a, neither);
    }

    #[test]
    fn test_color_font_na_ignores_rectangle() {
        let a = color_font(CfAxis::NotApplicable, Rect::new(10.0, 700.0, 60.0, 712.0));
        let b = color_font(CfAxis::NotApplicable, Rect::new(300.0, 100.0, 360.0, 112.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_color_font_style_and_axis_matter() {
        let a = color_font(CfAxis::NotApplicable, rect());
        let b = color_font(CfAxis::X, rect());
        assert_ne!(a, b);

        let blue = Pattern::new(
            "InvoiceNumber",
            1,
            r"\d+",
            0,
            Locator::ColorFont {
                rect: Some(rect()),
                style: StyleSignature::new(Some("0000ff"), None, Some("Helvetica-Bold"), Some(12.0)),
                axis: CfAxis::NotApplicable,
            },
        );
        assert_ne!(a, blue);
    }

    #[test]
    fn test_try_equals_reports_type_mismatch() {
        let p = word_group("Total");
        assert!(p.try_equals(&word_group("Total")).unwrap());
        let err = p.try_equals(&"Total").unwrap_err();
        assert!(matches!(err, TagError::TypeMismatch { .. }));
        assert!(p.try_rank(&42_u32).is_err());
    }

    #[test]
    fn test_rank_by_net_score_then_matches() {
        let strong = with_counts(word_group("A"), 10, 1); // net 9
        let weak = with_counts(word_group("B"), 10, 5); // net 5
        assert_eq!(strong.rank(&weak), Ordering::Less);
        assert_eq!(weak.rank(&strong), Ordering::Greater);

        let more_matches = with_counts(word_group("C"), 6, 1); // net 5, 6 matches
        let fewer_matches = with_counts(word_group("D"), 5, 0); // net 5, 5 matches
        assert_eq!(more_matches.rank(&fewer_matches), Ordering::Less);
        assert_eq!(more_matches.rank(&more_matches.clone()), Ordering::Equal);
    }

    #[test]
    fn test_sort_by_rank_best_first_and_stable() {
        let mut patterns = vec![
            with_counts(word_group("low"), 3, 3),
            with_counts(word_group("tie-1"), 4, 1),
            with_counts(word_group("best"), 9, 0),
            with_counts(word_group("tie-2"), 4, 1),
        ];
        Pattern::sort_by_rank(&mut patterns);
        let names: Vec<&str> = patterns.iter().map(|p| p.metadata_field()).collect();
        assert_eq!(names, vec!["best", "tie-1", "tie-2", "low"]);
    }

    #[test]
    fn test_record_error_saturates() {
        let mut p = with_counts(word_group("Total"), 2, 0);
        assert!(p.record_error());
        assert!(p.record_error());
        assert!(!p.record_error());
        assert_eq!(p.errors_count(), 2);
        assert!(p.matches_count() >= p.errors_count());
    }

    #[test]
    fn test_with_counts_rejects_invalid() {
        assert!(matches!(
            word_group("Total").with_counts(0, 0),
            Err(TagError::InvalidCounts { .. })
        ));
        assert!(word_group("Total").with_counts(1, 2).is_err());
    }

    #[test]
    fn test_applies_to_page() {
        let p = word_group("Total");
        assert!(p.applies_to_page(1));
        assert!(!p.applies_to_page(2));
        let last = word_group("Total").on_last_page();
        assert!(last.applies_to_page(2));
        assert!(last.applies_to_page(17));
    }

    fn record(kind: SourceKind) -> PatternRecord {
        PatternRecord {
            metadata_field: "Total".to_string(),
            page_number: 1,
            is_last_page: false,
            source_kind: kind,
            regex: r"\d+".to_string(),
            match_index: 0,
            rect: None,
            fill_color: None,
            stroke_color: None,
            font_name: None,
            font_size: None,
            cf_axis: None,
            matches_count: 3,
            errors_count: 1,
        }
    }

    #[test]
    fn test_record_missing_rectangle() {
        let err = Pattern::try_from(record(SourceKind::WordGroups)).unwrap_err();
        assert!(matches!(
            err,
            TagError::MissingLocator {
                kind: SourceKind::WordGroups,
                ..
            }
        ));
        assert!(Pattern::try_from(record(SourceKind::Lines)).is_err());
    }

    #[test]
    fn test_record_color_font_needs_style() {
        let err = Pattern::try_from(record(SourceKind::ColorFontWordGroups)).unwrap_err();
        assert!(err.to_string().contains("style signature"));

        let mut rec = record(SourceKind::ColorFontWordGroups);
        rec.font_name = Some("Arial".to_string());
        rec.cf_axis = Some(CfAxis::X);
        let err = Pattern::try_from(rec.clone()).unwrap_err();
        assert!(err.to_string().contains("reference rectangle"));

        rec.cf_axis = None;
        let p = Pattern::try_from(rec).unwrap();
        assert!(matches!(
            p.locator(),
            Locator::ColorFont {
                axis: CfAxis::NotApplicable,
                ..
            }
        ));
    }

    #[test]
    fn test_record_round_trip_keeps_counters() {
        let mut rec = record(SourceKind::WordGroups);
        rec.rect = Some(rect());
        let p = Pattern::try_from(rec.clone()).unwrap();
        assert_eq!(p.matches_count(), 3);
        assert_eq!(p.errors_count(), 1);
        assert_eq!(PatternRecord::from(&p), rec);
    }

    #[test]
    fn test_display() {
        let p = with_counts(word_group("Total"), 4, 1);
        assert_eq!(p.to_string(), r"(4) (1) Total [WordGroupsInfos] /\d+/#0");
    }
}
