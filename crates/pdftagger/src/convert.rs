//! Typed values and the converters that turn matched substrings into them.
//!
//! A [`MetadataSchema`] declares which fields exist and their [`FieldType`].
//! A [`ConverterHierarchy`] supplies a [`FieldConverter`] per field type and
//! pattern regex, and [`ConverterRegistry`] resolves them once when a store
//! is built.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{Result, TagError};
use crate::pattern::Pattern;

/// A converted field value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value", rename_all = "lowercase"))]
pub enum Value {
    Text(String),
    Decimal(f64),
    Integer(i64),
    Date(NaiveDate),
}

impl Value {
    /// True for `Decimal(0.0)` and `Integer(0)`.
    ///
    /// Zero values from located patterns are treated as extraction artifacts
    /// and never produce a hit.
    pub fn is_zero_numeric(&self) -> bool {
        match self {
            Value::Decimal(v) => *v == 0.0,
            Value::Integer(v) => *v == 0,
            Value::Text(_) | Value::Date(_) => false,
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Text(_) => FieldType::Text,
            Value::Decimal(_) => FieldType::Decimal,
            Value::Integer(_) => FieldType::Integer,
            Value::Date(_) => FieldType::Date,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Declared type of a metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FieldType {
    Text,
    Decimal,
    Integer,
    Date,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Decimal => "decimal",
            FieldType::Integer => "integer",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(FieldType::Text),
            "decimal" => Ok(FieldType::Decimal),
            "integer" => Ok(FieldType::Integer),
            "date" => Ok(FieldType::Date),
            other => Err(TagError::UnknownFieldType(other.to_string())),
        }
    }
}

/// The consumer-supplied set of metadata fields and their types.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetadataSchema {
    pub name: String,
    pub fields: BTreeMap<String, FieldType>,
}

impl MetadataSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Declare a field (builder pattern).
    pub fn with_field(mut self, field: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(field.into(), field_type);
        self
    }

    pub fn field_type(&self, field: &str) -> Option<FieldType> {
        self.fields.get(field).copied()
    }
}

/// Turns a matched substring into a typed value. `None` means the text
/// could not be converted, which callers treat as "no hit".
pub trait FieldConverter: Send + Sync {
    fn convert(&self, text: &str) -> Option<Value>;
}

/// Identity converter: trimmed text, `None` when blank.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextConverter;

impl FieldConverter for TextConverter {
    fn convert(&self, text: &str) -> Option<Value> {
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| Value::Text(trimmed.to_string()))
    }
}

/// Parses amounts written with either `.` or `,` as the decimal separator.
///
/// When both separators occur the rightmost one is the decimal separator.
/// A single separator kind that occurs more than once is a thousands
/// separator. Currency symbols and letters are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalConverter;

impl FieldConverter for DecimalConverter {
    fn convert(&self, text: &str) -> Option<Value> {
        parse_decimal(text).map(Value::Decimal)
    }
}

fn parse_decimal(text: &str) -> Option<f64> {
    let negative = text
        .chars()
        .take_while(|c| !c.is_ascii_digit())
        .any(|c| c == '-');
    let body: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let body = body.trim_end_matches(['.', ',']);
    if body.is_empty() {
        return None;
    }

    let dots = body.matches('.').count();
    let commas = body.matches(',').count();
    let decimal_sep = match (dots, commas) {
        (0, 0) => None,
        (_, 0) if dots > 1 => None,
        (0, _) if commas > 1 => None,
        (_, 0) => Some('.'),
        (0, _) => Some(','),
        _ => body.rfind(['.', ',']).and_then(|i| body[i..].chars().next()),
    };

    let normalized: String = match decimal_sep {
        Some(sep) => {
            let split = body.rfind(sep)?;
            let (int_part, frac_part) = body.split_at(split);
            let int_digits: String = int_part.chars().filter(char::is_ascii_digit).collect();
            let frac_digits = &frac_part[1..];
            if frac_digits.contains(['.', ',']) {
                return None;
            }
            format!("{int_digits}.{frac_digits}")
        }
        None => body.chars().filter(char::is_ascii_digit).collect(),
    };

    let value: f64 = normalized.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Parses whole numbers, ignoring surrounding and grouping whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerConverter;

impl FieldConverter for IntegerConverter {
    fn convert(&self, text: &str) -> Option<Value> {
        let compact: String = text
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\'')
            .collect();
        compact.parse::<i64>().ok().map(Value::Integer)
    }
}

/// Tries each `chrono` format in order.
#[derive(Debug, Clone)]
pub struct DateConverter {
    formats: Vec<String>,
}

impl DateConverter {
    /// Formats tried by [`Default`]. Two-digit years come before four-digit
    /// ones so `%Y` never reads `24` as year 24.
    pub const DEFAULT_FORMATS: [&'static str; 5] =
        ["%Y-%m-%d", "%d/%m/%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

    pub fn new<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }
}

impl Default for DateConverter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FORMATS)
    }
}

impl FieldConverter for DateConverter {
    fn convert(&self, text: &str) -> Option<Value> {
        let trimmed = text.trim();
        self.formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
            .map(Value::Date)
    }
}

/// Source of converters for field types.
pub trait ConverterHierarchy {
    /// Return the converter for values of `field_type` matched by `regex`,
    /// or `None` if this hierarchy cannot convert them.
    ///
    /// `regex` is empty when a converter is needed for the field as a whole,
    /// such as for known values.
    fn converter(&self, field_type: FieldType, regex: &str) -> Option<Arc<dyn FieldConverter>>;
}

/// Resolves every [`FieldType`] to a built-in converter, whatever the regex.
#[derive(Debug, Clone, Default)]
pub struct DefaultHierarchy {
    /// Date formats; empty means [`DateConverter::DEFAULT_FORMATS`].
    pub date_formats: Vec<String>,
}

impl ConverterHierarchy for DefaultHierarchy {
    fn converter(&self, field_type: FieldType, _regex: &str) -> Option<Arc<dyn FieldConverter>> {
        let converter: Arc<dyn FieldConverter> = match field_type {
            FieldType::Text => Arc::new(TextConverter),
            FieldType::Decimal => Arc::new(DecimalConverter),
            FieldType::Integer => Arc::new(IntegerConverter),
            FieldType::Date if self.date_formats.is_empty() => Arc::new(DateConverter::default()),
            FieldType::Date => Arc::new(DateConverter::new(self.date_formats.iter().cloned())),
        };
        Some(converter)
    }
}

type ConverterKey = (FieldType, String);

/// Converter lookup by field and pattern regex, resolved once per store.
///
/// Each distinct `(field type, regex)` pair is asked of the hierarchy once.
/// The empty regex holds the field-level converter.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    fields: BTreeMap<String, FieldType>,
    resolved: HashMap<FieldType, HashMap<String, Arc<dyn FieldConverter>>>,
}

impl ConverterRegistry {
    /// Resolve the field-level converter of every type in `schema`, then one
    /// converter per distinct `(field type, regex)` among `patterns`.
    ///
    /// A `Text` key the hierarchy cannot serve falls back to
    /// [`TextConverter`]. Other unresolved keys stay unresolved. Patterns
    /// whose field is not in the schema are ignored.
    pub fn resolve(
        schema: &MetadataSchema,
        patterns: &[Pattern],
        hierarchy: &dyn ConverterHierarchy,
    ) -> Self {
        let mut registry = Self {
            fields: schema.fields.clone(),
            resolved: HashMap::new(),
        };
        let mut attempted: HashSet<ConverterKey> = HashSet::new();
        let keys = schema
            .fields
            .values()
            .map(|field_type| (*field_type, String::new()))
            .chain(patterns.iter().filter_map(|pattern| {
                schema
                    .field_type(pattern.metadata_field())
                    .map(|field_type| (field_type, pattern.regex().to_string()))
            }));
        for key in keys {
            if !attempted.insert(key.clone()) {
                continue;
            }
            let field_type = key.0;
            let converter = hierarchy.converter(field_type, &key.1).or_else(|| {
                (field_type == FieldType::Text)
                    .then(|| Arc::new(TextConverter) as Arc<dyn FieldConverter>)
            });
            match converter {
                Some(converter) => {
                    registry
                        .resolved
                        .entry(field_type)
                        .or_default()
                        .insert(key.1, converter);
                }
                None => tracing::warn!(field_type = %field_type, regex = %key.1, "no converter"),
            }
        }
        registry
    }

    /// Field-level converter for `field`.
    pub fn converter_for(&self, field: &str) -> Option<&dyn FieldConverter> {
        self.converter_for_pattern(field, "")
    }

    /// Converter for values of `field` matched by `regex`.
    pub fn converter_for_pattern(&self, field: &str, regex: &str) -> Option<&dyn FieldConverter> {
        let field_type = *self.fields.get(field)?;
        self.resolved
            .get(&field_type)?
            .get(regex)
            .map(|c| c.as_ref())
    }

    /// Whether known values for `field` can be converted.
    pub fn is_resolved(&self, field: &str) -> bool {
        self.converter_for(field).is_some()
    }

    /// Whether hits of a pattern on `field` with `regex` can be converted.
    pub fn is_resolved_for(&self, field: &str, regex: &str) -> bool {
        self.converter_for_pattern(field, regex).is_some()
    }

    /// Convert with the field-level converter.
    pub fn convert(&self, field: &str, text: &str) -> Option<Value> {
        self.converter_for(field)?.convert(text)
    }

    /// Convert with the converter resolved for `regex`.
    pub fn convert_with(&self, field: &str, regex: &str, text: &str) -> Option<Value> {
        self.converter_for_pattern(field, regex)?.convert(text)
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut resolved: Vec<(&FieldType, &String)> = self
            .resolved
            .iter()
            .flat_map(|(field_type, by_regex)| by_regex.keys().map(move |regex| (field_type, regex)))
            .collect();
        resolved.sort();
        f.debug_struct("ConverterRegistry")
            .field("fields", &self.fields)
            .field("resolved", &resolved)
            .finish()
    }
}
