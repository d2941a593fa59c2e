//! pdftagger: learned extraction patterns for structured PDF metadata.
//!
//! Patterns map a locator on a reconstructed page (raw text, a reference
//! rectangle, or a colour/font signature) plus a regular expression to a
//! metadata field. A [`PatternStore`] runs them against a [`Document`],
//! converts matches into typed [`Value`]s and learns from false positives.
//!
//! ```ignore
//! use pdftagger::{Document, DefaultHierarchy, PatternStore, StoreProfile};
//!
//! let store = PatternStore::from_profile(profile, &DefaultHierarchy::default());
//! let result = store.extract(&document);
//! for (field, value) in result.best_values(store.options().hit_policy) {
//!     println!("{field}: {value}");
//! }
//! ```

pub mod convert;
pub mod error;
pub mod index;
pub mod pattern;
pub mod result;
pub mod store;

pub use convert::{
    ConverterHierarchy, ConverterRegistry, DateConverter, DecimalConverter, DefaultHierarchy,
    FieldConverter, FieldType, IntegerConverter, MetadataSchema, TextConverter, Value,
};
pub use error::{Result, TagError};
pub use index::PageIndex;
pub use pattern::{CfAxis, Locator, Pattern, PatternRecord, SourceKind};
pub use result::{CheckResult, ExtractionResult, Hit, HitPolicy, KnownValues};
pub use store::{ExtractOptions, PatternStore, StoreInfo, StoreProfile};

pub use pdftagger_core::{
    Document, PageData, Rect, StyleSignature, TextPrimitive, TextRect, WordGroupOptions,
    WordGroupReconstructor, page_text, reconstruct, reconstruct_lines,
};
