//! pdftagger-core: renderer-independent text primitives and layout reconstruction.
//!
//! This crate provides the foundational types ([`Rect`], [`TextPrimitive`],
//! [`TextRect`], [`PageData`]) and the algorithms that rebuild word groups,
//! lines and page text from the positioned text runs emitted by a PDF
//! renderer. It does not read PDF files itself.

pub mod geometry;
pub mod lines;
pub mod page;
pub mod text;
pub mod words;

pub use geometry::Rect;
pub use lines::{page_text, reconstruct_lines};
pub use page::{Document, PageData};
pub use text::{StyleSignature, TextPrimitive, TextRect};
pub use words::{WordGroupOptions, WordGroupReconstructor, reconstruct};
