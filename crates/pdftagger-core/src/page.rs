use crate::lines::{page_text, reconstruct_lines};
use crate::text::{TextPrimitive, TextRect};
use crate::words::{WordGroupOptions, WordGroupReconstructor};

/// The reconstructed content of one page, ready for pattern matching.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageData {
    /// Page number (1-based).
    pub page_number: usize,
    /// Full plain text of the page.
    pub raw_text: String,
    /// One rectangle per text line.
    pub lines: Vec<TextRect>,
    /// Word groups without style information.
    pub word_groups: Vec<TextRect>,
    /// Word groups that keep their colour and font signature.
    pub color_font_word_groups: Vec<TextRect>,
}

impl PageData {
    /// Build page data from the renderer's primitives for one page.
    pub fn from_primitives(
        page_number: usize,
        primitives: &[TextPrimitive],
        options: &WordGroupOptions,
    ) -> Self {
        let color_font_word_groups = WordGroupReconstructor::reconstruct(primitives, options);
        let word_groups = color_font_word_groups
            .iter()
            .map(TextRect::without_style)
            .collect();
        let lines = reconstruct_lines(primitives, options)
            .iter()
            .map(TextRect::without_style)
            .collect();
        Self {
            page_number,
            raw_text: page_text(primitives, options),
            lines,
            word_groups,
            color_font_word_groups,
        }
    }

    /// Returns true if the page carries no text at all.
    pub fn is_empty(&self) -> bool {
        self.raw_text.is_empty()
            && self.lines.is_empty()
            && self.word_groups.is_empty()
            && self.color_font_word_groups.is_empty()
    }
}

/// A rendered document: its pages in order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    /// Caller-assigned document identifier, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub doc_id: Option<String>,
    pub pages: Vec<PageData>,
}

impl Document {
    pub fn new(pages: Vec<PageData>) -> Self {
        Self { doc_id: None, pages }
    }

    /// Set the document identifier (builder pattern).
    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    /// Build a document from per-page primitives, numbering pages from 1.
    pub fn from_page_primitives(pages: &[Vec<TextPrimitive>], options: &WordGroupOptions) -> Self {
        Self::new(
            pages
                .iter()
                .enumerate()
                .map(|(i, primitives)| PageData::from_primitives(i + 1, primitives, options))
                .collect(),
        )
    }
}
