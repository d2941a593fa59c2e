use crate::geometry::Rect;

/// Colour and font attributes of a text run.
///
/// Two signatures are equal only if all four fields compare equal, where an
/// absent field equals only another absent field.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleSignature {
    /// Non-stroking (fill) colour as reported by the renderer.
    pub fill_color: Option<String>,
    /// Stroking (outline) colour as reported by the renderer.
    pub stroke_color: Option<String>,
    /// PostScript font name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<f64>,
}

impl StyleSignature {
    pub fn new(
        fill_color: Option<&str>,
        stroke_color: Option<&str>,
        font_name: Option<&str>,
        font_size: Option<f64>,
    ) -> Self {
        Self {
            fill_color: fill_color.map(str::to_string),
            stroke_color: stroke_color.map(str::to_string),
            font_name: font_name.map(str::to_string),
            font_size,
        }
    }

    /// Returns true if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.fill_color.is_none()
            && self.stroke_color.is_none()
            && self.font_name.is_none()
            && self.font_size.is_none()
    }
}

/// An atomic positioned run of text emitted by the page renderer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextPrimitive {
    /// The text content of this run.
    pub text: String,
    /// Bounding box from the descent line to the ascent line.
    pub rect: Rect,
    /// Y coordinate of the baseline origin, used to decide line membership.
    pub line_origin_y: f64,
    /// Style attributes. Unstyled runs carry the default (empty) signature.
    #[cfg_attr(feature = "serde", serde(default))]
    pub style: StyleSignature,
}

impl TextPrimitive {
    /// Create an unstyled primitive whose baseline is the bottom of `rect`.
    pub fn new(text: impl Into<String>, rect: Rect) -> Self {
        Self {
            text: text.into(),
            rect,
            line_origin_y: rect.lly,
            style: StyleSignature::default(),
        }
    }

    /// Set the baseline origin (builder pattern).
    pub fn with_line_origin_y(mut self, line_origin_y: f64) -> Self {
        self.line_origin_y = line_origin_y;
        self
    }

    /// Set the style signature (builder pattern).
    pub fn with_style(mut self, style: StyleSignature) -> Self {
        self.style = style;
        self
    }

    /// Average glyph width of this run, or 0.0 for empty text.
    pub fn char_width(&self) -> f64 {
        let count = self.text.chars().count();
        if count == 0 {
            0.0
        } else {
            self.rect.width() / count as f64
        }
    }

    /// Whether `other` has exactly the same style signature.
    pub fn is_style_compatible(&self, other: &TextPrimitive) -> bool {
        self.style == other.style
    }
}

/// A reconstructed word group or line: merged text with its bounding box.
///
/// `style` is present only when every merged primitive shared the same
/// style signature.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRect {
    pub text: String,
    pub rect: Rect,
    #[cfg_attr(feature = "serde", serde(default))]
    pub style: Option<StyleSignature>,
}

impl TextRect {
    pub fn new(text: impl Into<String>, rect: Rect) -> Self {
        Self {
            text: text.into(),
            rect,
            style: None,
        }
    }

    /// Copy of this rectangle with the style discarded.
    pub fn without_style(&self) -> TextRect {
        TextRect {
            text: self.text.clone(),
            rect: self.rect,
            style: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_defaults_to_bottom_baseline() {
        let p = TextPrimitive::new("Total", Rect::new(10.0, 700.0, 35.0, 710.0));
        assert_eq!(p.line_origin_y, 700.0);
        assert!(p.style.is_empty());
    }

    #[test]
    fn test_char_width() {
        let p = TextPrimitive::new("Total", Rect::new(10.0, 700.0, 35.0, 710.0));
        assert_eq!(p.char_width(), 5.0);
        let empty = TextPrimitive::new("", Rect::new(10.0, 700.0, 10.0, 710.0));
        assert_eq!(empty.char_width(), 0.0);
    }

    #[test]
    fn test_style_compatibility_requires_all_fields() {
        let red = StyleSignature::new(Some("ff0000"), None, Some("Helvetica"), Some(10.0));
        let red_bigger = StyleSignature::new(Some("ff0000"), None, Some("Helvetica"), Some(12.0));
        let a = TextPrimitive::new("A", Rect::new(0.0, 0.0, 5.0, 10.0)).with_style(red.clone());
        let b = TextPrimitive::new("B", Rect::new(5.0, 0.0, 10.0, 10.0)).with_style(red);
        let c = TextPrimitive::new("C", Rect::new(10.0, 0.0, 15.0, 10.0)).with_style(red_bigger);
        assert!(a.is_style_compatible(&b));
        assert!(!a.is_style_compatible(&c));
    }

    #[test]
    fn test_absent_style_fields_compare_equal() {
        let a = TextPrimitive::new("A", Rect::new(0.0, 0.0, 5.0, 10.0));
        let b = TextPrimitive::new("B", Rect::new(5.0, 0.0, 10.0, 10.0));
        assert!(a.is_style_compatible(&b));
    }

    #[test]
    fn test_text_rect_without_style() {
        let mut r = TextRect::new("45.00", Rect::new(0.0, 0.0, 20.0, 10.0));
        r.style = Some(StyleSignature::new(None, None, Some("Courier"), Some(9.0)));
        let plain = r.without_style();
        assert_eq!(plain.text, "45.00");
        assert_eq!(plain.style, None);
    }
}
