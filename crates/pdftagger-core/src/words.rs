use crate::geometry::Rect;
use crate::text::{StyleSignature, TextPrimitive, TextRect};

/// Options for word-group reconstruction.
///
/// Gap thresholds are multiples of the average glyph width of the preceding
/// primitive, so they scale with font size.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WordGroupOptions {
    /// A forward gap wider than this many glyph widths starts a new group.
    pub word_gap_factor: f64,
    /// A backward jump wider than this many glyph widths starts a new group.
    pub backtrack_factor: f64,
    /// Within a group, a forward gap wider than this many glyph widths is
    /// rendered as a single space in the merged text.
    pub space_factor: f64,
    /// Maximum baseline difference (in points) for two primitives to share a line.
    pub line_tolerance: f64,
    /// If true, a change of style signature also starts a new group.
    pub split_on_style_change: bool,
    /// If true, keep the caller's order instead of sorting into reading order.
    pub use_text_flow: bool,
}

impl Default for WordGroupOptions {
    fn default() -> Self {
        Self {
            word_gap_factor: 1.0,
            backtrack_factor: 1.0,
            space_factor: 0.25,
            line_tolerance: 0.5,
            split_on_style_change: false,
            use_text_flow: false,
        }
    }
}

/// A primitive tagged with the index of the visual line it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub line: usize,
    pub primitive: &'a TextPrimitive,
}

/// Sort primitives into reading order and assign line indices.
///
/// Lines are ordered top to bottom (descending baseline), primitives within a
/// line left to right. A primitive joins the current line when its baseline is
/// within `line_tolerance` of the line's first baseline. With `use_text_flow`
/// the input order is kept and only line indices are assigned.
pub fn reading_order<'a>(primitives: &'a [TextPrimitive], options: &WordGroupOptions) -> Vec<Placed<'a>> {
    let mut sorted: Vec<&TextPrimitive> = primitives.iter().collect();
    if !options.use_text_flow {
        sorted.sort_by(|a, b| b.line_origin_y.total_cmp(&a.line_origin_y));
    }

    let mut placed = Vec::with_capacity(sorted.len());
    let mut line = 0;
    let mut line_y: Option<f64> = None;
    for primitive in sorted {
        match line_y {
            Some(y) if (primitive.line_origin_y - y).abs() <= options.line_tolerance => {}
            Some(_) => {
                line += 1;
                line_y = Some(primitive.line_origin_y);
            }
            None => line_y = Some(primitive.line_origin_y),
        }
        placed.push(Placed { line, primitive });
    }

    if !options.use_text_flow {
        // Stable: equal keys keep their baseline order.
        placed.sort_by(|a, b| {
            a.line
                .cmp(&b.line)
                .then(a.primitive.rect.llx.total_cmp(&b.primitive.rect.llx))
        });
    }
    placed
}

/// How the current primitive relates to the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Join {
    /// Flush the pending group and start a new one.
    Boundary,
    /// Extend the pending group, optionally separating the texts with a space.
    Continuation { space: bool },
}

/// Horizontal distance from the end of `prev` to the start of `cur`.
/// Negative when `cur` starts before `prev` ends.
pub(crate) fn horizontal_gap(prev: &TextPrimitive, cur: &TextPrimitive) -> f64 {
    cur.rect.llx - prev.rect.urx
}

fn reference_width(prev: &TextPrimitive, cur: &TextPrimitive) -> f64 {
    let width = prev.char_width();
    if width > 0.0 { width } else { cur.char_width() }
}

/// Whether joining `prev` and `cur` with a gap needs an explicit space.
pub(crate) fn needs_space(prev: &TextPrimitive, cur: &TextPrimitive, gap: f64, space_factor: f64) -> bool {
    gap > space_factor * reference_width(prev, cur)
        && !prev.text.ends_with(char::is_whitespace)
        && !cur.text.starts_with(char::is_whitespace)
}

pub(crate) fn classify(prev: &Placed<'_>, cur: &Placed<'_>, options: &WordGroupOptions) -> Join {
    if prev.line != cur.line {
        return Join::Boundary;
    }
    let (p, c) = (prev.primitive, cur.primitive);
    if options.split_on_style_change && !p.is_style_compatible(c) {
        return Join::Boundary;
    }
    let width = reference_width(p, c);
    let gap = horizontal_gap(p, c);
    if gap > options.word_gap_factor * width || gap < -options.backtrack_factor * width {
        return Join::Boundary;
    }
    Join::Continuation {
        space: needs_space(p, c, gap, options.space_factor),
    }
}

/// Running text buffer and bounding box of a group under construction.
#[derive(Debug)]
pub(crate) struct Accumulator {
    text: String,
    rect: Rect,
    style: Option<StyleSignature>,
}

impl Accumulator {
    pub(crate) fn start(primitive: &TextPrimitive) -> Self {
        Self {
            text: primitive.text.clone(),
            rect: primitive.rect,
            style: Some(primitive.style.clone()),
        }
    }

    pub(crate) fn extend(&mut self, primitive: &TextPrimitive, space: bool) {
        if space {
            self.text.push(' ');
        }
        self.text.push_str(&primitive.text);
        self.rect = self.rect.union(&primitive.rect);
        if self.style.as_ref() != Some(&primitive.style) {
            self.style = None;
        }
    }

    /// Emit the group, or `None` if its text is blank.
    pub(crate) fn finish(self) -> Option<TextRect> {
        let text = self.text.trim();
        if text.is_empty() {
            return None;
        }
        Some(TextRect {
            text: text.to_string(),
            rect: self.rect,
            style: self.style,
        })
    }
}

/// Merges a page's text primitives into word groups.
pub struct WordGroupReconstructor;

impl WordGroupReconstructor {
    /// Reconstruct word groups from the primitives of one page.
    ///
    /// Primitives are put into reading order, then walked pairwise. The
    /// current primitive continues the pending group when it sits on the same
    /// line and is not separated by a word gap; otherwise the pending group is
    /// flushed and a new one starts. The final pending group is always
    /// flushed, so a trailing boundary yields a singleton group.
    ///
    /// Each group keeps the style signature only if all merged primitives
    /// shared it. Blank groups are dropped. Empty input yields no groups.
    pub fn reconstruct(primitives: &[TextPrimitive], options: &WordGroupOptions) -> Vec<TextRect> {
        let placed = reading_order(primitives, options);
        let Some(first) = placed.first() else {
            return Vec::new();
        };

        let mut groups = Vec::new();
        let mut pending = Accumulator::start(first.primitive);
        for pair in placed.windows(2) {
            match classify(&pair[0], &pair[1], options) {
                Join::Boundary => {
                    let next = Accumulator::start(pair[1].primitive);
                    groups.extend(std::mem::replace(&mut pending, next).finish());
                }
                Join::Continuation { space } => pending.extend(pair[1].primitive, space),
            }
        }
        groups.extend(pending.finish());
        groups
    }
}

/// Reconstruct word groups with default options.
pub fn reconstruct(primitives: &[TextPrimitive]) -> Vec<TextRect> {
    WordGroupReconstructor::reconstruct(primitives, &WordGroupOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Primitive on baseline `y` spanning `x0..x1`, 10pt tall.
    fn make_prim(text: &str, x0: f64, x1: f64, y: f64) -> TextPrimitive {
        TextPrimitive::new(text, Rect::new(x0, y - 2.0, x1, y + 8.0)).with_line_origin_y(y)
    }

    fn styled(p: TextPrimitive, fill: &str) -> TextPrimitive {
        p.with_style(StyleSignature::new(Some(fill), None, Some("Helvetica"), Some(10.0)))
    }

    #[test]
    fn test_default_options() {
        let opts = WordGroupOptions::default();
        assert_eq!(opts.word_gap_factor, 1.0);
        assert_eq!(opts.space_factor, 0.25);
        assert_eq!(opts.line_tolerance, 0.5);
        assert!(!opts.split_on_style_change);
        assert!(!opts.use_text_flow);
    }

    #[test]
    fn test_empty_input() {
        assert!(reconstruct(&[]).is_empty());
    }

    #[test]
    fn test_single_primitive_is_identity() {
        let p = make_prim("INV-4521", 100.0, 140.0, 700.0);
        let groups = reconstruct(std::slice::from_ref(&p));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].text, "INV-4521");
        assert_eq!(groups[0].rect, p.rect);
    }

    #[test]
    fn test_adjacent_primitives_merge_with_space() {
        // "Total" is 5pt per glyph; a 3pt gap is below a word gap but
        // wide enough to be a visible space.
        let a = styled(make_prim("Total", 10.0, 35.0, 700.0), "000000");
        let b = styled(make_prim("Due", 38.0, 53.0, 700.0), "000000");
        let groups = reconstruct(&[a, b]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].text, "Total Due");
        assert_eq!(groups[0].rect, Rect::new(10.0, 698.0, 53.0, 708.0));
        assert!(groups[0].style.is_some());
    }

    #[test]
    fn test_touching_primitives_merge_without_space() {
        let groups = reconstruct(&[
            make_prim("45", 10.0, 20.0, 700.0),
            make_prim(".00", 20.0, 35.0, 700.0),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].text, "45.00");
    }

    #[test]
    fn test_existing_whitespace_is_not_doubled() {
        let groups = reconstruct(&[
            make_prim("Total ", 10.0, 40.0, 700.0),
            make_prim("Due", 42.0, 57.0, 700.0),
        ]);
        assert_eq!(groups[0].text, "Total Due");
    }

    #[test]
    fn test_word_gap_splits() {
        let groups = reconstruct(&[
            make_prim("Date", 10.0, 30.0, 700.0),
            make_prim("01/02/2018", 60.0, 110.0, 700.0),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].text, "Date");
        assert_eq!(groups[1].text, "01/02/2018");
        assert_eq!(groups[1].rect, Rect::new(60.0, 698.0, 110.0, 708.0));
    }

    #[test]
    fn test_different_lines_split() {
        let groups = reconstruct(&[
            make_prim("Hi", 10.0, 20.0, 700.0),
            make_prim("Lo", 20.0, 30.0, 680.0),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].text, "Hi");
        assert_eq!(groups[1].text, "Lo");
    }

    #[test]
    fn test_reading_order_top_to_bottom_left_to_right() {
        let groups = reconstruct(&[
            make_prim("second", 10.0, 40.0, 680.0),
            make_prim("right", 200.0, 225.0, 700.0),
            make_prim("left", 10.0, 30.0, 700.0),
        ]);
        let texts: Vec<&str> = groups.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(texts, vec!["left", "right", "second"]);
    }

    #[test]
    fn test_baseline_jitter_within_tolerance_is_same_line() {
        let groups = reconstruct(&[
            make_prim("B", 15.0, 20.0, 700.0),
            make_prim("A", 10.0, 15.0, 700.3),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].text, "AB");
    }

    #[test]
    fn test_last_primitive_boundary_emits_singleton() {
        let groups = reconstruct(&[
            make_prim("Ref", 10.0, 25.0, 700.0),
            make_prim(":", 25.0, 28.0, 700.0),
            make_prim("X", 200.0, 205.0, 700.0),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].text, "Ref:");
        assert_eq!(groups[1].text, "X");
    }

    #[test]
    fn test_last_primitive_continuation_extends_group() {
        let groups = reconstruct(&[
            make_prim("Ref", 10.0, 25.0, 700.0),
            make_prim(":", 25.0, 28.0, 700.0),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].text, "Ref:");
        assert_eq!(groups[0].rect.urx, 28.0);
    }

    #[test]
    fn test_backtrack_splits() {
        // Overprinted run jumping far back on the same line.
        let opts = WordGroupOptions {
            use_text_flow: true,
            ..WordGroupOptions::default()
        };
        let groups = WordGroupReconstructor::reconstruct(
            &[make_prim("Later", 100.0, 125.0, 700.0), make_prim("Early", 10.0, 35.0, 700.0)],
            &opts,
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].text, "Later");
    }

    #[test]
    fn test_mixed_style_drops_signature() {
        let groups = reconstruct(&[
            styled(make_prim("12", 10.0, 20.0, 700.0), "ff0000"),
            styled(make_prim("34", 20.0, 30.0, 700.0), "000000"),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].text, "1234");
        assert_eq!(groups[0].style, None);
    }

    #[test]
    fn test_split_on_style_change() {
        let opts = WordGroupOptions {
            split_on_style_change: true,
            ..WordGroupOptions::default()
        };
        let groups = WordGroupReconstructor::reconstruct(
            &[
                styled(make_prim("12", 10.0, 20.0, 700.0), "ff0000"),
                styled(make_prim("34", 20.0, 30.0, 700.0), "000000"),
            ],
            &opts,
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[1].style.as_ref().and_then(|s| s.fill_color.as_deref()),
            Some("000000")
        );
    }

    #[test]
    fn test_blank_groups_are_dropped() {
        let groups = reconstruct(&[
            make_prim("A", 10.0, 15.0, 700.0),
            make_prim(" ", 100.0, 105.0, 700.0),
            make_prim("B", 200.0, 205.0, 700.0),
        ]);
        let texts: Vec<&str> = groups.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "B"]);
    }

    #[test]
    fn test_configurable_word_gap() {
        let prims = [
            make_prim("AB", 10.0, 20.0, 700.0),
            make_prim("CD", 30.0, 40.0, 700.0), // gap = 10, glyph width = 5
        ];
        assert_eq!(reconstruct(&prims).len(), 2);

        let opts = WordGroupOptions {
            word_gap_factor: 3.0,
            ..WordGroupOptions::default()
        };
        let groups = WordGroupReconstructor::reconstruct(&prims, &opts);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].text, "AB CD");
    }

    #[test]
    fn test_deterministic() {
        let prims = vec![
            make_prim("Invoice", 10.0, 45.0, 750.0),
            make_prim("No.", 47.0, 62.0, 750.0),
            make_prim("4521", 120.0, 140.0, 750.0),
            make_prim("Total", 10.0, 35.0, 100.0),
        ];
        assert_eq!(reconstruct(&prims), reconstruct(&prims));
    }
}
