use crate::text::{TextPrimitive, TextRect};
use crate::words::{Accumulator, WordGroupOptions, horizontal_gap, needs_space, reading_order};

/// Collapse each visual line of primitives into a single text rectangle.
///
/// Lines are returned top to bottom. Within a line, primitives are joined
/// left to right and separated by a single space wherever the gap between
/// them is visible (see [`WordGroupOptions::space_factor`]). The style is
/// kept only when uniform across the line.
pub fn reconstruct_lines(primitives: &[TextPrimitive], options: &WordGroupOptions) -> Vec<TextRect> {
    let placed = reading_order(primitives, options);
    let Some(first) = placed.first() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut pending = Accumulator::start(first.primitive);
    for pair in placed.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        if prev.line != cur.line {
            let next = Accumulator::start(cur.primitive);
            lines.extend(std::mem::replace(&mut pending, next).finish());
            continue;
        }
        let gap = horizontal_gap(prev.primitive, cur.primitive);
        let space = needs_space(prev.primitive, cur.primitive, gap, options.space_factor);
        pending.extend(cur.primitive, space);
    }
    lines.extend(pending.finish());
    lines
}

/// Plain text of a page: one reconstructed line per text line.
pub fn page_text(primitives: &[TextPrimitive], options: &WordGroupOptions) -> String {
    reconstruct_lines(primitives, options)
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
