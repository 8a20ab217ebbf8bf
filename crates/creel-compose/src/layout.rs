//! Caption placement and line packing.
//!
//! Widths are estimated from character counts, not real glyph metrics, so
//! the packing is deterministic and needs no font files. The compositor does
//! the final wrapping against `max_width`.

use creel_models::{
    CanvasSize, DisplayLine, SpanPlacement, StyleConfig, TextLayout, TranscriptSpan,
};

/// Average glyph width as a fraction of font size.
pub const AVG_GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Share of canvas width handed to the compositor as wrap width.
pub const MAX_WIDTH_SHARE: f64 = 0.9;

/// Share of canvas width a packed display line may fill.
pub const LINE_FILL_SHARE: f64 = 0.8;

/// Estimated pixel width of `text` at `font_size`.
pub fn estimate_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * AVG_GLYPH_WIDTH_RATIO
}

/// Place every span and pack spans into display lines.
pub fn layout(spans: &[TranscriptSpan], style: &StyleConfig, canvas: CanvasSize) -> TextLayout {
    let anchor_x = canvas.width / 2.0;
    let anchor_y = canvas.height * style.text_position.vertical_fraction();
    let max_width = canvas.width * MAX_WIDTH_SHARE;

    let lines = pack_lines(spans, style.font_size, canvas.width * LINE_FILL_SHARE);

    let mut placements: Vec<SpanPlacement> = Vec::with_capacity(spans.len());
    for (line_index, line) in lines.iter().enumerate() {
        for &span_index in &line.span_indices {
            placements.push(SpanPlacement {
                span_index,
                anchor_x,
                anchor_y,
                max_width,
                line: line_index,
            });
        }
    }

    TextLayout { placements, lines }
}

/// Greedy packing: keep appending spans (separated by one space glyph)
/// until the next one would overflow `limit`, then start a new line. A span
/// wider than `limit` gets a line of its own.
fn pack_lines(spans: &[TranscriptSpan], font_size: f64, limit: f64) -> Vec<DisplayLine> {
    let space = estimate_width(" ", font_size);
    let mut lines: Vec<DisplayLine> = Vec::new();
    let mut current: Option<DisplayLine> = None;

    for (index, span) in spans.iter().enumerate() {
        let width = estimate_width(span.text.trim(), font_size);

        if let Some(line) = current.as_mut() {
            let widened = line.estimated_width + space + width;
            if widened <= limit {
                line.span_indices.push(index);
                line.estimated_width = widened;
                line.start = line.start.min(span.start);
                line.end = line.end.max(span.end);
                continue;
            }
        }

        if let Some(done) = current.take() {
            lines.push(done);
        }
        current = Some(DisplayLine {
            span_indices: vec![index],
            estimated_width: width,
            start: span.start,
            end: span.end,
        });
    }

    if let Some(done) = current {
        lines.push(done);
    }
    lines
}
