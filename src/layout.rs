//! Layout – splits a request into text blocks (title, body), wraps them to
//! the content width and decides where each line sits horizontally.
//!
//! Vertical placement happens later in [`crate::pagination`].

use crate::fonts::{wrap_text, TextMeasurer, WrappedLine};
use crate::layout_config::{LineRole, PageGeometry, TextRun};
use crate::request::{Alignment, GenerationRequest};

/// Title leading, as a multiple of the title size.
pub const TITLE_LEADING: f32 = 1.35;

/// Fixed gap between the title block and the body.
pub const TITLE_SPACING_PT: f32 = 20.0;

/// A run of wrapped lines that share font, alignment and leading.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub role: LineRole,
    pub font_size: f32,
    pub bold: bool,
    pub alignment: Alignment,
    /// Distance between consecutive baselines.
    pub line_height: f32,
    /// Extra space below the block's last line.
    pub space_after: f32,
    pub lines: Vec<WrappedLine>,
}

/// Build the blocks for a request: an optional title, then the body.
pub fn build_blocks(
    request: &GenerationRequest,
    geometry: &PageGeometry,
    measurer: &TextMeasurer<'_>,
) -> Vec<TextBlock> {
    let width = geometry.content_width();
    let mut blocks = Vec::with_capacity(2);

    if request.has_title() {
        let size = request.title_font_size();
        blocks.push(TextBlock {
            role: LineRole::Title,
            font_size: size,
            bold: true,
            alignment: Alignment::Center,
            line_height: size * TITLE_LEADING,
            space_after: TITLE_SPACING_PT,
            lines: wrap_text(request.title.trim(), size, width, measurer),
        });
    }

    let size = request.body_font_size();
    blocks.push(TextBlock {
        role: LineRole::Body,
        font_size: size,
        bold: false,
        alignment: request.alignment,
        line_height: size * request.line_spacing,
        space_after: 0.0,
        lines: wrap_text(&request.content, size, width, measurer),
    });

    blocks
}

/// Position a wrapped line inside the content box.
///
/// Left/center/right produce a single run. Justified lines that are not the
/// last of their paragraph get one run per word, with the slack shared
/// evenly between the gaps.
pub fn place_line(
    line: &WrappedLine,
    alignment: Alignment,
    font_size: f32,
    geometry: &PageGeometry,
    measurer: &TextMeasurer<'_>,
) -> Vec<TextRun> {
    if line.text.is_empty() {
        return Vec::new();
    }

    let left = geometry.content_left();
    let width = geometry.content_width();
    let slack = (width - line.width).max(0.0);

    let offset = match alignment {
        Alignment::Left => 0.0,
        Alignment::Center => slack / 2.0,
        Alignment::Right => slack,
        Alignment::Justified => {
            if let Some(runs) = justify(line, font_size, left, slack, measurer) {
                return runs;
            }
            0.0
        }
    };

    vec![TextRun {
        text: line.text.clone(),
        x: left + offset,
    }]
}

/// Spread `slack` across inter-word gaps. `None` when the line must stay
/// ragged: paragraph ends and single-word lines.
///
/// Leading indentation keeps its natural width; every gap keeps its own
/// spaces and receives an equal share of the slack.
fn justify(
    line: &WrappedLine,
    font_size: f32,
    left: f32,
    slack: f32,
    measurer: &TextMeasurer<'_>,
) -> Option<Vec<TextRun>> {
    if line.ends_paragraph {
        return None;
    }
    let body = line.text.trim_start_matches(' ');
    let gaps = body.split(' ').filter(|w| !w.is_empty()).count().checked_sub(1)?;
    if gaps == 0 {
        return None;
    }

    let space = measurer.char_width(' ', font_size);
    let extra = slack / gaps as f32;
    let indent = (line.text.len() - body.len()) as f32 * space;

    let mut runs = Vec::with_capacity(gaps + 1);
    let mut x = left + indent;
    let mut rest = body;
    loop {
        let end = rest.find(' ').unwrap_or(rest.len());
        let (word, tail) = rest.split_at(end);
        runs.push(TextRun {
            text: word.to_string(),
            x,
        });
        let next = tail.trim_start_matches(' ');
        if next.is_empty() {
            break;
        }
        let spaces = (tail.len() - next.len()) as f32;
        x += measurer.text_width(word, font_size) + spaces * space + extra;
        rest = next;
    }
    Some(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_config::Margins;

    fn geometry() -> PageGeometry {
        PageGeometry::a4(Margins::uniform(36.0))
    }

    fn line(text: &str, ends_paragraph: bool, m: &TextMeasurer<'_>) -> WrappedLine {
        WrappedLine {
            text: text.to_string(),
            width: m.text_width(text, 10.0),
            ends_paragraph,
        }
    }

    #[test]
    fn blank_title_produces_body_only() {
        let m = TextMeasurer::heuristic();
        let req = GenerationRequest::new("Body", 12).with_title("  ");
        let blocks = build_blocks(&req, &geometry(), &m);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].role, LineRole::Body);
    }

    #[test]
    fn title_block_is_bold_centered_and_larger() {
        let m = TextMeasurer::heuristic();
        let req = GenerationRequest::new("Body", 12)
            .with_title("Heading")
            .with_alignment(Alignment::Right);
        let blocks = build_blocks(&req, &geometry(), &m);
        assert_eq!(blocks.len(), 2);
        let title = &blocks[0];
        assert_eq!(title.role, LineRole::Title);
        assert!(title.bold);
        assert_eq!(title.alignment, Alignment::Center);
        assert_eq!(title.font_size, 18.0);
        assert_eq!(title.space_after, TITLE_SPACING_PT);
        assert_eq!(blocks[1].alignment, Alignment::Right);
        assert!((blocks[1].line_height - 12.0 * 1.2).abs() < 0.001);
    }

    #[test]
    fn alignment_offsets() {
        let m = TextMeasurer::heuristic();
        let g = geometry();
        let l = line("abcd", true, &m); // 20 pt wide
        let slack = g.content_width() - 20.0;

        let left = place_line(&l, Alignment::Left, 10.0, &g, &m);
        assert_eq!(left[0].x, 36.0);

        let center = place_line(&l, Alignment::Center, 10.0, &g, &m);
        assert!((center[0].x - (36.0 + slack / 2.0)).abs() < 0.001);

        let right = place_line(&l, Alignment::Right, 10.0, &g, &m);
        assert!((right[0].x + 20.0 - (36.0 + g.content_width())).abs() < 0.001);
    }

    #[test]
    fn justified_line_spans_content_width() {
        let m = TextMeasurer::heuristic();
        let g = geometry();
        let l = line("aa bb cc", false, &m);
        let runs = place_line(&l, Alignment::Justified, 10.0, &g, &m);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].x, g.content_left());
        let last = runs.last().unwrap();
        let right_edge = last.x + m.text_width(&last.text, 10.0);
        assert!((right_edge - (g.content_left() + g.content_width())).abs() < 0.01);
    }

    #[test]
    fn justified_line_keeps_indent_and_wide_gaps() {
        let m = TextMeasurer::heuristic();
        let g = geometry();
        // Indent of 2 spaces, then a 3-space gap and a 1-space gap.
        let l = line("  aa   bb cc", false, &m);
        let runs = place_line(&l, Alignment::Justified, 10.0, &g, &m);
        let texts: Vec<&str> = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["aa", "bb", "cc"]);
        assert_eq!(runs[0].x, g.content_left() + 10.0);

        let extra = (g.content_width() - l.width) / 2.0;
        assert!((runs[1].x - (runs[0].x + 10.0 + 15.0 + extra)).abs() < 0.01);
        assert!((runs[2].x - (runs[1].x + 10.0 + 5.0 + extra)).abs() < 0.01);
        let right_edge = runs[2].x + m.text_width("cc", 10.0);
        assert!((right_edge - (g.content_left() + g.content_width())).abs() < 0.01);
    }

    #[test]
    fn justified_paragraph_end_stays_ragged() {
        let m = TextMeasurer::heuristic();
        let g = geometry();
        let runs = place_line(&line("aa bb", true, &m), Alignment::Justified, 10.0, &g, &m);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].x, g.content_left());

        let runs = place_line(&line("single", false, &m), Alignment::Justified, 10.0, &g, &m);
        assert_eq!(runs.len(), 1);
    }

    #[test]
    fn empty_line_has_no_runs() {
        let m = TextMeasurer::heuristic();
        let runs = place_line(&line("", true, &m), Alignment::Center, 10.0, &geometry(), &m);
        assert!(runs.is_empty());
    }
}
