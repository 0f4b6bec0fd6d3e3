//! Pagination – flows text blocks down A4 pages and stamps page footers.
//!
//! Handles:
//! - Top/bottom margins as hard page boundaries
//! - Lines taller than the content area (one line per page, never stalls)
//! - "Page i of N" footers, added once the total page count is known

use crate::fonts::{FontMetrics, TextMeasurer};
use crate::layout::{place_line, TextBlock};
use crate::layout_config::*;

/// Footer font size, independent of the body size.
pub const FOOTER_FONT_SIZE: f32 = 10.0;

/// Distance from the bottom page edge to the bottom of the footer text.
pub const FOOTER_OFFSET_PT: f32 = 20.0;

pub fn footer_text(page_number: usize, page_count: usize) -> String {
    format!("Page {page_number} of {page_count}")
}

/// Baseline offset from the top of a line box.
///
/// The glyph box (ascender + descender) is centred in the line box, the
/// same half-leading model CSS uses.
fn baseline_offset(metrics: &FontMetrics, font_size: f32, line_height: f32) -> f32 {
    let ascent = metrics.ascender_pt(font_size);
    let descent = metrics.descender_pt(font_size);
    (line_height - (ascent + descent)) / 2.0 + ascent
}

/// Convert text blocks into pages. Always returns at least one page.
pub fn paginate(
    blocks: &[TextBlock],
    geometry: &PageGeometry,
    metrics: &FontMetrics,
    measurer: &TextMeasurer<'_>,
) -> Vec<PageLayout> {
    let mut pages: Vec<PageLayout> = Vec::new();
    let mut current = PageLayout {
        page_index: 0,
        lines: Vec::new(),
        footer: None,
    };
    let mut cursor = geometry.content_top();

    for block in blocks {
        let baseline = baseline_offset(metrics, block.font_size, block.line_height);

        for wrapped in &block.lines {
            // Does this line overflow the current page? Empty lines count as
            // content, so a page never stays empty and oversized lines still advance.
            if cursor + block.line_height > geometry.content_bottom() && !current.lines.is_empty() {
                let next_index = pages.len() + 1;
                pages.push(std::mem::replace(
                    &mut current,
                    PageLayout {
                        page_index: next_index,
                        lines: Vec::new(),
                        footer: None,
                    },
                ));
                cursor = geometry.content_top();
            }

            current.lines.push(TextLine {
                role: block.role,
                text: wrapped.text.clone(),
                font_size: block.font_size,
                bold: block.bold,
                baseline: cursor + baseline,
                runs: place_line(wrapped, block.alignment, block.font_size, geometry, measurer),
            });
            cursor += block.line_height;
        }

        cursor += block.space_after;
    }

    pages.push(current);
    log::debug!("Paginated {} block(s) into {} page(s)", blocks.len(), pages.len());
    pages
}

/// Overlay a centred "Page i of N" footer on every page.
pub fn stamp_footers(
    pages: &mut [PageLayout],
    geometry: &PageGeometry,
    metrics: &FontMetrics,
    measurer: &TextMeasurer<'_>,
) {
    let count = pages.len();
    let baseline =
        geometry.height - FOOTER_OFFSET_PT - metrics.descender_pt(FOOTER_FONT_SIZE);

    for (i, page) in pages.iter_mut().enumerate() {
        let text = footer_text(i + 1, count);
        let width = measurer.text_width(&text, FOOTER_FONT_SIZE);
        page.footer = Some(TextLine {
            role: LineRole::Footer,
            runs: vec![TextRun {
                text: text.clone(),
                x: (geometry.width - width) / 2.0,
            }],
            text,
            font_size: FOOTER_FONT_SIZE,
            bold: false,
            baseline,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::WrappedLine;
    use crate::layout_config::LineRole;
    use crate::request::Alignment;

    fn metrics() -> FontMetrics {
        FontMetrics {
            units_per_em: 1000.0,
            ascender: 800.0,
            descender: -200.0,
        }
    }

    fn body(lines: usize, line_height: f32) -> TextBlock {
        TextBlock {
            role: LineRole::Body,
            font_size: 10.0,
            bold: false,
            alignment: Alignment::Left,
            line_height,
            space_after: 0.0,
            lines: (0..lines)
                .map(|i| WrappedLine {
                    text: format!("line {i}"),
                    width: 30.0,
                    ends_paragraph: true,
                })
                .collect(),
        }
    }

    #[test]
    fn single_page() {
        let g = PageGeometry::a4(Margins::uniform(36.0));
        let pages = paginate(&[body(5, 12.0)], &g, &metrics(), &TextMeasurer::heuristic());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines.len(), 5);
    }

    #[test]
    fn multiple_pages() {
        let g = PageGeometry::a4(Margins::uniform(36.0));
        // 769.89 pt of content / 12 pt lines = 64 lines per page.
        let pages = paginate(&[body(200, 12.0)], &g, &metrics(), &TextMeasurer::heuristic());
        assert_eq!(pages.len(), 4);
        assert_eq!(pages[0].lines.len(), 64);
        assert_eq!(pages.iter().map(|p| p.lines.len()).sum::<usize>(), 200);
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.page_index, i);
            for line in &page.lines {
                assert!(line.baseline <= g.content_bottom());
                assert!(line.baseline >= g.content_top());
            }
        }
    }

    #[test]
    fn oversized_lines_get_a_page_each() {
        let g = PageGeometry::a4(Margins::uniform(36.0));
        let pages = paginate(&[body(3, 2000.0)], &g, &metrics(), &TextMeasurer::heuristic());
        assert_eq!(pages.len(), 3);
        assert!(pages.iter().all(|p| p.lines.len() == 1));
    }

    #[test]
    fn empty_input_still_has_one_page() {
        let g = PageGeometry::a4(Margins::uniform(36.0));
        let pages = paginate(&[], &g, &metrics(), &TextMeasurer::heuristic());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
    }

    #[test]
    fn baseline_centres_glyph_box() {
        // 10 pt glyph box (8 up, 2 down) in a 12 pt line: 1 pt above, 1 below.
        assert!((baseline_offset(&metrics(), 10.0, 12.0) - 9.0).abs() < 0.001);
    }

    #[test]
    fn footers_number_every_page() {
        let g = PageGeometry::a4(Margins::uniform(36.0));
        let m = TextMeasurer::heuristic();
        let mut pages = paginate(&[body(150, 12.0)], &g, &metrics(), &m);
        stamp_footers(&mut pages, &g, &metrics(), &m);
        let n = pages.len();
        for (i, page) in pages.iter().enumerate() {
            let footer = page.footer.as_ref().unwrap();
            assert_eq!(footer.text, format!("Page {} of {}", i + 1, n));
            assert_eq!(footer.font_size, FOOTER_FONT_SIZE);
            assert_eq!(footer.role, LineRole::Footer);
            // bottom of text (baseline + descent) sits 20 pt above the page edge
            assert!((g.height - (footer.baseline + 2.0) - FOOTER_OFFSET_PT).abs() < 0.001);
            let width = m.text_width(&footer.text, FOOTER_FONT_SIZE);
            let centre = footer.runs[0].x + width / 2.0;
            assert!((centre - g.width / 2.0).abs() < 0.001);
        }
    }
}
