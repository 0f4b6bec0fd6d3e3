//! PDF renderer – takes a [`DocumentLayout`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).
//!
//! All text is drawn with the one embedded font. printpdf subsets the face
//! and writes it with Identity-H encoding, so any glyph the font covers
//! renders without relying on the viewer.

use printpdf::*;

use crate::error::Result;
use crate::fonts::EmbeddedFont;
use crate::layout_config::{DocumentLayout, TextLine};

/// pt → mm
const MM_PER_PT: f32 = 0.352778;

/// Synthetic bold stroke width as a fraction of the font size.
const BOLD_STROKE_RATIO: f32 = 1.0 / 30.0;

/// Render a DocumentLayout into PDF bytes.
///
/// Fails only if printpdf cannot read the font. The parsed face comes from
/// the font's per-thread cache.
pub fn render_pdf(layout: &DocumentLayout, font: &EmbeddedFont) -> Result<Vec<u8>> {
    let page_w = Mm(layout.page_width_pt * MM_PER_PT);
    let page_h = Mm(layout.page_height_pt * MM_PER_PT);

    let mut doc = PdfDocument::new(&layout.title);
    let font_id = doc.add_font(&*font.parsed()?);

    let mut pages: Vec<PdfPage> = layout
        .pages
        .iter()
        .map(|page_layout| {
            let mut ops = vec![
                Op::SetFillColor { col: black() },
                Op::SetOutlineColor { col: black() },
            ];
            for line in page_layout.lines.iter().chain(page_layout.footer.iter()) {
                render_line(&mut ops, line, &font_id, layout.page_height_pt);
            }
            PdfPage::new(page_w, page_h, ops)
        })
        .collect();

    // Ensure at least one page.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);
    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        log::debug!("printpdf emitted {} warning(s): {warnings:?}", warnings.len());
    }
    Ok(bytes)
}

fn black() -> Color {
    Color::Rgb(Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        icc_profile: None,
    })
}

/// Emit one text section per run.
fn render_line(ops: &mut Vec<Op>, line: &TextLine, font_id: &FontId, page_height: f32) {
    if line.runs.is_empty() {
        return;
    }

    // PDF coordinate system: origin at bottom-left.
    let baseline_y = page_height - line.baseline;

    if line.bold {
        ops.push(Op::SetTextRenderingMode {
            mode: TextRenderingMode::FillStroke,
        });
        ops.push(Op::SetOutlineThickness {
            pt: Pt(line.font_size * BOLD_STROKE_RATIO),
        });
    }

    for run in &line.runs {
        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(run.x),
                y: Pt(baseline_y),
            },
        });
        ops.push(Op::SetFontSize {
            size: Pt(line.font_size),
            font: font_id.clone(),
        });
        ops.push(Op::WriteText {
            items: vec![TextItem::Text(run.text.clone())],
            font: font_id.clone(),
        });
        ops.push(Op::EndTextSection);
    }

    if line.bold {
        ops.push(Op::SetTextRenderingMode {
            mode: TextRenderingMode::Fill,
        });
    }
}
