//! Pipeline – ties together validation, wrapping, pagination, footers and
//! rendering into a single function call.

use crate::error::Result;
use crate::fonts::EmbeddedFont;
use crate::layout::build_blocks;
use crate::layout_config::{DocumentLayout, PageGeometry, DEFAULT_DOCUMENT_TITLE};
use crate::pagination::{paginate, stamp_footers};
use crate::render::render_pdf;
use crate::request::GenerationRequest;

/// Full pipeline: request → PDF bytes.
///
/// Returns `(pdf_bytes, layout)`.
pub fn generate_pdf(
    request: &GenerationRequest,
    font: &EmbeddedFont,
) -> Result<(Vec<u8>, DocumentLayout)> {
    let layout = compute_layout(request, font)?;
    let bytes = render_pdf(&layout, font)?;
    log::debug!(
        "Rendered {} page(s) into {} bytes",
        layout.page_count(),
        bytes.len()
    );
    Ok((bytes, layout))
}

/// Generate only the layout (no PDF rendering) – useful for testing.
pub fn compute_layout(request: &GenerationRequest, font: &EmbeddedFont) -> Result<DocumentLayout> {
    // 1. Validate
    request.validate()?;

    // 2. Wrap title and body
    let geometry = PageGeometry::a4(request.margins());
    let measurer = font.measurer();
    let metrics = font.metrics();
    let blocks = build_blocks(request, &geometry, &measurer);

    // 3. Paginate, then number pages now that the total is known
    let mut pages = paginate(&blocks, &geometry, &metrics, &measurer);
    stamp_footers(&mut pages, &geometry, &metrics, &measurer);

    let title = if request.has_title() {
        request.title.trim().to_string()
    } else {
        DEFAULT_DOCUMENT_TITLE.to_string()
    };

    Ok(DocumentLayout {
        title,
        page_width_pt: geometry.width,
        page_height_pt: geometry.height,
        pages,
    })
}
