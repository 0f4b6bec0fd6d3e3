//! Layout config – the intermediate representation between layout computation
//! and PDF rendering. This is the "frozen" structure that encodes exactly what
//! goes on each page.

use serde::{Deserialize, Serialize};

/// A4 width in PDF points (210 mm).
pub const A4_WIDTH_PT: f32 = 595.28;
/// A4 height in PDF points (297 mm).
pub const A4_HEIGHT_PT: f32 = 841.89;

/// Metadata title used when the request carries no title.
pub const DEFAULT_DOCUMENT_TITLE: &str = "TextDocument";

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn uniform(pt: f32) -> Self {
        Self {
            top: pt,
            right: pt,
            bottom: pt,
            left: pt,
        }
    }
}

/// Page size plus margins; every page of a document shares one geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn a4(margins: Margins) -> Self {
        Self {
            width: A4_WIDTH_PT,
            height: A4_HEIGHT_PT,
            margins,
        }
    }

    pub fn content_left(&self) -> f32 {
        self.margins.left
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    /// Distance from the page top to the first line box.
    pub fn content_top(&self) -> f32 {
        self.margins.top
    }

    /// Distance from the page top below which no body line may extend.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margins.bottom
    }

    pub fn content_height(&self) -> f32 {
        self.content_bottom() - self.content_top()
    }
}

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "DocumentLayout::default_title")]
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// One page of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    /// Title and body lines in reading order.
    pub lines: Vec<TextLine>,
    pub footer: Option<TextLine>,
}

/// What a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineRole {
    Title,
    Body,
    Footer,
}

/// A single line of text placed on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    pub role: LineRole,
    /// The full line as a reader sees it.
    pub text: String,
    pub font_size: f32,
    pub bold: bool,
    /// Baseline position measured down from the page top, in points.
    pub baseline: f32,
    /// Positioned pieces of the line; justified lines carry one per word.
    pub runs: Vec<TextRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    /// Left edge of the run measured from the page's left edge.
    pub x: f32,
}

impl DocumentLayout {
    /// Create an empty A4 layout.
    pub fn a4() -> Self {
        Self {
            title: Self::default_title(),
            page_width_pt: A4_WIDTH_PT,
            page_height_pt: A4_HEIGHT_PT,
            pages: Vec::new(),
        }
    }

    fn default_title() -> String {
        DEFAULT_DOCUMENT_TITLE.to_string()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every title and body line across all pages, in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl TextLine {
    /// Left edge of the first run, or `None` for an empty line.
    pub fn left(&self) -> Option<f32> {
        self.runs.first().map(|r| r.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_content_box() {
        let geometry = PageGeometry::a4(Margins {
            top: 10.0,
            right: 20.0,
            bottom: 30.0,
            left: 40.0,
        });
        assert_eq!(geometry.content_left(), 40.0);
        assert!((geometry.content_width() - (A4_WIDTH_PT - 60.0)).abs() < 0.001);
        assert_eq!(geometry.content_top(), 10.0);
        assert!((geometry.content_bottom() - (A4_HEIGHT_PT - 30.0)).abs() < 0.001);
        assert!((geometry.content_height() - (A4_HEIGHT_PT - 40.0)).abs() < 0.001);
    }

    #[test]
    fn json_dump_keeps_lines_and_footers() {
        let line = TextLine {
            role: LineRole::Body,
            text: "  indented".into(),
            font_size: 12.0,
            bold: false,
            baseline: 48.0,
            runs: vec![TextRun {
                text: "  indented".into(),
                x: 36.0,
            }],
        };
        let mut layout = DocumentLayout::a4();
        layout.pages.push(PageLayout {
            page_index: 0,
            lines: vec![line.clone()],
            footer: Some(line),
        });

        let json = layout.to_json().unwrap();
        assert!(json.contains("\"  indented\""), "{json}");
        let parsed = DocumentLayout::from_json(&json).unwrap();
        assert_eq!(parsed.pages[0].lines[0].text, "  indented");
        assert!(parsed.pages[0].footer.is_some());
    }

    #[test]
    fn missing_title_defaults_when_deserialising() {
        let json = r#"{"page_width_pt": 595.28, "page_height_pt": 841.89, "pages": []}"#;
        let layout = DocumentLayout::from_json(json).unwrap();
        assert_eq!(layout.title, DEFAULT_DOCUMENT_TITLE);
        assert_eq!(layout.page_count(), 0);
    }
}
