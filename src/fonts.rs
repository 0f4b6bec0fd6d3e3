//! Font loading and text measurement using `ttf-parser`.
//!
//! For reproducibility we embed a default font (DejaVu Sans) and measure
//! glyph advances to wrap and align lines before handing them to printpdf.
//! The same bytes are registered with printpdf, which subsets and embeds
//! them, so viewers never fall back to their own fonts.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use printpdf::ParsedFont;

use crate::error::{Error, Result};

/// Family name of the bundled face.
pub const BUNDLED_FONT_NAME: &str = "DejaVu Sans";

/// DejaVu Sans, compiled into the binary.
pub static BUNDLED_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

/// Parsed faces kept per thread; older entries are evicted first.
const PARSED_CACHE_CAPACITY: usize = 4;

static NEXT_FONT_ID: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static PARSED_FONTS: RefCell<Vec<(u64, Rc<ParsedFont>)>> = const { RefCell::new(Vec::new()) };
}

/// Vertical metrics in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub units_per_em: f32,
    pub ascender: f32,
    /// Negative: distance below the baseline.
    pub descender: f32,
}

impl FontMetrics {
    /// Ascender height in points at `font_size`.
    pub fn ascender_pt(&self, font_size: f32) -> f32 {
        self.ascender * font_size / self.units_per_em
    }

    /// Descender depth in points at `font_size`, as a positive number.
    pub fn descender_pt(&self, font_size: f32) -> f32 {
        self.descender.abs() * font_size / self.units_per_em
    }
}

/// A validated font face ready for measurement and PDF embedding.
///
/// Loaded once and shared read-only; nothing in here changes per request.
/// printpdf's `ParsedFont` holds `Rc`s and cannot cross threads, so the
/// handle keeps plain bytes and [`EmbeddedFont::parsed`] caches the printpdf
/// view per thread: each blocking worker parses the face once.
#[derive(Debug, Clone)]
pub struct EmbeddedFont {
    /// Shared by clones, distinct for every load.
    id: u64,
    name: String,
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API).
    bytes: Vec<u8>,
    metrics: FontMetrics,
}

impl EmbeddedFont {
    /// The font shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_bytes(BUNDLED_FONT_NAME, BUNDLED_FONT.to_vec())
    }

    /// Load a TTF/OTF font from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| {
            Error::FontLoad(format!("cannot read '{}': {e}", path.display()))
        })?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("custom font")
            .to_string();
        Self::from_bytes(&name, bytes)
    }

    /// Load a TTF/OTF font from bytes.
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<Self> {
        let metrics = {
            let face = ttf_parser::Face::parse(&bytes, 0)
                .map_err(|e| Error::FontLoad(format!("failed to parse {name}: {e}")))?;
            FontMetrics {
                units_per_em: face.units_per_em() as f32,
                ascender: face.ascender() as f32,
                descender: face.descender() as f32,
            }
        };

        let font = Self {
            id: NEXT_FONT_ID.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            bytes,
            metrics,
        };
        // Fail at load time rather than on the first render.
        font.parsed()?;

        log::info!("Loaded font '{name}' ({} bytes)", font.bytes.len());
        Ok(font)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// The printpdf view of the face, for `PdfDocument::add_font`.
    ///
    /// Parsed on first use in each thread and reused afterwards.
    pub fn parsed(&self) -> Result<Rc<ParsedFont>> {
        let cached = PARSED_FONTS.with(|cache| {
            cache
                .borrow()
                .iter()
                .find(|(id, _)| *id == self.id)
                .map(|(_, font)| Rc::clone(font))
        });
        if let Some(font) = cached {
            return Ok(font);
        }

        let font = Rc::new(self.parse()?);
        PARSED_FONTS.with(|cache| {
            let mut cache = cache.borrow_mut();
            if cache.len() >= PARSED_CACHE_CAPACITY {
                cache.remove(0);
            }
            cache.push((self.id, Rc::clone(&font)));
        });
        Ok(font)
    }

    fn parse(&self) -> Result<ParsedFont> {
        let mut warnings = Vec::new();
        let parsed = ParsedFont::from_bytes(&self.bytes, 0, &mut warnings)
            .ok_or_else(|| Error::FontLoad(format!("printpdf could not read {}", self.name)))?;
        if !warnings.is_empty() {
            log::debug!(
                "{} warning(s) while parsing {}: {warnings:?}",
                warnings.len(),
                self.name
            );
        }
        Ok(parsed)
    }

    /// Borrow a measurer over this face.
    pub fn measurer(&self) -> TextMeasurer<'_> {
        TextMeasurer {
            face: ttf_parser::Face::parse(&self.bytes, 0).ok(),
            units_per_em: self.metrics.units_per_em,
        }
    }
}

/// Sums horizontal glyph advances.
///
/// Without a face (never the case for a successfully loaded font) it falls
/// back to an average character width of half an em.
pub struct TextMeasurer<'a> {
    face: Option<ttf_parser::Face<'a>>,
    units_per_em: f32,
}

impl TextMeasurer<'_> {
    /// A measurer with no face, using the half-em heuristic throughout.
    pub fn heuristic() -> Self {
        TextMeasurer {
            face: None,
            units_per_em: 1000.0,
        }
    }

    pub fn char_width(&self, ch: char, font_size: f32) -> f32 {
        let Some(face) = &self.face else {
            return font_size * 0.5;
        };
        match face.glyph_index(ch) {
            Some(gid) => {
                let advance = face.glyph_hor_advance(gid).unwrap_or(0);
                advance as f32 * font_size / self.units_per_em
            }
            // Fallback for missing glyph
            None => font_size * 0.5,
        }
    }

    /// Width of `text` in points at `font_size`.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}

/// One wrapped line.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    /// Line text with its spacing as written; no whitespace at soft wraps.
    pub text: String,
    pub width: f32,
    /// Last line of a hard paragraph (never stretched when justifying).
    pub ends_paragraph: bool,
}

/// Columns a tab advances by.
const TAB_WIDTH: usize = 4;

/// A paragraph split into words and the blank space between them.
#[derive(Debug, PartialEq)]
enum Segment<'a> {
    /// Whitespace, counted in spaces (tabs expand to [`TAB_WIDTH`]).
    Gap(usize),
    Word(&'a str),
}

fn segments(paragraph: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = paragraph;
    while !rest.is_empty() {
        let blank = rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len());
        if blank > 0 {
            let spaces = rest[..blank]
                .chars()
                .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
                .sum();
            out.push(Segment::Gap(spaces));
            rest = &rest[blank..];
            continue;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        out.push(Segment::Word(&rest[..end]));
        rest = &rest[end..];
    }
    out
}

/// Word-wrap text to fit within `max_width` points.
///
/// Every `\n` (or `\r\n`) starts a new paragraph; blank paragraphs become
/// empty lines. Leading indentation and runs of spaces are kept as written
/// (tabs become four spaces); whitespace is dropped only where a line wraps
/// and at the end of a paragraph. A word wider than `max_width` is broken
/// between characters.
pub fn wrap_text(
    text: &str,
    font_size: f32,
    max_width: f32,
    measurer: &TextMeasurer<'_>,
) -> Vec<WrappedLine> {
    if max_width <= 0.0 || text.is_empty() {
        return vec![WrappedLine {
            width: measurer.text_width(text, font_size),
            text: text.to_string(),
            ends_paragraph: true,
        }];
    }

    let space = measurer.char_width(' ', font_size);
    let mut lines: Vec<WrappedLine> = Vec::new();

    for raw in text.split('\n') {
        let paragraph = raw.strip_suffix('\r').unwrap_or(raw);
        let mut current = String::new();
        let mut current_width = 0.0f32;
        let mut pending = 0usize;

        for segment in segments(paragraph) {
            let word = match segment {
                Segment::Gap(n) => {
                    pending += n;
                    continue;
                }
                Segment::Word(word) => word,
            };
            let spaces = std::mem::take(&mut pending);
            let gap_width = spaces as f32 * space;
            let word_width = measurer.text_width(word, font_size);

            if word_width > max_width {
                if !current.is_empty() {
                    lines.push(WrappedLine {
                        text: std::mem::take(&mut current),
                        width: current_width,
                        ends_paragraph: false,
                    });
                }
                let mut pieces = break_word(word, font_size, max_width, measurer);
                // The tail of a broken word can share its line with what follows.
                let (tail, tail_width) = pieces.pop().unwrap_or_default();
                lines.extend(pieces.into_iter().map(|(text, width)| WrappedLine {
                    text,
                    width,
                    ends_paragraph: false,
                }));
                current = tail;
                current_width = tail_width;
                continue;
            }

            if current.is_empty() {
                // Indentation is kept only while it fits beside the first word.
                let indent = if gap_width + word_width <= max_width {
                    spaces
                } else {
                    0
                };
                current.push_str(&" ".repeat(indent));
                current.push_str(word);
                current_width = indent as f32 * space + word_width;
            } else if current_width + gap_width + word_width <= max_width {
                current.push_str(&" ".repeat(spaces));
                current.push_str(word);
                current_width += gap_width + word_width;
            } else {
                lines.push(WrappedLine {
                    text: std::mem::replace(&mut current, word.to_string()),
                    width: current_width,
                    ends_paragraph: false,
                });
                current_width = word_width;
            }
        }

        lines.push(WrappedLine {
            text: current,
            width: current_width,
            ends_paragraph: true,
        });
    }

    lines
}

/// Split an over-long word into pieces no wider than `max_width`.
/// Each piece holds at least one character.
fn break_word(
    word: &str,
    font_size: f32,
    max_width: f32,
    measurer: &TextMeasurer<'_>,
) -> Vec<(String, f32)> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_width = 0.0f32;

    for ch in word.chars() {
        let w = measurer.char_width(ch, font_size);
        if piece_width + w > max_width && !piece.is_empty() {
            pieces.push((std::mem::take(&mut piece), piece_width));
            piece_width = 0.0;
        }
        piece.push(ch);
        piece_width += w;
    }
    if !piece.is_empty() {
        pieces.push((piece, piece_width));
    }
    pieces
}
