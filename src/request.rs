//! Generation request – the parameters a caller supplies for one document.
//!
//! Parameter names follow the public HTTP contract (`fontSize`,
//! `marginTop`, ...) so the same struct deserializes straight from a query
//! string or a url-encoded form body.

use std::fmt;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::layout_config::{Margins, A4_HEIGHT_PT, A4_WIDTH_PT};

/// Default margin on every side, in points.
pub const DEFAULT_MARGIN_PT: f32 = 36.0;

/// Default leading multiplier for body text.
pub const DEFAULT_LINE_SPACING: f32 = 1.2;

/// The title is set this many points larger than the body.
pub const TITLE_SIZE_INCREMENT: f32 = 6.0;

/// Horizontal alignment of body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

impl Alignment {
    /// Resolve a caller-supplied alignment name.
    ///
    /// Matching is case-insensitive; anything unrecognized is `Left`.
    pub fn from_param(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "CENTER" => Alignment::Center,
            "RIGHT" => Alignment::Right,
            "JUSTIFIED" => Alignment::Justified,
            _ => Alignment::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "LEFT",
            Alignment::Center => "CENTER",
            Alignment::Right => "RIGHT",
            Alignment::Justified => "JUSTIFIED",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Alignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Alignment::from_param(&raw))
    }
}

impl Serialize for Alignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

fn default_margin() -> f32 {
    DEFAULT_MARGIN_PT
}

fn default_line_spacing() -> f32 {
    DEFAULT_LINE_SPACING
}

fn margin_or_default<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<f32, D::Error> {
    deserializer.deserialize_any(NumberOrBlank(DEFAULT_MARGIN_PT))
}

fn line_spacing_or_default<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<f32, D::Error> {
    deserializer.deserialize_any(NumberOrBlank(DEFAULT_LINE_SPACING))
}

/// Reads a number, treating a blank value (`marginTop=` from an empty form
/// field) as the wrapped default.
struct NumberOrBlank(f32);

impl Visitor<'_> for NumberOrBlank {
    type Value = f32;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or an empty value")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<f32, E> {
        let v = v.trim();
        if v.is_empty() {
            return Ok(self.0);
        }
        v.parse().map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<f32, E> {
        Ok(v as f32)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<f32, E> {
        Ok(v as f32)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<f32, E> {
        Ok(v as f32)
    }
}

/// Text plus formatting parameters for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Optional heading; ignored when blank.
    #[serde(default)]
    pub title: String,
    /// Body text. Hard line breaks start new paragraphs.
    pub content: String,
    /// Body font size in points.
    pub font_size: u32,
    #[serde(default = "default_margin", deserialize_with = "margin_or_default")]
    pub margin_top: f32,
    #[serde(default = "default_margin", deserialize_with = "margin_or_default")]
    pub margin_bottom: f32,
    #[serde(default = "default_margin", deserialize_with = "margin_or_default")]
    pub margin_left: f32,
    #[serde(default = "default_margin", deserialize_with = "margin_or_default")]
    pub margin_right: f32,
    /// Leading as a multiple of `font_size`.
    #[serde(
        default = "default_line_spacing",
        deserialize_with = "line_spacing_or_default"
    )]
    pub line_spacing: f32,
    #[serde(default)]
    pub alignment: Alignment,
}

impl GenerationRequest {
    /// A request with no title and every optional parameter at its default.
    pub fn new(content: impl Into<String>, font_size: u32) -> Self {
        Self {
            title: String::new(),
            content: content.into(),
            font_size,
            margin_top: DEFAULT_MARGIN_PT,
            margin_bottom: DEFAULT_MARGIN_PT,
            margin_left: DEFAULT_MARGIN_PT,
            margin_right: DEFAULT_MARGIN_PT,
            line_spacing: DEFAULT_LINE_SPACING,
            alignment: Alignment::Left,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Parse `application/x-www-form-urlencoded` parameters.
    pub fn from_urlencoded(input: &str) -> Result<Self> {
        serde_urlencoded::from_str(input).map_err(|e| Error::InvalidRequest(e.to_string()))
    }

    /// Whether a title block will be rendered.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn body_font_size(&self) -> f32 {
        self.font_size as f32
    }

    pub fn title_font_size(&self) -> f32 {
        self.body_font_size() + TITLE_SIZE_INCREMENT
    }

    pub fn margins(&self) -> Margins {
        Margins {
            top: self.margin_top,
            right: self.margin_right,
            bottom: self.margin_bottom,
            left: self.margin_left,
        }
    }

    /// Reject values that parse but cannot produce a sensible A4 page.
    pub fn validate(&self) -> Result<()> {
        if self.font_size == 0 {
            return Err(Error::invalid("fontSize", "must be a positive integer"));
        }

        let margins = [
            ("marginTop", self.margin_top),
            ("marginBottom", self.margin_bottom),
            ("marginLeft", self.margin_left),
            ("marginRight", self.margin_right),
        ];
        for (name, value) in margins {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(
                    name,
                    format!("must be a non-negative number of points, got {value}"),
                ));
            }
        }

        if !self.line_spacing.is_finite() || self.line_spacing <= 0.0 {
            return Err(Error::invalid(
                "lineSpacing",
                format!("must be greater than zero, got {}", self.line_spacing),
            ));
        }

        if self.margin_left + self.margin_right >= A4_WIDTH_PT {
            return Err(Error::invalid(
                "marginLeft",
                format!(
                    "left and right margins ({} + {}) leave no room on a {A4_WIDTH_PT} pt wide page",
                    self.margin_left, self.margin_right
                ),
            ));
        }
        if self.margin_top + self.margin_bottom >= A4_HEIGHT_PT {
            return Err(Error::invalid(
                "marginTop",
                format!(
                    "top and bottom margins ({} + {}) leave no room on a {A4_HEIGHT_PT} pt tall page",
                    self.margin_top, self.margin_bottom
                ),
            ));
        }

        Ok(())
    }
}
