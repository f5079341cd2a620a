use std::fmt;
use std::str::FromStr;

use egui::{Color32, Pos2};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ColorParseError;

/// Opacity every highlighter stroke is painted with.
pub const HIGHLIGHTER_OPACITY: f32 = 0.4;

/// The tool a stroke was drawn with. The eraser never produces a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrokeTool {
    #[serde(rename = "pen", alias = "ink")]
    Ink,
    #[serde(rename = "highlighter")]
    Highlighter,
}

impl StrokeTool {
    /// Opacity is a property of the tool, not a user setting.
    pub fn opacity(self) -> f32 {
        match self {
            Self::Ink => 1.0,
            Self::Highlighter => HIGHLIGHTER_OPACITY,
        }
    }
}

/// A stroke color, persisted as a `#rrggbb` hex string.
///
/// Channels are kept unmultiplied so the hex form survives a load/save cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InkColor(pub [u8; 4]);

impl InkColor {
    pub const WHITE: Self = Self([0xff, 0xff, 0xff, 0xff]);
    pub const HIGHLIGHTER_YELLOW: Self = Self([0xff, 0xe6, 0x6d, 0xff]);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, u8::MAX])
    }

    pub fn rgba(self) -> [u8; 4] {
        self.0
    }

    pub fn color32(self) -> Color32 {
        let [r, g, b, a] = self.0;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.0;
        if a == u8::MAX {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl From<Color32> for InkColor {
    fn from(color: Color32) -> Self {
        Self(color.to_srgba_unmultiplied())
    }
}

impl FromStr for InkColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_owned()))?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigits(s.to_owned()));
        }

        // Every char is an ASCII hex digit here, so byte slicing is char aligned.
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map(|v| v * 0x11);

        let rgba = match hex.len() {
            3 => [nibble(0), nibble(1), nibble(2), Ok(u8::MAX)],
            6 => [byte(0), byte(2), byte(4), Ok(u8::MAX)],
            8 => [byte(0), byte(2), byte(4), byte(6)],
            len => return Err(ColorParseError::InvalidLength(len)),
        };
        let [r, g, b, a] = rgba.map(|c| c.map_err(|_| ColorParseError::InvalidDigits(s.to_owned())));
        Ok(Self([r?, g?, b?, a?]))
    }
}

impl fmt::Display for InkColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for InkColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for InkColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Everything needed to paint a segment of a stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: InkColor,
    pub size: f32,
    pub opacity: f32,
}

/// A committed stroke. Immutable once it has been added to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StrokeRecord")]
pub struct Stroke {
    tool: StrokeTool,
    color: InkColor,
    size: f32,
    opacity: f32,
    points: Vec<Pos2>,
}

impl Stroke {
    pub fn new(tool: StrokeTool, color: InkColor, size: f32, points: Vec<Pos2>) -> Self {
        Self {
            tool,
            color,
            size,
            opacity: tool.opacity(),
            points,
        }
    }

    pub fn tool(&self) -> StrokeTool {
        self.tool
    }

    pub fn color(&self) -> InkColor {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color,
            size: self.size,
            opacity: self.opacity,
        }
    }

    /// Consecutive point pairs, in drawing order.
    pub fn segments(&self) -> impl Iterator<Item = (Pos2, Pos2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// A copy with points and width multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Stroke {
        Stroke {
            size: self.size * factor,
            points: self.points.iter().map(|p| (p.to_vec2() * factor).to_pos2()).collect(),
            ..self.clone()
        }
    }
}

// Stored strokes from older saves may lack `opacity`; it then follows the tool.
#[derive(Deserialize)]
struct StrokeRecord {
    tool: StrokeTool,
    color: InkColor,
    size: f32,
    #[serde(default)]
    opacity: Option<f32>,
    #[serde(default)]
    points: Vec<Pos2>,
}

impl From<StrokeRecord> for Stroke {
    fn from(record: StrokeRecord) -> Self {
        Self {
            opacity: record
                .opacity
                .filter(|o| *o > 0.0)
                .unwrap_or_else(|| record.tool.opacity()),
            tool: record.tool,
            color: record.color,
            size: record.size,
            points: record.points,
        }
    }
}

/// The stroke being drawn. Only becomes a [`Stroke`] on commit.
#[derive(Debug, Clone)]
pub struct MutableStroke {
    tool: StrokeTool,
    color: InkColor,
    size: f32,
    points: Vec<Pos2>,
}

impl MutableStroke {
    /// Starts a stroke at `origin`; an in-progress stroke always has a point.
    pub fn new(tool: StrokeTool, color: InkColor, size: f32, origin: Pos2) -> Self {
        Self {
            tool,
            color,
            size,
            points: vec![origin],
        }
    }

    pub fn add_point(&mut self, point: Pos2) {
        self.points.push(point);
    }

    /// Multiplies points and width by `factor`.
    pub fn scale(&mut self, factor: f32) {
        self.size *= factor;
        for p in &mut self.points {
            *p = (p.to_vec2() * factor).to_pos2();
        }
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn last_point(&self) -> Option<Pos2> {
        self.points.last().copied()
    }

    pub fn tool(&self) -> StrokeTool {
        self.tool
    }

    pub fn style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color,
            size: self.size,
            opacity: self.tool.opacity(),
        }
    }

    pub fn into_stroke(self) -> Stroke {
        Stroke::new(self.tool, self.color, self.size, self.points)
    }
}
