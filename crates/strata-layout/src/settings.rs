//! Layout configuration.
//!
//! Settings are plain serde structs with camelCase keys. Every field has a default, so a
//! settings file only needs to name what it changes. Files are read as JSON5, which also
//! accepts strict JSON.

use crate::edge_layout::EdgeLayoutKind;
use crate::element::ElementKind;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutSettings {
    pub edge_layout: EdgeLayoutSettings,
    pub elements: ElementSettingsTable,
    /// Ceiling for the footprint of the drawing canvas (the synthetic root).
    pub max_root_footprint: Footprint,
    /// Also resize a single pre-existing root to `max_root_footprint`. A synthetic root is
    /// always resized.
    pub resize_single_root: bool,
    /// Vertical gap between the drawing plane and stacked node levels.
    pub level_distance: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            edge_layout: EdgeLayoutSettings::default(),
            elements: ElementSettingsTable::default(),
            max_root_footprint: Footprint {
                width: 2.0,
                depth: 2.0,
            },
            resize_single_root: false,
            level_distance: 0.001,
        }
    }
}

impl LayoutSettings {
    pub fn from_json5_str(text: &str) -> Result<Self> {
        json5::from_str(text).map_err(|err| Error::InvalidSettings {
            message: err.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ResourceNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json5_str(&text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeLayoutSettings {
    pub kind: EdgeLayoutKind,
    pub edge_width: f64,
    /// Bundling strength for [`EdgeLayoutKind::Bundled`], in `[0, 1]`.
    pub tension: f64,
    /// Ramer-Douglas-Peucker epsilon used to thin out sampled curves; 0 disables it.
    pub rdp: f64,
    pub radius: f64,
    pub radial_segments: u32,
    pub tubular_segments: u32,
    pub edges_above_blocks: bool,
    pub is_edge_selectable: bool,
}

impl Default for EdgeLayoutSettings {
    fn default() -> Self {
        Self {
            kind: EdgeLayoutKind::Bundled,
            edge_width: 0.01,
            tension: 0.85,
            rdp: 0.0001,
            radius: 0.005,
            radial_segments: 8,
            tubular_segments: 50,
            edges_above_blocks: true,
            is_edge_selectable: true,
        }
    }
}

impl EdgeLayoutSettings {
    /// Edges keep at least this vertical distance to the blocks they connect.
    pub fn minimal_edge_level_distance(&self) -> f64 {
        2.5 * self.edge_width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementSettings {
    pub element_height: f64,
    pub color_range: ColorRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementSettingsTable {
    pub cluster: ElementSettings,
    pub component: ElementSettings,
    pub root: ElementSettings,
}

impl Default for ElementSettingsTable {
    fn default() -> Self {
        Self {
            cluster: ElementSettings {
                element_height: 0.01,
                color_range: ColorRange::new(
                    Color::rgb(0xd3, 0xd3, 0xd3),
                    Color::rgb(0x40, 0x40, 0x40),
                    5,
                ),
            },
            component: ElementSettings {
                element_height: 0.02,
                color_range: ColorRange::new(
                    Color::rgb(0x87, 0xce, 0xfa),
                    Color::rgb(0x00, 0x00, 0x8b),
                    5,
                ),
            },
            root: ElementSettings {
                element_height: 0.001,
                color_range: ColorRange::new(Color::WHITE, Color::WHITE, 1),
            },
        }
    }
}

impl ElementSettingsTable {
    pub fn for_kind(&self, kind: ElementKind) -> &ElementSettings {
        match kind {
            ElementKind::Cluster => &self.cluster,
            ElementKind::Component => &self.component,
            ElementKind::Root => &self.root,
        }
    }
}

impl Default for ElementSettings {
    fn default() -> Self {
        Self {
            element_height: 0.01,
            color_range: ColorRange::new(Color::WHITE, Color::BLACK, 5),
        }
    }
}

/// An sRGB color, written as `#rrggbb` in settings files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("expected a color of the form #rrggbb, got `{value}`"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("expected a color of the form #rrggbb, got `{value}`"))
        };
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

/// A linear range of colors split into `number_of_colors` style buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorRange {
    pub lower: Color,
    pub upper: Color,
    pub number_of_colors: u32,
}

impl ColorRange {
    pub fn new(lower: Color, upper: Color, number_of_colors: u32) -> Self {
        Self {
            lower,
            upper,
            number_of_colors,
        }
    }

    /// Color of style bucket `index`; indices past the last bucket get the upper color.
    pub fn color_at(&self, index: u32) -> Color {
        if self.number_of_colors <= 1 {
            return self.lower;
        }
        let t = index as f64 / (self.number_of_colors - 1) as f64;
        self.lower.lerp(self.upper, t)
    }
}
