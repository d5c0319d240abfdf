use serde::{Deserialize, Serialize};

use crate::models::variant::Variant;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GRAY: Rgb = Rgb(0x80, 0x80, 0x80);

    pub const fn from_hex(hex: u32) -> Self {
        Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// How one line is drawn.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct SeriesStyle {
    pub color: Rgb,
    pub marker: Marker,
    pub line: LineStyle,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            color: Rgb::GRAY,
            marker: Marker::Circle,
            line: LineStyle::Solid,
        }
    }
}

/// Fixed look of every variant in a run.
///
/// Colors follow the variant name, so the same worker kind keeps its color
/// across families. Markers follow the variant name and fall back to the
/// family. Line styles follow the family.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct StyleRegistry {
    colors: Vec<(String, Rgb)>,
    markers: Vec<(String, Marker)>,
    lines: Vec<(String, LineStyle)>,
    labels: Vec<(String, String)>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, key: impl Into<String>, color: Rgb) -> Self {
        self.colors.push((key.into(), color));
        self
    }

    pub fn marker(mut self, key: impl Into<String>, marker: Marker) -> Self {
        self.markers.push((key.into(), marker));
        self
    }

    pub fn line(mut self, family: impl Into<String>, line: LineStyle) -> Self {
        self.lines.push((family.into(), line));
        self
    }

    /// Display label for a variant name or a family.
    pub fn label(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.push((key.into(), label.into()));
        self
    }

    pub fn style(&self, variant: &Variant) -> SeriesStyle {
        let fallback = SeriesStyle::default();
        let family = variant.family.as_deref();

        SeriesStyle {
            color: lookup(&self.colors, &variant.name).unwrap_or(fallback.color),
            marker: lookup(&self.markers, &variant.name)
                .or_else(|| family.and_then(|f| lookup(&self.markers, f)))
                .unwrap_or(fallback.marker),
            line: family
                .and_then(|f| lookup(&self.lines, f))
                .unwrap_or(fallback.line),
        }
    }

    /// Label for the variant name, or the name itself.
    pub fn variant_label(&self, variant: &Variant) -> String {
        self.display(&variant.name)
    }

    /// Label for the variant's family, or the family key itself.
    pub fn family_label(&self, variant: &Variant) -> Option<String> {
        variant.family.as_deref().map(|family| self.display(family))
    }

    fn display(&self, key: &str) -> String {
        self.labels
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| key.to_string())
    }
}

fn lookup<T: Copy>(entries: &[(String, T)], key: &str) -> Option<T> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
}
