//! Label palettes and color parsing
//!
//! A [`Palette`] maps non-zero voxel labels to an [`Appearance`] (color plus
//! opacity). Labels without an entry resolve to the palette's default
//! appearance, so an incomplete palette never blocks meshing.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::core::Error;
use crate::core::types::Result;

/// 8-bit RGBA color
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    /// Neutral gray used for unmapped labels and uncolored parts
    pub const NEUTRAL: Rgba = Rgba::rgb(128, 128, 128);

    /// Opaque color from RGB
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_array(c: [u8; 4]) -> Self {
        Self { r: c[0], g: c[1], b: c[2], a: c[3] }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Components scaled to 0.0-1.0
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Parse a CSS color name or a `#rgb`, `#rrggbb`, `#rrggbbaa` hex string
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| Error::InvalidColor(s.to_string()));
        }

        let name = trimmed.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, [r, g, b])| Rgba::rgb(*r, *g, *b))
            .ok_or_else(|| Error::InvalidColor(s.to_string()))
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
        }
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rgba::parse(s)
    }
}

impl TryFrom<String> for Rgba {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Rgba::parse(&s)
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> String {
        c.to_hex()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Visual appearance of a labeled region
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "AppearanceFile")]
pub struct Appearance {
    /// Base color (alpha channel ignored; see `opacity`)
    pub color: Rgba,
    /// Opacity in [0, 1]
    pub opacity: f32,
}

/// On-disk form; normalized through `Appearance::new`
#[derive(Deserialize)]
struct AppearanceFile {
    color: Rgba,
    #[serde(default = "default_opacity")]
    opacity: f32,
}

fn default_opacity() -> f32 {
    1.0
}

impl From<AppearanceFile> for Appearance {
    fn from(file: AppearanceFile) -> Self {
        Self::new(file.color, file.opacity)
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: Rgba::NEUTRAL,
            opacity: 1.0,
        }
    }
}

impl Appearance {
    /// Create from a color and opacity, clamping opacity to [0, 1]
    pub fn new(color: Rgba, opacity: f32) -> Self {
        Self {
            color: color.with_alpha(255),
            opacity: if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) },
        }
    }

    /// Parse the color string and build an appearance
    pub fn parse(color: &str, opacity: f32) -> Result<Self> {
        Ok(Self::new(Rgba::parse(color)?, opacity))
    }

    /// Opaque appearance of the given color
    pub fn solid(color: Rgba) -> Self {
        Self::new(color, 1.0)
    }

    /// Color with the opacity folded into alpha
    pub fn rgba(&self) -> Rgba {
        self.color.with_alpha((self.opacity * 255.0).round() as u8)
    }

    pub fn is_opaque(&self) -> bool {
        self.opacity >= 1.0
    }
}

/// Mapping from voxel label to appearance with a default fallback
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Appearance used for labels without an entry
    #[serde(default)]
    pub default: Appearance,
    /// Per-label appearances
    #[serde(default)]
    pub entries: BTreeMap<u32, Appearance>,
}

impl Palette {
    /// Create an empty palette with the neutral default appearance
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(label, color, opacity)` triples
    pub fn from_colors<'a>(colors: impl IntoIterator<Item = (u32, &'a str, f32)>) -> Result<Self> {
        let mut palette = Self::new();
        for (label, color, opacity) in colors {
            palette.set_color(label, color, opacity)?;
        }
        Ok(palette)
    }

    /// Replace the fallback appearance
    pub fn with_default(mut self, default: Appearance) -> Self {
        self.default = default;
        self
    }

    /// Assign a parsed color to a label
    pub fn set_color(&mut self, label: u32, color: &str, opacity: f32) -> Result<&mut Self> {
        let appearance = Appearance::parse(color, opacity)?;
        Ok(self.insert(label, appearance))
    }

    /// Assign an appearance to a label
    pub fn insert(&mut self, label: u32, appearance: Appearance) -> &mut Self {
        if label == 0 {
            log::debug!("Ignoring palette entry for empty label 0");
        } else {
            self.entries.insert(label, appearance);
        }
        self
    }

    /// Explicit entry for a label, if any
    pub fn get(&self, label: u32) -> Option<&Appearance> {
        self.entries.get(&label)
    }

    /// Entry for a label, falling back to the default appearance
    pub fn resolve(&self, label: u32) -> &Appearance {
        self.entries.get(&label).unwrap_or(&self.default)
    }

    pub fn contains(&self, label: u32) -> bool {
        self.entries.contains_key(&label)
    }

    /// Mapped labels in ascending order
    pub fn labels(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    /// Overlay another palette's entries on top of this one
    pub fn merge(&mut self, other: &Palette) {
        for (label, appearance) in &other.entries {
            self.entries.insert(*label, *appearance);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a palette from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// CSS named colors
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("grey", [128, 128, 128]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("rebeccapurple", [102, 51, 153]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named() {
        assert_eq!(Rgba::parse("chocolate").unwrap(), Rgba::rgb(210, 105, 30));
        assert_eq!(Rgba::parse(" LemonChiffon ").unwrap(), Rgba::rgb(255, 250, 205));
        assert!(matches!(Rgba::parse("notacolor"), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgba::parse("#555555").unwrap(), Rgba::rgb(0x55, 0x55, 0x55));
        assert_eq!(Rgba::parse("#8888ff").unwrap(), Rgba::rgb(0x88, 0x88, 0xff));
        assert_eq!(Rgba::parse("#f00").unwrap(), Rgba::rgb(255, 0, 0));
        assert_eq!(Rgba::parse("#00ff0080").unwrap(), Rgba::rgba(0, 255, 0, 0x80));
        assert!(Rgba::parse("#12345").is_err());
        assert!(Rgba::parse("#gg0000").is_err());
    }

    #[test]
    fn test_hex_output() {
        assert_eq!(Rgba::rgb(255, 165, 0).to_hex(), "#ffa500");
        assert_eq!(Rgba::rgba(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn test_appearance_clamps_opacity() {
        let a = Appearance::parse("white", 1.7).unwrap();
        assert_eq!(a.opacity, 1.0);
        let b = Appearance::parse("white", -0.5).unwrap();
        assert_eq!(b.opacity, 0.0);
        assert_eq!(Appearance::parse("white", 0.5).unwrap().rgba().a, 128);
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let palette = Palette::from_colors([(1, "red", 1.0), (7, "#333333", 0.5)]).unwrap();
        assert_eq!(palette.resolve(1).color, Rgba::rgb(255, 0, 0));
        assert_eq!(palette.resolve(7).opacity, 0.5);
        assert!(palette.get(3).is_none());
        assert_eq!(*palette.resolve(3), Appearance::default());
        assert_eq!(palette.labels().collect::<Vec<_>>(), vec![1, 7]);
    }

    #[test]
    fn test_label_zero_ignored() {
        let mut palette = Palette::new();
        palette.set_color(0, "red", 1.0).unwrap();
        assert!(palette.is_empty());
    }

    #[test]
    fn test_palette_json() {
        let json = r##"{
            "default": { "color": "white" },
            "entries": {
                "2": { "color": "lime", "opacity": 0.9 },
                "11": { "color": "#ff0000" }
            }
        }"##;
        let palette = Palette::from_json(json).unwrap();
        assert_eq!(palette.default.color, Rgba::WHITE);
        assert_eq!(palette.resolve(2).color, Rgba::rgb(0, 255, 0));
        assert_eq!(palette.resolve(11).opacity, 1.0);

        let back = serde_json::to_string(&palette).unwrap();
        assert_eq!(Palette::from_json(&back).unwrap(), palette);
    }

    #[test]
    fn test_palette_json_opacity_range() {
        let json = r##"{
            "default": { "color": "#80808040", "opacity": -0.5 },
            "entries": {
                "1": { "color": "red", "opacity": 5.0 },
                "2": { "color": "blue", "opacity": -2.0 }
            }
        }"##;
        let palette = Palette::from_json(json).unwrap();
        assert_eq!(palette.resolve(1).opacity, 1.0);
        assert_eq!(palette.resolve(2).opacity, 0.0);
        assert_eq!(palette.default.opacity, 0.0);
        assert_eq!(palette.default.color.a, 255);
    }

    #[test]
    fn test_palette_json_bad_color() {
        let json = r#"{ "entries": { "1": { "color": "mauvish" } } }"#;
        assert!(matches!(Palette::from_json(json), Err(Error::Config(_))));
    }
}
