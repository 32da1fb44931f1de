//! Background colors: sRGB with alpha, hex parsing, and contrast hints.

use core::fmt;
use core::str::FromStr;

#[cfg(not(feature = "std"))]
use alloc::string::String;

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// sRGB color with straight (non-premultiplied) alpha, 8 bits per channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// White, fully opaque.
    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Black, fully opaque.
    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let b = hex.as_bytes();
        match hex.len() {
            3 => Some(Self::new(
                expand_nibble(b[0])?,
                expand_nibble(b[1])?,
                expand_nibble(b[2])?,
                255,
            )),
            4 => Some(Self::new(
                expand_nibble(b[0])?,
                expand_nibble(b[1])?,
                expand_nibble(b[2])?,
                expand_nibble(b[3])?,
            )),
            6 => Some(Self::new(
                parse_byte(&b[0..2])?,
                parse_byte(&b[2..4])?,
                parse_byte(&b[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                parse_byte(&b[0..2])?,
                parse_byte(&b[2..4])?,
                parse_byte(&b[4..6])?,
                parse_byte(&b[6..8])?,
            )),
            _ => None,
        }
    }

    /// `#rrggbb` for opaque colors, `#rrggbbaa` otherwise.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(9);
        out.push('#');
        let channels: &[u8] = if self.a == 255 {
            &[self.r, self.g, self.b]
        } else {
            &[self.r, self.g, self.b, self.a]
        };
        for &c in channels {
            out.push(HEX_DIGITS[(c >> 4) as usize] as char);
            out.push(HEX_DIGITS[(c & 0x0f) as usize] as char);
        }
        out
    }

    /// WCAG relative luminance in `0.0..=1.0`, ignoring alpha.
    pub fn relative_luminance(&self) -> f64 {
        0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
    }

    /// Perceptual brightness in `0.0..=1.0`: Rec. 601 luma on the raw sRGB
    /// channels, ignoring alpha.
    pub fn luma(&self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }

    /// Whether light text or chrome reads better on top of this color
    /// (luma below one half).
    ///
    /// Used to pick a contrasting outline for a color swatch.
    pub fn is_dark(&self) -> bool {
        self.luma() < 0.5
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::white()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Error from parsing a color or background string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}: expected #RGB, #RGBA, #RRGGBB, #RRGGBBAA or transparent")]
pub struct ParseColorError(pub String);

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s).ok_or_else(|| ParseColorError(String::from(s)))
    }
}

/// What fills canvas areas not covered by an image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Background {
    /// Leave the area fully transparent.
    Transparent,
    /// Paint the area with a color.
    Opaque(Rgba),
}

impl Background {
    pub fn is_transparent(&self) -> bool {
        matches!(self, Self::Transparent)
    }

    /// The color, or `None` for transparent.
    pub fn color(&self) -> Option<Rgba> {
        match self {
            Self::Transparent => None,
            Self::Opaque(c) => Some(*c),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::Opaque(Rgba::white())
    }
}

impl From<Rgba> for Background {
    fn from(c: Rgba) -> Self {
        Self::Opaque(c)
    }
}

impl FromStr for Background {
    type Err = ParseColorError;

    /// Accepts `transparent` (case-insensitive) or any hex form [`Rgba`] takes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("transparent") {
            return Ok(Self::Transparent);
        }
        s.parse().map(Self::Opaque)
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transparent => f.write_str("transparent"),
            Self::Opaque(c) => fmt::Display::fmt(c, f),
        }
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Expand a single hex nibble: 'f' → 0xFF, 'a' → 0xAA.
fn expand_nibble(ch: u8) -> Option<u8> {
    let n = hex_val(ch)?;
    Some(n << 4 | n)
}

fn hex_val(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None,
    }
}

fn parse_byte(pair: &[u8]) -> Option<u8> {
    Some(hex_val(pair[0])? << 4 | hex_val(pair[1])?)
}

/// sRGB transfer function inverse.
fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
