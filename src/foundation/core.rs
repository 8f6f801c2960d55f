use crate::foundation::error::{FrameinkError, FrameinkResult};

pub use kurbo::{BezPath, Point, Vec2};

/// Drawing surface size in canvas units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Validated canvas size; both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> FrameinkResult<Self> {
        if width == 0 || height == 0 {
            return Err(FrameinkError::invalid("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Playback rate in whole frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Fps(pub u32);

impl Fps {
    /// Validated frame rate; zero is rejected.
    pub fn new(fps: u32) -> FrameinkResult<Self> {
        if fps == 0 {
            return Err(FrameinkError::invalid("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    /// Whole milliseconds per frame.
    pub fn frame_duration_ms(self) -> u64 {
        1000 / u64::from(self.0.max(1))
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self(12)
    }
}

/// Straight (non-premultiplied) RGBA8 color, serialized as `#rrggbb` or `#rrggbbaa`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit straight alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn parse(s: &str) -> FrameinkResult<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> FrameinkResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| FrameinkError::serde(format!("invalid hex byte \"{pair}\"")))
        }
        fn hex_nibble(c: &str) -> FrameinkResult<u8> {
            let v = hex_byte(c)?;
            Ok(v * 17)
        }

        if !hex.is_ascii() {
            return Err(FrameinkError::serde(format!("invalid color \"{s}\"")));
        }
        match hex.len() {
            3 => Ok(Self::rgb(
                hex_nibble(&hex[0..1])?,
                hex_nibble(&hex[1..2])?,
                hex_nibble(&hex[2..3])?,
            )),
            6 => Ok(Self::rgb(
                hex_byte(&hex[0..2])?,
                hex_byte(&hex[2..4])?,
                hex_byte(&hex[4..6])?,
            )),
            8 => Ok(Self::rgba(
                hex_byte(&hex[0..2])?,
                hex_byte(&hex[2..4])?,
                hex_byte(&hex[4..6])?,
                hex_byte(&hex[6..8])?,
            )),
            _ => Err(FrameinkError::serde(format!(
                "color must be #rgb, #rrggbb or #rrggbbaa, got \"{s}\""
            ))),
        }
    }

    /// Lowercase hex form; alpha is omitted when opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Premultiplied form of this color.
    pub fn to_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Canvas background: a solid color or fully transparent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Background {
    Solid(Color),
    #[default]
    Transparent,
}

impl Background {
    /// Solid color, or `None` when transparent.
    pub fn color(self) -> Option<Color> {
        match self {
            Self::Solid(c) => Some(c),
            Self::Transparent => None,
        }
    }
}

impl serde::Serialize for Background {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Solid(c) => serializer.serialize_str(&c.to_hex()),
            Self::Transparent => serializer.serialize_str("transparent"),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Background {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.trim().eq_ignore_ascii_case("transparent") {
            return Ok(Self::Transparent);
        }
        Color::parse(&s)
            .map(Self::Solid)
            .map_err(serde::de::Error::custom)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent pixel.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Premultiply straight RGBA8 channels.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
