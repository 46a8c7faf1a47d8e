use std::{fmt, str::FromStr};

use crate::foundation::error::{BoothError, BoothResult};

/// Which physical camera a stream comes from.
///
/// `Front` frames are mirrored on capture so the saved photo matches the mirrored preview.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Selfie camera (`user` in media-device terms).
    #[default]
    #[serde(alias = "user")]
    Front,
    /// Rear camera (`environment` in media-device terms).
    #[serde(alias = "environment")]
    Back,
}

impl FacingMode {
    /// Stable lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }

    /// Whether captured frames must be horizontally mirrored.
    pub fn mirrors(self) -> bool {
        matches!(self, Self::Front)
    }

    /// The other camera.
    pub fn flipped(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacingMode {
    type Err = BoothError;

    fn from_str(s: &str) -> BoothResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" | "user" => Ok(Self::Front),
            "back" | "environment" => Ok(Self::Back),
            other => Err(BoothError::validation(format!(
                "unknown facing mode '{other}'"
            ))),
        }
    }
}

/// Number of shots in one capture session, always within `1..=4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct ShotCount(u8);

impl ShotCount {
    /// Smallest allowed shot count.
    pub const MIN: u8 = 1;
    /// Largest allowed shot count.
    pub const MAX: u8 = 4;

    /// Clamp any requested count into `1..=4`.
    pub fn clamped(n: u32) -> Self {
        Self(n.clamp(u32::from(Self::MIN), u32::from(Self::MAX)) as u8)
    }

    /// Strict constructor used for parsing user input.
    pub fn new(n: u32) -> BoothResult<Self> {
        if !(u32::from(Self::MIN)..=u32::from(Self::MAX)).contains(&n) {
            return Err(BoothError::validation(format!(
                "shot count must be within {}..={}, got {n}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(n as u8))
    }

    /// Count as `usize`.
    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for ShotCount {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl<'de> serde::Deserialize<'de> for ShotCount {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let n = u32::deserialize(d)?;
        Ok(Self::clamped(n))
    }
}

/// Straight (non-premultiplied) RGB8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(s: &str) -> BoothResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(BoothError::validation(format!(
                "color must be #rrggbb, got '{s}'"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| BoothError::validation(format!("invalid hex color '{s}'")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Opaque RGBA pixel.
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

/// Background/text color variant of a rendered strip.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StripStyle {
    /// Paper-white strip with muted brown text.
    #[default]
    White,
    /// Near-black strip with warm copper text.
    Black,
}

impl StripStyle {
    /// Display order used by style pickers.
    pub const ALL: [StripStyle; 2] = [StripStyle::White, StripStyle::Black];

    /// Strip background color.
    pub fn background(self) -> Rgb8 {
        match self {
            Self::White => Rgb8::new(0xff, 0xff, 0xff),
            Self::Black => Rgb8::new(0x1c, 0x15, 0x10),
        }
    }

    /// Label text color.
    pub fn text_color(self) -> Rgb8 {
        match self {
            Self::White => Rgb8::new(0x8b, 0x7d, 0x6e),
            Self::Black => Rgb8::new(0xc4, 0x91, 0x6c),
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }

    /// Stable lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// Next style in display order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl FromStr for StripStyle {
    type Err = BoothError;

    fn from_str(s: &str) -> BoothResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(Self::White),
            "black" => Ok(Self::Black),
            other => Err(BoothError::validation(format!(
                "unknown strip style '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
