//! RGB colors and their canonical `#rrggbb` key form
//!
//! The hex form is a bijection of the channel triple, so ordering, hashing and
//! equality on [`Color`] agree exactly with the canonical string keys.

use crate::io::error::{Result, invalid_parameter};
use image::Rgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Pure black (0, 0, 0)
    pub const BLACK: Self = Self([0, 0, 0]);
    /// Pure white (255, 255, 255)
    pub const WHITE: Self = Self([255, 255, 255]);

    /// Create a color from its channels
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self([red, green, blue])
    }

    /// Channel values in red, green, blue order
    pub const fn channels(self) -> [u8; 3] {
        self.0
    }

    /// Canonical lowercase key, e.g. `#ff00ff`
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Parse a `#rrggbb` key
    ///
    /// Upper-case digits are accepted; the leading `#` is required.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not exactly `#` followed by six hex digits
    pub fn from_hex(key: &str) -> Result<Self> {
        let digits = key
            .strip_prefix('#')
            .filter(|rest| rest.len() == 6 && rest.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| invalid_parameter("color", &key, &"expected #rrggbb"))?;

        let channel = |range: std::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| invalid_parameter("color", &key, &"invalid hex digit"))
        };

        Ok(Self([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }

    /// Squared euclidean distance in RGB space
    pub fn distance_squared(self, other: Self) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(&a, &b)| {
                let diff = i32::from(a) - i32::from(b);
                (diff * diff) as u32
            })
            .sum()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = crate::io::error::AlgorithmError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl From<Rgb<u8>> for Color {
    fn from(pixel: Rgb<u8>) -> Self {
        Self(pixel.0)
    }
}

impl From<Color> for Rgb<u8> {
    fn from(color: Color) -> Self {
        Self(color.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Self::from_hex(&key).map_err(serde::de::Error::custom)
    }
}
