//! 8-bit sRGB triples and hex string conversion.

use std::{fmt, str::FromStr};

use crate::ColorError;

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb`. The leading `#` is required.
    ///
    /// Short form expands each nibble by doubling, so `#0af` is `#00aaff`.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidHex`] for any other length or for
    /// non-hex digits.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex {
            value: hex.to_string(),
        };
        let digits = hex.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..=i].repeat(2));
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Per-channel linear interpolation toward `other`.
    ///
    /// `ratio` is clamped to `[0, 1]`. Channels round half away from zero,
    /// so black to white at `0.5` gives `#808080`.
    #[must_use]
    pub fn lerp(self, other: Self, ratio: f64) -> Self {
        let t = if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, 1.0)
        };
        let mix = |a: u8, b: u8| -> u8 {
            let (a, b) = (f64::from(a), f64::from(b));
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let value = (t.mul_add(b - a, a)).round().clamp(0.0, 255.0) as u8;
            value
        };
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    /// Perceived brightness in `[0, 1]` using the ITU-R BT.601 luma weights.
    #[must_use]
    pub fn brightness(self) -> f64 {
        let luma = 0.114f64.mul_add(
            f64::from(self.b),
            0.299f64.mul_add(f64::from(self.r), 0.587 * f64::from(self.g)),
        );
        luma / 255.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!(Rgb::from_hex("#ff7700").unwrap(), Rgb::new(255, 119, 0));
        assert_eq!(Rgb::from_hex("#FF7700").unwrap(), Rgb::new(255, 119, 0));
        assert_eq!(Rgb::from_hex("#0af").unwrap(), Rgb::new(0, 170, 255));
        assert_eq!(Rgb::from_hex("#000").unwrap(), Rgb::BLACK);
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in [
            "", "#", "#12", "#1234", "#gggggg", "red", "#ff00ff00", "bad", "face00", "abc",
        ] {
            assert!(Rgb::from_hex(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn hex_output_is_lowercase_two_digit() {
        assert_eq!(Rgb::new(0, 10, 255).to_hex(), "#000aff");
        assert_eq!(Rgb::new(171, 205, 239).to_string(), "#abcdef");
    }

    #[test]
    fn lerp_rounds_half_away_from_zero() {
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 0.5).to_hex(), "#808080");
    }

    #[test]
    fn lerp_clamps_ratio() {
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, -1.0), Rgb::BLACK);
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 2.0), Rgb::WHITE);
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, f64::NAN), Rgb::BLACK);
    }

    #[test]
    fn brightness_extremes() {
        assert!(Rgb::BLACK.brightness().abs() < 1e-9);
        assert!((Rgb::WHITE.brightness() - 1.0).abs() < 1e-9);
    }
}
