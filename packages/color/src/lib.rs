#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Scalar to color mapping through piecewise-linear color scales.
//!
//! [`color_for`] is the single entry point used by the map: given an
//! optional [`ColorScale`] and a value it always produces a lowercase
//! `#rrggbb` string (or one of the scale's own color strings at an exact
//! breakpoint). Nothing here returns an error to the caller at render time;
//! malformed input degrades to the fixed ramp or [`NEUTRAL_GRAY`].

mod registry;
mod rgb;
mod scale;

pub use registry::ColorScaleTable;
pub use rgb::Rgb;
pub use scale::{ColorScale, LegendEntry};

/// Color used when nothing better can be determined.
pub const NEUTRAL_GRAY: &str = "#666666";

/// Errors found when validating a color scale or parsing a hex color.
#[derive(Debug, thiserror::Error)]
pub enum ColorError {
    /// Not a `#rgb` or `#rrggbb` string.
    #[error("Invalid hex color: {value:?}")]
    InvalidHex {
        /// The rejected input.
        value: String,
    },

    #[error("Color scale has an empty domain or no colors")]
    EmptyScale,

    #[error("Color scale has {domain} breakpoints but {colors} colors")]
    LengthMismatch { domain: usize, colors: usize },

    /// `domain[index]` is not strictly greater than `domain[index - 1]`.
    #[error("Color scale domain is not strictly ascending at index {index}")]
    NotAscending { index: usize },

    #[error("Color scale has {labels} labels but {colors} colors")]
    LabelMismatch { labels: usize, colors: usize },
}

/// Maps `value` to a color through `scale`.
///
/// * No scale, or an empty domain or color list: [`fallback_ramp_color`].
/// * At or below `domain[0]`: the first color. At or above the last
///   breakpoint: the last color.
/// * Otherwise the first segment `[domain[i], domain[i + 1]]` containing the
///   value is interpolated per channel.
/// * A segment with one unusable color yields the other; with neither,
///   [`NEUTRAL_GRAY`]. A `NaN` value also yields [`NEUTRAL_GRAY`].
#[must_use]
pub fn color_for(scale: Option<&ColorScale>, value: f64) -> String {
    let Some(scale) = scale.filter(|s| !s.is_malformed()) else {
        return fallback_ramp_color(value).to_string();
    };
    if value.is_nan() {
        return NEUTRAL_GRAY.to_string();
    }

    let domain = &scale.domain;
    let colors = &scale.colors;
    let last = domain.len() - 1;

    if value <= domain[0] {
        return endpoint_color(colors.first().map(String::as_str));
    }
    if value >= domain[last] {
        return endpoint_color(colors.get(last).or_else(|| colors.last()).map(String::as_str));
    }

    for i in 0..last {
        let (lo, hi) = (domain[i], domain[i + 1]);
        if value >= lo && value <= hi {
            let width = hi - lo;
            let ratio = if width > 0.0 {
                (value - lo) / width
            } else {
                0.0
            };
            return interpolate_segment(
                colors.get(i).map(String::as_str),
                colors.get(i + 1).map(String::as_str),
                ratio,
            );
        }
    }

    // Only reachable with a non-ascending domain.
    NEUTRAL_GRAY.to_string()
}

/// Interpolates between two hex strings, degrading like [`color_for`].
#[must_use]
pub fn interpolate_hex(from: &str, to: &str, ratio: f64) -> String {
    interpolate_segment(Some(from), Some(to), ratio)
}

fn endpoint_color(color: Option<&str>) -> String {
    match color {
        Some(c) if Rgb::from_hex(c).is_ok() => c.to_string(),
        _ => NEUTRAL_GRAY.to_string(),
    }
}

fn interpolate_segment(lo: Option<&str>, hi: Option<&str>, ratio: f64) -> String {
    let lo_rgb = lo.and_then(|c| Rgb::from_hex(c).ok());
    let hi_rgb = hi.and_then(|c| Rgb::from_hex(c).ok());

    match (lo, lo_rgb, hi, hi_rgb) {
        (Some(lo), Some(a), Some(hi), Some(b)) => {
            if ratio <= 0.0 {
                lo.to_string()
            } else if ratio >= 1.0 {
                hi.to_string()
            } else {
                a.lerp(b, ratio).to_hex()
            }
        }
        (Some(lo), Some(_), _, None) => lo.to_string(),
        (_, None, Some(hi), Some(_)) => hi.to_string(),
        _ => NEUTRAL_GRAY.to_string(),
    }
}

/// The fixed five-step ramp used when no usable scale is available.
#[must_use]
pub fn fallback_ramp_color(value: f64) -> &'static str {
    if value > 80.0 {
        "#00ff41"
    } else if value > 60.0 {
        "#00f5ff"
    } else if value > 40.0 {
        "#ffff00"
    } else if value > 20.0 {
        "#ff7700"
    } else {
        "#ff0000"
    }
}

/// Black or white, whichever reads better on top of `background`.
///
/// Unparseable backgrounds get white text.
#[must_use]
pub fn contrast_color(background: &str) -> &'static str {
    match Rgb::from_hex(background) {
        Ok(rgb) if rgb.brightness() > 0.5 => "#000000",
        _ => "#ffffff",
    }
}
