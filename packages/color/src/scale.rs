//! Piecewise-linear color scales and their legend representations.

use serde::{Deserialize, Serialize};

use crate::{ColorError, NEUTRAL_GRAY, Rgb};

/// Ascending domain breakpoints paired one-to-one with hex colors.
///
/// Well-formed scales satisfy `colors.len() == domain.len()` and a strictly
/// ascending domain. Malformed scales are still accepted everywhere; the
/// interpolator degrades instead of failing (see [`crate::color_for`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    /// Display name shown above the legend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: Vec<f64>,
    #[serde(default)]
    pub colors: Vec<String>,
    /// Optional per-color labels (e.g. `"Critical"`, `"Excellent"`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// One swatch of a rendered legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
    /// The breakpoint this swatch starts at, if the entry came from a scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl ColorScale {
    #[must_use]
    pub fn new(
        domain: impl IntoIterator<Item = f64>,
        colors: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: None,
            domain: domain.into_iter().collect(),
            colors: colors.into_iter().map(Into::into).collect(),
            labels: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// A scale the interpolator cannot use at all and replaces with the
    /// fixed fallback ramp.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.domain.is_empty() || self.colors.is_empty()
    }

    /// Checks every structural invariant.
    ///
    /// # Errors
    ///
    /// * [`ColorError::EmptyScale`] if domain or colors is empty
    /// * [`ColorError::LengthMismatch`] if they differ in length
    /// * [`ColorError::NotAscending`] if the domain is not strictly ascending
    /// * [`ColorError::InvalidHex`] for the first unparseable color
    /// * [`ColorError::LabelMismatch`] if labels are present but misaligned
    pub fn validate(&self) -> Result<(), ColorError> {
        if self.is_malformed() {
            return Err(ColorError::EmptyScale);
        }
        if self.domain.len() != self.colors.len() {
            return Err(ColorError::LengthMismatch {
                domain: self.domain.len(),
                colors: self.colors.len(),
            });
        }
        if let Some(index) = self
            .domain
            .windows(2)
            .position(|w| w[0].partial_cmp(&w[1]) != Some(std::cmp::Ordering::Less))
        {
            return Err(ColorError::NotAscending { index: index + 1 });
        }
        for color in &self.colors {
            Rgb::from_hex(color)?;
        }
        if !self.labels.is_empty() && self.labels.len() != self.colors.len() {
            return Err(ColorError::LabelMismatch {
                labels: self.labels.len(),
                colors: self.colors.len(),
            });
        }
        Ok(())
    }

    /// Lowest breakpoint, if any.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.domain.first().copied()
    }

    /// Highest breakpoint, if any.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.domain.last().copied()
    }

    /// One legend swatch per color, labeled with the scale's labels or, when
    /// absent, with the breakpoint value (`"75+"` for all but the last).
    #[must_use]
    pub fn legend(&self) -> Vec<LegendEntry> {
        let last = self.colors.len().saturating_sub(1);
        self.colors
            .iter()
            .enumerate()
            .map(|(idx, color)| {
                let value = self.domain.get(idx).copied();
                let label = self.labels.get(idx).cloned().unwrap_or_else(|| {
                    value.map_or_else(String::new, |v| {
                        if idx < last {
                            format!("{}+", format_breakpoint(v))
                        } else {
                            format_breakpoint(v)
                        }
                    })
                });
                LegendEntry {
                    label,
                    color: color.clone(),
                    value,
                }
            })
            .collect()
    }

    /// A CSS `linear-gradient` with each color stop positioned at its
    /// breakpoint's share of the domain.
    #[must_use]
    pub fn gradient_css(&self) -> String {
        if self.colors.is_empty() {
            return format!("linear-gradient(to right, {NEUTRAL_GRAY}, #999999)");
        }
        let (lo, hi) = (self.min().unwrap_or(0.0), self.max().unwrap_or(0.0));
        let span = hi - lo;
        let count = self.colors.len();

        let stops: Vec<String> = self
            .colors
            .iter()
            .enumerate()
            .map(|(idx, color)| {
                #[allow(clippy::cast_precision_loss)]
                let even = if count > 1 {
                    idx as f64 / (count - 1) as f64
                } else {
                    0.0
                };
                let position = match self.domain.get(idx) {
                    Some(v) if span > 0.0 => (v - lo) / span,
                    _ => even,
                };
                format!("{color} {:.0}%", position * 100.0)
            })
            .collect();

        format!("linear-gradient(to right, {})", stops.join(", "))
    }

    /// Low, middle, and high breakpoints for axis ticks under a gradient bar.
    #[must_use]
    pub fn tick_values(&self) -> Vec<f64> {
        match self.domain.len() {
            0 => Vec::new(),
            1 => vec![self.domain[0]],
            len => vec![self.domain[0], self.domain[len / 2], self.domain[len - 1]],
        }
    }
}

fn format_breakpoint(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
