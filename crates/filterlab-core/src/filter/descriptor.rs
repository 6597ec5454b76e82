//! Filter descriptors.
//!
//! A descriptor is an ordered list of filter functions with fractional
//! amounts (1.0 = 100%). The same value is rendered to a CSS `filter` string
//! for the live preview and handed to the pixel renderer for export.

use std::fmt;

use super::state::{FilterState, Preset};

/// A single CSS filter function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    /// Linear multiplier, 1.0 = unchanged.
    Brightness(f32),
    /// Contrast around mid-grey, 1.0 = unchanged.
    Contrast(f32),
    /// Sepia amount, 0.0 to 1.0.
    Sepia(f32),
    /// Gaussian blur radius in pixels.
    Blur(f32),
    /// Grayscale amount, 0.0 to 1.0.
    Grayscale(f32),
    /// Invert amount, 0.0 to 1.0.
    Invert(f32),
    /// Hue rotation in degrees.
    HueRotate(f32),
}

impl FilterOp {
    /// True when applying this op leaves every pixel unchanged.
    pub fn is_identity(&self) -> bool {
        match *self {
            FilterOp::Brightness(a) | FilterOp::Contrast(a) => a == 1.0,
            FilterOp::Sepia(a)
            | FilterOp::Blur(a)
            | FilterOp::Grayscale(a)
            | FilterOp::Invert(a) => a == 0.0,
            FilterOp::HueRotate(deg) => deg % 360.0 == 0.0,
        }
    }
}

/// Render a fraction as a whole-or-decimal percentage.
fn percent(amount: f32) -> String {
    let value = amount * 100.0;
    let rounded = value.round();
    if (value - rounded).abs() < 1e-3 {
        format!("{}%", rounded as i64)
    } else {
        format!("{}%", value)
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FilterOp::Brightness(a) => write!(f, "brightness({})", percent(a)),
            FilterOp::Contrast(a) => write!(f, "contrast({})", percent(a)),
            FilterOp::Sepia(a) => write!(f, "sepia({})", percent(a)),
            FilterOp::Blur(px) => write!(f, "blur({}px)", px),
            FilterOp::Grayscale(a) => write!(f, "grayscale({})", percent(a)),
            FilterOp::Invert(a) => write!(f, "invert({})", percent(a)),
            FilterOp::HueRotate(deg) => write!(f, "hue-rotate({}deg)", deg),
        }
    }
}

/// An ordered filter chain; empty means `none`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterDescriptor {
    ops: Vec<FilterOp>,
}

impl FilterDescriptor {
    /// The neutral descriptor (`none`).
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_ops(ops: Vec<FilterOp>) -> Self {
        Self { ops }
    }

    /// `brightness(B%) contrast(C%) sepia(S%) blur(Kpx)`, always all four.
    pub fn composed(state: &FilterState) -> Self {
        Self::from_ops(vec![
            FilterOp::Brightness(state.brightness as f32 / 100.0),
            FilterOp::Contrast(state.contrast as f32 / 100.0),
            FilterOp::Sepia(state.sepia as f32 / 100.0),
            FilterOp::Blur(state.blur as f32),
        ])
    }

    /// The descriptor a preset puts on the preview.
    ///
    /// Grayscale, invert and cool apply a literal look that ignores the
    /// composed sliders; sepia and vibrant use the composed form of the
    /// state the preset left behind.
    pub fn for_preset(preset: Preset, state: &FilterState) -> Self {
        match preset {
            Preset::None => Self::none(),
            Preset::Grayscale => Self::from_ops(vec![FilterOp::Grayscale(1.0)]),
            Preset::Invert => Self::from_ops(vec![FilterOp::Invert(1.0)]),
            Preset::Cool => Self::from_ops(vec![
                FilterOp::Brightness(1.1),
                FilterOp::Contrast(1.2),
                FilterOp::HueRotate(180.0),
            ]),
            Preset::Sepia | Preset::Vibrant => Self::composed(state),
        }
    }

    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    pub fn is_none(&self) -> bool {
        self.ops.is_empty()
    }

    /// True when rendering would leave the image unchanged.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(FilterOp::is_identity)
    }

    /// CSS `filter` property value.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FilterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return f.write_str("none");
        }
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}
