//! Filter parameters, presets and the state they live in.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::FilterError;

/// Neutral brightness (percent).
pub const DEFAULT_BRIGHTNESS: u32 = 100;
/// Neutral contrast (percent).
pub const DEFAULT_CONTRAST: u32 = 100;
/// Neutral sepia (percent).
pub const DEFAULT_SEPIA: u32 = 0;
/// Neutral blur (pixels).
pub const DEFAULT_BLUR: u32 = 0;

/// One of the four slider-controlled parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterParameter {
    Brightness,
    Contrast,
    Sepia,
    Blur,
}

impl FilterParameter {
    pub const ALL: [FilterParameter; 4] = [
        FilterParameter::Brightness,
        FilterParameter::Contrast,
        FilterParameter::Sepia,
        FilterParameter::Blur,
    ];

    /// Bounds of the range control for this parameter.
    pub fn bounds(self) -> RangeInclusive<u32> {
        match self {
            FilterParameter::Brightness => 0..=200,
            FilterParameter::Contrast => 0..=200,
            FilterParameter::Sepia => 0..=100,
            FilterParameter::Blur => 0..=10,
        }
    }

    /// Identity value for this parameter.
    pub fn default_value(self) -> u32 {
        match self {
            FilterParameter::Brightness => DEFAULT_BRIGHTNESS,
            FilterParameter::Contrast => DEFAULT_CONTRAST,
            FilterParameter::Sepia => DEFAULT_SEPIA,
            FilterParameter::Blur => DEFAULT_BLUR,
        }
    }

    /// Clamp a raw control value into bounds.
    pub fn clamp(self, value: i64) -> u32 {
        let bounds = self.bounds();
        value.clamp(*bounds.start() as i64, *bounds.end() as i64) as u32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterParameter::Brightness => "brightness",
            FilterParameter::Contrast => "contrast",
            FilterParameter::Sepia => "sepia",
            FilterParameter::Blur => "blur",
        }
    }
}

impl fmt::Display for FilterParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterParameter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "brightness" => Ok(FilterParameter::Brightness),
            "contrast" => Ok(FilterParameter::Contrast),
            "sepia" => Ok(FilterParameter::Sepia),
            "blur" => Ok(FilterParameter::Blur),
            other => Err(FilterError::UnknownParameter(other.to_string())),
        }
    }
}

/// Named preset from the preset selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
    Cool,
    Vibrant,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::None,
        Preset::Grayscale,
        Preset::Sepia,
        Preset::Invert,
        Preset::Cool,
        Preset::Vibrant,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::None => "none",
            Preset::Grayscale => "grayscale",
            Preset::Sepia => "sepia",
            Preset::Invert => "invert",
            Preset::Cool => "cool",
            Preset::Vibrant => "vibrant",
        }
    }

    /// Numeric overrides applied on top of the defaults.
    fn overrides(self) -> &'static [(FilterParameter, u32)] {
        match self {
            Preset::None | Preset::Invert => &[],
            Preset::Grayscale => &[(FilterParameter::Sepia, 0)],
            Preset::Sepia => &[(FilterParameter::Sepia, 100)],
            Preset::Cool => &[
                (FilterParameter::Brightness, 110),
                (FilterParameter::Contrast, 120),
            ],
            Preset::Vibrant => &[
                (FilterParameter::Contrast, 150),
                (FilterParameter::Brightness, 105),
            ],
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            // The selector's empty option means no preset
            "" | "none" => Ok(Preset::None),
            "grayscale" => Ok(Preset::Grayscale),
            "sepia" => Ok(Preset::Sepia),
            "invert" => Ok(Preset::Invert),
            "cool" => Ok(Preset::Cool),
            "vibrant" => Ok(Preset::Vibrant),
            other => Err(FilterError::UnknownPreset(other.to_string())),
        }
    }
}

/// Current slider values and preset selection.
///
/// `active_preset` is `None` whenever a numeric field was last changed
/// individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Brightness in percent (0-200, 100 = unchanged)
    pub brightness: u32,
    /// Contrast in percent (0-200, 100 = unchanged)
    pub contrast: u32,
    /// Sepia in percent (0-100)
    pub sepia: u32,
    /// Blur radius in pixels (0-10)
    pub blur: u32,
    pub active_preset: Preset,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            brightness: DEFAULT_BRIGHTNESS,
            contrast: DEFAULT_CONTRAST,
            sepia: DEFAULT_SEPIA,
            blur: DEFAULT_BLUR,
            active_preset: Preset::None,
        }
    }
}

impl FilterState {
    /// Create a state with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn get(&self, parameter: FilterParameter) -> u32 {
        match parameter {
            FilterParameter::Brightness => self.brightness,
            FilterParameter::Contrast => self.contrast,
            FilterParameter::Sepia => self.sepia,
            FilterParameter::Blur => self.blur,
        }
    }

    /// Set one parameter from a raw control value.
    ///
    /// The value is clamped to the control bounds and the preset selection
    /// is cleared.
    pub fn set(&mut self, parameter: FilterParameter, value: i64) {
        let value = parameter.clamp(value);
        self.set_field(parameter, value);
        self.active_preset = Preset::None;
    }

    /// Reset to defaults, then apply the preset's numeric overrides.
    pub fn select_preset(&mut self, preset: Preset) {
        *self = Self::default();
        for &(parameter, value) in preset.overrides() {
            self.set_field(parameter, value);
        }
        self.active_preset = preset;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn set_field(&mut self, parameter: FilterParameter, value: u32) {
        match parameter {
            FilterParameter::Brightness => self.brightness = value,
            FilterParameter::Contrast => self.contrast = value,
            FilterParameter::Sepia => self.sepia = value,
            FilterParameter::Blur => self.blur = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = FilterState::new();
        assert_eq!(state.brightness, 100);
        assert_eq!(state.contrast, 100);
        assert_eq!(state.sepia, 0);
        assert_eq!(state.blur, 0);
        assert_eq!(state.active_preset, Preset::None);
        assert!(state.is_default());
    }

    #[test]
    fn test_set_clears_preset() {
        let mut state = FilterState::new();
        state.select_preset(Preset::Vibrant);
        assert_eq!(state.active_preset, Preset::Vibrant);

        state.set(FilterParameter::Blur, 2);
        assert_eq!(state.active_preset, Preset::None);
        // Other preset-set fields stay as they were
        assert_eq!(state.contrast, 150);
        assert_eq!(state.blur, 2);
    }

    #[test]
    fn test_set_clamps() {
        let mut state = FilterState::new();
        state.set(FilterParameter::Brightness, 500);
        assert_eq!(state.brightness, 200);

        state.set(FilterParameter::Sepia, -20);
        assert_eq!(state.sepia, 0);

        state.set(FilterParameter::Sepia, 101);
        assert_eq!(state.sepia, 100);

        state.set(FilterParameter::Blur, 50);
        assert_eq!(state.blur, 10);
    }

    #[test]
    fn test_preset_overrides() {
        let mut state = FilterState::new();

        state.select_preset(Preset::Cool);
        assert_eq!((state.brightness, state.contrast), (110, 120));
        assert_eq!((state.sepia, state.blur), (0, 0));

        state.select_preset(Preset::Sepia);
        assert_eq!(state.sepia, 100);
        // Cool's overrides do not leak into the next preset
        assert_eq!((state.brightness, state.contrast), (100, 100));

        state.select_preset(Preset::Vibrant);
        assert_eq!((state.brightness, state.contrast), (105, 150));
        assert_eq!(state.sepia, 0);
    }

    #[test]
    fn test_preset_resets_individual_changes() {
        let mut state = FilterState::new();
        state.set(FilterParameter::Blur, 5);
        state.set(FilterParameter::Sepia, 40);

        state.select_preset(Preset::Invert);
        assert_eq!(state.blur, 0);
        assert_eq!(state.sepia, 0);
        assert_eq!(state.active_preset, Preset::Invert);
    }

    #[test]
    fn test_none_preset_is_default() {
        let mut state = FilterState::new();
        state.select_preset(Preset::Grayscale);
        state.select_preset(Preset::None);
        assert!(state.is_default());
    }

    #[test]
    fn test_reset() {
        let mut state = FilterState::new();
        state.set(FilterParameter::Contrast, 30);
        state.select_preset(Preset::Cool);
        state.reset();
        assert!(state.is_default());
    }

    #[test]
    fn test_parameter_parse() {
        assert_eq!(
            "brightness".parse::<FilterParameter>().unwrap(),
            FilterParameter::Brightness
        );
        assert_eq!(" blur ".parse::<FilterParameter>().unwrap(), FilterParameter::Blur);
        assert!(matches!(
            "gamma".parse::<FilterParameter>(),
            Err(FilterError::UnknownParameter(name)) if name == "gamma"
        ));
    }

    #[test]
    fn test_preset_parse() {
        for preset in Preset::ALL {
            assert_eq!(preset.as_str().parse::<Preset>().unwrap(), preset);
        }
        assert_eq!("".parse::<Preset>().unwrap(), Preset::None);
        assert!("sunset".parse::<Preset>().is_err());
    }

    #[test]
    fn test_defaults_within_bounds() {
        for parameter in FilterParameter::ALL {
            assert!(parameter.bounds().contains(&parameter.default_value()));
        }
    }
}
