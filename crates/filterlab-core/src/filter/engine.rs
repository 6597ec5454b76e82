//! Live-preview filter engine.
//!
//! The engine starts `Idle` with every control inert. The first loaded image
//! moves it to `Editing`; there is no way back short of a new session.
//! Every change recomputes the descriptor and pushes it to the preview.

use super::descriptor::FilterDescriptor;
use super::state::{FilterParameter, FilterState, Preset};
use super::FilterError;

/// The element the live filter is shown on.
pub trait PreviewSurface {
    /// Set the CSS `filter` value of the preview.
    fn apply_filter(&mut self, css: &str);

    /// Natural size of the displayed image, if one is shown.
    fn natural_size(&self) -> Option<(u32, u32)>;

    /// Show a newly loaded image: hide the upload box, reveal the preview
    /// with `source` and `display_name`, and reveal the action controls.
    fn show_image(&mut self, source: &str, display_name: &str);
}

/// Observable engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnginePhase {
    /// No image loaded; controls are inert.
    #[default]
    Idle,
    /// An image is loaded and the controls are live.
    Editing,
}

/// Owns the filter state and keeps the preview in sync with it.
pub struct FilterEngine<P> {
    surface: P,
    state: FilterState,
    applied: FilterDescriptor,
    phase: EnginePhase,
}

impl<P: PreviewSurface> FilterEngine<P> {
    pub fn new(surface: P) -> Self {
        Self {
            surface,
            state: FilterState::default(),
            applied: FilterDescriptor::none(),
            phase: EnginePhase::Idle,
        }
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_editing(&self) -> bool {
        self.phase == EnginePhase::Editing
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// The descriptor currently on the preview.
    pub fn applied_descriptor(&self) -> &FilterDescriptor {
        &self.applied
    }

    /// The slider-composed descriptor for the current state.
    ///
    /// This differs from [`applied_descriptor`](Self::applied_descriptor)
    /// after `reset`, the `none` preset, or a literal preset.
    pub fn composed_descriptor(&self) -> FilterDescriptor {
        FilterDescriptor::composed(&self.state)
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.surface
    }

    /// An image finished loading: enter `Editing` with default filters.
    pub fn on_loaded(&mut self) {
        if self.phase == EnginePhase::Idle {
            log::debug!("Filter engine: Idle -> Editing");
        }
        self.phase = EnginePhase::Editing;
        self.reset_state();
    }

    /// Set one slider value.
    ///
    /// Returns `false` without touching anything while `Idle`.
    pub fn set_parameter(&mut self, parameter: FilterParameter, value: i64) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.state.set(parameter, value);
        self.apply(FilterDescriptor::composed(&self.state));
        true
    }

    /// [`set_parameter`](Self::set_parameter) by control name.
    pub fn set_parameter_by_name(&mut self, name: &str, value: i64) -> Result<bool, FilterError> {
        let parameter = name.parse::<FilterParameter>()?;
        Ok(self.set_parameter(parameter, value))
    }

    /// Select a preset.
    ///
    /// Numeric fields go back to defaults before the preset's overrides are
    /// applied. Returns `false` while `Idle`.
    pub fn apply_preset(&mut self, preset: Preset) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.state.select_preset(preset);
        self.apply(FilterDescriptor::for_preset(preset, &self.state));
        true
    }

    /// [`apply_preset`](Self::apply_preset) by selector value.
    pub fn apply_preset_by_name(&mut self, name: &str) -> Result<bool, FilterError> {
        let preset = name.parse::<Preset>()?;
        Ok(self.apply_preset(preset))
    }

    /// Back to defaults with `none` on the preview. Inert while `Idle`.
    pub fn reset(&mut self) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.reset_state();
        true
    }

    fn reset_state(&mut self) {
        self.state.reset();
        self.apply(FilterDescriptor::none());
    }

    fn apply(&mut self, descriptor: FilterDescriptor) {
        let css = descriptor.to_css();
        log::debug!("Preview filter: {}", css);
        self.surface.apply_filter(&css);
        self.applied = descriptor;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Preview surface that records what was pushed to it.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub filters: Vec<String>,
        pub shown: Option<(String, String)>,
        pub size: Option<(u32, u32)>,
    }

    impl RecordingSurface {
        pub fn last_filter(&self) -> Option<&str> {
            self.filters.last().map(String::as_str)
        }
    }

    impl PreviewSurface for RecordingSurface {
        fn apply_filter(&mut self, css: &str) {
            self.filters.push(css.to_string());
        }

        fn natural_size(&self) -> Option<(u32, u32)> {
            self.size
        }

        fn show_image(&mut self, source: &str, display_name: &str) {
            self.shown = Some((source.to_string(), display_name.to_string()));
        }
    }

    fn editing_engine() -> FilterEngine<RecordingSurface> {
        let mut engine = FilterEngine::new(RecordingSurface::default());
        engine.on_loaded();
        engine
    }

    #[test]
    fn test_starts_idle() {
        let engine = FilterEngine::new(RecordingSurface::default());
        assert_eq!(engine.phase(), EnginePhase::Idle);
        assert!(engine.applied_descriptor().is_none());
    }

    #[test]
    fn test_idle_controls_are_inert() {
        let mut engine = FilterEngine::new(RecordingSurface::default());

        assert!(!engine.set_parameter(FilterParameter::Brightness, 150));
        assert!(!engine.apply_preset(Preset::Invert));
        assert!(!engine.reset());

        assert!(engine.state().is_default());
        assert!(engine.surface().filters.is_empty());
    }

    #[test]
    fn test_on_loaded_enters_editing_with_defaults() {
        let engine = editing_engine();
        assert!(engine.is_editing());
        assert!(engine.state().is_default());
        assert_eq!(engine.surface().last_filter(), Some("none"));
    }

    #[test]
    fn test_set_parameter_applies_composed() {
        let mut engine = editing_engine();
        assert!(engine.set_parameter(FilterParameter::Brightness, 150));
        engine.set_parameter(FilterParameter::Contrast, 80);
        engine.set_parameter(FilterParameter::Sepia, 20);
        engine.set_parameter(FilterParameter::Blur, 3);

        let expected = "brightness(150%) contrast(80%) sepia(20%) blur(3px)";
        assert_eq!(engine.surface().last_filter(), Some(expected));
        assert_eq!(engine.applied_descriptor().to_css(), expected);
        assert_eq!(engine.composed_descriptor().to_css(), expected);
    }

    #[test]
    fn test_set_parameter_after_preset_clears_it() {
        let mut engine = editing_engine();
        engine.apply_preset(Preset::Cool);
        engine.set_parameter(FilterParameter::Sepia, 10);

        assert_eq!(engine.state().active_preset, Preset::None);
        assert_eq!(
            engine.surface().last_filter(),
            Some("brightness(110%) contrast(120%) sepia(10%) blur(0px)")
        );
    }

    #[test]
    fn test_literal_presets() {
        let mut engine = editing_engine();
        engine.set_parameter(FilterParameter::Blur, 4);

        engine.apply_preset(Preset::Grayscale);
        assert_eq!(engine.surface().last_filter(), Some("grayscale(100%)"));
        assert_eq!(engine.state().blur, 0);

        engine.apply_preset(Preset::Invert);
        assert_eq!(engine.surface().last_filter(), Some("invert(100%)"));

        engine.apply_preset(Preset::Cool);
        assert_eq!(
            engine.surface().last_filter(),
            Some("brightness(110%) contrast(120%) hue-rotate(180deg)")
        );
        // The sliders still show the stored overrides
        assert_eq!(engine.state().brightness, 110);
        assert_eq!(engine.state().contrast, 120);
    }

    #[test]
    fn test_composed_presets() {
        let mut engine = editing_engine();

        engine.apply_preset(Preset::Sepia);
        assert_eq!(
            engine.surface().last_filter(),
            Some("brightness(100%) contrast(100%) sepia(100%) blur(0px)")
        );

        engine.apply_preset(Preset::Vibrant);
        assert_eq!(
            engine.surface().last_filter(),
            Some("brightness(105%) contrast(150%) sepia(0%) blur(0px)")
        );
    }

    #[test]
    fn test_grayscale_then_none_restores_defaults() {
        let mut engine = editing_engine();
        engine.apply_preset(Preset::Grayscale);
        engine.apply_preset(Preset::None);

        assert!(engine.state().is_default());
        assert_eq!(engine.surface().last_filter(), Some("none"));
        assert_eq!(
            engine.composed_descriptor().to_css(),
            "brightness(100%) contrast(100%) sepia(0%) blur(0px)"
        );
    }

    #[test]
    fn test_reset() {
        let mut engine = editing_engine();
        engine.set_parameter(FilterParameter::Contrast, 170);
        engine.apply_preset(Preset::Vibrant);

        assert!(engine.reset());
        assert!(engine.state().is_default());
        assert!(engine.applied_descriptor().is_none());
        assert_eq!(engine.surface().last_filter(), Some("none"));
    }

    #[test]
    fn test_second_load_resets() {
        let mut engine = editing_engine();
        engine.set_parameter(FilterParameter::Sepia, 60);
        engine.on_loaded();

        assert!(engine.is_editing());
        assert!(engine.state().is_default());
    }

    #[test]
    fn test_by_name() {
        let mut engine = editing_engine();
        assert_eq!(engine.set_parameter_by_name("blur", 2), Ok(true));
        assert_eq!(engine.state().blur, 2);

        assert_eq!(engine.apply_preset_by_name("sepia"), Ok(true));
        assert_eq!(engine.state().sepia, 100);

        assert!(engine.set_parameter_by_name("hue", 2).is_err());
        assert!(engine.apply_preset_by_name("noir").is_err());
    }
}
