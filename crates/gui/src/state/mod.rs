pub mod settings;

use std::collections::BTreeMap;

use shared::{eval_number, ShapeDescriptor, ShapeKind};

pub use settings::{AppSettings, CameraSettings, GridSettings, UiSettings, ViewportSettings};

/// Panel visibility flags
pub struct PanelVisibility {
    pub shape_panel: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self { shape_panel: true }
    }
}

/// Combined application state
pub struct AppState {
    /// What the viewport should show
    pub descriptor: ShapeDescriptor,
    /// Editor text per parameter key (may hold an expression)
    pub param_inputs: BTreeMap<String, String>,
    /// Expression errors per parameter key
    pub input_errors: BTreeMap<String, String>,
    pub panels: PanelVisibility,
    pub settings: AppSettings,
    /// Whether the scene host should be mounted
    pub viewport_mounted: bool,
    /// Set by the UI, consumed by the viewport
    pub camera_reset_requested: bool,
    pub show_settings_window: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppSettings::load(), ShapeDescriptor::default())
    }
}

impl AppState {
    pub fn new(settings: AppSettings, descriptor: ShapeDescriptor) -> Self {
        let mut state = Self {
            descriptor,
            param_inputs: BTreeMap::new(),
            input_errors: BTreeMap::new(),
            panels: PanelVisibility::default(),
            settings,
            viewport_mounted: true,
            camera_reset_requested: false,
            show_settings_window: false,
        };
        state.sync_inputs();
        state
    }

    /// Switch to another shape with its default parameters
    pub fn select_shape(&mut self, kind: ShapeKind) {
        if self.descriptor.kind() == Some(kind) {
            return;
        }
        self.descriptor = ShapeDescriptor::with_defaults(kind);
        self.sync_inputs();
    }

    pub fn reset_params(&mut self) {
        if let Some(kind) = self.descriptor.kind() {
            self.descriptor.params = kind.default_params();
            self.sync_inputs();
        }
    }

    /// Apply editor text for one parameter. Returns whether the value changed.
    pub fn set_param_input(&mut self, key: &str, text: &str) -> bool {
        self.param_inputs.insert(key.to_string(), text.to_string());
        match eval_number(text) {
            Ok(value) => {
                self.input_errors.remove(key);
                let changed = self.descriptor.params.get(key) != Some(value);
                self.descriptor.params.set(key, value);
                changed
            }
            Err(e) => {
                self.input_errors.insert(key.to_string(), e.to_string());
                false
            }
        }
    }

    /// Drop an optional parameter so the builder default applies
    pub fn clear_param_input(&mut self, key: &str) {
        self.param_inputs.insert(key.to_string(), String::new());
        self.input_errors.remove(key);
        self.descriptor.params.remove(key);
    }

    /// Rebuild the editor texts from the descriptor values
    pub fn sync_inputs(&mut self) {
        self.input_errors.clear();
        self.param_inputs = self
            .descriptor
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), crate::geometry::format_value(v)))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ShapeParams;

    fn state() -> AppState {
        AppState::new(AppSettings::default(), ShapeDescriptor::default())
    }

    #[test]
    fn test_expression_input_sets_value() {
        let mut s = state();
        assert!(s.set_param_input("a", "2*3"));
        assert_eq!(s.descriptor.params.get("a"), Some(6.0));
        assert!(!s.set_param_input("a", "6"));
        assert!(s.input_errors.is_empty());
    }

    #[test]
    fn test_bad_expression_keeps_value() {
        let mut s = state();
        assert!(!s.set_param_input("a", "2*"));
        assert_eq!(s.descriptor.params.get("a"), Some(4.0));
        assert!(s.input_errors.contains_key("a"));
        assert_eq!(s.param_inputs["a"], "2*");
    }

    #[test]
    fn test_select_shape_loads_defaults() {
        let mut s = state();
        s.select_shape(ShapeKind::Rhomboid);
        assert_eq!(s.descriptor.shape, "rhomboid");
        assert_eq!(s.param_inputs["ang"], "60");
        assert_eq!(s.param_inputs.len(), 3);
    }

    #[test]
    fn test_clear_optional_param() {
        let mut s = state();
        s.select_shape(ShapeKind::Rhomboid);
        s.clear_param_input("ang");
        assert_eq!(s.descriptor.params.get("ang"), None);
        assert_eq!(s.param_inputs["ang"], "");
    }

    #[test]
    fn test_reset_params() {
        let mut s = state();
        s.set_param_input("a", "10");
        s.reset_params();
        assert_eq!(s.descriptor.params.get("a"), Some(4.0));
        assert_eq!(s.param_inputs["a"], "4");
    }

    #[test]
    fn test_inputs_keep_full_precision() {
        let desc = ShapeDescriptor::new("cube", ShapeParams::new().with("a", 2.345));
        let s = AppState::new(AppSettings::default(), desc);
        assert_eq!(s.param_inputs["a"], "2.345");
    }
}
