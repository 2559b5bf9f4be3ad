// Widget dimensions and thresholds, optionally overridden from localStorage
use serde::{Deserialize, Serialize};

use crate::model::{
    CONTAINER_DIAMETER, CORNER_OFFSET, DEAD_ZONE, DRAG_HOLD_MS, GRIP_DIAMETER, HANDLE_DIAMETER,
};
use crate::util::{clog, cwarn};

pub const STORAGE_KEY: &str = "ct_joystick_config";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoystickConfig {
    pub container_diameter: f64,
    pub handle_diameter: f64,
    pub dead_zone: f64,
    pub drag_hold_ms: u32,
    pub corner_offset: f64,
    pub grip_diameter: f64,
    /// Log every key transition and drag-mode change to the console.
    pub debug_log: bool,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            container_diameter: CONTAINER_DIAMETER,
            handle_diameter: HANDLE_DIAMETER,
            dead_zone: DEAD_ZONE,
            drag_hold_ms: DRAG_HOLD_MS,
            corner_offset: CORNER_OFFSET,
            grip_diameter: GRIP_DIAMETER,
            debug_log: false,
        }
    }
}

impl JoystickConfig {
    pub fn radius(&self) -> f64 {
        self.container_diameter / 2.0
    }

    /// Parses an override; `None` if the JSON is malformed or the values are unusable.
    pub fn from_json(raw: &str) -> Option<Self> {
        let cfg: JoystickConfig = serde_json::from_str(raw).ok()?;
        cfg.is_valid().then_some(cfg)
    }

    pub fn is_valid(&self) -> bool {
        let finite = [
            self.container_diameter,
            self.handle_diameter,
            self.dead_zone,
            self.corner_offset,
            self.grip_diameter,
        ]
        .iter()
        .all(|v| v.is_finite());
        finite
            && self.container_diameter > 0.0
            && self.handle_diameter > 0.0
            && self.handle_diameter <= self.container_diameter
            && self.grip_diameter > 0.0
            && self.dead_zone >= 0.0
            && self.dead_zone < self.radius()
            && self.drag_hold_ms > 0
            && i32::try_from(self.drag_hold_ms).is_ok()
    }

    /// Reads the override from localStorage, falling back to the defaults.
    pub fn load() -> Self {
        if let Some(win) = web_sys::window() {
            if let Ok(Some(store)) = win.local_storage() {
                if let Ok(Some(raw)) = store.get_item(STORAGE_KEY) {
                    match Self::from_json(&raw) {
                        Some(cfg) => {
                            clog(&format!("config override from {}", STORAGE_KEY));
                            return cfg;
                        }
                        None => cwarn(&format!("ignoring invalid {}: {}", STORAGE_KEY, raw)),
                    }
                }
            }
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_named_constants() {
        let cfg = JoystickConfig::default();
        assert_eq!(cfg.container_diameter, 100.0);
        assert_eq!(cfg.handle_diameter, 60.0);
        assert_eq!(cfg.dead_zone, 30.0);
        assert_eq!(cfg.drag_hold_ms, 1000);
        assert_eq!(cfg.radius(), 50.0);
        assert!(cfg.is_valid());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = JoystickConfig::from_json(r#"{"dead_zone": 20, "debug_log": true}"#).expect("valid");
        assert_eq!(cfg.dead_zone, 20.0);
        assert!(cfg.debug_log);
        assert_eq!(cfg.container_diameter, 100.0);
        assert_eq!(cfg.drag_hold_ms, 1000);
    }

    #[test]
    fn rejects_malformed_and_unusable_overrides() {
        assert_eq!(JoystickConfig::from_json("not json"), None);
        assert_eq!(JoystickConfig::from_json(r#"{"dead_zone": 50}"#), None);
        assert_eq!(JoystickConfig::from_json(r#"{"dead_zone": -1}"#), None);
        assert_eq!(JoystickConfig::from_json(r#"{"handle_diameter": 120}"#), None);
        assert_eq!(JoystickConfig::from_json(r#"{"container_diameter": 0}"#), None);
        assert_eq!(JoystickConfig::from_json(r#"{"drag_hold_ms": 0}"#), None);
    }

    #[test]
    fn hold_duration_must_fit_a_browser_timeout() {
        // setTimeout takes an i32 delay; larger values would fire at once
        assert_eq!(JoystickConfig::from_json(r#"{"drag_hold_ms": 3000000000}"#), None);
        let max = JoystickConfig::from_json(r#"{"drag_hold_ms": 2147483647}"#).expect("valid");
        assert_eq!(max.drag_hold_ms, i32::MAX as u32);
    }
}
