// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Server endpoints
pub mod endpoints {
    pub const SET_HSV: &str = "/set_hsv";
    pub const CAPTURE_BACKGROUND: &str = "/capture_background";
    pub const SET_BG_MODE: &str = "/set_bg_mode";
    pub const SET_BUILTIN_BG: &str = "/set_builtin_bg";
    pub const UPLOAD_BG: &str = "/upload_bg";
    pub const SET_SMART_BG_TYPE: &str = "/set_smart_bg_type";
    pub const SET_SOLID_COLOR: &str = "/set_solid_color";
    pub const TOGGLE: &str = "/toggle";
    pub const SET_EFFECT: &str = "/set_effect";
    pub const PICK_COLOR: &str = "/pick_color";
    pub const COLOR_RANGES: &str = "/color_ranges";
    pub const SET_ACTIVE_RANGE: &str = "/set_active_range";
    pub const ADD_COLOR_RANGE: &str = "/add_color_range";
    pub const DELETE_COLOR_RANGE: &str = "/delete_color_range";
    pub const PROFILES: &str = "/profiles";
    pub const SAVE_PROFILE: &str = "/save_profile";
    pub const LOAD_PROFILE: &str = "/load_profile";
    pub const DELETE_PROFILE: &str = "/delete_profile";
    pub const BG_STATUS: &str = "/bg_status";
    pub const SMART_STATUS: &str = "/smart_status";
}

/// Settling window for HSV bound edits
pub const HSV_DEBOUNCE: Duration = Duration::from_millis(200);

/// Settling window for blur amount edits
pub const BLUR_DEBOUNCE: Duration = Duration::from_millis(150);

/// Settling window for free-form solid color edits
pub const SOLID_COLOR_DEBOUNCE: Duration = Duration::from_millis(150);

/// How long a notification stays visible
pub const NOTICE_DURATION: Duration = Duration::from_millis(3000);

/// Largest hue value (OpenCV half-degree scale)
pub const HUE_MAX: u8 = 179;

/// Largest saturation / value
pub const SV_MAX: u8 = 255;

/// Color sampling sensitivity bounds
pub const SENSITIVITY_MIN: u8 = 1;
pub const SENSITIVITY_MAX: u8 = 60;
pub const DEFAULT_SENSITIVITY: u8 = 20;

/// Smart-mode blur kernel bounds
pub const BLUR_MIN: u32 = 3;
pub const BLUR_MAX: u32 = 75;
pub const DEFAULT_BLUR_AMOUNT: u32 = 25;

/// Built-in virtual background scenes (id, display label)
pub const BUILTIN_SCENES: [(&str, &str); 5] = [
    ("beach", "Beach"),
    ("space", "Space"),
    ("forest", "Forest"),
    ("sunset", "Sunset"),
    ("city", "City"),
];

/// Solid background presets (label, r, g, b)
pub const SOLID_COLOR_PRESETS: [(&str, u8, u8, u8); 6] = [
    ("Chroma Green", 0, 177, 64),
    ("Chroma Blue", 0, 71, 187),
    ("White", 255, 255, 255),
    ("Black", 0, 0, 0),
    ("Studio Gray", 128, 128, 128),
    ("Warm Beige", 222, 196, 160),
];

/// Look up the display label of a built-in scene
pub fn scene_label(id: &str) -> Option<&'static str> {
    BUILTIN_SCENES
        .iter()
        .find(|(scene_id, _)| *scene_id == id)
        .map(|(_, label)| *label)
}
