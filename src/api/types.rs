// SPDX-License-Identifier: MPL-2.0

//! Reply bodies of the effects server

use crate::model::{ColorRange, Hsv, Mode, ProfileBook, Rgb, SmartType};
use serde::Deserialize;

/// Reply that carries nothing beyond `status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Ack {}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaptureReply {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModeReply {
    #[serde(default)]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub mediapipe_available: Option<bool>,
}

/// Reply of `/set_builtin_bg` and `/upload_bg`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackgroundReply {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ToggleReply {
    pub running: bool,
}

/// Reply of `/pick_color`: measured color plus the derived range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PickReply {
    pub hsv: Hsv,
    pub h_min: u8,
    pub h_max: u8,
    pub s_min: u8,
    pub s_max: u8,
    pub v_min: u8,
    pub v_max: u8,
}

impl PickReply {
    pub fn range(&self) -> ColorRange {
        ColorRange::new(
            Hsv::new(self.h_min, self.s_min, self.v_min),
            Hsv::new(self.h_max, self.s_max, self.v_max),
        )
    }
}

/// Reply of `/set_active_range`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ActiveRangeReply {
    pub active_idx: usize,
    pub hsv_min: Hsv,
    pub hsv_max: Hsv,
}

impl ActiveRangeReply {
    pub fn range(&self) -> ColorRange {
        ColorRange::new(self.hsv_min, self.hsv_max)
    }
}

/// Reply of `/save_profile` and `/delete_profile`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfilesReply {
    #[serde(default)]
    pub profiles: ProfileBook,
}

/// Reply of `GET /bg_status`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackgroundStatus {
    pub bg_mode: Mode,
    #[serde(default)]
    pub virtual_bg_name: Option<String>,
    #[serde(default)]
    pub has_virtual_bg: bool,
}

/// Reply of `GET /smart_status`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SmartStatus {
    #[serde(default)]
    pub mediapipe_available: bool,
    #[serde(default)]
    pub smart_bg_type: SmartType,
    pub smart_blur_amount: Option<u32>,
    #[serde(default)]
    pub solid_color_rgb: Option<[u8; 3]>,
    #[serde(default)]
    pub virtual_bg_name: Option<String>,
}

impl SmartStatus {
    pub fn solid_color(&self) -> Option<Rgb> {
        self.solid_color_rgb.map(Rgb::from)
    }
}
