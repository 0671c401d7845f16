// SPDX-License-Identifier: MPL-2.0

//! Color values and HSV detection ranges
//!
//! Hue uses the OpenCV half-degree scale (0-179); saturation and value are 0-255.

use crate::constants::{HUE_MAX, SV_MAX};
use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A color in HSV space, serialized as `[h, s, v]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Convert to RGB for display
    pub fn to_rgb(self) -> Rgb {
        let hue = f32::from(self.h) * 2.0;
        let s = f32::from(self.s) / 255.0;
        let v = f32::from(self.v) / 255.0;

        let c = v * s;
        let sector = (hue / 60.0) % 6.0;
        let x = c * (1.0 - ((sector % 2.0) - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match sector as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let to_byte = |channel: f32| ((channel + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(to_byte(r), to_byte(g), to_byte(b))
    }
}

impl From<[u8; 3]> for Hsv {
    fn from([h, s, v]: [u8; 3]) -> Self {
        Self { h, s, v }
    }
}

impl From<Hsv> for [u8; 3] {
    fn from(hsv: Hsv) -> Self {
        [hsv.h, hsv.s, hsv.v]
    }
}

impl fmt::Display for Hsv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.h, self.s, self.v)
    }
}

/// An 8-bit RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn from_hex(value: &str) -> Result<Self, ValidationError> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ValidationError::InvalidColor(value.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| ValidationError::InvalidColor(value.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Format as `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Inclusive HSV bounds classifying a pixel as cloak color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorRange {
    pub hsv_min: Hsv,
    pub hsv_max: Hsv,
}

impl Default for ColorRange {
    fn default() -> Self {
        Self::full()
    }
}

impl ColorRange {
    pub const fn new(hsv_min: Hsv, hsv_max: Hsv) -> Self {
        Self { hsv_min, hsv_max }
    }

    /// The range a freshly added slot starts with
    pub const fn full() -> Self {
        Self {
            hsv_min: Hsv::new(0, 0, 0),
            hsv_max: Hsv::new(HUE_MAX, SV_MAX, SV_MAX),
        }
    }

    /// Componentwise midpoint of the bounds
    pub fn midpoint(&self) -> Hsv {
        let mid = |a: u8, b: u8| ((u16::from(a) + u16::from(b)) / 2) as u8;
        Hsv::new(
            mid(self.hsv_min.h, self.hsv_max.h),
            mid(self.hsv_min.s, self.hsv_max.s),
            mid(self.hsv_min.v, self.hsv_max.v),
        )
    }

    /// Swatch color shown on the slot chip
    pub fn swatch(&self) -> Rgb {
        self.midpoint().to_rgb()
    }

    /// Whether `min <= max` holds for every component
    pub fn is_ordered(&self) -> bool {
        self.hsv_min.h <= self.hsv_max.h
            && self.hsv_min.s <= self.hsv_max.s
            && self.hsv_min.v <= self.hsv_max.v
    }

    pub fn get(&self, bound: HsvBound) -> u8 {
        match bound {
            HsvBound::HMin => self.hsv_min.h,
            HsvBound::HMax => self.hsv_max.h,
            HsvBound::SMin => self.hsv_min.s,
            HsvBound::SMax => self.hsv_max.s,
            HsvBound::VMin => self.hsv_min.v,
            HsvBound::VMax => self.hsv_max.v,
        }
    }

    /// Set one bound, clamped to its slider maximum
    pub fn set(&mut self, bound: HsvBound, value: u8) {
        let value = value.min(bound.max());
        match bound {
            HsvBound::HMin => self.hsv_min.h = value,
            HsvBound::HMax => self.hsv_max.h = value,
            HsvBound::SMin => self.hsv_min.s = value,
            HsvBound::SMax => self.hsv_max.s = value,
            HsvBound::VMin => self.hsv_min.v = value,
            HsvBound::VMax => self.hsv_max.v = value,
        }
    }
}

/// One of the six HSV sliders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HsvBound {
    HMin,
    HMax,
    SMin,
    SMax,
    VMin,
    VMax,
}

impl HsvBound {
    /// Slider order as presented to the operator
    pub const ALL: [HsvBound; 6] = [
        HsvBound::HMin,
        HsvBound::HMax,
        HsvBound::SMin,
        HsvBound::SMax,
        HsvBound::VMin,
        HsvBound::VMax,
    ];

    /// Wire field name
    pub fn key(&self) -> &'static str {
        match self {
            HsvBound::HMin => "h_min",
            HsvBound::HMax => "h_max",
            HsvBound::SMin => "s_min",
            HsvBound::SMax => "s_max",
            HsvBound::VMin => "v_min",
            HsvBound::VMax => "v_max",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HsvBound::HMin => "Hue min",
            HsvBound::HMax => "Hue max",
            HsvBound::SMin => "Sat min",
            HsvBound::SMax => "Sat max",
            HsvBound::VMin => "Val min",
            HsvBound::VMax => "Val max",
        }
    }

    pub fn max(&self) -> u8 {
        match self {
            HsvBound::HMin | HsvBound::HMax => HUE_MAX,
            _ => SV_MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_to_rgb_primaries() {
        assert_eq!(Hsv::new(0, 255, 255).to_rgb(), Rgb::new(255, 0, 0));
        assert_eq!(Hsv::new(60, 255, 255).to_rgb(), Rgb::new(0, 255, 0));
        assert_eq!(Hsv::new(120, 255, 255).to_rgb(), Rgb::new(0, 0, 255));
        assert_eq!(Hsv::new(90, 0, 128).to_rgb(), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_midpoint_and_swatch() {
        let range = ColorRange::new(Hsv::new(40, 140, 160), Hsv::new(80, 220, 240));
        assert_eq!(range.midpoint(), Hsv::new(60, 180, 200));
        assert_eq!(range.swatch(), Hsv::new(60, 180, 200).to_rgb());
    }

    #[test]
    fn test_set_clamps_hue() {
        let mut range = ColorRange::full();
        range.set(HsvBound::HMax, 250);
        assert_eq!(range.get(HsvBound::HMax), HUE_MAX);
        range.set(HsvBound::SMin, 250);
        assert_eq!(range.get(HsvBound::SMin), 250);
        assert!(!range.is_ordered());
    }

    #[test]
    fn test_hsv_wire_format() {
        let range: ColorRange =
            serde_json::from_str(r#"{"hsv_min":[1,2,3],"hsv_max":[4,5,6]}"#).unwrap();
        assert_eq!(range.hsv_min, Hsv::new(1, 2, 3));
        assert_eq!(
            serde_json::to_value(range.hsv_max).unwrap(),
            serde_json::json!([4, 5, 6])
        );
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(Rgb::from_hex("#00b140").unwrap(), Rgb::new(0, 177, 64));
        assert_eq!(Rgb::new(255, 16, 0).to_hex(), "#ff1000");
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("zzzzzz").is_err());
    }
}
