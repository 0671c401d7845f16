// SPDX-License-Identifier: MPL-2.0

//! Operating mode, smart background sub-type and frame effect

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level background replacement strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// HSV cloak replaced by the captured background
    #[default]
    Invisible,
    /// HSV cloak replaced by a virtual scene
    Virtual,
    /// Person segmentation, background blurred or replaced
    Smart,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Invisible, Mode::Virtual, Mode::Smart];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Invisible => "invisible",
            Mode::Virtual => "virtual",
            Mode::Smart => "smart",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Invisible => "Cloak",
            Mode::Virtual => "Virtual BG",
            Mode::Smart => "Smart BG",
        }
    }
}

/// Background used by smart mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmartType {
    #[default]
    Blur,
    /// Virtual scene behind the person
    Virtual,
    /// Solid fill color
    Solid,
}

impl SmartType {
    pub const ALL: [SmartType; 3] = [SmartType::Blur, SmartType::Virtual, SmartType::Solid];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            SmartType::Blur => "blur",
            SmartType::Virtual => "virtual",
            SmartType::Solid => "solid",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SmartType::Blur => "Blur",
            SmartType::Virtual => "Scene",
            SmartType::Solid => "Color",
        }
    }
}

/// Post-processing effect applied to the composited frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    #[default]
    None,
    Pixelate,
    Blur,
    Cartoon,
}

impl Effect {
    pub const ALL: [Effect; 4] = [Effect::None, Effect::Pixelate, Effect::Blur, Effect::Cartoon];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::None => "none",
            Effect::Pixelate => "pixelate",
            Effect::Blur => "blur",
            Effect::Cartoon => "cartoon",
        }
    }

    /// Resolve a stored effect name; unknown names fall back to `None`
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Next effect in display order (wraps)
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|e| *e == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

macro_rules! impl_wire_name {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str() == wanted)
                    .ok_or_else(|| format!("unknown {}: {}", $what, s))
            }
        }
    };
}

impl_wire_name!(Mode, "mode");
impl_wire_name!(SmartType, "smart background type");
impl_wire_name!(Effect, "effect");
