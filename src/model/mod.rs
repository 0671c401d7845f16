// SPDX-License-Identifier: MPL-2.0

//! Domain types shared by the controller, the API client and the front-ends
//!
//! - [`color`]: HSV/RGB values, color ranges and slider bounds
//! - [`ranges`]: the ordered color-range set with its active slot
//! - [`mode`]: operating mode, smart sub-type and frame effect
//! - [`profile`]: saved presets and the legacy/multi-range load union

pub mod color;
pub mod mode;
pub mod profile;
pub mod ranges;

pub use color::{ColorRange, Hsv, HsvBound, Rgb};
pub use mode::{Effect, Mode, SmartType};
pub use profile::{LoadedProfile, Profile, ProfileBook, ProfileRanges};
pub use ranges::ColorRangeSet;
