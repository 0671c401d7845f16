// SPDX-License-Identifier: MPL-2.0

//! Saved presets
//!
//! Presets come in two shapes. Newer ones carry the full slot list
//! (`color_ranges` + `active_idx`), older ones a single `hsv_min`/`hsv_max`
//! pair. Both are resolved here, at the decoding boundary, into
//! [`ProfileRanges`] and normalized to a [`ColorRangeSet`].

use super::color::{ColorRange, Hsv};
use super::mode::Effect;
use super::ranges::ColorRangeSet;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ProfileRangesWire {
    Multi {
        #[serde(alias = "ranges")]
        color_ranges: Vec<ColorRange>,
        #[serde(default)]
        active_idx: usize,
    },
    Legacy {
        hsv_min: Hsv,
        hsv_max: Hsv,
    },
}

/// Color ranges stored in a preset
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ProfileRangesWire")]
pub enum ProfileRanges {
    /// Full slot list
    MultiRange(ColorRangeSet),
    /// Single pair from presets saved before multi-color support
    LegacyRange(ColorRange),
}

impl TryFrom<ProfileRangesWire> for ProfileRanges {
    type Error = String;

    fn try_from(wire: ProfileRangesWire) -> Result<Self, Self::Error> {
        match wire {
            ProfileRangesWire::Multi {
                color_ranges,
                active_idx,
            } => {
                if color_ranges.is_empty() {
                    return Err("preset has an empty color range list".to_string());
                }
                Ok(ProfileRanges::MultiRange(ColorRangeSet::from_parts(
                    color_ranges,
                    active_idx,
                )))
            }
            ProfileRangesWire::Legacy { hsv_min, hsv_max } => {
                Ok(ProfileRanges::LegacyRange(ColorRange::new(hsv_min, hsv_max)))
            }
        }
    }
}

impl ProfileRanges {
    /// Normalize to the internal slot representation
    pub fn into_set(self) -> ColorRangeSet {
        match self {
            ProfileRanges::MultiRange(set) => set,
            ProfileRanges::LegacyRange(range) => ColorRangeSet::single(range),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, ProfileRanges::LegacyRange(_))
    }

    pub fn slot_count(&self) -> usize {
        match self {
            ProfileRanges::MultiRange(set) => set.len(),
            ProfileRanges::LegacyRange(_) => 1,
        }
    }
}

fn effect_of(value: &Value) -> Effect {
    value
        .get("effect")
        .and_then(Value::as_str)
        .map(Effect::from_name)
        .unwrap_or_default()
}

/// Reply of `/load_profile`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct LoadedProfile {
    pub ranges: ProfileRanges,
    pub effect: Effect,
}

impl TryFrom<Value> for LoadedProfile {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let effect = effect_of(&value);
        let ranges = ProfileRanges::deserialize(value).map_err(|e| e.to_string())?;
        Ok(Self { ranges, effect })
    }
}

/// One entry of the preset list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    /// `None` when the stored entry could not be decoded; it can still be deleted
    pub ranges: Option<ProfileRanges>,
    pub effect: Effect,
}

impl Profile {
    /// Short description for list rendering
    pub fn summary(&self) -> String {
        match &self.ranges {
            Some(ranges) if ranges.is_legacy() => format!("1 color (legacy), {}", self.effect),
            Some(ranges) => {
                let count = ranges.slot_count();
                let noun = if count == 1 { "color" } else { "colors" };
                format!("{} {}, {}", count, noun, self.effect)
            }
            None => "unreadable".to_string(),
        }
    }
}

/// Name-keyed presets in the order the server returned them
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct ProfileBook {
    entries: Vec<Profile>,
}

impl From<Map<String, Value>> for ProfileBook {
    fn from(map: Map<String, Value>) -> Self {
        let entries = map
            .into_iter()
            .map(|(name, value)| {
                let effect = effect_of(&value);
                let ranges = match ProfileRanges::deserialize(value) {
                    Ok(ranges) => Some(ranges),
                    Err(e) => {
                        warn!(name = %name, error = %e, "Skipping unreadable preset ranges");
                        None
                    }
                };
                Profile {
                    name,
                    ranges,
                    effect,
                }
            })
            .collect();
        Self { entries }
    }
}

impl ProfileBook {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|p| p.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.entries.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_load_normalizes_to_single_slot() {
        let loaded: LoadedProfile = serde_json::from_value(json!({
            "status": "ok",
            "hsv_min": [100, 150, 0],
            "hsv_max": [140, 255, 255],
            "effect": "blur"
        }))
        .unwrap();
        assert!(loaded.ranges.is_legacy());
        assert_eq!(loaded.effect, Effect::Blur);

        let set = loaded.ranges.into_set();
        assert_eq!(
            set,
            ColorRangeSet::single(ColorRange::new(
                Hsv::new(100, 150, 0),
                Hsv::new(140, 255, 255)
            ))
        );
    }

    #[test]
    fn test_multi_load_preferred() {
        let loaded: LoadedProfile = serde_json::from_value(json!({
            "status": "ok",
            "color_ranges": [
                {"hsv_min": [0, 120, 70], "hsv_max": [10, 255, 255]},
                {"hsv_min": [170, 120, 70], "hsv_max": [179, 255, 255]}
            ],
            "active_idx": 1,
            "hsv_min": [0, 0, 0],
            "hsv_max": [1, 1, 1]
        }))
        .unwrap();
        assert!(!loaded.ranges.is_legacy());
        assert_eq!(loaded.effect, Effect::None);
        let set = loaded.ranges.into_set();
        assert_eq!(set.len(), 2);
        assert_eq!(set.active_idx(), 1);
    }

    #[test]
    fn test_empty_multi_list_rejected() {
        let result: Result<LoadedProfile, _> = serde_json::from_value(json!({
            "status": "ok",
            "color_ranges": [],
            "active_idx": 0
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_book_keeps_server_order_and_tolerates_bad_entries() {
        let book: ProfileBook = serde_json::from_value(json!({
            "zebra": {"hsv_min": [0, 0, 0], "hsv_max": [10, 10, 10], "effect": "none"},
            "apple": {"color_ranges": [{"hsv_min": [1, 1, 1], "hsv_max": [2, 2, 2]}]},
            "broken": {"effect": "cartoon"}
        }))
        .unwrap();
        let names: Vec<&str> = book.names().collect();
        assert_eq!(names, vec!["zebra", "apple", "broken"]);
        assert_eq!(book.get("broken").unwrap().ranges, None);
        assert_eq!(book.get("broken").unwrap().effect, Effect::Cartoon);
        assert_eq!(book.get("apple").unwrap().summary(), "1 color, none");
    }
}
