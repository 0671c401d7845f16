// SPDX-License-Identifier: MPL-2.0

//! Ordered color-range slots with an active pointer
//!
//! The server is authoritative for this collection. The client keeps a cached
//! copy which it replaces wholesale whenever a reply carries the full set.

use super::color::ColorRange;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Wire shape: `{ "ranges": [...], "active_idx": n }`
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RangeSetWire {
    #[serde(default)]
    ranges: Vec<ColorRange>,
    #[serde(default)]
    active_idx: usize,
}

/// Detection color slots
///
/// Invariant: `active_idx < len` whenever the set is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RangeSetWire", into = "RangeSetWire")]
pub struct ColorRangeSet {
    ranges: Vec<ColorRange>,
    active_idx: usize,
}

impl Default for ColorRangeSet {
    fn default() -> Self {
        Self::single(ColorRange::full())
    }
}

impl From<RangeSetWire> for ColorRangeSet {
    fn from(wire: RangeSetWire) -> Self {
        Self::from_parts(wire.ranges, wire.active_idx)
    }
}

impl From<ColorRangeSet> for RangeSetWire {
    fn from(set: ColorRangeSet) -> Self {
        RangeSetWire {
            ranges: set.ranges,
            active_idx: set.active_idx,
        }
    }
}

impl ColorRangeSet {
    /// Build from server data, clamping an out-of-range active index
    pub fn from_parts(ranges: Vec<ColorRange>, active_idx: usize) -> Self {
        let clamped = if ranges.is_empty() {
            0
        } else {
            active_idx.min(ranges.len() - 1)
        };
        if clamped != active_idx {
            warn!(
                active_idx,
                len = ranges.len(),
                "Server sent out-of-range active index, clamping"
            );
        }
        Self {
            ranges,
            active_idx: clamped,
        }
    }

    /// A one-slot set (legacy single-range presets)
    pub fn single(range: ColorRange) -> Self {
        Self {
            ranges: vec![range],
            active_idx: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn active_idx(&self) -> usize {
        self.active_idx
    }

    pub fn active(&self) -> Option<&ColorRange> {
        self.ranges.get(self.active_idx)
    }

    pub fn get(&self, idx: usize) -> Option<&ColorRange> {
        self.ranges.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorRange> {
        self.ranges.iter()
    }

    pub fn contains(&self, idx: usize) -> bool {
        idx < self.ranges.len()
    }

    /// Deletion is only offered while more than one slot exists
    pub fn can_delete(&self) -> bool {
        self.ranges.len() > 1
    }

    /// Make `idx` active; returns false if it does not exist
    pub fn set_active(&mut self, idx: usize) -> bool {
        if self.contains(idx) {
            self.active_idx = idx;
            true
        } else {
            false
        }
    }

    /// Replace the bounds of one slot; returns false if it does not exist
    pub fn replace(&mut self, idx: usize, range: ColorRange) -> bool {
        match self.ranges.get_mut(idx) {
            Some(slot) => {
                *slot = range;
                true
            }
            None => false,
        }
    }
}
