// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use super::debounce::{Debouncer, MutationKey};
use super::notify::Notifier;
use crate::api::{
    Ack, ActiveRangeReply, Api, BackgroundReply, BackgroundStatus, CaptureReply, ModeReply,
    PickReply, ProfilesReply, SmartStatus, ToggleReply,
};
use crate::config::Config;
use crate::constants::{DEFAULT_BLUR_AMOUNT, SOLID_COLOR_PRESETS};
use crate::errors::AppResult;
use crate::model::{
    ColorRange, ColorRangeSet, Effect, HsvBound, LoadedProfile, Mode, ProfileBook, Rgb, SmartType,
};
use std::path::PathBuf;

/// Running state of the server's effect loop
///
/// Independent of the mode, except that a mode change forces it off.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    running: bool,
    /// A `/toggle` request is in flight
    pub toggling: bool,
}

impl RunState {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Force the stopped state; returns whether it was running
    pub fn force_stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Label of the start/stop control
    pub fn toggle_label(&self) -> &'static str {
        if self.running { "Stop" } else { "Start" }
    }

    /// Label of the status badge
    pub fn badge(&self) -> &'static str {
        if self.running { "Active" } else { "Standby" }
    }
}

/// Mode/panel state machine
///
/// Exactly one top-level panel is visible: the one matching `mode`. Inside
/// the smart panel exactly one sub-panel is visible: the one matching
/// `smart_type`.
#[derive(Debug, Clone, Default)]
pub struct ModeState {
    mode: Mode,
    smart_type: SmartType,
    /// Reported by the server; `None` until known
    pub segmentation_available: Option<bool>,
}

impl ModeState {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn smart_type(&self) -> SmartType {
        self.smart_type
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub(crate) fn set_smart_type(&mut self, smart_type: SmartType) {
        self.smart_type = smart_type;
    }

    pub fn is_panel_visible(&self, panel: Mode) -> bool {
        self.mode == panel
    }

    pub fn is_smart_panel_visible(&self, panel: SmartType) -> bool {
        self.mode == Mode::Smart && self.smart_type == panel
    }

    /// Visibility of the three top-level panels, in [`Mode::ALL`] order
    pub fn panels(&self) -> [(Mode, bool); 3] {
        Mode::ALL.map(|m| (m, self.is_panel_visible(m)))
    }
}

/// One rendered color-range chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeChip {
    pub index: usize,
    pub swatch: Rgb,
    pub active: bool,
    /// Delete affordance; absent when only one slot exists
    pub deletable: bool,
}

/// The cached slot set and its rendered chips
#[derive(Debug, Clone, Default)]
pub struct SlotState {
    set: ColorRangeSet,
    chips: Vec<RangeChip>,
    /// Incremented on every full chip regeneration
    revision: u64,
}

impl SlotState {
    pub fn new(set: ColorRangeSet) -> Self {
        let mut state = Self {
            set,
            chips: Vec::new(),
            revision: 0,
        };
        state.render();
        state
    }

    pub fn set(&self) -> &ColorRangeSet {
        &self.set
    }

    pub fn chips(&self) -> &[RangeChip] {
        &self.chips
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn active_idx(&self) -> usize {
        self.set.active_idx()
    }

    /// Replace the whole set and regenerate every chip
    pub(crate) fn replace(&mut self, set: ColorRangeSet) {
        self.set = set;
        self.render();
    }

    fn render(&mut self) {
        let deletable = self.set.can_delete();
        let active = self.set.active_idx();
        self.chips = self
            .set
            .iter()
            .enumerate()
            .map(|(index, range)| RangeChip {
                index,
                swatch: range.swatch(),
                active: index == active,
                deletable,
            })
            .collect();
        self.revision += 1;
    }

    /// Move the active marker in place
    pub(crate) fn patch_active(&mut self, idx: usize) -> bool {
        if !self.set.set_active(idx) {
            return false;
        }
        for chip in &mut self.chips {
            chip.active = chip.index == idx;
        }
        true
    }

    /// Update one slot's bounds and swatch in place
    pub(crate) fn patch_range(&mut self, idx: usize, range: ColorRange) -> bool {
        if !self.set.replace(idx, range) {
            return false;
        }
        if let Some(chip) = self.chips.get_mut(idx) {
            chip.swatch = range.swatch();
        }
        true
    }
}

/// Ordering guard for requests that rewrite the slot set
///
/// Each request takes a generation; only the newest response is applied.
/// When the last overlapping request finishes and something was dropped, the
/// set is re-fetched.
#[derive(Debug, Clone, Default)]
pub struct RangeSync {
    generation: u64,
    in_flight: usize,
    dropped_stale: bool,
}

/// Outcome of finishing a slot request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// The response is the newest and may be applied
    pub current: bool,
    /// All requests are done and a stale response was dropped
    pub needs_resync: bool,
}

impl RangeSync {
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.in_flight += 1;
        self.generation
    }

    pub fn finish(&mut self, generation: u64) -> SyncOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        let current = generation == self.generation;
        if !current {
            self.dropped_stale = true;
        }
        let needs_resync = self.in_flight == 0 && self.dropped_stale;
        if needs_resync {
            self.dropped_stale = false;
        }
        SyncOutcome {
            current,
            needs_resync,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}

/// Which panel a background selection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTarget {
    /// Virtual background panel
    Virtual,
    /// Scene sub-panel of smart mode
    Smart,
}

/// Background selection and smart-mode settings
#[derive(Debug, Clone)]
pub struct BackgroundState {
    /// `/capture_background` in flight
    pub capturing: bool,
    pub virtual_scene: Option<String>,
    pub virtual_label: Option<String>,
    pub smart_scene: Option<String>,
    pub smart_label: Option<String>,
    pub blur_amount: u32,
    pub solid_color: Rgb,
    /// Index into [`SOLID_COLOR_PRESETS`] when a preset is selected
    pub solid_preset: Option<usize>,
}

impl Default for BackgroundState {
    fn default() -> Self {
        let (_, r, g, b) = SOLID_COLOR_PRESETS[0];
        Self {
            capturing: false,
            virtual_scene: None,
            virtual_label: None,
            smart_scene: None,
            smart_label: None,
            blur_amount: DEFAULT_BLUR_AMOUNT,
            solid_color: Rgb::new(r, g, b),
            solid_preset: Some(0),
        }
    }
}

impl BackgroundState {
    /// Name shown next to the solid color control
    pub fn solid_label(&self) -> String {
        match self.solid_preset.and_then(|i| SOLID_COLOR_PRESETS.get(i)) {
            Some((label, ..)) => (*label).to_string(),
            None => self.solid_color.to_hex(),
        }
    }

    pub(crate) fn select_scene(&mut self, target: SceneTarget, scene: Option<String>) {
        match target {
            SceneTarget::Virtual => self.virtual_scene = scene,
            SceneTarget::Smart => self.smart_scene = scene,
        }
    }

    pub(crate) fn set_label(&mut self, target: SceneTarget, label: String) {
        match target {
            SceneTarget::Virtual => self.virtual_label = Some(label),
            SceneTarget::Smart => self.smart_label = Some(label),
        }
    }
}

/// Preset list and the name input
#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub book: ProfileBook,
    pub name_input: String,
    /// The list has been fetched at least once
    pub loaded: bool,
}

impl ProfileState {
    pub const EMPTY_PLACEHOLDER: &'static str = "No presets saved.";
}

/// Rendered bounding box of the video frame, in pointer coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A pointer click to sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClick {
    pub client_x: f64,
    pub client_y: f64,
    pub frame: FrameRect,
}

/// The controller: all view state that must agree with the server
pub struct AppModel {
    /// Configuration the controller was started with
    pub config: Config,
    /// Typed server client
    pub(crate) api: Api,
    /// Mode / smart sub-type / panel visibility
    pub mode: ModeState,
    /// Start/stop state
    pub run: RunState,
    /// Cached color-range slots and chips
    pub slots: SlotState,
    /// Slider values; always the bounds of the active slot being edited
    pub sliders: ColorRange,
    /// Ordering guard for slot requests
    pub range_sync: RangeSync,
    /// Background and smart-mode settings
    pub background: BackgroundState,
    /// Selected frame effect
    pub effect: Effect,
    /// Color sampling sensitivity, read at click time
    pub sensitivity: u8,
    /// Saved presets
    pub profiles: ProfileState,
    /// Transient notification
    pub notifier: Notifier,
    /// Pending trailing-edge writes
    pub(crate) debouncer: Debouncer<MutationKey>,
}

/// Messages which drive the controller
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Startup / sync =====
    /// Fetch all server state
    Sync,
    /// Color ranges fetched
    RangesFetched {
        generation: u64,
        result: AppResult<ColorRangeSet>,
    },
    /// Preset list fetched
    ProfilesFetched(AppResult<ProfileBook>),
    /// Mode / virtual background status fetched
    BackgroundStatusFetched(AppResult<BackgroundStatus>),
    /// Smart-mode settings fetched
    SmartStatusFetched(AppResult<SmartStatus>),

    // ===== Mode =====
    /// Switch top-level mode
    SelectMode(Mode),
    ModeApplied(AppResult<ModeReply>),
    /// Switch smart-mode sub-type
    SelectSmartType(SmartType),
    SmartTypeApplied(AppResult<Ack>),
    /// Blur slider moved
    SetBlurAmount(u32),
    BlurAmountApplied(AppResult<Ack>),
    /// Solid color preset clicked (sent immediately)
    SelectSolidPreset(usize),
    /// Free-form solid color edited (debounced)
    SetSolidColor(Rgb),
    SolidColorApplied(AppResult<Ack>),

    // ===== Background =====
    CaptureBackground,
    BackgroundCaptured(AppResult<CaptureReply>),
    /// Built-in scene tile clicked
    SelectScene {
        target: SceneTarget,
        scene: String,
    },
    SceneApplied {
        target: SceneTarget,
        result: AppResult<BackgroundReply>,
    },
    /// Upload a local image as background
    UploadBackground {
        target: SceneTarget,
        path: PathBuf,
    },
    BackgroundUploaded {
        target: SceneTarget,
        result: AppResult<BackgroundReply>,
    },

    // ===== Run state and effect =====
    ToggleRunning,
    Toggled(AppResult<ToggleReply>),
    SetEffect(Effect),
    EffectApplied(AppResult<Ack>),

    // ===== Color ranges =====
    /// One HSV slider moved (active slot)
    SetHsvBound(HsvBound, u8),
    HsvApplied {
        idx: usize,
        range: ColorRange,
        /// Chip revision the write was issued against
        revision: u64,
        result: AppResult<Ack>,
    },
    SelectRange(usize),
    RangeSelected {
        generation: u64,
        result: AppResult<ActiveRangeReply>,
    },
    AddRange,
    RangeAdded {
        generation: u64,
        result: AppResult<ColorRangeSet>,
    },
    DeleteRange(usize),
    RangeDeleted {
        generation: u64,
        result: AppResult<ColorRangeSet>,
    },

    // ===== Color sampler =====
    SetSensitivity(u8),
    PickColor(FrameClick),
    ColorPicked(AppResult<PickReply>),

    // ===== Profiles =====
    SetProfileName(String),
    SaveProfile,
    ProfileSaved {
        name: String,
        result: AppResult<ProfilesReply>,
    },
    LoadProfile(String),
    ProfileLoaded {
        name: String,
        generation: u64,
        result: AppResult<LoadedProfile>,
    },
    DeleteProfile(String),
    ProfileDeleted {
        name: String,
        result: AppResult<ProfilesReply>,
    },

    // ===== Timers =====
    /// A debounce window elapsed
    Debounced { key: MutationKey, generation: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Hsv;

    fn set(len: usize, active: usize) -> ColorRangeSet {
        let ranges = (0..len)
            .map(|i| ColorRange::new(Hsv::new(i as u8 * 10, 100, 100), Hsv::new(i as u8 * 10 + 5, 200, 200)))
            .collect();
        ColorRangeSet::from_parts(ranges, active)
    }

    #[test]
    fn test_mode_panels_mutually_exclusive() {
        let mut state = ModeState::default();
        for mode in Mode::ALL {
            state.set_mode(mode);
            let visible: Vec<Mode> = state
                .panels()
                .iter()
                .filter(|(_, v)| *v)
                .map(|(m, _)| *m)
                .collect();
            assert_eq!(visible, vec![mode]);
        }
    }

    #[test]
    fn test_smart_subpanels_hidden_outside_smart() {
        let mut state = ModeState::default();
        state.set_smart_type(SmartType::Solid);
        assert!(!state.is_smart_panel_visible(SmartType::Solid));
        state.set_mode(Mode::Smart);
        assert!(state.is_smart_panel_visible(SmartType::Solid));
        assert!(!state.is_smart_panel_visible(SmartType::Blur));
    }

    #[test]
    fn test_run_state_labels() {
        let mut run = RunState::default();
        assert_eq!((run.toggle_label(), run.badge()), ("Start", "Standby"));
        run.set_running(true);
        assert_eq!((run.toggle_label(), run.badge()), ("Stop", "Active"));
        assert!(run.force_stop());
        assert!(!run.force_stop());
    }

    #[test]
    fn test_single_slot_has_no_delete_affordance() {
        let slots = SlotState::new(set(1, 0));
        assert_eq!(slots.chips().len(), 1);
        assert!(!slots.chips()[0].deletable);

        let slots = SlotState::new(set(3, 1));
        assert!(slots.chips().iter().all(|c| c.deletable));
        assert!(slots.chips()[1].active);
    }

    #[test]
    fn test_patch_active_keeps_revision() {
        let mut slots = SlotState::new(set(3, 0));
        let revision = slots.revision();
        assert!(slots.patch_active(2));
        assert!(!slots.patch_active(5));
        assert_eq!(slots.revision(), revision);
        let active: Vec<bool> = slots.chips().iter().map(|c| c.active).collect();
        assert_eq!(active, vec![false, false, true]);

        slots.replace(set(2, 0));
        assert_eq!(slots.revision(), revision + 1);
    }

    #[test]
    fn test_range_sync_drops_stale_and_requests_resync() {
        let mut sync = RangeSync::default();
        let first = sync.begin();
        let second = sync.begin();

        let outcome = sync.finish(first);
        assert!(!outcome.current);
        assert!(!outcome.needs_resync);

        let outcome = sync.finish(second);
        assert!(outcome.current);
        assert!(outcome.needs_resync);
        assert!(!sync.is_busy());

        let third = sync.begin();
        assert_eq!(
            sync.finish(third),
            SyncOutcome {
                current: true,
                needs_resync: false
            }
        );
    }
}
