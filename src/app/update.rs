// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The `update()` function routes every message to a handler method. Handlers
//! live in the `handlers` submodules, grouped by functional domain:
//!
//! - `handlers::system`: startup sync, status fetches
//! - `handlers::mode`: top-level mode, smart sub-type, blur amount, solid color
//! - `handlers::ranges`: HSV sliders and slot add/select/delete
//! - `handlers::sampler`: click-to-pick color
//! - `handlers::profiles`: preset list/save/load/delete
//! - `handlers::background`: capture, built-in scenes, uploads
//! - `handlers::run`: start/stop and frame effect

use super::debounce::MutationKey;
use super::task::Task;
use crate::app::state::{AppModel, Message};
use tracing::trace;

impl AppModel {
    /// Main message handler
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // ===== Startup / sync =====
            Message::Sync => self.handle_sync(),
            Message::RangesFetched { generation, result } => {
                self.handle_ranges_fetched(generation, result)
            }
            Message::ProfilesFetched(result) => self.handle_profiles_fetched(result),
            Message::BackgroundStatusFetched(result) => self.handle_background_status(result),
            Message::SmartStatusFetched(result) => self.handle_smart_status(result),

            // ===== Mode =====
            Message::SelectMode(mode) => self.handle_select_mode(mode),
            Message::ModeApplied(result) => self.handle_mode_applied(result),
            Message::SelectSmartType(smart_type) => self.handle_select_smart_type(smart_type),
            Message::SmartTypeApplied(result) => self.handle_smart_write_result(result),
            Message::SetBlurAmount(amount) => self.handle_set_blur_amount(amount),
            Message::BlurAmountApplied(result) => self.handle_smart_write_result(result),
            Message::SelectSolidPreset(index) => self.handle_select_solid_preset(index),
            Message::SetSolidColor(color) => self.handle_set_solid_color(color),
            Message::SolidColorApplied(result) => self.handle_smart_write_result(result),

            // ===== Background =====
            Message::CaptureBackground => self.handle_capture_background(),
            Message::BackgroundCaptured(result) => self.handle_background_captured(result),
            Message::SelectScene { target, scene } => self.handle_select_scene(target, scene),
            Message::SceneApplied { target, result } => self.handle_scene_applied(target, result),
            Message::UploadBackground { target, path } => {
                self.handle_upload_background(target, path)
            }
            Message::BackgroundUploaded { target, result } => {
                self.handle_background_uploaded(target, result)
            }

            // ===== Run state and effect =====
            Message::ToggleRunning => self.handle_toggle_running(),
            Message::Toggled(result) => self.handle_toggled(result),
            Message::SetEffect(effect) => self.handle_set_effect(effect),
            Message::EffectApplied(result) => self.handle_effect_applied(result),

            // ===== Color ranges =====
            Message::SetHsvBound(bound, value) => self.handle_set_hsv_bound(bound, value),
            Message::HsvApplied {
                idx,
                range,
                revision,
                result,
            } => self.handle_hsv_applied(idx, range, revision, result),
            Message::SelectRange(idx) => self.handle_select_range(idx),
            Message::RangeSelected { generation, result } => {
                self.handle_range_selected(generation, result)
            }
            Message::AddRange => self.handle_add_range(),
            Message::RangeAdded { generation, result } => {
                self.handle_range_added(generation, result)
            }
            Message::DeleteRange(idx) => self.handle_delete_range(idx),
            Message::RangeDeleted { generation, result } => {
                self.handle_range_deleted(generation, result)
            }

            // ===== Color sampler =====
            Message::SetSensitivity(value) => self.handle_set_sensitivity(value),
            Message::PickColor(click) => self.handle_pick_color(click),
            Message::ColorPicked(result) => self.handle_color_picked(result),

            // ===== Profiles =====
            Message::SetProfileName(name) => {
                self.profiles.name_input = name;
                Task::none()
            }
            Message::SaveProfile => self.handle_save_profile(),
            Message::ProfileSaved { name, result } => self.handle_profile_saved(name, result),
            Message::LoadProfile(name) => self.handle_load_profile(name),
            Message::ProfileLoaded {
                name,
                generation,
                result,
            } => self.handle_profile_loaded(name, generation, result),
            Message::DeleteProfile(name) => self.handle_delete_profile(name),
            Message::ProfileDeleted { name, result } => self.handle_profile_deleted(name, result),

            // ===== Timers =====
            Message::Debounced { key, generation } => {
                if !self.debouncer.fire(key, generation) {
                    trace!(?key, generation, "Superseded debounce timer");
                    return Task::none();
                }
                match key {
                    MutationKey::Hsv => self.handle_hsv_timer(),
                    MutationKey::BlurAmount => self.write_blur_amount(),
                    MutationKey::SolidColor => self.write_solid_color(),
                }
            }
        }
    }
}
