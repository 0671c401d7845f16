// SPDX-License-Identifier: GPL-3.0-only

//! Preset handlers
//!
//! Nothing is cached across runs: every list, save, load and delete is a
//! round-trip, and the list is always re-rendered from the server's mapping.

use crate::api::ProfilesReply;
use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use crate::errors::{AppError, AppResult, ValidationError};
use crate::model::LoadedProfile;
use tracing::{debug, info, warn};

impl AppModel {
    pub(crate) fn handle_save_profile(&mut self) -> Task<Message> {
        let name = self.profiles.name_input.trim().to_string();
        if name.is_empty() {
            self.notifier
                .error(AppError::from(ValidationError::EmptyProfileName).user_message());
            return Task::none();
        }
        info!(name = %name, "Saving profile");
        let request = self.api.save_profile(&name);
        Task::perform(request, move |result| Message::ProfileSaved { name, result })
    }

    pub(crate) fn handle_profile_saved(
        &mut self,
        name: String,
        result: AppResult<ProfilesReply>,
    ) -> Task<Message> {
        match result {
            Ok(reply) => {
                self.profiles.book = reply.profiles;
                self.profiles.loaded = true;
                self.profiles.name_input.clear();
                self.notifier.info(format!("Profile \"{}\" saved!", name));
            }
            Err(e) => {
                warn!(name = %name, error = %e, "Saving profile failed");
                self.notifier.error(e.user_message());
            }
        }
        Task::none()
    }

    pub(crate) fn handle_load_profile(&mut self, name: String) -> Task<Message> {
        info!(name = %name, "Loading profile");
        let flush = self.flush_hsv_write();
        let generation = self.range_sync.begin();
        let request = self.api.load_profile(&name);
        flush.chain(Task::perform(request, move |result| Message::ProfileLoaded {
            name,
            generation,
            result,
        }))
    }

    pub(crate) fn handle_profile_loaded(
        &mut self,
        name: String,
        generation: u64,
        result: AppResult<LoadedProfile>,
    ) -> Task<Message> {
        let outcome = self.range_sync.finish(generation);
        match result {
            Ok(loaded) => {
                debug!(
                    name = %name,
                    legacy = loaded.ranges.is_legacy(),
                    slots = loaded.ranges.slot_count(),
                    effect = %loaded.effect,
                    "Profile loaded"
                );
                if outcome.current {
                    self.apply_range_set(loaded.ranges.into_set());
                    self.effect = loaded.effect;
                    self.notifier.info(format!("Profile \"{}\" loaded!", name));
                } else {
                    debug!(name = %name, generation, "Newer slot request pending, dropping profile load");
                }
            }
            Err(e) => {
                warn!(name = %name, error = %e, "Loading profile failed");
                self.notifier.error(e.user_message());
            }
        }
        if outcome.needs_resync {
            return self.fetch_ranges();
        }
        Task::none()
    }

    pub(crate) fn handle_delete_profile(&mut self, name: String) -> Task<Message> {
        info!(name = %name, "Deleting profile");
        let request = self.api.delete_profile(&name);
        Task::perform(request, move |result| Message::ProfileDeleted { name, result })
    }

    pub(crate) fn handle_profile_deleted(
        &mut self,
        name: String,
        result: AppResult<ProfilesReply>,
    ) -> Task<Message> {
        match result {
            Ok(reply) => {
                debug!(name = %name, remaining = reply.profiles.len(), "Profile deleted");
                self.profiles.book = reply.profiles;
                self.profiles.loaded = true;
            }
            Err(e) => {
                warn!(name = %name, error = %e, "Deleting profile failed");
                self.notifier.error(e.user_message());
            }
        }
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use crate::app::state::Message;
    use crate::app::testing::{Harness, range, range_set, set_body};
    use crate::constants::endpoints;
    use crate::model::{ColorRange, ColorRangeSet, Effect, Hsv, HsvBound};
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_blank_name_rejected_locally() {
        let harness = Harness::new();
        let mut runtime = harness.runtime();
        for name in ["", "   ", "\t\n"] {
            runtime.dispatch(Message::SetProfileName(name.to_string()));
            runtime.dispatch(Message::SaveProfile);
        }
        runtime.settle().await;

        assert!(harness.transport.calls().is_empty());
        let notice = runtime.app().notifier.current().unwrap();
        assert!(notice.is_error());
        assert_eq!(notice.text, "Enter a profile name first.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_trims_and_rerenders() {
        let harness = Harness::new();
        harness.transport.reply(
            endpoints::SAVE_PROFILE,
            json!({
                "status": "ok",
                "profiles": {
                    "red": {"hsv_min": [0, 120, 70], "hsv_max": [10, 255, 255], "effect": "none"},
                    "green": {"color_ranges": [{"hsv_min": [35, 80, 80], "hsv_max": [85, 255, 255]}], "active_idx": 0, "effect": "blur"}
                }
            }),
        );
        let mut runtime = harness.runtime();
        runtime.dispatch(Message::SetProfileName("  green ".to_string()));
        runtime.dispatch(Message::SaveProfile);
        runtime.settle().await;

        assert_eq!(
            harness.transport.calls_to(endpoints::SAVE_PROFILE)[0].payload,
            json!({"name": "green"})
        );
        let app = runtime.app();
        assert_eq!(app.profiles.book.names().collect::<Vec<_>>(), vec!["red", "green"]);
        assert!(app.profiles.name_input.is_empty());
        assert_eq!(app.notifier.text(), Some("Profile \"green\" saved!"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_legacy_load_is_single_slot() {
        let harness = Harness::new();
        harness.transport.reply(
            endpoints::LOAD_PROFILE,
            json!({"status": "ok", "hsv_min": [100, 150, 0], "hsv_max": [140, 255, 255], "effect": "cartoon"}),
        );
        let mut runtime = harness.runtime_with(range_set(&[10, 50, 90], 2));
        runtime.dispatch(Message::LoadProfile("old".to_string()));
        runtime.settle().await;

        let legacy = ColorRange::new(Hsv::new(100, 150, 0), Hsv::new(140, 255, 255));
        let app = runtime.app();
        assert_eq!(app.slots.set(), &ColorRangeSet::single(legacy));
        assert_eq!(app.sliders, legacy);
        assert!(!app.slots.chips()[0].deletable);
        assert_eq!(app.effect, Effect::Cartoon);
        assert_eq!(app.notifier.text(), Some("Profile \"old\" loaded!"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_multi_load_restores_slots() {
        let harness = Harness::new();
        harness.transport.reply(
            endpoints::LOAD_PROFILE,
            json!({
                "status": "ok",
                "color_ranges": [
                    {"hsv_min": [0, 120, 70], "hsv_max": [10, 255, 255]},
                    {"hsv_min": [35, 80, 80], "hsv_max": [85, 255, 255]}
                ],
                "active_idx": 1
            }),
        );
        let mut runtime = harness.runtime();
        runtime.app_mut().effect = Effect::Blur;
        runtime.dispatch(Message::LoadProfile("two".to_string()));
        runtime.settle().await;

        let app = runtime.app();
        assert_eq!(app.slots.set().len(), 2);
        assert_eq!(app.slots.active_idx(), 1);
        assert_eq!(app.sliders.hsv_min.h, 35);
        assert_eq!(app.effect, Effect::None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_rerenders_from_reply() {
        let harness = Harness::new();
        harness
            .transport
            .reply(endpoints::DELETE_PROFILE, json!({"status": "ok", "profiles": {}}));
        let mut runtime = harness.runtime();
        runtime.dispatch(Message::DeleteProfile("green".to_string()));
        runtime.settle().await;

        assert!(runtime.app().profiles.book.is_empty());
        assert_eq!(
            harness.transport.calls_to(endpoints::DELETE_PROFILE)[0].payload,
            json!({"name": "green"})
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_failure_shows_server_message() {
        let harness = Harness::new();
        harness.transport.reply(
            endpoints::LOAD_PROFILE,
            json!({"status": "error", "message": "Profile not found"}),
        );
        let mut runtime = harness.runtime_with(range_set(&[10, 50], 0));
        runtime.dispatch(Message::LoadProfile("ghost".to_string()));
        runtime.settle().await;

        assert_eq!(runtime.app().slots.set().len(), 2);
        assert_eq!(runtime.app().notifier.text(), Some("Profile not found"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_edit_flushed_before_load() {
        let harness = Harness::new();
        harness.transport.reply(
            endpoints::LOAD_PROFILE,
            json!({"status": "ok", "hsv_min": [100, 150, 0], "hsv_max": [140, 255, 255]}),
        );
        let mut runtime = harness.runtime_with(range_set(&[10, 50], 1));

        runtime.dispatch(Message::SetHsvBound(HsvBound::HMin, 55));
        runtime.dispatch(Message::LoadProfile("old".to_string()));
        runtime.settle().await;

        let calls = harness.transport.calls();
        assert_eq!(calls[0].endpoint, endpoints::SET_HSV);
        assert_eq!(calls[0].payload["idx"], 1);
        assert_eq!(calls[0].payload["h_min"], 55);
        assert_eq!(calls[1].endpoint, endpoints::LOAD_PROFILE);
        assert_eq!(harness.transport.calls_to(endpoints::SET_HSV).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_during_load_is_dropped() {
        let harness = Harness::new();
        harness.transport.reply_after(
            endpoints::LOAD_PROFILE,
            json!({
                "status": "ok",
                "color_ranges": [
                    {"hsv_min": [120, 80, 80], "hsv_max": [140, 255, 255]},
                    {"hsv_min": [150, 80, 80], "hsv_max": [170, 255, 255]}
                ],
                "active_idx": 0
            }),
            Duration::from_millis(500),
        );
        let mut runtime = harness.runtime_with(range_set(&[10, 50], 0));

        runtime.dispatch(Message::LoadProfile("pair".to_string()));
        runtime.dispatch(Message::SetHsvBound(HsvBound::HMin, 12));
        runtime.settle().await;

        // Slot 0 of the loaded preset keeps its own bounds
        assert!(harness.transport.calls_to(endpoints::SET_HSV).is_empty());
        let app = runtime.app();
        assert_eq!(app.slots.set().get(0).copied(), Some(range(120)));
        assert_eq!(app.sliders, range(120));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_load_leaves_effect() {
        let harness = Harness::new();
        harness
            .transport
            .reply_after(
                endpoints::LOAD_PROFILE,
                json!({"status": "ok", "hsv_min": [100, 150, 0], "hsv_max": [140, 255, 255], "effect": "cartoon"}),
                Duration::from_millis(400),
            )
            .reply_after(
                endpoints::SET_ACTIVE_RANGE,
                json!({"status": "ok", "active_idx": 1, "hsv_min": [50, 80, 80], "hsv_max": [70, 255, 255]}),
                Duration::from_millis(100),
            )
            .reply(endpoints::COLOR_RANGES, set_body(&range_set(&[10, 50], 1)));
        let mut runtime = harness.runtime_with(range_set(&[10, 50], 0));

        runtime.dispatch(Message::LoadProfile("old".to_string()));
        runtime.dispatch(Message::SelectRange(1));
        runtime.settle().await;

        let app = runtime.app();
        assert_eq!(app.effect, Effect::None);
        assert_ne!(app.notifier.text(), Some("Profile \"old\" loaded!"));
        assert_eq!(app.slots.set(), &range_set(&[10, 50], 1));
        assert_eq!(harness.transport.calls_to(endpoints::COLOR_RANGES).len(), 1);
    }
}
