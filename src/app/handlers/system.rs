// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Startup sync and the status fetches that re-align view state with the
//! server. Failures here are logged only; nothing is shown to the operator.

use crate::api::{BackgroundStatus, SmartStatus};
use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use crate::constants::{BLUR_MAX, BLUR_MIN, SOLID_COLOR_PRESETS, scene_label};
use crate::errors::AppResult;
use crate::model::{ProfileBook, Rgb};
use tracing::{debug, info, warn};

/// Display label of a background name reported by the server
pub(crate) fn background_label(name: &str) -> String {
    scene_label(name)
        .map(str::to_string)
        .unwrap_or_else(|| name.to_string())
}

/// Index of the preset whose color equals `color`
pub(crate) fn solid_preset_index(color: Rgb) -> Option<usize> {
    SOLID_COLOR_PRESETS
        .iter()
        .position(|&(_, r, g, b)| Rgb::new(r, g, b) == color)
}

impl AppModel {
    /// Fetch everything the view mirrors
    pub(crate) fn handle_sync(&mut self) -> Task<Message> {
        info!(server = %self.config.server_url, "Syncing state from server");
        Task::batch([
            self.fetch_ranges(),
            self.fetch_profiles(),
            self.fetch_background_status(),
            Task::perform(self.api.smart_status(), Message::SmartStatusFetched),
        ])
    }

    pub(crate) fn fetch_profiles(&self) -> Task<Message> {
        Task::perform(self.api.profiles(), Message::ProfilesFetched)
    }

    pub(crate) fn fetch_background_status(&self) -> Task<Message> {
        Task::perform(self.api.bg_status(), Message::BackgroundStatusFetched)
    }

    pub(crate) fn handle_profiles_fetched(&mut self, result: AppResult<ProfileBook>) -> Task<Message> {
        match result {
            Ok(book) => {
                debug!(count = book.len(), "Profiles fetched");
                self.profiles.book = book;
                self.profiles.loaded = true;
            }
            Err(e) => warn!(error = %e, "Failed to fetch profiles"),
        }
        Task::none()
    }

    pub(crate) fn handle_background_status(
        &mut self,
        result: AppResult<BackgroundStatus>,
    ) -> Task<Message> {
        match result {
            Ok(status) => {
                debug!(mode = %status.bg_mode, has_virtual = status.has_virtual_bg, "Background status");
                self.mode.set_mode(status.bg_mode);
                if let Some(name) = status.virtual_bg_name.filter(|_| status.has_virtual_bg) {
                    self.background.virtual_label = Some(background_label(&name));
                }
            }
            Err(e) => warn!(error = %e, "Failed to fetch background status"),
        }
        Task::none()
    }

    pub(crate) fn handle_smart_status(&mut self, result: AppResult<SmartStatus>) -> Task<Message> {
        let status = match result {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Failed to fetch smart background status");
                return Task::none();
            }
        };
        debug!(
            smart_type = %status.smart_bg_type,
            segmentation = status.mediapipe_available,
            "Smart background status"
        );
        self.mode.segmentation_available = Some(status.mediapipe_available);
        self.mode.set_smart_type(status.smart_bg_type);
        if let Some(amount) = status.smart_blur_amount {
            self.background.blur_amount = amount.clamp(BLUR_MIN, BLUR_MAX);
        }
        if let Some(color) = status.solid_color() {
            self.background.solid_color = color;
            self.background.solid_preset = solid_preset_index(color);
        }
        if let Some(name) = status.virtual_bg_name {
            self.background.smart_label = Some(background_label(&name));
        }
        Task::none()
    }
}
