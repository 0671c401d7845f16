// SPDX-License-Identifier: GPL-3.0-only

//! Mode/panel state machine handlers
//!
//! A top-level mode change is a side-effecting transition: the running state
//! is forced off locally before the request is sent. A failed change is not
//! rolled back; the view is re-aligned from `/bg_status` instead.

use crate::api::{Ack, ModeReply};
use crate::app::debounce::MutationKey;
use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use crate::constants::{BLUR_DEBOUNCE, BLUR_MAX, BLUR_MIN, SOLID_COLOR_DEBOUNCE, SOLID_COLOR_PRESETS};
use crate::errors::AppResult;
use crate::model::{Mode, Rgb, SmartType};
use tracing::{debug, info, warn};

impl AppModel {
    // =========================================================================
    // Top-level mode
    // =========================================================================

    pub(crate) fn handle_select_mode(&mut self, mode: Mode) -> Task<Message> {
        info!(from = %self.mode.mode(), to = %mode, "Switching mode");
        self.mode.set_mode(mode);
        if self.run.force_stop() {
            info!("Effect stopped by mode change");
        }
        Task::perform(self.api.set_bg_mode(mode), Message::ModeApplied)
    }

    pub(crate) fn handle_mode_applied(&mut self, result: AppResult<ModeReply>) -> Task<Message> {
        match result {
            Ok(reply) => {
                if let Some(available) = reply.mediapipe_available {
                    self.mode.segmentation_available = Some(available);
                }
                if self.mode.mode() == Mode::Smart
                    && self.mode.segmentation_available == Some(false)
                {
                    self.notifier
                        .info("Smart background unavailable: server has no person segmentation");
                }
                Task::none()
            }
            Err(e) => {
                warn!(error = %e, "Mode change failed, re-syncing");
                self.notifier.error(e.user_message());
                self.fetch_background_status()
            }
        }
    }

    // =========================================================================
    // Smart background
    // =========================================================================

    pub(crate) fn handle_select_smart_type(&mut self, smart_type: SmartType) -> Task<Message> {
        info!(smart_type = %smart_type, "Switching smart background type");
        self.mode.set_smart_type(smart_type);
        Task::perform(
            self.api.set_smart_bg_type(smart_type, None),
            Message::SmartTypeApplied,
        )
    }

    pub(crate) fn handle_smart_write_result(&mut self, result: AppResult<Ack>) -> Task<Message> {
        if let Err(e) = result {
            warn!(error = %e, "Smart background update failed");
            self.notifier.error(e.user_message());
        }
        Task::none()
    }

    pub(crate) fn handle_set_blur_amount(&mut self, amount: u32) -> Task<Message> {
        self.background.blur_amount = amount.clamp(BLUR_MIN, BLUR_MAX);
        self.debouncer
            .debounce(MutationKey::BlurAmount, BLUR_DEBOUNCE, |generation| {
                Message::Debounced {
                    key: MutationKey::BlurAmount,
                    generation,
                }
            })
    }

    /// Sub-type and blur amount travel together
    pub(crate) fn write_blur_amount(&self) -> Task<Message> {
        let smart_type = self.mode.smart_type();
        let amount = self.background.blur_amount;
        debug!(smart_type = %smart_type, amount, "Writing blur amount");
        Task::perform(
            self.api.set_smart_bg_type(smart_type, Some(amount)),
            Message::BlurAmountApplied,
        )
    }

    pub(crate) fn handle_select_solid_preset(&mut self, index: usize) -> Task<Message> {
        let Some(&(label, r, g, b)) = SOLID_COLOR_PRESETS.get(index) else {
            warn!(index, "Unknown solid color preset");
            return Task::none();
        };
        info!(preset = label, "Solid color preset selected");
        self.debouncer.cancel(MutationKey::SolidColor);
        self.background.solid_preset = Some(index);
        self.background.solid_color = Rgb::new(r, g, b);
        self.write_solid_color()
    }

    pub(crate) fn handle_set_solid_color(&mut self, color: Rgb) -> Task<Message> {
        self.background.solid_preset = None;
        self.background.solid_color = color;
        self.debouncer
            .debounce(MutationKey::SolidColor, SOLID_COLOR_DEBOUNCE, |generation| {
                Message::Debounced {
                    key: MutationKey::SolidColor,
                    generation,
                }
            })
    }

    pub(crate) fn write_solid_color(&self) -> Task<Message> {
        let color = self.background.solid_color;
        debug!(color = %color.to_hex(), "Writing solid color");
        Task::perform(self.api.set_solid_color(color), Message::SolidColorApplied)
    }
}
