// SPDX-License-Identifier: GPL-3.0-only

//! Start/stop and frame effect handlers

use crate::api::{Ack, ToggleReply};
use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use crate::errors::AppResult;
use crate::model::Effect;
use tracing::{info, warn};

impl AppModel {
    pub(crate) fn handle_toggle_running(&mut self) -> Task<Message> {
        if self.run.toggling {
            return Task::none();
        }
        self.run.toggling = true;
        Task::perform(self.api.toggle(), Message::Toggled)
    }

    pub(crate) fn handle_toggled(&mut self, result: AppResult<ToggleReply>) -> Task<Message> {
        self.run.toggling = false;
        match result {
            Ok(reply) => {
                info!(running = reply.running, "Effect toggled");
                self.run.set_running(reply.running);
            }
            Err(e) => {
                warn!(error = %e, "Toggle failed");
                self.notifier.error(e.user_message());
            }
        }
        Task::none()
    }

    pub(crate) fn handle_set_effect(&mut self, effect: Effect) -> Task<Message> {
        info!(effect = %effect, "Selecting effect");
        self.effect = effect;
        Task::perform(self.api.set_effect(effect), Message::EffectApplied)
    }

    pub(crate) fn handle_effect_applied(&mut self, result: AppResult<Ack>) -> Task<Message> {
        if let Err(e) = result {
            warn!(error = %e, "Setting effect failed");
            self.notifier.error(e.user_message());
        }
        Task::none()
    }
}
