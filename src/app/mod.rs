// SPDX-License-Identifier: GPL-3.0-only

//! Controller for the effects server
//!
//! This module contains the view state that mirrors the server, the message
//! handling that keeps it in agreement, and the loop that runs requests and
//! timers.
//!
//! # Architecture
//!
//! - `state`: View state types (AppModel, Message, ModeState, SlotState, ...)
//! - `update`: Message dispatch to the `handlers` submodules
//! - `task`: Deferred work returned from `update`
//! - `runtime`: Polls tasks and feeds their messages back into `update`
//! - `debounce`: Per-key trailing-edge timers
//! - `notify`: Transient notification slot
//!
//! # Main Types
//!
//! - `AppModel`: All state the front-ends render
//! - `Message`: Operator interactions and request completions
//! - `Runtime`: Single-task event loop owning the model

mod debounce;
mod handlers;
mod notify;
mod runtime;
mod state;
mod task;
#[cfg(test)]
mod testing;
mod update;

pub use debounce::{Debouncer, MutationKey};
pub use handlers::sampler::normalize_click;
pub use notify::{Notice, NoticeKind, Notifier};
pub use runtime::Runtime;
pub use state::{
    AppModel, BackgroundState, FrameClick, FrameRect, Message, ModeState, ProfileState,
    RangeChip, RangeSync, RunState, SceneTarget, SlotState, SyncOutcome,
};
pub use task::Task;

use crate::api::Api;
use crate::config::Config;
use crate::constants::{SENSITIVITY_MAX, SENSITIVITY_MIN};
use crate::model::{ColorRange, ColorRangeSet, Effect};
use tracing::info;

impl AppModel {
    /// Controller with local defaults; nothing is fetched yet
    pub fn new(config: Config, api: Api) -> Self {
        let sensitivity = config
            .default_sensitivity
            .clamp(SENSITIVITY_MIN, SENSITIVITY_MAX);
        Self {
            config,
            api,
            mode: ModeState::default(),
            run: RunState::default(),
            slots: SlotState::new(ColorRangeSet::default()),
            sliders: ColorRange::full(),
            range_sync: RangeSync::default(),
            background: BackgroundState::default(),
            effect: Effect::None,
            sensitivity,
            profiles: ProfileState::default(),
            notifier: Notifier::default(),
            debouncer: Debouncer::new(),
        }
    }

    /// Controller plus the startup sync task
    pub fn init(config: Config, api: Api) -> (Self, Task<Message>) {
        info!(server = %config.server_url, "Initializing controller");
        let app = Self::new(config, api);
        (app, Task::done(Message::Sync))
    }

    /// Typed server client
    pub fn api(&self) -> &Api {
        &self.api
    }
}
