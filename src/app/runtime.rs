// SPDX-License-Identifier: GPL-3.0-only

//! Single-task message loop
//!
//! Owns the [`AppModel`] and every future its handlers returned. Futures are
//! polled together on the caller's task; each completion is fed back into
//! [`AppModel::update`] before the next one is polled, so view state is only
//! ever touched from one place.

use super::state::{AppModel, Message};
use super::task::Task;
use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

pub struct Runtime {
    app: AppModel,
    pending: FuturesUnordered<BoxFuture<'static, Option<Message>>>,
}

impl Runtime {
    pub fn new(app: AppModel) -> Self {
        Self {
            app,
            pending: FuturesUnordered::new(),
        }
    }

    /// Start with the task returned by [`AppModel::init`]
    pub fn with_task(app: AppModel, task: Task<Message>) -> Self {
        let mut runtime = Self::new(app);
        runtime.spawn(task);
        runtime
    }

    pub fn app(&self) -> &AppModel {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut AppModel {
        &mut self.app
    }

    pub fn into_app(self) -> AppModel {
        self.app
    }

    /// Run `message` through the update function
    pub fn dispatch(&mut self, message: Message) {
        trace!(?message, "Dispatch");
        let task = self.app.update(message);
        self.spawn(task);
    }

    pub fn spawn(&mut self, task: Task<Message>) {
        for future in task.into_futures() {
            self.pending.push(future);
        }
    }

    /// Number of futures still running (requests and timers)
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Wait for one completion and apply it; false when nothing is pending
    pub async fn step(&mut self) -> bool {
        match self.pending.next().await {
            Some(Some(message)) => {
                self.dispatch(message);
                true
            }
            Some(None) => true,
            None => false,
        }
    }

    /// Run until no request or timer is left
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    /// Apply completions for at most `budget`, returning early when idle
    pub async fn pump(&mut self, budget: Duration) {
        let deadline = Instant::now() + budget;
        while !self.pending.is_empty() {
            match tokio::time::timeout_at(deadline, self.pending.next()).await {
                Ok(Some(Some(message))) => self.dispatch(message),
                Ok(Some(None)) => {}
                Ok(None) | Err(_) => return,
            }
        }
    }

    /// Clear an expired notice; true if the view changed
    pub fn tick(&mut self) -> bool {
        self.app.notifier.expire(Instant::now())
    }
}
