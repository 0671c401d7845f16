// SPDX-License-Identifier: GPL-3.0-only

//! Per-key trailing-edge debouncing
//!
//! Each key owns at most one live timer. Arming a key aborts its previous
//! timer, so only the last event of a burst produces a message. Timers of
//! different keys never interfere.

use super::task::Task;
use futures::future::{AbortHandle, Abortable};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;
use tracing::trace;

/// Field groups that are written to the server as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKey {
    /// All six HSV bounds of the active slot
    Hsv,
    /// Smart-mode blur amount (sent with the current sub-type)
    BlurAmount,
    /// Free-form solid background color
    SolidColor,
}

#[derive(Debug)]
struct PendingTimer {
    generation: u64,
    abort: AbortHandle,
}

/// Map from key to cancelable timer
#[derive(Debug)]
pub struct Debouncer<K: Eq + Hash> {
    pending: HashMap<K, PendingTimer>,
    next_generation: u64,
}

impl<K: Eq + Hash> Default for Debouncer<K> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
            next_generation: 0,
        }
    }
}

impl<K: Eq + Hash + Copy + Debug> Debouncer<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)arm `key`; `action` receives the timer generation when it elapses
    ///
    /// The message must be passed back to [`Debouncer::fire`] to confirm it
    /// is still the live timer for that key.
    pub fn debounce<M, F>(&mut self, key: K, delay: Duration, action: F) -> Task<M>
    where
        M: Send + 'static,
        F: FnOnce(u64) -> M + Send + 'static,
    {
        self.cancel(key);

        self.next_generation += 1;
        let generation = self.next_generation;
        let (abort, registration) = AbortHandle::new_pair();
        self.pending.insert(key, PendingTimer { generation, abort });
        trace!(?key, generation, delay_ms = delay.as_millis() as u64, "Debounce armed");

        let timer = Abortable::new(async move { tokio::time::sleep(delay).await }, registration);
        Task::future(async move { timer.await.ok().map(|()| action(generation)) })
    }

    /// Consume an elapsed timer; false if it was superseded or cancelled
    pub fn fire(&mut self, key: K, generation: u64) -> bool {
        match self.pending.get(&key) {
            Some(timer) if timer.generation == generation => {
                self.pending.remove(&key);
                true
            }
            _ => false,
        }
    }

    /// Drop the live timer of `key`; true if one was pending
    pub fn cancel(&mut self, key: K) -> bool {
        match self.pending.remove(&key) {
            Some(timer) => {
                timer.abort.abort();
                trace!(?key, generation = timer.generation, "Debounce cancelled");
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.contains_key(&key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl<K: Eq + Hash> Drop for Debouncer<K> {
    fn drop(&mut self) {
        for timer in self.pending.values() {
            timer.abort.abort();
        }
    }
}
