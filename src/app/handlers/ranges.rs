// SPDX-License-Identifier: GPL-3.0-only

//! Color-range slot handlers
//!
//! Slider edits update the local value at once and reach the server through
//! the HSV debounce. Select, add and delete are round-trips whose replies are
//! ordered by [`RangeSync`](crate::app::state::RangeSync); a stale reply is
//! dropped and the set re-fetched once the overlap is over.

use crate::api::{Ack, ActiveRangeReply};
use crate::app::debounce::MutationKey;
use crate::app::state::{AppModel, Message, SyncOutcome};
use crate::app::task::Task;
use crate::constants::HSV_DEBOUNCE;
use crate::errors::{AppError, AppResult, ValidationError};
use crate::model::{ColorRange, ColorRangeSet, HsvBound};
use tracing::{debug, info, warn};

impl AppModel {
    // =========================================================================
    // Slot set
    // =========================================================================

    /// Request the full slot set
    pub(crate) fn fetch_ranges(&mut self) -> Task<Message> {
        let generation = self.range_sync.begin();
        Task::perform(self.api.color_ranges(), move |result| {
            Message::RangesFetched { generation, result }
        })
    }

    /// Replace the cached set and regenerate every chip
    ///
    /// Indices may refer to different slots afterwards, so an unsent slider
    /// edit is dropped.
    pub(crate) fn apply_range_set(&mut self, set: ColorRangeSet) {
        if self.debouncer.cancel(MutationKey::Hsv) {
            debug!("Dropped slider edit, slot set replaced");
        }
        self.sliders = set.active().copied().unwrap_or_default();
        self.slots.replace(set);
    }

    /// Point the sliders at slot `idx` of the unchanged set
    ///
    /// An unsent edit survives only if it was made to that same slot.
    fn load_sliders(&mut self, idx: usize, range: ColorRange) {
        if self.debouncer.is_pending(MutationKey::Hsv) && idx == self.slots.active_idx() {
            debug!(idx, "Keeping unsent slider edit");
            return;
        }
        if self.debouncer.cancel(MutationKey::Hsv) {
            debug!("Dropped slider edit for a slot that is no longer active");
        }
        self.sliders = range;
    }

    /// Common tail of every slot reply
    fn finish_slot_request(&mut self, generation: u64) -> (SyncOutcome, Task<Message>) {
        let outcome = self.range_sync.finish(generation);
        let task = if outcome.needs_resync {
            info!("Re-fetching color ranges after out-of-order replies");
            self.fetch_ranges()
        } else {
            Task::none()
        };
        (outcome, task)
    }

    pub(crate) fn handle_ranges_fetched(
        &mut self,
        generation: u64,
        result: AppResult<ColorRangeSet>,
    ) -> Task<Message> {
        let (outcome, task) = self.finish_slot_request(generation);
        match result {
            Ok(set) if set.is_empty() => warn!("Server returned no color ranges"),
            Ok(set) if outcome.current => {
                debug!(count = set.len(), active = set.active_idx(), "Color ranges fetched");
                self.apply_range_set(set);
            }
            Ok(_) => debug!(generation, "Dropping stale color range list"),
            Err(e) => warn!(error = %e, "Failed to fetch color ranges"),
        }
        task
    }

    // =========================================================================
    // Slider edits
    // =========================================================================

    pub(crate) fn handle_set_hsv_bound(&mut self, bound: HsvBound, value: u8) -> Task<Message> {
        self.sliders.set(bound, value);
        self.arm_hsv_write()
    }

    fn arm_hsv_write(&mut self) -> Task<Message> {
        self.debouncer
            .debounce(MutationKey::Hsv, HSV_DEBOUNCE, |generation| Message::Debounced {
                key: MutationKey::Hsv,
                generation,
            })
    }

    /// The HSV window elapsed
    pub(crate) fn handle_hsv_timer(&mut self) -> Task<Message> {
        if self.range_sync.is_busy() {
            debug!("Slot request in flight, deferring slider write");
            return self.arm_hsv_write();
        }
        self.write_hsv()
    }

    /// Send the sliders to the active slot
    fn write_hsv(&self) -> Task<Message> {
        let idx = self.slots.active_idx();
        let range = self.sliders;
        let revision = self.slots.revision();
        debug!(idx, ?range, "Writing HSV range");
        Task::perform(self.api.set_hsv(idx, range), move |result| Message::HsvApplied {
            idx,
            range,
            revision,
            result,
        })
    }

    /// Send an unsent slider edit now
    pub(crate) fn flush_hsv_write(&mut self) -> Task<Message> {
        if self.debouncer.cancel(MutationKey::Hsv) {
            debug!("Flushing slider edit before slot change");
            self.write_hsv()
        } else {
            Task::none()
        }
    }

    pub(crate) fn handle_hsv_applied(
        &mut self,
        idx: usize,
        range: ColorRange,
        revision: u64,
        result: AppResult<Ack>,
    ) -> Task<Message> {
        match result {
            Ok(_) if revision == self.slots.revision() => {
                self.slots.patch_range(idx, range);
            }
            Ok(_) => debug!(idx, "Slots regenerated since write, not patching"),
            Err(e) => {
                warn!(idx, error = %e, "HSV write failed");
                self.notifier.error(e.user_message());
            }
        }
        Task::none()
    }

    // =========================================================================
    // Select / add / delete
    // =========================================================================

    pub(crate) fn handle_select_range(&mut self, idx: usize) -> Task<Message> {
        if !self.slots.set().contains(idx) {
            self.notifier
                .error(AppError::from(ValidationError::NoSuchRange(idx)).user_message());
            return Task::none();
        }
        info!(idx, "Selecting color range");
        let flush = self.flush_hsv_write();
        let generation = self.range_sync.begin();
        flush.chain(Task::perform(self.api.set_active_range(idx), move |result| {
            Message::RangeSelected { generation, result }
        }))
    }

    pub(crate) fn handle_range_selected(
        &mut self,
        generation: u64,
        result: AppResult<ActiveRangeReply>,
    ) -> Task<Message> {
        let (outcome, mut task) = self.finish_slot_request(generation);
        match result {
            Ok(reply) if outcome.current => {
                let idx = reply.active_idx;
                let range = reply.range();
                if self.slots.set().contains(idx) {
                    self.load_sliders(idx, range);
                    self.slots.patch_active(idx);
                    self.slots.patch_range(idx, range);
                } else {
                    warn!(idx, "Selected slot unknown locally, re-fetching");
                    task = task.chain(self.fetch_ranges());
                }
            }
            Ok(reply) => debug!(idx = reply.active_idx, "Dropping stale selection"),
            Err(e) => self.notifier.error(e.user_message()),
        }
        task
    }

    pub(crate) fn handle_add_range(&mut self) -> Task<Message> {
        info!(count = self.slots.set().len(), "Adding color range");
        let flush = self.flush_hsv_write();
        let generation = self.range_sync.begin();
        flush.chain(Task::perform(self.api.add_color_range(), move |result| {
            Message::RangeAdded { generation, result }
        }))
    }

    pub(crate) fn handle_range_added(
        &mut self,
        generation: u64,
        result: AppResult<ColorRangeSet>,
    ) -> Task<Message> {
        let (outcome, task) = self.finish_slot_request(generation);
        match result {
            Ok(set) if set.is_empty() => self.reject_empty_set("add"),
            Ok(set) if outcome.current => {
                self.apply_range_set(set);
                self.sliders = ColorRange::full();
                let slot = self.slots.active_idx() + 1;
                self.notifier.info(format!(
                    "Slot {} added. Click the video to pick its color.",
                    slot
                ));
            }
            Ok(_) => debug!(generation, "Dropping stale add reply"),
            Err(e) => {
                warn!(error = %e, "Adding color range failed");
                self.notifier.error(e.user_message());
            }
        }
        task
    }

    pub(crate) fn handle_delete_range(&mut self, idx: usize) -> Task<Message> {
        let set = self.slots.set();
        let rejected = if !set.can_delete() {
            Some(ValidationError::LastRangeNotDeletable)
        } else if !set.contains(idx) {
            Some(ValidationError::NoSuchRange(idx))
        } else {
            None
        };
        if let Some(e) = rejected {
            self.notifier.error(AppError::from(e).user_message());
            return Task::none();
        }
        info!(idx, "Deleting color range");
        let flush = self.flush_hsv_write();
        let generation = self.range_sync.begin();
        flush.chain(Task::perform(self.api.delete_color_range(idx), move |result| {
            Message::RangeDeleted { generation, result }
        }))
    }

    /// An `ok` reply without slots cannot replace the set
    fn reject_empty_set(&mut self, operation: &str) {
        warn!(operation, "Server reply carried no color ranges");
        let e = AppError::Protocol(format!("{} reply carried no color ranges", operation));
        self.notifier.error(e.user_message());
    }

    pub(crate) fn handle_range_deleted(
        &mut self,
        generation: u64,
        result: AppResult<ColorRangeSet>,
    ) -> Task<Message> {
        let (outcome, task) = self.finish_slot_request(generation);
        match result {
            Ok(set) if set.is_empty() => self.reject_empty_set("delete"),
            Ok(set) if outcome.current => {
                debug!(count = set.len(), active = set.active_idx(), "Color range deleted");
                self.apply_range_set(set);
            }
            Ok(_) => debug!(generation, "Dropping stale delete reply"),
            Err(e) => self.notifier.error(e.user_message()),
        }
        task
    }
}
