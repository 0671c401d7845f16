// SPDX-License-Identifier: GPL-3.0-only

//! Color sampler handlers
//!
//! A click on the rendered frame is normalized against the frame's bounding
//! box and sent to the server, which measures the color there and derives a
//! range for the active slot.

use crate::api::PickReply;
use crate::app::debounce::MutationKey;
use crate::app::state::{AppModel, FrameClick, Message};
use crate::app::task::Task;
use crate::constants::{SENSITIVITY_MAX, SENSITIVITY_MIN};
use crate::errors::{AppResult, ValidationError};
use tracing::{debug, info, warn};

/// Map a click to `[0,1]²`, origin top-left
pub fn normalize_click(click: &FrameClick) -> Result<(f64, f64), ValidationError> {
    let frame = click.frame;
    if !(frame.width > 0.0 && frame.height > 0.0) {
        return Err(ValidationError::ZeroSizedFrame);
    }
    let x = (click.client_x - frame.left) / frame.width;
    let y = (click.client_y - frame.top) / frame.height;
    if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
        return Err(ValidationError::OutsideFrame);
    }
    Ok((x, y))
}

impl AppModel {
    pub(crate) fn handle_set_sensitivity(&mut self, value: u8) -> Task<Message> {
        self.sensitivity = value.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX);
        Task::none()
    }

    pub(crate) fn handle_pick_color(&mut self, click: FrameClick) -> Task<Message> {
        let (x, y) = match normalize_click(&click) {
            Ok(point) => point,
            Err(e) => {
                debug!(reason = %e, ?click, "Ignoring click");
                return Task::none();
            }
        };
        // The sample replaces the whole range of the active slot
        if self.debouncer.cancel(MutationKey::Hsv) {
            debug!("Discarding slider edit superseded by color pick");
        }
        let sensitivity = self.sensitivity;
        info!(x, y, sensitivity, "Picking color");
        Task::perform(self.api.pick_color(x, y, sensitivity), Message::ColorPicked)
    }

    pub(crate) fn handle_color_picked(&mut self, result: AppResult<PickReply>) -> Task<Message> {
        match result {
            Ok(reply) => {
                let idx = self.slots.active_idx();
                let range = reply.range();
                debug!(idx, hsv = ?reply.hsv, ?range, "Color picked");
                self.sliders = range;
                self.slots.patch_range(idx, range);
                self.notifier.info(format!("Color picked for slot {}", idx + 1));
                self.fetch_ranges()
            }
            Err(e) => {
                warn!(error = %e, "Color pick failed");
                self.notifier.error(e.user_message());
                Task::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::FrameRect;
    use crate::app::testing::{Harness, range, range_set, set_body};
    use crate::constants::endpoints;
    use crate::model::{ColorRange, ColorRangeSet, Hsv, HsvBound};
    use serde_json::json;

    fn frame() -> FrameRect {
        FrameRect {
            left: 100.0,
            top: 50.0,
            width: 640.0,
            height: 360.0,
        }
    }

    fn click(client_x: f64, client_y: f64) -> FrameClick {
        FrameClick {
            client_x,
            client_y,
            frame: frame(),
        }
    }

    #[test]
    fn test_normalize_uses_rendered_box() {
        assert_eq!(normalize_click(&click(420.0, 230.0)), Ok((0.5, 0.5)));
        assert_eq!(normalize_click(&click(100.0, 50.0)), Ok((0.0, 0.0)));
        assert_eq!(normalize_click(&click(740.0, 410.0)), Ok((1.0, 1.0)));
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        assert_eq!(
            normalize_click(&click(99.0, 60.0)),
            Err(ValidationError::OutsideFrame)
        );
        let mut empty = click(0.0, 0.0);
        empty.frame.width = 0.0;
        assert_eq!(normalize_click(&empty), Err(ValidationError::ZeroSizedFrame));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pick_updates_active_slot() {
        let harness = Harness::new();
        let picked = ColorRange::new(Hsv::new(50, 140, 160), Hsv::new(70, 220, 240));
        harness
            .transport
            .reply(
                endpoints::PICK_COLOR,
                json!({
                    "status": "ok",
                    "hsv": [60, 180, 200],
                    "h_min": 50, "h_max": 70,
                    "s_min": 140, "s_max": 220,
                    "v_min": 160, "v_max": 240
                }),
            )
            .reply(
                endpoints::COLOR_RANGES,
                set_body(&ColorRangeSet::from_parts(
                    vec![range(10), picked],
                    1,
                )),
            );
        let mut runtime = harness.runtime_with(range_set(&[10, 90], 1));
        runtime.dispatch(Message::SetSensitivity(20));

        runtime.dispatch(Message::PickColor(click(420.0, 230.0)));
        runtime.settle().await;

        let call = &harness.transport.calls_to(endpoints::PICK_COLOR)[0];
        assert_eq!(call.payload, json!({"x": 0.5, "y": 0.5, "sensitivity": 20}));

        let app = runtime.app();
        assert_eq!(app.sliders, picked);
        assert_eq!(app.slots.chips()[1].swatch, picked.swatch());
        assert_eq!(app.notifier.text(), Some("Color picked for slot 2"));
        assert_eq!(harness.transport.calls_to(endpoints::COLOR_RANGES).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sensitivity_read_at_click_time() {
        let harness = Harness::new();
        let mut runtime = harness.runtime();
        runtime.dispatch(Message::SetSensitivity(35));
        runtime.dispatch(Message::PickColor(click(420.0, 230.0)));
        runtime.dispatch(Message::SetSensitivity(90));
        runtime.dispatch(Message::PickColor(click(420.0, 230.0)));
        runtime.settle().await;

        let calls = harness.transport.calls_to(endpoints::PICK_COLOR);
        assert_eq!(calls[0].payload["sensitivity"], 35);
        assert_eq!(calls[1].payload["sensitivity"], 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_outside_frame_sends_nothing() {
        let harness = Harness::new();
        let mut runtime = harness.runtime();
        runtime.dispatch(Message::PickColor(click(10.0, 10.0)));
        runtime.settle().await;
        assert!(harness.transport.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pick_cancels_pending_slider_write() {
        let harness = Harness::new();
        harness.transport.reply(
            endpoints::PICK_COLOR,
            json!({
                "status": "ok",
                "hsv": [60, 180, 200],
                "h_min": 50, "h_max": 70,
                "s_min": 140, "s_max": 220,
                "v_min": 160, "v_max": 240
            }),
        );
        let mut runtime = harness.runtime_with(range_set(&[10], 0));

        runtime.dispatch(Message::SetHsvBound(HsvBound::HMin, 15));
        runtime.dispatch(Message::PickColor(click(420.0, 230.0)));
        runtime.settle().await;

        assert!(harness.transport.calls_to(endpoints::SET_HSV).is_empty());
        assert_eq!(harness.transport.calls_to(endpoints::PICK_COLOR).len(), 1);
    }
}
