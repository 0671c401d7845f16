// SPDX-License-Identifier: MPL-2.0

//! Typed client for the effects server
//!
//! One method per endpoint. Each method returns a `'static` future so the
//! controller can hand it to the runtime without borrowing the client.
//! A POST reply whose `status` is anything other than `"ok"` becomes
//! [`AppError::Rejected`] carrying the server's message.

pub mod types;

pub use types::*;

use crate::constants::endpoints;
use crate::errors::{AppError, AppResult};
use crate::model::{ColorRange, ColorRangeSet, Effect, LoadedProfile, Mode, ProfileBook, Rgb, SmartType};
use crate::transport::{Transport, TransportFuture, UploadFile};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;

const DEFAULT_FAILURE: &str = "Request failed";

/// Cheap to clone; clones share the transport
#[derive(Clone)]
pub struct Api {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api").finish_non_exhaustive()
    }
}

/// Turn `status != "ok"` into an error
fn check_status(endpoint: &'static str, body: &Value) -> AppResult<()> {
    match body.get("status").and_then(Value::as_str) {
        Some("ok") => Ok(()),
        _ => Err(AppError::Rejected {
            endpoint,
            message: body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_FAILURE)
                .to_string(),
        }),
    }
}

fn decode<T: DeserializeOwned>(endpoint: &'static str, body: Value) -> AppResult<T> {
    serde_json::from_value(body).map_err(|e| AppError::Protocol(format!("{}: {}", endpoint, e)))
}

/// Await a status-bearing reply
async fn status_reply<T: DeserializeOwned>(
    endpoint: &'static str,
    request: TransportFuture,
) -> AppResult<T> {
    let body = request.await?;
    check_status(endpoint, &body)?;
    decode(endpoint, body)
}

/// Await a plain GET reply (no `status` field)
async fn plain_reply<T: DeserializeOwned>(
    endpoint: &'static str,
    request: TransportFuture,
) -> AppResult<T> {
    let body = request.await?;
    decode(endpoint, body)
}

impl Api {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn post<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        payload: Value,
    ) -> impl Future<Output = AppResult<T>> + Send + use<T>
    where
        T: Send + 'static,
    {
        status_reply(endpoint, self.transport.post(endpoint, payload))
    }

    fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
    ) -> impl Future<Output = AppResult<T>> + Send + use<T>
    where
        T: Send + 'static,
    {
        plain_reply(endpoint, self.transport.get(endpoint))
    }

    // ===== Color ranges =====

    /// Replace the bounds of slot `idx`
    pub fn set_hsv(
        &self,
        idx: usize,
        range: ColorRange,
    ) -> impl Future<Output = AppResult<Ack>> + Send + use<> {
        self.post(
            endpoints::SET_HSV,
            json!({
                "idx": idx,
                "h_min": range.hsv_min.h,
                "h_max": range.hsv_max.h,
                "s_min": range.hsv_min.s,
                "s_max": range.hsv_max.s,
                "v_min": range.hsv_min.v,
                "v_max": range.hsv_max.v,
            }),
        )
    }

    pub fn color_ranges(&self) -> impl Future<Output = AppResult<ColorRangeSet>> + Send + use<> {
        self.get(endpoints::COLOR_RANGES)
    }

    pub fn set_active_range(
        &self,
        idx: usize,
    ) -> impl Future<Output = AppResult<ActiveRangeReply>> + Send + use<> {
        self.post(endpoints::SET_ACTIVE_RANGE, json!({ "idx": idx }))
    }

    pub fn add_color_range(&self) -> impl Future<Output = AppResult<ColorRangeSet>> + Send + use<> {
        self.post(endpoints::ADD_COLOR_RANGE, json!({}))
    }

    pub fn delete_color_range(
        &self,
        idx: usize,
    ) -> impl Future<Output = AppResult<ColorRangeSet>> + Send + use<> {
        self.post(endpoints::DELETE_COLOR_RANGE, json!({ "idx": idx }))
    }

    /// Sample the live frame at a normalized coordinate
    pub fn pick_color(
        &self,
        x: f64,
        y: f64,
        sensitivity: u8,
    ) -> impl Future<Output = AppResult<PickReply>> + Send + use<> {
        self.post(
            endpoints::PICK_COLOR,
            json!({ "x": x, "y": y, "sensitivity": sensitivity }),
        )
    }

    // ===== Mode and background =====

    pub fn set_bg_mode(&self, mode: Mode) -> impl Future<Output = AppResult<ModeReply>> + Send + use<> {
        self.post(endpoints::SET_BG_MODE, json!({ "mode": mode.as_str() }))
    }

    /// Set the smart sub-type, optionally with a blur amount in the same request
    pub fn set_smart_bg_type(
        &self,
        smart_type: SmartType,
        blur_amount: Option<u32>,
    ) -> impl Future<Output = AppResult<Ack>> + Send + use<> {
        let payload = match blur_amount {
            Some(amount) => json!({ "type": smart_type.as_str(), "blur_amount": amount }),
            None => json!({ "type": smart_type.as_str() }),
        };
        self.post(endpoints::SET_SMART_BG_TYPE, payload)
    }

    pub fn set_solid_color(&self, color: Rgb) -> impl Future<Output = AppResult<Ack>> + Send + use<> {
        self.post(
            endpoints::SET_SOLID_COLOR,
            json!({ "r": color.r, "g": color.g, "b": color.b }),
        )
    }

    pub fn set_builtin_bg(
        &self,
        name: &str,
    ) -> impl Future<Output = AppResult<BackgroundReply>> + Send + use<> {
        self.post(endpoints::SET_BUILTIN_BG, json!({ "name": name }))
    }

    pub fn upload_bg(
        &self,
        file: UploadFile,
    ) -> impl Future<Output = AppResult<BackgroundReply>> + Send + use<> {
        status_reply(
            endpoints::UPLOAD_BG,
            self.transport.upload(endpoints::UPLOAD_BG, file),
        )
    }

    pub fn capture_background(
        &self,
    ) -> impl Future<Output = AppResult<CaptureReply>> + Send + use<> {
        self.post(endpoints::CAPTURE_BACKGROUND, json!({}))
    }

    pub fn bg_status(&self) -> impl Future<Output = AppResult<BackgroundStatus>> + Send + use<> {
        self.get(endpoints::BG_STATUS)
    }

    pub fn smart_status(&self) -> impl Future<Output = AppResult<SmartStatus>> + Send + use<> {
        self.get(endpoints::SMART_STATUS)
    }

    // ===== Run state and effect =====

    pub fn toggle(&self) -> impl Future<Output = AppResult<ToggleReply>> + Send + use<> {
        self.post(endpoints::TOGGLE, json!({}))
    }

    pub fn set_effect(&self, effect: Effect) -> impl Future<Output = AppResult<Ack>> + Send + use<> {
        self.post(endpoints::SET_EFFECT, json!({ "effect": effect.as_str() }))
    }

    // ===== Profiles =====

    pub fn profiles(&self) -> impl Future<Output = AppResult<ProfileBook>> + Send + use<> {
        self.get(endpoints::PROFILES)
    }

    pub fn save_profile(
        &self,
        name: &str,
    ) -> impl Future<Output = AppResult<ProfilesReply>> + Send + use<> {
        self.post(endpoints::SAVE_PROFILE, json!({ "name": name }))
    }

    pub fn load_profile(
        &self,
        name: &str,
    ) -> impl Future<Output = AppResult<LoadedProfile>> + Send + use<> {
        self.post(endpoints::LOAD_PROFILE, json!({ "name": name }))
    }

    pub fn delete_profile(
        &self,
        name: &str,
    ) -> impl Future<Output = AppResult<ProfilesReply>> + Send + use<> {
        self.post(endpoints::DELETE_PROFILE, json!({ "name": name }))
    }
}
