// SPDX-License-Identifier: GPL-3.0-only

//! Controller fixtures shared by the handler tests

use super::runtime::Runtime;
use super::state::AppModel;
use crate::api::Api;
use crate::config::Config;
use crate::model::{ColorRange, ColorRangeSet, Hsv};
use crate::transport::mock::ScriptedTransport;
use serde_json::{Value, json};
use std::sync::Arc;

pub(crate) struct Harness {
    pub transport: ScriptedTransport,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            transport: ScriptedTransport::new(),
        }
    }

    pub fn app(&self) -> AppModel {
        AppModel::new(Config::default(), Api::new(Arc::new(self.transport.clone())))
    }

    pub fn runtime(&self) -> Runtime {
        Runtime::new(self.app())
    }

    /// Runtime whose cached slots are already `set`
    pub fn runtime_with(&self, set: ColorRangeSet) -> Runtime {
        let mut app = self.app();
        app.apply_range_set(set);
        Runtime::new(app)
    }
}

pub(crate) fn range(h: u8) -> ColorRange {
    ColorRange::new(Hsv::new(h, 80, 80), Hsv::new(h + 20, 255, 255))
}

pub(crate) fn range_set(hues: &[u8], active_idx: usize) -> ColorRangeSet {
    ColorRangeSet::from_parts(hues.iter().map(|&h| range(h)).collect(), active_idx)
}

/// Server body for a slot set
pub(crate) fn set_body(set: &ColorRangeSet) -> Value {
    let mut body = serde_json::to_value(set).unwrap_or(Value::Null);
    body["status"] = json!("ok");
    body
}
