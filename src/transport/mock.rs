// SPDX-License-Identifier: MPL-2.0

//! In-memory transport for tests
//!
//! Replies are queued per endpoint; an endpoint without queued replies answers
//! `{"status": "ok"}`. Every call is recorded.

use super::{Transport, TransportFuture, UploadFile};
use crate::errors::TransportError;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Scripted = (Result<Value, TransportError>, Option<Duration>);

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub endpoint: &'static str,
    pub payload: Value,
}

#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    replies: Arc<Mutex<HashMap<&'static str, VecDeque<Scripted>>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply body for the next call to `endpoint`
    pub fn reply(&self, endpoint: &'static str, body: Value) -> &Self {
        self.push(endpoint, (Ok(body), None))
    }

    /// Queue a reply that arrives `delay` after the call
    pub fn reply_after(&self, endpoint: &'static str, body: Value, delay: Duration) -> &Self {
        self.push(endpoint, (Ok(body), Some(delay)))
    }

    /// Queue a transport failure for the next call to `endpoint`
    pub fn fail(&self, endpoint: &'static str, error: TransportError) -> &Self {
        self.push(endpoint, (Err(error), None))
    }

    fn push(&self, endpoint: &'static str, reply: Scripted) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls made to one endpoint
    pub fn calls_to(&self, endpoint: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.endpoint == endpoint)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn answer(&self, endpoint: &'static str, payload: Value) -> TransportFuture {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall { endpoint, payload });
        let (reply, delay) = self
            .replies
            .lock()
            .unwrap()
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| (Ok(json!({"status": "ok"})), None));
        match delay {
            Some(delay) => Box::pin(async move {
                tokio::time::sleep(delay).await;
                reply
            }),
            None => Box::pin(futures::future::ready(reply)),
        }
    }
}

impl Transport for ScriptedTransport {
    fn post(&self, endpoint: &'static str, payload: Value) -> TransportFuture {
        self.answer(endpoint, payload)
    }

    fn get(&self, endpoint: &'static str) -> TransportFuture {
        self.answer(endpoint, Value::Null)
    }

    fn upload(&self, endpoint: &'static str, file: UploadFile) -> TransportFuture {
        self.answer(
            endpoint,
            json!({"file_name": file.file_name, "size": file.bytes.len()}),
        )
    }
}
