// SPDX-License-Identifier: MPL-2.0

//! Transport to the effects server
//!
//! Every request resolves to a parsed JSON body. Transports fail only when
//! the server cannot be reached or the body is not JSON; application-level
//! failure is carried in the body's `status` field and is interpreted by
//! [`crate::api`], never here. Nothing is retried.

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpTransport;

use crate::errors::TransportError;
use futures::future::BoxFuture;
use serde_json::Value;
use std::path::Path;

/// Future returned by every transport call
pub type TransportFuture = BoxFuture<'static, Result<Value, TransportError>>;

/// A file to send as multipart `file` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_for(&file_name);
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Read a local image from disk
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "background".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Request/response primitive used by the API client
///
/// Endpoints are paths relative to the server root (e.g. `/toggle`).
pub trait Transport: Send + Sync {
    /// JSON POST
    fn post(&self, endpoint: &'static str, payload: Value) -> TransportFuture;

    /// GET returning JSON
    fn get(&self, endpoint: &'static str) -> TransportFuture;

    /// Multipart POST with a single `file` field
    fn upload(&self, endpoint: &'static str, file: UploadFile) -> TransportFuture;
}
