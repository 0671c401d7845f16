// SPDX-License-Identifier: MPL-2.0

//! Cloak Control - operator console for an invisibility-cloak effects server
//!
//! The server captures video and does all per-frame processing. This crate
//! keeps a local view of its tunable state in agreement with it: HSV color
//! ranges, background mode, smart background settings, effects and presets.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Controller state, message handling and the event loop
//! - [`api`]: Typed requests and replies for every server endpoint
//! - [`transport`]: JSON and multipart exchange with the server
//! - [`model`]: Color ranges, modes and presets
//! - [`config`]: User configuration handling
//! - [`terminal`]: Interactive terminal control surface
//!
//! # Example
//!
//! ```ignore
//! let api = Api::new(Arc::new(HttpTransport::new(&config.server_url, config.request_timeout())?));
//! let (app, task) = AppModel::init(config, api);
//! let mut runtime = Runtime::with_task(app, task);
//! runtime.settle().await;
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod constants;
pub mod errors;
pub mod model;
pub mod terminal;
pub mod transport;

// Re-export commonly used types
pub use api::Api;
pub use app::{AppModel, Message, Runtime};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use model::{ColorRange, ColorRangeSet, Effect, Hsv, Mode, Rgb, SmartType};
pub use transport::{HttpTransport, Transport};
