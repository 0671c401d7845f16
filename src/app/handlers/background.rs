// SPDX-License-Identifier: GPL-3.0-only

//! Background handlers
//!
//! Capturing the empty scene for cloak mode, built-in scenes and uploaded
//! images for the virtual and smart panels.

use super::system::background_label;
use crate::api::{BackgroundReply, CaptureReply};
use crate::app::state::{AppModel, Message, SceneTarget};
use crate::app::task::Task;
use crate::constants::scene_label;
use crate::errors::{AppError, AppResult, ValidationError};
use crate::transport::UploadFile;
use std::path::PathBuf;
use tracing::{info, warn};

impl AppModel {
    pub(crate) fn handle_capture_background(&mut self) -> Task<Message> {
        if self.background.capturing {
            info!("Background capture already in progress");
            return Task::none();
        }
        info!("Capturing background");
        self.background.capturing = true;
        Task::perform(self.api.capture_background(), Message::BackgroundCaptured)
    }

    pub(crate) fn handle_background_captured(
        &mut self,
        result: AppResult<CaptureReply>,
    ) -> Task<Message> {
        self.background.capturing = false;
        match result {
            Ok(reply) => self
                .notifier
                .info(reply.message.unwrap_or_else(|| "Background captured!".to_string())),
            Err(e) => {
                warn!(error = %e, "Background capture failed");
                self.notifier.error(e.user_message());
            }
        }
        Task::none()
    }

    pub(crate) fn handle_select_scene(&mut self, target: SceneTarget, scene: String) -> Task<Message> {
        if scene_label(&scene).is_none() {
            self.notifier
                .error(AppError::from(ValidationError::UnknownScene(scene)).user_message());
            return Task::none();
        }
        info!(scene = %scene, ?target, "Selecting built-in background");
        let request = self.api.set_builtin_bg(&scene);
        self.background.select_scene(target, Some(scene));
        Task::perform(request, move |result| Message::SceneApplied { target, result })
    }

    pub(crate) fn handle_scene_applied(
        &mut self,
        target: SceneTarget,
        result: AppResult<BackgroundReply>,
    ) -> Task<Message> {
        match result {
            Ok(reply) => {
                let label = background_label(&reply.name);
                let notice = match target {
                    SceneTarget::Virtual => format!("Target set: {}", label),
                    SceneTarget::Smart => format!("Smart background set: {}", label),
                };
                self.background.set_label(target, label);
                self.notifier.info(notice);
            }
            Err(e) => {
                warn!(error = %e, "Selecting background failed");
                self.background.select_scene(target, None);
                self.notifier.error(e.user_message());
            }
        }
        Task::none()
    }

    pub(crate) fn handle_upload_background(
        &mut self,
        target: SceneTarget,
        path: PathBuf,
    ) -> Task<Message> {
        info!(path = %path.display(), ?target, "Uploading background");
        let api = self.api.clone();
        Task::perform(
            async move {
                let file = UploadFile::read(&path).await.map_err(|e| {
                    AppError::Storage(format!("Cannot read {}: {}", path.display(), e))
                })?;
                api.upload_bg(file).await
            },
            move |result| Message::BackgroundUploaded { target, result },
        )
    }

    pub(crate) fn handle_background_uploaded(
        &mut self,
        target: SceneTarget,
        result: AppResult<BackgroundReply>,
    ) -> Task<Message> {
        match result {
            Ok(reply) => {
                self.background.select_scene(target, None);
                self.background.set_label(target, format!("✓ {}", reply.name));
                self.notifier.info("Custom background uploaded!");
            }
            Err(e) => {
                warn!(error = %e, "Background upload failed");
                self.notifier.error(e.user_message());
            }
        }
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use crate::app::state::{Message, SceneTarget};
    use crate::app::testing::Harness;
    use crate::constants::endpoints;
    use serde_json::json;
    use std::path::PathBuf;

    #[tokio::test(start_paused = true)]
    async fn test_capture_busy_flag() {
        let harness = Harness::new();
        harness.transport.reply(
            endpoints::CAPTURE_BACKGROUND,
            json!({"status": "ok", "message": "Background captured!"}),
        );
        let mut runtime = harness.runtime();
        runtime.dispatch(Message::CaptureBackground);
        runtime.dispatch(Message::CaptureBackground);
        assert!(runtime.app().background.capturing);
        runtime.settle().await;

        assert!(!runtime.app().background.capturing);
        assert_eq!(harness.transport.calls_to(endpoints::CAPTURE_BACKGROUND).len(), 1);
        assert_eq!(runtime.app().notifier.text(), Some("Background captured!"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scene_labels_per_panel() {
        let harness = Harness::new();
        harness
            .transport
            .reply(endpoints::SET_BUILTIN_BG, json!({"status": "ok", "name": "space"}))
            .reply(endpoints::SET_BUILTIN_BG, json!({"status": "ok", "name": "forest"}));
        let mut runtime = harness.runtime();

        runtime.dispatch(Message::SelectScene {
            target: SceneTarget::Virtual,
            scene: "space".to_string(),
        });
        runtime.settle().await;
        assert_eq!(runtime.app().notifier.text(), Some("Target set: Space"));

        runtime.dispatch(Message::SelectScene {
            target: SceneTarget::Smart,
            scene: "forest".to_string(),
        });
        runtime.settle().await;

        let background = &runtime.app().background;
        assert_eq!(background.virtual_scene.as_deref(), Some("space"));
        assert_eq!(background.virtual_label.as_deref(), Some("Space"));
        assert_eq!(background.smart_scene.as_deref(), Some("forest"));
        assert_eq!(
            runtime.app().notifier.text(),
            Some("Smart background set: Forest")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_scene_rejected() {
        let harness = Harness::new();
        let mut runtime = harness.runtime();
        runtime.dispatch(Message::SelectScene {
            target: SceneTarget::Virtual,
            scene: "moon".to_string(),
        });
        runtime.settle().await;
        assert!(harness.transport.calls().is_empty());
        assert_eq!(runtime.app().notifier.text(), Some("Unknown scene: moon"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreadable_upload_makes_no_request() {
        let harness = Harness::new();
        let mut runtime = harness.runtime();
        runtime.dispatch(Message::UploadBackground {
            target: SceneTarget::Smart,
            path: PathBuf::from("/nonexistent/cloak-control/bg.png"),
        });
        runtime.settle().await;

        assert!(harness.transport.calls().is_empty());
        assert!(runtime.app().notifier.current().unwrap().is_error());
    }

    #[tokio::test]
    async fn test_upload_sets_checkmark_label() {
        let path = std::env::temp_dir().join(format!("cloak-control-upload-{}.png", std::process::id()));
        std::fs::write(&path, b"\x89PNG fake").unwrap();

        let harness = Harness::new();
        harness
            .transport
            .reply(endpoints::UPLOAD_BG, json!({"status": "ok", "name": "custom_bg.png"}));
        let mut runtime = harness.runtime();
        runtime.app_mut().background.virtual_scene = Some("beach".to_string());
        runtime.dispatch(Message::UploadBackground {
            target: SceneTarget::Virtual,
            path: path.clone(),
        });
        runtime.settle().await;
        let _ = std::fs::remove_file(&path);

        let background = &runtime.app().background;
        assert!(background.virtual_scene.is_none());
        assert_eq!(background.virtual_label.as_deref(), Some("✓ custom_bg.png"));
        let call = &harness.transport.calls_to(endpoints::UPLOAD_BG)[0];
        assert_eq!(call.payload["size"], 9);
        assert_eq!(runtime.app().notifier.text(), Some("Custom background uploaded!"));
    }
}
