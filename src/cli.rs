// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for server operations
//!
//! Every command drives the same controller as the terminal surface: connect,
//! sync, dispatch one or more messages, wait for the requests and timers to
//! finish, then print the resulting state or notification.

use chrono::Local;
use cloak_control::api::Api;
use cloak_control::app::{FrameClick, FrameRect, Message, Runtime, SceneTarget};
use cloak_control::config::Config;
use cloak_control::constants::BUILTIN_SCENES;
use cloak_control::model::HsvBound;
use cloak_control::{AppModel, Effect, HttpTransport, Mode, Rgb, SmartType};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Controller connected to the configured server, with its state synced
struct Session {
    rt: tokio::runtime::Runtime,
    runtime: Runtime,
}

impl Session {
    fn connect(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let rt = tokio::runtime::Runtime::new()?;
        let api = connect_api(config)?;
        let (app, task) = AppModel::init(config.clone(), api);
        let mut runtime = Runtime::with_task(app, task);
        rt.block_on(runtime.settle());

        if !runtime.app().profiles.loaded {
            return Err(format!("Cannot read state from {}", config.server_url).into());
        }
        Ok(Self { rt, runtime })
    }

    fn app(&self) -> &AppModel {
        self.runtime.app()
    }

    /// Dispatch `message` and wait for everything it started
    fn apply(&mut self, message: Message) -> CliResult {
        self.runtime.dispatch(message);
        self.rt.block_on(self.runtime.settle());
        self.report()
    }

    /// Print the notification; an error notification fails the command
    fn report(&self) -> CliResult {
        match self.app().notifier.current() {
            Some(notice) if notice.is_error() => Err(notice.text.clone().into()),
            Some(notice) => {
                println!("{}", notice.text);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

fn connect_api(config: &Config) -> Result<Api, Box<dyn std::error::Error>> {
    let transport = HttpTransport::new(&config.server_url, config.request_timeout())?;
    Ok(Api::new(Arc::new(transport)))
}

/// Show mode, smart settings, slots and presets
pub fn status(config: &Config) -> CliResult {
    let session = Session::connect(config)?;
    let app = session.app();

    println!("Server: {}", config.server_url);
    println!("Mode: {}", app.mode.mode().display_name());
    if let Some(label) = &app.background.virtual_label {
        println!("Virtual background: {}", label);
    }
    println!();
    println!("Smart background:");
    let segmentation = match app.mode.segmentation_available {
        Some(true) => "available",
        Some(false) => "unavailable",
        None => "unknown",
    };
    println!("  Segmentation: {}", segmentation);
    println!("  Type: {}", app.mode.smart_type().display_name());
    println!("  Blur: {}", app.background.blur_amount);
    println!("  Color: {}", app.background.solid_label());
    if let Some(label) = &app.background.smart_label {
        println!("  Scene: {}", label);
    }
    println!();
    print_ranges(app);
    println!();
    println!("Presets: {}", app.profiles.book.len());
    Ok(())
}

pub fn toggle(config: &Config) -> CliResult {
    let mut session = Session::connect(config)?;
    session.apply(Message::ToggleRunning)?;
    println!("{}", session.app().run.badge());
    Ok(())
}

pub fn set_mode(config: &Config, mode: Mode) -> CliResult {
    let mut session = Session::connect(config)?;
    session.apply(Message::SelectMode(mode))?;
    println!("Mode: {}", session.app().mode.mode().display_name());
    Ok(())
}

pub fn set_smart(
    config: &Config,
    smart_type: SmartType,
    blur: Option<u32>,
    color: Option<String>,
) -> CliResult {
    let color = color.map(|value| Rgb::from_hex(&value)).transpose()?;
    let mut session = Session::connect(config)?;
    session.apply(Message::SelectSmartType(smart_type))?;
    if let Some(amount) = blur {
        session.apply(Message::SetBlurAmount(amount))?;
        println!("Blur: {}", session.app().background.blur_amount);
    }
    if let Some(color) = color {
        session.apply(Message::SetSolidColor(color))?;
        println!("Color: {}", session.app().background.solid_label());
    }
    println!("Smart type: {}", session.app().mode.smart_type().display_name());
    Ok(())
}

pub fn set_effect(config: &Config, effect: Effect) -> CliResult {
    let mut session = Session::connect(config)?;
    session.apply(Message::SetEffect(effect))?;
    println!("Effect: {}", session.app().effect);
    Ok(())
}

// =========================================================================
// Color ranges
// =========================================================================

fn print_ranges(app: &AppModel) {
    println!("Color ranges:");
    for chip in app.slots.chips() {
        let Some(range) = app.slots.set().get(chip.index) else {
            continue;
        };
        let marker = if chip.active { "*" } else { " " };
        let bounds: Vec<String> = [
            (HsvBound::HMin, HsvBound::HMax, "H"),
            (HsvBound::SMin, HsvBound::SMax, "S"),
            (HsvBound::VMin, HsvBound::VMax, "V"),
        ]
        .iter()
        .map(|&(min, max, name)| format!("{} {:>3}-{:<3}", name, range.get(min), range.get(max)))
        .collect();
        println!(
            "  {} Slot {}  {}  {}",
            marker,
            chip.index + 1,
            bounds.join("  "),
            chip.swatch.to_hex()
        );
    }
}

/// 1-based slot number to index
fn slot_index(slot: usize) -> Result<usize, Box<dyn std::error::Error>> {
    slot.checked_sub(1)
        .ok_or_else(|| "Slots are numbered from 1".into())
}

pub fn list_ranges(config: &Config) -> CliResult {
    let session = Session::connect(config)?;
    print_ranges(session.app());
    Ok(())
}

pub fn add_range(config: &Config) -> CliResult {
    let mut session = Session::connect(config)?;
    session.apply(Message::AddRange)?;
    print_ranges(session.app());
    Ok(())
}

pub fn select_range(config: &Config, slot: usize) -> CliResult {
    let idx = slot_index(slot)?;
    let mut session = Session::connect(config)?;
    session.apply(Message::SelectRange(idx))?;
    print_ranges(session.app());
    Ok(())
}

pub fn delete_range(config: &Config, slot: usize) -> CliResult {
    let idx = slot_index(slot)?;
    let mut session = Session::connect(config)?;
    session.apply(Message::DeleteRange(idx))?;
    print_ranges(session.app());
    Ok(())
}

pub fn pick(config: &Config, x: f64, y: f64, sensitivity: Option<u8>) -> CliResult {
    let mut session = Session::connect(config)?;
    if let Some(value) = sensitivity {
        session.apply(Message::SetSensitivity(value))?;
    }
    let click = FrameClick {
        client_x: x,
        client_y: y,
        frame: FrameRect {
            left: 0.0,
            top: 0.0,
            width: 1.0,
            height: 1.0,
        },
    };
    cloak_control::app::normalize_click(&click)?;
    session.apply(Message::PickColor(click))?;
    print_ranges(session.app());
    Ok(())
}

// =========================================================================
// Presets
// =========================================================================

pub fn list_profiles(config: &Config) -> CliResult {
    let session = Session::connect(config)?;
    let book = &session.app().profiles.book;
    if book.is_empty() {
        println!("No presets saved.");
        return Ok(());
    }
    for profile in book.iter() {
        println!("  {:<24} {}", profile.name, profile.summary());
    }
    Ok(())
}

pub fn save_profile(config: &Config, name: String) -> CliResult {
    let mut session = Session::connect(config)?;
    session.apply(Message::SetProfileName(name))?;
    session.apply(Message::SaveProfile)
}

pub fn load_profile(config: &Config, name: String) -> CliResult {
    let mut session = Session::connect(config)?;
    session.apply(Message::LoadProfile(name))?;
    print_ranges(session.app());
    println!("Effect: {}", session.app().effect);
    Ok(())
}

pub fn delete_profile(config: &Config, name: String) -> CliResult {
    let mut session = Session::connect(config)?;
    session.apply(Message::DeleteProfile(name.clone()))?;
    println!("Deleted preset: {}", name);
    Ok(())
}

// =========================================================================
// Backgrounds
// =========================================================================

fn scene_target(smart: bool) -> SceneTarget {
    if smart {
        SceneTarget::Smart
    } else {
        SceneTarget::Virtual
    }
}

pub fn scenes(config: &Config, name: Option<String>, smart: bool) -> CliResult {
    let Some(scene) = name else {
        println!("Built-in scenes:");
        for (id, label) in BUILTIN_SCENES {
            println!("  {:<8} {}", id, label);
        }
        return Ok(());
    };
    let mut session = Session::connect(config)?;
    session.apply(Message::SelectScene {
        target: scene_target(smart),
        scene: scene.to_ascii_lowercase(),
    })
}

pub fn upload(config: &Config, file: PathBuf, smart: bool) -> CliResult {
    if !file.is_file() {
        return Err(format!("Not a file: {}", file.display()).into());
    }
    let mut session = Session::connect(config)?;
    session.apply(Message::UploadBackground {
        target: scene_target(smart),
        path: file.clone(),
    })?;

    if let Some(dir) = file.canonicalize().ok().and_then(|p| p.parent().map(PathBuf::from)) {
        if let Err(e) = Config::remember_upload_dir(dir) {
            tracing::warn!(error = %e, "Failed to remember upload directory");
        }
    }
    Ok(())
}

pub fn capture(config: &Config) -> CliResult {
    let mut session = Session::connect(config)?;
    println!("Capturing background... (step out of the frame)");
    session.apply(Message::CaptureBackground)
}

// =========================================================================
// Misc
// =========================================================================

/// Print a timestamped status line every `interval` seconds until Ctrl+C
pub fn watch(config: &Config, interval: u64) -> CliResult {
    let rt = tokio::runtime::Runtime::new()?;
    let api = connect_api(config)?;

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })?;

    println!("Watching {} (press Ctrl+C to stop)", config.server_url);
    let interval = Duration::from_secs(interval.max(1));
    while !stop_flag.load(Ordering::SeqCst) {
        let (background, smart) = rt.block_on(async { tokio::join!(api.bg_status(), api.smart_status()) });
        let timestamp = Local::now().format("%H:%M:%S");
        match (background, smart) {
            (Ok(background), Ok(smart)) => println!(
                "[{}] mode={} virtual_bg={} smart_type={} blur={} segmentation={}",
                timestamp,
                background.bg_mode,
                background.virtual_bg_name.as_deref().unwrap_or("-"),
                smart.smart_bg_type,
                smart
                    .smart_blur_amount
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                smart.mediapipe_available
            ),
            (Err(e), _) | (_, Err(e)) => println!("[{}] {}", timestamp, e.user_message()),
        }

        // Sleep in small steps so Ctrl+C is noticed quickly
        let mut waited = Duration::ZERO;
        while waited < interval && !stop_flag.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(100));
            waited += Duration::from_millis(100);
        }
    }
    println!();
    println!("Stopped.");
    Ok(())
}

pub fn open_server(config: &Config) -> CliResult {
    println!("Opening {}", config.server_url);
    open::that(&config.server_url)?;
    Ok(())
}
