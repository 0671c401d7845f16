// SPDX-License-Identifier: GPL-3.0-only

//! Terminal control surface
//!
//! Renders the controller state with ratatui and turns key presses and mouse
//! clicks into [`Message`]s. Clicking inside the frame pane samples a color
//! at that point of the live video.

use crate::api::Api;
use crate::app::{AppModel, FrameClick, FrameRect, Message, Runtime, SceneTarget};
use crate::config::Config;
use crate::constants::{BLUR_MAX, BLUR_MIN, BUILTIN_SCENES, SOLID_COLOR_PRESETS};
use crate::model::{Effect, HsvBound, Mode, Rgb, SmartType};
use crate::transport::HttpTransport;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Widget},
};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const FRAME_TIME: Duration = Duration::from_millis(16);

/// Run the terminal control surface
pub fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    let transport = HttpTransport::new(&config.server_url, config.request_timeout())?;
    let (app, task) = AppModel::init(config, Api::new(Arc::new(transport)));
    let runtime = Runtime::with_task(app, task);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &rt, runtime);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

/// Text entry in progress
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    None,
    ProfileName,
    UploadPath(String),
}

/// View-only state that the controller does not need
struct Surface {
    bound: usize,
    profile_cursor: ListState,
    scene_cursor: usize,
    input: Input,
    show_help: bool,
    frame_area: Rect,
    quit: bool,
}

impl Surface {
    fn new() -> Self {
        Self {
            bound: 0,
            profile_cursor: ListState::default().with_selected(Some(0)),
            scene_cursor: 0,
            input: Input::None,
            show_help: false,
            frame_area: Rect::default(),
            quit: false,
        }
    }

    fn selected_bound(&self) -> HsvBound {
        HsvBound::ALL[self.bound % HsvBound::ALL.len()]
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    rt: &tokio::runtime::Runtime,
    mut runtime: Runtime,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut surface = Surface::new();
    info!("Terminal surface started");

    while !surface.quit {
        runtime.tick();
        terminal.draw(|f| draw(f, runtime.app(), &mut surface))?;

        // Let requests and timers progress for one frame, then take input
        let wait = if runtime.is_idle() {
            FRAME_TIME
        } else {
            rt.block_on(runtime.pump(FRAME_TIME));
            Duration::ZERO
        };

        if event::poll(wait)? {
            let messages = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(key, runtime.app(), &mut surface)
                }
                Event::Mouse(mouse) => handle_mouse(mouse, &surface),
                _ => Vec::new(),
            };
            // Dispatch needs the tokio context for timers
            let _guard = rt.enter();
            for message in messages {
                runtime.dispatch(message);
            }
        }
    }

    Ok(())
}

// =========================================================================
// Input
// =========================================================================

fn handle_key(key: KeyEvent, app: &AppModel, surface: &mut Surface) -> Vec<Message> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        surface.quit = true;
        return Vec::new();
    }
    match surface.input.clone() {
        Input::ProfileName => return handle_profile_input(key, app, surface),
        Input::UploadPath(path) => return handle_upload_input(key, path, app, surface),
        Input::None => {}
    }

    let step: i16 = if key.modifiers.contains(KeyModifiers::SHIFT) {
        10
    } else {
        1
    };
    let mut messages = Vec::new();
    match key.code {
        KeyCode::Char('q') => surface.quit = true,
        KeyCode::Char('h') | KeyCode::Char('?') => surface.show_help = !surface.show_help,
        KeyCode::Char('r') => messages.push(Message::Sync),

        // Mode and run state
        KeyCode::Char('1') => messages.push(Message::SelectMode(Mode::Invisible)),
        KeyCode::Char('2') => messages.push(Message::SelectMode(Mode::Virtual)),
        KeyCode::Char('3') => messages.push(Message::SelectMode(Mode::Smart)),
        KeyCode::Char(' ') => messages.push(Message::ToggleRunning),
        KeyCode::Char('e') => messages.push(Message::SetEffect(app.effect.next())),
        KeyCode::Char('c') => messages.push(Message::CaptureBackground),

        // HSV sliders of the active slot
        KeyCode::Up => surface.bound = (surface.bound + HsvBound::ALL.len() - 1) % HsvBound::ALL.len(),
        KeyCode::Down => surface.bound = (surface.bound + 1) % HsvBound::ALL.len(),
        KeyCode::Left | KeyCode::Right => {
            let bound = surface.selected_bound();
            let delta = if key.code == KeyCode::Left { -step } else { step };
            let value = (i16::from(app.sliders.get(bound)) + delta).clamp(0, i16::from(bound.max()));
            messages.push(Message::SetHsvBound(bound, value as u8));
        }

        // Slots
        KeyCode::Char('[') | KeyCode::Char(']') => {
            let len = app.slots.set().len();
            if len > 0 {
                let current = app.slots.active_idx();
                let idx = if key.code == KeyCode::Char('[') {
                    (current + len - 1) % len
                } else {
                    (current + 1) % len
                };
                messages.push(Message::SelectRange(idx));
            }
        }
        KeyCode::Char('a') => messages.push(Message::AddRange),
        KeyCode::Char('d') => messages.push(Message::DeleteRange(app.slots.active_idx())),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            messages.push(Message::SetSensitivity(app.sensitivity.saturating_add(1)))
        }
        KeyCode::Char('-') => {
            messages.push(Message::SetSensitivity(app.sensitivity.saturating_sub(1)))
        }

        // Backgrounds
        KeyCode::Char('n') => {
            surface.scene_cursor = (surface.scene_cursor + 1) % BUILTIN_SCENES.len();
            let (scene, _) = BUILTIN_SCENES[surface.scene_cursor];
            messages.push(Message::SelectScene {
                target: panel_target(app),
                scene: scene.to_string(),
            });
        }
        KeyCode::Char('u') => {
            let start = app
                .config
                .last_upload_dir
                .as_ref()
                .map(|dir| format!("{}/", dir.display()))
                .unwrap_or_default();
            surface.input = Input::UploadPath(start);
        }
        KeyCode::Char('s') => {
            let next = match app.mode.smart_type() {
                SmartType::Blur => SmartType::Virtual,
                SmartType::Virtual => SmartType::Solid,
                SmartType::Solid => SmartType::Blur,
            };
            messages.push(Message::SelectSmartType(next));
        }
        KeyCode::Char(',') | KeyCode::Char('.') => {
            let amount = app.background.blur_amount;
            let amount = if key.code == KeyCode::Char(',') {
                amount.saturating_sub(2).max(BLUR_MIN)
            } else {
                (amount + 2).min(BLUR_MAX)
            };
            messages.push(Message::SetBlurAmount(amount));
        }
        KeyCode::Char('p') => {
            let next = app
                .background
                .solid_preset
                .map(|i| (i + 1) % SOLID_COLOR_PRESETS.len())
                .unwrap_or(0);
            messages.push(Message::SelectSolidPreset(next));
        }

        // Presets
        KeyCode::Char('j') | KeyCode::Char('k') => {
            let len = app.profiles.book.len();
            if len > 0 {
                let current = surface.profile_cursor.selected().unwrap_or(0).min(len - 1);
                let next = if key.code == KeyCode::Char('j') {
                    (current + 1) % len
                } else {
                    (current + len - 1) % len
                };
                surface.profile_cursor.select(Some(next));
            }
        }
        KeyCode::Char('P') => surface.input = Input::ProfileName,
        KeyCode::Char('l') | KeyCode::Char('x') => {
            if let Some(name) = selected_profile(app, surface) {
                messages.push(if key.code == KeyCode::Char('l') {
                    Message::LoadProfile(name)
                } else {
                    Message::DeleteProfile(name)
                });
            }
        }

        KeyCode::Char('o') => {
            if let Err(e) = open::that(&app.config.server_url) {
                error!(error = %e, "Failed to open server page");
            }
        }
        _ => {}
    }
    messages
}

fn handle_profile_input(key: KeyEvent, app: &AppModel, surface: &mut Surface) -> Vec<Message> {
    let mut name = app.profiles.name_input.clone();
    match key.code {
        KeyCode::Esc => {
            surface.input = Input::None;
            return Vec::new();
        }
        KeyCode::Enter => {
            surface.input = Input::None;
            return vec![Message::SaveProfile];
        }
        KeyCode::Backspace => {
            name.pop();
        }
        KeyCode::Char(c) => name.push(c),
        _ => return Vec::new(),
    }
    vec![Message::SetProfileName(name)]
}

fn handle_upload_input(
    key: KeyEvent,
    mut path: String,
    app: &AppModel,
    surface: &mut Surface,
) -> Vec<Message> {
    match key.code {
        KeyCode::Esc => surface.input = Input::None,
        KeyCode::Enter => {
            surface.input = Input::None;
            let path = path.trim();
            if !path.is_empty() {
                return vec![Message::UploadBackground {
                    target: panel_target(app),
                    path: PathBuf::from(path),
                }];
            }
        }
        KeyCode::Backspace => {
            path.pop();
            surface.input = Input::UploadPath(path);
        }
        KeyCode::Char(c) => {
            path.push(c);
            surface.input = Input::UploadPath(path);
        }
        _ => {}
    }
    Vec::new()
}

fn handle_mouse(mouse: MouseEvent, surface: &Surface) -> Vec<Message> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return Vec::new();
    }
    // Clicks outside the pane are rejected when normalized
    let area = surface.frame_area;
    // Pointer at the center of the clicked cell
    vec![Message::PickColor(FrameClick {
        client_x: f64::from(mouse.column) + 0.5,
        client_y: f64::from(mouse.row) + 0.5,
        frame: FrameRect {
            left: f64::from(area.x),
            top: f64::from(area.y),
            width: f64::from(area.width),
            height: f64::from(area.height),
        },
    })]
}

/// Scene selections go to the smart panel while in smart mode
fn panel_target(app: &AppModel) -> SceneTarget {
    if app.mode.mode() == Mode::Smart {
        SceneTarget::Smart
    } else {
        SceneTarget::Virtual
    }
}

fn selected_profile(app: &AppModel, surface: &Surface) -> Option<String> {
    let idx = surface.profile_cursor.selected()?;
    app.profiles.book.iter().nth(idx).map(|p| p.name.clone())
}

// =========================================================================
// Drawing
// =========================================================================

fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn draw(f: &mut Frame, app: &AppModel, surface: &mut Surface) {
    let area = f.area();

    // Reserve bottom line for status
    let rows = Layout::vertical([Constraint::Min(10), Constraint::Length(1)]).split(area);
    let columns =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).split(rows[0]);

    let frame_block = Block::default()
        .borders(Borders::ALL)
        .title(" Frame (click to sample) ");
    surface.frame_area = frame_block.inner(columns[0]);
    f.render_widget(frame_block, columns[0]);
    f.render_widget(FramePane { app }, surface.frame_area);

    let controls = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(8),
        Constraint::Length(3),
        Constraint::Length(5),
        Constraint::Min(4),
    ])
    .split(columns[1]);
    draw_header(f, app, controls[0]);
    draw_sliders(f, app, surface, controls[1]);
    draw_chips(f, app, controls[2]);
    draw_panel(f, app, controls[3]);
    draw_profiles(f, app, surface, controls[4]);

    let message = match &surface.input {
        Input::ProfileName => format!("Preset name: {}_", app.profiles.name_input),
        Input::UploadPath(path) => format!("Image path: {}_", path),
        Input::None if surface.show_help => HELP.to_string(),
        Input::None => app
            .notifier
            .text()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}  |  h: help  q: quit", app.config.server_url)),
    };
    let is_error = surface.input == Input::None
        && !surface.show_help
        && app.notifier.current().is_some_and(|n| n.is_error());
    f.render_widget(
        StatusBar {
            message: &message,
            is_error,
        },
        rows[1],
    );
}

const HELP: &str = "1/2/3 mode  space start/stop  ↑↓←→ sliders  [ ] slot  a/d add/del  \
                    +/- sensitivity  e effect  c capture  n scene  u upload  s smart type  \
                    ,/. blur  p color  j/k P l x presets  o open  r resync";

fn draw_header(f: &mut Frame, app: &AppModel, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();
    for (mode, visible) in app.mode.panels() {
        let style = if visible {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", mode.display_name()), style));
        spans.push(Span::raw(" "));
    }
    let badge_style = if app.run.is_running() {
        Style::default().fg(Color::Black).bg(Color::Green)
    } else {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    };
    spans.push(Span::raw("  "));
    spans.push(Span::styled(format!(" {} ", app.run.badge()), badge_style));
    spans.push(Span::raw(format!("  [space] {}", app.run.toggle_label())));
    spans.push(Span::raw(format!("  Effect: {}", app.effect)));

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Cloak Control "));
    f.render_widget(header, area);
}

fn draw_sliders(f: &mut Frame, app: &AppModel, surface: &Surface, area: Rect) {
    let title = format!(
        " Slot {} range  (sensitivity {}) ",
        app.slots.active_idx() + 1,
        app.sensitivity
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Length(1); 6]).split(inner);
    for (i, bound) in HsvBound::ALL.iter().enumerate() {
        let value = app.sliders.get(*bound);
        let focused = i == surface.bound;
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Blue)
        };
        let gauge = Gauge::default()
            .gauge_style(style)
            .ratio(f64::from(value) / f64::from(bound.max()))
            .label(format!("{:<8} {:>3}", bound.label(), value));
        f.render_widget(gauge, rows[i]);
    }
}

fn draw_chips(f: &mut Frame, app: &AppModel, area: Rect) {
    let mut spans = Vec::new();
    for chip in app.slots.chips() {
        let mut style = Style::default().fg(rgb(chip.swatch));
        if chip.active {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        let marker = if chip.active { "◆" } else { "●" };
        spans.push(Span::styled(format!("{} {}", marker, chip.index + 1), style));
        spans.push(Span::raw("  "));
    }
    let deletable = app.slots.chips().first().is_some_and(|c| c.deletable);
    let hint = if deletable { "[a] add  [d] delete" } else { "[a] add" };
    spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
    let chips = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Colors "));
    f.render_widget(chips, area);
}

fn draw_panel(f: &mut Frame, app: &AppModel, area: Rect) {
    let background = &app.background;
    let lines: Vec<Line> = match app.mode.mode() {
        Mode::Invisible => vec![
            Line::from(if background.capturing {
                "Capturing background..."
            } else {
                "[c] capture the empty scene, then step in with the cloak"
            }),
            Line::from("Click the frame to sample the cloak color"),
        ],
        Mode::Virtual => vec![
            Line::from(scene_line(background.virtual_scene.as_deref())),
            Line::from(format!(
                "Selected: {}",
                background.virtual_label.as_deref().unwrap_or("none")
            )),
        ],
        Mode::Smart => {
            let mut lines = vec![Line::from(
                SmartType::ALL
                    .iter()
                    .map(|t| {
                        let style = if app.mode.is_smart_panel_visible(*t) {
                            Style::default().fg(Color::Black).bg(Color::Magenta)
                        } else {
                            Style::default().fg(Color::Gray)
                        };
                        Span::styled(format!(" {} ", t.display_name()), style)
                    })
                    .collect::<Vec<_>>(),
            )];
            if app.mode.segmentation_available == Some(false) {
                lines.push(Line::styled(
                    "Segmentation unavailable on server",
                    Style::default().fg(Color::Red),
                ));
            }
            lines.push(match app.mode.smart_type() {
                SmartType::Blur => Line::from(format!("Blur: {}  [,/.]", background.blur_amount)),
                SmartType::Virtual => Line::from(format!(
                    "{}  Selected: {}",
                    scene_line(background.smart_scene.as_deref()),
                    background.smart_label.as_deref().unwrap_or("none")
                )),
                SmartType::Solid => Line::from(vec![
                    Span::styled("■■ ", Style::default().fg(rgb(background.solid_color))),
                    Span::raw(format!("{}  [p] next preset", background.solid_label())),
                ]),
            });
            lines
        }
    };
    let title = format!(" {} ", app.mode.mode().display_name());
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn scene_line(selected: Option<&str>) -> String {
    BUILTIN_SCENES
        .iter()
        .map(|(id, label)| {
            if Some(*id) == selected {
                format!("[{}]", label)
            } else {
                label.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn draw_profiles(f: &mut Frame, app: &AppModel, surface: &mut Surface, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Presets ");
    if app.profiles.book.is_empty() {
        f.render_widget(
            Paragraph::new(crate::app::ProfileState::EMPTY_PLACEHOLDER).block(block),
            area,
        );
        return;
    }
    let items: Vec<ListItem> = app
        .profiles
        .book
        .iter()
        .map(|p| ListItem::new(format!("{:<20} {}", p.name, p.summary())))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, area, &mut surface.profile_cursor);
}

/// Stand-in for the video: a grid the operator clicks to sample
struct FramePane<'a> {
    app: &'a AppModel,
}

impl Widget for FramePane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let swatch = self
            .app
            .slots
            .set()
            .active()
            .map(|range| rgb(range.swatch()))
            .unwrap_or(Color::DarkGray);
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    let on_grid = (x - area.x) % 8 == 0 || (y - area.y) % 4 == 0;
                    cell.set_char(if on_grid { '·' } else { ' ' });
                    cell.set_fg(Color::DarkGray);
                }
            }
        }
        let caption = format!("Slot {} ", self.app.slots.active_idx() + 1);
        let cy = area.y + area.height / 2;
        let cx = area.x + area.width.saturating_sub(caption.len() as u16 + 2) / 2;
        buf.set_string(cx, cy, &caption, Style::default().fg(Color::White));
        buf.set_string(
            cx + caption.len() as u16,
            cy,
            "██",
            Style::default().fg(swatch),
        );
        let effect = if self.app.effect == Effect::None {
            String::new()
        } else {
            format!("effect: {}", self.app.effect)
        };
        buf.set_string(area.x + 1, area.y + area.height - 1, effect, Style::default().fg(Color::Gray));
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
    is_error: bool,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg = if self.is_error { Color::Red } else { Color::DarkGray };

        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(bg);
            }
        }

        let text: String = self.message.chars().take(area.width as usize).collect();
        buf.set_string(area.x, area.y, text, Style::default().fg(Color::White).bg(bg));
    }
}
