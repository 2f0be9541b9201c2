// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Mouse input paints obstacles and places routing points; keys switch modes, drive zoom and
//! fullscreen, and call the floor-plan service. The state itself lives in [`Editor`],
//! [`LayoutEngine`] and [`PathOverlay`]; this module translates terminal events into their
//! operations and draws snapshots of the result.

use std::{
    error::Error,
    io,
    path::Path,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tokio::runtime::Handle;

use crate::config::Config;
use crate::floorplan::{self, GridSuggestion};
use crate::layout::{ContainerSize, LayoutEngine, LayoutMode, Viewport};
use crate::model::{CellPos, Grid, RealExtent};
use crate::ops::{EditError, EditMode, Editor, EditorEvent, GridSource, ProductDraft};
use crate::render::{cell_mark, truncate_with_ellipsis, CellMark, PathOverlay, RenderSpeed};
use crate::service::{
    Backend, Endpoint, GridPayload, GridSummary, PathRequest, ProductPayload, RequestDispatcher,
    ServiceError, ServiceReply, ServiceResult,
};

mod theme;

use theme::TuiTheme;

const SIDEBAR_WIDTH: u16 = 32;
const TOAST_TTL: Duration = Duration::from_secs(3);
const IDLE_POLL: Duration = Duration::from_millis(250);
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND: &str = "floorgrid";
const SCROLL_STEP: isize = 2;

/// Startup inputs for [`run`].
pub struct RunOptions {
    pub config: Config,
    pub backend: Arc<dyn Backend>,
    /// Stored grid to load on startup.
    pub grid_id: Option<String>,
    /// Blank grid to start with instead of the configured default.
    pub grid_size: Option<(usize, usize)>,
    /// Start from the built-in warehouse floor.
    pub demo: bool,
}

/// Runs the interactive terminal UI until the user quits.
///
/// Service calls are spawned on `runtime`; this function blocks the calling thread.
pub fn run(options: RunOptions, runtime: Handle) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let grid = if options.demo {
        crate::model::fixtures::warehouse()?
    } else {
        let extent =
            RealExtent::new(options.config.editor.default_width_m, options.config.editor.default_length_m)?;
        Grid::new(DEFAULT_ROWS, DEFAULT_COLUMNS, extent)?
    };
    let dispatcher = RequestDispatcher::new(options.backend, runtime);
    let mut app = App::new(options.config, grid, dispatcher, theme);
    if let Some((rows, columns)) = options.grid_size {
        app.create_grid(rows, columns, None);
    }
    if let Some(grid_id) = options.grid_id {
        app.request_load(grid_id);
    }

    let mut terminal = TerminalSession::new()?;
    app.resize_now(terminal.size()?);

    while !app.should_quit {
        app.pump(Instant::now());
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(width, height) => {
                    app.on_terminal_resize(Rect::new(0, 0, width, height), Instant::now());
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();
    let regions = screen_regions(area, app.layout.mode());

    let grid_block = match app.layout.mode() {
        LayoutMode::Normal => Some(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(mode_color(app.editor.mode())))
                .title(grid_title(app)),
        ),
        LayoutMode::Fullscreen => None,
    };
    if let Some(block) = grid_block {
        frame.render_widget(block, regions.grid_frame);
    }
    let viewport = app.layout.viewport(regions.grid.width, regions.grid.height);
    frame.render_widget(
        GridView {
            editor: &app.editor,
            overlay: &app.overlay,
            viewport,
            theme: &app.theme,
        },
        regions.grid,
    );

    if let Some(sidebar) = regions.sidebar {
        let stats = Paragraph::new(sidebar_lines(app))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Floor plan"));
        frame.render_widget(stats, sidebar);
    }

    let toast_suffix = match app.toast.as_ref() {
        Some(toast) if toast.expires_at > Instant::now() => format!(" | {}", toast.message),
        Some(_) => {
            app.toast = None;
            String::new()
        }
        None => String::new(),
    };

    if let Some(prompt) = app.prompt.as_ref() {
        let line = prompt_line(prompt);
        let cursor_x = regions
            .status
            .x
            .saturating_add(line.width() as u16)
            .min(regions.status.x.saturating_add(regions.status.width.saturating_sub(1)));
        frame.render_widget(Paragraph::new(line), regions.status);
        frame.set_cursor(cursor_x, regions.status.y);
    } else {
        frame.render_widget(Paragraph::new(footer_help_line(app, &toast_suffix)), regions.status);
        let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
        frame.render_widget(brand, regions.status);
    }

    if let Some(picker) = app.picker.as_mut() {
        render_picker(frame, picker, regions.main);
    }
    if app.show_help {
        render_help(frame, regions.main);
    }
}

// Panel, footer, picker and help rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    NewGrid,
    ImportImage,
    Product { pos: CellPos },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Prompt {
    kind: PromptKind,
    input: String,
}

#[derive(Debug, Clone)]
struct GridPicker {
    grids: Vec<GridSummary>,
    state: ListState,
}

impl GridPicker {
    fn new(grids: Vec<GridSummary>) -> Self {
        let mut state = ListState::default();
        state.select((!grids.is_empty()).then_some(0));
        Self { grids, state }
    }

    fn selected(&self) -> Option<&GridSummary> {
        self.state.selected().and_then(|idx| self.grids.get(idx))
    }

    fn move_selection(&mut self, delta: isize) {
        if self.grids.is_empty() {
            return;
        }
        let current = self.state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(self.grids.len() - 1);
        self.state.select(Some(next));
    }

    fn remove(&mut self, grid_id: &str) {
        self.grids.retain(|grid| grid.id != grid_id);
        let selected = self.state.selected().map(|idx| idx.min(self.grids.len().saturating_sub(1)));
        self.state.select(selected.filter(|_| !self.grids.is_empty()));
    }
}

/// Suggested grid waiting for its image upload to finish.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingImport {
    suggestion: GridSuggestion,
    width_px: u32,
    height_px: u32,
}

/// Grid-area geometry shared by drawing and pointer hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenRegions {
    main: Rect,
    grid_frame: Rect,
    grid: Rect,
    sidebar: Option<Rect>,
    status: Rect,
}

fn screen_regions(area: Rect, mode: LayoutMode) -> ScreenRegions {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let (main, status) = (rows[0], rows[1]);
    match mode {
        LayoutMode::Fullscreen => {
            ScreenRegions { main, grid_frame: main, grid: main, sidebar: None, status }
        }
        LayoutMode::Normal => {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)])
                .split(main);
            let grid_frame = panes[0];
            let grid = Block::default().borders(Borders::ALL).inner(grid_frame);
            ScreenRegions { main, grid_frame, grid, sidebar: Some(panes[1]), status }
        }
    }
}

struct App {
    config: Config,
    editor: Editor,
    layout: LayoutEngine,
    overlay: PathOverlay,
    dispatcher: RequestDispatcher,
    theme: TuiTheme,
    screen: Rect,
    cursor: Option<CellPos>,
    toast: Option<Toast>,
    prompt: Option<Prompt>,
    picker: Option<GridPicker>,
    pending_import: Option<PendingImport>,
    route_after_save: bool,
    saving: Option<Vec<Vec<u8>>>,
    /// Pixel size of the floor plan behind the grid; the image itself is not drawn.
    plan_size: Option<(String, u32, u32)>,
    last_tick: Instant,
    show_help: bool,
    should_quit: bool,
}

impl App {
    fn new(config: Config, grid: Grid, dispatcher: RequestDispatcher, theme: TuiTheme) -> Self {
        let layout = LayoutEngine::new(config.layout.clone(), grid.rows(), grid.columns());
        let overlay = PathOverlay::new(&config.render);
        let editor = Editor::new(config.editor.clone(), grid);
        Self {
            config,
            editor,
            layout,
            overlay,
            dispatcher,
            theme,
            screen: Rect::default(),
            cursor: None,
            toast: None,
            prompt: None,
            picker: None,
            pending_import: None,
            route_after_save: false,
            saving: None,
            plan_size: None,
            last_tick: Instant::now(),
            show_help: false,
            should_quit: false,
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast { message: message.into(), expires_at: Instant::now() + TOAST_TTL });
    }

    fn report(&mut self, result: Result<bool, EditError>) {
        if let Err(err) = result {
            self.set_toast(err.to_string());
        }
    }

    fn service_failed(&mut self, err: &ServiceError) {
        if err.is_retryable() {
            self.set_toast(format!("{err} (retry?)"));
        } else {
            self.set_toast(err.to_string());
        }
    }

    fn regions(&self) -> ScreenRegions {
        screen_regions(self.screen, self.layout.mode())
    }

    fn container_for(&self, area: Rect) -> ContainerSize {
        let layout = self.layout.config();
        ContainerSize::new(
            u32::from(area.width) * layout.glyph_width_px,
            u32::from(area.height) * layout.glyph_height_px,
        )
    }

    /// Applies a terminal size without debouncing (startup and mode switches).
    fn resize_now(&mut self, screen: Rect) {
        self.screen = screen;
        let container = self.container_for(self.regions().grid);
        self.layout.set_container(container);
    }

    fn on_terminal_resize(&mut self, screen: Rect, now: Instant) {
        self.screen = screen;
        let container = self.container_for(self.regions().grid);
        self.layout.on_resize(container, now);
    }

    /// Per-iteration housekeeping: service replies, editor events, settled resizes, animation.
    fn pump(&mut self, now: Instant) {
        for reply in self.dispatcher.drain() {
            self.handle_reply(reply);
        }
        self.sync_editor_events();
        self.layout.poll(now);
        if self.layout.take_fullscreen_advisory() {
            self.set_toast("Large grid: press f for fullscreen");
        }
        let tick = Duration::from_millis(self.config.render.tick_ms);
        if self.overlay.is_animating() && now.duration_since(self.last_tick) >= tick {
            self.overlay.tick();
            self.last_tick = now;
        }
    }

    fn poll_timeout(&self, now: Instant) -> Duration {
        let mut timeout = IDLE_POLL;
        if self.overlay.is_animating() {
            let tick = Duration::from_millis(self.config.render.tick_ms);
            timeout = timeout.min(tick.saturating_sub(now.duration_since(self.last_tick)));
        }
        if let Some(remaining) = self.layout.resize_pending_for(now) {
            timeout = timeout.min(remaining);
        }
        if self.dispatcher.in_flight() > 0 {
            timeout = timeout.min(Duration::from_millis(50));
        }
        timeout
    }

    fn sync_editor_events(&mut self) {
        for event in self.editor.drain_events() {
            self.overlay.on_editor_event(&event, &self.editor);
            if let EditorEvent::GridReplaced { rows, columns } = event {
                self.layout.load_grid(rows, columns);
                self.cursor = None;
                self.route_after_save = false;
                self.saving = None;
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        self.handle_key_code(key.code);
    }

    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.prompt.is_some() {
            return self.handle_prompt_key(code);
        }
        if self.picker.is_some() {
            return self.handle_picker_key(code);
        }
        if self.show_help {
            if matches!(code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return true;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('s') => self.toggle_mode(EditMode::SetStart),
            KeyCode::Char('e') => self.toggle_mode(EditMode::SetEnd),
            KeyCode::Char('p') => self.toggle_mode(EditMode::SetPickup),
            KeyCode::Char('o') => self.toggle_mode(EditMode::PaintObstacle),
            KeyCode::Char('c') => self.toggle_mode(EditMode::PaintClear),
            KeyCode::Esc => {
                self.editor.set_mode(EditMode::None);
            }
            KeyCode::Char('x') => {
                if self.editor.clear_all_points() {
                    self.set_toast("Routing points cleared");
                }
            }
            KeyCode::Char('X') => {
                let cleared = self.editor.clear_obstacles();
                self.set_toast(format!("Cleared {cleared} obstacle cells"));
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.layout.zoom_in();
            }
            KeyCode::Char('-') => {
                self.layout.zoom_out();
            }
            KeyCode::Char('0') => {
                self.layout.fit_to_screen();
            }
            KeyCode::Char('f') => self.toggle_fullscreen(),
            KeyCode::Char('r') => {
                let speed = self.overlay.speed().toggled();
                self.overlay.set_speed(speed);
                self.set_toast(format!("Path rendering: {}", speed_label(speed)));
            }
            KeyCode::Left => self.scroll(-SCROLL_STEP, 0),
            KeyCode::Right => self.scroll(SCROLL_STEP, 0),
            KeyCode::Up => self.scroll(0, -SCROLL_STEP),
            KeyCode::Down => self.scroll(0, SCROLL_STEP),
            KeyCode::Enter => self.find_path(),
            KeyCode::Char('w') => self.save_grid(),
            KeyCode::Char('l') => self.list_grids(),
            KeyCode::Char('n') => self.open_prompt(PromptKind::NewGrid),
            KeyCode::Char('i') => self.open_prompt(PromptKind::ImportImage),
            KeyCode::Char('a') => match self.cursor {
                Some(pos) => self.open_prompt(PromptKind::Product { pos }),
                None => self.set_toast("Click a cell first"),
            },
            _ => return false,
        }
        true
    }

    fn toggle_mode(&mut self, mode: EditMode) {
        let next = if self.editor.mode() == mode { EditMode::None } else { mode };
        self.editor.set_mode(next);
    }

    fn toggle_fullscreen(&mut self) {
        self.layout.toggle_fullscreen();
        let screen = self.screen;
        self.resize_now(screen);
    }

    fn scroll(&mut self, dx: isize, dy: isize) {
        let grid = self.regions().grid;
        self.layout.scroll_by(dx, dy, grid.width, grid.height);
    }

    fn hit_test(&mut self, column: u16, row: u16) -> Option<CellPos> {
        let grid = self.regions().grid;
        let inside = column >= grid.x
            && row >= grid.y
            && column < grid.x.saturating_add(grid.width)
            && row < grid.y.saturating_add(grid.height);
        if !inside {
            return None;
        }
        self.layout.viewport(grid.width, grid.height).cell_at(column - grid.x, row - grid.y)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.prompt.is_some() || self.picker.is_some() || self.show_help {
            return;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(pos) = self.hit_test(mouse.column, mouse.row) {
                    self.cursor = Some(pos);
                    let result = self.editor.pointer_down(pos);
                    self.report(result);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(pos) = self.hit_test(mouse.column, mouse.row) {
                    let result = self.editor.pointer_enter(pos);
                    self.report(result);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.editor.pointer_up();
            }
            MouseEventKind::ScrollDown => self.scroll(0, SCROLL_STEP),
            MouseEventKind::ScrollUp => self.scroll(0, -SCROLL_STEP),
            MouseEventKind::ScrollRight => self.scroll(SCROLL_STEP, 0),
            MouseEventKind::ScrollLeft => self.scroll(-SCROLL_STEP, 0),
            _ => {}
        }
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt = Some(Prompt { kind, input: String::new() });
    }

    fn handle_prompt_key(&mut self, code: KeyCode) -> bool {
        let Some(prompt) = self.prompt.as_mut() else {
            return false;
        };
        match code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Char(ch) => prompt.input.push(ch),
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    self.submit_prompt(prompt);
                }
            }
            _ => return false,
        }
        true
    }

    fn submit_prompt(&mut self, prompt: Prompt) {
        let input = prompt.input.trim();
        match prompt.kind {
            PromptKind::NewGrid => match parse_grid_spec(input) {
                Ok((rows, columns, extent)) => self.create_grid(rows, columns, extent),
                Err(message) => self.set_toast(message),
            },
            PromptKind::ImportImage => self.import_image(Path::new(input)),
            PromptKind::Product { pos } => self.save_product(pos, input),
        }
    }

    /// Blank grid from user-entered dimensions; the extent defaults to the configured size.
    fn create_grid(&mut self, rows: usize, columns: usize, extent: Option<(f64, f64)>) {
        let (width, length) = extent
            .unwrap_or((self.config.editor.default_width_m, self.config.editor.default_length_m));
        let result = RealExtent::new(width, length)
            .map_err(EditError::from)
            .and_then(|extent| self.editor.initialize_grid(rows, columns, extent, GridSource::Manual));
        match result {
            Ok(()) => self.set_toast(format!("New {rows}x{columns} grid")),
            Err(err) => self.set_toast(err.to_string()),
        }
    }

    fn import_image(&mut self, path: &Path) {
        if self.dispatcher.is_pending(Endpoint::UploadImage) {
            self.set_toast("An image upload is already running");
            return;
        }
        let upload = match floorplan::prepare_upload(path, &self.config.image) {
            Ok(upload) => upload,
            Err(err) => {
                self.set_toast(err.to_string());
                return;
            }
        };
        let suggestion = match floorplan::suggest_grid(upload.width, upload.height, &self.config.image)
        {
            Ok(suggestion) => suggestion,
            Err(err) => {
                self.set_toast(err.to_string());
                return;
            }
        };
        self.pending_import =
            Some(PendingImport { suggestion, width_px: upload.width, height_px: upload.height });
        self.dispatcher.upload_image(self.editor.generation(), upload.file_name, upload.bytes);
        self.set_toast("Uploading floor plan…");
    }

    fn save_product(&mut self, pos: CellPos, input: &str) {
        let placement = ProductDraft::parse(input)
            .map_err(|err| err.to_string())
            .and_then(|draft| {
                self.editor.product_placement(pos, draft).map_err(|err| err.to_string())
            });
        match placement {
            Ok(placement) => {
                self.dispatcher
                    .save_product(self.editor.generation(), ProductPayload::from(&placement));
            }
            Err(message) => self.set_toast(message),
        }
    }

    fn save_grid(&mut self) {
        if self.dispatcher.is_pending(Endpoint::SaveGrid) {
            self.set_toast("Save already running");
            return;
        }
        let payload = GridPayload::from_grid(self.editor.grid());
        self.saving = Some(payload.grid.clone());
        self.dispatcher.save_grid(self.editor.generation(), payload);
    }

    /// Routes between the current points, saving the grid first when the service has not seen
    /// its latest state.
    fn find_path(&mut self) {
        if self.dispatcher.is_pending(Endpoint::FindPath) || self.route_after_save {
            self.set_toast("Pathfinding already running");
            return;
        }
        if self.editor.points().start().is_none() {
            self.set_toast("Select a start point first");
            return;
        }
        if self.editor.points().end().is_none() {
            self.set_toast("Select an end point first");
            return;
        }
        if self.editor.needs_save() {
            self.route_after_save = true;
            self.save_grid();
            return;
        }
        self.request_path();
    }

    fn request_path(&mut self) {
        match self.editor.path_request(None) {
            Ok(query) => {
                self.dispatcher.find_path(
                    self.editor.generation(),
                    query.route_epoch,
                    PathRequest::from(&query),
                );
                self.set_toast("Finding path…");
            }
            Err(err) => self.set_toast(err.to_string()),
        }
    }

    fn list_grids(&mut self) {
        if !self.dispatcher.is_pending(Endpoint::ListGrids) {
            self.dispatcher.list_grids(self.editor.generation());
        }
    }

    fn request_load(&mut self, grid_id: String) {
        self.dispatcher.load_grid(self.editor.generation(), grid_id);
    }

    fn handle_picker_key(&mut self, code: KeyCode) -> bool {
        let Some(picker) = self.picker.as_mut() else {
            return false;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.picker = None,
            KeyCode::Up | KeyCode::Char('k') => picker.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => picker.move_selection(1),
            KeyCode::Enter => {
                let selected = picker.selected().map(|grid| grid.id.clone());
                if let Some(grid_id) = selected {
                    self.picker = None;
                    self.request_load(grid_id);
                }
            }
            KeyCode::Char('d') => {
                let selected = picker.selected().map(|grid| grid.id.clone());
                if let Some(grid_id) = selected {
                    self.dispatcher.delete_grid(self.editor.generation(), grid_id);
                }
            }
            _ => return false,
        }
        true
    }

    fn handle_reply(&mut self, reply: ServiceReply) {
        let endpoint = reply.result.endpoint();
        let stale = reply.generation != self.editor.generation();
        let generation_free =
            matches!(reply.result, ServiceResult::GridsListed(_) | ServiceResult::GridDeleted { .. });
        if stale && !generation_free {
            tracing::warn!(
                %endpoint,
                issued = reply.generation,
                current = self.editor.generation(),
                "discarding reply for a replaced grid"
            );
            if endpoint == Endpoint::UploadImage {
                self.pending_import = None;
            }
            return;
        }

        match reply.result {
            ServiceResult::GridSaved(result) => {
                let snapshot = self.saving.take();
                match result {
                    Ok(doc) => {
                        let saved = snapshot.unwrap_or_else(|| doc.grid.clone());
                        self.editor.confirm_save(doc.id.clone(), &saved);
                        self.set_toast(format!("Saved grid {}", doc.id));
                        if std::mem::take(&mut self.route_after_save) {
                            self.request_path();
                        }
                    }
                    Err(err) => {
                        self.route_after_save = false;
                        self.service_failed(&err);
                    }
                }
            }
            ServiceResult::GridsListed(result) => match result {
                Ok(grids) if grids.is_empty() => self.set_toast("No saved grids"),
                Ok(grids) => {
                    self.picker =
                        Some(GridPicker::new(grids.iter().map(|doc| doc.summary()).collect()));
                }
                Err(err) => self.service_failed(&err),
            },
            ServiceResult::GridLoaded(result) => match result {
                Ok(doc) => match self.editor.load_document(&doc) {
                    Ok(()) => {
                        if let Some(image_id) = doc.image_id.clone() {
                            self.dispatcher.fetch_image(self.editor.generation(), image_id);
                        }
                        self.set_toast(format!("Loaded grid {}", doc.id));
                    }
                    Err(err) => self.set_toast(format!("Stored grid {} is invalid: {err}", doc.id)),
                },
                Err(err) => self.service_failed(&err),
            },
            ServiceResult::GridDeleted { grid_id, result } => match result {
                Ok(_) => {
                    if let Some(picker) = self.picker.as_mut() {
                        picker.remove(&grid_id);
                    }
                    if self.editor.grid_id() == Some(grid_id.as_str()) {
                        self.editor.mark_unsaved();
                    }
                    self.set_toast(format!("Deleted grid {grid_id}"));
                }
                Err(err) => self.service_failed(&err),
            },
            ServiceResult::ImageUploaded(result) => {
                let pending = self.pending_import.take();
                match (result, pending) {
                    (Ok(response), Some(import)) => self.apply_import(response.image_id, import),
                    (Ok(_), None) => tracing::warn!("image upload finished without a pending import"),
                    (Err(err), _) => self.service_failed(&err),
                }
            }
            ServiceResult::ImageFetched { image_id, result } => {
                match result.map_err(|err| err.to_string()).and_then(|bytes| {
                    floorplan::probe_dimensions(&bytes).map_err(|err| err.to_string())
                }) {
                    Ok((width, height)) => self.plan_size = Some((image_id, width, height)),
                    Err(message) => self.set_toast(format!("Background image: {message}")),
                }
            }
            ServiceResult::PathFound { route_epoch, result } => match result {
                Ok(response) => match self.editor.apply_path_for(
                    route_epoch,
                    response.cells(),
                    response.metrics(),
                ) {
                    Ok(false) => {
                        self.set_toast("Points or obstacles changed; press Enter to route again");
                    }
                    Ok(true) => {
                        let stats = self.editor.stats();
                        self.set_toast(format!(
                            "Path: {} cells, {:.1} m",
                            stats.path_cells, stats.path_distance_m
                        ));
                    }
                    Err(err) => self.set_toast(err.to_string()),
                },
                Err(err) => self.service_failed(&err),
            },
            ServiceResult::ProductSaved(result) => match result {
                Ok(confirmation) if confirmation.message.is_empty() => {
                    self.set_toast("Product saved");
                }
                Ok(confirmation) => self.set_toast(confirmation.message),
                Err(err) => self.service_failed(&err),
            },
        }
    }

    fn apply_import(&mut self, image_id: String, import: PendingImport) {
        let suggestion = import.suggestion;
        let result = suggestion.extent().map_err(EditError::from).and_then(|extent| {
            self.editor.initialize_grid(
                suggestion.rows,
                suggestion.columns,
                extent,
                GridSource::Suggested,
            )
        });
        match result {
            Ok(()) => {
                self.editor.set_background_image(Some(image_id.clone()));
                self.plan_size = Some((image_id, import.width_px, import.height_px));
                self.set_toast(format!(
                    "Grid {}x{} suggested from a {}x{} px plan",
                    suggestion.rows, suggestion.columns, import.width_px, import.height_px
                ));
            }
            Err(err) => self.set_toast(err.to_string()),
        }
    }
}

const DEFAULT_ROWS: usize = 20;
const DEFAULT_COLUMNS: usize = 20;

/// Parses `rows columns [width_m length_m]`; `x` may separate the numbers.
fn parse_grid_spec(input: &str) -> Result<(usize, usize, Option<(f64, f64)>), String> {
    let parts = input
        .split(|ch: char| ch.is_whitespace() || ch == 'x' || ch == ',')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();
    let dimension = |raw: &str, name: &str| {
        raw.parse::<usize>().map_err(|_| format!("{name} must be a whole number (got {raw:?})"))
    };
    let meters = |raw: &str, name: &str| {
        raw.parse::<f64>().map_err(|_| format!("{name} must be a number of meters (got {raw:?})"))
    };
    match parts.as_slice() {
        [rows, columns] => Ok((dimension(rows, "rows")?, dimension(columns, "columns")?, None)),
        [rows, columns, width, length] => Ok((
            dimension(rows, "rows")?,
            dimension(columns, "columns")?,
            Some((meters(width, "width")?, meters(length, "length")?)),
        )),
        _ => Err("expected: rows columns [width_m length_m]".to_owned()),
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn size(&self) -> io::Result<Rect> {
        self.terminal.size()
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}
