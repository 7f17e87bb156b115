//! App: component-based event loop.
//!
//! - `App` owns the `Session`, every component and the `AppState` they read.
//! - A `tokio::mpsc` channel carries `AppMessage`s in from background tasks
//!   (terminal input and schedule deliveries).
//! - The loop draws a frame, then awaits the next message or tick.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use transit_core::model::{ScheduleDelivery, ScheduleOrigin, StationSelection};
use transit_core::session::{AddOutcome, Session, Startup};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{add_station::AddStation, card_grid::CardGrid, help_overlay::HelpOverlay},
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    Delivery(ScheduleDelivery),
}

pub struct App {
    session: Session,
    state: AppState,

    card_grid: CardGrid,
    add_station: AddStation,
    help_overlay: HelpOverlay,
    toast: ToastManager,

    show_keys_bar: bool,
    should_quit: bool,
}

impl App {
    pub fn new(session: Session, catalog: Vec<StationSelection>) -> Self {
        let state = AppState::new(catalog, session.store_kind());
        Self {
            session,
            state,
            card_grid: CardGrid::new(),
            add_station: AddStation::new(),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            show_keys_bar: true,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self, mut delivery_rx: mpsc::Receiver<ScheduleDelivery>) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Background task: fetch deliveries → AppMessage ────────────────────
        let delivery_tx = tx.clone();
        tokio::spawn(async move {
            while let Some(delivery) = delivery_rx.recv().await {
                if delivery_tx.send(AppMessage::Delivery(delivery)).await.is_err() {
                    break;
                }
            }
        });

        self.bootstrap().await;

        // ── Periodic timers ───────────────────────────────────────────────────
        // Toast expiry + spinner animation.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        let result: anyhow::Result<()> = loop {
            if needs_redraw {
                if let Err(e) = terminal.draw(|f| self.draw(f)) {
                    break Err(e.into());
                }
            }

            if self.should_quit {
                break Ok(());
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg).await;
                    // Drain whatever else is queued before the next frame.
                    while let Ok(next) = rx.try_recv() {
                        needs_redraw |= self.handle_message(next).await;
                    }
                }

                _ = ui_tick.tick() => {
                    self.toast.tick();
                    let tick_actions: Vec<Action> = {
                        let s = &self.state;
                        let mut all = Vec::new();
                        all.extend(self.card_grid.tick(s));
                        all.extend(self.add_station.tick(s));
                        all.extend(self.help_overlay.tick(s));
                        all
                    };
                    for action in tick_actions {
                        self.dispatch(action).await;
                    }
                    needs_redraw = true;
                }
            }
        };

        // ── Teardown ──────────────────────────────────────────────────────────
        info!("[app] shutting down");
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn bootstrap(&mut self) {
        match self.session.bootstrap().await {
            Startup::Restore(list) => {
                self.toast.info(format!("loading {} saved station(s)", list.len()));
            }
            Startup::Seed(default) => {
                self.toast.info(format!("no saved stations, showing {}", default.label));
            }
        }
        self.sync_state();
    }

    /// Returns true when the screen needs a redraw.
    async fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    return false;
                }
                for action in self.handle_key(key) {
                    self.dispatch(action).await;
                }
                true
            }
            AppMessage::Event(Event::Resize(..)) => true,
            AppMessage::Event(_) => false,
            AppMessage::Delivery(delivery) => {
                let outcome = self.session.on_delivery(&delivery);
                if outcome.first_of_session {
                    debug!("[app] first schedule applied, board ready");
                }
                if delivery.origin == ScheduleOrigin::Fallback {
                    self.toast.warning(format!(
                        "offline: no live data for {}",
                        delivery.result.label
                    ));
                }
                self.sync_state();
                true
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // Open overlays capture every key.
        if self.add_station.visible {
            return self.add_station.handle_key(key, &self.state);
        }
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Char('q') => vec![Action::Quit],
            KeyCode::Char('?') => vec![Action::ToggleHelp],
            KeyCode::Char('r') => vec![Action::Refresh],
            KeyCode::Char('a') => vec![Action::OpenAdd],
            KeyCode::Char('K') => vec![Action::ToggleKeys],
            _ => self.card_grid.handle_key(key, &self.state),
        }
    }

    async fn dispatch(&mut self, action: Action) {
        // Every component sees the action first.
        let secondary: Vec<Action> = {
            let s = &self.state;
            let components: [&mut dyn Component; 3] = [
                &mut self.card_grid,
                &mut self.add_station,
                &mut self.help_overlay,
            ];
            let mut out = Vec::new();
            for component in components {
                let produced = component.on_action(&action, s);
                if !produced.is_empty() {
                    trace!("[app] {:?} produced {:?}", component.id(), produced);
                }
                out.extend(produced);
            }
            out
        };

        self.apply_action(action).await;

        // Secondary actions are applied one level deep only.
        for a in secondary {
            self.apply_action(a).await;
        }
    }

    async fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            Action::Refresh => {
                let started = self.session.refresh();
                self.state.last_refresh = Some(chrono::Local::now());
                self.toast.info(format!("refreshing {} station(s)", started));
            }
            Action::OpenAdd => {
                self.state.input_mode = InputMode::Add;
            }
            Action::CloseAdd => {
                self.state.input_mode = InputMode::Normal;
            }
            Action::AddStation(selection) => {
                let label = selection.label.clone();
                match self.session.add_station(selection).await {
                    AddOutcome::Added => self.toast.success(format!("added {}", label)),
                    AddOutcome::AlreadySelected => {
                        self.toast.info(format!("{} is already on the board", label))
                    }
                }
                self.sync_state();
            }
            Action::ToggleHelp => {}
            Action::ToggleKeys => {
                self.show_keys_bar = !self.show_keys_bar;
            }
            Action::Quit => {
                self.should_quit = true;
            }
        }
    }

    /// Copy what components need out of the session.
    fn sync_state(&mut self) {
        let board = self.session.board();
        self.state.cards = board.cards().to_vec();
        self.state.loading = board.is_loading();
        self.state.selected_keys = self
            .session
            .selections()
            .iter()
            .map(|s| s.key.clone())
            .collect();
    }

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;
        let area = frame.area();

        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        let status_h = if self.show_keys_bar { 1u16 } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(status_h),
            ])
            .split(area);

        let last_refresh = self
            .state
            .last_refresh
            .map(|t| t.format("%H:%M:%S").to_string());
        status_bar::draw_header(
            frame,
            outer[0],
            self.state.selected_keys.len(),
            self.state.store_kind,
            last_refresh.as_deref(),
        );

        let grid_focused = !self.add_station.visible && !self.help_overlay.visible;
        self.card_grid.draw(frame, outer[1], grid_focused, &self.state);

        if self.show_keys_bar {
            status_bar::draw_keys_bar(frame, outer[2], self.state.input_mode);
        }

        // ── Overlays (on top of everything) ───────────────────────────────────
        self.add_station
            .draw(frame, area, self.focused() == ComponentId::AddStation, &self.state);
        self.help_overlay.draw(frame, area, false, &self.state);

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }

    fn focused(&self) -> ComponentId {
        if self.add_station.visible {
            ComponentId::AddStation
        } else if self.help_overlay.visible {
            ComponentId::HelpOverlay
        } else {
            ComponentId::CardGrid
        }
    }
}
