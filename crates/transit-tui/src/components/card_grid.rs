//! CardGrid: one bordered pane per station card, laid out in a grid.
//!
//! Each card shows the direction under its title, four departure slots and
//! a footer with the time of the data it shows. The badge says where that
//! data came from. Until the board's first result lands the whole area is a
//! spinner.

use chrono::{DateTime, Local};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use transit_core::board::Card;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{origin_badge, style_muted, style_secondary, C_DEPARTURE, C_SECONDARY},
    widgets::pane_chrome::{pane_chrome, pane_footer, Badge},
};

const CARD_HEIGHT: u16 = 7;
const CARD_MIN_WIDTH: u16 = 30;
const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub struct CardGrid {
    selected: usize,
    row_offset: usize,
    /// Column count from the last draw; arrow keys move by it.
    columns: usize,
    spinner_frame: usize,
    /// Key of a just-added station to select once its card shows up.
    pending_focus: Option<String>,
}

impl CardGrid {
    pub fn new() -> Self {
        Self {
            selected: 0,
            row_offset: 0,
            columns: 1,
            spinner_frame: 0,
            pending_focus: None,
        }
    }

    fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            return;
        }
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, len as isize - 1) as usize;
    }

    fn draw_card(&self, frame: &mut Frame, area: Rect, card: &Card, selected: bool) {
        let badge = card.origin.map(|o| {
            let (text, color) = origin_badge(o);
            Badge { text, color }
        });
        let block = pane_chrome(&card.title, selected, badge)
            .title_bottom(pane_footer(format_updated(card, Local::now())));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let width = inner.width.saturating_sub(1) as usize;
        let mut lines = vec![Line::from(Span::styled(
            format!(" {}", truncate(&card.subtitle, width)),
            style_secondary(),
        ))];
        for slot in &card.slots {
            lines.push(match slot {
                Some(message) => Line::from(vec![
                    Span::styled("  ▸ ", Style::default().fg(C_SECONDARY)),
                    Span::styled(
                        truncate(message, width.saturating_sub(4)),
                        Style::default().fg(C_DEPARTURE).add_modifier(Modifier::BOLD),
                    ),
                ]),
                None => Line::from(Span::styled("  ·  --", style_muted())),
            });
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Default for CardGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for CardGrid {
    fn id(&self) -> ComponentId {
        ComponentId::CardGrid
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let len = state.cards.len();
        let cols = self.columns.max(1) as isize;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_by(-cols, len),
            KeyCode::Down | KeyCode::Char('j') => self.move_by(cols, len),
            KeyCode::Left | KeyCode::Char('h') => self.move_by(-1, len),
            KeyCode::Right | KeyCode::Char('l') => self.move_by(1, len),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => self.selected = len.saturating_sub(1),
            _ => {}
        }
        vec![]
    }

    fn tick(&mut self, state: &AppState) -> Vec<Action> {
        if state.loading {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
        if let Some(key) = &self.pending_focus {
            if let Some(idx) = state.cards.iter().position(|c| &c.key == key) {
                self.selected = idx;
                self.pending_focus = None;
            }
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::AddStation(selection) = action {
            self.pending_focus = Some(selection.key.clone());
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if state.loading {
            let spinner = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
            let middle = Rect {
                y: area.y + area.height / 2,
                height: 1,
                ..area
            };
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("{} loading departures…", spinner),
                    style_secondary(),
                ))
                .alignment(Alignment::Center),
                middle,
            );
            return;
        }

        if state.cards.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  no stations yet, press a to add one", style_muted())),
                area,
            );
            return;
        }

        let len = state.cards.len();
        self.selected = self.selected.min(len - 1);
        self.columns = ((area.width / CARD_MIN_WIDTH).max(1) as usize).min(len);
        let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;

        let selected_row = self.selected / self.columns;
        if selected_row < self.row_offset {
            self.row_offset = selected_row;
        } else if selected_row >= self.row_offset + visible_rows {
            self.row_offset = selected_row + 1 - visible_rows;
        }

        let col_width = area.width / self.columns as u16;
        let first = self.row_offset * self.columns;
        let last = (first + visible_rows * self.columns).min(len);

        for (idx, card) in state.cards.iter().enumerate().take(last).skip(first) {
            let row = (idx / self.columns - self.row_offset) as u16;
            let col = (idx % self.columns) as u16;
            let y = area.y + row * CARD_HEIGHT;
            let height = CARD_HEIGHT.min(area.y + area.height - y);
            let card_area = Rect {
                x: area.x + col * col_width,
                y,
                width: col_width,
                height,
            };
            self.draw_card(frame, card_area, card, focused && idx == self.selected);
        }
    }
}

/// Footer text: the card's data time in local time, with the date when it is
/// not today.
fn format_updated(card: &Card, now: DateTime<Local>) -> String {
    let Some(raw) = card.last_updated.as_deref() else {
        return "waiting for data".to_string();
    };
    match card.last_updated_at() {
        Some(at) => {
            let local = at.with_timezone(&Local);
            if local.date_naive() == now.date_naive() {
                format!("updated {}", local.format("%H:%M:%S"))
            } else {
                format!("updated {}", local.format("%Y-%m-%d %H:%M"))
            }
        }
        None => format!("updated {}", raw),
    }
}

/// Cut `text` to `width` terminal columns, ending in an ellipsis when cut.
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
