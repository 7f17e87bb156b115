//! AddStation component: overlay listing the station catalog.
//!
//! Typing narrows the list; Enter adds the highlighted station and closes the
//! dialog, Esc closes it without changes. Stations already on the board stay
//! listed but are marked.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use transit_core::model::{split_label, StationSelection};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::help_overlay::centered_rect,
    theme::{style_default, style_muted, style_selected_focused, C_OVERLAY_BG, C_SECONDARY},
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::pane_chrome,
        scrollable_list::ScrollableList,
    },
};

pub struct AddStation {
    pub visible: bool,
    list: ScrollableList<StationSelection>,
    filter_input: FilterInput,
}

impl AddStation {
    pub fn new() -> Self {
        Self {
            visible: false,
            list: ScrollableList::new(station_matches),
            filter_input: FilterInput::default(),
        }
    }

    fn open(&mut self, catalog: &[StationSelection]) {
        self.filter_input.clear();
        self.list.set_items(catalog.to_vec());
        self.list.set_filter("");
        self.list.select_first();
        self.visible = true;
    }

    #[cfg(test)]
    fn highlighted(&self) -> Option<&StationSelection> {
        self.list.selected_item()
    }
}

impl Default for AddStation {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for AddStation {
    fn id(&self) -> ComponentId {
        ComponentId::AddStation
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Up => self.list.select_up(1),
            KeyCode::Down => self.list.select_down(1),
            KeyCode::Char('p') if ctrl => self.list.select_up(1),
            KeyCode::Char('n') if ctrl => self.list.select_down(1),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End => self.list.select_last(),
            _ => match self.filter_input.handle_key(key) {
                FilterAction::Changed(query) => self.list.set_filter(&query),
                FilterAction::Confirmed => {
                    return match self.list.selected_item() {
                        Some(selection) => {
                            vec![Action::AddStation(selection.clone()), Action::CloseAdd]
                        }
                        None => vec![Action::CloseAdd],
                    };
                }
                FilterAction::Cancelled => return vec![Action::CloseAdd],
            },
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        match action {
            Action::OpenAdd => self.open(&state.catalog),
            Action::CloseAdd => self.visible = false,
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !self.visible {
            return;
        }

        let height = (self.list.len() as u16 + 3).clamp(6, area.height.saturating_sub(4).max(6));
        let popup = centered_rect(70, height, area);
        frame.render_widget(Clear, popup);

        let block = pane_chrome("add station", true, None).style(Style::default().bg(C_OVERLAY_BG));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);
        if inner.height == 0 {
            return;
        }

        let list_area = Rect {
            height: inner.height.saturating_sub(1),
            ..inner
        };
        let filter_area = Rect {
            y: inner.y + inner.height - 1,
            height: 1,
            ..inner
        };

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  no station matches", style_muted())),
                list_area,
            );
        } else {
            let rows = list_area.height as usize;
            self.list.ensure_visible(rows);
            let sel_in_view = self.list.selected_in_view(rows);
            let lines: Vec<Line> = self
                .list
                .visible_items(rows)
                .into_iter()
                .enumerate()
                .map(|(row, station)| {
                    render_row(station, row == sel_in_view, state.is_selected(&station.key))
                })
                .collect();
            frame.render_widget(Paragraph::new(lines), list_area);
        }

        self.filter_input.draw(frame, filter_area);
    }
}

fn render_row(station: &StationSelection, highlighted: bool, on_board: bool) -> Line<'_> {
    let (name, direction) = split_label(&station.label);
    let base = if highlighted {
        style_selected_focused()
    } else {
        style_default()
    };
    let mut spans = vec![
        Span::styled(if highlighted { " ▶ " } else { "   " }, base),
        Span::styled(name, base.add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {}", direction), base.fg(C_SECONDARY)),
    ];
    if on_board {
        spans.push(Span::styled("  ✓ on board", style_muted()));
    }
    Line::from(spans)
}

/// Every whitespace-separated word of the query must appear in the label or
/// key, case-insensitively.
fn station_matches(station: &StationSelection, query: &str) -> bool {
    let haystack = format!("{} {}", station.label, station.key).to_lowercase();
    query
        .split_whitespace()
        .all(|word| haystack.contains(&word.to_lowercase()))
}
