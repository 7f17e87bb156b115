//! FilterInput: wraps tui-input for the type-to-filter line of the add dialog.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_FILTER_BG, C_FILTER_FG, C_MUTED};

pub enum FilterAction {
    Changed(String),
    Confirmed,
    Cancelled,
}

pub struct FilterInput {
    input: Input,
    placeholder: String,
}

impl FilterInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            placeholder: placeholder.into(),
        }
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    /// Enter confirms, Esc cancels, everything else edits the query.
    pub fn handle_key(&mut self, key: KeyEvent) -> FilterAction {
        match key.code {
            KeyCode::Esc => FilterAction::Cancelled,
            KeyCode::Enter => FilterAction::Confirmed,
            _ => {
                self.input.handle_event(&Event::Key(key));
                FilterAction::Changed(self.input.value().to_string())
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let scroll = self
            .input
            .visual_scroll(area.width.saturating_sub(4) as usize);
        let value = self.input.value();
        let display = if value.is_empty() {
            Span::styled(format!("/ {}", self.placeholder), Style::default().fg(C_MUTED))
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Span::styled(format!("/ {}", visible), Style::default().fg(C_FILTER_FG))
        };

        frame.render_widget(
            Paragraph::new(Line::from(vec![display])).style(Style::default().bg(C_FILTER_BG)),
            area,
        );

        let cursor_x = area.x + 2 + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
        frame.set_cursor_position((cursor_x.min(area.x + area.width.saturating_sub(1)), area.y));
    }
}

impl Default for FilterInput {
    fn default() -> Self {
        Self::new("type to filter...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_reports_the_new_query() {
        let mut input = FilterInput::default();
        input.handle_key(key(KeyCode::Char('c')));
        match input.handle_key(key(KeyCode::Char('i'))) {
            FilterAction::Changed(q) => assert_eq!(q, "ci"),
            _ => panic!("expected Changed"),
        }
    }

    #[test]
    fn enter_and_esc_end_the_input() {
        let mut input = FilterInput::default();
        assert!(matches!(input.handle_key(key(KeyCode::Enter)), FilterAction::Confirmed));
        assert!(matches!(input.handle_key(key(KeyCode::Esc)), FilterAction::Cancelled));
    }
}
