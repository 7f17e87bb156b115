//! Status lines: header strip on top, keybindings footer at the bottom.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use transit_core::store::StoreKind;

use crate::theme::{
    C_ACCENT, C_BADGE_OFFLINE, C_MODE_ADD, C_MODE_NORMAL, C_MUTED, C_PRIMARY, C_SECONDARY,
    C_SEPARATOR,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Add,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "BOARD",
            Self::Add => "ADD",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Add => C_MODE_ADD,
        }
    }
}

/// Top line: app name, station count, where selections are kept and when the
/// last refresh was requested.
pub fn draw_header(
    frame: &mut Frame,
    area: Rect,
    stations: usize,
    store: StoreKind,
    last_refresh: Option<&str>,
) {
    let store_style = if store == StoreKind::Memory {
        Style::default().fg(C_BADGE_OFFLINE)
    } else {
        Style::default().fg(C_SECONDARY)
    };

    let mut spans = vec![
        Span::styled(
            " transit ",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(C_SEPARATOR)),
        Span::styled(
            format!("{} station{}", stations, if stations == 1 { "" } else { "s" }),
            Style::default().fg(C_PRIMARY),
        ),
        Span::styled("  │ ", Style::default().fg(C_SEPARATOR)),
        Span::styled(format!("store: {}", store.label()), store_style),
    ];
    if let Some(at) = last_refresh {
        spans.push(Span::styled("  │ ", Style::default().fg(C_SEPARATOR)));
        spans.push(Span::styled(
            format!("refreshed {}", at),
            Style::default().fg(C_SECONDARY),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode) {
    let keys = match mode {
        InputMode::Normal => " ↑↓←→/hjkl select  r refresh  a add station  K keys  ? help  q quit",
        InputMode::Add => " type to filter  ↑↓ move  Enter add  Esc cancel",
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(keys, Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
