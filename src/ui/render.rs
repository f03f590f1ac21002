//! Top-level rendering: screen dispatch through the navigation guard plus
//! the overlays shared by both screens.

use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, Mode, Screen};

use super::styles;
use super::views::{directory, login};
use super::views::login::centered_rect_fixed;

pub fn render(frame: &mut Frame, app: &App) {
    // The guard decides what actually renders: the directory never draws
    // without a session token
    match app.screen() {
        Screen::Login => login::render(frame, app),
        Screen::Directory => directory::render(frame, app),
    }

    if matches!(app.mode, Mode::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.mode, Mode::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let key = |k: &str, desc: &str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), styles::help_key_style()),
            Span::styled(desc.to_string(), styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(
            format!("  userdeck {}", version),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        key("↑/↓ j/k", "Move selection"),
        key("←/→ p/n", "Previous / next page"),
        key("1-9", "Jump to page"),
        Line::from(""),
        Line::from(Span::styled(" Search", styles::highlight_style())),
        key("/", "Type a search term"),
        key("f", "Cycle match field (all/first/last/email)"),
        key("Esc", "Clear the search"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        key("e / Enter", "Edit selected user"),
        key("d", "Delete selected user"),
        key("r", "Refresh current page"),
        key("L", "Log out"),
        key("q", "Quit"),
    ];

    let block = Block::default()
        .title(" Help ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(32, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Quit? ", styles::list_item_style()),
            Span::styled("[y]es ", styles::help_key_style()),
            Span::styled("[n]o", styles::help_key_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
