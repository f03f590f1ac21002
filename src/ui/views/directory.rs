//! The directory screen: a paginated, searchable, filterable table of user
//! records with edit and delete overlays.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, EditFocus, Mode, NoticeKind};
use crate::ui::styles;
use crate::ui::views::login::centered_rect_fixed;
use crate::utils::truncate_string;

/// Widest avatar URL shown before truncation
const AVATAR_COLUMN_WIDTH: usize = 34;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // User table
            Constraint::Length(1), // Pagination
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_search_bar(frame, app, chunks[1]);
    render_user_table(frame, app, chunks[2]);
    render_pagination(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);

    // Render overlays
    if matches!(app.mode, Mode::Editing) {
        render_edit_overlay(frame, app);
    }

    if matches!(app.mode, Mode::ConfirmingDelete) {
        render_delete_overlay(frame, app);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Userdeck";
    let account = app
        .session
        .data
        .as_ref()
        .map(|d| format!("{} · [?] Help", d.email))
        .unwrap_or_else(|| "[?] Help".to_string());

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + account.len() + 4),
        )),
        Span::styled(account, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let searching = matches!(app.mode, Mode::Searching);

    let mut spans = vec![Span::styled(" / ", styles::search_style())];
    if app.search_term.is_empty() && !searching {
        spans.push(Span::styled("type / to search", styles::muted_style()));
    } else {
        spans.push(Span::styled(app.search_term.clone(), styles::search_style()));
        if searching {
            spans.push(Span::styled("█", styles::search_style()));
        }
    }

    let field_label = format!(" match: {} [f] ", app.search_field.label());
    let used: usize = spans.iter().map(|s| s.content.len()).sum();
    let padding = (area.width as usize).saturating_sub(used + field_label.len() + 2);
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(field_label, styles::muted_style()));

    let block = Block::default()
        .title(" Search ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(searching));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_user_table(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.visible_users();

    let title = format!(" Users ({} shown) ", visible.len());
    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(matches!(app.mode, Mode::Normal)));

    // Empty states render as a message instead of an empty table
    if visible.is_empty() {
        let message = if app.loading && app.users.is_empty() {
            "Loading users..."
        } else if app.users.is_empty() {
            "No users on this page"
        } else {
            "No users found"
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!("  {}", message),
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new([
        Cell::from("ID"),
        Cell::from("First Name"),
        Cell::from("Last Name"),
        Cell::from("Email"),
        Cell::from("Avatar"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            Row::new([
                Cell::from(format!("{:>3}", user.id)),
                Cell::from(user.first_name.clone()),
                Cell::from(user.last_name.clone()),
                Cell::from(user.email.clone()),
                Cell::from(truncate_string(&user.avatar, AVATAR_COLUMN_WIDTH)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(3),
        Constraint::Fill(3),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];

    let at_first = app.current_page <= 1;
    spans.push(Span::styled(
        "« Prev",
        if at_first {
            styles::muted_style()
        } else {
            styles::list_item_style()
        },
    ));
    spans.push(Span::raw("  "));

    // One numbered control per page; the server bounds the page count
    for page in 1..=app.total_pages {
        spans.push(Span::styled(
            format!(" {} ", page),
            styles::page_style(page == app.current_page),
        ));
    }

    spans.push(Span::raw("  "));
    let at_last = app.current_page >= app.total_pages;
    spans.push(Span::styled(
        "Next »",
        if at_last {
            styles::muted_style()
        } else {
            styles::list_item_style()
        },
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[e]dit | [d]elete | [r]efresh | [L]ogout | [q]uit";

    let (left_text, left_style) = if let Some(ref notice) = app.notice {
        let style = match notice.kind {
            NoticeKind::Success => styles::success_style(),
            NoticeKind::Error => styles::error_style(),
        };
        (format!(" {} ", notice.text), style)
    } else if let Some(ref error) = app.fetch_error {
        (format!(" {} ", error), styles::error_style())
    } else if app.loading {
        (" Loading... ".to_string(), styles::muted_style())
    } else {
        (
            format!(" Page {} of {} ", app.current_page, app.total_pages),
            styles::muted_style(),
        )
    };

    let right_text = format!(" {} ", shortcuts);
    let padding = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn render_edit_overlay(frame: &mut Frame, app: &App) {
    let Some(ref form) = app.edit_form else {
        return;
    };

    let area = centered_rect_fixed(52, 12, frame.area());
    frame.render_widget(Clear, area);

    let field_row = |label: &str, value: &str, focused: bool| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", label), styles::muted_style()),
            Span::styled(format!(" {:<32} ", value), styles::input_style(focused)),
        ])
    };

    let mut lines = vec![Line::from("")];
    lines.push(field_row(
        "First name:",
        &form.first_name,
        form.focus == EditFocus::FirstName,
    ));
    lines.push(Line::from(""));
    lines.push(field_row(
        "Last name:",
        &form.last_name,
        form.focus == EditFocus::LastName,
    ));
    lines.push(Line::from(""));
    lines.push(field_row("Email:", &form.email, form.focus == EditFocus::Email));
    lines.push(Line::from(""));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Enter ", styles::help_key_style()),
        Span::styled("save", styles::help_desc_style()),
        Span::styled("  Tab ", styles::help_key_style()),
        Span::styled("next field", styles::help_desc_style()),
        Span::styled("  Esc ", styles::help_key_style()),
        Span::styled("cancel", styles::help_desc_style()),
    ]));

    let block = Block::default()
        .title(format!(" Edit user #{} ", form.id))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let Some(ref user) = app.pending_delete else {
        return;
    };

    let area = centered_rect_fixed(46, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  Delete {}?", user.display_name()),
            styles::list_item_style(),
        )),
        Line::from(Span::styled(
            format!("  {}", user.email),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [y] ", styles::help_key_style()),
            Span::styled("delete", styles::error_style()),
            Span::styled("   [n] ", styles::help_key_style()),
            Span::styled("cancel", styles::help_desc_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Confirm delete ")
        .title_style(styles::error_style())
        .borders(Borders::ALL)
        .border_style(styles::error_style());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
