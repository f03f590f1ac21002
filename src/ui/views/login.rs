//! The authentication screen: email + password form with a show-password
//! toggle. Failures render as a banner inside the form; success never
//! renders here because the guard switches to the directory.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, LoginFocus};
use crate::ui::styles;

/// Interior width of the login dialog
const DIALOG_WIDTH: u16 = 46;

pub fn render(frame: &mut Frame, app: &App) {
    let height = if app.login.error.is_some() { 15 } else { 13 };
    let area = centered_rect_fixed(DIALOG_WIDTH, height, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = vec![];

    lines.push(Line::from(Span::styled(
        "           ╦ ╦╔═╗╔═╗╦═╗╔╦╗╔═╗╔═╗╦╔═",
        styles::title_style(),
    )));
    lines.push(Line::from(Span::styled(
        "           ║ ║╚═╗║╣ ╠╦╝ ║║║╣ ║  ╠╩╗",
        styles::title_style(),
    )));
    lines.push(Line::from(Span::styled(
        "           ╚═╝╚═╝╚═╝╩╚══╩╝╚═╝╚═╝╩ ╩",
        styles::title_style(),
    )));
    lines.push(Line::from(""));

    if let Some(ref error) = app.login.error {
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
        lines.push(Line::from(""));
    }

    let email_focused = app.login.focus == LoginFocus::Email;
    lines.push(Line::from(vec![
        Span::styled("  Email:    ", styles::muted_style()),
        Span::styled(
            format!(" {:<30} ", app.login.email),
            styles::input_style(email_focused),
        ),
    ]));
    lines.push(Line::from(""));

    let password_focused = app.login.focus == LoginFocus::Password;
    let password_display = if app.login.show_password {
        app.login.password.clone()
    } else {
        "*".repeat(app.login.password.len())
    };
    lines.push(Line::from(vec![
        Span::styled("  Password: ", styles::muted_style()),
        Span::styled(
            format!(" {:<30} ", password_display),
            styles::input_style(password_focused),
        ),
    ]));
    lines.push(Line::from(""));

    let toggle_focused = app.login.focus == LoginFocus::ShowPassword;
    let checkbox = if app.login.show_password { "[x]" } else { "[ ]" };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("{} Show password", checkbox),
            styles::input_style(toggle_focused),
        ),
    ]));
    lines.push(Line::from(""));

    let button_focused = app.login.focus == LoginFocus::Button;
    lines.push(Line::from(vec![
        Span::raw("               "),
        Span::styled(
            " [ Sign in ] ",
            if button_focused {
                styles::selected_style()
            } else {
                styles::muted_style()
            },
        ),
    ]));

    let block = Block::default()
        .title(" Sign in ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);

    // Footer hint below the dialog
    let hint_area = Rect {
        x: area.x,
        y: (area.y + area.height).min(frame.area().height.saturating_sub(1)),
        width: area.width,
        height: 1,
    };
    let hint = Paragraph::new(Line::from(Span::styled(
        " Tab next field · Enter submit · Ctrl+C quit",
        styles::muted_style(),
    )));
    frame.render_widget(hint, hint_area);
}

/// Return a fixed-size rect centered within `r`
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width.saturating_sub(width)) / 2,
        y: r.y + (r.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
