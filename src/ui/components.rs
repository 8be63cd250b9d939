//! Shared UI components (status bar, modal dialogs).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, FORM_FIELDS, InputMode, StudentForm};

/// Render the bottom status bar with mode, count and the last outcome message.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Modal => "INPUT",
    };
    let msg = format!(
        "mode: {mode}  students:{}  --> {}",
        app.roster.len(),
        app.status
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// One-line summary of the main menu bindings, built from the active keymap.
pub fn key_hints(app: &AppState) -> String {
    let hint = |action: KeyAction, label: &str| {
        let keys = app.keymap.keys_for(action);
        if keys.is_empty() {
            None
        } else {
            Some(format!("{}: {}", keys.join("/"), label))
        }
    };
    [
        hint(KeyAction::EnterAction, "run"),
        hint(KeyAction::ToggleFocus, "menu/table"),
        hint(KeyAction::MoveDown, "down"),
        hint(KeyAction::MoveUp, "up"),
        hint(KeyAction::Quit, "quit"),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join("; ")
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn modal_block<'a>(title: &'a str, app: &AppState) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let max_w = area.width.saturating_sub(6).max(30);
    let min_w = 50u16.min(max_w);
    let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
    let max_h = area.height.saturating_sub(6).max(5);
    let height = (approx_lines + 5).min(max_h).max(5);
    let rect = centered_rect(min_w, height, area);
    let body = format!("{message}\n\nPress any key to continue . . .");
    let p = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(app.theme.text))
        .block(modal_block("Info", app));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render a numbered list of options with a cursor.
pub fn render_choice_modal(
    f: &mut Frame,
    area: Rect,
    app: &AppState,
    title: &str,
    options: &[&str],
    selected: usize,
) {
    let width = options.iter().map(|o| o.len()).max().unwrap_or(20) as u16 + 12;
    let rect = centered_rect(width, options.len() as u16 + 4, area);
    let mut text = String::new();
    for (idx, label) in options.iter().enumerate() {
        let marker = if idx == selected { "▶" } else { " " };
        text.push_str(&format!("{marker} {}. {label}\n", idx + 1));
    }
    text.push_str("\nEnter your option");
    let p = Paragraph::new(text)
        .style(Style::default().fg(app.theme.text))
        .block(modal_block(title, app));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render a single-line text prompt with an optional error line.
pub fn render_prompt_modal(
    f: &mut Frame,
    area: Rect,
    app: &AppState,
    title: &str,
    prompt: &str,
    value: &str,
    error: Option<&str>,
) {
    let rect = centered_rect(60, 7, area);
    let mut lines = vec![Line::raw(format!("{prompt} {value}_"))];
    if let Some(err) = error {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(app.theme.error),
        )));
    }
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(app.theme.text))
        .block(modal_block(title, app));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the four-field student entry form.
pub fn render_student_form(f: &mut Frame, area: Rect, app: &AppState, form: &StudentForm) {
    let rect = centered_rect(64, 11, area);
    let mut lines: Vec<Line> = Vec::new();
    for (idx, label) in FORM_FIELDS.iter().enumerate() {
        let selected = idx == form.selected;
        let marker = if selected { "▶" } else { " " };
        let cursor = if selected { "_" } else { "" };
        let style = if selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} {label}: {}{cursor}", form.values[idx]),
            style,
        )));
    }
    lines.push(Line::raw(""));
    match &form.error {
        Some(err) => lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(app.theme.error),
        ))),
        None => lines.push(Line::from(Span::styled(
            "Enter: next/save  Tab/Up/Down: move  Esc: cancel",
            Style::default().fg(app.theme.muted),
        ))),
    }
    let title = form.title();
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(app.theme.text))
        .block(modal_block(&title, app));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
