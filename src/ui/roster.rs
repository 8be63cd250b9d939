use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap};

use crate::app::{AppState, Focus, MenuItem};
use crate::roster::StudentRecord;

fn panel<'a>(title: &'a str, app: &AppState, focused: bool) -> Block<'a> {
    let border = if focused { app.theme.title } else { app.theme.border };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

pub fn render_menu(f: &mut Frame, area: Rect, app: &AppState) {
    let items: Vec<ListItem> = MenuItem::ALL
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if i == app.menu_index { "▶ " } else { "  " };
            let style = if i == app.menu_index {
                Style::default()
                    .fg(app.theme.highlight_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text)
            };
            ListItem::new(format!("{marker}{}. {}", i + 1, item.label())).style(style)
        })
        .collect();
    let list = List::new(items).block(panel("Menu", app, app.focus == Focus::Menu));
    f.render_widget(list, area);
}

pub fn render_roster_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(app.roster.len());
    let slice: Vec<&StudentRecord> = app.roster.iter().skip(start).take(end.saturating_sub(start)).collect();

    let rows = slice.iter().enumerate().map(|(i, s)| {
        let style = if start + i == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(s.id.clone()),
            Cell::from(s.name.clone()),
            Cell::from(s.account.clone()),
            Cell::from(format!("{:.2}", s.average_score)),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(12),
        Constraint::Percentage(45),
        Constraint::Length(16),
        Constraint::Length(7),
    ];
    let header = Row::new(vec!["ID", "NAME", "ACCOUNT", "SCORE"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );
    let title = format!("List of students ({})", app.roster.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(&title, app, app.focus == Focus::Table))
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_student_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.roster.get(app.selected_index) {
        Some(s) => s.to_string(),
        None => "No student selected".to_string(),
    };
    let p = Paragraph::new(text)
        .style(Style::default().fg(app.theme.text))
        .block(panel("Details", app, false));
    f.render_widget(p, area);
}

pub fn render_results(f: &mut Frame, area: Rect, app: &AppState, heading: &str, records: &[StudentRecord]) {
    let mut body = String::from(heading);
    for r in records {
        body.push('\n');
        body.push_str(&r.to_string());
    }
    let p = Paragraph::new(body)
        .style(Style::default().fg(app.theme.text))
        .wrap(Wrap { trim: false })
        .block(panel("Search results", app, false));
    f.render_widget(p, area);
}

pub fn render_welcome(f: &mut Frame, area: Rect, app: &AppState) {
    let text = "Program to manage the list of students in class.\n\n\
                Start with option 1 to initialize the list.";
    let p = Paragraph::new(text)
        .style(Style::default().fg(app.theme.muted))
        .wrap(Wrap { trim: false })
        .block(panel("Students", app, false));
    f.render_widget(p, area);
}
