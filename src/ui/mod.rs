pub mod components;
pub mod roster;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, ModalState, Pane, SEARCH_OPTIONS, SORT_OPTIONS};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(50), Constraint::Min(30)].as_ref())
        .split(root[1]);

    let p = Paragraph::new(format!(
        "PROGRAM TO MANAGE LIST OF STUDENTS IN CLASS  students:{}  -- {}",
        app.roster.len(),
        components::key_hints(app)
    ))
    .block(
        Block::default()
            .title("student-roster")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    roster::render_menu(f, body[0], app);

    match &app.pane {
        Pane::Welcome => roster::render_welcome(f, body[1], app),
        Pane::Results { heading, records } => {
            roster::render_results(f, body[1], app, heading, records)
        }
        Pane::Roster => {
            // table paging writes back rows_per_page
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(5), Constraint::Length(8)].as_ref())
                .split(body[1]);
            roster::render_roster_table(f, right[0], app);
            roster::render_student_details(f, right[1], app);
        }
    }

    components::render_status_bar(f, root[2], app);

    if app.modal.is_some() {
        let area = f.area();
        render_modal(f, area, app);
    }
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(state) = &app.modal else {
        return;
    };
    match state {
        ModalState::Info { message } => components::render_info_modal(f, area, app, message),
        ModalState::CountInput { value, error } => components::render_prompt_modal(
            f,
            area,
            app,
            "Initialize",
            "Enter the number of students:",
            value,
            error.as_deref(),
        ),
        ModalState::StudentForm(form) => components::render_student_form(f, area, app, form),
        ModalState::DeleteInput { value } => components::render_prompt_modal(
            f,
            area,
            app,
            "Delete",
            "Enter student's ID that you want to delete:",
            value,
            None,
        ),
        ModalState::SortMenu { selected } => {
            let labels: Vec<&str> = SORT_OPTIONS.iter().map(|(_, l)| *l).collect();
            components::render_choice_modal(f, area, app, "Sort", &labels, *selected)
        }
        ModalState::SearchMenu { selected } => {
            let labels: Vec<&str> = SEARCH_OPTIONS.iter().map(|(_, l)| *l).collect();
            components::render_choice_modal(f, area, app, "Search", &labels, *selected)
        }
        ModalState::SearchInput { field, value } => {
            let prompt = format!("Enter student's {} to search:", field.label());
            components::render_prompt_modal(f, area, app, "Search", &prompt, value, None)
        }
    }
}
