use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tracing::{debug, info};

use crate::app::keymap::KeyAction;
use crate::app::{
    AppState, Focus, FormPurpose, MenuItem, ModalState, Pane, SEARCH_OPTIONS, SORT_OPTIONS,
    StudentForm,
};
use crate::input::{parse_count, parse_score};
use crate::roster::{
    MAX_ACCOUNT_LEN, MAX_ID_LEN, MAX_NAME_LEN, Roster, StudentRecord, check_text,
};
use crate::search::apply_search;
use crate::ui;

const NOT_INITIALIZED: &str =
    "You have not initialized list of students, please initialize it first!";

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }
    }
    Ok(())
}

/// Apply one key press to the application state.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    match app.modal.take() {
        None => handle_normal(app, key),
        Some(modal) => {
            app.close_modal();
            handle_modal(app, modal, key);
        }
    }
}

fn handle_normal(app: &mut AppState, key: KeyEvent) {
    let Some(action) = app.keymap.resolve(&key) else {
        return;
    };
    debug!(?action, "menu key");
    match action {
        KeyAction::Initialize => run_menu(app, MenuItem::Initialize),
        KeyAction::AddStudent => run_menu(app, MenuItem::AddStudent),
        KeyAction::DeleteStudent => run_menu(app, MenuItem::DeleteStudent),
        KeyAction::SortList => run_menu(app, MenuItem::Sort),
        KeyAction::SearchList => run_menu(app, MenuItem::Search),
        KeyAction::DisplayList => run_menu(app, MenuItem::Display),
        KeyAction::Quit => run_menu(app, MenuItem::Exit),
        KeyAction::EnterAction => {
            let item = MenuItem::ALL[app.menu_index];
            run_menu(app, item);
        }
        KeyAction::ToggleFocus => {
            app.focus = match app.focus {
                Focus::Menu => Focus::Table,
                Focus::Table => Focus::Menu,
            };
        }
        KeyAction::MoveUp => match app.focus {
            Focus::Menu => {
                app.menu_index = app
                    .menu_index
                    .checked_sub(1)
                    .unwrap_or(MenuItem::ALL.len() - 1);
            }
            Focus::Table => app.selected_index = app.selected_index.saturating_sub(1),
        },
        KeyAction::MoveDown => match app.focus {
            Focus::Menu => app.menu_index = (app.menu_index + 1) % MenuItem::ALL.len(),
            Focus::Table => move_selection(app, 1),
        },
        KeyAction::PageUp => {
            app.selected_index = app.selected_index.saturating_sub(app.rows_per_page);
        }
        KeyAction::PageDown => {
            let page = app.rows_per_page;
            move_selection(app, page);
        }
        KeyAction::Ignore => {}
    }
}

fn move_selection(app: &mut AppState, by: usize) {
    let last = app.roster.len().saturating_sub(1);
    app.selected_index = (app.selected_index + by).min(last);
}

fn clamp_selection(app: &mut AppState) {
    let last = app.roster.len().saturating_sub(1);
    app.selected_index = app.selected_index.min(last);
}

/// Dispatch one entry of the numbered menu.
pub fn run_menu(app: &mut AppState, item: MenuItem) {
    if let Some(pos) = MenuItem::ALL.iter().position(|m| *m == item) {
        app.menu_index = pos;
    }
    if item.needs_roster() && app.roster.is_empty() {
        app.info(NOT_INITIALIZED);
        return;
    }
    match item {
        MenuItem::Initialize => app.open_modal(ModalState::CountInput {
            value: String::new(),
            error: None,
        }),
        MenuItem::AddStudent => {
            app.open_modal(ModalState::StudentForm(StudentForm::new(FormPurpose::Add)))
        }
        MenuItem::DeleteStudent => app.open_modal(ModalState::DeleteInput {
            value: String::new(),
        }),
        MenuItem::Sort => app.open_modal(ModalState::SortMenu { selected: 0 }),
        MenuItem::Search => app.open_modal(ModalState::SearchMenu { selected: 0 }),
        MenuItem::Display => {
            app.pane = Pane::Roster;
            clamp_selection(app);
            app.status = format!("List of students in class: {}", app.roster.len());
        }
        MenuItem::Exit => {
            info!(students = app.roster.len(), "exiting");
            app.status = "Exited program. See you again!".to_string();
            app.should_quit = true;
        }
    }
}

/// Append or remove a character for plain typing keys. Returns `false` for other keys.
fn edit_text(value: &mut String, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            value.push(c);
            true
        }
        KeyCode::Backspace => {
            value.pop();
            true
        }
        _ => false,
    }
}

/// Outcome of a key press inside a numbered submenu.
enum MenuStep {
    Stay(usize),
    Pick(usize),
    Cancel,
    Invalid,
}

/// Arrows/jk move the cursor; digits pick an entry by its 1-based number.
fn menu_step(selected: usize, len: usize, key: &KeyEvent) -> MenuStep {
    match key.code {
        KeyCode::Esc => MenuStep::Cancel,
        KeyCode::Enter => MenuStep::Pick(selected),
        KeyCode::Up | KeyCode::Char('k') => MenuStep::Stay(selected.checked_sub(1).unwrap_or(len - 1)),
        KeyCode::Down | KeyCode::Char('j') => MenuStep::Stay((selected + 1) % len),
        KeyCode::Char(c) => match c.to_digit(10) {
            Some(d) if (1..=len as u32).contains(&d) => MenuStep::Pick(d as usize - 1),
            _ => MenuStep::Invalid,
        },
        _ => MenuStep::Stay(selected),
    }
}

fn handle_modal(app: &mut AppState, modal: ModalState, key: KeyEvent) {
    match modal {
        // Any key dismisses
        ModalState::Info { .. } => {}
        ModalState::CountInput { mut value, error } => match key.code {
            KeyCode::Esc => app.status = "Initialization cancelled".to_string(),
            KeyCode::Enter => match parse_count(&value) {
                Ok(total) => start_initialize(app, total),
                Err(e) => app.open_modal(ModalState::CountInput {
                    value,
                    error: Some(e.to_string()),
                }),
            },
            _ => {
                let error = if edit_text(&mut value, &key) { None } else { error };
                app.open_modal(ModalState::CountInput { value, error });
            }
        },
        ModalState::StudentForm(form) => handle_student_form(app, form, key),
        ModalState::DeleteInput { mut value } => match key.code {
            KeyCode::Esc => app.status = "Delete cancelled".to_string(),
            KeyCode::Enter => {
                let id = value.trim().to_string();
                if id.is_empty() {
                    app.open_modal(ModalState::DeleteInput { value });
                    return;
                }
                match app.roster.delete(&id) {
                    Some(_) => {
                        app.pane = Pane::Roster;
                        clamp_selection(app);
                        app.info(format!(
                            "Deleted student's information with ID '{id}' from the list"
                        ));
                    }
                    None => app.info(format!("ID '{id}' is not on the list!")),
                }
            }
            _ => {
                edit_text(&mut value, &key);
                app.open_modal(ModalState::DeleteInput { value });
            }
        },
        ModalState::SortMenu { selected } => {
            match menu_step(selected, SORT_OPTIONS.len(), &key) {
                MenuStep::Stay(selected) => app.open_modal(ModalState::SortMenu { selected }),
                MenuStep::Pick(i) => {
                    let (sort_key, _) = SORT_OPTIONS[i];
                    app.roster.sort_by(sort_key);
                    app.pane = Pane::Roster;
                    app.selected_index = 0;
                    app.info("The list is successfully sorted!");
                }
                MenuStep::Cancel => app.status = "Sort cancelled".to_string(),
                MenuStep::Invalid => {
                    app.status = "Your input is not valid! Please enter again".to_string();
                    app.open_modal(ModalState::SortMenu { selected });
                }
            }
        }
        ModalState::SearchMenu { selected } => {
            match menu_step(selected, SEARCH_OPTIONS.len(), &key) {
                MenuStep::Stay(selected) => app.open_modal(ModalState::SearchMenu { selected }),
                MenuStep::Pick(i) => {
                    let (field, _) = SEARCH_OPTIONS[i];
                    app.open_modal(ModalState::SearchInput {
                        field,
                        value: String::new(),
                    });
                }
                MenuStep::Cancel => app.status = "Search cancelled".to_string(),
                MenuStep::Invalid => {
                    app.status = "Your input is not valid! Please enter again".to_string();
                    app.open_modal(ModalState::SearchMenu { selected });
                }
            }
        }
        ModalState::SearchInput { field, mut value } => match key.code {
            KeyCode::Esc => app.status = "Search cancelled".to_string(),
            KeyCode::Enter => {
                app.search_field = field;
                app.search_query = value.trim().to_string();
                apply_search(app);
            }
            _ => {
                edit_text(&mut value, &key);
                app.open_modal(ModalState::SearchInput { field, value });
            }
        },
    }
}

fn start_initialize(app: &mut AppState, total: usize) {
    let dropped = app.roster.reset();
    app.selected_index = 0;
    app.pane = Pane::Roster;
    info!(dropped, total, "initializing roster");
    if total == 0 {
        app.info("List of students is initialized");
        return;
    }
    app.status = if dropped > 0 {
        "Deleted previous list of students".to_string()
    } else {
        "Proceed to create a new student list".to_string()
    };
    app.open_modal(ModalState::StudentForm(StudentForm::new(
        FormPurpose::Initialize { current: 0, total },
    )));
}

fn handle_student_form(app: &mut AppState, mut form: StudentForm, key: KeyEvent) {
    let last = form.values.len() - 1;
    match key.code {
        KeyCode::Esc => {
            app.status = match form.purpose {
                FormPurpose::Initialize { current, total } => {
                    format!("Initialization stopped after {current} of {total} students")
                }
                FormPurpose::Add => "Add cancelled".to_string(),
            };
            return;
        }
        KeyCode::Tab | KeyCode::Down => form.selected = (form.selected + 1) % form.values.len(),
        KeyCode::BackTab | KeyCode::Up => {
            form.selected = form.selected.checked_sub(1).unwrap_or(last);
        }
        KeyCode::Enter if form.selected < last => {
            match validate_field(&app.roster, form.selected, &form.values[form.selected]) {
                Ok(()) => {
                    form.error = None;
                    form.selected += 1;
                }
                Err(msg) => form.error = Some(msg),
            }
        }
        KeyCode::Enter => match submit_form(&mut app.roster, &form) {
            Ok(record) => {
                finish_form(app, form.purpose, record);
                return;
            }
            Err((field, msg)) => {
                form.selected = field;
                form.error = Some(msg);
            }
        },
        _ => {
            if edit_text(&mut form.values[form.selected], &key) {
                form.error = None;
            }
        }
    }
    app.open_modal(ModalState::StudentForm(form));
}

/// Check one form field against the roster, in prompt order.
fn validate_field(roster: &Roster, field: usize, raw: &str) -> std::result::Result<(), String> {
    let value = raw.trim();
    match field {
        0 => {
            check_text("ID", value, MAX_ID_LEN).map_err(|e| e.to_string())?;
            if roster.exists_id(value) {
                return Err("ID already exists. Please re-enter another ID!".to_string());
            }
            Ok(())
        }
        1 => check_text("Name", value, MAX_NAME_LEN).map_err(|e| e.to_string()),
        2 => {
            check_text("Account", value, MAX_ACCOUNT_LEN).map_err(|e| e.to_string())?;
            if roster.exists_account(value) {
                return Err(
                    "Account already exists. Please re-enter another account!".to_string()
                );
            }
            Ok(())
        }
        _ => parse_score(value).map(|_| ()).map_err(|e| e.to_string()),
    }
}

/// Validate every field, then insert. On failure returns the offending field index.
fn submit_form(
    roster: &mut Roster,
    form: &StudentForm,
) -> std::result::Result<StudentRecord, (usize, String)> {
    for (idx, raw) in form.values.iter().enumerate() {
        validate_field(roster, idx, raw).map_err(|msg| (idx, msg))?;
    }
    let [id, name, account, score] = &form.values;
    let score = parse_score(score).map_err(|e| (3, e.to_string()))?;
    let record = StudentRecord::new(id.trim(), name.trim(), account.trim(), score)
        .map_err(|e| (0, e.to_string()))?;
    roster
        .insert(record.clone())
        .map_err(|e| (0, e.to_string()))?;
    Ok(record)
}

fn finish_form(app: &mut AppState, purpose: FormPurpose, record: StudentRecord) {
    debug!(id = %record.id, "form submitted");
    app.pane = Pane::Roster;
    match purpose {
        FormPurpose::Initialize { current, total } if current + 1 < total => {
            app.status = format!("Saved student {} of {}", current + 1, total);
            app.open_modal(ModalState::StudentForm(StudentForm::new(
                FormPurpose::Initialize {
                    current: current + 1,
                    total,
                },
            )));
        }
        FormPurpose::Initialize { .. } => app.info("List of students is initialized"),
        FormPurpose::Add => app.info("Added a new student's information to list"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn fill_form(app: &mut AppState, id: &str, name: &str, account: &str, score: &str) {
        for v in [id, name, account, score] {
            type_str(app, v);
            press(app, KeyCode::Enter);
        }
    }

    #[test]
    fn menu_requires_initialized_roster() {
        let mut app = AppState::default();
        press(&mut app, KeyCode::Char('2'));
        assert!(matches!(app.modal, Some(ModalState::Info { ref message }) if message == NOT_INITIALIZED));
        press(&mut app, KeyCode::Enter);
        assert!(app.modal.is_none());
    }

    #[test]
    fn initialize_collects_each_student() {
        let mut app = AppState::default();
        press(&mut app, KeyCode::Char('1'));
        type_str(&mut app, "2");
        press(&mut app, KeyCode::Enter);
        fill_form(&mut app, "A1", "Zoe", "acc1", "7.5");
        match &app.modal {
            Some(ModalState::StudentForm(f)) => {
                assert_eq!(f.purpose, FormPurpose::Initialize { current: 1, total: 2 })
            }
            other => panic!("unexpected modal {other:?}"),
        }
        fill_form(&mut app, "A2", "Amy", "acc2", "9");
        assert_eq!(app.roster.len(), 2);
        assert_eq!(app.status, "List of students is initialized");
    }

    #[test]
    fn duplicate_id_keeps_form_open_on_id_field() {
        let mut app = AppState::default();
        app.roster
            .insert(StudentRecord::new("A1", "Zoe", "acc1", 7.5).unwrap())
            .unwrap();
        press(&mut app, KeyCode::Char('2'));
        type_str(&mut app, "A1");
        press(&mut app, KeyCode::Enter);
        match &app.modal {
            Some(ModalState::StudentForm(f)) => {
                assert_eq!(f.selected, 0);
                assert!(f.error.as_deref().unwrap().contains("ID already exists"));
            }
            other => panic!("unexpected modal {other:?}"),
        }
        assert_eq!(app.roster.len(), 1);
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let mut app = AppState::default();
        app.roster
            .insert(StudentRecord::new("A1", "Zoe", "acc1", 7.5).unwrap())
            .unwrap();
        press(&mut app, KeyCode::Char('2'));
        fill_form(&mut app, "A2", "Amy", "acc2", "11");
        match &app.modal {
            Some(ModalState::StudentForm(f)) => {
                assert_eq!(f.selected, 3);
                assert_eq!(f.error.as_deref(), Some("Score must not be more than 10"));
            }
            other => panic!("unexpected modal {other:?}"),
        }
        assert_eq!(app.roster.len(), 1);
    }

    #[test]
    fn invalid_sort_choice_reprompts() {
        let mut app = AppState::default();
        app.roster
            .insert(StudentRecord::new("A1", "Zoe", "acc1", 7.5).unwrap())
            .unwrap();
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.modal, Some(ModalState::SortMenu { selected: 0 }));
        press(&mut app, KeyCode::Esc);
        assert!(app.modal.is_none());
    }

    #[test]
    fn delete_drops_stale_search_results() {
        let mut app = AppState::default();
        app.roster
            .insert(StudentRecord::new("A1", "Zoe", "acc1", 7.5).unwrap())
            .unwrap();
        app.roster
            .insert(StudentRecord::new("A2", "Amy", "acc2", 9.0).unwrap())
            .unwrap();
        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Char('1'));
        type_str(&mut app, "A1");
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.pane, Pane::Results { .. }));

        press(&mut app, KeyCode::Char('3'));
        type_str(&mut app, "A1");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert!(!app.roster.exists_id("A1"));
        assert_eq!(app.pane, Pane::Roster);
    }

    #[test]
    fn quit_sets_flag() {
        let mut app = AppState::new(crate::app::Theme::dark(), crate::app::keymap::Keymap::default());
        press(&mut app, KeyCode::Char('7'));
        assert!(app.should_quit);
    }
}
