// Integration tests for student-roster

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(tag: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("roster_{}_{}_{}", tag, std::process::id(), nonce));
    path
}

// 1) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use student_roster::app::Theme;

    let path = temp_path("theme.conf");
    let path_str = path.to_string_lossy().to_string();

    let t = Theme::mocha();
    t.write_file(&path_str).expect("write theme");
    let t2 = Theme::from_file(&path_str).expect("read theme");
    assert_eq!(format!("{:?}", t.text), format!("{:?}", t2.text));
    assert_eq!(format!("{:?}", t.error), format!("{:?}", t2.error));
    assert_eq!(format!("{:?}", t.header_bg), format!("{:?}", t2.header_bg));

    let init = temp_path("theme_init.conf");
    let init_str = init.to_string_lossy().to_string();
    let _created = Theme::load_or_init(&init_str);
    assert!(init.exists());

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&init);
}

// 2) Keybinding overrides survive a write/read cycle
#[test]
fn keymap_file_overrides_defaults() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use student_roster::app::keymap::{KeyAction, Keymap};

    let path = temp_path("keybinds.conf");
    let path_str = path.to_string_lossy().to_string();
    std::fs::write(&path_str, "# custom\nSortList = s\nbogus line\nQuit = Ctrl+x\n").unwrap();

    let km = Keymap::from_file(&path_str).expect("read keymap");
    let key = |code, mods| KeyEvent::new(code, mods);
    assert_eq!(km.resolve(&key(KeyCode::Char('s'), KeyModifiers::NONE)), Some(KeyAction::SortList));
    assert_eq!(km.resolve(&key(KeyCode::Char('x'), KeyModifiers::CONTROL)), Some(KeyAction::Quit));
    // defaults stay in place
    assert_eq!(km.resolve(&key(KeyCode::Char('4'), KeyModifiers::NONE)), Some(KeyAction::SortList));

    km.write_file(&path_str).expect("write keymap");
    let again = Keymap::from_file(&path_str).expect("re-read keymap");
    assert_eq!(again.keys_for(KeyAction::Quit), km.keys_for(KeyAction::Quit));

    let _ = std::fs::remove_file(&path);
}

// 3) Config directory resolution and creation
#[test]
fn explicit_config_dir_wins_and_is_created() {
    use student_roster::app::{AppState, config_dir, ensure_config_dir};

    let dir = temp_path("cfg");
    assert_eq!(config_dir(Some(dir.as_path())), dir);
    ensure_config_dir(&dir).expect("create dir");
    assert!(dir.is_dir());

    let _app = AppState::from_config_dir(&dir);
    assert!(dir.join("theme.conf").exists());
    assert!(dir.join("keybinds.conf").exists());

    let file = temp_path("not_a_dir");
    std::fs::write(&file, "x").unwrap();
    assert!(ensure_config_dir(&file).is_err());

    let _ = std::fs::remove_dir_all(&dir);
    let _ = std::fs::remove_file(&file);
}

// 4) A whole session driven through key presses
#[test]
fn menu_session_initialize_sort_search_delete() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use student_roster::app::update::handle_key;
    use student_roster::app::{AppState, ModalState, Pane};

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }
    fn type_line(app: &mut AppState, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }
    fn ids(app: &AppState) -> Vec<String> {
        app.roster.iter().map(|s| s.id.clone()).collect()
    }

    let mut app = AppState::default();

    // 1: initialize with two students
    press(&mut app, KeyCode::Char('1'));
    type_line(&mut app, "2");
    for field in ["A1", "Zoe", "acc1", "7.5", "A2", "Amy", "acc2", "9.0"] {
        type_line(&mut app, field);
    }
    assert_eq!(ids(&app), vec!["A1", "A2"]);
    press(&mut app, KeyCode::Esc); // dismiss info

    // 4 -> 1: sort by score
    press(&mut app, KeyCode::Char('4'));
    press(&mut app, KeyCode::Char('1'));
    assert_eq!(ids(&app), vec!["A2", "A1"]);
    press(&mut app, KeyCode::Enter);

    // 4 -> 2: sort by name
    press(&mut app, KeyCode::Char('4'));
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    assert_eq!(ids(&app), vec!["A2", "A1"]);
    press(&mut app, KeyCode::Enter);

    // 5 -> 3: search by account
    press(&mut app, KeyCode::Char('5'));
    press(&mut app, KeyCode::Char('3'));
    type_line(&mut app, "acc1");
    match &app.pane {
        Pane::Results { records, .. } => {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].name, "Zoe");
        }
        other => panic!("unexpected pane {other:?}"),
    }

    // 3: delete an unknown id, then A1
    press(&mut app, KeyCode::Char('3'));
    type_line(&mut app, "Z9");
    assert!(matches!(&app.modal, Some(ModalState::Info { message }) if message.contains("not on the list")));
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('3'));
    type_line(&mut app, "A1");
    assert!(!app.roster.exists_id("A1"));
    assert!(!app.roster.is_empty());
    press(&mut app, KeyCode::Enter);

    // 6: display, 7: exit
    press(&mut app, KeyCode::Char('6'));
    assert_eq!(app.pane, Pane::Roster);
    press(&mut app, KeyCode::Char('7'));
    assert!(app.should_quit);
}
