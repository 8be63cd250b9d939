//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only the main menu goes through the keymap. Keys typed inside modal
//! dialogs (text entry, confirmations) are handled directly by the update loop.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Semantic actions available from the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Menu option 1: reset the roster and enter a batch of students.
    Initialize,
    /// Menu option 2.
    AddStudent,
    /// Menu option 3.
    DeleteStudent,
    /// Menu option 4.
    SortList,
    /// Menu option 5.
    SearchList,
    /// Menu option 6.
    DisplayList,
    /// Menu option 7, or quit directly.
    Quit,
    /// Run the highlighted menu entry.
    EnterAction,
    /// Switch movement keys between the menu and the roster table.
    ToggleFocus,
    MoveUp,
    MoveDown,
    /// Move the roster table selection by a page.
    PageUp,
    PageDown,
    /// Ignore this key.
    Ignore,
}

const ACTION_NAMES: [(KeyAction, &str); 14] = [
    (KeyAction::Initialize, "Initialize"),
    (KeyAction::AddStudent, "AddStudent"),
    (KeyAction::DeleteStudent, "DeleteStudent"),
    (KeyAction::SortList, "SortList"),
    (KeyAction::SearchList, "SearchList"),
    (KeyAction::DisplayList, "DisplayList"),
    (KeyAction::Quit, "Quit"),
    (KeyAction::EnterAction, "EnterAction"),
    (KeyAction::ToggleFocus, "ToggleFocus"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::PageUp, "PageUp"),
    (KeyAction::PageDown, "PageDown"),
    (KeyAction::Ignore, "Ignore"),
];

/// Maps `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Number keys for the seven menu options, arrows and vim keys for movement.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('1')), KeyAction::Initialize);
        bindings.insert((M::NONE, Char('2')), KeyAction::AddStudent);
        bindings.insert((M::NONE, Char('3')), KeyAction::DeleteStudent);
        bindings.insert((M::NONE, Char('4')), KeyAction::SortList);
        bindings.insert((M::NONE, Char('5')), KeyAction::SearchList);
        bindings.insert((M::NONE, Char('6')), KeyAction::DisplayList);
        bindings.insert((M::NONE, Char('7')), KeyAction::Quit);
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Enter), KeyAction::EnterAction);
        bindings.insert((M::NONE, Tab), KeyAction::ToggleFocus);
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        Self { bindings }
    }

    /// Load a keymap from `path`, writing the defaults there first if it is missing.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default keybindings");
        }
        km
    }

    /// Load a keymap from a `<Action> = <KeySpec>` file, layered over the defaults.
    ///
    /// Returns `None` if the file cannot be read. Unknown actions or keys are skipped.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => tracing::warn!(line, "ignoring keybinding line"),
            }
        }
        Some(map)
    }

    /// Write the current bindings, one `<Action> = <KeySpec>` per line.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# student-roster keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, 1, Enter, Esc, Up, Down, PageUp, PageDown, j, k\n");
        let names: Vec<&str> = ACTION_NAMES.iter().map(|(_, n)| *n).collect();
        let _ = writeln!(&mut buf, "# Actions: {}\n", names.join(", "));

        let mut lines: Vec<String> = self
            .bindings
            .iter()
            .map(|((mods, code), action)| {
                format!("{} = {}", format_action(*action), Self::format_key(*mods, *code))
            })
            .collect();
        lines.sort();
        for l in lines {
            let _ = writeln!(&mut buf, "{l}");
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Keys bound to `action`, formatted and sorted, for on-screen hints.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys
    }

    /// Format a key (modifiers + code) into a spec like "Ctrl+c" or "PageUp".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "Up" => Up,
        "Down" => Down,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    ACTION_NAMES
        .iter()
        .find(|(_, name)| *name == s.trim())
        .map(|(a, _)| *a)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTION_NAMES
        .iter()
        .find(|(action, _)| *action == a)
        .map(|(_, n)| *n)
        .unwrap_or("Ignore")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_numbered_menu() {
        let km = Keymap::default();
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert_eq!(km.resolve(&key('1')), Some(KeyAction::Initialize));
        assert_eq!(km.resolve(&key('5')), Some(KeyAction::SearchList));
        assert_eq!(km.resolve(&key('7')), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&key('x')), None);
    }

    #[test]
    fn parse_key_specs() {
        assert_eq!(parse_key("Ctrl+c"), Some((KeyModifiers::CONTROL, KeyCode::Char('c'))));
        assert_eq!(parse_key("PageDown"), Some((KeyModifiers::NONE, KeyCode::PageDown)));
        assert_eq!(parse_key("ab"), None);
        assert_eq!(parse_action("SortList"), Some(KeyAction::SortList));
        assert_eq!(parse_action("Nope"), None);
    }

    #[test]
    fn every_action_has_a_name() {
        for (action, name) in ACTION_NAMES {
            assert_eq!(format_action(action), name);
        }
    }
}
