//! Application state types and entry glue.
//!
//! Defines enums and structs that model the TUI state, as well as helpers
//! to resolve config locations and to run the application loop (re-exported as `run`).
//!
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::path::{Path, PathBuf};

use crate::error::{Context, Result, simple_error};
use crate::roster::{Roster, SearchField, SortKey, StudentRecord};
use keymap::Keymap;

const APP_DIR: &str = "student-roster";

/// Entries of the numbered main menu, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Initialize,
    AddStudent,
    DeleteStudent,
    Sort,
    Search,
    Display,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 7] = [
        MenuItem::Initialize,
        MenuItem::AddStudent,
        MenuItem::DeleteStudent,
        MenuItem::Sort,
        MenuItem::Search,
        MenuItem::Display,
        MenuItem::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Initialize => "Initialize list of students",
            MenuItem::AddStudent => "Add a new student's information to list",
            MenuItem::DeleteStudent => "Delete a student's information by their ID",
            MenuItem::Sort => "Sort the list by average score or name",
            MenuItem::Search => "Search students by ID, name or account",
            MenuItem::Display => "Display list of students",
            MenuItem::Exit => "Exit program",
        }
    }

    /// Options other than initialize and exit need a populated roster.
    pub fn needs_roster(self) -> bool {
        !matches!(self, MenuItem::Initialize | MenuItem::Exit)
    }
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Modal,
}

/// Which panel receives movement keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Menu,
    Table,
}

/// What the right-hand content area shows.
#[derive(Clone, Debug, PartialEq)]
pub enum Pane {
    Welcome,
    Roster,
    Results {
        heading: String,
        records: Vec<StudentRecord>,
    },
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error: Color,
}

impl Theme {
    /// Dark fallback theme using named terminal colors.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            let Some(color) = Self::parse_color(val) else {
                tracing::warn!(key, val, "ignoring unparsable theme color");
                continue;
            };
            match key {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "error" => theme.error = color,
                _ => {}
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# student-roster theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // Named colors get a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(_) => "reset".to_string(),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("error", self.error);

        std::fs::write(path, buf)
    }

    /// Load the theme from `path`, writing the default theme there first if it is missing.
    pub fn load_or_init(path: &str) -> Self {
        if Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default theme");
        }
        t
    }
}

/// Which step of a multi-student initialize, or a single add.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormPurpose {
    Initialize { current: usize, total: usize },
    Add,
}

pub const FORM_FIELDS: [&str; 4] = ["ID", "Name", "Account", "Average score (0 <= score <= 10)"];

/// Text entry state for one student.
#[derive(Clone, Debug, PartialEq)]
pub struct StudentForm {
    pub purpose: FormPurpose,
    pub selected: usize,
    pub values: [String; 4],
    pub error: Option<String>,
}

impl StudentForm {
    pub fn new(purpose: FormPurpose) -> Self {
        Self {
            purpose,
            selected: 0,
            values: Default::default(),
            error: None,
        }
    }

    pub fn title(&self) -> String {
        match self.purpose {
            FormPurpose::Initialize { current, total } => {
                format!("Student {} of {}", current + 1, total)
            }
            FormPurpose::Add => "New student".to_string(),
        }
    }
}

/// Modal dialog states for menu actions.
#[derive(Clone, Debug, PartialEq)]
pub enum ModalState {
    Info { message: String },
    CountInput { value: String, error: Option<String> },
    StudentForm(StudentForm),
    DeleteInput { value: String },
    SortMenu { selected: usize },
    SearchMenu { selected: usize },
    SearchInput { field: SearchField, value: String },
}

pub const SORT_OPTIONS: [(SortKey, &str); 2] = [
    (SortKey::Score, "Sort by average score (descending)"),
    (SortKey::Name, "Sort by name (ascending)"),
];

pub const SEARCH_OPTIONS: [(SearchField, &str); 3] = [
    (SearchField::Id, "Search by ID"),
    (SearchField::Name, "Search by name"),
    (SearchField::Account, "Search by account"),
];

pub struct AppState {
    pub roster: Roster,
    pub menu_index: usize,
    pub focus: Focus,
    pub pane: Pane,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub modal: Option<ModalState>,
    pub search_field: SearchField,
    pub search_query: String,
    pub status: String,
    pub theme: Theme,
    pub keymap: Keymap,
    pub should_quit: bool,
}

impl AppState {
    /// Create an empty session with the given look and bindings.
    pub fn new(theme: Theme, keymap: Keymap) -> Self {
        Self {
            roster: Roster::new(),
            menu_index: 0,
            focus: Focus::Menu,
            pane: Pane::Welcome,
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            modal: None,
            search_field: SearchField::Id,
            search_query: String::new(),
            status: "Select a menu option (1-7)".to_string(),
            theme,
            keymap,
            should_quit: false,
        }
    }

    /// Create a session whose theme and keybindings come from `config_dir`.
    pub fn from_config_dir(config_dir: &Path) -> Self {
        let theme_path = config_dir.join("theme.conf");
        let keys_path = config_dir.join("keybinds.conf");
        let theme = Theme::load_or_init(&theme_path.to_string_lossy());
        let keymap = Keymap::load_or_init(&keys_path.to_string_lossy());
        Self::new(theme, keymap)
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    /// Show a one-off message in a modal and mirror it to the status line.
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status = message.clone();
        self.open_modal(ModalState::Info { message });
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Theme::mocha(), Keymap::default())
    }
}

/// Resolve the configuration directory.
///
/// Order: `explicit`, `$XDG_CONFIG_HOME/student-roster`, `$HOME/.config/student-roster`,
/// then the current directory.
pub fn config_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".config").join(APP_DIR);
    }
    PathBuf::from(".")
}

/// Create the config directory if needed, failing when the path is not a directory.
pub fn ensure_config_dir(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(simple_error(format!(
            "config path {} exists but is not a directory",
            dir.display()
        )));
    }
    std::fs::create_dir_all(dir).with_ctx(|| format!("create config dir {}", dir.display()))
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
