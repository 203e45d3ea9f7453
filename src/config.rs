//! User configuration: deck geometry, scrolling feel, keybindings.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/card-stack/config.toml` (default `~/.config/card-stack/config.toml`).
//! Unknown keys and unparsable values are skipped, so a damaged file only
//! loses the lines it cannot read.

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use card_stack::core::list::DEFAULT_MIN_FLING_VELOCITY;
use card_stack::core::stack_layout::DEFAULT_SCALE_FACTOR;

// ───────────────────────────────────────── actions ───────────

/// Everything a key can be bound to in the deck view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollDown,
    ScrollUp,
    NextCard,
    PrevCard,
    JumpFirst,
    JumpLast,
    GlideFirst,
    GlideLast,
    Quit,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::ScrollDown,
        Action::ScrollUp,
        Action::NextCard,
        Action::PrevCard,
        Action::JumpFirst,
        Action::JumpLast,
        Action::GlideFirst,
        Action::GlideLast,
        Action::Quit,
    ];

    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollDown => "scroll_down",
            Action::ScrollUp => "scroll_up",
            Action::NextCard => "next_card",
            Action::PrevCard => "prev_card",
            Action::JumpFirst => "jump_first",
            Action::JumpLast => "jump_last",
            Action::GlideFirst => "glide_first",
            Action::GlideLast => "glide_last",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// Named keys, in the spelling used by the config file.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("Enter", KeyCode::Enter),
    ("Esc", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("Backspace", KeyCode::Backspace),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
    ("Space", KeyCode::Char(' ')),
];

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

/// A key code plus CTRL/ALT/SHIFT modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && self.modifiers == (event.modifiers & MODIFIER_MASK)
    }

    /// Config-file spelling, e.g. `"Shift+PageDown"` or `"j"`.
    pub fn to_config_string(&self) -> String {
        let mut s = String::new();
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                s.push_str(name);
            }
        }
        match NAMED_KEYS.iter().find(|(_, code)| *code == self.code) {
            Some((name, _)) => s.push_str(name),
            None => match self.code {
                KeyCode::Char(c) => s.push(c),
                KeyCode::F(n) => s.push_str(&format!("F{n}")),
                other => s.push_str(&format!("{other:?}")),
            },
        }
        s
    }

    pub fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let (prefix, key) = match s.rsplit_once('+') {
            // A bare "+" or a trailing "+" binds the plus key itself.
            Some((prefix, "")) => (prefix.strip_suffix('+').unwrap_or(prefix), "+"),
            Some((prefix, key)) => (prefix, key),
            None => ("", s),
        };
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_lowercase().as_str() {
                "ctrl" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return None,
            };
        }

        let code = if let Some((_, code)) = NAMED_KEYS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
        {
            *code
        } else if let Some(n) = key.strip_prefix(['F', 'f']).and_then(|n| n.parse().ok()) {
            KeyCode::F(n)
        } else {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        };
        Some(Self { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Rows kept free below every card.
    pub bottom_offset: i32,
    /// How much the top card shrinks while being covered, in `[0, 1]`.
    pub scale_factor: f32,
    /// Rows scrolled per key press or wheel notch.
    pub scroll_step: i32,
    /// Idle time after the last scroll before the deck snaps to a card.
    pub snap_idle_ms: u64,
    /// Terminal rows per "inch"; drives animation durations.
    pub rows_per_inch: f32,
    /// Slowest drag release, in rows per second, that still turns a card.
    pub min_fling_velocity: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            bottom_offset: 2,
            scale_factor: DEFAULT_SCALE_FACTOR,
            scroll_step: 2,
            snap_idle_ms: 300,
            rows_per_inch: 8.0,
            min_fling_velocity: DEFAULT_MIN_FLING_VELOCITY,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        HashMap::from([
            (ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]),
            (ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]),
            (NextCard, vec![KeyBind::new(PageDown, n), KeyBind::new(Char(' '), n)]),
            (PrevCard, vec![KeyBind::new(PageUp, n), KeyBind::new(Char('b'), n)]),
            (JumpFirst, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]),
            (JumpLast, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), KeyModifiers::SHIFT)]),
            (GlideFirst, vec![KeyBind::new(Char('['), n)]),
            (GlideLast, vec![KeyBind::new(Char(']'), n)]),
            (Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]),
        ])
    }

    /// Find the action bound to a key event.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        Action::ALL.iter().copied().find(|action| {
            self.bindings
                .get(action)
                .is_some_and(|binds| binds.iter().any(|b| b.matches(event)))
        })
    }

    fn first_binding(&self, action: Action) -> String {
        match self.bindings.get(&action).and_then(|b| b.first()) {
            Some(bind) => bind.to_config_string(),
            None => "unbound".into(),
        }
    }

    /// Status-bar hint built from the current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}/{}: card | {}/{}: ends | {}: quit",
            self.first_binding(Action::ScrollDown),
            self.first_binding(Action::ScrollUp),
            self.first_binding(Action::NextCard),
            self.first_binding(Action::PrevCard),
            self.first_binding(Action::GlideFirst),
            self.first_binding(Action::GlideLast),
            self.first_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                info!(path = %path.display(), "loaded config");
                Self::parse(&contents)
            }
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(path)
    }

    pub fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            let parsed = match key {
                "bottom_offset" => value.parse().map(|v: i32| config.bottom_offset = v.max(0)).is_ok(),
                "scale_factor" => value.parse().map(|v| config.scale_factor = v).is_ok(),
                "scroll_step" => value.parse().map(|v: i32| config.scroll_step = v.clamp(1, 50)).is_ok(),
                "snap_idle_ms" => value
                    .parse()
                    .map(|v: u64| config.snap_idle_ms = v.clamp(50, 5_000))
                    .is_ok(),
                "min_fling_velocity" => value
                    .parse()
                    .map(|v: i32| config.min_fling_velocity = v.max(0))
                    .is_ok(),
                "rows_per_inch" => value
                    .parse()
                    .map(|v: f32| config.rows_per_inch = v.clamp(1.0, 100.0))
                    .is_ok(),
                _ => match Action::from_config_key(key) {
                    Some(action) => {
                        let binds: Vec<KeyBind> = value
                            .split(',')
                            .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                            .collect();
                        if !binds.is_empty() {
                            config.bindings.insert(action, binds);
                        }
                        true
                    }
                    None => false,
                },
            };
            if !parsed {
                warn!(line, "ignoring config line");
            }
        }

        config
    }

    pub fn serialise(&self) -> String {
        let mut lines = vec![
            "# card-stack configuration".to_string(),
            String::new(),
            "# Deck".to_string(),
            format!("bottom_offset = {}", self.bottom_offset),
            format!("scale_factor = {}", self.scale_factor),
            format!("scroll_step = {}", self.scroll_step),
            format!("snap_idle_ms = {}", self.snap_idle_ms),
            format!("rows_per_inch = {}", self.rows_per_inch),
            format!("min_fling_velocity = {}", self.min_fling_velocity),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ];
        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(KeyBind::to_config_string).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// `$XDG_CONFIG_HOME/card-stack/config.toml`.
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("card-stack").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_values_and_bindings() {
        let config = AppConfig::parse(
            "# comment\n\
             bottom_offset = 4\n\
             scale_factor = 0.5\n\
             scroll_step = 3\n\
             min_fling_velocity = 35\n\
             next_card = Ctrl+n, Shift+Down\n\
             quit = x\n",
        );
        assert_eq!(config.bottom_offset, 4);
        assert_eq!(config.scale_factor, 0.5);
        assert_eq!(config.scroll_step, 3);
        assert_eq!(config.min_fling_velocity, 35);
        assert_eq!(
            config.bindings[&Action::NextCard],
            vec![
                KeyBind::new(KeyCode::Char('n'), KeyModifiers::CONTROL),
                KeyBind::new(KeyCode::Down, KeyModifiers::SHIFT),
            ]
        );
        assert_eq!(config.bindings[&Action::Quit], vec![KeyBind::new(KeyCode::Char('x'), KeyModifiers::NONE)]);
        // Untouched actions keep their defaults.
        assert_eq!(config.bindings[&Action::ScrollUp], AppConfig::default_bindings()[&Action::ScrollUp]);
    }

    #[test]
    fn bad_lines_are_skipped() {
        let config = AppConfig::parse("bottom_offset = lots\nwhat = ever\nnot a pair\nscroll_step = 999\n");
        assert_eq!(config.bottom_offset, AppConfig::default().bottom_offset);
        assert_eq!(config.scroll_step, 50);
    }

    #[test]
    fn serialised_config_parses_back() {
        let mut config = AppConfig::default();
        config.bottom_offset = 6;
        config.scale_factor = 0.25;
        config.bindings.insert(Action::Quit, vec![KeyBind::new(KeyCode::F(10), KeyModifiers::ALT)]);
        assert_eq!(AppConfig::parse(&config.serialise()), config);
    }

    #[test]
    fn key_strings() {
        assert_eq!(KeyBind::parse("pagedown"), Some(KeyBind::new(KeyCode::PageDown, KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("Ctrl++"), Some(KeyBind::new(KeyCode::Char('+'), KeyModifiers::CONTROL)));
        assert_eq!(KeyBind::parse("Hyper+x"), None);
        assert_eq!(KeyBind::parse("xy"), None);
        assert_eq!(KeyBind::new(KeyCode::Char(' '), KeyModifiers::NONE).to_config_string(), "Space");
    }

    #[test]
    fn match_key_respects_modifiers() {
        let config = AppConfig::default();
        let plain_j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        let ctrl_j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL);
        assert_eq!(config.match_key(plain_j), Some(Action::ScrollDown));
        assert_eq!(config.match_key(ctrl_j), None);
        let shift_g = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(config.match_key(shift_g), Some(Action::JumpLast));
    }
}
