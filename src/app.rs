use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::config::{Config, KeybindsConfig, parse_key};
use crate::system::snapshot::UtilizationSnapshot;
use crate::ui::theme::{
    BorderStyle, ColorSupport, HeatOverrides, Theme, resolve_color_support,
};

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub refresh: KeyCode,
    pub toggle_cores: KeyCode,
    pub cycle_theme: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
            toggle_cores: parse_key(&kb.toggle_cores).unwrap_or(KeyCode::Char('c')),
            cycle_theme: parse_key(&kb.cycle_theme).unwrap_or(KeyCode::Char('t')),
        }
    }

    /// Returns (key_label, description) pairs for the status bar.
    pub fn hint_entries(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.refresh), "Refresh"),
            (key_label(self.toggle_cores), "Cores"),
            (key_label(self.cycle_theme), "Theme"),
        ]
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        _ => "?".to_string(),
    }
}

/// Render-side state. Holds the latest published snapshot; never touches the
/// engine itself.
pub struct App {
    pub running: bool,
    pub snapshot: UtilizationSnapshot,
    pub show_cores: bool,
    pub theme: Theme,
    pub color_support: ColorSupport,
    pub border_style: BorderStyle,
    pub keybinds: ResolvedKeybinds,
    heat_overrides: HeatOverrides,
    refresh_requested: bool,
}

impl App {
    pub fn new(config: &Config, snapshot: UtilizationSnapshot) -> Self {
        let color_support = resolve_color_support(&config.general.color_support);
        let heat_overrides = HeatOverrides::from_config(&config.colors);
        let theme = Theme::from_config(&config.colors.theme, &heat_overrides, color_support);

        App {
            running: true,
            snapshot,
            show_cores: config.general.show_core_gauges,
            theme,
            color_support,
            border_style: BorderStyle::from_config_str(&config.general.border_style),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            heat_overrides,
            refresh_requested: false,
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: UtilizationSnapshot) {
        self.snapshot = snapshot;
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        let kb = &self.keybinds;
        match key.code {
            code if code == kb.quit => Action::Quit,
            code if code == kb.refresh => Action::Refresh,
            code if code == kb.toggle_cores => Action::ToggleCores,
            code if code == kb.cycle_theme => Action::CycleTheme,
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Refresh => self.refresh_requested = true,
            Action::ToggleCores => self.show_cores = !self.show_cores,
            Action::CycleTheme => {
                self.theme = self.theme.next(&self.heat_overrides, self.color_support);
            }
            Action::None => {}
        }
    }

    /// Returns whether an out-of-band refresh was requested since the last
    /// call.
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    pub fn quit_hint(&self) -> String {
        format!("Press '{}' to quit.", key_label(self.keybinds.quit))
    }
}
