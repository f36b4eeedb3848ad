//! Key bindings and on-screen button mapping.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press or button click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateCw,
    RotateCcw,
    /// Start when stopped, stop when running.
    Toggle,
    Quit,
    None,
}

impl Action {
    /// Gameplay commands; these do nothing while the game is stopped.
    pub fn is_command(&self) -> bool {
        matches!(
            self,
            Self::MoveLeft | Self::MoveRight | Self::SoftDrop | Self::RotateCw | Self::RotateCcw
        )
    }
}

/// Map key event to action. Arrows move/drop/rotate and `q` rotates counter-clockwise.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    if modifiers == KeyModifiers::CONTROL {
        return match code {
            KeyCode::Char('c') => Action::Quit,
            _ => Action::None,
        };
    }
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Left => Action::MoveLeft,
        KeyCode::Right => Action::MoveRight,
        KeyCode::Down => Action::SoftDrop,
        KeyCode::Up => Action::RotateCw,
        KeyCode::Char('q' | 'Q') => Action::RotateCcw,
        KeyCode::Char('s' | 'S') | KeyCode::Enter => Action::Toggle,
        _ => Action::None,
    }
}

/// On-screen buttons, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Down,
    Rotate,
    StartStop,
}

impl Button {
    pub const ALL: [Self; 5] = [
        Self::Left,
        Self::Right,
        Self::Down,
        Self::Rotate,
        Self::StartStop,
    ];

    /// Label shown on the button; the start button follows the running flag.
    pub fn label(&self, running: bool) -> &'static str {
        match self {
            Self::Left => "←",
            Self::Right => "→",
            Self::Down => "↓",
            Self::Rotate => "⟳",
            Self::StartStop if running => "Stop",
            Self::StartStop => "Start",
        }
    }

    pub fn action(&self) -> Action {
        match self {
            Self::Left => Action::MoveLeft,
            Self::Right => Action::MoveRight,
            Self::Down => Action::SoftDrop,
            Self::Rotate => Action::RotateCw,
            Self::StartStop => Action::Toggle,
        }
    }
}
