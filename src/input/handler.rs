use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Action;

/// What a key press asks the current mode to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Turn relative to the current heading
    Turn(Action),
    Restart,
    Quit,
    /// Toggle playback pause (watch mode)
    Pause,
    /// Select playback speed 1..=4 (watch mode)
    Speed(u8),
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Turns - arrow keys
            KeyCode::Left => KeyAction::Turn(Action::Left),
            KeyCode::Right => KeyAction::Turn(Action::Right),

            // Turns - A/D
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Turn(Action::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Turn(Action::Right),

            // Playback
            KeyCode::Char(' ') => KeyAction::Pause,
            KeyCode::Char(c @ '1'..='4') => KeyAction::Speed(c as u8 - b'0'),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
