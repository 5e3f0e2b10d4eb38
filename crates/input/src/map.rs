//! Key mapping from terminal events to simulation keys.

use crate::types::Key;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a terminal key event to a simulation key.
///
/// Rotation letters are case-sensitive: lowercase turns counter-clockwise,
/// uppercase (shift) clockwise.
pub fn map_key(key: KeyEvent) -> Option<Key> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        // Movement
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::MoveRight),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::MoveLeft),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::MoveForward),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::MoveBack),

        // Rotation
        KeyCode::Char('x') => Some(Key::RotateXPos),
        KeyCode::Char('X') => Some(Key::RotateXNeg),
        KeyCode::Char('y') => Some(Key::RotateYPos),
        KeyCode::Char('Y') => Some(Key::RotateYNeg),
        KeyCode::Char('z') => Some(Key::RotateZPos),
        KeyCode::Char('Z') => Some(Key::RotateZNeg),

        // Actions
        KeyCode::Char(' ') => Some(Key::FastDrop),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Key::Pause),
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => Some(Key::Reset),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
