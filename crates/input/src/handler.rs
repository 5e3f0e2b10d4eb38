//! Keyboard state for terminal environments.
//!
//! Collects key events between ticks and turns them into one [`KeyFrame`] per
//! tick. Supports terminals that do not emit key release events by expiring
//! held keys after a timeout.

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::map_key;
use crate::types::{Key, KeyFrame, KEY_RELEASE_TIMEOUT_MS};

#[derive(Debug, Clone)]
pub struct KeyboardState {
    edges: KeyFrame,
    /// Milliseconds since each held key was last seen, `None` when up.
    held_for: [Option<u32>; Key::ALL.len()],
    key_release_timeout_ms: u32,
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardState {
    pub fn new() -> Self {
        Self {
            edges: KeyFrame::default(),
            held_for: [None; Key::ALL.len()],
            key_release_timeout_ms: KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Feed one terminal event. Returns the simulation key it mapped to.
    pub fn handle_event(&mut self, event: KeyEvent) -> Option<Key> {
        let key = map_key(event)?;
        match event.kind {
            KeyEventKind::Press => self.press(key),
            KeyEventKind::Repeat => self.held_for[key.index()] = Some(0),
            KeyEventKind::Release => self.release(key),
        }
        Some(key)
    }

    pub fn press(&mut self, key: Key) {
        self.edges.press(key);
        self.held_for[key.index()] = Some(0);
    }

    pub fn release(&mut self, key: Key) {
        self.held_for[key.index()] = None;
    }

    pub fn release_all(&mut self) {
        self.held_for = [None; Key::ALL.len()];
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held_for[key.index()].is_some()
    }

    /// Input for the tick that is about to run.
    ///
    /// Edges collected since the last call are reported once; held keys that
    /// have not been seen for longer than the release timeout are dropped.
    pub fn begin_tick(&mut self, elapsed_ms: u32) -> KeyFrame {
        let mut frame = self.edges;
        self.edges.clear();
        for key in Key::ALL {
            let slot = &mut self.held_for[key.index()];
            if let Some(age) = *slot {
                if age > self.key_release_timeout_ms {
                    *slot = None;
                    continue;
                }
                frame.hold(key);
                *slot = Some(age.saturating_add(elapsed_ms));
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn press_is_reported_for_one_tick() {
        let mut kb = KeyboardState::new();
        kb.handle_event(event(KeyCode::Left, KeyEventKind::Press));
        let first = kb.begin_tick(16);
        assert!(first.was_pressed(Key::MoveLeft));
        assert!(first.is_held(Key::MoveLeft));
        let second = kb.begin_tick(16);
        assert!(!second.was_pressed(Key::MoveLeft));
        assert!(second.is_held(Key::MoveLeft));
    }

    #[test]
    fn release_event_ends_hold() {
        let mut kb = KeyboardState::new();
        kb.handle_event(event(KeyCode::Char(' '), KeyEventKind::Press));
        kb.handle_event(event(KeyCode::Char(' '), KeyEventKind::Release));
        let frame = kb.begin_tick(16);
        // The tap still counts as an edge.
        assert!(frame.was_pressed(Key::FastDrop));
        assert!(frame.is_held(Key::FastDrop));
        assert!(!kb.is_held(Key::FastDrop));
    }

    #[test]
    fn held_keys_expire_without_release_events() {
        let mut kb = KeyboardState::new().with_key_release_timeout_ms(40);
        kb.handle_event(event(KeyCode::Char(' '), KeyEventKind::Press));
        for _ in 0..3 {
            assert!(kb.begin_tick(16).is_held(Key::FastDrop));
        }
        assert!(!kb.begin_tick(16).is_held(Key::FastDrop));
    }

    #[test]
    fn repeat_refreshes_hold_without_edge() {
        let mut kb = KeyboardState::new().with_key_release_timeout_ms(40);
        kb.handle_event(event(KeyCode::Char(' '), KeyEventKind::Press));
        kb.begin_tick(32);
        kb.handle_event(event(KeyCode::Char(' '), KeyEventKind::Repeat));
        let frame = kb.begin_tick(32);
        assert!(frame.is_held(Key::FastDrop));
        assert!(!frame.was_pressed(Key::FastDrop));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut kb = KeyboardState::new();
        assert_eq!(kb.handle_event(event(KeyCode::Char('q'), KeyEventKind::Press)), None);
        assert!(kb.begin_tick(16).is_empty());
    }
}
