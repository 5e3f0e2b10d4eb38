//! Collaborator seams: sampled input and the game-over overlay.

use crate::types::{Key, KeyFrame};

/// Per-tick keyboard capability.
///
/// `was_pressed` is edge-triggered (true for the one tick a key went down),
/// `is_held` is level-triggered.
pub trait InputSource {
    fn is_held(&self, key: Key) -> bool;
    fn was_pressed(&self, key: Key) -> bool;
}

impl InputSource for KeyFrame {
    fn is_held(&self, key: Key) -> bool {
        KeyFrame::is_held(self, key)
    }

    fn was_pressed(&self, key: Key) -> bool {
        KeyFrame::was_pressed(self, key)
    }
}

/// UI notifications the simulation emits.
pub trait Overlay {
    fn show_game_over(&mut self);
    fn hide_game_over(&mut self);
    fn request_redraw(&mut self);
}

/// Overlay that ignores everything (headless runs, benches).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOverlay;

impl Overlay for NullOverlay {
    fn show_game_over(&mut self) {}
    fn hide_game_over(&mut self) {}
    fn request_redraw(&mut self) {}
}
