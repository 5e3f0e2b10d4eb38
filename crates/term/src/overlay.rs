//! Terminal side of the simulation's UI notifications.

use crate::core::Overlay;

/// Remembers whether the game-over banner is up and whether the simulation
/// asked for a redraw since the last frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TermOverlay {
    game_over: bool,
    redraw: bool,
}

impl TermOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game_over_visible(&self) -> bool {
        self.game_over
    }

    /// Consume a pending redraw request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }
}

impl Overlay for TermOverlay {
    fn show_game_over(&mut self) {
        self.game_over = true;
    }

    fn hide_game_over(&mut self) {
        self.game_over = false;
    }

    fn request_redraw(&mut self) {
        self.redraw = true;
    }
}
