//! Session - one game from boot to game over, and every reload after that
//!
//! The session owns the controller and drives it frame by frame. Each frame
//! samples input once and runs, in order:
//!
//! 1. due timers (deferred spawns)
//! 2. the controller update
//! 3. a reset request (ignored unless the game is lost)
//! 4. every piece's tick
//! 5. every piece's late tick, unless paused

use crate::core::{
    Grid, InputSource, Overlay, SetupError, SimSnapshot, StackController,
};
use crate::types::{
    CoreEvent, Key, PieceKind, BOOT_SPAWN_DELAY_MS, GRID_DEPTH, GRID_HEIGHT, GRID_SPACING,
    GRID_WIDTH,
};

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub spacing: f32,
    pub seed: u32,
    pub kinds: Vec<PieceKind>,
    pub boot_delay_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            depth: GRID_DEPTH,
            spacing: GRID_SPACING,
            seed: 1,
            kinds: PieceKind::ALL.to_vec(),
            boot_delay_ms: BOOT_SPAWN_DELAY_MS,
        }
    }
}

impl SessionConfig {
    pub fn grid(&self) -> Result<Grid, SetupError> {
        Grid::new(self.width, self.height, self.depth, self.spacing)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    controller: StackController,
    frames: u64,
}

impl Session {
    /// Validate the configuration, build the controller and queue the first spawn.
    pub fn new(config: &SessionConfig) -> Result<Self, SetupError> {
        let grid = config.grid()?;
        let mut controller = StackController::with_prefabs(grid, &config.kinds, config.seed)?;
        controller.schedule_spawn(config.boot_delay_ms);
        log::info!(
            "session started: {}x{}x{} grid, seed {}, first piece in {} ms",
            config.width,
            config.height,
            config.depth,
            config.seed,
            config.boot_delay_ms
        );
        Ok(Self {
            controller,
            frames: 0,
        })
    }

    pub fn controller(&self) -> &StackController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut StackController {
        &mut self.controller
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_lost(&self) -> bool {
        self.controller.is_lost()
    }

    pub fn is_paused(&self) -> bool {
        self.controller.is_paused()
    }

    /// Run one frame of `elapsed_ms` with input sampled for this frame.
    pub fn frame(
        &mut self,
        elapsed_ms: u32,
        input: &impl InputSource,
        overlay: &mut impl Overlay,
    ) {
        self.frames += 1;
        self.controller.advance_timers(elapsed_ms);
        self.controller.update(input, overlay);
        if input.was_pressed(Key::Reset) {
            self.reload(overlay);
        }
        let dt_secs = elapsed_ms as f32 / 1000.0;
        self.controller.tick_pieces(dt_secs, input);
        self.controller.late_tick_pieces();
    }

    /// Restart after a game over. No-op (false) while the game is running.
    pub fn reload(&mut self, overlay: &mut impl Overlay) -> bool {
        self.controller.reload(overlay)
    }

    pub fn take_events(&mut self) -> Vec<CoreEvent> {
        self.controller.take_events()
    }

    pub fn snapshot_into(&self, out: &mut SimSnapshot) {
        self.controller.snapshot_into(out);
    }

    pub fn snapshot(&self) -> SimSnapshot {
        self.controller.snapshot()
    }
}
