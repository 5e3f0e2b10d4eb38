//! Stack controller - settled stack, falling piece and the clear cascade
//!
//! # Per-tick flow
//!
//! [`StackController::update`] runs once per tick before the pieces move:
//!
//! 1. A lost game forces pause.
//! 2. The pause key toggles pause (gravity 0 while paused).
//! 3. While paused nothing else happens.
//! 4. An active cascade advances one step and ends the tick.
//! 5. Loss detection: any settled cube at or above `top + 1`.
//! 6. Gravity follows the fast-drop key.
//! 7. A falling piece that settled is absorbed into the stack and the layers
//!    are checked for clears.
//!
//! # Cascade
//!
//! A clear pass destroys every full layer at once and collects the pieces with
//! surviving cubes at or above the lowest cleared layer. Those pieces are
//! released on the next tick, fall under their own ticks, and once every one of
//! them has settled the stack positions are re-read and another clear pass
//! runs. No piece spawns while a cascade is in progress.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;

use crate::error::SetupError;
use crate::grid::Grid;
use crate::input::{InputSource, Overlay};
use crate::piece::{Piece, PieceId};
use crate::prefabs::PrefabFactory;
use crate::schedule::{Scheduler, SessionEvent};
use crate::snapshot::{CubeSnapshot, GridSnapshot, SimSnapshot};
use crate::spatial::same_layer;
use crate::stack::{CubeRef, StackRegistry};
use crate::transform::Orientation;
use crate::types::{
    ClearStage, CoreEvent, Key, PieceKind, CUBE_SIZE, FAST_DROP_GRAVITY, NORMAL_GRAVITY,
    RESPAWN_DELAY_MS,
};

/// Owns every piece, the stack registry and the session flags.
#[derive(Debug, Clone)]
pub struct StackController {
    grid: Grid,
    pieces: BTreeMap<PieceId, Piece>,
    stack: StackRegistry,
    falling: Option<PieceId>,
    stage: ClearStage,
    cascading: Vec<PieceId>,
    lost: bool,
    paused: bool,
    gravity: f32,
    factory: PrefabFactory,
    scheduler: Scheduler,
    due: Vec<SessionEvent>,
    events: Vec<CoreEvent>,
    layers_cleared: u32,
    pieces_locked: u32,
}

impl StackController {
    /// Controller over `grid` spawning from `factory`.
    ///
    /// Every piece id the controller sees must come from `factory`.
    /// The grid spacing must equal [`CUBE_SIZE`]: movement, overlap and layer
    /// snapping all work in unit steps.
    pub fn new(grid: Grid, factory: PrefabFactory) -> Result<Self, SetupError> {
        if (grid.spacing() - CUBE_SIZE).abs() > f32::EPSILON {
            return Err(SetupError::UnsupportedSpacing(grid.spacing()));
        }
        Ok(Self {
            grid,
            pieces: BTreeMap::new(),
            stack: StackRegistry::new(),
            falling: None,
            stage: ClearStage::Idle,
            cascading: Vec::new(),
            lost: false,
            paused: false,
            gravity: NORMAL_GRAVITY,
            factory,
            scheduler: Scheduler::new(),
            due: Vec::new(),
            events: Vec::new(),
            layers_cleared: 0,
            pieces_locked: 0,
        })
    }

    /// Controller over `grid` drawing from `kinds`.
    pub fn with_prefabs(grid: Grid, kinds: &[PieceKind], seed: u32) -> Result<Self, SetupError> {
        Self::new(grid, PrefabFactory::new(kinds, seed)?)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn stack(&self) -> &StackRegistry {
        &self.stack
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// Every live piece, falling or settled, in id order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    pub fn falling_piece(&self) -> Option<&Piece> {
        self.falling.and_then(|id| self.pieces.get(&id))
    }

    pub fn stage(&self) -> ClearStage {
        self.stage
    }

    pub fn cascading(&self) -> &[PieceId] {
        &self.cascading
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn layers_cleared(&self) -> u32 {
        self.layers_cleared
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Drain events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<CoreEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queue a spawn `delay_ms` from now.
    pub fn schedule_spawn(&mut self, delay_ms: u32) {
        self.scheduler.after(delay_ms, SessionEvent::SpawnPiece);
    }

    /// Advance the clock and run every deferred event that came due.
    pub fn advance_timers(&mut self, elapsed_ms: u32) {
        let mut due = std::mem::take(&mut self.due);
        self.scheduler.advance(elapsed_ms, &mut due);
        for event in due.drain(..) {
            match event {
                SessionEvent::SpawnPiece => {
                    self.spawn_piece();
                }
            }
        }
        self.due = due;
    }

    fn can_spawn(&self) -> bool {
        if self.lost {
            log::debug!("spawn skipped: game is lost");
            return false;
        }
        if self.falling.is_some() {
            log::debug!("spawn skipped: a piece is already falling");
            return false;
        }
        if self.stage.is_active() {
            log::debug!("spawn skipped: cascade in progress");
            return false;
        }
        true
    }

    /// Spawn a random prefab at the grid's spawn point.
    ///
    /// No-op while lost, while a piece is falling, or during a cascade.
    pub fn spawn_piece(&mut self) -> Option<PieceId> {
        if !self.can_spawn() {
            return None;
        }
        let spawn = self.grid.spawn_position();
        match self.factory.build_random(spawn) {
            Ok(piece) => Some(self.insert_falling(piece)),
            Err(err) => {
                log::error!("failed to build piece: {}", err);
                None
            }
        }
    }

    /// Spawn a specific prefab with its origin at `position`. Same guards as
    /// [`StackController::spawn_piece`].
    pub fn spawn_kind_at(&mut self, kind: PieceKind, position: Vec3) -> Option<PieceId> {
        if !self.can_spawn() {
            return None;
        }
        match self.factory.build(kind, position) {
            Ok(piece) => Some(self.insert_falling(piece)),
            Err(err) => {
                log::error!("failed to build {} piece: {}", kind.as_str(), err);
                None
            }
        }
    }

    fn insert_falling(&mut self, piece: Piece) -> PieceId {
        let id = piece.id();
        let kind = piece.kind();
        log::debug!("spawned {} piece {} at {:?}", kind.as_str(), id.0, piece.position());
        self.pieces.insert(id, piece);
        self.falling = Some(id);
        self.events.push(CoreEvent::PieceSpawned {
            piece_id: id.0,
            kind,
        });
        id
    }

    /// Put an already-settled piece straight into the stack, without running a
    /// clear pass. Used to set up boards.
    pub fn place_settled(
        &mut self,
        kind: PieceKind,
        position: Vec3,
        orientation: Orientation,
    ) -> Result<PieceId, SetupError> {
        let mut piece = self.factory.build(kind, position)?;
        piece.transform_mut().orientation = orientation;
        piece.settle();
        self.stack.absorb(&piece);
        let id = piece.id();
        self.pieces.insert(id, piece);
        Ok(id)
    }

    /// One controller tick. See the module docs for the order of steps.
    pub fn update(&mut self, input: &impl InputSource, overlay: &mut impl Overlay) {
        if self.lost {
            self.paused = true;
        }

        if input.was_pressed(Key::Pause) && !self.lost {
            self.paused = !self.paused;
            self.gravity = if self.paused { 0.0 } else { NORMAL_GRAVITY };
            log::debug!("pause {}", if self.paused { "on" } else { "off" });
        }
        if self.paused {
            return;
        }

        if self.handle_animate() {
            return;
        }

        self.handle_lose(overlay);

        self.gravity = if input.is_held(Key::FastDrop) {
            FAST_DROP_GRAVITY
        } else {
            NORMAL_GRAVITY
        };

        let Some(id) = self.falling else {
            return;
        };
        let settled = self.pieces.get(&id).map_or(true, Piece::is_settled);
        if settled {
            self.lock_falling();
            self.handle_platform();
        }
    }

    fn lock_falling(&mut self) {
        let Some(id) = self.falling.take() else {
            return;
        };
        let Some(piece) = self.pieces.get(&id) else {
            return;
        };
        self.stack.absorb(piece);
        self.pieces_locked += 1;
        let cubes = piece.cubes().len() as u32;
        log::debug!("piece {} locked with {} cubes", id.0, cubes);
        self.events.push(CoreEvent::PieceLocked {
            piece_id: id.0,
            cubes,
        });
    }

    /// Descend every unsettled piece and apply the player's moves to the
    /// falling one. Frozen while paused.
    pub fn tick_pieces(&mut self, dt_secs: f32, input: &impl InputSource) {
        if self.paused {
            return;
        }
        let gravity = self.gravity;
        for piece in self.pieces.values_mut() {
            if piece.is_settled() {
                continue;
            }
            piece.tick(dt_secs, gravity, &self.grid);
            if Some(piece.id()) != self.falling || piece.is_settled() {
                continue;
            }
            piece.handle_movement(input, &self.grid, &self.stack);
            piece.handle_rotation(input, &self.grid, &self.stack);
        }
    }

    /// Resolve stack collisions for every unsettled piece. Skipped while paused.
    pub fn late_tick_pieces(&mut self) {
        if self.paused {
            return;
        }
        for piece in self.pieces.values_mut() {
            piece.late_tick(&self.stack);
        }
    }

    /// Flag the game as lost once the stack reaches `top + 1`.
    ///
    /// Returns whether the game is lost.
    pub fn handle_lose(&mut self, overlay: &mut impl Overlay) -> bool {
        if self.lost {
            return true;
        }
        let limit = self.grid.top_ws() + 1.0;
        if self.stack.positions().iter().any(|p| p.y >= limit) {
            self.lost = true;
            overlay.show_game_over();
            overlay.request_redraw();
            self.events.push(CoreEvent::GameOver);
            log::info!(
                "game over after {} pieces, {} layers cleared",
                self.pieces_locked,
                self.layers_cleared
            );
        }
        self.lost
    }

    /// Advance the cascade by one step. Returns true while it is still busy.
    pub fn handle_animate(&mut self) -> bool {
        match self.stage {
            ClearStage::Idle => false,
            ClearStage::Release => {
                for id in &self.cascading {
                    if let Some(piece) = self.pieces.get_mut(id) {
                        piece.release();
                    }
                }
                log::debug!("released {} pieces", self.cascading.len());
                self.events.push(CoreEvent::CascadeReleased {
                    pieces: self.cascading.len() as u32,
                });
                self.stage = ClearStage::WaitForSettle;
                true
            }
            ClearStage::WaitForSettle => {
                let busy = self
                    .cascading
                    .iter()
                    .filter_map(|id| self.pieces.get(id))
                    .any(|p| !p.is_settled());
                if busy {
                    return true;
                }
                let pieces = &self.pieces;
                self.stack.refresh(|r| {
                    pieces
                        .get(&r.piece)
                        .and_then(|p| p.cube_position(r.cube))
                });
                self.cascading.clear();
                self.stage = ClearStage::Idle;
                self.events.push(CoreEvent::CascadeSettled);
                log::debug!("cascade settled, checking layers again");
                self.handle_platform()
            }
        }
    }

    /// Clear every full layer in one pass and start the cascade.
    ///
    /// Returns false (and schedules the next spawn) when nothing was full.
    pub fn handle_platform(&mut self) -> bool {
        let per_layer = self.grid.cells_per_layer();
        let mut min_y: Option<f32> = None;
        let mut layers = 0u32;
        let mut destroy: BTreeSet<CubeRef> = BTreeSet::new();
        let mut found: Vec<CubeRef> = Vec::with_capacity(per_layer);

        for i in 0..self.grid.height() {
            let layer_y = self.grid.layer_y(i);
            found.clear();
            found.extend(
                self.stack
                    .iter()
                    .filter(|(pos, _)| same_layer(pos.y, layer_y))
                    .map(|(_, cube)| cube),
            );
            if found.len() == per_layer {
                min_y.get_or_insert(layer_y);
                layers += 1;
                destroy.extend(found.iter().copied());
            }
        }

        let Some(min_y) = min_y else {
            self.schedule_spawn(RESPAWN_DELAY_MS);
            return false;
        };

        for cube in &destroy {
            if let Some(piece) = self.pieces.get_mut(&cube.piece) {
                piece.remove_cube(cube.cube);
            }
        }

        let mut cascading: Vec<PieceId> = Vec::new();
        self.stack.retain(|pos, cube| {
            if destroy.contains(&cube) {
                return false;
            }
            if pos.y >= min_y && !cascading.contains(&cube.piece) {
                cascading.push(cube.piece);
            }
            true
        });
        self.pieces.retain(|_, p| !p.is_empty());

        let cubes = destroy.len() as u32;
        self.layers_cleared += layers;
        log::info!(
            "cleared {} layer(s), {} cubes; {} pieces to cascade",
            layers,
            cubes,
            cascading.len()
        );
        self.events.push(CoreEvent::LayersCleared { layers, cubes });

        self.cascading = cascading;
        self.stage = ClearStage::Release;
        true
    }

    /// Start over after a game over. No-op unless lost.
    pub fn reload(&mut self, overlay: &mut impl Overlay) -> bool {
        if !self.lost {
            return false;
        }
        self.lost = false;
        overlay.hide_game_over();
        overlay.request_redraw();

        self.stack.clear();
        self.falling = None;
        self.pieces.clear();
        self.cascading.clear();
        self.stage = ClearStage::Idle;
        self.paused = false;
        self.gravity = NORMAL_GRAVITY;
        self.layers_cleared = 0;
        self.pieces_locked = 0;

        self.scheduler.cancel_all();
        self.schedule_spawn(RESPAWN_DELAY_MS);
        self.events.push(CoreEvent::Reloaded);
        log::info!("reloaded, next piece in {} ms", RESPAWN_DELAY_MS);
        true
    }

    /// Fill `out` with the current state, reusing its cube buffer.
    pub fn snapshot_into(&self, out: &mut SimSnapshot) {
        out.grid = GridSnapshot::from(&self.grid);
        out.cubes.clear();
        for piece in self.pieces.values() {
            let falling = Some(piece.id()) == self.falling;
            for (cube, pos) in piece.cube_positions() {
                out.cubes.push(CubeSnapshot {
                    piece_id: piece.id().0,
                    cube_id: cube.0,
                    kind: piece.kind(),
                    x: pos.x,
                    y: pos.y,
                    z: pos.z,
                    falling,
                });
            }
        }
        out.falling_piece = self.falling.map(|id| id.0);
        out.stage = self.stage;
        out.cascading = self.cascading.len() as u32;
        out.lost = self.lost;
        out.paused = self.paused;
        out.gravity = self.gravity;
        out.layers_cleared = self.layers_cleared;
        out.pieces_locked = self.pieces_locked;
        out.stack_len = self.stack.len() as u32;
        out.now_ms = self.scheduler.now_ms();
    }

    pub fn snapshot(&self) -> SimSnapshot {
        let mut out = SimSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }
}
