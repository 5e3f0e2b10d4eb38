//! Prefab factory - one explicit builder per piece kind
//!
//! Every piece is built from a static table of cube offsets. Nothing is cloned
//! from a template object; the factory allocates fresh ids for the piece and
//! each of its cubes.

use glam::{IVec3, Vec3};

use crate::error::SetupError;
use crate::piece::{Cube, CubeId, Piece, PieceId};
use crate::rng::PrefabPicker;
use crate::transform::Transform;
use crate::types::PieceKind;

const LINE: [IVec3; 4] = [
    IVec3::new(0, 2, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, 0, 0),
    IVec3::new(0, -1, 0),
];

const QUAD: [IVec3; 4] = [
    IVec3::new(0, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(1, 1, 0),
];

const TEE: [IVec3; 4] = [
    IVec3::new(-1, 0, 0),
    IVec3::new(0, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(0, 1, 0),
];

const ELL: [IVec3; 4] = [
    IVec3::new(0, 1, 0),
    IVec3::new(0, 0, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(1, -1, 0),
];

const SKEW: [IVec3; 4] = [
    IVec3::new(-1, 0, 0),
    IVec3::new(0, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(1, 1, 0),
];

/// Cube offsets of a prefab, relative to the piece origin.
pub fn shape(kind: PieceKind) -> &'static [IVec3] {
    match kind {
        PieceKind::Line => &LINE,
        PieceKind::Quad => &QUAD,
        PieceKind::Tee => &TEE,
        PieceKind::Ell => &ELL,
        PieceKind::Skew => &SKEW,
    }
}

/// Monotonic ids for pieces and cubes.
///
/// Ids are only unique within one allocator. Two allocators both start at 1.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_piece: u32,
    next_cube: u32,
}

impl IdAllocator {
    pub fn piece(&mut self) -> PieceId {
        self.next_piece = self.next_piece.wrapping_add(1);
        PieceId(self.next_piece)
    }

    pub fn cube(&mut self) -> CubeId {
        self.next_cube = self.next_cube.wrapping_add(1);
        CubeId(self.next_cube)
    }
}

/// Builds pieces for the controller.
///
/// Each factory numbers its own pieces, so a piece built here only has a
/// unique id among pieces of the same factory. Stack collision tells a piece
/// apart from the stack by id: a piece from a second factory can share an id
/// with a stacked piece and pass through it. Spawn through the controller
/// that owns the stack.
#[derive(Debug, Clone)]
pub struct PrefabFactory {
    picker: PrefabPicker,
    ids: IdAllocator,
}

impl PrefabFactory {
    pub fn new(kinds: &[PieceKind], seed: u32) -> Result<Self, SetupError> {
        let picker = PrefabPicker::new(kinds, seed);
        if picker.is_empty() {
            return Err(SetupError::NoPrefabs);
        }
        Ok(Self {
            picker,
            ids: IdAllocator::default(),
        })
    }

    pub fn kinds(&self) -> &[PieceKind] {
        self.picker.kinds()
    }

    pub fn seed(&self) -> u32 {
        self.picker.seed()
    }

    /// Build a piece of `kind` with its origin at `spawn`.
    pub fn build(&mut self, kind: PieceKind, spawn: Vec3) -> Result<Piece, SetupError> {
        let offsets = shape(kind);
        let id = self.ids.piece();
        let cubes: Vec<Cube> = offsets
            .iter()
            .map(|&local| Cube {
                id: self.ids.cube(),
                local,
            })
            .collect();
        Piece::new(id, kind, Transform::at(spawn), &cubes)
    }

    /// Build a randomly chosen prefab.
    pub fn build_random(&mut self, spawn: Vec3) -> Result<Piece, SetupError> {
        let kind = self.picker.draw().ok_or(SetupError::NoPrefabs)?;
        self.build(kind, spawn)
    }
}
