//! RNG module - deterministic prefab selection
//!
//! The next piece is a uniform pick over the configured prefab kinds. A small
//! LCG keeps the sequence reproducible from a seed, which the tests and the
//! `--seed` flag rely on.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    seed: u32,
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { seed: state, state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Low bits of an LCG cycle with short periods.
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Uniformly pick one item, `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.next_range(items.len() as u32) as usize;
        items.get(i)
    }

    /// The seed this generator started from (for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

/// Picks the kind of the next piece from a fixed prefab list.
#[derive(Debug, Clone)]
pub struct PrefabPicker {
    kinds: Vec<PieceKind>,
    rng: SimpleRng,
}

impl PrefabPicker {
    pub fn new(kinds: &[PieceKind], seed: u32) -> Self {
        Self {
            kinds: kinds.to_vec(),
            rng: SimpleRng::new(seed),
        }
    }

    pub fn kinds(&self) -> &[PieceKind] {
        &self.kinds
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Draw the next kind. `None` only when no kinds are configured.
    pub fn draw(&mut self) -> Option<PieceKind> {
        self.rng.pick(&self.kinds).copied()
    }

    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }
}
