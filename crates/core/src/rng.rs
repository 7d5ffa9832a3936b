//! RNG module - seeded tile generation
//!
//! The board refills from a [`TileBag`]: a palette of enabled tile kinds drawn
//! uniformly through a small deterministic LCG. Same seed, same boards, which
//! keeps levels reproducible for tests and replays.

use arrayvec::ArrayVec;

use crate::types::TileKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        // Low bits of a power-of-two LCG cycle quickly; use the high half.
        self.state >> 16
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Uniform source of tile kinds restricted to a level's palette
#[derive(Debug, Clone)]
pub struct TileBag {
    kinds: ArrayVec<TileKind, { TileKind::COUNT }>,
    rng: SimpleRng,
    seed: u32,
}

impl TileBag {
    /// Create a bag over `kinds` (duplicates ignored, order preserved).
    ///
    /// An empty palette falls back to every kind.
    pub fn new(kinds: &[TileKind], seed: u32) -> Self {
        let mut palette = ArrayVec::new();
        for &kind in kinds {
            if !palette.contains(&kind) {
                palette.push(kind);
            }
        }
        if palette.is_empty() {
            palette.extend(TileKind::ALL);
        }
        Self {
            kinds: palette,
            rng: SimpleRng::new(seed),
            seed,
        }
    }

    /// Draw any kind from the palette
    pub fn draw(&mut self) -> TileKind {
        let i = self.rng.next_range(self.kinds.len() as u32) as usize;
        self.kinds[i]
    }

    /// Draw a kind that is not in `avoid`, if the palette allows it.
    ///
    /// Falls back to an unrestricted draw when every kind is excluded.
    pub fn draw_avoiding(&mut self, avoid: &[TileKind]) -> TileKind {
        let allowed: ArrayVec<TileKind, { TileKind::COUNT }> = self
            .kinds
            .iter()
            .copied()
            .filter(|k| !avoid.contains(k))
            .collect();
        if allowed.is_empty() {
            return self.draw();
        }
        let i = self.rng.next_range(allowed.len() as u32) as usize;
        allowed[i]
    }

    pub fn kinds(&self) -> &[TileKind] {
        &self.kinds
    }

    pub fn rng_mut(&mut self) -> &mut SimpleRng {
        &mut self.rng
    }

    /// Seed the bag was created with (for restarting with the same boards)
    pub fn seed(&self) -> u32 {
        self.seed
    }
}
