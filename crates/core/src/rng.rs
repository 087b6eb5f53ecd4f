//! RNG module - piece sources
//!
//! The board only depends on [`PieceSource`]: one draw per spawned piece.
//! [`SimpleRng`] draws uniformly from the seven kinds; [`ScriptedPieces`]
//! replays a fixed sequence, which keeps tests and demos deterministic.

use std::fmt;

use crate::types::PieceKind;

/// Supplier of piece kinds for newly spawned pieces.
pub trait PieceSource: fmt::Debug {
    /// Draw the next kind. Implementations should be uniform over all seven.
    fn draw_piece_kind(&mut self) -> PieceKind;
}

impl<T: PieceSource + ?Sized> PieceSource for Box<T> {
    fn draw_piece_kind(&mut self) -> PieceKind {
        (**self).draw_piece_kind()
    }
}

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
        Self { seed, state }
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits, which have a much longer period than the low bits of an LCG.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }
}

impl PieceSource for SimpleRng {
    fn draw_piece_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.next_range(PieceKind::ALL.len() as u32) as usize]
    }
}

/// Cycles through a fixed, non-empty sequence of kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedPieces {
    sequence: Vec<PieceKind>,
    pos: usize,
}

impl ScriptedPieces {
    /// Returns `None` for an empty sequence.
    pub fn new(sequence: Vec<PieceKind>) -> Option<Self> {
        if sequence.is_empty() {
            return None;
        }
        Some(Self { sequence, pos: 0 })
    }

    /// Parse a string of piece letters such as `"IOTTZ"` (case-insensitive).
    ///
    /// ```
    /// use jatc_core::rng::{PieceSource, ScriptedPieces};
    /// use jatc_core::types::PieceKind;
    ///
    /// let mut pieces = ScriptedPieces::parse("oi").unwrap();
    /// assert_eq!(pieces.draw_piece_kind(), PieceKind::O);
    /// assert_eq!(pieces.draw_piece_kind(), PieceKind::I);
    /// assert_eq!(pieces.draw_piece_kind(), PieceKind::O);
    /// assert!(ScriptedPieces::parse("ox").is_none());
    /// ```
    pub fn parse(letters: &str) -> Option<Self> {
        let sequence = letters
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| PieceKind::from_str(c.encode_utf8(&mut [0u8; 4])))
            .collect::<Option<Vec<_>>>()?;
        Self::new(sequence)
    }

    /// A source that always yields `kind`.
    pub fn repeat(kind: PieceKind) -> Self {
        Self {
            sequence: vec![kind],
            pos: 0,
        }
    }
}

impl PieceSource for ScriptedPieces {
    fn draw_piece_kind(&mut self) -> PieceKind {
        let kind = self.sequence[self.pos];
        self.pos = (self.pos + 1) % self.sequence.len();
        kind
    }
}
