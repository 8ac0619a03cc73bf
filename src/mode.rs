use serde::{Deserialize, Serialize};
use std::fmt;

/// Executor-side dataflow selector. CPU comes last in this numbering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TiledMatmulType {
    OutputStationary = 0,
    WeightStationary = 1,
    Cpu = 2,
}

/// Number of modes, local compute included.
pub const MODE_COUNT: i32 = 3;

// Indexed by internal slot.
const INTERNAL_ORDER: [TiledMatmulType; MODE_COUNT as usize] = [
    TiledMatmulType::OutputStationary,
    TiledMatmulType::WeightStationary,
    TiledMatmulType::Cpu,
];

impl TiledMatmulType {
    pub fn index(self) -> usize { self as usize }

    pub fn from_index(idx: usize) -> Option<Self> { INTERNAL_ORDER.get(idx).copied() }
}

impl fmt::Display for TiledMatmulType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TiledMatmulType::OutputStationary => "os",
            TiledMatmulType::WeightStationary => "ws",
            TiledMatmulType::Cpu => "cpu",
        };
        f.write_str(s)
    }
}

/// Mathematical modulo; never negative for `n > 0`.
#[inline]
pub fn positive_mod(i: i64, n: i64) -> i64 { i.rem_euclid(n) }

/// Map a caller-facing mode (0 = CPU, 1.. = accelerator dataflows) to the executor's numbering.
///
/// Total over `i32`: out-of-range values wrap cyclically.
pub fn accelerator_mode(mode: i32) -> TiledMatmulType {
    let slot = positive_mod(mode as i64 - 1, MODE_COUNT as i64);
    INTERNAL_ORDER[slot as usize]
}

/// Inverse of [`accelerator_mode`] on `0..MODE_COUNT`.
pub fn external_mode(mode: TiledMatmulType) -> i32 {
    positive_mod(mode.index() as i64 + 1, MODE_COUNT as i64) as i32
}
