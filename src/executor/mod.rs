//! The tiled-matmul executor capability the dispatcher forwards to.
pub mod cpu;

use crate::matrix::{Dims, MatrixMut, MatrixRef};
use crate::mode::TiledMatmulType;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activation {
    None,
    Relu,
    Relu6,
}

impl From<bool> for Activation {
    fn from(relu: bool) -> Self { if relu { Activation::Relu } else { Activation::None } }
}

/// One fully-prepared `C = act(round_shift(A * B + D))` request.
///
/// `a` is `i x k`, `b` is `k x j`, `c` is `i x j`. `d` holds one bias row per
/// output row, or a single row broadcast to all rows when `repeating_bias` is set.
#[derive(Debug)]
pub struct TiledMatmul<'a> {
    pub dims: Dims,
    pub a: MatrixRef<'a, i8>,
    pub b: MatrixRef<'a, i8>,
    pub d: Option<MatrixRef<'a, i32>>,
    pub c: MatrixMut<'a, i8>,
    pub act: Activation,
    pub shift: u32,
    pub relu6_shift: u32,
    pub repeating_bias: bool,
    pub mode: TiledMatmulType,
}

/// Performs the quantized matmul. How (tiling, offload, threading) is up to the implementor.
pub trait TiledExecutor {
    fn tiled_matmul(&mut self, call: TiledMatmul<'_>) -> anyhow::Result<()>;
}

impl<E: TiledExecutor + ?Sized> TiledExecutor for &mut E {
    fn tiled_matmul(&mut self, call: TiledMatmul<'_>) -> anyhow::Result<()> { (**self).tiled_matmul(call) }
}

impl<E: TiledExecutor + ?Sized> TiledExecutor for Box<E> {
    fn tiled_matmul(&mut self, call: TiledMatmul<'_>) -> anyhow::Result<()> { (**self).tiled_matmul(call) }
}
