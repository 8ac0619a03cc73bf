//! Entry points quantized operators call: validate the divisor, pick the
//! executor dataflow and hand the prepared request over.
use crate::error::{DispatchError, Result};
use crate::executor::{TiledExecutor, TiledMatmul};
use crate::matrix::{Dims, MatrixMut, MatrixRef};
use crate::mode::accelerator_mode;
use log::debug;

/// `log2(divisor)` for a positive power of two; anything else is rejected.
#[inline]
pub fn divisor_shift(divisor: i32) -> Result<u32> {
    let is_pow2 = divisor > 0 && divisor & (divisor - 1) == 0;
    if !is_pow2 {
        return Err(DispatchError::InvalidArgument { divisor });
    }
    Ok(i32::BITS - divisor.leading_zeros() - 1)
}

/// Multiply packed `lhs` (`i x k`) by packed `rhs` (`k x j`) into packed `out` (`i x j`).
///
/// `bias`, when present, holds one row of `j` values per output row.
#[allow(clippy::too_many_arguments)]
pub fn multiply<E: TiledExecutor + ?Sized>(
    executor: &mut E,
    mode: i32,
    relu: bool,
    dims: Dims,
    lhs: &[i8],
    rhs: &[i8],
    out: &mut [i8],
    divisor: i32,
    bias: Option<&[i32]>,
) -> Result<()> {
    multiply_strided(
        executor,
        mode,
        relu,
        dims,
        MatrixRef::packed(lhs, dims.k),
        MatrixRef::packed(rhs, dims.j),
        MatrixMut::packed(out, dims.j),
        divisor,
        bias.map(|d| MatrixRef::packed(d, dims.j)),
        false,
    )
}

/// Strided variant: each view carries its own row stride, and `repeating_bias`
/// broadcasts the first bias row to every output row.
#[allow(clippy::too_many_arguments)]
pub fn multiply_strided<E: TiledExecutor + ?Sized>(
    executor: &mut E,
    mode: i32,
    relu: bool,
    dims: Dims,
    lhs: MatrixRef<'_, i8>,
    rhs: MatrixRef<'_, i8>,
    out: MatrixMut<'_, i8>,
    divisor: i32,
    bias: Option<MatrixRef<'_, i32>>,
    repeating_bias: bool,
) -> Result<()> {
    debug!("Called into systolic matmul!");
    let shift = divisor_shift(divisor)?;
    let internal = accelerator_mode(mode);

    debug!("Using accelerated matmul with dimensions ({}, {}, {})", dims.i, dims.j, dims.k);

    executor.tiled_matmul(TiledMatmul {
        dims,
        a: lhs,
        b: rhs,
        d: bias,
        c: out,
        act: relu.into(),
        shift,
        relu6_shift: 0,
        repeating_bias,
        mode: internal,
    })?;
    Ok(())
}
