use super::{Activation, TiledExecutor, TiledMatmul};
use crate::matrix::{Dims, MatrixRef};
use crate::quant::{rounding_right_shift, saturate_i8};
use anyhow::{bail, Context, Result};
use log::debug;
use rayon::prelude::*;

/// Software executor reproducing the accelerator's numerics for every dataflow.
///
/// Rows are independent, so output is identical for any thread count.
#[derive(Debug, Default)]
pub struct ReferenceExecutor {
    pool: Option<rayon::ThreadPool>,
    calls: u64,
}

impl ReferenceExecutor {
    pub fn new() -> Self { Self::default() }

    /// `threads <= 1` computes on the calling thread.
    pub fn with_threads(threads: usize) -> Result<Self> {
        if threads <= 1 {
            return Ok(Self::new());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("build reference executor thread pool")?;
        debug!("reference executor using {} threads", threads);
        Ok(Self { pool: Some(pool), calls: 0 })
    }

    pub fn threads(&self) -> usize { self.pool.as_ref().map_or(1, |p| p.current_num_threads()) }

    pub fn calls(&self) -> u64 { self.calls }
}

struct Inputs<'a> {
    dims: Dims,
    a: MatrixRef<'a, i8>,
    b: MatrixRef<'a, i8>,
    d: Option<MatrixRef<'a, i32>>,
    act: Activation,
    shift: i32,
    relu6_shift: u32,
    repeating_bias: bool,
}

impl Inputs<'_> {
    fn row(&self, i: usize, out: &mut [i8]) {
        let Dims { j: cols, k: depth, .. } = self.dims;
        let a_row: &[i8] = if depth == 0 { &[] } else { &self.a.data[i * self.a.stride..i * self.a.stride + depth] };
        let bias_row = if self.repeating_bias { 0 } else { i };
        for (j, c) in out[..cols].iter_mut().enumerate() {
            let mut acc: i32 = match &self.d {
                Some(d) => d.data[bias_row * d.stride + j],
                None => 0,
            };
            for (kk, &x) in a_row.iter().enumerate() {
                acc = acc.wrapping_add(x as i32 * self.b.data[kk * self.b.stride + j] as i32);
            }
            *c = self.scale_and_sat(acc);
        }
    }

    fn scale_and_sat(&self, acc: i32) -> i8 {
        let shifted = rounding_right_shift(acc, self.shift);
        let activated = match self.act {
            Activation::None => shifted,
            Activation::Relu => shifted.max(0),
            Activation::Relu6 => shifted.clamp(0, 6i32.wrapping_shl(self.relu6_shift)),
        };
        saturate_i8(activated)
    }
}

fn validate(call: &TiledMatmul<'_>) -> Result<()> {
    let Dims { i, j, k } = call.dims;
    if !call.a.covers(i, k) {
        bail!("lhs buffer of {} elements (stride {}) too small for {}x{}", call.a.data.len(), call.a.stride, i, k);
    }
    if !call.b.covers(k, j) {
        bail!("rhs buffer of {} elements (stride {}) too small for {}x{}", call.b.data.len(), call.b.stride, k, j);
    }
    if let Some(d) = &call.d {
        let rows = if call.repeating_bias { 1 } else { i };
        if !d.covers(rows, j) {
            bail!("bias buffer of {} elements (stride {}) too small for {}x{}", d.data.len(), d.stride, rows, j);
        }
    }
    if !call.c.covers(i, j) {
        bail!("out buffer of {} elements (stride {}) too small for {}x{}", call.c.data.len(), call.c.stride, i, j);
    }
    if call.shift > 31 {
        bail!("shift {} exceeds accumulator width", call.shift);
    }
    Ok(())
}

impl TiledExecutor for ReferenceExecutor {
    fn tiled_matmul(&mut self, call: TiledMatmul<'_>) -> Result<()> {
        validate(&call).with_context(|| format!("tiled matmul ({} dataflow)", call.mode))?;
        self.calls += 1;
        let TiledMatmul { dims, a, b, d, mut c, act, shift, relu6_shift, repeating_bias, .. } = call;
        if dims.i == 0 || dims.j == 0 {
            return Ok(());
        }
        let inputs = Inputs { dims, a, b, d, act, shift: shift as i32, relu6_shift, repeating_bias };
        let stride = c.stride;
        match &self.pool {
            Some(pool) => pool.install(|| {
                c.data.par_chunks_mut(stride).take(dims.i).enumerate().for_each(|(i, row)| inputs.row(i, row));
            }),
            None => {
                for (i, row) in c.data.chunks_mut(stride).take(dims.i).enumerate() {
                    inputs.row(i, row);
                }
            }
        }
        Ok(())
    }
}
