// Fixed-point quantization and int8 matmul dispatch for systolic accelerators
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod matrix;
pub mod mode;
pub mod quant;

pub use dispatch::{divisor_shift, multiply, multiply_strided};
pub use error::{DispatchError, Result};
pub use executor::cpu::ReferenceExecutor;
pub use executor::{Activation, TiledExecutor, TiledMatmul};
pub use matrix::{Dims, MatrixMut, MatrixRef};
pub use mode::{accelerator_mode, external_mode, positive_mod, TiledMatmulType, MODE_COUNT};
pub use quant::{bits_of, from_bits, quantize_multiplier, FixedPointMultiplier};
