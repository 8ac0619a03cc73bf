use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("divisor passed to systolic matmul must be a positive power of 2, got {divisor}")]
    InvalidArgument { divisor: i32 },
    /// Whatever the executor reported, untouched.
    #[error(transparent)]
    Executor(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
