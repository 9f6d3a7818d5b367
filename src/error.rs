use std::io;

/// Errors surfaced by host queries.
///
/// Every failure is returned to the immediate caller; there are no retries
/// and no recovery attempts. Partial topology data is not an error — it
/// degrades the result instead (see [`crate::cpu_info`]).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller-supplied buffer was empty or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The running executable image could not be located.
    #[error("application image not found")]
    NotFound,

    /// The OS reported an error; the original code is preserved inside.
    #[error("system error: {0}")]
    System(#[from] io::Error),

    /// Reserving the descriptor array failed.
    #[error("out of memory")]
    OutOfMemory,
}

pub type Result<T> = std::result::Result<T, Error>;
