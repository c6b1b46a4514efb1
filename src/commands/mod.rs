/// Command implementations and the errors they surface to `main`.
pub mod events;

use thiserror::Error;

use crate::ra::RaError;

/// Why a run ended without output.
#[derive(Debug, Error)]
pub enum RunError {
    /// The command line was valid for clap but not usable.
    #[error("{0}")]
    Usage(&'static str),

    /// The upstream API failed.
    #[error(transparent)]
    Ra(#[from] RaError),

    /// Writing the results failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl RunError {
    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) | Self::Output(_) => 1,
            Self::Ra(err) => err.exit_code(),
        }
    }
}
