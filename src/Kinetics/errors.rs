use thiserror::Error;

/// Errors of the kinetics core. All fitting errors are raised synchronously
/// at the point of the least-squares solve; file errors surface immediately,
/// no retries.
#[derive(Debug, Error)]
pub enum KineticsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Singular system: {0}")]
    SingularSystem(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
