/// Physical constants and the crate-wide SI unit convention.
pub mod physical_constants;

/// Console logger initialization for examples.
pub mod logger;
