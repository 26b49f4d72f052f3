use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid log level `{level}`: {reason}")]
    InvalidLogLevel { level: String, reason: String },

    #[error(
        "No polarization pair available for an RGB composite: product carries {available}"
    )]
    IncompletePolarizationPair { available: String },

    #[error("Batch finished with {errors} failed product(s)")]
    BatchFailures { errors: usize },

    #[error(transparent)]
    Library(#[from] s1feat::Error),
}
