use thiserror::Error;

/// Failures of the record store. Aggregation never runs after one of these.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("survey store unavailable: {0}")]
    StoreUnavailable(#[source] sqlx::Error),

    #[error("schema migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::StoreUnavailable(err)
    }
}

/// Rejections raised while validating a new submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("missing required answer: {0}")]
    Missing(&'static str),

    #[error("unrecognised value {value:?} for {field}")]
    Unrecognised { field: &'static str, value: String },

    #[error("email address is not valid: {0}")]
    InvalidEmail(String),

    #[error("certification importance must be between 1 and 5, got {0}")]
    RatingOutOfRange(i32),

    #[error("certificate value is only asked when platforms were used before")]
    UnexpectedCertificateValue,
}
