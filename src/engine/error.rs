use thiserror::Error;

use crate::platform::PlatformError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Invalid duration '{0}'. Use <amount><unit> with unit day, hour or minute (e.g. 7day, 5hour, 30minute).")]
    InvalidDuration(String),
}
