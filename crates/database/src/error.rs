use models::{approval::TransitionError, grade::ScoreError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a service operation, one variant per way a caller can be told
/// no. The HTTP layer maps each variant onto a status code.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(DbErr),

    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

/// Unique index name fragments, most specific first. Postgres reports the
/// index name (`uq_students_nim`), SQLite the columns (`students.nim`), and
/// both contain these fragments.
const CONFLICT_MESSAGES: [(&str, &str); 12] = [
    ("enrollments", "course is already in the KRS for this semester"),
    ("grades", "a grade already exists for this course and semester"),
    ("attendances", "attendance for this meeting is already recorded"),
    ("schedules", "a schedule already exists for this slot"),
    ("materials", "a material with this title already exists for this meeting"),
    ("courses", "course code already exists"),
    ("user_id", "account already has a profile"),
    ("phone", "phone number is already bound to another student"),
    ("username", "username already taken"),
    ("email", "email already registered"),
    ("nim", "NIM already registered"),
    ("nidn", "NIDN already registered"),
];

fn conflict_message(driver_message: &str) -> &'static str {
    let driver_message = driver_message.to_lowercase();
    CONFLICT_MESSAGES
        .iter()
        .find(|(fragment, _)| driver_message.contains(fragment))
        .map(|(_, message)| *message)
        .unwrap_or("record already exists")
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => {
                Self::Conflict(conflict_message(&message).to_string())
            }
            _ => Self::Database(err),
        }
    }
}

impl From<TransitionError> for ServiceError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::AlreadyDecided(_) => Self::Conflict(err.to_string()),
            TransitionError::UnknownAction(_) | TransitionError::MissingRejectionReason => {
                Self::InvalidArgument(err.to_string())
            }
        }
    }
}

impl From<ScoreError> for ServiceError {
    fn from(err: ScoreError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
