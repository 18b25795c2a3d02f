use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tonic::Status;

/// Errors of the data access port
#[derive(Debug, Error)]
pub enum DataError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// Unique or foreign-key constraint violated
    #[error("Constraint violation: {0}")]
    Conflict(String),

    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Internal(String),
}

pub type DataResult<T> = Result<T, DataError>;

impl From<DbErr> for DataError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(details))
        | Some(SqlErr::ForeignKeyConstraintViolation(details)) = err.sql_err()
        {
            return DataError::Conflict(details);
        }

        match err {
            DbErr::RecordNotFound(what) => DataError::NotFound(what),
            DbErr::Conn(e) => DataError::Unavailable(e.to_string()),
            DbErr::ConnectionAcquire(e) => DataError::Unavailable(e.to_string()),
            other => DataError::Internal(other.to_string()),
        }
    }
}

impl From<DataError> for Status {
    fn from(err: DataError) -> Self {
        let message = err.to_string();
        match err {
            DataError::NotFound(_) => Status::not_found(message),
            DataError::Validation(_) => Status::invalid_argument(message),
            DataError::Conflict(_) => Status::already_exists(message),
            DataError::Unavailable(_) => Status::unavailable(message),
            DataError::Internal(_) => Status::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DataError::NotFound("customer 1".into()), Code::NotFound),
            (DataError::Validation("name".into()), Code::InvalidArgument),
            (DataError::Conflict("customer_pkey".into()), Code::AlreadyExists),
            (DataError::Unavailable("pool timed out".into()), Code::Unavailable),
            (DataError::Internal("syntax".into()), Code::Internal),
        ];

        for (err, code) in cases {
            assert_eq!(Status::from(err).code(), code);
        }
    }

    #[test]
    fn test_db_errors() {
        let not_found: DataError = DbErr::RecordNotFound("customer".into()).into();
        assert!(matches!(not_found, DataError::NotFound(_)));

        let other: DataError = DbErr::Custom("boom".into()).into();
        assert!(matches!(other, DataError::Internal(_)));
    }
}
