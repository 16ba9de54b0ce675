use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Converts Diesel errors into structured `AppError` variants.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error, tagging unexpected failures with `operation`.
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, &*info, operation)
            }
            DieselError::NotFound => AppError::not_found("resource", "id", "unknown"),
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let text = match info.details() {
            Some(details) => format!("{}\n{}", info.message(), details),
            None => info.message().to_string(),
        };
        let constraint_name = info.constraint_name();

        let fallback = |label: &str| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::anyhow!("{label}: {}", info.message()),
        };

        match kind {
            DatabaseErrorKind::UniqueViolation => {
                match ConstraintParser::parse_unique_violation(&text, constraint_name) {
                    Some((entity, field, value)) => AppError::Duplicate {
                        entity,
                        field,
                        value,
                    },
                    None => fallback("Unique constraint violation"),
                }
            }
            DatabaseErrorKind::NotNullViolation => {
                match ConstraintParser::parse_not_null_violation(&text) {
                    Some((entity, field)) => AppError::Validation {
                        field,
                        reason: format!("Field is required for {}", entity),
                    },
                    None => fallback("Not null constraint violation"),
                }
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                match ConstraintParser::parse_foreign_key_violation(&text, constraint_name) {
                    Some((entity, field, value)) => AppError::Validation {
                        field,
                        reason: format!(
                            "Invalid reference from {} with value '{}'",
                            entity, value
                        ),
                    },
                    None => fallback("Foreign key constraint violation"),
                }
            }
            DatabaseErrorKind::CheckViolation => {
                match ConstraintParser::parse_check_violation(&text, constraint_name) {
                    Some((entity, field)) => AppError::Validation {
                        field,
                        reason: format!("Check constraint failed for {} field", entity),
                    },
                    None => fallback("Check constraint violation"),
                }
            }
            _ => fallback("Database error"),
        }
    }
}
