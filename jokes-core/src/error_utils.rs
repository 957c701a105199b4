use crate::error::*;
use tracing::error;

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!(code = %self.error_code(), "CoreError: {}", self);
        match self {
            CoreError::Database(e) => {
                e.log_error();
            }
            CoreError::Config(e) => {
                e.log_error();
            }
            CoreError::Io(e) => {
                error!("IO error kind: {:?}", e.kind());
            }
        }
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Database(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Io(_) => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Database(_) => "DATABASE".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
        }
    }
}

impl ErrorExt for DatabaseError {
    fn log_error(&self) -> &Self {
        match self {
            DatabaseError::Sql(e) => error!(code = %self.error_code(), "Driver error: {:?}", e),
            other => error!(code = %self.error_code(), "Counter store error: {}", other),
        }
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            DatabaseError::ConnectionFailed { .. } | DatabaseError::DatabaseLocked => {
                "Like counters are temporarily unavailable. Please try again.".to_string()
            }
            DatabaseError::MigrationFailed { .. } => {
                "Like counter storage could not be prepared.".to_string()
            }
            DatabaseError::TransactionFailed { .. } => "Your like was not saved.".to_string(),
            DatabaseError::Sql(_) => "Like counters could not be read or updated.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            DatabaseError::ConnectionFailed { .. } => "DB_CONNECTION_FAILED".to_string(),
            DatabaseError::MigrationFailed { .. } => "DB_MIGRATION_FAILED".to_string(),
            DatabaseError::TransactionFailed { .. } => "DB_TRANSACTION_FAILED".to_string(),
            DatabaseError::DatabaseLocked => "DB_LOCKED".to_string(),
            DatabaseError::Sql(_) => "DB_SQL_ERROR".to_string(),
        }
    }
}

impl ErrorExt for DatasetError {
    fn log_error(&self) -> &Self {
        error!(code = %self.error_code(), "DatasetError: {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            DatasetError::NotFound { path } => format!("Joke dataset '{}' is missing.", path),
            DatasetError::Unreadable { path, .. } => {
                format!("Joke dataset '{}' could not be read.", path)
            }
            DatasetError::Malformed { path, .. } => {
                format!("Joke dataset '{}' is not a valid list of jokes.", path)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            DatasetError::NotFound { .. } => "DATASET_NOT_FOUND".to_string(),
            DatasetError::Unreadable { .. } => "DATASET_UNREADABLE".to_string(),
            DatasetError::Malformed { .. } => "DATASET_MALFORMED".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!(code = %self.error_code(), "ConfigError: {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::ValidationFailed { reason } => {
                format!("Configuration is invalid: {}", reason)
            }
            ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}
