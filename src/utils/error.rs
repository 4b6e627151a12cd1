use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Warehouse request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Mock data file not found: {path}")]
    MockFileMissing { path: String },

    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Warehouse connection error: {message}")]
    ConnectivityError { message: String },

    #[error("Query failed with status {status}: {message}")]
    QueryError { status: u16, message: String },

    #[error("Data error in '{table}': {message}")]
    DataError { table: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Local setup: config file, mock data files, flags.
    Configuration,
    /// Remote warehouse: session, transport, query execution.
    Connectivity,
    /// Rows that do not fit the expected table shape.
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashboardError::ApiError(_)
            | DashboardError::ConnectivityError { .. }
            | DashboardError::QueryError { .. } => ErrorCategory::Connectivity,
            DashboardError::CsvError(_)
            | DashboardError::SerializationError(_)
            | DashboardError::DataError { .. } => ErrorCategory::Data,
            DashboardError::IoError(_)
            | DashboardError::ConfigError { .. }
            | DashboardError::ConfigValidationError { .. }
            | DashboardError::InvalidConfigValueError { .. }
            | DashboardError::MissingConfigError { .. }
            | DashboardError::MockFileMissing { .. }
            | DashboardError::MissingColumn { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Connectivity => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 1,
            ErrorCategory::Connectivity => 2,
            ErrorCategory::Data => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DashboardError::MockFileMissing { path } => {
                format!("Mock data file '{}' could not be found", path)
            }
            DashboardError::MissingColumn { table, column } => {
                format!("The {} data has no '{}' column", table, column)
            }
            DashboardError::ApiError(_) | DashboardError::ConnectivityError { .. } => {
                "Could not reach the data warehouse".to_string()
            }
            DashboardError::QueryError { status, .. } => {
                format!("The data warehouse rejected the query (HTTP {})", status)
            }
            DashboardError::CsvError(_) => "A mock data file is not valid CSV".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DashboardError::MockFileMissing { .. } | DashboardError::IoError(_) => {
                "Check that the mock_data directory exists in the working directory, or unset USE_MOCK_DATA"
            }
            DashboardError::MissingColumn { .. } | DashboardError::CsvError(_) => {
                "Make sure the CSV header row contains every required column"
            }
            DashboardError::ApiError(_) | DashboardError::ConnectivityError { .. } => {
                "Check the account URL and network access, or set USE_MOCK_DATA=true"
            }
            DashboardError::QueryError { .. } => {
                "Check the token, role and that the orders/customers tables exist"
            }
            DashboardError::SerializationError(_) | DashboardError::DataError { .. } => {
                "Inspect the source data for unexpected values"
            }
            DashboardError::ConfigError { .. }
            | DashboardError::ConfigValidationError { .. }
            | DashboardError::InvalidConfigValueError { .. }
            | DashboardError::MissingConfigError { .. } => {
                "Review the configuration file and environment variables"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let missing = DashboardError::MockFileMissing {
            path: "mock_data/customers.csv".to_string(),
        };
        assert_eq!(missing.category(), ErrorCategory::Configuration);
        assert_eq!(missing.exit_code(), 1);
        assert_eq!(missing.severity(), ErrorSeverity::High);

        let conn = DashboardError::ConnectivityError {
            message: "refused".to_string(),
        };
        assert_eq!(conn.category(), ErrorCategory::Connectivity);
        assert_eq!(conn.exit_code(), 2);
        assert_eq!(conn.severity(), ErrorSeverity::Critical);

        let data = DashboardError::DataError {
            table: "orders".to_string(),
            message: "short row".to_string(),
        };
        assert_eq!(data.exit_code(), 3);
    }

    #[test]
    fn test_user_friendly_message() {
        let err = DashboardError::MissingColumn {
            table: "orders".to_string(),
            column: "order_name".to_string(),
        };
        assert_eq!(
            err.user_friendly_message(),
            "The orders data has no 'order_name' column"
        );
    }
}
