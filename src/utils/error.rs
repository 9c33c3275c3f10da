use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON decoding error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML decoding error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Snapshot integrity error: {message}")]
    SnapshotError { message: String },

    #[error("{entity} with ID {id} not found")]
    MissingReference { entity: &'static str, id: u32 },

    #[error("Quote #{quote_id} has no usable cost: {reason}")]
    DegenerateCost { quote_id: u32, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Decoding,
    Configuration,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RankerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RankerError::IoError(_) => ErrorCategory::Io,
            RankerError::JsonError(_) | RankerError::TomlError(_) | RankerError::CsvError(_) => {
                ErrorCategory::Decoding
            }
            RankerError::ConfigValidationError { .. }
            | RankerError::InvalidConfigValueError { .. }
            | RankerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RankerError::SnapshotError { .. }
            | RankerError::MissingReference { .. }
            | RankerError::DegenerateCost { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RankerError::DegenerateCost { .. } => ErrorSeverity::Low,
            RankerError::MissingReference { .. } => ErrorSeverity::Medium,
            RankerError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the snapshot and output paths exist and are accessible",
            ErrorCategory::Decoding => {
                "Check the snapshot file format (json, toml or a directory of csv tables)"
            }
            ErrorCategory::Configuration => {
                "Review the command-line arguments or configuration file; dates use YYYY-MM-DD"
            }
            ErrorCategory::Data => {
                "Fix the referenced records in the snapshot (ids, units, package sizes)"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RankerError::IoError(e) => format!("Could not read or write a file: {}", e),
            RankerError::JsonError(_) | RankerError::TomlError(_) | RankerError::CsvError(_) => {
                format!("The snapshot could not be decoded. {}", self)
            }
            RankerError::MissingConfigError { field } => {
                format!("Please provide a value for '{}'", field)
            }
            other => other.to_string(),
        }
    }

    /// Process exit status for a failed run. Low-severity failures exit 0.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

/// Logs a failed report run, prints the user-facing message and suggestion to
/// stderr, and returns the exit code to use.
pub fn report_failure(err: &RankerError) -> i32 {
    tracing::error!(
        "❌ Report generation failed: {} (Category: {:?}, Severity: {:?})",
        err,
        err.category(),
        err.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", err.recovery_suggestion());

    eprintln!("❌ {}", err.user_friendly_message());
    eprintln!("💡 Suggestion: {}", err.recovery_suggestion());

    err.exit_code()
}

pub type Result<T> = std::result::Result<T, RankerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_cost_is_low_severity_data_error() {
        let err = RankerError::DegenerateCost {
            quote_id: 7,
            reason: "packaging size is zero".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(
            err.to_string(),
            "Quote #7 has no usable cost: packaging size is zero"
        );
    }

    #[test]
    fn test_io_error_is_critical() {
        let err = RankerError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "snapshot.json",
        ));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("snapshot.json"));
    }

    #[test]
    fn test_exit_codes_follow_severity() {
        let low = RankerError::DegenerateCost {
            quote_id: 1,
            reason: "packaging size is zero".to_string(),
        };
        let medium = RankerError::MissingReference {
            entity: "Store",
            id: 9,
        };
        let high = RankerError::MissingConfigError {
            field: "date".to_string(),
        };
        let critical = RankerError::from(std::io::Error::other("disk"));

        assert_eq!(low.exit_code(), 0);
        assert_eq!(medium.exit_code(), 2);
        assert_eq!(high.exit_code(), 1);
        assert_eq!(critical.exit_code(), 3);
        assert_eq!(report_failure(&medium), 2);
    }
}
