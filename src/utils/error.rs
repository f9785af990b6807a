use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Verification failed for {url}: {message}")]
    VerificationError { url: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 根據嚴重程度決定行程結束碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl DeployError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeployError::MissingConfigError { .. }
            | DeployError::InvalidConfigValueError { .. }
            | DeployError::ConfigValidationError { .. }
            | DeployError::TomlParseError(_) => ErrorCategory::Configuration,
            DeployError::HttpError(_) | DeployError::VerificationError { .. } => {
                ErrorCategory::Network
            }
            DeployError::SerializationError(_) => ErrorCategory::Data,
            DeployError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DeployError::MissingConfigError { field } => {
                format!("Add `{}` to deploy.toml or pass it on the command line", field)
            }
            DeployError::InvalidConfigValueError { field, .. }
            | DeployError::ConfigValidationError { field, .. } => {
                format!("Check the `{}` entry in deploy.toml", field)
            }
            DeployError::TomlParseError(_) => {
                "Make sure the config file exists and is valid TOML".to_string()
            }
            DeployError::HttpError(_) | DeployError::VerificationError { .. } => {
                "Check the deployment URL and retry once the deployment is live".to_string()
            }
            DeployError::SerializationError(_) => {
                "The service returned an unexpected payload; check that the URL points at the API"
                    .to_string()
            }
            DeployError::IoError(_) => "Check file permissions and available disk space".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Data => format!("Unexpected data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_high_severity() {
        let err = DeployError::MissingConfigError {
            field: "tool.program".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.severity().exit_code(), 1);
        assert!(err.recovery_suggestion().contains("tool.program"));
    }

    #[test]
    fn io_errors_are_critical() {
        let err = DeployError::from(std::io::Error::other("disk gone"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().exit_code(), 3);
        assert!(err.user_friendly_message().starts_with("System error"));
    }

    #[test]
    fn verification_errors_are_retryable() {
        let err = DeployError::VerificationError {
            url: "https://api.example.com/health".to_string(),
            message: "status 503".to_string(),
        };
        assert_eq!(err.severity().exit_code(), 2);
    }
}
