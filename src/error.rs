use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("TerminalError: {0}")]
    Terminal(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Failures of the lookup collaborator.
///
/// `Network`, `Http` and `Timeout` are transport failures; `Decode` means the
/// server answered 2xx with a body that is not a candidate list.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error calling {endpoint}: {message}")]
    Network { endpoint: String, message: String },
    #[error("HTTP error: {status} {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("Malformed response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl ApiError {
    pub fn is_decode(&self) -> bool {
        matches!(self, ApiError::Decode { .. })
    }

    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Network { endpoint, .. }
            | ApiError::Http { endpoint, .. }
            | ApiError::Timeout { endpoint, .. }
            | ApiError::Decode { endpoint, .. } => endpoint,
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Stored value under '{key}' is corrupt: {message}")]
    Corruption { key: String, message: String },
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to serialize value for '{key}'")]
    Serialize { key: String },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "critical",
            ErrorSeverity::High => "error",
            ErrorSeverity::Medium => "warning",
            ErrorSeverity::Low => "info",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Api(api_error) => match api_error {
                ApiError::Timeout { .. } => ErrorSeverity::Medium,
                ApiError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                ApiError::Network { .. } => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(StorageError::Corruption { .. }) => ErrorSeverity::Low,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Terminal(_) => ErrorSeverity::Critical,
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Api(ApiError::Network { .. } | ApiError::Timeout { .. }) => Some(
                "Check that the lookup server is running, or pass --server-url".to_string(),
            ),
            AppError::Api(ApiError::Decode { .. }) => {
                Some("The server must return a JSON array of {sickCd, sickNm}".to_string())
            }
            AppError::Storage(StorageError::ConfigParseError { .. }) => {
                Some("Fix or remove the config file, then try again".to_string())
            }
            AppError::Config(ConfigError::InvalidValue { field, .. }) => {
                Some(format!("Set a valid value for '{}' in config.toml", field))
            }
            _ => None,
        }
    }
}
