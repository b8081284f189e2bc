use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

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

    #[error("Malformed manifest {path}: {reason}")]
    MalformedManifest { path: String, reason: String },

    /// beta 有的欄位在 test 找不到，視為前置條件錯誤而非差異
    #[error("Dataset '{dataset}': key '{path}' has no counterpart in test")]
    MissingCounterpartKey { dataset: String, path: String },

    #[error("Dataset '{name}' exists in beta but not in test")]
    MissingCounterpartDataset { name: String },

    #[error("Sub-dataset '{name}' declared by '{parent}' conflicts with an existing entry")]
    DuplicateSubDataset { name: String, parent: String },
}

impl ReconcileError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            ReconcileError::IoError(e) => format!("Could not read an input file: {}", e),
            ReconcileError::SerializationError(e) => format!("A manifest is not valid JSON: {}", e),
            ReconcileError::CsvError(e) => format!("Could not parse the delimited file: {}", e),
            ReconcileError::MissingCounterpartKey { dataset, path } => format!(
                "Dataset '{}' has field '{}' in beta that test does not have",
                dataset, path
            ),
            ReconcileError::MissingCounterpartDataset { name } => {
                format!("Dataset '{}' is missing from the test namespace", name)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ReconcileError::IoError(_) => "Check that the namespace roots point at the right directories",
            ReconcileError::SerializationError(_) | ReconcileError::MalformedManifest { .. } => {
                "Validate the manifest with a JSON linter and make sure its top level is an object"
            }
            ReconcileError::CsvError(_) => "Make sure every line uses the same delimiter as the file extension",
            ReconcileError::ConfigError { .. }
            | ReconcileError::ConfigValidationError { .. }
            | ReconcileError::InvalidConfigValueError { .. }
            | ReconcileError::MissingConfigError { .. } => "Fix the configuration file or command-line flags",
            ReconcileError::MissingCounterpartKey { .. } | ReconcileError::MissingCounterpartDataset { .. } => {
                "Push the dataset to test again so both namespaces share the same shape"
            }
            ReconcileError::DuplicateSubDataset { .. } => {
                "Rename one of the sub-datasets, or pass --allow-duplicates to keep the last one"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
