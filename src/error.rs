use thiserror::Error;

pub type Result<T> = std::result::Result<T, SaihError>;

#[derive(Error, Debug)]
pub enum SaihError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date '{value}' does not match format '{format}': {source}")]
    DateParse {
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid sensor type: '{0}' (expected rain, flow, reservoir, temperature or all)")]
    InvalidSensorType(String),

    #[error("Invalid risk level: {0} (expected an integer between 0 and 3)")]
    InvalidRiskLevel(i64),

    #[error("Invalid comparison: '{0}' (expected equal or greater_equal)")]
    InvalidComparison(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl From<config::ConfigError> for SaihError {
    fn from(err: config::ConfigError) -> Self {
        SaihError::Config(err.to_string())
    }
}
