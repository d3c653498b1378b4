use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration value `{field}` must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("configuration value `{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("configuration value `{field}` must not exceed {max}, got {value}")]
    AboveMaximum { field: &'static str, value: f64, max: f64 },
}
