use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("radar chart needs at least 3 categories, got {categories}")]
    DegenerateChart { categories: usize },
    #[error("invalid input: {0}")]
    Input(String),
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
