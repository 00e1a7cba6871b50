use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AnalysisError {
    /// True when the failure came from the upstream data provider rather than the request.
    pub fn is_upstream(&self) -> bool {
        matches!(self, AnalysisError::ApiError(_) | AnalysisError::InvalidData(_))
    }
}
