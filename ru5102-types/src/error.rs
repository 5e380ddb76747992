//! Errors raised when converting raw values into typed ones

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller-supplied value outside its domain
    #[error("Validation error: {0}")]
    Validation(String),
    
    /// Reader-supplied value outside its domain
    #[error("Parse error: {0}")]
    Parse(String),
}
