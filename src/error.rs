use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unknown provider key: {0}")]
    UnknownProvider(String),
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),
}

#[cfg(feature = "gateway-http")]
impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        PaymentError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;
