use axum::http::StatusCode;
use thiserror::Error;

/// Failure of a single backend call. Both variants reach the user as the same
/// generic notice; neither is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable response: connection failure, timeout, or an undecodable body.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected request ({status}): {message}")]
    Server { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("offer count '{0}' is not a whole number")]
    InvalidOfferCount(String),
    #[error("offer count must not be negative")]
    NegativeOfferCount,
    #[error("offer count is too large")]
    OfferCountOutOfRange,
    #[error("salary range is required")]
    MissingSalaryRange,
    #[error("unknown salary range '{0}'")]
    UnknownSalaryRange(String),
    #[error("industry is required")]
    MissingIndustry,
    #[error("unknown industry '{0}'")]
    UnknownIndustry(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn bad_gateway(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: err.to_string(),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        Self::bad_gateway(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SubmissionInFlight => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            StoreError::Api(err) => err.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
