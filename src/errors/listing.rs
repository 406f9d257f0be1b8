use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType};

use crate::encoded_id::TokenError;

#[derive(thiserror::Error, Debug)]
pub enum ListError {
    #[error("This endpoint only answers XMLHttpRequest calls")]
    AjaxOnly,
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),
    #[error("Malformed trick identifier")]
    InvalidToken(#[source] TokenError),
    #[error("Trick not found")]
    TrickNotFound,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl ResponseError for ListError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AjaxOnly => StatusCode::FORBIDDEN,
            Self::UnknownLocale(_) | Self::InvalidToken(_) | Self::TrickNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // internals stay in the logs
    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::UnexpectedError(_) => "Something went wrong".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(message)
    }
}
