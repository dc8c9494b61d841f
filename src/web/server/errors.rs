use actix_web::{body::BoxBody, http::StatusCode, HttpResponse, ResponseError};

use crate::bot::{BotError, InternalError};

impl ResponseError for BotError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UserError(_) => StatusCode::BAD_REQUEST,
            Self::InternalError(error) => error.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::UserError(error) => HttpResponse::build(self.status_code())
                .content_type("text/plain; charset=utf-8")
                .body(error.end_user_error()),
            Self::InternalError(error) => error.error_response(),
        }
    }
}

impl ResponseError for InternalError {
    fn status_code(&self) -> StatusCode {
        if self.is_upstream_error() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// no body, upstream details stay in the logs
    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code()).finish()
    }
}
