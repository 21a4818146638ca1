use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

use crate::db::StoreError;

const DEFAULT_STORE_HINT: &str = "Check database connection and tables";

#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorDetails {
    pub code: String,
    pub hint: String,
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound {
        error: String,
        solution: Option<String>,
    },
    Store {
        error: String,
        details: Option<ErrorDetails>,
    },
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a ErrorDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<&'a str>,
}

impl AppError {
    pub fn not_found(error: impl Into<String>) -> Self {
        AppError::NotFound {
            error: error.into(),
            solution: None,
        }
    }

    /// Wraps a store failure, keeping its SQLSTATE and hint for the client.
    pub fn store(error: impl Into<String>, err: &StoreError) -> Self {
        let error = error.into();
        log::error!("{}: {}", error, err);
        let details = err.code.as_ref().map(|code| ErrorDetails {
            code: code.clone(),
            hint: err
                .hint
                .clone()
                .unwrap_or_else(|| DEFAULT_STORE_HINT.to_string()),
        });
        AppError::Store { error, details }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest(msg) => msg,
            AppError::NotFound { error, .. } => error,
            AppError::Store { error, .. } => error,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound { error, .. } => write!(f, "Not Found: {}", error),
            AppError::Store { error, .. } => write!(f, "Database Error: {}", error),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (details, solution) = match self {
            AppError::BadRequest(_) => (None, None),
            AppError::NotFound { solution, .. } => (None, solution.as_deref()),
            AppError::Store { details, .. } => (details.as_ref(), None),
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.message(),
            details,
            solution,
        })
    }
}
