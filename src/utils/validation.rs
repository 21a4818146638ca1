use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest};
use validator::{Validate, ValidationErrors};

use crate::errors::AppError;

/// Runs the derived validators and reports any failure as a 400 with `message`.
pub fn validate_payload<T: Validate>(payload: &T, message: &str) -> Result<(), AppError> {
    payload.validate().map_err(|err| {
        log::debug!("Rejected payload: {}", describe(&err));
        AppError::BadRequest(message.to_string())
    })
}

fn describe(err: &ValidationErrors) -> String {
    err.field_errors()
        .iter()
        .map(|(field, errs)| {
            let codes = errs
                .iter()
                .map(|e| e.code.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}: [{}]", field, codes)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    })
}
