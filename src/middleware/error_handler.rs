use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, Error, HttpRequest,
};

use crate::core::AppError;

/// JSON body extractor config; malformed or unexpected fields become validation errors
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Query string extractor config
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

/// Path extractor config
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error_handler)
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Invalid request body: {}", e),
        other => format!("Invalid request body: {}", other),
    };
    log_rejection(req, &message);
    AppError::validation(message).into()
}

fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    let message = format!("Invalid query string: {}", err);
    log_rejection(req, &message);
    AppError::validation(message).into()
}

fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    let message = format!("Invalid path parameter: {}", err);
    log_rejection(req, &message);
    AppError::validation(message).into()
}

fn log_rejection(req: &HttpRequest, message: &str) {
    tracing::debug!(
        method = %req.method(),
        path = %req.path(),
        reason = %message,
        "Request rejected by extractor"
    );
}
