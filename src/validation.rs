use rocket::serde::json::{self, Json};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Turns a raw JSON data guard result into a request body that has passed
/// both deserialization and its `validator` rules.
pub trait JsonValidateExt<T> {
    fn validated(self) -> Result<T, AppError>;
}

impl<'r, T> JsonValidateExt<T> for Result<Json<T>, json::Error<'r>>
where
    T: Validate,
{
    fn validated(self) -> Result<T, AppError> {
        let body = self.parsed()?;
        body.validate().map_err(missing_fields_error)?;
        Ok(body)
    }
}

/// Deserialization only, for bodies whose field checks belong to the handler.
pub trait JsonParseExt<T> {
    fn parsed(self) -> Result<T, AppError>;
}

impl<'r, T> JsonParseExt<T> for Result<Json<T>, json::Error<'r>> {
    fn parsed(self) -> Result<T, AppError> {
        match self {
            Ok(body) => Ok(body.into_inner()),
            Err(json::Error::Io(err)) => Err(AppError::Validation(format!(
                "Could not read request body: {}",
                err
            ))),
            Err(json::Error::Parse(_, err)) => Err(AppError::Validation(format!(
                "Invalid request body: {}",
                err
            ))),
        }
    }
}

fn missing_fields_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    fields.sort();

    AppError::Validation(format!("Missing required fields: {}", fields.join(", ")))
}
