use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::utils::errors::{ApiError, FieldError};

/// Converts a Rust field name to the camelCase name used on the wire.
fn wire_field_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut collected: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            let field = wire_field_name(field);
            errors.iter().map(move |error| FieldError {
                field: field.clone(),
                message: error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid.", field)),
            })
        })
        .collect();

    collected.sort_by(|a, b| a.field.cmp(&b.field));
    collected
}

/// JSON extractor that runs the synchronous field-validation pass before the
/// handler sees the payload.
///
/// Shape failures (malformed JSON, missing or mistyped fields) and rule
/// failures both come back as a 400 envelope with `errors: [{field, message}]`
/// so no service code runs on bad input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if error_msg.contains("missing field") {
                    let field = error_msg
                        .split("missing field `")
                        .nth(1)
                        .and_then(|s| s.split('`').next())
                        .unwrap_or("unknown");
                    return ApiError::validation(vec![FieldError {
                        field: field.to_string(),
                        message: format!("{} is required.", field),
                    }]);
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return ApiError::bad_request(
                        "Missing 'Content-Type: application/json' header.",
                    );
                }

                ApiError::bad_request("Invalid request body.")
            })?;

        value
            .validate()
            .map_err(|errors| ApiError::validation(collect_field_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}
