use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query},
    http::{request::Parts, Request},
    Json, RequestExt,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use super::AppError;

/// Custom validator for the kind of entity a review is attached to.
/// Lowercase ascii words such as `property` or `agent`.
pub fn validate_target_type(target_type: &str) -> Result<(), ValidationError> {
    let valid = !target_type.is_empty()
        && target_type.len() <= 32
        && target_type
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-');
    if !valid {
        let mut err = ValidationError::new("targetType");
        err.message = Some(format!("Invalid targetType received: {target_type}").into());
        return Err(err);
    }
    Ok(())
}

/// Pick one human readable message out of a validation failure.
/// Fields are visited in name order so the message is stable.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields = field_errors.keys().copied().collect::<Vec<_>>();
    fields.sort_unstable();
    for field in fields {
        let Some(errs) = field_errors.get(field) else {
            continue;
        };
        if let Some(err) = errs.first() {
            return match &err.message {
                Some(msg) => msg.to_string(),
                None => format!("Invalid value for `{field}`"),
            };
        }
    }
    "Invalid request body".to_owned()
}

pub struct ValidatedBody<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for ValidatedBody<T>
where
    B: Send + 'static,
    S: Send + Sync,
    T: Validate + 'static,
    Json<T>: FromRequest<(), B>,
{
    type Rejection = AppError;

    async fn from_request(req: Request<B>, _state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = req
            .extract::<Json<T>, _>()
            .await
            .map_err(|_| AppError::BadRequestErr("Invalid JSON body".into()))?;
        data.validate()
            .map_err(|err| AppError::BadRequestErr(first_validation_message(&err)))?;
        Ok(Self(data))
    }
}

/// Query string extractor that validates the parsed params and answers
/// with the JSON error envelope instead of a plain text rejection
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|err| {
                tracing::debug!("{:?}", err);
                AppError::BadRequestErr("Invalid query params".into())
            })?;
        params
            .validate()
            .map_err(|err| AppError::BadRequestErr(first_validation_message(&err)))?;
        Ok(Self(params))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(email(message = "Valid email is required"))]
        email: String,
        #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
        rating: u8,
    }

    #[test]
    fn test_validate_target_type() {
        assert!(validate_target_type("property").is_ok());
        assert!(validate_target_type("new-project_2").is_ok());
        assert!(validate_target_type("").is_err());
        assert!(validate_target_type("Property").is_err());
        assert!(validate_target_type("a b").is_err());
        assert!(validate_target_type(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_first_validation_message_is_stable() {
        let sample = Sample {
            email: "nope".into(),
            rating: 9,
        };
        let err = sample.validate().unwrap_err();
        assert_eq!(first_validation_message(&err), "Valid email is required");
        let sample = Sample {
            email: "a@b.com".into(),
            rating: 0,
        };
        let err = sample.validate().unwrap_err();
        assert_eq!(first_validation_message(&err), "Rating must be between 1 and 5");
    }
}
