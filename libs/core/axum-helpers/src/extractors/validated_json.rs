use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that must deserialize and pass `validator` rules.
///
/// Malformed JSON, unknown enum values and missing fields reject with 400
/// `JSON_EXTRACTION`; rule violations reject with 400 `VALIDATION_ERROR`
/// and per-field `details`.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct AddReview {
///     #[validate(range(min = 1, max = 5))]
///     rating: u8,
/// }
///
/// async fn add_review(ValidatedJson(review): ValidatedJson<AddReview>) {}
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::post,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct AddReview {
        #[validate(range(min = 1, max = 5))]
        rating: u8,
    }

    fn app() -> Router {
        Router::new().route(
            "/reviews",
            post(|ValidatedJson(review): ValidatedJson<AddReview>| async move {
                review.rating.to_string()
            }),
        )
    }

    fn post_json(body: &'static str) -> Request<Body> {
        Request::post("/reviews")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_accepts_valid_body() {
        let response = app().oneshot(post_json(r#"{"rating":4}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rule_violation_is_bad_request() {
        let response = app().oneshot(post_json(r#"{"rating":6}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let response = app().oneshot(post_json(r#"{}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
