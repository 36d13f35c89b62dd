use crate::errors::ServiceError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

/// `Json` body extractor whose rejections render as `{message}` error bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Item {
        quantity: u32,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .expect("request")
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let ApiJson(item) = ApiJson::<Item>::from_request(request(r#"{"quantity":2}"#), &())
            .await
            .expect("extracts");
        assert_eq!(item.quantity, 2);
    }

    #[tokio::test]
    async fn type_mismatch_becomes_validation_error() {
        let err = ApiJson::<Item>::from_request(request(r#"{"quantity":-1}"#), &())
            .await
            .expect_err("negative quantity");
        assert_matches!(err, ServiceError::ValidationError(ref msg) if msg.contains("quantity"));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_becomes_validation_error() {
        let err = ApiJson::<Item>::from_request(request("{not json"), &())
            .await
            .expect_err("syntax error");
        assert_matches!(err, ServiceError::ValidationError(_));
    }
}
