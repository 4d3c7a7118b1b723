// Request extractors whose rejections flow through ApiError

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Multipart, Request},
};
use uuid::Uuid;

use crate::error::ApiError;

/// JSON body extractor
/// Unparsable bodies and missing required fields become a 400 instead of axum's 422
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor
/// Values that do not deserialize (`page=abc`, `limit=-1`) become a JSON 400
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Multipart extractor, a missing or broken boundary becomes a JSON 400
pub struct ApiMultipart(pub Multipart);

#[async_trait]
impl<S> FromRequest<S> for ApiMultipart
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        Ok(Self(multipart))
    }
}

/// Parse a path id, an id that is not a UUID cannot name an existing record
pub fn parse_id(raw: &str, resource: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        tracing::debug!("Unparsable {} id: {}", resource, raw);
        ApiError::not_found(resource)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Car").unwrap(), id);
    }

    #[test]
    fn test_garbage_id_is_not_found() {
        let err = parse_id("64f1c2e9a1b2c3d4e5f60718", "Car").unwrap_err();
        assert!(matches!(err, ApiError::NotFound { resource: "Car" }));
    }
}
