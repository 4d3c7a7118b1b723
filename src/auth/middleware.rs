// Auth Gate for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::auth::{error::AuthError, token::TokenService};
use crate::users::{User, UserRepository};

/// Resolves a bearer token to a stored user
///
/// Stages: extract header, verify token, look the claimed email up (password
/// hash included). Every stage fails with an AuthError that renders the same
/// 401 body.
#[derive(Clone)]
pub struct Authenticator {
    tokens: TokenService,
    users: Arc<dyn UserRepository>,
}

impl Authenticator {
    pub fn new(tokens: TokenService, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }

    /// Run the whole gate against a set of request headers
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<User, AuthError> {
        let token = bearer_token(headers)?;
        let claims = self.tokens.verify(token)?;

        let user = self
            .users
            .find_by_email(&claims.email)
            .await
            .map_err(|e| AuthError::LookupFailed(e.to_string()))?
            .ok_or(AuthError::UnknownIdentity)?;

        debug!("Auth Gate resolved user {}", user.id);
        Ok(user)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Authenticated user extractor
///
/// Adding this argument to a handler places the Auth Gate in front of it.
/// The resolved user is handed to the handler as a value.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    Authenticator: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = Authenticator::from_ref(state);
        authenticator
            .authenticate(&parts.headers)
            .await
            .map(AuthenticatedUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::users::NewUser;
    use axum::http::{HeaderValue, Request};
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    async fn authenticator_with_user(email: &str) -> (Authenticator, User) {
        let store = MemoryStore::new();
        let user = UserRepository::insert(
            &store,
            NewUser {
                email: email.to_string(),
                password_hash: "$argon2id$stub".to_string(),
                first_name: "Fran".to_string(),
                last_name: "Linde".to_string(),
                phone: None,
                address: None,
            },
        )
        .await
        .unwrap();

        let authenticator = Authenticator::new(TokenService::new(SECRET, 3600), Arc::new(store));
        (authenticator, user)
    }

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn parts_with_auth(value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user_with_password_hash() {
        let (authenticator, user) = authenticator_with_user("fran@mail.com").await;
        let token = TokenService::new(SECRET, 3600).issue(user.id, &user.email).unwrap();

        let resolved = authenticator
            .authenticate(&headers_with_auth(&format!("Bearer {}", token)))
            .await
            .unwrap();

        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.password_hash, "$argon2id$stub");
    }

    #[tokio::test]
    async fn test_missing_header() {
        let (authenticator, _) = authenticator_with_user("fran@mail.com").await;
        let result = authenticator.authenticate(&HeaderMap::new()).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn test_invalid_bearer_format() {
        let (authenticator, _) = authenticator_with_user("fran@mail.com").await;

        for value in ["InvalidFormat token", "token_without_bearer", "Basic dXNlcjpwYXNz"] {
            let result = authenticator.authenticate(&headers_with_auth(value)).await;
            assert!(matches!(result, Err(AuthError::InvalidToken)));
        }
    }

    #[tokio::test]
    async fn test_expired_token() {
        let (authenticator, user) = authenticator_with_user("fran@mail.com").await;
        let claims = crate::auth::token::Claims {
            sub: user.id,
            email: user.email.clone(),
            iat: Utc::now().timestamp() - 1000,
            exp: Utc::now().timestamp() - 500,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = authenticator
            .authenticate(&headers_with_auth(&format!("Bearer {}", token)))
            .await;
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[tokio::test]
    async fn test_token_for_unknown_email() {
        let (authenticator, _) = authenticator_with_user("fran@mail.com").await;
        let token = TokenService::new(SECRET, 3600)
            .issue(Uuid::new_v4(), "ghost@mail.com")
            .unwrap();

        let result = authenticator
            .authenticate(&headers_with_auth(&format!("Bearer {}", token)))
            .await;
        assert!(matches!(result, Err(AuthError::UnknownIdentity)));
    }

    #[tokio::test]
    async fn test_extractor_uses_state() {
        let (authenticator, user) = authenticator_with_user("fran@mail.com").await;
        let token = TokenService::new(SECRET, 3600).issue(user.id, &user.email).unwrap();

        let mut parts = parts_with_auth(&format!("Bearer {}", token));
        let AuthenticatedUser(resolved) =
            AuthenticatedUser::from_request_parts(&mut parts, &authenticator)
                .await
                .unwrap();
        assert_eq!(resolved.email, "fran@mail.com");

        let mut parts = parts_with_auth("Bearer not.a.jwt");
        let result = AuthenticatedUser::from_request_parts(&mut parts, &authenticator).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
