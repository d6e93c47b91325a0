//! Firebase ID token verification.
//!
//! Scribo keeps no user database of its own; identity comes entirely from
//! Firebase Auth. Handlers declare an [`AuthUser`] argument and axum runs
//! the token check before the handler body sees the request. Signing keys
//! are fetched from Google's JWKS endpoint and cached for an hour; when a
//! refresh fails the previous key set keeps serving until the next attempt.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

const CERTS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
const ISSUER_BASE: &str = "https://securetoken.google.com/";
const KEY_TTL: Duration = Duration::from_secs(3600);

/// The verified caller of an authenticated route.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
}

/// The claims Scribo actually reads; signature, expiry, issuer and
/// audience checks happen in [`decode`] before these are trusted.
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: Option<String>,
    email_verified: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct CertsResponse {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

struct KeySet {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

/// Cached Google signing keys plus the project they verify against.
pub struct JwksCache {
    http: Client,
    project_id: String,
    keys: RwLock<KeySet>,
}

impl JwksCache {
    /// Build the cache and load the initial key set. The project id comes
    /// from [`ApiConfig`](crate::config::ApiConfig); an empty one means the
    /// deployment is misconfigured, so fail here rather than 401 every
    /// request later.
    pub async fn new(project_id: &str) -> anyhow::Result<Self> {
        anyhow::ensure!(
            !project_id.is_empty(),
            "FIREBASE_PROJECT_ID or GCP_PROJECT_ID must be set for token verification"
        );

        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;
        let keys = fetch_keys(&http).await?;

        Ok(Self {
            http,
            project_id: project_id.to_string(),
            keys: RwLock::new(KeySet {
                keys,
                fetched_at: Instant::now(),
            }),
        })
    }

    /// Verify a Firebase ID token and return its user.
    pub async fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        let header =
            decode_header(token).map_err(|_| ApiError::unauthorized("Malformed ID token"))?;
        let kid = header
            .kid
            .ok_or_else(|| ApiError::unauthorized("ID token has no key id"))?;

        let key = self
            .key_for(&kid)
            .await
            .ok_or_else(|| ApiError::unauthorized("ID token signed with an unknown key"))?;

        let claims = decode::<IdTokenClaims>(token, &key, &self.validation())
            .map_err(|e| ApiError::unauthorized(format!("ID token rejected: {}", e)))?
            .claims;

        Ok(AuthUser {
            uid: claims.sub,
            email: claims.email,
            email_verified: claims.email_verified.unwrap_or(false),
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("{}{}", ISSUER_BASE, self.project_id)]);
        validation
    }

    /// Look up a signing key, refreshing the set once its TTL lapsed. A
    /// failed refresh falls back to the stale set: Google rotates keys
    /// slowly and a network blip must not lock every user out.
    async fn key_for(&self, kid: &str) -> Option<DecodingKey> {
        {
            let set = self.keys.read().await;
            if set.fetched_at.elapsed() < KEY_TTL {
                return set.keys.get(kid).cloned();
            }
        }

        match fetch_keys(&self.http).await {
            Ok(fresh) => {
                debug!(keys = fresh.len(), "Refreshed Google signing keys");
                let mut set = self.keys.write().await;
                set.keys = fresh;
                set.fetched_at = Instant::now();
                set.keys.get(kid).cloned()
            }
            Err(e) => {
                warn!("Signing key refresh failed, serving stale set: {}", e);
                self.keys.read().await.keys.get(kid).cloned()
            }
        }
    }
}

async fn fetch_keys(http: &Client) -> anyhow::Result<HashMap<String, DecodingKey>> {
    let certs: CertsResponse = http
        .get(CERTS_URL)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let mut keys = HashMap::with_capacity(certs.keys.len());
    for jwk in certs.keys {
        keys.insert(jwk.kid, DecodingKey::from_rsa_components(&jwk.n, &jwk.e)?);
    }
    anyhow::ensure!(!keys.is_empty(), "JWKS endpoint returned no keys");
    Ok(keys)
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Authorization header must carry a Bearer token"))
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        state.jwks.verify(token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_cache() -> JwksCache {
        JwksCache {
            http: Client::new(),
            project_id: "demo-project".to_string(),
            keys: RwLock::new(KeySet {
                keys: HashMap::new(),
                fetched_at: Instant::now(),
            }),
        }
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let err = empty_cache().verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_validation_pins_project_issuer_and_audience() {
        let validation = empty_cache().validation();
        assert!(validation
            .iss
            .as_ref()
            .is_some_and(|iss| iss.contains("https://securetoken.google.com/demo-project")));
        assert!(validation
            .aud
            .as_ref()
            .is_some_and(|aud| aud.contains("demo-project")));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let request = axum::http::Request::builder()
            .header("Authorization", "Bearer abc123")
            .body(())
            .unwrap();
        let (parts, _) = request.into_parts();
        assert_eq!(bearer_token(&parts).unwrap(), "abc123");

        let request = axum::http::Request::builder()
            .header("Authorization", "Basic abc123")
            .body(())
            .unwrap();
        let (parts, _) = request.into_parts();
        assert!(bearer_token(&parts).is_err());

        let request = axum::http::Request::builder().body(()).unwrap();
        let (parts, _) = request.into_parts();
        assert!(bearer_token(&parts).is_err());
    }
}
