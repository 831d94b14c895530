//! Bearer credential verification.
//!
//! The front end signs users in with a hosted identity provider and sends the resulting id token as
//! `Authorization: Bearer <token>`. The server never inspects the token itself. It asks the identity provider who the
//! token belongs to, and the verified email address is attached to the request as a [`VerifiedIdentity`].
use std::{
    future::{ready, Ready},
    sync::Arc,
};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use log::*;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use zap_common::Secret;

use crate::{
    config::IdentityConfig,
    errors::{AuthError, ServerError},
};

/// The identity a bearer credential was verified to belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub email: String,
}

impl VerifiedIdentity {
    pub fn new<S: Into<String>>(email: S) -> Self {
        Self { email: email.into() }
    }
}

impl FromRequest for VerifiedIdentity {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<VerifiedIdentity>().cloned();
        ready(identity.ok_or_else(|| {
            warn!("🔐️ No verified identity found in request extensions");
            ServerError::AuthenticationError(AuthError::MissingCredential)
        }))
    }
}

/// Turns a bearer credential into a [`VerifiedIdentity`].
#[allow(async_fn_in_trait)]
pub trait IdentityVerifier {
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}

/// Extracts the token from an `Authorization` header value of the form `Bearer <token>`.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.map(str::trim).filter(|h| !h.is_empty()).ok_or(AuthError::MissingCredential)?;
    if header.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MissingCredential);
    }
    let (scheme, token) = header
        .split_once(' ')
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected 'Bearer <token>'".to_string()))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::PoorlyFormattedToken(format!("Unsupported authorization scheme '{scheme}'")));
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(token)
}

//-------------------------------------------  RemoteIdentityVerifier  -------------------------------------------------
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
struct LookupUser {
    #[serde(default)]
    email: Option<String>,
}

/// Verifies id tokens against the identity provider's `accounts:lookup` endpoint.
#[derive(Clone)]
pub struct RemoteIdentityVerifier {
    url: String,
    api_key: Secret<String>,
    client: Arc<Client>,
}

impl RemoteIdentityVerifier {
    pub fn new(config: &IdentityConfig) -> Result<Self, ServerError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServerError::InitializeError(format!("Could not build the identity client. {e}")))?;
        let url = format!("{}/v1/accounts:lookup", config.api_url);
        Ok(Self { url, api_key: config.api_key.clone(), client: Arc::new(client) })
    }
}

impl IdentityVerifier for RemoteIdentityVerifier {
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        if self.api_key.is_empty() {
            return Err(AuthError::VerifierUnavailable("No identity API key has been configured".to_string()));
        }
        let response = self
            .client
            .post(self.url.as_str())
            .query(&[("key", self.api_key.reveal().as_str())])
            .json(&LookupRequest { id_token: token })
            .send()
            .await
            .map_err(|e| AuthError::VerifierUnavailable(e.to_string()))?;
        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            debug!("🔐️ Identity provider rejected the credential. {status}");
            return Err(AuthError::InvalidCredential("The credential is invalid or has expired".to_string()));
        }
        if !status.is_success() {
            warn!("🔐️ Identity provider returned {status}");
            return Err(AuthError::VerifierUnavailable(format!("Identity provider returned {status}")));
        }
        let lookup =
            response.json::<LookupResponse>().await.map_err(|e| AuthError::VerifierUnavailable(e.to_string()))?;
        let email = lookup
            .users
            .into_iter()
            .find_map(|u| u.email)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AuthError::InvalidCredential("The credential is not linked to an email".to_string()))?;
        trace!("🔐️ Credential verified for {email}");
        Ok(VerifiedIdentity { email })
    }
}
