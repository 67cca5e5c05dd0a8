//! Bearer-token verification against an external identity service.

use async_trait::async_trait;
use serde::Deserialize;

use engine::UserIdentity;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token rejected by the identity service")]
    InvalidToken,
    #[error("identity service request failed: {0}")]
    Upstream(String),
}

/// Verifies bearer tokens and mirrors account deletion to the identity
/// service. Behind a trait so tests can substitute a canned verifier.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a bearer token to the identity it was issued for.
    async fn verify(&self, token: &str) -> Result<UserIdentity, AuthError>;

    /// Deletes the account on the identity service side.
    async fn delete_user(&self, uid: &str) -> Result<(), AuthError>;
}

/// OIDC-style claims returned by the userinfo endpoint.
#[derive(Deserialize)]
struct UserInfoClaims {
    sub: String,
    email: String,
    name: Option<String>,
    picture: Option<String>,
}

/// [`IdentityProvider`] backed by an HTTP userinfo endpoint.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    userinfo_url: String,
    admin_url: Option<String>,
    service_token: Option<String>,
}

impl HttpIdentityProvider {
    pub fn new(userinfo_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            userinfo_url,
            admin_url: None,
            service_token: None,
        }
    }

    /// Admin endpoint and credential used for remote account deletion.
    pub fn with_admin(mut self, admin_url: String, service_token: String) -> Self {
        self.admin_url = Some(admin_url);
        self.service_token = Some(service_token);
        self
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify(&self, token: &str) -> Result<UserIdentity, AuthError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| AuthError::Upstream(err.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::InvalidToken);
        }

        let claims: UserInfoClaims = response
            .json()
            .await
            .map_err(|err| AuthError::Upstream(err.to_string()))?;

        Ok(UserIdentity {
            uid: claims.sub,
            email: claims.email,
            display_name: claims.name,
            photo_url: claims.picture,
        })
    }

    async fn delete_user(&self, uid: &str) -> Result<(), AuthError> {
        let Some(admin_url) = &self.admin_url else {
            tracing::warn!("no identity admin endpoint configured, remote account {uid} kept");
            return Ok(());
        };

        let mut request = self
            .client
            .delete(format!("{}/users/{uid}", admin_url.trim_end_matches('/')));
        if let Some(token) = &self.service_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| AuthError::Upstream(err.to_string()))?;
        if !response.status().is_success() {
            return Err(AuthError::Upstream(format!(
                "account deletion returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
