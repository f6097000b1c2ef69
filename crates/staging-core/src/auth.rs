use anyhow::Result;
use async_trait::async_trait;

/// Source of the credentials the staging backend authenticates with.
///
/// Implemented by the host application on top of whatever auth service it
/// uses. `token` is consulted once per outgoing request, so a provider that
/// refreshes its token is picked up without rebuilding the client.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Current auth token, sent verbatim as the `Authorization` header value.
    async fn token(&self) -> Result<String>;

    /// Account name of the signed-in user; scopes the default listing root.
    fn username(&self) -> String;
}

/// Fixed-credential provider for tests and hosts without token rotation.
pub struct StaticToken {
    token: String,
    username: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticToken {
    async fn token(&self) -> Result<String> {
        Ok(self.token.clone())
    }

    fn username(&self) -> String {
        self.username.clone()
    }
}
