use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{IdentityError, IdentityProvider};
use crate::config::IdentityConfig;
use crate::models::{AuthorId, AuthorSummary};

/// REST client for the hosted identity provider.
///
/// Calls `GET {base_url}/v1/users?user_id=..&user_id=..&limit=N` with the
/// secret key as a bearer token.
#[derive(Clone)]
pub struct HttpIdentityClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: String,
    username: Option<String>,
    #[serde(default, alias = "image_url")]
    profile_image_url: String,
}

impl From<UserRecord> for AuthorSummary {
    fn from(user: UserRecord) -> Self {
        AuthorSummary {
            id: AuthorId::from(user.id),
            username: user.username,
            profile_image_url: user.profile_image_url,
        }
    }
}

impl HttpIdentityClient {
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn users_url(&self) -> String {
        format!("{}/v1/users", self.base_url)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityClient {
    async fn batch_get_users(
        &self,
        ids: &[AuthorId],
        limit: u32,
    ) -> Result<Vec<AuthorSummary>, IdentityError> {
        let mut query: Vec<(&str, String)> = ids
            .iter()
            .map(|id| ("user_id", id.to_string()))
            .collect();
        query.push(("limit", limit.to_string()));

        let response = self
            .client
            .get(self.users_url())
            .bearer_auth(&self.api_key)
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IdentityError::UnexpectedStatus(response.status()));
        }

        let users: Vec<UserRecord> = response.json().await?;
        debug!(requested = ids.len(), found = users.len(), "identity batch lookup");

        Ok(users.into_iter().map(AuthorSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_record_accepts_image_url_alias_and_missing_username() {
        let user: UserRecord = serde_json::from_value(serde_json::json!({
            "id": "user_2abc",
            "username": null,
            "image_url": "https://img.example.com/a.png"
        }))
        .unwrap();

        let summary = AuthorSummary::from(user);
        assert_eq!(summary.id, AuthorId::new("user_2abc"));
        assert_eq!(summary.username, None);
        assert_eq!(summary.profile_image_url, "https://img.example.com/a.png");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = HttpIdentityClient::new(&IdentityConfig {
            base_url: "https://identity.example.com/".to_string(),
            api_key: "sk_test".to_string(),
            timeout_ms: 1_000,
        })
        .unwrap();
        assert_eq!(client.users_url(), "https://identity.example.com/v1/users");
    }
}
