//! API client for the remote user-directory service.
//!
//! This module provides the `ApiClient` struct for authenticating and for
//! fetching, updating, and deleting user records.

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::debug;

use crate::models::{UserPage, UserUpdate};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default base URL for the hosted mock API
pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// API client for the user directory.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Drop the bearer token (logout)
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Authenticate and return the session token
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let url = format!("{}/login", self.base_url);

        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to send login request")?;

        let response = Self::check_response(response).await?;

        let login: LoginResponse = response
            .json()
            .await
            .context("Failed to parse login response")?;

        debug!("Login succeeded");
        Ok(login.token)
    }

    /// Fetch one page of the user listing
    pub async fn fetch_users(&self, page: u64) -> Result<UserPage> {
        let url = format!("{}/users?page={}", self.base_url, page);

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to fetch users page {}", page))?;

        let response = Self::check_response(response).await?;

        let parsed: UserPage = response
            .json()
            .await
            .context("Failed to parse users response")?;

        debug!(
            page = parsed.page,
            count = parsed.data.len(),
            total_pages = parsed.total_pages,
            "Users page fetched"
        );
        Ok(parsed)
    }

    /// Update a user's mutable fields. The server echoes the update back;
    /// only the status matters here since local state is merged from the form.
    pub async fn update_user(&self, id: i64, fields: &UserUpdate) -> Result<()> {
        let url = format!("{}/users/{}", self.base_url, id);

        let response = self
            .client
            .put(&url)
            .headers(self.auth_headers()?)
            .json(fields)
            .send()
            .await
            .with_context(|| format!("Failed to send update for user {}", id))?;

        Self::check_response(response).await?;

        debug!(user_id = id, "User updated");
        Ok(())
    }

    /// Delete a user record
    pub async fn delete_user(&self, id: i64) -> Result<()> {
        let url = format!("{}/users/{}", self.base_url, id);

        let response = self
            .client
            .delete(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send delete for user {}", id))?;

        Self::check_response(response).await?;

        debug!(user_id = id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_response() {
        let json = r#"{"token": "QpwL5tke4Pnpja7X4"}"#;
        let parsed: LoginResponse =
            serde_json::from_str(json).expect("Failed to parse login test JSON");
        assert_eq!(parsed.token, "QpwL5tke4Pnpja7X4");
    }

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let api = ApiClient::new("https://reqres.in/api/").expect("client");
        assert_eq!(api.base_url, "https://reqres.in/api");
    }

    #[test]
    fn test_auth_headers_carry_bearer_token() {
        let mut api = ApiClient::new(DEFAULT_BASE_URL).expect("client");
        assert!(api.auth_headers().expect("headers").is_empty());

        api.set_token("QpwL5tke4Pnpja7X4".to_string());
        let headers = api.auth_headers().expect("headers");
        assert_eq!(
            headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer QpwL5tke4Pnpja7X4")
        );

        api.clear_token();
        assert!(api.auth_headers().expect("headers").is_empty());
    }
}
