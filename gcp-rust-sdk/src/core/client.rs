use crate::core::auth::AuthProvider;
use crate::core::{GcpError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Bearer-authenticated JSON client for a single API endpoint.
pub struct GcpClient {
    http: reqwest::Client,
    auth: Arc<dyn AuthProvider>,
    endpoint: String,
}

impl GcpClient {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            auth,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.auth.access_token().await?;
        let response = self
            .http
            .get(format!("{}{}", self.endpoint, path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let token = self.auth.access_token().await?;
        let mut request = self
            .http
            .post(format!("{}{}", self.endpoint, path))
            .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::decode(request.send().await?).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GcpError::from_response(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}
