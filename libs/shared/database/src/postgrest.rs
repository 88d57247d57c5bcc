use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Failure signal from the PostgREST data layer.
///
/// The raw PostgreSQL error `code` is preserved so callers can classify
/// constraint violations (notably `23P01`, the exclusion constraint that
/// rejects overlapping appointments) instead of treating every 409 alike.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("authentication rejected by data layer: {0}")]
    Unauthorized(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("constraint violation {code}: {message}")]
    Constraint { code: String, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response ({status}): {body}")]
    Unexpected { status: StatusCode, body: String },
}

impl DbError {
    /// True when the database rejected a write because it would overlap an
    /// existing range protected by an exclusion constraint.
    pub fn is_exclusion_violation(&self) -> bool {
        matches!(self, DbError::Constraint { code, .. } if code == "23P01")
    }
}

pub struct PostgrestClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl PostgrestClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.postgrest_url.clone(),
            anon_key: config.postgrest_anon_key.clone(),
        }
    }

    fn default_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(value) = HeaderValue::from_str(&self.anon_key) {
            headers.insert("apikey", value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, auth_token, body, None)
            .await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.default_headers(auth_token);
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Data layer error ({}): {}", status, error_text);
            return Err(Self::classify_failure(status, error_text));
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Like [`request`](Self::request) but discards the response body.
    /// PostgREST answers DELETE and minimal-return writes with 204 and an
    /// empty body, which has no JSON decoding.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(), DbError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let headers = self.default_headers(auth_token);
        let mut req = self.client.request(method, &url).headers(headers);
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Data layer error ({}): {}", status, error_text);
            return Err(Self::classify_failure(status, error_text));
        }

        Ok(())
    }

    /// Translate a non-2xx PostgREST response into a typed error. PostgREST
    /// returns a JSON object carrying the PostgreSQL error `code` when the
    /// database itself rejected the statement.
    fn classify_failure(status: StatusCode, body: String) -> DbError {
        if let Ok(parsed) = serde_json::from_str::<Value>(&body) {
            if let Some(code) = parsed.get("code").and_then(Value::as_str) {
                let message = parsed
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or(&body)
                    .to_string();
                return DbError::Constraint {
                    code: code.to_string(),
                    message,
                };
            }
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DbError::Unauthorized(body),
            StatusCode::NOT_FOUND => DbError::NotFound(body),
            _ => DbError::Unexpected { status, body },
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
