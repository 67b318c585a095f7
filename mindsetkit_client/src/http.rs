use std::sync::Arc;

use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::Params;

/// One call against the API: method, path below the API prefix, query and
/// optional JSON body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Params,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Params::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn query_params(mut self, params: Params) -> Self {
        self.query.extend(params);
        self
    }

    pub fn body(mut self, body: impl Serialize) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn params(mut self, params: Params) -> Self {
        self.body = Some(Value::Object(params));
        self
    }

    /// Query pairs as the server reads them: strings verbatim, arrays as
    /// one pair per element (`tags=a&tags=b`), everything else as JSON
    /// text, nulls left out.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.query.len());
        for (key, value) in &self.query {
            match value {
                Value::Array(items) => pairs.extend(
                    items
                        .iter()
                        .filter_map(query_text)
                        .map(|text| (key.clone(), text)),
                ),
                other => {
                    if let Some(text) = query_text(other) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
        }
        pairs
    }
}

fn query_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// `{ "error": bool, "data": ..., "message": ... }`
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

/// Thin wrapper over `reqwest` that turns every response into a single
/// `Result`: the envelope's `data` on success, a typed [`ApiError`]
/// otherwise.
#[derive(Clone)]
pub struct HttpClient {
    config: Arc<ClientConfig>,
    client: Client,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ApiError::Network)?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub fn url(&self, path: &str) -> ApiResult<Url> {
        self.config
            .api_url(path)
            .map_err(|err| ApiError::contract(format!("{err:#}")))
    }

    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let url = self.url(&request.path)?;
        tracing::debug!(method = %request.method, %url, "api request");

        let mut builder = self.client.request(request.method.clone(), url.clone());
        let pairs = request.query_pairs();
        if !pairs.is_empty() {
            builder = builder.query(&pairs);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let result = match builder.send().await {
            Ok(response) => settle(response).await,
            Err(err) => Err(ApiError::Network(err)),
        };
        if let Err(err) = &result {
            self.report(&request.method, url.as_str(), err);
        }
        result
    }

    pub(crate) fn report(&self, method: &Method, url: &str, err: &ApiError) {
        if self.config.debug {
            tracing::warn!(%method, url, error = %err, "api request failed");
        }
    }
}

/// Applies the envelope policy to a response.
pub(crate) async fn settle<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(ApiError::Network)?;

    if !status.is_success() {
        let message = serde_json::from_slice::<Envelope>(&bytes)
            .ok()
            .and_then(|envelope| envelope.message)
            .or_else(|| {
                let text = String::from_utf8_lossy(&bytes).trim().to_string();
                (!text.is_empty()).then_some(text)
            });
        return Err(ApiError::Status { status, message });
    }

    let envelope: Envelope = serde_json::from_slice(&bytes)?;
    if envelope.error {
        return Err(ApiError::Application {
            message: envelope
                .message
                .unwrap_or_else(|| "unknown error".to_string()),
        });
    }
    Ok(serde_json::from_value(envelope.data)?)
}
