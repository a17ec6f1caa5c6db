use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;

use crate::error::ApiError;
use crate::model::Id;
use crate::upstream::{Resource, ServiceLocator};

/// Response body that was not JSON, or not valid JSON despite the header.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBody(pub String);

impl RawBody {
    pub fn into_value(self) -> Value {
        if self.0.is_empty() {
            Value::Null
        } else {
            Value::String(self.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Result<Value, RawBody>,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as a JSON value; raw text becomes a JSON string, an empty body `null`.
    pub fn into_value(self) -> Value {
        match self.body {
            Ok(value) => value,
            Err(raw) => raw.into_value(),
        }
    }
}

/// Thin wrapper over `reqwest` that speaks JSON to the upstream service.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    locator: ServiceLocator,
}

impl UpstreamClient {
    pub fn new(locator: ServiceLocator) -> Self {
        Self {
            http: reqwest::Client::new(),
            locator,
        }
    }

    pub fn locator(&self) -> &ServiceLocator {
        &self.locator
    }

    /// Collection URL, or the resource's `*_SERVICE_URL_NOT_CONFIGURED` error.
    pub fn resource_url(&self, resource: Resource) -> Result<String, ApiError> {
        self.locator
            .resource_url(resource)
            .ok_or_else(|| not_configured(resource))
    }

    pub fn item_url(&self, resource: Resource, id: Id) -> Result<String, ApiError> {
        self.locator
            .item_url(resource, id)
            .ok_or_else(|| not_configured(resource))
    }

    /// Issue one request. Only transport failures are errors; any status is a response.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<UpstreamResponse, reqwest::Error> {
        log::debug!("upstream {} {} {:?}", method, url, query);

        let mut request = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.to_ascii_lowercase().contains("json"));

        let text = response.text().await?;
        Ok(UpstreamResponse {
            status,
            body: parse_body(is_json, text),
        })
    }
}

fn parse_body(is_json: bool, text: String) -> Result<Value, RawBody> {
    if !is_json || text.trim().is_empty() {
        return Err(RawBody(text));
    }
    serde_json::from_str(&text).map_err(|_| RawBody(text))
}

fn not_configured(resource: Resource) -> ApiError {
    ApiError::internal(format!(
        "{}_SERVICE_URL_NOT_CONFIGURED",
        resource.plural_code()
    ))
}
