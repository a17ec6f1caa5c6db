use axum::http::StatusCode;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::model::{Id, Listing};
use crate::upstream::{Resource, UpstreamClient};

/// Kind of upstream call; decides the HTTP method and the failure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn method(self) -> Method {
        match self {
            Operation::List | Operation::Fetch => Method::GET,
            Operation::Create => Method::POST,
            Operation::Update => Method::PUT,
            Operation::Delete => Method::DELETE,
        }
    }

    pub fn failure_code(self, resource: Resource) -> String {
        match self {
            Operation::List => format!("{}_FETCH_FAILED", resource.plural_code()),
            Operation::Fetch => format!("{}_FETCH_FAILED", resource.singular_code()),
            Operation::Create => format!("{}_CREATE_FAILED", resource.singular_code()),
            Operation::Update => format!("{}_UPDATE_FAILED", resource.singular_code()),
            Operation::Delete => format!("{}_DELETE_FAILED", resource.singular_code()),
        }
    }
}

/// Perform one upstream call and fold every outcome into `Ok(body)` or an `ApiError`.
///
/// Transport failures become 502 with the error message as details; non-2xx
/// answers keep the upstream status and carry the upstream body as details.
pub async fn forward(
    client: &UpstreamClient,
    operation: Operation,
    resource: Resource,
    url: &str,
    query: &[(&str, String)],
    body: Option<&Value>,
) -> Result<Value, ApiError> {
    let code = operation.failure_code(resource);

    match client.send(operation.method(), url, query, body).await {
        Ok(response) if response.is_success() => Ok(response.into_value()),
        Ok(response) => {
            log::warn!("upstream {} answered {} ({})", url, response.status, code);
            let status = response.status;
            Err(ApiError::upstream(status, code, response.into_value()))
        }
        Err(e) => {
            log::warn!("upstream {} unreachable: {}", url, e);
            Err(ApiError::transport(code, e.to_string()))
        }
    }
}

/// `GET <resource>/?filters`, body passed through untouched.
pub async fn list(
    client: &UpstreamClient,
    resource: Resource,
    filters: &[(&str, String)],
) -> Result<Value, ApiError> {
    let url = client.resource_url(resource)?;
    forward(client, Operation::List, resource, &url, filters, None).await
}

/// `GET <resource>/?filters`, normalised into typed records.
pub async fn list_records<T: DeserializeOwned>(
    client: &UpstreamClient,
    resource: Resource,
    filters: &[(&str, String)],
) -> Result<Vec<T>, ApiError> {
    let body = list(client, resource, filters).await?;
    Listing::<T>::from_value(body)
        .map(Listing::into_items)
        .map_err(|e| {
            ApiError::new(
                StatusCode::BAD_GATEWAY,
                Operation::List.failure_code(resource),
            )
            .with_details(format!("unexpected listing shape: {}", e))
        })
}

pub async fn fetch(client: &UpstreamClient, resource: Resource, id: Id) -> Result<Value, ApiError> {
    let url = client.item_url(resource, id)?;
    forward(client, Operation::Fetch, resource, &url, &[], None).await
}

pub async fn create<P: Serialize>(
    client: &UpstreamClient,
    resource: Resource,
    payload: &P,
) -> Result<Value, ApiError> {
    let url = client.resource_url(resource)?;
    let body = to_body(payload)?;
    forward(client, Operation::Create, resource, &url, &[], Some(&body)).await
}

pub async fn update<P: Serialize>(
    client: &UpstreamClient,
    resource: Resource,
    id: Id,
    payload: &P,
) -> Result<Value, ApiError> {
    let url = client.item_url(resource, id)?;
    let body = to_body(payload)?;
    forward(client, Operation::Update, resource, &url, &[], Some(&body)).await
}

pub async fn delete(client: &UpstreamClient, resource: Resource, id: Id) -> Result<Value, ApiError> {
    let url = client.item_url(resource, id)?;
    forward(client, Operation::Delete, resource, &url, &[], None).await
}

/// `DELETE` of a link addressed by its two endpoints, `<resource>/<left>/<right>/`.
pub async fn delete_link(
    client: &UpstreamClient,
    resource: Resource,
    left: Id,
    right: Id,
) -> Result<Value, ApiError> {
    let url = format!("{}{}/", client.item_url(resource, left)?, right);
    forward(client, Operation::Delete, resource, &url, &[], None).await
}

fn to_body<P: Serialize>(payload: &P) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| {
        ApiError::internal("PAYLOAD_SERIALIZATION_FAILED").with_details(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_codes() {
        assert_eq!(
            Operation::List.failure_code(Resource::Companies),
            "COMPANIES_FETCH_FAILED"
        );
        assert_eq!(Operation::Fetch.failure_code(Resource::Nodes), "NODE_FETCH_FAILED");
        assert_eq!(
            Operation::Create.failure_code(Resource::NodeProperties),
            "NODE_PROPERTY_CREATE_FAILED"
        );
        assert_eq!(
            Operation::Update.failure_code(Resource::Conditions),
            "CONDITION_UPDATE_FAILED"
        );
        assert_eq!(
            Operation::Delete.failure_code(Resource::ConditionProperties),
            "CONDITION_PROPERTY_DELETE_FAILED"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_bad_gateway() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = format!("http://{}/api", addr);
        let client = UpstreamClient::new(crate::upstream::ServiceLocator::new(Some(&base)));
        let error = list(&client, Resource::Nodes, &[("company_id", "1".to_string())])
            .await
            .unwrap_err();
        assert_eq!(error.status, StatusCode::BAD_GATEWAY);
        assert_eq!(error.code, "NODES_FETCH_FAILED");
        assert!(error.details.is_some());
    }
}
