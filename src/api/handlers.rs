use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::user_extractor::SessionUser;
use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult, Envelope};
use crate::logic::{company_edges, dashboard, IdentityResolver};
use crate::model::{current_timestamp, Id};
use crate::store::UserDirectory;
use crate::upstream::{ServiceLocator, UpstreamClient};

/// Per-process state shared by every handler; nothing in it changes after startup.
pub struct AppState<D> {
    pub config: AppConfig,
    pub upstream: UpstreamClient,
    pub directory: D,
}

pub type SharedState<D> = Arc<AppState<D>>;

impl<D: UserDirectory> AppState<D> {
    pub fn new(config: AppConfig, directory: D) -> Self {
        let locator = ServiceLocator::new(config.upstream.base_url.as_deref());
        Self {
            upstream: UpstreamClient::new(locator),
            config,
            directory,
        }
    }

    /// Company of the authenticated caller, resolved afresh for this request.
    pub async fn company_for(&self, user: &SessionUser) -> Result<Id, ApiError> {
        IdentityResolver::new(&self.directory, &self.upstream)
            .resolve(&user.email)
            .await
    }

    pub fn workers(&self) -> usize {
        self.config.fan_out_workers()
    }

    /// Every edge of the company's nodes, listed with bounded concurrency.
    pub async fn company_edges(&self, company_id: Id) -> Result<Vec<Value>, ApiError> {
        company_edges(&self.upstream, company_id, self.workers()).await
    }
}

pub async fn health_check<D: UserDirectory>(State(state): State<SharedState<D>>) -> Envelope {
    Envelope::ok(json!({
        "status": "healthy",
        "upstream_configured": state.upstream.locator().is_configured(),
        "timestamp": current_timestamp(),
    }))
}

/// GET /api/company
pub async fn get_company<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
) -> ApiResult {
    let company_id = state.company_for(&user).await?;
    Ok(Envelope::ok(json!({ "company_id": company_id })))
}

/// GET /api/dashboard
pub async fn get_dashboard<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
) -> ApiResult {
    let company_id = state.company_for(&user).await?;
    let summary = dashboard(&state.upstream, company_id, state.workers()).await?;
    let data = serde_json::to_value(summary)
        .map_err(|e| ApiError::internal("DASHBOARD_SERIALIZATION_FAILED").with_details(e.to_string()))?;
    Ok(Envelope::ok(data))
}

pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found("ROUTE_NOT_FOUND").with_details(uri.path().to_string())
}

/// Known path, unregistered method.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED")
        .with_details(format!("{} {}", method, uri.path()))
}
