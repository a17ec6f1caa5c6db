use axum::{
    body::Bytes,
    extract::State,
};

use crate::api::handlers::SharedState;
use crate::api::params::{PathParams, QueryMap};
use crate::api::user_extractor::SessionUser;
use crate::error::{ApiResult, Envelope};
use crate::logic::fields::{ensure_company, optional_query_id, parse_body, path_id};
use crate::logic::node_requests::{parse_new_node, parse_node_update};
use crate::logic::OwnershipChain;
use crate::model::current_timestamp;
use crate::store::UserDirectory;
use crate::upstream::{self, Resource};

/// GET /api/nodes[?company_id]
pub async fn list_nodes<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    QueryMap(query): QueryMap,
) -> ApiResult {
    let requested = optional_query_id(&query, "company_id")?;
    let company_id = state.company_for(&user).await?;
    ensure_company(requested, company_id)?;

    let nodes = upstream::list(
        &state.upstream,
        Resource::Nodes,
        &[("company_id", company_id.to_string())],
    )
    .await?;
    Ok(Envelope::ok(nodes))
}

/// POST /api/nodes
pub async fn create_node<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    body: Bytes,
) -> ApiResult {
    let draft = parse_new_node(&parse_body(&body)?, &current_timestamp())?;
    let company_id = state.company_for(&user).await?;
    let payload = draft.into_payload(company_id)?;

    let created = upstream::create(&state.upstream, Resource::Nodes, &payload).await?;
    log::info!("Created node for company {}", company_id);
    Ok(Envelope::created(created))
}

/// GET /api/nodes/:id
pub async fn get_node<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    PathParams(id): PathParams<String>,
) -> ApiResult {
    let node_id = path_id(&id, "node_id")?;
    let company_id = state.company_for(&user).await?;
    OwnershipChain::for_company(company_id)
        .node(node_id)
        .verify(&state.upstream)
        .await?;

    let node = upstream::fetch(&state.upstream, Resource::Nodes, node_id).await?;
    Ok(Envelope::ok(node))
}

/// PUT /api/nodes/:id
pub async fn update_node<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    PathParams(id): PathParams<String>,
    body: Bytes,
) -> ApiResult {
    let node_id = path_id(&id, "node_id")?;
    let update = parse_node_update(&parse_body(&body)?, &current_timestamp())?;
    let company_id = state.company_for(&user).await?;
    OwnershipChain::for_company(company_id)
        .node(node_id)
        .verify(&state.upstream)
        .await?;

    let updated = upstream::update(&state.upstream, Resource::Nodes, node_id, &update).await?;
    Ok(Envelope::ok(updated))
}

/// DELETE /api/nodes/:id
pub async fn delete_node<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    PathParams(id): PathParams<String>,
) -> ApiResult {
    let node_id = path_id(&id, "node_id")?;
    let company_id = state.company_for(&user).await?;
    OwnershipChain::for_company(company_id)
        .node(node_id)
        .verify(&state.upstream)
        .await?;

    let deleted = upstream::delete(&state.upstream, Resource::Nodes, node_id).await?;
    log::info!("Deleted node {} of company {}", node_id, company_id);
    Ok(Envelope::ok(deleted))
}
