use axum::{
    body::Bytes,
    extract::State,
};
use serde_json::Value;

use crate::api::handlers::SharedState;
use crate::api::params::{PathParams, QueryMap};
use crate::api::user_extractor::SessionUser;
use crate::error::{ApiResult, Envelope};
use crate::logic::edge_requests::{parse_edge_update, parse_new_edge};
use crate::logic::fields::{optional_query_id, parse_body, path_id, query_id};
use crate::logic::OwnershipChain;
use crate::model::current_timestamp;
use crate::store::UserDirectory;
use crate::upstream::{self, Resource};

/// GET /api/edges[?source_node_id]
///
/// Without a source node every edge of the company is listed, one upstream
/// listing per node.
pub async fn list_edges<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    QueryMap(query): QueryMap,
) -> ApiResult {
    let source_node_id = optional_query_id(&query, "source_node_id")?;
    let company_id = state.company_for(&user).await?;

    let Some(source_node_id) = source_node_id else {
        let edges = state.company_edges(company_id).await?;
        return Ok(Envelope::ok(Value::Array(edges)));
    };

    OwnershipChain::for_company(company_id)
        .node(source_node_id)
        .verify(&state.upstream)
        .await?;
    let edges = upstream::list(
        &state.upstream,
        Resource::Edges,
        &[("source_node_id", source_node_id.to_string())],
    )
    .await?;
    Ok(Envelope::ok(edges))
}

/// POST /api/edges[?source_node_id]
pub async fn create_edge<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    QueryMap(query): QueryMap,
    body: Bytes,
) -> ApiResult {
    let query_source = optional_query_id(&query, "source_node_id")?;
    let edge = parse_new_edge(&parse_body(&body)?, query_source, &current_timestamp())?;
    let company_id = state.company_for(&user).await?;

    let mut chain = OwnershipChain::for_company(company_id).node(edge.source_node_id);
    if let Some(destination_node_id) = edge.destination_node_id {
        chain = chain.node(destination_node_id);
    }
    chain.verify(&state.upstream).await?;

    let created = upstream::create(&state.upstream, Resource::Edges, &edge).await?;
    Ok(Envelope::created(created))
}

/// PUT /api/edges/:id?source_node_id
pub async fn update_edge<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    PathParams(id): PathParams<String>,
    QueryMap(query): QueryMap,
    body: Bytes,
) -> ApiResult {
    let edge_id = path_id(&id, "edge_id")?;
    let source_node_id = query_id(&query, "source_node_id")?;
    let update = parse_edge_update(
        &parse_body(&body)?,
        source_node_id,
        edge_id,
        &current_timestamp(),
    )?;
    let company_id = state.company_for(&user).await?;

    let mut chain = OwnershipChain::for_company(company_id)
        .node(source_node_id)
        .edge(edge_id);
    if let Some(destination_node_id) = update.new_destination() {
        chain = chain.node(destination_node_id);
    }
    chain.verify(&state.upstream).await?;

    let updated = upstream::update(&state.upstream, Resource::Edges, edge_id, &update).await?;
    Ok(Envelope::ok(updated))
}

/// DELETE /api/edges/:id?source_node_id
pub async fn delete_edge<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    PathParams(id): PathParams<String>,
    QueryMap(query): QueryMap,
) -> ApiResult {
    let edge_id = path_id(&id, "edge_id")?;
    let source_node_id = query_id(&query, "source_node_id")?;
    let company_id = state.company_for(&user).await?;
    OwnershipChain::for_company(company_id)
        .node(source_node_id)
        .edge(edge_id)
        .verify(&state.upstream)
        .await?;

    let deleted = upstream::delete(&state.upstream, Resource::Edges, edge_id).await?;
    Ok(Envelope::ok(deleted))
}
