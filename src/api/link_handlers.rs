use axum::{
    body::Bytes,
    extract::State,
};

use crate::api::handlers::SharedState;
use crate::api::params::{PathParams, QueryMap};
use crate::api::user_extractor::SessionUser;
use crate::error::{ApiResult, Envelope};
use crate::logic::fields::{parse_body, path_id, query_id};
use crate::logic::link_requests::{
    parse_condition_property_scope, parse_condition_property_update, parse_new_condition_property,
    parse_new_node_property, ConditionPropertyScope,
};
use crate::logic::OwnershipChain;
use crate::model::Id;
use crate::store::UserDirectory;
use crate::upstream::{self, Resource};

// Node ↔ Property links

/// GET /api/node-properties?node_id
pub async fn list_node_properties<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    QueryMap(query): QueryMap,
) -> ApiResult {
    let node_id = query_id(&query, "node_id")?;
    let company_id = state.company_for(&user).await?;
    OwnershipChain::for_company(company_id)
        .node(node_id)
        .verify(&state.upstream)
        .await?;

    let links = upstream::list(
        &state.upstream,
        Resource::NodeProperties,
        &[("node_id", node_id.to_string())],
    )
    .await?;
    Ok(Envelope::ok(links))
}

/// POST /api/node-properties?node_id
pub async fn create_node_property<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    QueryMap(query): QueryMap,
    body: Bytes,
) -> ApiResult {
    let node_id = query_id(&query, "node_id")?;
    let link = parse_new_node_property(&parse_body(&body)?, node_id)?;
    let company_id = state.company_for(&user).await?;
    OwnershipChain::for_company(company_id)
        .node(link.node_id)
        .property(link.property_id)
        .verify(&state.upstream)
        .await?;

    let created = upstream::create(&state.upstream, Resource::NodeProperties, &link).await?;
    Ok(Envelope::created(created))
}

/// DELETE /api/node-properties/:node_id/:property_id
///
/// Both ends are checked against the caller's company; the upstream service
/// is not relied on to re-validate tenant ownership.
pub async fn delete_node_property<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    PathParams((node, property)): PathParams<(String, String)>,
) -> ApiResult {
    let node_id = path_id(&node, "node_id")?;
    let property_id = path_id(&property, "property_id")?;
    let company_id = state.company_for(&user).await?;
    OwnershipChain::for_company(company_id)
        .node(node_id)
        .property(property_id)
        .verify(&state.upstream)
        .await?;

    let deleted =
        upstream::delete_link(&state.upstream, Resource::NodeProperties, node_id, property_id)
            .await?;
    Ok(Envelope::ok(deleted))
}

// Condition ↔ Property links

fn condition_chain(company_id: Id, scope: ConditionPropertyScope) -> OwnershipChain {
    OwnershipChain::for_company(company_id)
        .node(scope.condition.source_node_id)
        .edge(scope.condition.edge_id)
        .condition(scope.condition_id)
}

/// GET /api/condition-properties?condition_id&edge_id&source_node_id
pub async fn list_condition_properties<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    QueryMap(query): QueryMap,
) -> ApiResult {
    let scope = parse_condition_property_scope(&query)?;
    let company_id = state.company_for(&user).await?;
    condition_chain(company_id, scope)
        .verify(&state.upstream)
        .await?;

    let links = upstream::list(
        &state.upstream,
        Resource::ConditionProperties,
        &[("condition_id", scope.condition_id.to_string())],
    )
    .await?;
    Ok(Envelope::ok(links))
}

/// POST /api/condition-properties?condition_id&edge_id&source_node_id
pub async fn create_condition_property<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    QueryMap(query): QueryMap,
    body: Bytes,
) -> ApiResult {
    let scope = parse_condition_property_scope(&query)?;
    let link = parse_new_condition_property(&parse_body(&body)?, scope.condition_id)?;
    let company_id = state.company_for(&user).await?;
    condition_chain(company_id, scope)
        .property(link.property_id)
        .verify(&state.upstream)
        .await?;

    let created = upstream::create(&state.upstream, Resource::ConditionProperties, &link).await?;
    Ok(Envelope::created(created))
}

/// GET /api/condition-properties/:id?condition_id&edge_id&source_node_id
pub async fn get_condition_property<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    PathParams(id): PathParams<String>,
    QueryMap(query): QueryMap,
) -> ApiResult {
    let link_id = path_id(&id, "condition_property_id")?;
    let scope = parse_condition_property_scope(&query)?;
    let company_id = state.company_for(&user).await?;
    condition_chain(company_id, scope)
        .condition_property(link_id)
        .verify(&state.upstream)
        .await?;

    let link = upstream::fetch(&state.upstream, Resource::ConditionProperties, link_id).await?;
    Ok(Envelope::ok(link))
}

/// PUT /api/condition-properties/:id?condition_id&edge_id&source_node_id
pub async fn update_condition_property<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    PathParams(id): PathParams<String>,
    QueryMap(query): QueryMap,
    body: Bytes,
) -> ApiResult {
    let link_id = path_id(&id, "condition_property_id")?;
    let scope = parse_condition_property_scope(&query)?;
    let update = parse_condition_property_update(&parse_body(&body)?, scope.condition_id)?;
    let company_id = state.company_for(&user).await?;
    condition_chain(company_id, scope)
        .condition_property(link_id)
        .property(update.property_id)
        .verify(&state.upstream)
        .await?;

    let updated =
        upstream::update(&state.upstream, Resource::ConditionProperties, link_id, &update).await?;
    Ok(Envelope::ok(updated))
}

/// DELETE /api/condition-properties/:id?condition_id&edge_id&source_node_id
pub async fn delete_condition_property<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    PathParams(id): PathParams<String>,
    QueryMap(query): QueryMap,
) -> ApiResult {
    let link_id = path_id(&id, "condition_property_id")?;
    let scope = parse_condition_property_scope(&query)?;
    let company_id = state.company_for(&user).await?;
    condition_chain(company_id, scope)
        .condition_property(link_id)
        .verify(&state.upstream)
        .await?;

    let deleted =
        upstream::delete(&state.upstream, Resource::ConditionProperties, link_id).await?;
    Ok(Envelope::ok(deleted))
}
