use axum::{
    body::Bytes,
    extract::State,
};

use crate::api::handlers::SharedState;
use crate::api::params::{PathParams, QueryMap};
use crate::api::user_extractor::SessionUser;
use crate::error::{ApiResult, Envelope};
use crate::logic::condition_requests::{
    parse_condition_scope, parse_condition_update, parse_new_condition, ConditionScope,
};
use crate::logic::fields::{parse_body, path_id};
use crate::logic::OwnershipChain;
use crate::model::{current_timestamp, Id};
use crate::store::UserDirectory;
use crate::upstream::{self, Resource};

fn edge_chain(company_id: Id, scope: ConditionScope) -> OwnershipChain {
    OwnershipChain::for_company(company_id)
        .node(scope.source_node_id)
        .edge(scope.edge_id)
}

/// GET /api/conditions?edge_id&source_node_id
pub async fn list_conditions<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    QueryMap(query): QueryMap,
) -> ApiResult {
    let scope = parse_condition_scope(&query)?;
    let company_id = state.company_for(&user).await?;
    edge_chain(company_id, scope).verify(&state.upstream).await?;

    let conditions = upstream::list(
        &state.upstream,
        Resource::Conditions,
        &[("edge_id", scope.edge_id.to_string())],
    )
    .await?;
    Ok(Envelope::ok(conditions))
}

/// POST /api/conditions?edge_id&source_node_id
pub async fn create_condition<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    QueryMap(query): QueryMap,
    body: Bytes,
) -> ApiResult {
    let scope = parse_condition_scope(&query)?;
    let condition = parse_new_condition(&parse_body(&body)?, scope, &current_timestamp())?;
    let company_id = state.company_for(&user).await?;
    edge_chain(company_id, scope).verify(&state.upstream).await?;

    let created = upstream::create(&state.upstream, Resource::Conditions, &condition).await?;
    Ok(Envelope::created(created))
}

/// GET /api/conditions/:id?edge_id&source_node_id
pub async fn get_condition<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    PathParams(id): PathParams<String>,
    QueryMap(query): QueryMap,
) -> ApiResult {
    let condition_id = path_id(&id, "condition_id")?;
    let scope = parse_condition_scope(&query)?;
    let company_id = state.company_for(&user).await?;
    edge_chain(company_id, scope)
        .condition(condition_id)
        .verify(&state.upstream)
        .await?;

    let condition = upstream::fetch(&state.upstream, Resource::Conditions, condition_id).await?;
    Ok(Envelope::ok(condition))
}

/// PUT /api/conditions/:id?edge_id&source_node_id
pub async fn update_condition<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    PathParams(id): PathParams<String>,
    QueryMap(query): QueryMap,
    body: Bytes,
) -> ApiResult {
    let condition_id = path_id(&id, "condition_id")?;
    let scope = parse_condition_scope(&query)?;
    let update = parse_condition_update(
        &parse_body(&body)?,
        condition_id,
        scope,
        &current_timestamp(),
    )?;
    let company_id = state.company_for(&user).await?;
    edge_chain(company_id, scope)
        .condition(condition_id)
        .verify(&state.upstream)
        .await?;

    let updated =
        upstream::update(&state.upstream, Resource::Conditions, condition_id, &update).await?;
    Ok(Envelope::ok(updated))
}

/// DELETE /api/conditions/:id?edge_id&source_node_id
pub async fn delete_condition<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    PathParams(id): PathParams<String>,
    QueryMap(query): QueryMap,
) -> ApiResult {
    let condition_id = path_id(&id, "condition_id")?;
    let scope = parse_condition_scope(&query)?;
    let company_id = state.company_for(&user).await?;
    edge_chain(company_id, scope)
        .condition(condition_id)
        .verify(&state.upstream)
        .await?;

    let deleted = upstream::delete(&state.upstream, Resource::Conditions, condition_id).await?;
    Ok(Envelope::ok(deleted))
}
