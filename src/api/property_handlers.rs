use axum::{
    body::Bytes,
    extract::State,
};

use crate::api::handlers::SharedState;
use crate::api::params::{PathParams, QueryMap};
use crate::api::user_extractor::SessionUser;
use crate::error::{ApiResult, Envelope};
use crate::logic::fields::{ensure_company, optional_query_id, parse_body, path_id};
use crate::logic::property_requests::{parse_new_property, parse_property_update};
use crate::logic::OwnershipChain;
use crate::model::current_timestamp;
use crate::store::UserDirectory;
use crate::upstream::{self, Resource};

/// GET /api/properties[?company_id]
pub async fn list_properties<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    QueryMap(query): QueryMap,
) -> ApiResult {
    let requested = optional_query_id(&query, "company_id")?;
    let company_id = state.company_for(&user).await?;
    ensure_company(requested, company_id)?;

    let properties = upstream::list(
        &state.upstream,
        Resource::Properties,
        &[("company_id", company_id.to_string())],
    )
    .await?;
    Ok(Envelope::ok(properties))
}

/// POST /api/properties
pub async fn create_property<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    body: Bytes,
) -> ApiResult {
    let draft = parse_new_property(&parse_body(&body)?, &current_timestamp())?;
    let company_id = state.company_for(&user).await?;
    let payload = draft.into_payload(company_id)?;

    let created = upstream::create(&state.upstream, Resource::Properties, &payload).await?;
    Ok(Envelope::created(created))
}

/// PUT /api/properties/:id
pub async fn update_property<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    PathParams(id): PathParams<String>,
    body: Bytes,
) -> ApiResult {
    let property_id = path_id(&id, "property_id")?;
    let update = parse_property_update(&parse_body(&body)?, &current_timestamp())?;
    let company_id = state.company_for(&user).await?;
    OwnershipChain::for_company(company_id)
        .property(property_id)
        .verify(&state.upstream)
        .await?;

    let updated =
        upstream::update(&state.upstream, Resource::Properties, property_id, &update).await?;
    Ok(Envelope::ok(updated))
}

/// DELETE /api/properties/:id
pub async fn delete_property<D: UserDirectory>(
    State(state): State<SharedState<D>>,
    user: SessionUser,
    PathParams(id): PathParams<String>,
) -> ApiResult {
    let property_id = path_id(&id, "property_id")?;
    let company_id = state.company_for(&user).await?;
    OwnershipChain::for_company(company_id)
        .property(property_id)
        .verify(&state.upstream)
        .await?;

    let deleted = upstream::delete(&state.upstream, Resource::Properties, property_id).await?;
    Ok(Envelope::ok(deleted))
}
