use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::api::handlers::SharedState;
use crate::api::{
    condition_handlers, edge_handlers, handlers, link_handlers, node_handlers, property_handlers,
};
use crate::store::traits::UserDirectory;

pub fn create_router<D: UserDirectory + 'static>() -> Router<SharedState<D>> {
    Router::new()
        // Health check
        .route("/api/health", get(handlers::health_check::<D>))
        // Caller context
        .route("/api/company", get(handlers::get_company::<D>))
        .route("/api/dashboard", get(handlers::get_dashboard::<D>))
        // Nodes
        .route("/api/nodes", get(node_handlers::list_nodes::<D>))
        .route("/api/nodes", post(node_handlers::create_node::<D>))
        .route("/api/nodes/:node_id", get(node_handlers::get_node::<D>))
        .route("/api/nodes/:node_id", put(node_handlers::update_node::<D>))
        .route("/api/nodes/:node_id", delete(node_handlers::delete_node::<D>))
        // Edges (scoped by source node)
        .route("/api/edges", get(edge_handlers::list_edges::<D>))
        .route("/api/edges", post(edge_handlers::create_edge::<D>))
        .route("/api/edges/:edge_id", put(edge_handlers::update_edge::<D>))
        .route("/api/edges/:edge_id", delete(edge_handlers::delete_edge::<D>))
        // Conditions (scoped by edge and its source node)
        .route("/api/conditions", get(condition_handlers::list_conditions::<D>))
        .route("/api/conditions", post(condition_handlers::create_condition::<D>))
        .route(
            "/api/conditions/:condition_id",
            get(condition_handlers::get_condition::<D>),
        )
        .route(
            "/api/conditions/:condition_id",
            put(condition_handlers::update_condition::<D>),
        )
        .route(
            "/api/conditions/:condition_id",
            delete(condition_handlers::delete_condition::<D>),
        )
        // Properties
        .route("/api/properties", get(property_handlers::list_properties::<D>))
        .route("/api/properties", post(property_handlers::create_property::<D>))
        .route(
            "/api/properties/:property_id",
            put(property_handlers::update_property::<D>),
        )
        .route(
            "/api/properties/:property_id",
            delete(property_handlers::delete_property::<D>),
        )
        // Node ↔ Property links
        .route(
            "/api/node-properties",
            get(link_handlers::list_node_properties::<D>),
        )
        .route(
            "/api/node-properties",
            post(link_handlers::create_node_property::<D>),
        )
        .route(
            "/api/node-properties/:node_id/:property_id",
            delete(link_handlers::delete_node_property::<D>),
        )
        // Condition ↔ Property links
        .route(
            "/api/condition-properties",
            get(link_handlers::list_condition_properties::<D>),
        )
        .route(
            "/api/condition-properties",
            post(link_handlers::create_condition_property::<D>),
        )
        .route(
            "/api/condition-properties/:condition_property_id",
            get(link_handlers::get_condition_property::<D>),
        )
        .route(
            "/api/condition-properties/:condition_property_id",
            put(link_handlers::update_condition_property::<D>),
        )
        .route(
            "/api/condition-properties/:condition_property_id",
            delete(link_handlers::delete_condition_property::<D>),
        )
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
}
