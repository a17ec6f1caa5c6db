pub mod condition_handlers;
pub mod edge_handlers;
pub mod handlers;
pub mod link_handlers;
pub mod node_handlers;
pub mod params;
pub mod property_handlers;
pub mod routes;
pub mod user_extractor;

pub use handlers::{AppState, SharedState};
pub use params::{PathParams, QueryMap};
pub use routes::*;
pub use user_extractor::SessionUser;
