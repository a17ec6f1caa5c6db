pub mod aggregate;
pub mod condition_requests;
pub mod edge_requests;
pub mod fan_out;
pub mod fields;
pub mod identity;
pub mod link_requests;
pub mod node_requests;
pub mod ownership;
pub mod property_requests;

pub use aggregate::*;
pub use fan_out::fan_out;
pub use identity::IdentityResolver;
pub use ownership::{verify_chain, OwnershipChain, OwnershipStep};
