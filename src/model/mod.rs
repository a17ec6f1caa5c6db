pub mod common;
pub mod company;
pub mod listing;
pub mod node;

pub use common::*;
pub use company::*;
pub use listing::*;
pub use node::*;
