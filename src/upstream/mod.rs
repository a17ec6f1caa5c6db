pub mod client;
pub mod locator;
pub mod proxy;

pub use client::*;
pub use locator::*;
pub use proxy::*;
