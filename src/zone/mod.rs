pub mod catalog;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod rebalance;
pub mod timeline;

pub use catalog::{Catalog, Map, Phase};
pub use error::{Result, ZoneError};
pub use rebalance::{Rebalance, ReferencePoint};
pub use timeline::{Breakpoint, Timeline};
