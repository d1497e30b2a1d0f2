//! Query state and request compilation.
//!
//! The query side of the controller is a pure pipeline:
//!
//! - [`QuerySnapshot`] - immutable filter, sort and pagination state
//! - [`Intent`] - a single user action, applied with [`QueryStore::apply`]
//! - [`SortPolicy`] - how a click on a column header changes the [`SortSpec`]
//! - [`QueryRequest`] - the canonical request compiled by [`build`]
//! - [`evaluate`] - the same query applied to records held in memory

mod filter;
mod local;
mod order;
mod page;
mod request;
mod snapshot;

pub use filter::FilterEntry;
pub use filter::MatchMode;
pub use local::evaluate;
pub use order::Direction;
pub use order::SortEntry;
pub use order::SortPolicy;
pub use order::SortSpec;
pub use order::resolve;
pub use page::Pagination;
pub use request::QueryRequest;
pub use request::build;
pub use snapshot::ColumnFilter;
pub use snapshot::GlobalFilterPolicy;
pub use snapshot::Intent;
pub use snapshot::QuerySnapshot;
pub use snapshot::QueryStore;
