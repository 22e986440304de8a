//! The item-access facade
//!
//! [`Ddb`] exposes one method per operation. Requests are caller-shaped
//! ([`GetItemRequest`], [`QueryRequest`], ...); responses carry the encoded
//! input, the raw store output and the decoded result.

mod input;
mod operations;
mod pagination;
mod types;

pub mod transact;

pub use operations::Ddb;
pub use pagination::Paginated;
pub use types::*;
