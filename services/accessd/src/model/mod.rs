//! Access-service data model.
//!
//! # Purpose
//! Re-exports the identity and page access records shared by the API and
//! store layers.
mod identity;
mod page_access;

pub use identity::IdentityRecord;
pub use page_access::PageAccessEntry;
