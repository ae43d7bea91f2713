pub mod error;
pub mod schema;
pub mod tracked;
pub mod tracked_store;
