pub mod json_store;
#[cfg(feature = "network")]
pub mod remote;
pub mod schema;
