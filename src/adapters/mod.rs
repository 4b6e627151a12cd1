// Adapters layer: concrete implementations of the domain ports.

pub mod sql_api;
pub mod storage;

pub use sql_api::SqlApiSession;
pub use storage::LocalStorage;
