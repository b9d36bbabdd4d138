/// Persisted rating model.
pub mod models;
/// Rating store abstraction, paging types and backends.
pub mod rating_store;
/// Backend-neutral storage errors.
pub mod storage;
