/// Alert header construction.
pub mod alerts;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Pagination header construction.
pub mod pagination;
/// Game rating persistence delegation.
pub mod rating_service;
/// Storage connection supervision with degraded mode.
pub mod storage_supervisor;
