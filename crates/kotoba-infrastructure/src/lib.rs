//! Kotoba infrastructure: local durable cache, credential storage, and
//! path management.

pub mod cache_repository;
pub mod credential_store;
pub mod paths;
pub mod storage;

pub use cache_repository::FileCacheRepository;
pub use credential_store::FileCredentialStore;
pub use paths::KotobaPaths;
