//! Kotoba interaction: reqwest-backed clients for the tutor reply service
//! and the remote persistence store.

pub mod classify;
pub mod remote_store;
pub mod tutor_client;

pub use remote_store::RemoteStoreClient;
pub use tutor_client::TutorApiClient;
