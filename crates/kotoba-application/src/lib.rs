//! Application layer: use cases over the core domain and boundary traits.

pub mod chat_usecase;
pub mod local_state;
pub mod mirror;

pub use chat_usecase::ChatUseCase;
pub use local_state::LocalState;
pub use mirror::RemoteMirror;
