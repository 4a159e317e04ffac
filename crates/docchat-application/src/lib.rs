//! Application layer for docchat.
//!
//! Use cases that sit between the domain engine and a user interface: the
//! authentication flow, route access, documents and their search, admin
//! approval and the chat view model.

pub mod auth_usecase;
pub mod chat_view_model;
pub mod document_usecase;
pub mod retrieval_usecase;
pub mod route_guard;
pub mod user_approval_usecase;

pub use auth_usecase::AuthUseCase;
pub use chat_view_model::ChatViewModel;
pub use document_usecase::{DocumentUseCase, IndexOutcome, UploadReceipt};
pub use retrieval_usecase::RetrievalUseCase;
pub use route_guard::{Access, Route, RouteGuard};
pub use user_approval_usecase::UserApprovalUseCase;
