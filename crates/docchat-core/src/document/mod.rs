//! Document uploads.

pub mod model;
pub mod policy;
pub mod repository;

pub use model::Document;
pub use policy::{MAX_DOCUMENTS_PER_USER, MAX_UPLOAD_BYTES, UploadPolicy};
pub use repository::DocumentStore;
