//! User accounts and admin approval.

pub mod model;
pub mod service;

pub use model::UserProfile;
pub use service::UserDirectory;
