pub mod auth;
pub mod context;
pub mod documents;
pub mod sessions;
pub mod users;
pub mod utils;
