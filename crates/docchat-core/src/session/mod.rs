//! Chat session domain: summaries, message logs, selection and the engine
//! that keeps them in sync with the remote store.

pub mod cache;
pub mod directory;
pub mod engine;
pub mod event;
pub mod message;
pub mod model;
pub mod repository;
pub mod selection;

pub use cache::DetailCache;
pub use directory::SessionDirectory;
pub use engine::SessionEngine;
pub use event::SessionEvent;
pub use message::{Message, MessageOrigin};
pub use model::{AUTO_TITLE_MAX_CHARS, DEFAULT_SESSION_NAME, Session, SessionDetail, derive_title};
pub use repository::SessionStore;
pub use selection::{PendingDeletion, Selection};
