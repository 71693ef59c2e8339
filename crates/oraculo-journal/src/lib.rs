//! Local persistence for the user profile, reading history and altar.

pub mod journal;
pub mod model;
pub mod store;

pub use journal::{Journal, ALTAR_KEY, HISTORY_KEY, PROFILE_KEY};
pub use model::{AltarItem, Reading, UserProfile};
pub use store::{FileStore, KeyValueStore, MemoryStore};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored value under {key} is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Cannot serialize value for {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("No reading with id {0}")]
    ReadingNotFound(String),
}
