//! Durable session store for the leasing console.
//!
//! Holds the access/refresh token pair, the cached identity and the active
//! scope under the storage keys existing browser sessions already use, so a
//! session written by one client can be picked up by another.

#![forbid(unsafe_code)]

pub mod secret;
pub mod storage;
pub mod store;

pub use secret::TokenSecret;
pub use storage::{DurableStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{SessionStore, Tokens, keys};
