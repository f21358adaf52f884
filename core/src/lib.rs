pub mod core;
pub mod types;

pub use crate::core::Store;
pub use crate::core::credential::error::CredentialError;
pub use crate::core::error::{CorruptState, StoreError, ValidationError};
pub use crate::core::persistence::db::RedbPersistence;
pub use crate::core::persistence::error::PersistenceError;
pub use crate::core::persistence::{MemoryPersistence, Persistence, Slot};
