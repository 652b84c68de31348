//! A concurrent, versioned configuration store for long-running monitoring
//! agents.
//!
//! Readers get lock-free access to an immutable [`Snapshot`](model::Snapshot).
//! Writers submit a new value together with the version they last read; the
//! write succeeds only if that version is still current, is persisted
//! durably, and then triggers change notification.
//!
//! ```ignore
//! let store = ConfigStore::open(&StoreSettings::new()?.validate()?, descriptors)?;
//! let general = store.get_general_config();
//! let v1 = store.update_general_config(
//!     GeneralConfig { enabled: false, ..general.value.clone() },
//!     general.version(),
//! )?;
//! ```

mod config;
mod constants;
mod errors;
mod listener;
mod metrics;
pub mod model;
mod secret;
mod storage;
mod store;
pub mod utils;

pub use config::*;
pub use errors::*;
pub use listener::*;
pub use metrics::register_custom_metrics;
pub use metrics::CONFIG_CONFLICTS_TOTAL;
pub use metrics::CONFIG_MUTATIONS_TOTAL;
pub use metrics::CONFIG_PERSIST_DURATION_MS;
pub use metrics::REGISTRY;
pub use secret::*;
pub use storage::*;
pub use store::*;
pub use utils::*;


//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub(crate) mod test_utils;
