//! Durable storage of configuration snapshots.
//!
//! The store only depends on [`ConfigPersistence`]; [`JsonConfigFile`] is the
//! bundled implementation writing one JSON document per snapshot.

mod json_file;


pub use json_file::*;

#[cfg(test)]
use mockall::automock;

use crate::model::InstrumentationConfig;
use crate::model::Snapshot;
use crate::model::Versioned;
use crate::Result;

#[cfg_attr(test, automock)]
pub trait ConfigPersistence: Send + Sync + 'static {
    /// Loads the persisted snapshot
    fn load(&self) -> Result<Snapshot>;

    /// Durably writes `snapshot`. If this succeeds, a later `load` returns
    /// an equal snapshot even after a crash.
    fn write(
        &self,
        snapshot: &Snapshot,
    ) -> Result<()>;

    /// Removes persisted state so the next `load` yields defaults
    fn delete(&self) -> Result<()>;

    /// Manufactured snapshot used when nothing (usable) is persisted
    fn default_snapshot(&self) -> Snapshot;

    /// Transaction type to use when the general section leaves it empty
    fn infer_default_transaction_type(
        &self,
        instrumentation: &[Versioned<InstrumentationConfig>],
    ) -> String;
}
