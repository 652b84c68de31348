//! Configuration data model: sections, collection items, version tokens and
//! the immutable [`Snapshot`] aggregating them.

mod alert;
mod gauge;
mod instrumentation;
mod plugin;
mod sections;
mod snapshot;
mod version;

pub use alert::*;
pub use gauge::*;
pub use instrumentation::*;
pub use plugin::*;
pub use sections::*;
pub use snapshot::*;
pub use version::*;
