//! The versioned configuration store.
//!
//! # Concurrency model
//!
//! ```text
//!  readers ──load()──▶ ArcSwap<Snapshot>  (lock-free, old-or-new, never mixed)
//!                            ▲
//!  writers ─▶ write_lock ─▶ check version ─▶ derive Snapshot ─▶ persist ─▶ store()
//!                                                                           │
//!                               lock released ◀───────────────────────────┘
//!                                     │
//!                                     ▼
//!                              notify listeners
//! ```
//!
//! Every mutation is a check-and-swap over the whole snapshot scoped to one
//! section or collection item. A failed check or a failed durable write
//! leaves the published snapshot untouched.

mod collection;
mod config_store;


pub use config_store::*;
