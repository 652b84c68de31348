//! Change notification for configuration observers.
//!
//! Listeners receive no payload. They re-read whatever they need through the
//! store's getters, which never hand out a value older than one already
//! observed, so out-of-order dispatch between concurrent writers is harmless.

mod registry;


pub use registry::*;

pub trait ConfigListener: Send + Sync + 'static {
    /// Called after a change has been persisted and published
    fn on_change(&self);
}

impl<F> ConfigListener for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn on_change(&self) {
        self()
    }
}
