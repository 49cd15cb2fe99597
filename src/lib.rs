pub mod app;
pub mod author;
pub mod config;
pub mod format;
pub mod locator;
pub mod logging;
pub mod notify;
pub mod plugin;
pub mod state;
pub mod surface;
pub mod writer;

#[cfg(test)]
mod testing;

pub use app::{QuoteOutcome, QuoteService, SkipReason};
pub use config::{ConfigLoader, QuoteConfig};
pub use state::{Message, MessageRef, StateAccessor};
