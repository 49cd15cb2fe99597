use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use thiserror::Error;

/// Loosely coupled last-resort delivery of a quote.
///
/// Published when no composer could take the text; any part of the host may listen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackSignal {
    pub name: String,
    pub payload: String,
    pub bubbles: bool,
    pub cancelable: bool,
}

impl FallbackSignal {
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
            bubbles: true,
            cancelable: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("fallback channel rejected {name}: {reason}")]
    Rejected { name: String, reason: String },
}

pub trait Notifier: Send + Sync {
    fn publish(&self, signal: FallbackSignal) -> Result<(), NotifyError>;
}

/// Blocking, user-visible notices (the host's alert dialog).
pub trait UserAlerts: Send + Sync {
    fn alert(&self, message: &str);
}

/// Fans fallback signals out to every live subscriber.
#[derive(Debug, Default)]
pub struct SignalBus {
    subscribers: Mutex<Vec<Sender<FallbackSignal>>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<FallbackSignal> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl Notifier for SignalBus {
    fn publish(&self, signal: FallbackSignal) -> Result<(), NotifyError> {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| tx.send(signal.clone()).is_ok());
        tracing::debug!(
            name = %signal.name,
            delivered = subscribers.len(),
            "published fallback signal"
        );
        Ok(())
    }
}
