use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use strum::{AsRefStr, Display};

use crate::author::resolve_author;
use crate::config::QuoteConfig;
use crate::format::format_quote;
use crate::locator::locate_composer;
use crate::notify::{Notifier, UserAlerts};
use crate::state::{Message, MessageRef, StateAccessor};
use crate::surface::SurfaceProvider;
use crate::writer::{ComposerWriter, WriteOutcome};

/// Why a message was not quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    NotFound,
    System,
    EmptyBody,
    Deleted,
}

#[derive(Debug)]
pub enum QuoteOutcome {
    Written(WriteOutcome),
    Skipped(SkipReason),
    /// Something unexpected went wrong; the user was shown the generic notice.
    Failed,
}

impl QuoteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, QuoteOutcome::Written(_))
    }
}

/// Checks whether `message` may be offered the quote action at all.
pub fn eligibility(message: &Message) -> Result<(), SkipReason> {
    if message.is_system() {
        return Err(SkipReason::System);
    }
    if !message.has_body() {
        return Err(SkipReason::EmptyBody);
    }
    if message.is_deleted() {
        return Err(SkipReason::Deleted);
    }
    Ok(())
}

/// Entry points the host wires into its message menu.
///
/// Neither `can_quote` nor `quote` unwinds into the host, even when a collaborator panics.
pub struct QuoteService {
    config: Arc<QuoteConfig>,
    state: Arc<dyn StateAccessor>,
    surfaces: Arc<dyn SurfaceProvider>,
    notifier: Arc<dyn Notifier>,
    alerts: Arc<dyn UserAlerts>,
}

impl QuoteService {
    pub fn new(
        config: Arc<QuoteConfig>,
        state: Arc<dyn StateAccessor>,
        surfaces: Arc<dyn SurfaceProvider>,
        notifier: Arc<dyn Notifier>,
        alerts: Arc<dyn UserAlerts>,
    ) -> Self {
        Self {
            config,
            state,
            surfaces,
            notifier,
            alerts,
        }
    }

    pub fn can_quote(&self, target: MessageRef<'_>) -> bool {
        let checked = panic::catch_unwind(AssertUnwindSafe(|| match target {
            MessageRef::Message(message) => eligibility(message).is_ok(),
            MessageRef::Id(id) => self
                .state
                .message(id)
                .is_some_and(|message| eligibility(&message).is_ok()),
        }));
        checked.unwrap_or_else(|payload| {
            tracing::error!(
                message_id = target.id(),
                panic = panic_message(payload.as_ref()),
                "eligibility check failed"
            );
            false
        })
    }

    pub fn quote(&self, target: MessageRef<'_>) -> QuoteOutcome {
        match panic::catch_unwind(AssertUnwindSafe(|| self.run(target))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                tracing::error!(
                    message_id = target.id(),
                    panic = panic_message(payload.as_ref()),
                    "quote action failed"
                );
                let alerted = panic::catch_unwind(AssertUnwindSafe(|| {
                    self.alerts.alert(&self.config.alerts.failure)
                }));
                if let Err(payload) = alerted {
                    tracing::error!(
                        panic = panic_message(payload.as_ref()),
                        "failure notice could not be shown"
                    );
                }
                QuoteOutcome::Failed
            }
        }
    }

    fn run(&self, target: MessageRef<'_>) -> QuoteOutcome {
        let id = target.id();
        let message = match (self.state.message(id), target) {
            (Some(message), _) => message,
            (None, MessageRef::Message(message)) => message.clone(),
            (None, MessageRef::Id(_)) => {
                tracing::warn!(message_id = id, "message not found");
                return QuoteOutcome::Skipped(SkipReason::NotFound);
            }
        };
        if let Err(reason) = eligibility(&message) {
            tracing::warn!(message_id = id, %reason, "message cannot be quoted");
            return QuoteOutcome::Skipped(reason);
        }

        let author = resolve_author(self.state.as_ref(), &message.user_id);
        let quote = format_quote(&message.body, author.as_ref());
        let composer = locate_composer(&message, self.surfaces.as_ref(), &self.config.surfaces);
        let writer = ComposerWriter::new(&self.config, self.notifier.as_ref(), self.alerts.as_ref());
        let outcome = writer.write(composer.as_ref(), &quote);
        tracing::info!(message_id = id, attributed = author.is_some(), ?outcome, "quoted message");
        QuoteOutcome::Written(outcome)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
