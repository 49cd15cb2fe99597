use thiserror::Error;

use crate::config::QuoteConfig;
use crate::format::QuoteText;
use crate::locator::{SelectedComposer, SurfaceRole};
use crate::notify::{FallbackSignal, Notifier, NotifyError, UserAlerts};
use crate::surface::{ChangeKind, ChangeSignal, ComposerSurface, SurfaceError};

#[derive(Debug, Error)]
pub enum InsertError {
    #[error("quote would grow the message to {length} characters, over the {limit} limit")]
    TooLong { length: usize, limit: usize },
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

#[derive(Debug)]
pub enum FallbackReason {
    NoTarget,
    Insert(InsertError),
}

#[derive(Debug)]
pub enum WriteOutcome {
    Inserted { role: SurfaceRole },
    Broadcast { reason: FallbackReason },
    /// The fallback channel itself failed; nothing was delivered.
    Dropped {
        reason: FallbackReason,
        error: NotifyError,
    },
}

impl WriteOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, WriteOutcome::Inserted { .. })
    }
}

pub struct ComposerWriter<'a> {
    config: &'a QuoteConfig,
    notifier: &'a dyn Notifier,
    alerts: &'a dyn UserAlerts,
}

impl<'a> ComposerWriter<'a> {
    pub fn new(config: &'a QuoteConfig, notifier: &'a dyn Notifier, alerts: &'a dyn UserAlerts) -> Self {
        Self {
            config,
            notifier,
            alerts,
        }
    }

    /// Inserts into `target` when there is one, otherwise broadcasts exactly once.
    pub fn write(&self, target: Option<&SelectedComposer>, quote: &QuoteText) -> WriteOutcome {
        let reason = match target {
            Some(composer) => match self.insert(composer.surface.as_ref(), quote) {
                Ok(()) => return WriteOutcome::Inserted { role: composer.role },
                Err(err) => {
                    if let InsertError::Surface(surface_err) = &err {
                        tracing::error!(role = %composer.role, %surface_err, "inserting quote failed");
                    }
                    FallbackReason::Insert(err)
                }
            },
            None => FallbackReason::NoTarget,
        };
        match self.broadcast(quote) {
            Ok(()) => WriteOutcome::Broadcast { reason },
            Err(error) => WriteOutcome::Dropped { reason, error },
        }
    }

    /// Appends `quote` to whatever the surface already holds.
    ///
    /// Over the length limit nothing is touched and the user is warned.
    pub fn insert(&self, surface: &dyn ComposerSurface, quote: &QuoteText) -> Result<(), InsertError> {
        let current = surface.value();
        let next = if current.is_empty() {
            quote.as_str().to_string()
        } else {
            format!("{current}\n{quote}")
        };

        let length = next.encode_utf16().count();
        let limit = self.config.max_message_length;
        if length > limit {
            tracing::warn!(length, limit, "quote would exceed maximum message length");
            self.alerts.alert(&self.config.alerts.too_long_message(limit));
            return Err(InsertError::TooLong { length, limit });
        }

        surface.focus()?;
        surface.set_value(&next)?;
        surface.dispatch(ChangeSignal::new(ChangeKind::Input))?;
        surface.dispatch(ChangeSignal::new(ChangeKind::Change))?;
        move_to_end(surface, length);
        Ok(())
    }

    pub fn broadcast(&self, quote: &QuoteText) -> Result<(), NotifyError> {
        let signal = FallbackSignal::new(self.config.fallback_event.as_str(), quote.as_str());
        self.notifier.publish(signal).map_err(|err| {
            tracing::error!(%err, "fallback insert signal failed");
            err
        })
    }
}

/// Best effort: older surfaces may not support selection or scrolling.
fn move_to_end(surface: &dyn ComposerSurface, length: usize) {
    if let Err(err) = surface.set_cursor(length) {
        tracing::trace!(%err, "ignoring cursor placement failure");
    }
    if let Err(err) = surface.scroll_to_bottom() {
        tracing::trace!(%err, "ignoring scroll failure");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;

    use super::*;
    use crate::author::AuthorName;
    use crate::format::format_quote;
    use crate::notify::SignalBus;
    use crate::surface::{MemorySurface, SurfaceOp};
    use crate::testing::RecordingAlerts;

    struct BrokenNotifier;

    impl Notifier for BrokenNotifier {
        fn publish(&self, signal: FallbackSignal) -> Result<(), NotifyError> {
            Err(NotifyError::Rejected {
                name: signal.name,
                reason: "no window".into(),
            })
        }
    }

    fn quote() -> QuoteText {
        format_quote("Hello\nWorld", AuthorName::parse("alice").as_ref())
    }

    fn composer(surface: &Arc<MemorySurface>) -> SelectedComposer {
        SelectedComposer {
            role: SurfaceRole::MainComposer,
            surface: surface.clone(),
        }
    }

    #[test]
    fn empty_surface_receives_exactly_the_quote() {
        let config = QuoteConfig::default();
        let (bus, alerts) = (SignalBus::new(), RecordingAlerts::default());
        let writer = ComposerWriter::new(&config, &bus, &alerts);
        let surface = Arc::new(MemorySurface::new(""));

        let outcome = writer.write(Some(&composer(&surface)), &quote());

        assert_matches!(outcome, WriteOutcome::Inserted { role: SurfaceRole::MainComposer });
        assert_eq!(surface.value(), "> Hello\n> World\n\n@alice ");
        assert!(surface.is_focused());
        assert_eq!(surface.signals(), vec![ChangeKind::Input, ChangeKind::Change]);
        assert_eq!(surface.cursor(), Some(surface.value().len()));
        assert!(surface.is_scrolled_to_bottom());
    }

    #[test]
    fn existing_draft_is_kept_and_joined_with_newline() {
        let config = QuoteConfig::default();
        let (bus, alerts) = (SignalBus::new(), RecordingAlerts::default());
        let writer = ComposerWriter::new(&config, &bus, &alerts);
        let surface = Arc::new(MemorySurface::new("my draft"));

        writer.insert(&*surface, &quote()).expect("insert");

        assert_eq!(surface.value(), format!("my draft\n{}", quote()));
    }

    #[test]
    fn content_exactly_at_limit_is_accepted() {
        let quote = quote();
        let config = QuoteConfig {
            max_message_length: "draft\n".len() + quote.as_str().len(),
            ..QuoteConfig::default()
        };
        let (bus, alerts) = (SignalBus::new(), RecordingAlerts::default());
        let writer = ComposerWriter::new(&config, &bus, &alerts);
        let surface = MemorySurface::new("draft");

        assert!(writer.insert(&surface, &quote).is_ok());
        assert!(alerts.messages().is_empty());
    }

    #[test]
    fn one_past_limit_warns_and_broadcasts_without_mutation() {
        let quote = quote();
        let limit = "draft\n".len() + quote.as_str().len() - 1;
        let config = QuoteConfig {
            max_message_length: limit,
            ..QuoteConfig::default()
        };
        let (bus, alerts) = (SignalBus::new(), RecordingAlerts::default());
        let rx = bus.subscribe();
        let writer = ComposerWriter::new(&config, &bus, &alerts);
        let surface = Arc::new(MemorySurface::new("draft"));

        let outcome = writer.write(Some(&composer(&surface)), &quote);

        assert_matches!(
            outcome,
            WriteOutcome::Broadcast {
                reason: FallbackReason::Insert(InsertError::TooLong { limit: l, .. })
            } if l == limit
        );
        assert_eq!(surface.value(), "draft");
        assert!(surface.signals().is_empty());
        assert_eq!(alerts.messages(), vec![config.alerts.too_long_message(limit)]);
        assert_eq!(rx.try_recv().expect("fallback").payload, quote.as_str());
    }

    #[test]
    fn limit_counts_utf16_units() {
        let quote = format_quote("😀", None);
        let config = QuoteConfig {
            max_message_length: quote.as_str().chars().count(),
            ..QuoteConfig::default()
        };
        let (bus, alerts) = (SignalBus::new(), RecordingAlerts::default());
        let writer = ComposerWriter::new(&config, &bus, &alerts);

        assert_matches!(
            writer.insert(&MemorySurface::new(""), &quote),
            Err(InsertError::TooLong { .. })
        );
    }

    #[test]
    fn missing_target_broadcasts_once_without_alert() {
        let config = QuoteConfig::default();
        let (bus, alerts) = (SignalBus::new(), RecordingAlerts::default());
        let rx = bus.subscribe();
        let writer = ComposerWriter::new(&config, &bus, &alerts);

        let outcome = writer.write(None, &quote());

        assert_matches!(outcome, WriteOutcome::Broadcast { reason: FallbackReason::NoTarget });
        let signal = rx.try_recv().expect("fallback");
        assert_eq!(signal.name, "insertText");
        assert_eq!(signal.payload, "> Hello\n> World\n\n@alice ");
        assert!(rx.try_recv().is_err());
        assert!(alerts.messages().is_empty());
    }

    #[test]
    fn surface_failure_falls_back_silently() {
        let config = QuoteConfig::default();
        let (bus, alerts) = (SignalBus::new(), RecordingAlerts::default());
        let rx = bus.subscribe();
        let writer = ComposerWriter::new(&config, &bus, &alerts);
        let surface = Arc::new(MemorySurface::new("draft").failing_on(SurfaceOp::SetValue));

        let outcome = writer.write(Some(&composer(&surface)), &quote());

        assert_matches!(
            outcome,
            WriteOutcome::Broadcast {
                reason: FallbackReason::Insert(InsertError::Surface(SurfaceError::Rejected {
                    op: SurfaceOp::SetValue,
                    ..
                }))
            }
        );
        assert_eq!(surface.value(), "draft");
        assert!(rx.try_recv().is_ok());
        assert!(alerts.messages().is_empty());
    }

    #[test]
    fn focus_failure_falls_back_before_touching_the_draft() {
        let config = QuoteConfig::default();
        let (bus, alerts) = (SignalBus::new(), RecordingAlerts::default());
        let rx = bus.subscribe();
        let writer = ComposerWriter::new(&config, &bus, &alerts);
        let surface = Arc::new(MemorySurface::new("draft").failing_on(SurfaceOp::Focus));

        let outcome = writer.write(Some(&composer(&surface)), &quote());

        assert_matches!(
            outcome,
            WriteOutcome::Broadcast {
                reason: FallbackReason::Insert(InsertError::Surface(SurfaceError::Rejected {
                    op: SurfaceOp::Focus,
                    ..
                }))
            }
        );
        assert_eq!(surface.value(), "draft");
        assert!(surface.signals().is_empty());
        assert_eq!(rx.try_recv().expect("fallback").payload, quote().as_str());
        assert!(alerts.messages().is_empty());
    }

    #[test]
    fn dispatch_failure_keeps_assigned_value_and_also_broadcasts() {
        let config = QuoteConfig::default();
        let (bus, alerts) = (SignalBus::new(), RecordingAlerts::default());
        let rx = bus.subscribe();
        let writer = ComposerWriter::new(&config, &bus, &alerts);
        let surface = Arc::new(MemorySurface::new("draft").failing_on(SurfaceOp::Dispatch));
        let quote = format_quote("hi", None);

        let outcome = writer.write(Some(&composer(&surface)), &quote);

        assert_matches!(
            outcome,
            WriteOutcome::Broadcast {
                reason: FallbackReason::Insert(InsertError::Surface(SurfaceError::Rejected {
                    op: SurfaceOp::Dispatch,
                    ..
                }))
            }
        );
        assert_eq!(surface.value(), "draft\n> hi\n\n");
        assert!(surface.signals().is_empty());
        assert_eq!(rx.try_recv().expect("fallback").payload, "> hi\n\n");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn cursor_and_scroll_failures_do_not_affect_success() {
        let config = QuoteConfig::default();
        let (bus, alerts) = (SignalBus::new(), RecordingAlerts::default());
        let rx = bus.subscribe();
        let writer = ComposerWriter::new(&config, &bus, &alerts);
        let surface = Arc::new(
            MemorySurface::new("")
                .failing_on(SurfaceOp::SetCursor)
                .failing_on(SurfaceOp::Scroll),
        );

        let outcome = writer.write(Some(&composer(&surface)), &quote());

        assert!(outcome.is_inserted());
        assert_eq!(surface.value(), quote().as_str());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn broken_fallback_channel_is_reported_not_raised() {
        let config = QuoteConfig::default();
        let alerts = RecordingAlerts::default();
        let writer = ComposerWriter::new(&config, &BrokenNotifier, &alerts);

        assert_matches!(
            writer.write(None, &quote()),
            WriteOutcome::Dropped { reason: FallbackReason::NoTarget, .. }
        );
    }
}
