use std::sync::Arc;

use anyhow::Result;

use crate::app::QuoteService;
use crate::state::MessageRef;

pub const PLUGIN_ID: &str = "quote-message";
pub const MENU_LABEL: &str = "Quote message";
pub const MENU_ICON: &str = "💬";

pub type ActionFn = Box<dyn Fn(MessageRef<'_>) + Send + Sync>;
pub type FilterFn = Box<dyn Fn(MessageRef<'_>) -> bool + Send + Sync>;
pub type Unregister = Box<dyn FnOnce() -> Result<()> + Send>;

/// Entry for the host's per-message dropdown menu.
pub struct MessageMenuAction {
    pub label: &'static str,
    pub icon: &'static str,
    pub action: ActionFn,
    pub filter: FilterFn,
}

pub trait ActionRegistry {
    fn register_message_menu_action(&mut self, action: MessageMenuAction) -> Result<Unregister>;
}

pub struct QuotePlugin {
    service: Arc<QuoteService>,
    unregister: Option<Unregister>,
}

impl QuotePlugin {
    pub fn new(service: Arc<QuoteService>) -> Self {
        Self {
            service,
            unregister: None,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.unregister.is_some()
    }

    /// Registers the menu action. Failures are logged; the host never sees them.
    pub fn initialize(&mut self, registry: &mut dyn ActionRegistry) {
        tracing::info!(plugin = PLUGIN_ID, "initializing");
        let action_service = Arc::clone(&self.service);
        let filter_service = Arc::clone(&self.service);
        let action = MessageMenuAction {
            label: MENU_LABEL,
            icon: MENU_ICON,
            action: Box::new(move |target| {
                action_service.quote(target);
            }),
            filter: Box::new(move |target| filter_service.can_quote(target)),
        };
        match registry.register_message_menu_action(action) {
            Ok(unregister) => {
                self.unregister = Some(unregister);
                tracing::info!(plugin = PLUGIN_ID, "initialized");
            }
            Err(err) => tracing::error!(plugin = PLUGIN_ID, ?err, "initialization failed"),
        }
    }

    pub fn uninitialize(&mut self) {
        tracing::info!(plugin = PLUGIN_ID, "uninitializing");
        if let Some(unregister) = self.unregister.take() {
            if let Err(err) = unregister() {
                tracing::error!(plugin = PLUGIN_ID, ?err, "failed to unregister menu action");
            }
        }
    }
}
