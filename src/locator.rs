use std::fmt;
use std::sync::Arc;

use strum::{AsRefStr, Display};

use crate::config::SurfaceSelectors;
use crate::state::Message;
use crate::surface::{ComposerSurface, SurfaceProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SurfaceRole {
    MainComposer,
    ThreadReply,
    SidePanelText,
}

const THREAD_FIRST: [SurfaceRole; 3] = [
    SurfaceRole::ThreadReply,
    SurfaceRole::SidePanelText,
    SurfaceRole::MainComposer,
];

const MAIN_FIRST: [SurfaceRole; 3] = [
    SurfaceRole::MainComposer,
    SurfaceRole::ThreadReply,
    SurfaceRole::SidePanelText,
];

impl SurfaceRole {
    pub fn selector(self, selectors: &SurfaceSelectors) -> &str {
        match self {
            SurfaceRole::MainComposer => &selectors.main_composer,
            SurfaceRole::ThreadReply => &selectors.thread_reply,
            SurfaceRole::SidePanelText => &selectors.side_panel_text,
        }
    }
}

/// The composer a quote will be written into.
#[derive(Clone)]
pub struct SelectedComposer {
    pub role: SurfaceRole,
    pub surface: Arc<dyn ComposerSurface>,
}

impl fmt::Debug for SelectedComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedComposer")
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Candidate roles in the order they should be tried for `message`.
pub fn candidate_order(
    message: &Message,
    surfaces: &dyn SurfaceProvider,
    selectors: &SurfaceSelectors,
) -> [SurfaceRole; 3] {
    let side_panel_visible = surfaces
        .query(SurfaceRole::ThreadReply.selector(selectors))
        .is_some_and(|surface| surface.is_rendered());
    if message.is_thread_reply() && side_panel_visible {
        THREAD_FIRST
    } else {
        MAIN_FIRST
    }
}

/// Picks the first editable candidate, or `None` when nothing qualifies.
pub fn locate_composer(
    message: &Message,
    surfaces: &dyn SurfaceProvider,
    selectors: &SurfaceSelectors,
) -> Option<SelectedComposer> {
    let order = candidate_order(message, surfaces, selectors);
    let selected = order.into_iter().find_map(|role| {
        surfaces
            .query(role.selector(selectors))
            .filter(|surface| surface.is_editable())
            .map(|surface| SelectedComposer { role, surface })
    });
    match &selected {
        Some(composer) => {
            tracing::debug!(message_id = %message.id, role = %composer.role, "selected composer")
        }
        None => tracing::debug!(message_id = %message.id, ?order, "no editable composer found"),
    }
    selected
}
