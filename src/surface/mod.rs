use std::sync::Arc;

use strum::{AsRefStr, Display};
use thiserror::Error;

mod memory;

pub use memory::{MemorySurface, MemorySurfaces};

/// Host interactions a surface may refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SurfaceOp {
    Focus,
    SetValue,
    Dispatch,
    SetCursor,
    Scroll,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("surface rejected {op}: {reason}")]
    Rejected { op: SurfaceOp, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ChangeKind {
    Input,
    Change,
}

/// Change notification the host listens for to resync its own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSignal {
    pub kind: ChangeKind,
    pub bubbles: bool,
    pub cancelable: bool,
}

impl ChangeSignal {
    pub fn new(kind: ChangeKind) -> Self {
        Self {
            kind,
            bubbles: true,
            cancelable: true,
        }
    }
}

/// One live, editable text input owned by the host.
///
/// Handles are shared; implementations keep their own interior mutability the way a
/// DOM element does.
pub trait ComposerSurface: Send + Sync {
    fn value(&self) -> String;

    /// Whether the surface currently has a layout position.
    fn is_rendered(&self) -> bool;

    fn is_disabled(&self) -> bool;

    fn is_read_only(&self) -> bool;

    fn focus(&self) -> Result<(), SurfaceError>;

    fn set_value(&self, value: &str) -> Result<(), SurfaceError>;

    fn dispatch(&self, signal: ChangeSignal) -> Result<(), SurfaceError>;

    /// Collapses the selection to `position`, in UTF-16 code units.
    fn set_cursor(&self, position: usize) -> Result<(), SurfaceError>;

    fn scroll_to_bottom(&self) -> Result<(), SurfaceError>;

    fn is_editable(&self) -> bool {
        self.is_rendered() && !self.is_disabled() && !self.is_read_only()
    }
}

pub trait SurfaceProvider: Send + Sync {
    /// First surface matching `selector`, if any.
    fn query(&self, selector: &str) -> Option<Arc<dyn ComposerSurface>>;
}
