use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use super::{ChangeKind, ChangeSignal, ComposerSurface, SurfaceError, SurfaceOp, SurfaceProvider};

/// Headless composer surface for hosts without a real rendering environment.
#[derive(Debug, Default)]
pub struct MemorySurface {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    value: String,
    hidden: bool,
    disabled: bool,
    read_only: bool,
    focused: bool,
    cursor: Option<usize>,
    scrolled_to_bottom: bool,
    signals: Vec<ChangeSignal>,
    failing: HashSet<SurfaceOp>,
}

impl MemorySurface {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                value: value.into(),
                ..Inner::default()
            }),
        }
    }

    pub fn hidden(self) -> Self {
        self.inner.lock().hidden = true;
        self
    }

    pub fn disabled(self) -> Self {
        self.inner.lock().disabled = true;
        self
    }

    pub fn read_only(self) -> Self {
        self.inner.lock().read_only = true;
        self
    }

    /// Makes every later `op` call fail.
    pub fn failing_on(self, op: SurfaceOp) -> Self {
        self.inner.lock().failing.insert(op);
        self
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.inner.lock().hidden = hidden;
    }

    pub fn is_focused(&self) -> bool {
        self.inner.lock().focused
    }

    pub fn cursor(&self) -> Option<usize> {
        self.inner.lock().cursor
    }

    pub fn is_scrolled_to_bottom(&self) -> bool {
        self.inner.lock().scrolled_to_bottom
    }

    pub fn signals(&self) -> Vec<ChangeKind> {
        self.inner.lock().signals.iter().map(|signal| signal.kind).collect()
    }

    fn guard(&self, op: SurfaceOp) -> Result<parking_lot::MutexGuard<'_, Inner>, SurfaceError> {
        let inner = self.inner.lock();
        if inner.failing.contains(&op) {
            return Err(SurfaceError::Rejected {
                op,
                reason: "injected failure".to_string(),
            });
        }
        Ok(inner)
    }
}

impl ComposerSurface for MemorySurface {
    fn value(&self) -> String {
        self.inner.lock().value.clone()
    }

    fn is_rendered(&self) -> bool {
        !self.inner.lock().hidden
    }

    fn is_disabled(&self) -> bool {
        self.inner.lock().disabled
    }

    fn is_read_only(&self) -> bool {
        self.inner.lock().read_only
    }

    fn focus(&self) -> Result<(), SurfaceError> {
        self.guard(SurfaceOp::Focus)?.focused = true;
        Ok(())
    }

    fn set_value(&self, value: &str) -> Result<(), SurfaceError> {
        let mut inner = self.guard(SurfaceOp::SetValue)?;
        inner.value = value.to_string();
        inner.cursor = None;
        inner.scrolled_to_bottom = false;
        Ok(())
    }

    fn dispatch(&self, signal: ChangeSignal) -> Result<(), SurfaceError> {
        self.guard(SurfaceOp::Dispatch)?.signals.push(signal);
        Ok(())
    }

    fn set_cursor(&self, position: usize) -> Result<(), SurfaceError> {
        let mut inner = self.guard(SurfaceOp::SetCursor)?;
        let len = inner.value.encode_utf16().count();
        inner.cursor = Some(position.min(len));
        Ok(())
    }

    fn scroll_to_bottom(&self) -> Result<(), SurfaceError> {
        self.guard(SurfaceOp::Scroll)?.scrolled_to_bottom = true;
        Ok(())
    }
}

/// Selector-keyed set of surfaces. Later registrations under the same selector replace earlier ones.
#[derive(Default)]
pub struct MemorySurfaces {
    surfaces: Mutex<IndexMap<String, Arc<dyn ComposerSurface>>>,
}

impl MemorySurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, selector: impl Into<String>, surface: Arc<dyn ComposerSurface>) {
        self.surfaces.lock().insert(selector.into(), surface);
    }

    pub fn remove(&self, selector: &str) -> Option<Arc<dyn ComposerSurface>> {
        self.surfaces.lock().shift_remove(selector)
    }

    pub fn selectors(&self) -> Vec<String> {
        self.surfaces.lock().keys().cloned().collect()
    }
}

impl SurfaceProvider for MemorySurfaces {
    fn query(&self, selector: &str) -> Option<Arc<dyn ComposerSurface>> {
        self.surfaces.lock().get(selector).cloned()
    }
}
