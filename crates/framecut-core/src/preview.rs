//! Holder for the single live preview resource.
//!
//! The browser side keeps previews as object URLs, which must be revoked
//! explicitly. The slot hands the previous handle back on every change so
//! the caller can release it before the new one is shown.

/// At most one preview handle.
#[derive(Debug)]
pub struct PreviewSlot<T> {
    current: Option<T>,
}

impl<T> Default for PreviewSlot<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T> PreviewSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Install `next`, returning the handle it displaces.
    #[must_use = "the displaced preview must be released"]
    pub fn replace(&mut self, next: T) -> Option<T> {
        self.current.replace(next)
    }

    /// Clear the slot, returning the handle to release.
    #[must_use = "the removed preview must be released"]
    pub fn release(&mut self) -> Option<T> {
        self.current.take()
    }
}
